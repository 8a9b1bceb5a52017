//! Schedule synthesis: turn chains and cycles into an ordered list of
//! primitive renames that never land on a name still needed as a source.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use super::graph::{Component, RenameGraph};
use super::temp::{TEMP_NAME_ATTEMPTS, TempNameFactory};
use crate::errors::RenameError;
use crate::fs_ops::entry_exists;

/// One primitive rename.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Step {
    pub from: PathBuf,
    pub to: PathBuf,
}

impl Step {
    pub fn new(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// The step that undoes this one.
    pub fn inverse(&self) -> Step {
        Step::new(&self.to, &self.from)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' -> '{}'", self.from.display(), self.to.display())
    }
}

/// Ordered steps plus the placeholder names they pass through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    steps: Vec<Step>,
    temps: Vec<PathBuf>,
}

impl Schedule {
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Placeholder names used to break cycles, each listed once even when several cycles share it.
    pub fn temps(&self) -> &[PathBuf] {
        &self.temps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Replay the steps against a set of occupied names.
    ///
    /// Safe means: every `from` is occupied when reached, every `to` is free, and
    /// no placeholder is still occupied at the end.
    pub fn is_safe_for<I>(&self, occupied: I) -> bool
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut occupied: HashSet<PathBuf> = occupied.into_iter().collect();
        for step in &self.steps {
            if !occupied.remove(&step.from) || !occupied.insert(step.to.clone()) {
                return false;
            }
        }
        self.temps.iter().all(|t| !occupied.contains(t))
    }
}

/// Emit steps for every component: chains first, then cycles.
pub fn synthesize(
    graph: &RenameGraph,
    components: &[Component],
    factory: &mut dyn TempNameFactory,
) -> Result<Schedule, RenameError> {
    let mut schedule = Schedule::default();
    // A chain's sink is vacated once the chain has run; cycles reuse it.
    let mut spare: Option<PathBuf> = None;

    for component in components.iter().filter(|c| !c.is_cycle()) {
        let nodes = component.nodes();
        for w in nodes.windows(2) {
            schedule.steps.push(Step::new(&w[1], &w[0]));
        }
        spare = nodes.last().cloned();
    }

    for component in components.iter().filter(|c| c.is_cycle()) {
        let nodes = component.nodes();
        let seed = &nodes[0];
        let temp = match &spare {
            Some(t) => t.clone(),
            None => {
                let dir = seed.parent().unwrap_or_else(|| Path::new("."));
                let t = fresh_temp_name(graph, dir, factory)?;
                spare = Some(t.clone());
                t
            }
        };
        trace!(seed = %seed.display(), temp = %temp.display(), len = nodes.len(), "breaking cycle");

        schedule.steps.push(Step::new(seed, &temp));
        for w in nodes.windows(2) {
            schedule.steps.push(Step::new(&w[1], &w[0]));
        }
        let last = nodes.last().unwrap_or(seed);
        schedule.steps.push(Step::new(&temp, last));
        if !schedule.temps.contains(&temp) {
            schedule.temps.push(temp);
        }
    }

    debug!(steps = schedule.steps.len(), temps = schedule.temps.len(), "schedule synthesized");
    Ok(schedule)
}

/// Ask the factory for at most `TEMP_NAME_ATTEMPTS` candidates.
fn fresh_temp_name(
    graph: &RenameGraph,
    dir: &Path,
    factory: &mut dyn TempNameFactory,
) -> Result<PathBuf, RenameError> {
    for attempt in 1..=TEMP_NAME_ATTEMPTS {
        let candidate = factory.candidate(dir);
        if !entry_exists(&candidate) && !graph.contains(&candidate) {
            return Ok(candidate);
        }
        debug!(attempt, candidate = %candidate.display(), "temporary name unavailable");
    }
    Err(RenameError::TempNameExhausted(dir.to_path_buf()))
}
