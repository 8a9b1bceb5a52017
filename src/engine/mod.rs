//! Rename scheduling engine.
//!
//! Pipeline: uniqueness check -> no-op partition -> collision analysis ->
//! graph classification -> schedule synthesis. Planning never touches the
//! filesystem beyond existence checks; only `execute`/`undo` rename anything.

pub mod collision;
pub mod execute;
pub mod graph;
pub mod schedule;
pub mod temp;
pub mod validate;

pub use collision::{CollisionReport, Partition};
pub use execute::{ExecutionOutcome, Executor, RunState, execute, undo};
pub use graph::{Component, RenameGraph};
pub use schedule::{Schedule, Step};
pub use temp::{RandomTempNames, TempNameFactory};

use tracing::{debug, info};

use crate::entry::RenamePair;
use crate::errors::RenameError;

/// Flags that reach the core. `dry_run` is honored by the caller: a dry run
/// plans fully and simply never hands the schedule to the executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanOptions {
    /// Allow targets that equal another selected entry's current name.
    pub overlap: bool,
}

/// Everything decided before execution.
#[derive(Debug)]
pub struct Plan {
    pub included: Vec<RenamePair>,
    pub ignored: Vec<RenamePair>,
    pub collisions: CollisionReport,
    pub components: Vec<Component>,
    pub schedule: Schedule,
}

impl Plan {
    /// True when no pair requires a rename.
    pub fn is_noop(&self) -> bool {
        self.schedule.is_empty()
    }
}

/// Validate a batch of pairs and produce a safe schedule.
pub fn plan(
    pairs: Vec<RenamePair>,
    opts: &PlanOptions,
    factory: &mut dyn TempNameFactory,
) -> Result<Plan, RenameError> {
    collision::check_unique(&pairs)?;
    let Partition { included, ignored } = collision::partition(pairs);
    debug!(included = included.len(), ignored = ignored.len(), "pairs partitioned");

    let collisions = collision::analyze(&included);
    collisions.enforce(opts.overlap)?;

    let graph = RenameGraph::build(&included)?;
    let components = graph.components();
    let schedule = schedule::synthesize(&graph, &components, factory)?;
    debug_assert!(
        schedule.is_safe_for(included.iter().map(|p| p.source.path().to_path_buf())),
        "synthesized schedule overwrites a live name"
    );

    info!(
        renames = included.len(),
        steps = schedule.len(),
        chains = components.iter().filter(|c| !c.is_cycle()).count(),
        cycles = components.iter().filter(|c| c.is_cycle()).count(),
        "plan ready"
    );
    Ok(Plan {
        included,
        ignored,
        collisions,
        components,
        schedule,
    })
}
