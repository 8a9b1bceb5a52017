//! Collision analysis over a batch of rename pairs.
//!
//! - No-op pairs (source == target) are partitioned out and never scheduled.
//! - Duplicate targets or sources are hard errors (the rename relation would branch).
//! - Internal collisions (target is another pair's source) need explicit opt-in.
//! - External collisions (target exists and is not selected) are always fatal,
//!   including hard links to the source under another name.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::entry::RenamePair;
use crate::errors::RenameError;
use crate::fs_ops::{entry_exists, is_case_only_rename};

/// Pairs split into scheduled work and ignored no-ops, both in caller order.
#[derive(Debug, Default)]
pub struct Partition {
    pub included: Vec<RenamePair>,
    pub ignored: Vec<RenamePair>,
}

pub fn partition(pairs: Vec<RenamePair>) -> Partition {
    let (ignored, included): (Vec<_>, Vec<_>) = pairs.into_iter().partition(RenamePair::is_noop);
    Partition { included, ignored }
}

/// Reject batches where two pairs share a target or a source.
/// No-op pairs take part: `A -> A` plus `B -> A` is a duplicate target.
pub fn check_unique(pairs: &[RenamePair]) -> Result<(), RenameError> {
    let mut targets: HashSet<&Path> = HashSet::with_capacity(pairs.len());
    let mut sources: HashSet<&Path> = HashSet::with_capacity(pairs.len());
    for pair in pairs {
        if !targets.insert(pair.target.path()) {
            return Err(RenameError::NonUniqueTarget(pair.target.path().to_path_buf()));
        }
        if !sources.insert(pair.source.path()) {
            return Err(RenameError::NonUniqueSource(pair.source.path().to_path_buf()));
        }
    }
    Ok(())
}

/// Targets that land on names already in use.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollisionReport {
    /// Targets equal to another included pair's source (chains and cycles).
    pub internal: BTreeSet<PathBuf>,
    /// Targets occupied by entries outside the selection.
    pub external: BTreeSet<PathBuf>,
}

impl CollisionReport {
    pub fn is_clear(&self) -> bool {
        self.internal.is_empty() && self.external.is_empty()
    }

    /// Turn findings into errors: external always, internal unless `overlap` is allowed.
    pub fn enforce(&self, overlap: bool) -> Result<(), RenameError> {
        if !self.external.is_empty() {
            return Err(RenameError::ExternalCollision(self.external.iter().cloned().collect()));
        }
        if !overlap && !self.internal.is_empty() {
            return Err(RenameError::InternalCollision(self.internal.iter().cloned().collect()));
        }
        Ok(())
    }
}

/// Classify every included target. Read-only: only existence checks touch the filesystem.
pub fn analyze(included: &[RenamePair]) -> CollisionReport {
    let sources: HashSet<&Path> = included.iter().map(|p| p.source.path()).collect();
    let mut report = CollisionReport::default();

    for pair in included {
        let target = pair.target.path();
        if sources.contains(target) {
            report.internal.insert(target.to_path_buf());
        } else if entry_exists(target) && !is_case_only_rename(pair.source.path(), target) {
            report.external.insert(target.to_path_buf());
        }
    }

    debug!(
        internal = report.internal.len(),
        external = report.external.len(),
        "collision analysis complete"
    );
    report
}
