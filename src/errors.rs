//! Typed error definitions for batchmv.
//! Every variant names the offending path(s); execution and rollback failures
//! also carry the exact step lists that define the on-disk state.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::engine::Step;

#[derive(Debug, Error)]
pub enum RenameError {
    #[error("Source path not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("Destination must be a top-level name without directory separators: '{0}'")]
    NotTopLevel(String),

    #[error("Source '{}' and target '{}' are not in the same directory", .source_path.display(), .target_path.display())]
    DifferentParent {
        source_path: PathBuf,
        target_path: PathBuf,
    },

    #[error("Names do not yield unique targets; '{}' is produced more than once", .0.display())]
    NonUniqueTarget(PathBuf),

    #[error("Source '{}' is selected more than once", .0.display())]
    NonUniqueSource(PathBuf),

    #[error("New names overlap with existing selected names (use --overlap to allow): {}", join_paths(.0))]
    InternalCollision(Vec<PathBuf>),

    #[error("A new name collides with a file outside the selection: {}", join_paths(.0))]
    ExternalCollision(Vec<PathBuf>),

    #[error("Could not find an available temporary name in '{}'", .0.display())]
    TempNameExhausted(PathBuf),

    #[error("Invalid name pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Rename method and selection disagree: {0}")]
    Mismatch(String),

    #[error("Rename '{}' -> '{}' failed after {} completed step(s): {source}", .step.from.display(), .step.to.display(), .completed.len())]
    StepFailed {
        step: Step,
        completed: Vec<Step>,
        #[source]
        source: io::Error,
    },

    #[error("Rollback of '{}' -> '{}' failed with {} step(s) undone and {} pending; directory needs manual inspection: {source}", .step.to.display(), .step.from.display(), .undone.len(), .pending.len())]
    RollbackFailed {
        step: Step,
        undone: Vec<Step>,
        pending: Vec<Step>,
        #[source]
        source: io::Error,
    },

    #[error("Operation not allowed in state {0}")]
    InvalidState(&'static str),

    #[error("Operation interrupted by user")]
    Interrupted,
}

impl RenameError {
    /// Stable numeric code used as a structured logging field.
    pub fn code(&self) -> u16 {
        match self {
            RenameError::SourceNotFound(_) => 10,
            RenameError::InvalidName { .. } => 11,
            RenameError::NotTopLevel(_) => 12,
            RenameError::DifferentParent { .. } => 13,
            RenameError::NonUniqueTarget(_) => 14,
            RenameError::NonUniqueSource(_) => 15,
            RenameError::InvalidPattern { .. } => 16,
            RenameError::Mismatch(_) => 17,
            RenameError::InternalCollision(_) => 20,
            RenameError::ExternalCollision(_) => 21,
            RenameError::TempNameExhausted(_) => 30,
            RenameError::StepFailed { .. } => 40,
            RenameError::RollbackFailed { .. } => 50,
            RenameError::InvalidState(_) => 60,
            RenameError::Interrupted => 70,
        }
    }

    /// True only for the unrecoverable mixed-state outcome.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RenameError::RollbackFailed { .. })
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("'{}'", p.display()))
        .collect::<Vec<_>>()
        .join(", ")
}
