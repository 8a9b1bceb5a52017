//! Schedule execution and best-effort rollback.
//!
//! Steps run strictly in order; each success is logged before the next step is
//! attempted, and the first failure stops execution. Rollback replays the log
//! backwards with every step inverted. A failed inverse step is unrecoverable.

use std::fmt;
use tracing::{debug, error, info, warn};

use super::schedule::{Schedule, Step};
use crate::errors::RenameError;
use crate::fs_ops::rename_no_clobber;

/// Per-invocation lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Planned,
    Executing,
    Completed,
    Failed,
    RollingBack,
    RolledBack,
    /// Rollback itself failed; no further automatic action is attempted.
    FatalInconsistent,
}

impl RunState {
    pub fn as_str(self) -> &'static str {
        match self {
            RunState::Planned => "planned",
            RunState::Executing => "executing",
            RunState::Completed => "completed",
            RunState::Failed => "failed",
            RunState::RollingBack => "rolling-back",
            RunState::RolledBack => "rolled-back",
            RunState::FatalInconsistent => "fatal-inconsistent",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunState::Completed | RunState::RolledBack | RunState::FatalInconsistent
        )
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of running a schedule: success flag plus everything that completed.
#[derive(Debug)]
pub struct ExecutionOutcome {
    pub success: bool,
    pub log: Vec<Step>,
    pub error: Option<RenameError>,
}

/// Apply `schedule` in order, stopping at the first failed step.
pub fn execute(schedule: &Schedule) -> ExecutionOutcome {
    let mut log: Vec<Step> = Vec::with_capacity(schedule.len());
    for step in schedule.steps() {
        match rename_no_clobber(&step.from, &step.to) {
            Ok(()) => {
                debug!(from = %step.from.display(), to = %step.to.display(), "renamed");
                log.push(step.clone());
            }
            Err(source) => {
                warn!(
                    from = %step.from.display(),
                    to = %step.to.display(),
                    completed = log.len(),
                    error = %source,
                    "rename step failed; stopping"
                );
                let error = RenameError::StepFailed {
                    step: step.clone(),
                    completed: log.clone(),
                    source,
                };
                return ExecutionOutcome {
                    success: false,
                    log,
                    error: Some(error),
                };
            }
        }
    }
    info!(steps = log.len(), "schedule completed");
    ExecutionOutcome {
        success: true,
        log,
        error: None,
    }
}

/// Undo a log of executed steps, newest first. Returns the inverse steps applied.
pub fn undo(log: &[Step]) -> Result<Vec<Step>, RenameError> {
    let mut undone: Vec<Step> = Vec::with_capacity(log.len());
    for (idx, step) in log.iter().enumerate().rev() {
        let inverse = step.inverse();
        if let Err(source) = rename_no_clobber(&inverse.from, &inverse.to) {
            error!(
                from = %inverse.from.display(),
                to = %inverse.to.display(),
                undone = undone.len(),
                pending = idx + 1,
                error = %source,
                "rollback step failed; directory left in a mixed state"
            );
            return Err(RenameError::RollbackFailed {
                step: step.clone(),
                undone,
                pending: log[..=idx].to_vec(),
                source,
            });
        }
        debug!(from = %inverse.from.display(), to = %inverse.to.display(), "restored");
        undone.push(inverse);
    }
    info!(steps = undone.len(), "rollback completed");
    Ok(undone)
}

/// Drives one schedule through the lifecycle and keeps the rename log.
#[derive(Debug)]
pub struct Executor {
    state: RunState,
    log: Vec<Step>,
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor {
    pub fn new() -> Self {
        Self {
            state: RunState::Planned,
            log: Vec::new(),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Steps that completed, in execution order.
    pub fn log(&self) -> &[Step] {
        &self.log
    }

    /// Planned -> Executing -> Completed | Failed.
    pub fn run(&mut self, schedule: &Schedule) -> Result<(), RenameError> {
        if self.state != RunState::Planned {
            return Err(RenameError::InvalidState(self.state.as_str()));
        }
        self.state = RunState::Executing;
        let outcome = execute(schedule);
        self.log = outcome.log;
        match outcome.error {
            None => {
                self.state = RunState::Completed;
                Ok(())
            }
            Some(e) => {
                self.state = RunState::Failed;
                Err(e)
            }
        }
    }

    /// Failed -> RollingBack -> RolledBack | FatalInconsistent.
    pub fn rollback(&mut self) -> Result<(), RenameError> {
        if self.state != RunState::Failed {
            return Err(RenameError::InvalidState(self.state.as_str()));
        }
        self.state = RunState::RollingBack;
        match undo(&self.log) {
            Ok(_) => {
                self.log.clear();
                self.state = RunState::RolledBack;
                Ok(())
            }
            Err(e) => {
                self.state = RunState::FatalInconsistent;
                Err(e)
            }
        }
    }
}
