//! Core library for `batchmv`.
//!
//! Renames many entries of one directory as a single batch. New names come
//! from a pattern, a list or explicit pairs; the engine orders the renames
//! so chains and cycles never overwrite a live name, and can undo a batch
//! that fails part way.

pub mod cli;
pub mod config;
pub mod engine;
pub mod entry;
pub mod errors;
pub mod fs_ops;
pub mod naming;
pub mod output;
pub mod platform;
pub mod shutdown;

pub use config::{
    Config, LogLevel, SortKey, TimeStampKind, default_config_path, default_log_path,
    path_has_symlink_ancestor,
};
pub use engine::{ExecutionOutcome, Executor, Plan, PlanOptions, RunState, Schedule, Step, plan};
pub use entry::{ExistingFile, ProposedName, RenamePair};
pub use errors::RenameError;
pub use fs_ops::{Filter, Selected, Selector, select};
pub use naming::{Dest, NamePattern, NamingOptions, RenameMode, build_pairs};
