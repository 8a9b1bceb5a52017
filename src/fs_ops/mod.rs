//! Filesystem operations: the rename primitive, error hints and selection.

mod atomic;
pub mod helpers;
mod select;

pub use atomic::{entry_exists, is_case_only_rename, rename_no_clobber, same_entry};
pub use helpers::{io_error_with_help, io_error_with_help_io};
pub use select::{Filter, Selected, Selector, match_at_start, select};
