//! Name generation: counters, the pattern language and rename methods.

pub mod counters;
pub mod generate;
pub mod pattern;

pub use generate::{Dest, NamingOptions, RenameMode, build_pairs};
pub use pattern::NamePattern;
