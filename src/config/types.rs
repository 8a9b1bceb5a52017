//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel, SortKey and TimeStampKind are small enums with string parsing
//!   shared by the XML loader and the CLI.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{DEFAULT_RADIX, DEFAULT_TIME_SEPARATOR};

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Warnings and errors (default)
    #[default]
    Normal,
    /// Plan and execution summaries
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" | "warn" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Ordering applied to a directory selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    /// Last access time
    Atime,
    /// Last modification time
    Mtime,
    /// Status change time (creation time where that is all the platform offers)
    Ctime,
    Size,
}

impl SortKey {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Some(SortKey::Name),
            "atime" => Some(SortKey::Atime),
            "mtime" => Some(SortKey::Mtime),
            "ctime" => Some(SortKey::Ctime),
            "size" => Some(SortKey::Size),
            _ => None,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortKey::Name => "name",
            SortKey::Atime => "atime",
            SortKey::Mtime => "mtime",
            SortKey::Ctime => "ctime",
            SortKey::Size => "size",
        };
        f.write_str(s)
    }
}

impl FromStr for SortKey {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid sort key: '{s}' (name, atime, mtime, ctime, size)"))
    }
}

/// Which timestamp feeds `{d}`, `{t}` and `{unixt}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeStampKind {
    #[default]
    Mtime,
    Atime,
    Ctime,
}

impl TimeStampKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mtime" => Some(TimeStampKind::Mtime),
            "atime" => Some(TimeStampKind::Atime),
            "ctime" => Some(TimeStampKind::Ctime),
            _ => None,
        }
    }
}

impl fmt::Display for TimeStampKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeStampKind::Mtime => "mtime",
            TimeStampKind::Atime => "atime",
            TimeStampKind::Ctime => "ctime",
        };
        f.write_str(s)
    }
}

impl FromStr for TimeStampKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid time stamp type: '{s}' (mtime, atime, ctime)"))
    }
}

/// Runtime configuration. Loaded from XML, then overridden by CLI flags.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory whose entries are renamed
    pub source_dir: PathBuf,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// Allow targets that equal other selected names (chains and cycles)
    pub overlap: bool,
    /// Skip directories when listing the source directory
    pub exclude_dir: bool,
    /// Consider the running executable when listing
    pub include_self: bool,
    /// Counter radix (2..=36)
    pub radix: u32,
    /// First counter value
    pub start_number: u64,
    /// Separator between date/time components
    pub time_separator: String,
    pub time_stamp: TimeStampKind,
    /// Explicit ordering; `None` sorts listings by name and keeps explicit lists as given
    pub sort: Option<SortKey>,
    pub reverse_sort: bool,
    /// If true, plan and report but do not rename anything
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            log_level: LogLevel::Normal,
            log_file: None,
            overlap: false,
            exclude_dir: false,
            include_self: false,
            radix: DEFAULT_RADIX,
            start_number: 0,
            time_separator: DEFAULT_TIME_SEPARATOR.to_string(),
            time_stamp: TimeStampKind::Mtime,
            sort: None,
            reverse_sort: false,
            dry_run: false,
        }
    }
}

impl Config {
    /// Construct a Config for `source_dir`; other fields use defaults.
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_and_time_stamp_round_trip_names() {
        for key in [SortKey::Name, SortKey::Atime, SortKey::Mtime, SortKey::Ctime, SortKey::Size] {
            assert_eq!(key.to_string().parse::<SortKey>().unwrap(), key);
        }
        assert_eq!("ATIME".parse::<TimeStampKind>().unwrap(), TimeStampKind::Atime);
        assert!("birth".parse::<SortKey>().is_err());
    }

    #[test]
    fn defaults() {
        let cfg = Config::new("/tmp");
        assert_eq!(cfg.radix, 10);
        assert_eq!(cfg.time_separator, "-");
        assert_eq!(cfg.sort, None);
        assert!(!cfg.overlap && !cfg.dry_run);
    }
}
