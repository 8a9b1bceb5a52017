//! CLI definition and parsing.
//! Defines Args and turns it into the rename method, the selection and the
//! naming options.
//!
//! Notes:
//! - Exactly one rename method is required; clap rejects two, `rename_mode`
//!   rejects none (so `--print-config` works on its own).
//! - --debug is a shorthand for --log-level debug.

use anyhow::{Result, bail};
use clap::{ArgGroup, Parser, ValueHint};
use regex::Regex;
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel, SortKey, TimeStampKind};
use crate::errors::RenameError;
use crate::fs_ops::{Filter, Selector};
use crate::naming::{Dest, NamePattern, NamingOptions, RenameMode};

/// Batch-rename the entries of one directory.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "batchmv",
    author,
    version,
    about = "Batch-rename files in a directory, safely reordering chained and cyclic renames",
    group(ArgGroup::new("method").args(["rename_replace", "rename_each", "rename_list", "rename_pairs"])),
    group(ArgGroup::new("selection").args(["regex", "file_list"]))
)]
pub struct Args {
    /// Render PATTERN for every selected entry.
    #[arg(short = 'p', long, value_name = "PATTERN")]
    pub rename_replace: Option<String>,

    /// Replace the first REGEX match inside each selected name with PATTERN.
    #[arg(short = 'e', long, num_args = 2, value_names = ["REGEX", "PATTERN"])]
    pub rename_each: Option<Vec<String>>,

    /// New names for the selected entries, in selection order.
    #[arg(short = 'l', long, num_args = 1.., value_name = "DEST")]
    pub rename_list: Option<Vec<String>>,

    /// Explicit SRC DEST pairs; replaces the selection.
    #[arg(
        short = 'f',
        long,
        num_args = 2..,
        value_names = ["SRC", "DEST"],
        conflicts_with = "selection"
    )]
    pub rename_pairs: Option<Vec<String>>,

    /// Select entries whose name matches REGEX at its start; groups feed {1}, {2}, ...
    #[arg(short = 'R', long, value_name = "REGEX")]
    pub regex: Option<String>,

    /// Select exactly these entries, in this order.
    #[arg(short = 'L', long, num_args = 1.., value_name = "SRC")]
    pub file_list: Option<Vec<String>>,

    /// Sort the selection: name, atime, mtime, ctime or size.
    #[arg(short = 's', long, value_name = "KEY")]
    pub sort: Option<SortKey>,

    /// Reverse the sort order.
    #[arg(short = 'r', long)]
    pub reverse_sort: bool,

    /// Directory whose entries are renamed (default: current directory).
    #[arg(short = 'i', long, value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub source_dir: Option<PathBuf>,

    /// First counter value.
    #[arg(short = 'n', long, value_name = "N")]
    pub start_number: Option<u64>,

    /// Counter radix, 2..=36.
    #[arg(short = 'k', long, value_name = "RADIX", value_parser = clap::value_parser!(u32).range(2..=36))]
    pub radix: Option<u32>,

    /// Plan and print the renames without performing them.
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Allow new names that are also current names of selected entries.
    #[arg(short = 'O', long)]
    pub overlap: bool,

    /// Consider the running executable when listing.
    #[arg(short = 'F', long)]
    pub include_self: bool,

    /// Skip directories when listing.
    #[arg(short = 'X', long)]
    pub exclude_dir: bool,

    /// Print every planned and performed rename.
    #[arg(short = 'v', long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Skip prompts and print only errors.
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Time stamp used by {d}, {t} and {unixt}: mtime, atime or ctime.
    #[arg(short = 't', long = "time-stamp-type", value_name = "KIND")]
    pub time_stamp: Option<TimeStampKind>,

    /// Text placed between date and time components.
    #[arg(short = 'T', long, value_name = "SEP", allow_hyphen_values = true)]
    pub time_separator: Option<String>,

    /// Treat DEST values of --rename-list/--rename-pairs as patterns.
    #[arg(short = 'N', long)]
    pub no_plain_text: bool,

    /// Do not offer to undo a failed batch.
    #[arg(long)]
    pub no_rollback: bool,

    /// Set log level: quiet, normal, info, debug.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Enable debug logging (shorthand for --log-level debug).
    #[arg(long)]
    pub debug: bool,

    /// Emit logs in structured JSON.
    #[arg(long)]
    pub json: bool,

    /// Print the config file location used by batchmv and exit.
    #[arg(long)]
    pub print_config: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level > --verbose/--quiet > None (use config).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        if self.log_level.is_some() {
            return self.log_level;
        }
        if self.verbose {
            Some(LogLevel::Info)
        } else if self.quiet {
            Some(LogLevel::Quiet)
        } else {
            None
        }
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(dir) = &self.source_dir {
            cfg.source_dir = dir.clone();
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(radix) = self.radix {
            cfg.radix = radix;
        }
        if let Some(n) = self.start_number {
            cfg.start_number = n;
        }
        if let Some(sep) = &self.time_separator {
            cfg.time_separator = sep.clone();
        }
        if let Some(kind) = self.time_stamp {
            cfg.time_stamp = kind;
        }
        if let Some(key) = self.sort {
            cfg.sort = Some(key);
        }
        cfg.reverse_sort |= self.reverse_sort;
        cfg.overlap |= self.overlap;
        cfg.exclude_dir |= self.exclude_dir;
        cfg.include_self |= self.include_self;
        cfg.dry_run |= self.dry_run;
    }

    /// The rename method selected on the command line.
    pub fn rename_mode(&self) -> Result<RenameMode> {
        let plain = !self.no_plain_text;
        let mode = if let Some(pattern) = &self.rename_replace {
            RenameMode::Replace(NamePattern::parse(pattern)?)
        } else if let Some([regex, pattern]) = self.rename_each.as_deref() {
            RenameMode::Each {
                regex: compile(regex)?,
                pattern: NamePattern::parse(pattern)?,
            }
        } else if let Some(dests) = &self.rename_list {
            RenameMode::List(
                dests
                    .iter()
                    .map(|d| Dest::new(d, plain))
                    .collect::<Result<_, _>>()?,
            )
        } else if let Some(values) = &self.rename_pairs {
            if values.len() % 2 != 0 {
                return Err(RenameError::Mismatch(format!(
                    "--rename-pairs needs SRC DEST pairs, got {} value(s)",
                    values.len()
                ))
                .into());
            }
            RenameMode::Pairs(
                values
                    .chunks_exact(2)
                    .map(|pair| -> Result<(String, Dest), RenameError> {
                        Ok((pair[0].clone(), Dest::new(&pair[1], plain)?))
                    })
                    .collect::<Result<_, _>>()?,
            )
        } else {
            bail!("a rename method is required: --rename-replace, --rename-each, --rename-list or --rename-pairs");
        };
        Ok(mode)
    }

    /// Selection settings for `cfg` (after overrides).
    pub fn selector(&self, cfg: &Config) -> Result<Selector> {
        let filter = match (&self.regex, &self.file_list) {
            (Some(re), _) => Filter::Regex(compile(re)?),
            (None, Some(names)) => Filter::Names(names.clone()),
            (None, None) => Filter::All,
        };
        Ok(Selector {
            filter,
            exclude_dir: cfg.exclude_dir,
            include_self: cfg.include_self,
            sort: cfg.sort,
            reverse: cfg.reverse_sort,
        })
    }
}

/// Naming options carried by `cfg`.
pub fn naming_options(cfg: &Config) -> NamingOptions {
    NamingOptions {
        start_number: cfg.start_number,
        radix: cfg.radix,
        time_stamp: cfg.time_stamp,
        time_separator: cfg.time_separator.clone(),
    }
}

fn compile(re: &str) -> Result<Regex, RenameError> {
    Regex::new(re).map_err(|e| RenameError::InvalidPattern {
        pattern: re.to_string(),
        reason: e.to_string(),
    })
}

pub fn parse() -> Args {
    Args::parse()
}
