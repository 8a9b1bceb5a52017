//! Turn a selection and a rename method into rename pairs.

use chrono::{DateTime, Local};
use regex::Regex;
use std::path::Path;
use std::time::SystemTime;
use tracing::debug;

use super::counters::to_radix;
use super::pattern::{Fields, NamePattern};
use crate::config::types::TimeStampKind;
use crate::entry::{ExistingFile, ProposedName, RenamePair};
use crate::errors::RenameError;
use crate::fs_ops::Selected;

/// A destination given on the command line: literal, or a pattern with `--no-plain-text`.
#[derive(Debug, Clone)]
pub enum Dest {
    Plain(String),
    Pattern(NamePattern),
}

impl Dest {
    pub fn new(raw: &str, plain: bool) -> Result<Self, RenameError> {
        if plain {
            Ok(Dest::Plain(raw.to_string()))
        } else {
            NamePattern::parse(raw).map(Dest::Pattern)
        }
    }
}

/// The four ways of producing new names.
#[derive(Debug, Clone)]
pub enum RenameMode {
    /// Render one pattern per selected entry.
    Replace(NamePattern),
    /// Replace the first regex match inside each name with the rendered pattern.
    Each { regex: Regex, pattern: NamePattern },
    /// Destinations zipped with the selection.
    List(Vec<Dest>),
    /// Explicit (source, destination) names; the selection is not used.
    Pairs(Vec<(String, Dest)>),
}

impl RenameMode {
    /// True when sources come from the mode itself rather than a selection.
    pub fn selects_sources(&self) -> bool {
        matches!(self, RenameMode::Pairs(_))
    }
}

#[derive(Debug, Clone)]
pub struct NamingOptions {
    pub start_number: u64,
    pub radix: u32,
    pub time_stamp: TimeStampKind,
    pub time_separator: String,
}

impl Default for NamingOptions {
    fn default() -> Self {
        Self {
            start_number: 0,
            radix: 10,
            time_stamp: TimeStampKind::Mtime,
            time_separator: "-".into(),
        }
    }
}

/// Build the batch for `dir`. `selection` is ignored in pairs mode.
pub fn build_pairs(
    dir: &Path,
    selection: Vec<Selected>,
    mode: &RenameMode,
    opts: &NamingOptions,
) -> Result<Vec<RenamePair>, RenameError> {
    let entries: Vec<(Selected, Option<&Dest>)> = match mode {
        RenameMode::Pairs(list) => list
            .iter()
            .map(|(src, dest)| {
                Ok((
                    Selected {
                        file: ExistingFile::in_dir(dir, src)?,
                        captures: Vec::new(),
                    },
                    Some(dest),
                ))
            })
            .collect::<Result<_, RenameError>>()?,
        RenameMode::List(dests) => {
            if dests.len() != selection.len() {
                return Err(RenameError::Mismatch(format!(
                    "{} destination name(s) for {} selected entr{}",
                    dests.len(),
                    selection.len(),
                    if selection.len() == 1 { "y" } else { "ies" }
                )));
            }
            selection.into_iter().zip(dests.iter().map(Some)).collect()
        }
        RenameMode::Replace(_) | RenameMode::Each { .. } => selection.into_iter().map(|s| (s, None)).collect(),
    };

    let total = entries.len() as u64;
    let widest = to_radix(opts.start_number.saturating_add(total), opts.radix, false).len();
    let mut pairs = Vec::with_capacity(entries.len());

    for (index, (selected, dest)) in (opts.start_number..).zip(entries) {
        let file = &selected.file;
        let base = Fields {
            counter: index,
            radix: opts.radix,
            widest,
            alpha: index,
            timestamp: DateTime::<Local>::from(pick_time(file, opts.time_stamp)),
            time_separator: &opts.time_separator,
            stem: file.stem(),
            ext: file.extension(),
            captures: &selected.captures,
        };

        let new_name = match (mode, dest) {
            (RenameMode::Each { regex, pattern }, _) => match regex.captures(file.name()) {
                None => file.name().to_string(),
                Some(caps) => {
                    let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
                    let captures: Vec<String> = caps
                        .iter()
                        .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                        .collect();
                    let rendered = pattern.render(&Fields {
                        captures: &captures,
                        ..base.clone()
                    })?;
                    let name = file.name();
                    format!("{}{}{}", &name[..whole.start], rendered, &name[whole.end..])
                }
            },
            (RenameMode::Replace(pattern), _) | (_, Some(Dest::Pattern(pattern))) => pattern.render(&base)?,
            (_, Some(Dest::Plain(name))) => name.clone(),
            (_, None) => file.name().to_string(),
        };

        let target = ProposedName::in_dir(dir, &new_name)?;
        pairs.push(RenamePair::new(selected.file, target)?);
    }

    debug!(count = pairs.len(), "rename pairs generated");
    Ok(pairs)
}

fn pick_time(file: &ExistingFile, kind: TimeStampKind) -> SystemTime {
    match kind {
        TimeStampKind::Mtime => file.modified(),
        TimeStampKind::Atime => file.accessed(),
        TimeStampKind::Ctime => file.changed(),
    }
}
