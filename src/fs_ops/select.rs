//! Choosing which entries of the source directory take part in a batch.
//! - Listing is shallow (direct children only) and does not follow symlinks.
//! - A regex filter must match at the start of the name; its captures are kept
//!   for pattern rendering.
//! - An explicit name list keeps the caller's order unless a sort is requested.

use anyhow::Result;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

use super::helpers::io_error_with_help;
use crate::config::types::SortKey;
use crate::engine::validate::ensure_top_level;
use crate::entry::ExistingFile;
use crate::errors::RenameError;

/// How entries are picked.
#[derive(Debug, Clone, Default)]
pub enum Filter {
    /// Every direct child.
    #[default]
    All,
    /// Children whose name matches at position 0.
    Regex(Regex),
    /// Exactly these names, in this order.
    Names(Vec<String>),
}

#[derive(Debug, Clone, Default)]
pub struct Selector {
    pub filter: Filter,
    pub exclude_dir: bool,
    pub include_self: bool,
    /// `None` keeps listing order for explicit names and sorts by name otherwise.
    pub sort: Option<SortKey>,
    pub reverse: bool,
}

/// One selected entry with the regex captures that picked it (empty without a regex).
#[derive(Debug, Clone)]
pub struct Selected {
    pub file: ExistingFile,
    pub captures: Vec<String>,
}

/// Select entries of `dir` according to `selector`.
pub fn select(dir: &Path, selector: &Selector) -> Result<Vec<Selected>> {
    let mut selected = match &selector.filter {
        Filter::Names(names) => from_names(dir, names)?,
        Filter::All => list(dir, selector, None)?,
        Filter::Regex(re) => list(dir, selector, Some(re))?,
    };

    let sort = match (&selector.filter, selector.sort) {
        (_, Some(key)) => Some(key),
        (Filter::Names(_), None) => None,
        (_, None) => Some(SortKey::Name),
    };
    if let Some(key) = sort {
        sort_selection(&mut selected, key, selector.reverse);
    } else if selector.reverse {
        selected.reverse();
    }

    debug!(dir = %dir.display(), count = selected.len(), "selection complete");
    Ok(selected)
}

fn list(dir: &Path, selector: &Selector, re: Option<&Regex>) -> Result<Vec<Selected>> {
    let myself = if selector.include_self { None } else { current_exe() };
    let mut out = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            match e.into_io_error() {
                Some(io) => io_error_with_help("read directory", &path)(io),
                None => anyhow::anyhow!("read directory '{}': filesystem loop", path.display()),
            }
        })?;
        if selector.exclude_dir && entry.file_type().is_dir() {
            trace!(path = %entry.path().display(), "skipping directory");
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        let captures = match re {
            None => Vec::new(),
            Some(re) => match match_at_start(re, &name) {
                Some(caps) => caps,
                None => continue,
            },
        };
        if let Some(me) = &myself
            && dunce::canonicalize(entry.path()).is_ok_and(|p| &p == me)
        {
            trace!(path = %entry.path().display(), "skipping running executable");
            continue;
        }
        out.push(Selected {
            file: ExistingFile::open(entry.path())?,
            captures,
        });
    }
    Ok(out)
}

fn from_names(dir: &Path, names: &[String]) -> Result<Vec<Selected>, RenameError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(names.len());
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        ensure_top_level(name)?;
        if !seen.insert(name.as_str()) {
            return Err(RenameError::NonUniqueSource(dir.join(name)));
        }
        out.push(Selected {
            file: ExistingFile::in_dir(dir, name)?,
            captures: Vec::new(),
        });
    }
    Ok(out)
}

/// Captures of a match anchored at the start of `name`; group 0 first, unmatched groups empty.
pub fn match_at_start(re: &Regex, name: &str) -> Option<Vec<String>> {
    let caps = re.captures(name)?;
    if caps.get(0)?.start() != 0 {
        return None;
    }
    Some(
        caps.iter()
            .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
            .collect(),
    )
}

fn sort_selection(selected: &mut [Selected], key: SortKey, reverse: bool) {
    let cmp = |a: &Selected, b: &Selected| -> Ordering {
        let (a, b) = (&a.file, &b.file);
        match key {
            SortKey::Name => a.name().cmp(b.name()),
            SortKey::Atime => a.accessed().cmp(&b.accessed()),
            SortKey::Mtime => a.modified().cmp(&b.modified()),
            SortKey::Ctime => a.changed().cmp(&b.changed()),
            SortKey::Size => a.size().cmp(&b.size()),
        }
    };
    if reverse {
        selected.sort_by(|a, b| cmp(b, a));
    } else {
        selected.sort_by(cmp);
    }
}

fn current_exe() -> Option<PathBuf> {
    std::env::current_exe().ok().and_then(|p| dunce::canonicalize(p).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    fn names(sel: &[Selected]) -> Vec<String> {
        sel.iter().map(|s| s.file.name().to_string()).collect()
    }

    fn fixture() -> assert_fs::TempDir {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("b.txt").write_str("bb").unwrap();
        dir.child("a.txt").write_str("aaa").unwrap();
        dir.child("c.log").write_str("c").unwrap();
        dir.child("sub").create_dir_all().unwrap();
        dir
    }

    #[test]
    fn lists_direct_children_sorted_by_name() {
        let dir = fixture();
        dir.child("sub/nested.txt").touch().unwrap();
        let sel = select(dir.path(), &Selector::default()).unwrap();
        assert_eq!(names(&sel), ["a.txt", "b.txt", "c.log", "sub"]);
    }

    #[test]
    fn exclude_dir_and_reverse() {
        let dir = fixture();
        let selector = Selector {
            exclude_dir: true,
            reverse: true,
            ..Default::default()
        };
        assert_eq!(names(&select(dir.path(), &selector).unwrap()), ["c.log", "b.txt", "a.txt"]);
    }

    #[test]
    fn regex_is_anchored_at_start_and_keeps_captures() {
        let dir = fixture();
        dir.child("xa.txt").touch().unwrap();
        let selector = Selector {
            filter: Filter::Regex(Regex::new(r"(\w)\.txt").unwrap()),
            ..Default::default()
        };
        let sel = select(dir.path(), &selector).unwrap();
        assert_eq!(names(&sel), ["a.txt", "b.txt"]);
        assert_eq!(sel[0].captures, ["a.txt", "a"]);
    }

    #[test]
    fn sort_by_size() {
        let dir = fixture();
        let selector = Selector {
            exclude_dir: true,
            sort: Some(SortKey::Size),
            ..Default::default()
        };
        assert_eq!(names(&select(dir.path(), &selector).unwrap()), ["c.log", "b.txt", "a.txt"]);
    }

    #[test]
    fn explicit_names_keep_order_and_must_exist() {
        let dir = fixture();
        let list = |v: &[&str]| Selector {
            filter: Filter::Names(v.iter().map(|s| s.to_string()).collect()),
            ..Default::default()
        };
        let sel = select(dir.path(), &list(&["c.log", "a.txt"])).unwrap();
        assert_eq!(names(&sel), ["c.log", "a.txt"]);

        let err = select(dir.path(), &list(&["missing"])).unwrap_err();
        assert!(matches!(err.downcast_ref::<RenameError>(), Some(RenameError::SourceNotFound(_))));

        let err = select(dir.path(), &list(&["a.txt", "a.txt"])).unwrap_err();
        assert!(matches!(err.downcast_ref::<RenameError>(), Some(RenameError::NonUniqueSource(_))));

        let err = select(dir.path(), &list(&["sub/x"])).unwrap_err();
        assert!(matches!(err.downcast_ref::<RenameError>(), Some(RenameError::NotTopLevel(_))));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = assert_fs::TempDir::new().unwrap();
        let err = select(&dir.path().join("nope"), &Selector::default()).unwrap_err();
        assert!(err.to_string().contains("read directory"));
    }
}
