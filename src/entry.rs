//! Filesystem entries handed to the scheduling engine.
//!
//! - `ExistingFile`: an entry that exists before the operation (metadata snapshot).
//! - `ProposedName`: a target path that need not exist yet.
//! - `RenamePair`: the unit of work; target validated and confined to the source's directory.

use std::ffi::OsStr;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::engine::validate::{ensure_top_level, validate_name};
use crate::errors::RenameError;

/// Snapshot of an existing filesystem entry. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct ExistingFile {
    path: PathBuf,
    name: String,
    parent: PathBuf,
    stem: String,
    extension: String,
    modified: SystemTime,
    accessed: SystemTime,
    created: Option<SystemTime>,
    changed: SystemTime,
    size: u64,
    is_dir: bool,
}

impl ExistingFile {
    /// Snapshot `path`. Fails with `SourceNotFound` if nothing exists there.
    /// Symlinks are not followed, so a dangling link is still an entry.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RenameError> {
        let path = path.into();
        let meta = fs::symlink_metadata(&path).map_err(|_| RenameError::SourceNotFound(path.clone()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| RenameError::SourceNotFound(path.clone()))?;
        let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let (stem, extension) = split_extension(&name);

        Ok(Self {
            name,
            parent,
            stem,
            extension,
            modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            accessed: meta.accessed().unwrap_or(SystemTime::UNIX_EPOCH),
            // Not every platform/filesystem records birth time.
            created: meta.created().ok(),
            changed: changed_time(&meta),
            size: meta.len(),
            is_dir: meta.is_dir(),
            path,
        })
    }

    /// Snapshot `dir/name`, rejecting names that try to leave `dir`.
    pub fn in_dir(dir: &Path, name: &str) -> Result<Self, RenameError> {
        ensure_top_level(name)?;
        Self::open(dir.join(name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> &Path {
        &self.parent
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Extension including the leading dot, or empty.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    pub fn accessed(&self) -> SystemTime {
        self.accessed
    }

    pub fn created(&self) -> Option<SystemTime> {
        self.created
    }

    /// Status-change time on Unix; elsewhere creation time, falling back to modification.
    pub fn changed(&self) -> SystemTime {
        self.changed
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }
}

#[cfg(unix)]
fn changed_time(meta: &fs::Metadata) -> SystemTime {
    use std::os::unix::fs::MetadataExt;
    use std::time::Duration;
    match u64::try_from(meta.ctime()) {
        Ok(secs) => SystemTime::UNIX_EPOCH + Duration::new(secs, meta.ctime_nsec().clamp(0, 999_999_999) as u32),
        Err(_) => SystemTime::UNIX_EPOCH,
    }
}

#[cfg(not(unix))]
fn changed_time(meta: &fs::Metadata) -> SystemTime {
    meta.created()
        .or_else(|_| meta.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

/// Split "archive.tar.gz" into ("archive.tar", ".gz"). Leading dots belong to the stem.
fn split_extension(name: &str) -> (String, String) {
    let p = Path::new(name);
    match (p.file_stem().and_then(OsStr::to_str), p.extension().and_then(OsStr::to_str)) {
        (Some(stem), Some(ext)) => (stem.to_string(), format!(".{ext}")),
        _ => (name.to_string(), String::new()),
    }
}

/// A target path. Equality and hashing use the path only.
#[derive(Debug, Clone)]
pub struct ProposedName {
    path: PathBuf,
    name: String,
    parent: PathBuf,
}

impl ProposedName {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self { path, name, parent }
    }

    /// Build `dir/name` from a user-supplied destination, which must be top-level.
    pub fn in_dir(dir: &Path, name: &str) -> Result<Self, RenameError> {
        ensure_top_level(name)?;
        Ok(Self::new(dir.join(name)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> &Path {
        &self.parent
    }
}

impl PartialEq for ProposedName {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for ProposedName {}

impl Hash for ProposedName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

/// One requested rename. Source and target always share a parent directory.
#[derive(Debug, Clone)]
pub struct RenamePair {
    pub source: ExistingFile,
    pub target: ProposedName,
}

impl RenamePair {
    /// Admit a pair: the target name must validate and stay in the source's directory.
    pub fn new(source: ExistingFile, target: ProposedName) -> Result<Self, RenameError> {
        validate_name(target.name())?;
        if source.parent() != target.parent() {
            return Err(RenameError::DifferentParent {
                source_path: source.path().to_path_buf(),
                target_path: target.path().to_path_buf(),
            });
        }
        Ok(Self { source, target })
    }

    /// Source and target are the same path; nothing to do.
    pub fn is_noop(&self) -> bool {
        self.source.path() == self.target.path()
    }
}
