//! Rename primitive used by the executor.
//! - Refuses to replace an existing destination (no silent clobbering).
//! - A destination that differs from the source only in letter case and is
//!   the same single-link entry is allowed; that is how case-only renames look
//!   on case-insensitive filesystems. Other hard links to the source are
//!   ordinary collisions.
//! - On Unix, best-effort fsync of the directory after the rename.

use std::fs;
use std::io;
use std::path::Path;
use tracing::trace;

use super::helpers::io_error_with_help_io;

/// True if anything (including a dangling symlink) occupies `path`.
pub fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// True if both paths name the same filesystem entry.
#[cfg(unix)]
pub fn same_entry(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(ma), Ok(mb)) => ma.dev() == mb.dev() && ma.ino() == mb.ino(),
        _ => false,
    }
}

/// True if both paths name the same filesystem entry.
#[cfg(not(unix))]
pub fn same_entry(a: &Path, b: &Path) -> bool {
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(ca), Ok(cb)) => {
            ca == cb || ca.to_string_lossy().to_lowercase() == cb.to_string_lossy().to_lowercase()
        }
        _ => false,
    }
}

/// True if `dst` is `src` spelled with different letter case on a
/// case-insensitive filesystem. Hard links under another name never qualify:
/// renaming onto one is a successful no-op that leaves the source in place.
pub fn is_case_only_rename(src: &Path, dst: &Path) -> bool {
    let (Some(s), Some(d)) = (src.file_name(), dst.file_name()) else {
        return false;
    };
    let (s, d) = (s.to_string_lossy(), d.to_string_lossy());
    s != d && s.to_lowercase() == d.to_lowercase() && same_entry(src, dst) && single_link(src)
}

#[cfg(unix)]
fn single_link(path: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    fs::symlink_metadata(path).is_ok_and(|m| m.nlink() == 1)
}

#[cfg(not(unix))]
fn single_link(_path: &Path) -> bool {
    true
}

/// Rename `src` to `dst`, failing with `AlreadyExists` if `dst` is taken.
pub fn rename_no_clobber(src: &Path, dst: &Path) -> io::Result<()> {
    if entry_exists(dst) && !is_case_only_rename(src, dst) {
        return Err(io_error_with_help_io("rename onto existing", dst)(io::Error::from(
            io::ErrorKind::AlreadyExists,
        )));
    }

    fs::rename(src, dst).map_err(io_error_with_help_io("rename", src))?;
    trace!(src = %src.display(), dst = %dst.display(), "rename applied");

    #[cfg(unix)]
    if let Some(parent) = dst.parent() {
        // Ignore fsync errors to avoid turning a successful rename into a failure.
        let _ = fsync_dir(parent);
    }

    Ok(())
}

#[cfg(unix)]
fn fsync_dir(dir: &Path) -> io::Result<()> {
    let f = fs::File::open(dir)?;
    f.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn renames_into_free_name() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("a").write_str("x").unwrap();
        rename_no_clobber(&dir.path().join("a"), &dir.path().join("b")).unwrap();
        dir.child("b").assert("x");
        assert!(!entry_exists(&dir.path().join("a")));
    }

    #[test]
    fn refuses_to_clobber() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("a").write_str("a").unwrap();
        dir.child("b").write_str("b").unwrap();
        let err = rename_no_clobber(&dir.path().join("a"), &dir.path().join("b")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        dir.child("a").assert("a");
        dir.child("b").assert("b");
    }

    #[test]
    fn missing_source_reports_not_found() {
        let dir = assert_fs::TempDir::new().unwrap();
        let err = rename_no_clobber(&dir.path().join("nope"), &dir.path().join("b")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn same_entry_distinguishes_files() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("a").touch().unwrap();
        dir.child("b").touch().unwrap();
        let a = dir.path().join("a");
        assert!(same_entry(&a, &a));
        assert!(!same_entry(&a, &dir.path().join("b")));
        assert!(!same_entry(&a, &dir.path().join("missing")));
    }

    #[cfg(unix)]
    #[test]
    fn hard_link_target_is_a_collision() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("a").write_str("A").unwrap();
        let (a, b) = (dir.path().join("a"), dir.path().join("b"));
        std::fs::hard_link(&a, &b).unwrap();
        assert!(same_entry(&a, &b));
        assert!(!is_case_only_rename(&a, &b));

        let err = rename_no_clobber(&a, &b).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert!(entry_exists(&a));
    }

    #[cfg(unix)]
    #[test]
    fn case_variant_hard_link_is_not_case_only() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("a.txt").write_str("A").unwrap();
        let (lower, upper) = (dir.path().join("a.txt"), dir.path().join("A.txt"));
        // Only meaningful where the names are distinct entries.
        if std::fs::hard_link(&lower, &upper).is_err() {
            return;
        }
        assert!(!is_case_only_rename(&lower, &upper));
        assert!(rename_no_clobber(&lower, &upper).is_err());
        assert!(entry_exists(&lower));
    }

    #[test]
    fn distinct_names_are_not_case_only() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("a").touch().unwrap();
        dir.child("b").touch().unwrap();
        assert!(!is_case_only_rename(&dir.path().join("a"), &dir.path().join("b")));
        assert!(!is_case_only_rename(&dir.path().join("a"), &dir.path().join("a")));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_counts_as_existing() {
        let dir = assert_fs::TempDir::new().unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(dir.path().join("gone"), &link).unwrap();
        assert!(entry_exists(&link));
    }
}
