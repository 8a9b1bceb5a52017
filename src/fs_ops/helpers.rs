//! I/O helper utilities.
//!
//! Small adapters that enrich io::Error with the failing operation, the path and
//! a platform-aware hint, usable with map_err in both io::Result and
//! anyhow::Result code paths.
//!
//! Usage:
//!   // in functions returning anyhow::Result<_>
//!   fs::read_dir(dir).map_err(io_error_with_help("read directory", dir))?;
//!
//!   // in functions returning io::Result<_>
//!   fs::rename(a, b).map_err(io_error_with_help_io("rename", a))?;

use anyhow::anyhow;
use std::io;
use std::path::Path;

/// Format a human-friendly message with op/path plus platform-aware hints.
fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);

    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            match code {
                libc::EACCES | libc::EPERM => {
                    msg.push_str("; permission denied, check ownership and write permission on the directory.");
                }
                libc::EXDEV => {
                    msg.push_str("; cross-filesystem, names can only be changed within one directory.");
                }
                libc::EBUSY => {
                    msg.push_str("; resource busy, another process is using the entry.");
                }
                libc::ENOENT => {
                    msg.push_str("; path not found, it may have been moved by another process.");
                }
                libc::EEXIST | libc::ENOTEMPTY => {
                    msg.push_str("; already exists, the destination name is taken.");
                }
                libc::EROFS => {
                    msg.push_str("; read-only filesystem, names cannot be changed here.");
                }
                libc::ELOOP => {
                    msg.push_str("; too many symbolic link levels (ELOOP), possible symlink cycle.");
                }
                libc::ENAMETOOLONG => {
                    msg.push_str("; file name too long, shorten the pattern output.");
                }
                libc::EINVAL => {
                    msg.push_str("; invalid argument, a directory cannot be moved into itself.");
                }
                _ => {}
            }
        }
        #[cfg(windows)]
        {
            match code {
                5 => msg.push_str("; access denied, check permissions."),
                32 => msg.push_str("; sharing violation, the file is in use."),
                2 | 3 => msg.push_str("; path not found, verify it exists."),
                80 | 183 => msg.push_str("; already exists, the destination name is taken."),
                19 => msg.push_str("; write protected or read-only media."),
                206 => msg.push_str("; file name or path too long."),
                _ => {}
            }
        }
        msg.push_str(&format!(" [os code: {}]", code));
    } else {
        match e.kind() {
            io::ErrorKind::PermissionDenied => {
                msg.push_str("; permission denied, check ownership and write permission on the directory.");
            }
            io::ErrorKind::NotFound => {
                msg.push_str("; path not found, it may have been moved by another process.");
            }
            io::ErrorKind::AlreadyExists => {
                msg.push_str("; already exists, the destination name is taken.");
            }
            _ => {}
        }
    }

    msg
}

/// Adapter for anyhow::Result code.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(build_message(op, path, &e))
}

/// Adapter for io::Result code. The original ErrorKind is preserved.
pub fn io_error_with_help_io<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> io::Error + 'a {
    move |e: io::Error| io::Error::new(e.kind(), build_message(op, path, &e))
}
