//! Portable name validation.
//! Names accepted here are safe on Windows, macOS and Linux alike; the checks
//! are pure string inspections with no filesystem access.

use crate::errors::RenameError;

const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*', '\0'];

const RESERVED_DEVICES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Reject names that are unsafe on any supported platform.
pub fn validate_name(name: &str) -> Result<(), RenameError> {
    let invalid = |reason| {
        Err(RenameError::InvalidName {
            name: name.to_string(),
            reason,
        })
    };

    if name.is_empty() {
        return invalid("name is empty");
    }
    if name == "." || name == ".." {
        return invalid("name refers to a directory entry");
    }
    if name.contains(RESERVED_CHARS) {
        return invalid("name contains a reserved character (<>:\"/\\|?*)");
    }
    if name.ends_with('.') {
        return invalid("name ends with '.'");
    }
    // Windows reserves the device name with any extension too ("con.txt").
    let device = name.split('.').next().unwrap_or(name).trim_end();
    if RESERVED_DEVICES.iter().any(|d| d.eq_ignore_ascii_case(device)) {
        return invalid("name is a reserved device name");
    }
    Ok(())
}

/// Destinations must name an entry in the working directory, never a nested path.
pub fn ensure_top_level(raw: &str) -> Result<(), RenameError> {
    if raw.contains(['/', '\\']) {
        return Err(RenameError::NotTopLevel(raw.to_string()));
    }
    Ok(())
}
