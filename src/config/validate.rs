//! Config validation logic.
//! Verifies the counter radix and that the source directory exists, is a
//! directory and is readable, then canonicalizes it.

use anyhow::{Context, Result, bail};
use std::fs;
use tracing::{debug, error};

use super::types::Config;
use crate::naming::counters::{MAX_RADIX, MIN_RADIX};

impl Config {
    /// Validate settings without touching `self`.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_RADIX..=MAX_RADIX).contains(&self.radix) {
            bail!("radix must be between {MIN_RADIX} and {MAX_RADIX}, got {}", self.radix);
        }

        let dir = &self.source_dir;
        let meta = fs::metadata(dir).map_err(|e| {
            error!("source directory does not exist: {}", dir.display());
            anyhow::anyhow!("source directory '{}' is not accessible: {e}", dir.display())
        })?;
        if !meta.is_dir() {
            error!("source directory is not a directory: {}", dir.display());
            bail!("source directory '{}' is not a directory", dir.display());
        }
        fs::read_dir(dir).with_context(|| {
            format!("Cannot read source directory '{}'; check permissions", dir.display())
        })?;
        Ok(())
    }
}

/// Validate `cfg`, then replace `source_dir` with its canonical form.
pub fn validate_and_normalize(cfg: &mut Config) -> Result<()> {
    cfg.validate()?;
    cfg.source_dir = dunce::canonicalize(&cfg.source_dir)
        .with_context(|| format!("canonicalize '{}'", cfg.source_dir.display()))?;
    debug!(source_dir = %cfg.source_dir.display(), radix = cfg.radix, "config validated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radix_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::new(dir.path());
        cfg.radix = 37;
        assert!(cfg.validate().unwrap_err().to_string().contains("radix"));
        cfg.radix = 1;
        assert!(cfg.validate().is_err());
        cfg.radix = 36;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn source_must_be_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        fs::write(&file, b"x").unwrap();
        assert!(Config::new(&file).validate().is_err());
        assert!(Config::new(dir.path().join("missing")).validate().is_err());
    }

    #[test]
    fn normalize_makes_source_absolute() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::new(dir.path().join("."));
        validate_and_normalize(&mut cfg).unwrap();
        assert!(cfg.source_dir.is_absolute());
        assert_eq!(cfg.source_dir, dunce::canonicalize(dir.path()).unwrap());
    }
}
