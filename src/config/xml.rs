//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Creates a commented template on first run, but only at the default location.
//!
//! Notes:
//! - This module only reads/writes the config file; directory validation happens elsewhere.
//! - Unknown XML fields are an error so misspelled settings surface early.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
use super::types::{Config, LogLevel, SortKey};
use super::{CONFIG_ENV, DEFAULT_RADIX, DEFAULT_TIME_SEPARATOR};
use crate::platform::{set_dir_mode_0700, set_file_mode_0600, write_config_secure_new_0600};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    log_level: Option<String>,
    log_file: Option<String>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    overlap: Option<bool>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    exclude_dir: Option<bool>,
    #[serde(default, deserialize_with = "de_u32_trimmed_opt")]
    radix: Option<u32>,
    time_separator: Option<String>,
    sort: Option<String>,
}

fn de_u32_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<u32>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid radix '{s}'"))),
    }
}

fn de_bool_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(|s| s.trim().to_ascii_lowercase()) {
        None => Ok(None),
        Some(s) => match s.as_str() {
            "" => Ok(None),
            "true" | "yes" | "1" => Ok(Some(true)),
            "false" | "no" | "0" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!("invalid boolean '{other}'"))),
        },
    }
}

/// Outcome of looking for the config file.
#[derive(Debug)]
pub enum LoadResult {
    /// The file existed and parsed.
    Loaded(Config, PathBuf),
    /// No file at the default location; a template was written there.
    CreatedTemplate(Config, PathBuf),
    /// No file and none created (the template could not be written).
    Defaults(Config),
}

impl LoadResult {
    pub fn into_config(self) -> Config {
        match self {
            LoadResult::Loaded(cfg, _) | LoadResult::CreatedTemplate(cfg, _) | LoadResult::Defaults(cfg) => cfg,
        }
    }
}

// Map XmlConfig -> Config
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(s) = parsed.log_level.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        cfg.log_level = s.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
    }
    if let Some(s) = parsed.log_file.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        cfg.log_file = Some(PathBuf::from(s));
    }
    if let Some(s) = parsed.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        cfg.sort = Some(s.parse::<SortKey>().map_err(anyhow::Error::msg)?);
    }
    cfg.overlap = parsed.overlap.unwrap_or(false);
    cfg.exclude_dir = parsed.exclude_dir.unwrap_or(false);
    cfg.radix = parsed.radix.unwrap_or(DEFAULT_RADIX);
    // Separators are taken verbatim; a single space is a legitimate value.
    if let Some(sep) = parsed.time_separator {
        cfg.time_separator = sep;
    }
    Ok(cfg)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    let cfg = xml_to_config(parsed).with_context(|| format!("invalid value in '{}'", path.display()))?;
    debug!(path = %path.display(), "config loaded");
    Ok(cfg)
}

/// Load the config file, creating a template at the default location when missing.
/// A missing file named by `BATCHMV_CONFIG` is an error.
pub fn load_or_init() -> Result<LoadResult> {
    let explicit = env::var_os(CONFIG_ENV).is_some_and(|p| !p.is_empty());
    let path = default_config_path()?;

    if path.exists() {
        let cfg = load_config_from_xml_path(&path)?;
        return Ok(LoadResult::Loaded(cfg, path));
    }
    if explicit {
        bail!("config file named by {CONFIG_ENV} does not exist: {}", path.display());
    }
    match create_template_config(&path) {
        Ok(()) => Ok(LoadResult::CreatedTemplate(Config::default(), path)),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "template config not created");
            Ok(LoadResult::Defaults(Config::default()))
        }
    }
}

/// Create the commented template config file and its parent directory.
/// Refuses when an ancestor is a symlink.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!("Refusing to create config: ancestor of {} is a symlink", path.display());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config dir '{}'", parent.display()))?;
        let _ = set_dir_mode_0700(parent);
    }

    let suggested_log = default_log_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "/path/to/batchmv.log".into());

    let content = format!(
        "<!--\n  batchmv configuration (XML)\n\n  log_level       -> quiet | normal | info | debug\n  log_file        -> path to a log file (leave empty to log to stderr only)\n  overlap         -> true/false: allow targets that are also selected names (chains and swaps)\n  exclude_dir     -> true/false: skip directories when listing the source directory\n  radix           -> counter base for {{n}} fields, 2..36\n  time_separator  -> text placed between date and time components\n  sort            -> name | atime | mtime | ctime | size (leave empty for name order)\n\n  Suggested log file: {}\n\n  CLI flags override these values.\n-->\n<config>\n  <log_level>normal</log_level>\n  <log_file></log_file>\n  <overlap>false</overlap>\n  <exclude_dir>false</exclude_dir>\n  <radix>{}</radix>\n  <time_separator>{}</time_separator>\n  <sort></sort>\n</config>\n",
        suggested_log, DEFAULT_RADIX, DEFAULT_TIME_SEPARATOR
    );

    write_config_secure_new_0600(path, content.as_bytes())?;
    let _ = set_file_mode_0600(path);

    info!("Created template config at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Result<Config> {
        let parsed: XmlConfig = from_xml_str(xml)?;
        xml_to_config(parsed)
    }

    #[test]
    fn reads_all_fields() {
        let cfg = parse(
            "<config><log_level>debug</log_level><log_file> /tmp/b.log </log_file>\
             <overlap> true </overlap><exclude_dir>false</exclude_dir><radix> 16 </radix>\
             <time_separator>_</time_separator><sort>size</sort></config>",
        )
        .unwrap();
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(cfg.log_file.as_deref(), Some(Path::new("/tmp/b.log")));
        assert!(cfg.overlap);
        assert!(!cfg.exclude_dir);
        assert_eq!(cfg.radix, 16);
        assert_eq!(cfg.time_separator, "_");
        assert_eq!(cfg.sort, Some(SortKey::Size));
    }

    #[test]
    fn empty_config_gives_defaults() {
        let cfg = parse("<config></config>").unwrap();
        assert_eq!(cfg.radix, DEFAULT_RADIX);
        assert_eq!(cfg.time_separator, DEFAULT_TIME_SEPARATOR);
        assert_eq!(cfg.sort, None);
        assert!(cfg.log_file.is_none());
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert!(parse("<config><download_base>/x</download_base></config>").is_err());
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(parse("<config><sort>birth</sort></config>").is_err());
        assert!(parse("<config><radix>ten</radix></config>").is_err());
        assert!(parse("<config><log_level>loud</log_level></config>").is_err());
    }

    #[test]
    fn template_parses_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batchmv").join("config.xml");
        create_template_config(&path).unwrap();
        let cfg = load_config_from_xml_path(&path).unwrap();
        assert_eq!(cfg.log_level, LogLevel::Normal);
        assert_eq!(cfg.radix, DEFAULT_RADIX);
        assert!(create_template_config(&path).is_err(), "existing config must not be replaced");
    }
}
