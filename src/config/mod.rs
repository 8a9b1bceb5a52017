//! Config module.
//! Provides configuration types, default paths, XML loading, and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel, SortKey, TimeStampKind};
pub use validate::validate_and_normalize;
pub use xml::{LoadResult, create_template_config, load_config_from_xml_path, load_or_init};

/// Environment variable naming an explicit config.xml.
pub const CONFIG_ENV: &str = "BATCHMV_CONFIG";

pub const DEFAULT_RADIX: u32 = 10;
pub const DEFAULT_TIME_SEPARATOR: &str = "-";
