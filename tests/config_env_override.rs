use serial_test::serial;
use std::fs;
use tempfile::tempdir;

use batchmv::config::{CONFIG_ENV, LoadResult, load_or_init};
use batchmv::{SortKey, default_config_path, default_log_path};

#[test]
#[serial]
fn log_colocates_with_env_override_config() {
    let td = tempdir().unwrap();
    let base = fs::canonicalize(td.path()).unwrap();
    let cfg = base.join("custom_config.xml");
    fs::write(&cfg, "<config><log_level>normal</log_level></config>").unwrap();

    // Set env for this process; serialize to avoid cross-test interference
    unsafe {
        std::env::set_var(CONFIG_ENV, &cfg);
    }

    let resolved_cfg = default_config_path().expect("default_config_path");
    assert_eq!(resolved_cfg, cfg, "config path should equal BATCHMV_CONFIG value");

    let resolved_log = default_log_path().expect("default_log_path");
    assert_eq!(resolved_log.parent(), cfg.parent(), "log path parent should match config parent");

    unsafe {
        std::env::remove_var(CONFIG_ENV);
    }
}

#[test]
#[serial]
fn env_config_is_loaded() {
    let td = tempdir().unwrap();
    let cfg = td.path().join("config.xml");
    fs::write(
        &cfg,
        "<config><overlap>true</overlap><radix>16</radix><sort>mtime</sort></config>",
    )
    .unwrap();
    unsafe {
        std::env::set_var(CONFIG_ENV, &cfg);
    }

    let result = load_or_init();
    unsafe {
        std::env::remove_var(CONFIG_ENV);
    }

    match result.unwrap() {
        LoadResult::Loaded(c, path) => {
            assert_eq!(path, cfg);
            assert!(c.overlap);
            assert_eq!(c.radix, 16);
            assert_eq!(c.sort, Some(SortKey::Mtime));
        }
        other => panic!("expected Loaded, got {other:?}"),
    }
}

#[test]
#[serial]
fn missing_env_config_is_an_error_and_not_created() {
    let td = tempdir().unwrap();
    let cfg = td.path().join("nope.xml");
    unsafe {
        std::env::set_var(CONFIG_ENV, &cfg);
    }

    let result = load_or_init();
    unsafe {
        std::env::remove_var(CONFIG_ENV);
    }

    assert!(result.is_err());
    assert!(!cfg.exists(), "no template may be written to an explicit path");
}
