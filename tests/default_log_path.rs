use batchmv::{default_config_path, default_log_path};

#[test]
fn default_log_path_is_in_same_dir_as_config() {
    let cfg_path = default_config_path().expect("default_config_path");
    let log_path = default_log_path().expect("default_log_path");

    assert_eq!(cfg_path.parent(), log_path.parent(), "expected log path to be in same dir as config");
    assert_eq!(log_path.file_name().unwrap(), "batchmv.log");
}
