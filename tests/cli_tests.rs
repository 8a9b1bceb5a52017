use batchmv::cli::Args;
use batchmv::config::types::{Config, LogLevel, SortKey, TimeStampKind};
use batchmv::{Filter, RenameError, RenameMode};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn effective_log_level_precedence() {
    let args = Args::parse_from(["batchmv", "-p", "{n}", "--debug", "--log-level", "quiet"]);
    assert_eq!(args.effective_log_level(), Some(LogLevel::Debug)); // --debug wins

    let args = Args::parse_from(["batchmv", "-p", "{n}", "--log-level", "info", "-q"]);
    assert_eq!(args.effective_log_level(), Some(LogLevel::Info));

    let args = Args::parse_from(["batchmv", "-p", "{n}", "-v"]);
    assert_eq!(args.effective_log_level(), Some(LogLevel::Info));

    let args = Args::parse_from(["batchmv", "-p", "{n}"]);
    assert_eq!(args.effective_log_level(), None);
}

#[test]
fn apply_overrides_sets_flags() {
    let args = Args::parse_from([
        "batchmv", "-p", "{n}", "-i", "/photos", "-k", "16", "-n", "5", "-T", "_", "-t", "atime", "-s", "size",
        "-r", "-O", "-X", "-F", "-d",
    ]);
    let mut cfg = Config::default();
    args.apply_overrides(&mut cfg);
    assert_eq!(cfg.source_dir, PathBuf::from("/photos"));
    assert_eq!(cfg.radix, 16);
    assert_eq!(cfg.start_number, 5);
    assert_eq!(cfg.time_separator, "_");
    assert_eq!(cfg.time_stamp, TimeStampKind::Atime);
    assert_eq!(cfg.sort, Some(SortKey::Size));
    assert!(cfg.reverse_sort && cfg.overlap && cfg.exclude_dir && cfg.include_self && cfg.dry_run);
}

#[test]
fn unset_flags_keep_config_values() {
    let args = Args::parse_from(["batchmv", "-p", "{n}"]);
    let mut cfg = Config {
        overlap: true,
        radix: 8,
        sort: Some(SortKey::Mtime),
        ..Config::default()
    };
    args.apply_overrides(&mut cfg);
    assert!(cfg.overlap);
    assert_eq!(cfg.radix, 8);
    assert_eq!(cfg.sort, Some(SortKey::Mtime));
}

#[test]
fn time_separator_may_be_a_dash() {
    let args = Args::parse_from(["batchmv", "-p", "{d}", "-T", "-"]);
    assert_eq!(args.time_separator.as_deref(), Some("-"));
}

#[test]
fn rename_methods_are_exclusive() {
    assert!(Args::try_parse_from(["batchmv", "-p", "{n}", "-l", "a"]).is_err());
    assert!(Args::try_parse_from(["batchmv", "-e", "x", "y", "-f", "a", "b"]).is_err());
}

#[test]
fn pairs_conflict_with_selection() {
    assert!(Args::try_parse_from(["batchmv", "-f", "a", "b", "-R", "a"]).is_err());
    assert!(Args::try_parse_from(["batchmv", "-f", "a", "b", "-L", "a"]).is_err());
    assert!(Args::try_parse_from(["batchmv", "-p", "{n}", "-R", "x", "-L", "a"]).is_err());
}

#[test]
fn radix_range_is_checked_by_clap() {
    assert!(Args::try_parse_from(["batchmv", "-p", "{n}", "-k", "37"]).is_err());
    assert!(Args::try_parse_from(["batchmv", "-p", "{n}", "-k", "1"]).is_err());
    assert!(Args::try_parse_from(["batchmv", "-p", "{n}", "-k", "36"]).is_ok());
}

#[test]
fn rename_mode_variants() {
    let args = Args::parse_from(["batchmv", "-e", r"(\d+)", "n{1}"]);
    assert!(matches!(args.rename_mode().unwrap(), RenameMode::Each { .. }));

    let args = Args::parse_from(["batchmv", "-l", "x", "y", "z"]);
    match args.rename_mode().unwrap() {
        RenameMode::List(dests) => assert_eq!(dests.len(), 3),
        other => panic!("unexpected mode {other:?}"),
    }

    let args = Args::parse_from(["batchmv", "-f", "a", "b", "c", "d"]);
    match args.rename_mode().unwrap() {
        RenameMode::Pairs(pairs) => {
            let srcs: Vec<_> = pairs.iter().map(|(s, _)| s.as_str()).collect();
            assert_eq!(srcs, ["a", "c"]);
        }
        other => panic!("unexpected mode {other:?}"),
    }
}

#[test]
fn odd_pair_count_is_a_mismatch() {
    let args = Args::parse_from(["batchmv", "-f", "a", "b", "c"]);
    let err = args.rename_mode().unwrap_err();
    assert!(matches!(err.downcast_ref::<RenameError>(), Some(RenameError::Mismatch(_))));
}

#[test]
fn missing_method_is_reported() {
    let args = Args::parse_from(["batchmv", "-d"]);
    assert!(args.rename_mode().unwrap_err().to_string().contains("rename method"));
}

#[test]
fn bad_patterns_and_regexes_are_invalid_pattern() {
    let args = Args::parse_from(["batchmv", "-p", "{nope}"]);
    let err = args.rename_mode().unwrap_err();
    assert!(matches!(err.downcast_ref::<RenameError>(), Some(RenameError::InvalidPattern { .. })));

    let args = Args::parse_from(["batchmv", "-e", "(", "x"]);
    let err = args.rename_mode().unwrap_err();
    assert!(matches!(err.downcast_ref::<RenameError>(), Some(RenameError::InvalidPattern { .. })));
}

#[test]
fn list_destinations_are_plain_unless_requested() {
    let args = Args::parse_from(["batchmv", "-l", "{n}"]);
    match args.rename_mode().unwrap() {
        RenameMode::List(d) => assert!(matches!(d[0], batchmv::Dest::Plain(_))),
        other => panic!("unexpected mode {other:?}"),
    }
    let args = Args::parse_from(["batchmv", "-N", "-l", "{n}"]);
    match args.rename_mode().unwrap() {
        RenameMode::List(d) => assert!(matches!(d[0], batchmv::Dest::Pattern(_))),
        other => panic!("unexpected mode {other:?}"),
    }
}

#[test]
fn selector_follows_flags_and_config() {
    let args = Args::parse_from(["batchmv", "-p", "{n}", "-L", "b", "a", "-X"]);
    let mut cfg = Config::default();
    args.apply_overrides(&mut cfg);
    let sel = args.selector(&cfg).unwrap();
    assert!(matches!(&sel.filter, Filter::Names(n) if n == &["b", "a"]));
    assert!(sel.exclude_dir);
    assert_eq!(sel.sort, None);

    let args = Args::parse_from(["batchmv", "-p", "{n}", "-R", "IMG_(\\d+)"]);
    assert!(matches!(args.selector(&cfg).unwrap().filter, Filter::Regex(_)));
}
