use std::fs;
use std::path::{Path, PathBuf};

use assert_fs::prelude::*;
use batchmv::engine::{Executor, PlanOptions, RandomTempNames, RunState, execute, plan, undo};
use batchmv::{ExistingFile, ProposedName, RenameError, RenamePair};

fn pair(dir: &Path, from: &str, to: &str) -> RenamePair {
    RenamePair::new(
        ExistingFile::in_dir(dir, from).unwrap(),
        ProposedName::in_dir(dir, to).unwrap(),
    )
    .unwrap()
}

fn contents(dir: &Path, names: &[&str]) -> Vec<String> {
    names.iter().map(|n| fs::read_to_string(dir.join(n)).unwrap()).collect()
}

const OVERLAP: PlanOptions = PlanOptions { overlap: true };

#[test]
fn rotation_with_chain_runs_without_losing_data() {
    let dir = assert_fs::TempDir::new().unwrap();
    for (n, c) in [("a", "A"), ("b", "B"), ("c", "C"), ("x", "X")] {
        dir.child(n).write_str(c).unwrap();
    }
    let pairs = vec![
        pair(dir.path(), "a", "b"),
        pair(dir.path(), "b", "c"),
        pair(dir.path(), "c", "a"),
        pair(dir.path(), "x", "y"),
    ];
    let p = plan(pairs, &OVERLAP, &mut RandomTempNames).unwrap();
    assert_eq!(p.components.len(), 2);

    let mut exec = Executor::new();
    exec.run(&p.schedule).unwrap();
    assert_eq!(exec.state(), RunState::Completed);
    assert_eq!(contents(dir.path(), &["a", "b", "c", "y"]), ["C", "A", "B", "X"]);
    assert!(!dir.path().join("x").exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 4, "no temporary left behind");
}

#[test]
fn noops_are_ignored_and_not_scheduled() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("same").touch().unwrap();
    dir.child("old").touch().unwrap();
    let p = plan(
        vec![pair(dir.path(), "same", "same"), pair(dir.path(), "old", "new")],
        &PlanOptions::default(),
        &mut RandomTempNames,
    )
    .unwrap();
    assert_eq!(p.ignored.len(), 1);
    assert_eq!(p.included.len(), 1);
    assert_eq!(p.schedule.len(), 1);
    assert!(!p.is_noop());
}

#[test]
fn duplicate_targets_are_rejected() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("a").touch().unwrap();
    dir.child("b").touch().unwrap();
    let err = plan(
        vec![pair(dir.path(), "a", "z"), pair(dir.path(), "b", "z")],
        &OVERLAP,
        &mut RandomTempNames,
    )
    .unwrap_err();
    assert!(matches!(err, RenameError::NonUniqueTarget(_)));
}

#[test]
fn exhausted_temp_factory_fails_before_any_rename() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("a").write_str("A").unwrap();
    dir.child("b").write_str("B").unwrap();
    dir.child("busy").touch().unwrap();
    let mut always_busy = |d: &Path| -> PathBuf { d.join("busy") };
    let err = plan(
        vec![pair(dir.path(), "a", "b"), pair(dir.path(), "b", "a")],
        &OVERLAP,
        &mut always_busy,
    )
    .unwrap_err();
    assert!(matches!(err, RenameError::TempNameExhausted(_)));
    assert_eq!(contents(dir.path(), &["a", "b"]), ["A", "B"]);
}

#[test]
fn failed_step_rolls_back_to_original_names() {
    let dir = assert_fs::TempDir::new().unwrap();
    for (n, c) in [("a", "A"), ("b", "B"), ("c", "C")] {
        dir.child(n).write_str(c).unwrap();
    }
    // Chain c -> d, b -> c, a -> b; the last step fails once `a` vanishes.
    let pairs = vec![
        pair(dir.path(), "a", "b"),
        pair(dir.path(), "b", "c"),
        pair(dir.path(), "c", "d"),
    ];
    let p = plan(pairs, &OVERLAP, &mut RandomTempNames).unwrap();
    fs::rename(dir.path().join("a"), dir.path().join("a.moved")).unwrap();

    let mut exec = Executor::new();
    let err = exec.run(&p.schedule).unwrap_err();
    match &err {
        RenameError::StepFailed { completed, .. } => assert_eq!(completed.len(), 2),
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(exec.state(), RunState::Failed);

    exec.rollback().unwrap();
    assert_eq!(exec.state(), RunState::RolledBack);
    assert_eq!(contents(dir.path(), &["b", "c"]), ["B", "C"]);
    assert!(!dir.path().join("d").exists());
}

#[test]
fn undo_of_a_full_log_restores_every_name() {
    let dir = assert_fs::TempDir::new().unwrap();
    let originals = [("a", "A"), ("b", "B"), ("c", "C"), ("x", "X"), ("p", "P")];
    for (n, c) in originals {
        dir.child(n).write_str(c).unwrap();
    }
    // Rotation a -> b -> c -> a plus chains x -> y and p -> x.
    let pairs = vec![
        pair(dir.path(), "a", "b"),
        pair(dir.path(), "b", "c"),
        pair(dir.path(), "c", "a"),
        pair(dir.path(), "x", "y"),
        pair(dir.path(), "p", "x"),
    ];
    let p = plan(pairs, &OVERLAP, &mut RandomTempNames).unwrap();

    let outcome = execute(&p.schedule);
    assert!(outcome.success, "error: {:?}", outcome.error);
    assert_eq!(outcome.log, p.schedule.steps());
    assert_eq!(contents(dir.path(), &["a", "b", "c", "x", "y"]), ["C", "A", "B", "P", "X"]);

    let undone = undo(&outcome.log).unwrap();
    assert_eq!(undone.len(), outcome.log.len());
    let names: Vec<&str> = originals.iter().map(|(n, _)| *n).collect();
    let bodies: Vec<&str> = originals.iter().map(|(_, c)| *c).collect();
    assert_eq!(contents(dir.path(), &names), bodies);
    assert!(!dir.path().join("y").exists());
    for temp in p.schedule.temps() {
        if !names.iter().any(|n| dir.path().join(n) == *temp) {
            assert!(!temp.exists(), "temporary {} left behind", temp.display());
        }
    }
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), originals.len());
}

#[cfg(unix)]
#[test]
fn hard_link_to_source_is_an_external_collision() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("a").write_str("A").unwrap();
    fs::hard_link(dir.path().join("a"), dir.path().join("b")).unwrap();

    let err = plan(
        vec![pair(dir.path(), "a", "b")],
        &PlanOptions::default(),
        &mut RandomTempNames,
    )
    .unwrap_err();
    assert!(matches!(err, RenameError::ExternalCollision(_)));
    assert_eq!(contents(dir.path(), &["a", "b"]), ["A", "A"]);
}
