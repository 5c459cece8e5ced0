//! Checkpoint/resume behavior: a restart must reuse the discovered file
//! list and continue at the cursor instead of re-walking the tree.

use std::fs;
use std::path::{Path, PathBuf};
use stutter_batch::{process_file, Checkpoint, JobState, Mode, ScanConfig, Scanner};
use stutter_core::CollapseConfig;
use tempfile::TempDir;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn config(root: &Path) -> ScanConfig {
    let mut config = ScanConfig::new(root, Mode::Collapse);
    config.progress = false;
    config
}

fn stuttered_tree(root: &Path) -> (PathBuf, PathBuf) {
    let a = root.join("Infer/A.sfm");
    let b = root.join("Infer/B.sfm");
    write(&a, "go go go stop\n");
    write(&b, "ha ha ha ha done\n");
    (a, b)
}

fn checkpoint_with(root: &Path, files: Vec<PathBuf>, next_index: usize) -> Checkpoint {
    let mut state = JobState::new(root.to_path_buf(), "Infer".to_string(), ".sfm".to_string());
    state.directories = vec![root.join("Infer")];
    state.files = files;
    state.next_index = next_index;
    state.discovery_complete = true;
    let checkpoint = Checkpoint::for_root(root);
    checkpoint.save(&state).unwrap();
    checkpoint
}

#[test]
fn resume_skips_already_processed_files() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let (a, b) = stuttered_tree(root);

    // A crash happened after A was processed.
    let checkpoint = checkpoint_with(root, vec![a.clone(), b.clone()], 1);

    let summary = Scanner::new(config(root), checkpoint).run().unwrap();

    assert_eq!(summary.files_found, 2);
    assert_eq!(summary.files_processed, 1);
    assert!(!a.with_file_name("A_edit.sfm").exists());
    assert!(b.with_file_name("B_edit.sfm").exists());
}

#[test]
fn resume_does_not_rewalk_the_tree() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let (a, b) = stuttered_tree(root);

    let checkpoint = checkpoint_with(root, vec![a.clone(), b.clone()], 0);

    // A file added after discovery: a re-walk would pick it up, resuming
    // from the checkpoint must not.
    let late = root.join("Infer/LATE.sfm");
    write(&late, "no no no never\n");

    let summary = Scanner::new(config(root), checkpoint).run().unwrap();

    assert_eq!(summary.files_found, 2);
    assert!(!late.with_file_name("LATE_edit.sfm").exists());
    assert!(a.with_file_name("A_edit.sfm").exists());
    assert!(b.with_file_name("B_edit.sfm").exists());
}

#[test]
fn resumed_run_audit_log_covers_whole_batch() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let (a, b) = stuttered_tree(root);

    // State as a crashed run would have left it: A processed, its change
    // records persisted with the cursor.
    let a_outcome = process_file(&a, &CollapseConfig::default(), Mode::Collapse).unwrap();
    let mut state = JobState::new(root.to_path_buf(), "Infer".to_string(), ".sfm".to_string());
    state.directories = vec![root.join("Infer")];
    state.files = vec![a.clone(), b.clone()];
    state.next_index = 1;
    state.discovery_complete = true;
    state.files_changed = 1;
    state.changes = a_outcome.changes;
    let checkpoint = Checkpoint::for_root(root);
    checkpoint.save(&state).unwrap();

    let config = config(root);
    let summary = Scanner::new(config.clone(), checkpoint).run().unwrap();

    // Only B was processed in this invocation, but the log and the batch
    // counters cover both files.
    assert_eq!(summary.files_processed, 1);
    assert_eq!(summary.files_changed, 2);
    assert_eq!(summary.lines_flagged, 2);

    let log = fs::read_to_string(&config.log_path).unwrap();
    assert!(log.contains(&format!("{}:1", a.display())));
    assert!(log.contains(&format!("{}:1", b.display())));
}

#[test]
fn mismatched_checkpoint_triggers_rediscovery() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let (a, _) = stuttered_tree(root);

    // Checkpoint from a job over a different target directory name.
    let mut state = JobState::new(root.to_path_buf(), "Draft".to_string(), ".sfm".to_string());
    state.discovery_complete = true;
    let checkpoint = Checkpoint::for_root(root);
    checkpoint.save(&state).unwrap();

    let summary = Scanner::new(config(root), checkpoint).run().unwrap();

    // All files found fresh and processed.
    assert_eq!(summary.files_found, 2);
    assert_eq!(summary.files_processed, 2);
    assert!(a.with_file_name("A_edit.sfm").exists());
}

#[test]
fn fresh_flag_ignores_checkpoint() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let (a, b) = stuttered_tree(root);

    // Checkpoint claims everything is done.
    let checkpoint = checkpoint_with(root, vec![a.clone(), b.clone()], 2);

    let mut config = config(root);
    config.fresh = true;
    let summary = Scanner::new(config, checkpoint).run().unwrap();

    assert_eq!(summary.files_processed, 2);
    assert!(a.with_file_name("A_edit.sfm").exists());
}

#[test]
fn corrupt_checkpoint_falls_back_to_discovery() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let (a, _) = stuttered_tree(root);

    let checkpoint = Checkpoint::for_root(root);
    fs::write(checkpoint.path(), b"definitely not json").unwrap();

    let summary = Scanner::new(config(root), checkpoint).run().unwrap();

    assert_eq!(summary.files_found, 2);
    assert!(a.with_file_name("A_edit.sfm").exists());
}

#[test]
fn completed_run_clears_checkpoint() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    stuttered_tree(root);

    let checkpoint = Checkpoint::for_root(root);
    Scanner::new(config(root), checkpoint.clone()).run().unwrap();
    assert!(checkpoint.load().is_none());
    assert!(!checkpoint.path().exists());
}
