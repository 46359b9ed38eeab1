use std::path::Path;
use std::process::Command;

use logit::git::{BranchLookup, CliOps};
use logit::resolve::extract_task_key;

fn git(dir: &Path, args: &[&str]) {
    Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
}

fn create_temp_repo() -> (tempfile::TempDir, CliOps) {
    let dir = tempfile::tempdir().unwrap();
    git(dir.path(), &["init"]);
    git(dir.path(), &["config", "user.email", "test@test.com"]);
    git(dir.path(), &["config", "user.name", "Test"]);
    let ops = CliOps::new(dir.path().to_path_buf());
    (dir, ops)
}

fn add_and_commit(dir: &Path, filename: &str, content: &str, message: &str) {
    std::fs::write(dir.join(filename), content).unwrap();
    git(dir, &["add", filename]);
    git(dir, &["commit", "-m", message]);
}

#[test]
fn current_branch_reads_checked_out_branch() {
    let (dir, ops) = create_temp_repo();
    add_and_commit(dir.path(), "hello.txt", "hello\n", "Init");
    git(dir.path(), &["checkout", "-b", "feature/PROJ-42-login"]);

    let branch = ops.current_branch().unwrap();
    assert_eq!(branch, "feature/PROJ-42-login");
    assert_eq!(extract_task_key(&branch).unwrap().as_str(), "PROJ-42");
}

#[test]
fn current_branch_fails_outside_repository() {
    let dir = tempfile::tempdir().unwrap();
    let ops = CliOps::new(dir.path().to_path_buf());
    let err = ops.current_branch().unwrap_err();
    assert!(err.to_string().contains("git rev-parse --abbrev-ref HEAD"));
}
