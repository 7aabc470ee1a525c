// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use tempfile::TempDir;

use super::{GitBackend, RepoHandle, VcsBackend};
use crate::error::{ConductorError, GitError};

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn git(args: &[&str], cwd: &Path) {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Initialize a repository with identity and one commit.
fn init_repo_with_commit(path: &Path) {
    std::fs::create_dir_all(path).expect("failed to create repo dir");
    git(&["init", "--quiet"], path);
    git(&["config", "user.email", "test@example.com"], path);
    git(&["config", "user.name", "Test"], path);
    std::fs::write(path.join("README.md"), "hello\n").expect("failed to write README");
    git(&["add", "README.md"], path);
    git(&["commit", "--quiet", "-m", "Initial commit"], path);
}

fn backend() -> Arc<dyn VcsBackend> {
    Arc::new(GitBackend::new().expect("git must be installed for tests"))
}

#[test]
fn test_open_rejects_plain_directory() {
    let temp = temp_dir();
    let err = RepoHandle::open(backend(), temp.path()).unwrap_err();
    assert!(
        matches!(&err, ConductorError::Git(e) if matches!(**e, GitError::NotCloned { .. })),
        "expected NotCloned, got {err:?}"
    );
}

#[test]
fn test_open_rejects_subdirectory_of_repo() {
    let temp = temp_dir();
    let repo = temp.path().join("repo");
    init_repo_with_commit(&repo);
    let nested = repo.join("src");
    std::fs::create_dir_all(&nested).expect("failed to create nested dir");

    assert!(backend().is_work_tree(&repo));
    assert!(!backend().is_work_tree(&nested));
}

#[test]
fn test_branch_then_checkout() {
    let temp = temp_dir();
    let repo = temp.path().join("repo");
    init_repo_with_commit(&repo);

    let handle = RepoHandle::open(backend(), &repo).unwrap();
    let original = handle.current_branch().unwrap();

    handle.create_branch("feature").unwrap();
    assert_eq!(handle.current_branch().unwrap(), original);

    handle.checkout("feature").unwrap();
    assert_eq!(handle.current_branch().unwrap(), "feature");

    assert!(handle.create_branch("feature").is_err());
    assert!(handle.checkout("does-not-exist").is_err());
}

#[test]
fn test_stage_only_changed_files_inside_work_tree() {
    let temp = temp_dir();
    let repo = temp.path().join("repo");
    init_repo_with_commit(&repo);
    let repo = dunce::canonicalize(&repo).unwrap();

    std::fs::write(repo.join("README.md"), "changed\n").unwrap();
    std::fs::write(repo.join("new.txt"), "new\n").unwrap();
    std::fs::write(repo.join("ignored.txt"), "x\n").unwrap();
    let outside = temp.path().join("outside.txt");

    let handle = RepoHandle::open(backend(), &repo).unwrap();
    let staged = handle
        .stage_files(&[repo.join("README.md"), repo.join("new.txt"), outside])
        .unwrap();
    assert_eq!(staged, vec!["README.md".to_string(), "new.txt".to_string()]);

    let status = handle.status().unwrap();
    assert_eq!(status.staged, vec!["README.md".to_string(), "new.txt".to_string()]);
    assert!(status.modified.is_empty());
    assert_eq!(status.untracked, vec!["ignored.txt".to_string()]);
}

#[test]
fn test_commit_skips_empty_index() {
    let temp = temp_dir();
    let repo = temp.path().join("repo");
    init_repo_with_commit(&repo);
    let handle = RepoHandle::open(backend(), &repo).unwrap();

    assert!(handle.commit("nothing").unwrap().is_empty());

    std::fs::write(repo.join("a.txt"), "a\n").unwrap();
    handle
        .stage_files(&[handle.workdir().join("a.txt")])
        .unwrap();
    let committed = handle.commit("add a").unwrap();
    assert_eq!(committed, vec!["a.txt".to_string()]);
    assert!(handle.status().unwrap().is_clean());
}

#[test]
fn test_clone_push_and_remote_url() {
    let temp = temp_dir();
    let seed = temp.path().join("seed");
    init_repo_with_commit(&seed);
    let bare = temp.path().join("remote.git");
    git(
        &[
            "clone",
            "--quiet",
            "--bare",
            seed.to_str().unwrap(),
            bare.to_str().unwrap(),
        ],
        temp.path(),
    );

    let dest = temp.path().join("mirror").join("nested").join("clone");
    let url = bare.to_str().unwrap();
    let handle = RepoHandle::clone_into(backend(), url, &dest).unwrap();
    assert_eq!(handle.remote_url().unwrap(), url);

    git(&["config", "user.email", "test@example.com"], &dest);
    git(&["config", "user.name", "Test"], &dest);
    handle.create_branch("topic").unwrap();
    handle.checkout("topic").unwrap();
    handle.push_current_branch().unwrap();

    let branches = Command::new("git")
        .args(["branch", "--list", "topic"])
        .current_dir(&bare)
        .output()
        .unwrap();
    assert!(String::from_utf8_lossy(&branches.stdout).contains("topic"));
}

#[test]
fn test_clone_failure_is_clone_failed() {
    let temp = temp_dir();
    let missing = temp.path().join("no-such-remote.git");
    let dest = temp.path().join("dest");
    let err = RepoHandle::clone_into(backend(), missing.to_str().unwrap(), &dest).unwrap_err();
    assert!(
        matches!(&err, ConductorError::Git(e) if matches!(**e, GitError::CloneFailed { .. })),
        "expected CloneFailed, got {err:?}"
    );
    assert!(!dest.exists());
}
