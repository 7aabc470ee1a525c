// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use tempfile::TempDir;

use super::snapshot::{self, MAGIC};
use super::{LOCK_FILE_NAME, STATE_FILE_NAME, StateLock, TreeState, discover};
use crate::config::types::CloneProtocol;
use crate::error::{ConductorError, StateError};
use crate::git::{GitBackend, VcsBackend};
use crate::remote::MemoryRemote;
use crate::tree::{Layout, TreeBuilder};

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn backend() -> Arc<dyn VcsBackend> {
    Arc::new(GitBackend::new().expect("git must be installed for tests"))
}

fn state_error(err: &ConductorError) -> &StateError {
    match err {
        ConductorError::State(inner) => inner,
        other => panic!("expected ConductorError::State, got {other:?}"),
    }
}

async fn built_state(root: &Path, layout: Layout) -> TreeState {
    let mut remote = MemoryRemote::new();
    remote.add_group("G");
    remote.add_group("G/S");
    remote.add_project("G", "p1", "/srv").unwrap();
    remote.add_project("G", "p2", "/srv").unwrap();
    remote.add_project("G/S", "p3", "/srv").unwrap();
    let tree = TreeBuilder::new(&remote, CloneProtocol::Https)
        .build("G", root, layout)
        .await
        .unwrap();
    TreeState::new(root.to_path_buf(), layout, tree)
}

fn git_init(path: &Path) {
    std::fs::create_dir_all(path).unwrap();
    let status = Command::new("git")
        .args(["init", "--quiet"])
        .current_dir(path)
        .status()
        .expect("failed to run git");
    assert!(status.success());
}

fn paths(state: &TreeState) -> Vec<PathBuf> {
    state.tree.projects().iter().map(|p| p.local_path.clone()).collect()
}

#[tokio::test]
async fn test_save_load_round_trip_rebinds() {
    let temp = temp_dir();
    let root = dunce::canonicalize(temp.path()).unwrap();
    let state = built_state(&root, Layout::Nested).await;
    git_init(&root.join("G/p1"));

    let written = state.save().unwrap();
    assert_eq!(written, root.join("G").join(STATE_FILE_NAME));

    let loaded = TreeState::load(&written, &backend()).unwrap();
    assert_eq!(loaded.root, root);
    assert_eq!(loaded.layout, Layout::Nested);
    assert_eq!(paths(&loaded), paths(&state));

    let bound: Vec<_> = loaded
        .tree
        .projects()
        .iter()
        .map(|p| p.state.is_bound())
        .collect();
    assert_eq!(bound, [true, false, false]);
    assert!(loaded.tree.projects().iter().all(|p| p.last_row.is_none()));
}

#[tokio::test]
async fn test_load_rebases_moved_tree() {
    let temp = temp_dir();
    let base = dunce::canonicalize(temp.path()).unwrap();
    let old_root = base.join("old");
    let state = built_state(&old_root, Layout::Flat).await;
    git_init(&old_root.join("G-S-p3"));
    assert_eq!(state.save().unwrap(), old_root.join(STATE_FILE_NAME));

    let new_root = base.join("moved");
    std::fs::rename(&old_root, &new_root).unwrap();

    let loaded = TreeState::load(&new_root.join(STATE_FILE_NAME), &backend()).unwrap();
    assert_eq!(loaded.root, new_root);
    assert_eq!(loaded.layout, Layout::Flat);
    assert_eq!(
        paths(&loaded),
        [
            new_root.join("G-p1"),
            new_root.join("G-p2"),
            new_root.join("G-S-p3"),
        ]
    );
    assert!(loaded.tree.projects()[2].state.is_bound());
}

#[tokio::test]
async fn test_load_follows_renamed_top_directory() {
    let temp = temp_dir();
    let root = dunce::canonicalize(temp.path()).unwrap();
    let state = built_state(&root, Layout::Nested).await;
    git_init(&root.join("G/S/p3"));
    state.save().unwrap();

    std::fs::rename(root.join("G"), root.join("G2")).unwrap();

    let loaded = TreeState::load(&root.join("G2").join(STATE_FILE_NAME), &backend()).unwrap();
    assert_eq!(loaded.root, root);
    assert_eq!(loaded.tree.local_path, root.join("G2"));
    assert_eq!(
        paths(&loaded),
        [root.join("G2/p1"), root.join("G2/p2"), root.join("G2/S/p3")]
    );
    assert!(loaded.tree.projects()[2].state.is_bound());
    assert_eq!(loaded.state_file(), root.join("G2").join(STATE_FILE_NAME));
}

#[tokio::test]
async fn test_corrupt_state_is_detected() {
    let temp = temp_dir();
    let state = built_state(temp.path(), Layout::Nested).await;
    let path = state.save().unwrap();
    let good = std::fs::read(&path).unwrap();

    let mut flipped = good.clone();
    let last = flipped.len() - 1;
    flipped[last] ^= 0xFF;

    let mut bad_magic = good.clone();
    bad_magic[0] = b'X';

    for (bytes, reason) in [
        (flipped, "checksum mismatch"),
        (bad_magic, "bad magic"),
        (good[..10].to_vec(), "header needs"),
    ] {
        std::fs::write(&path, bytes).unwrap();
        let err = TreeState::load(&path, &backend()).unwrap_err();
        match state_error(&err) {
            StateError::Corrupt { reason: found, .. } => {
                assert!(found.contains(reason), "{found} should mention {reason}");
            }
            other => panic!("expected Corrupt, got {other:?}"),
        }
    }
}

#[test]
fn test_decode_rejects_unknown_version() {
    let mut bytes = MAGIC.to_vec();
    bytes.extend_from_slice(&99_u32.to_le_bytes());
    bytes.extend_from_slice(&[0; 40]);
    insta::assert_snapshot!(snapshot::decode(&bytes).unwrap_err(), @"unsupported format version 99");
}

#[test]
fn test_load_missing_file_is_not_found() {
    let temp = temp_dir();
    let err = TreeState::load(&temp.path().join("nope"), &backend()).unwrap_err();
    assert!(matches!(state_error(&err), StateError::NotFound { .. }));
}

#[test]
fn test_discover_explicit_paths() {
    let temp = temp_dir();
    let missing = temp.path().join("missing.state");
    let err = discover(Some(&missing), temp.path()).unwrap_err();
    assert!(matches!(state_error(&err), StateError::NotFound { path } if *path == missing));

    let err = discover(Some(temp.path()), temp.path()).unwrap_err();
    assert!(matches!(state_error(&err), StateError::InvalidPath { .. }));

    let file = temp.path().join("custom.state");
    std::fs::write(&file, b"x").unwrap();
    assert_eq!(
        discover(Some(&file), Path::new("/")).unwrap(),
        dunce::canonicalize(&file).unwrap()
    );
}

#[tokio::test]
async fn test_discover_walks_ancestors() {
    let temp = temp_dir();
    let root = dunce::canonicalize(temp.path()).unwrap();
    let state = built_state(&root, Layout::Nested).await;
    let written = state.save().unwrap();

    let deep = root.join("G/S/p3/src");
    std::fs::create_dir_all(&deep).unwrap();
    assert_eq!(discover(None, &deep).unwrap(), written);
    assert_eq!(discover(None, &root.join("G")).unwrap(), written);

    let err = discover(None, &root).unwrap_err();
    assert!(matches!(
        state_error(&err),
        StateError::NotFoundUpToRoot { file_name, .. } if file_name == STATE_FILE_NAME
    ));
}

#[test]
fn test_lock_is_exclusive() {
    let temp = temp_dir();
    let first = StateLock::acquire(temp.path()).unwrap();
    assert_eq!(first.path(), temp.path().join(LOCK_FILE_NAME));

    let err = StateLock::acquire(temp.path()).unwrap_err();
    assert!(matches!(state_error(&err), StateError::Locked { .. }));

    drop(first);
    assert!(StateLock::acquire(temp.path()).is_ok());
}
