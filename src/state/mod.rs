// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tree persistence across invocations.
//!
//! ```text
//! nested                          flat
//! root/                           root/                   <- state dir
//! '-- acme/      <- state dir     |-- .gitconductor.state
//!     |-- .gitconductor.state     |-- .gitconductor.lock
//!     |-- .gitconductor.lock      |-- acme-api/
//!     |-- api/                    '-- acme-tools-ci/
//!     '-- tools/ci/
//!
//! save:  capture relative to state dir -> encode -> temp file -> rename
//! load:  read -> decode -> restore under parent(file) -> rebind handles
//! ```
//!
//! The state directory is an ancestor of every project in both layouts, so
//! the ancestor search finds the file from inside any checkout. Paths are
//! stored relative to it, which lets the whole tree or just the state
//! directory be moved or renamed.
//!
//! Handles are rebound eagerly on load. A project whose directory is not a
//! work tree simply stays unbound; that is not a load error.

pub mod lock;
pub mod snapshot;

#[cfg(test)]
mod tests;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::error::{ConductorResult, StateError};
use crate::git::{RepoHandle, VcsBackend};
use crate::tree::{GroupNode, Layout, ProjectState};

pub use lock::StateLock;
pub use snapshot::Snapshot;

/// File name of the persisted tree inside the state directory.
pub const STATE_FILE_NAME: &str = ".gitconductor.state";

/// File name of the lock file beside the state file.
pub const LOCK_FILE_NAME: &str = ".gitconductor.lock";

/// A tree together with the root its paths are computed against.
#[derive(Debug, Clone)]
pub struct TreeState {
    pub root: PathBuf,
    pub layout: Layout,
    pub tree: GroupNode,
}

impl TreeState {
    #[must_use]
    pub const fn new(root: PathBuf, layout: Layout, tree: GroupNode) -> Self {
        Self { root, layout, tree }
    }

    /// The directory holding the state and lock files.
    ///
    /// The top group's directory when nested, the root when flat.
    #[must_use]
    pub fn state_dir(&self) -> &Path {
        match self.layout {
            Layout::Nested => &self.tree.local_path,
            Layout::Flat => &self.root,
        }
    }

    #[must_use]
    pub fn state_file(&self) -> PathBuf {
        self.state_dir().join(STATE_FILE_NAME)
    }

    /// Write the tree atomically to [`Self::state_file`].
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Io`] if the file cannot be written, or an error
    /// if a node lies outside the root.
    #[instrument(skip(self), fields(path = %self.state_file().display()))]
    pub fn save(&self) -> ConductorResult<PathBuf> {
        let dir = self.state_dir();
        let bytes = snapshot::encode(&Snapshot::capture(&self.tree, dir, self.layout)?)?;
        let target = self.state_file();
        let io_err = |source| StateError::Io {
            path: target.clone(),
            source,
        };

        std::fs::create_dir_all(dir).map_err(io_err)?;
        let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        temp.write_all(&bytes).map_err(io_err)?;
        temp.as_file().sync_all().map_err(io_err)?;
        temp.persist(&target).map_err(|e| io_err(e.error))?;

        debug!(bytes = bytes.len(), "state saved");
        Ok(target)
    }

    /// Read the state file at `path` and rebind every project.
    ///
    /// Paths are restored under the directory containing `path`. The root is
    /// that directory when flat and its parent when nested.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::NotFound`] if the file is missing,
    /// [`StateError::Corrupt`] if it cannot be decoded, or
    /// [`StateError::Io`] for other read failures.
    #[instrument(skip(backend))]
    pub fn load(path: &Path, backend: &Arc<dyn VcsBackend>) -> ConductorResult<Self> {
        let path = dunce::canonicalize(path).map_err(|source| not_found_or_io(path, source))?;
        let bytes = std::fs::read(&path).map_err(|source| not_found_or_io(&path, source))?;
        let snapshot = snapshot::decode(&bytes).map_err(|reason| StateError::Corrupt {
            path: path.clone(),
            reason,
        })?;

        let state_dir = path.parent().unwrap_or(&path);
        let root = match snapshot.layout {
            Layout::Nested => state_dir.parent().unwrap_or(state_dir),
            Layout::Flat => state_dir,
        }
        .to_path_buf();
        let tree = snapshot.restore(state_dir);
        let mut state = Self::new(root, snapshot.layout, tree);
        let bound = state.rebind(backend);
        info!(
            root = %state.root.display(),
            projects = state.tree.project_count(),
            bound,
            "state loaded"
        );
        Ok(state)
    }

    /// Reopen handles for every project. Returns how many are bound.
    pub fn rebind(&mut self, backend: &Arc<dyn VcsBackend>) -> usize {
        let mut bound = 0;
        for project in self.tree.projects_mut() {
            project.state = match RepoHandle::open(Arc::clone(backend), &project.local_path) {
                Ok(handle) => {
                    bound += 1;
                    ProjectState::Bound(handle)
                }
                Err(_) => ProjectState::Unbound,
            };
        }
        bound
    }
}

fn not_found_or_io(path: &Path, source: std::io::Error) -> StateError {
    if source.kind() == std::io::ErrorKind::NotFound {
        StateError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        StateError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Find the state file to use.
///
/// An explicit path must name an existing regular file. Otherwise `cwd` and
/// each of its ancestors are searched for [`STATE_FILE_NAME`].
///
/// # Errors
///
/// Returns [`StateError::NotFound`] or [`StateError::InvalidPath`] for a bad
/// explicit path, and [`StateError::NotFoundUpToRoot`] if the search finds
/// nothing.
pub fn discover(explicit: Option<&Path>, cwd: &Path) -> ConductorResult<PathBuf> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(StateError::NotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        if !path.is_file() {
            return Err(StateError::InvalidPath {
                path: path.to_path_buf(),
            }
            .into());
        }
        return Ok(dunce::canonicalize(path).map_err(|source| StateError::Io {
            path: path.to_path_buf(),
            source,
        })?);
    }

    let start = dunce::canonicalize(cwd).unwrap_or_else(|_| cwd.to_path_buf());
    for dir in start.ancestors() {
        let candidate = dir.join(STATE_FILE_NAME);
        if candidate.is_file() {
            debug!(path = %candidate.display(), "found state file");
            return Ok(candidate);
        }
    }
    Err(StateError::NotFoundUpToRoot {
        file_name: STATE_FILE_NAME.to_string(),
        start,
    }
    .into())
}
