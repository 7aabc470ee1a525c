// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Bound repository handle.
//!
//! A [`RepoHandle`] exists only for a path that was verified to be a git
//! work tree. It is never persisted; every process run opens it again.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::backend::{RepoStatus, VcsBackend};
use crate::error::{ConductorResult, GitError};

/// Handle to one cloned repository.
#[derive(Debug, Clone)]
pub struct RepoHandle {
    workdir: PathBuf,
    backend: Arc<dyn VcsBackend>,
}

impl RepoHandle {
    /// Open the work tree at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::NotCloned`] if `path` is not a work tree root.
    pub fn open(backend: Arc<dyn VcsBackend>, path: &Path) -> ConductorResult<Self> {
        if !backend.is_work_tree(path) {
            return Err(GitError::NotCloned {
                path: path.to_path_buf(),
            }
            .into());
        }
        Ok(Self {
            workdir: path.to_path_buf(),
            backend,
        })
    }

    /// Clone `url` into `path` and open the result.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::CloneFailed`] if the clone fails.
    pub fn clone_into(
        backend: Arc<dyn VcsBackend>,
        url: &str,
        path: &Path,
    ) -> ConductorResult<Self> {
        backend.clone_repo(url, path)?;
        Self::open(backend, path)
    }

    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Current branch, or `HEAD` when detached.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if HEAD cannot be read.
    pub fn current_branch(&self) -> ConductorResult<String> {
        Ok(self
            .backend
            .current_branch(&self.workdir)?
            .unwrap_or_else(|| "HEAD".to_string()))
    }

    /// URL of `origin`, empty when there is none.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if git cannot be executed.
    pub fn remote_url(&self) -> ConductorResult<String> {
        Ok(self.backend.remote_url(&self.workdir)?.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns a `GitError` if the branch cannot be created.
    pub fn create_branch(&self, name: &str) -> ConductorResult<()> {
        self.backend.create_branch(&self.workdir, name)
    }

    /// # Errors
    ///
    /// Returns a `GitError` if the branch cannot be checked out.
    pub fn checkout(&self, name: &str) -> ConductorResult<()> {
        self.backend.checkout(&self.workdir, name)
    }

    /// Stage those of `paths` that lie inside this work tree and are
    /// untracked or modified. Other paths are ignored.
    ///
    /// `paths` must be absolute. Returns the staged work-tree-relative paths.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if status or `git add` fails.
    pub fn stage_files(&self, paths: &[PathBuf]) -> ConductorResult<Vec<String>> {
        let relative: Vec<String> = paths
            .iter()
            .filter_map(|p| p.strip_prefix(&self.workdir).ok())
            .filter(|rel| !rel.as_os_str().is_empty())
            .map(|rel| rel.to_string_lossy().replace('\\', "/"))
            .collect();
        if relative.is_empty() {
            return Ok(Vec::new());
        }

        let status = self.status()?;
        let selected: Vec<String> = relative
            .into_iter()
            .filter(|rel| status.is_stageable(rel))
            .collect();
        if !selected.is_empty() {
            self.backend.stage_files(&self.workdir, &selected)?;
        }
        Ok(selected)
    }

    /// Commit staged changes. Nothing is committed when the index has no
    /// changes; the returned list is then empty.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if status or `git commit` fails.
    pub fn commit(&self, message: &str) -> ConductorResult<Vec<String>> {
        let staged = self.status()?.staged;
        if !staged.is_empty() {
            self.backend.commit(&self.workdir, message)?;
        }
        Ok(staged)
    }

    /// # Errors
    ///
    /// Returns a `GitError` if `git status` fails.
    pub fn status(&self) -> ConductorResult<RepoStatus> {
        self.backend.status(&self.workdir)
    }

    /// # Errors
    ///
    /// Returns a `GitError` if the push is rejected.
    pub fn push_current_branch(&self) -> ConductorResult<()> {
        self.backend.push_current_branch(&self.workdir)
    }
}
