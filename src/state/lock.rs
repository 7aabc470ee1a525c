// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Exclusive advisory lock over one tree.
//!
//! The lock lives on a separate file beside the state file, since the state
//! file itself is replaced by rename on every save. The OS drops the lock
//! when the guard's file handle closes.

use std::fs::{File, OpenOptions, TryLockError};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::LOCK_FILE_NAME;
use crate::error::{ConductorResult, StateError};

/// Held lock; released on drop.
#[derive(Debug)]
pub struct StateLock {
    path: PathBuf,
    _file: File,
}

impl StateLock {
    /// Take the lock for the tree whose state directory is `state_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Locked`] if another process holds it, or
    /// [`StateError::Io`] if the lock file cannot be opened.
    pub fn acquire(state_dir: &Path) -> ConductorResult<Self> {
        let path = state_dir.join(LOCK_FILE_NAME);
        let io_err = |source| StateError::Io {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(state_dir).map_err(io_err)?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)
            .map_err(io_err)?;

        match file.try_lock() {
            Ok(()) => {}
            Err(TryLockError::WouldBlock) => {
                return Err(StateError::Locked { path }.into());
            }
            Err(TryLockError::Error(source)) => return Err(io_err(source).into()),
        }

        debug!(path = %path.display(), "state lock acquired");
        Ok(Self { path, _file: file })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
