// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!
//! clone   remote --> TreeBuilder --> lock --> Dispatcher(clone) --> save
//! fan-out parse --> discover --> lock? --> load --> locate --> Dispatcher --> save?
//! viz     discover --> load --> locate --> tree | table | access(remote)
//! config  settings + loaded files
//! ```
//!
//! Each `run_*_command` builds the real collaborators and delegates to a
//! function taking them as parameters, which is what the integration tests
//! drive.

pub mod clone;
pub mod config;
pub mod fanout;
pub mod viz;


use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::Settings;
use crate::dispatch::{Dispatcher, ResultRow, Summary};
use crate::error::ConductorResult;
use crate::git::{GitBackend, VcsBackend};

/// Everything a handler needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub settings: Settings,
    /// Working directory the invocation is scoped to.
    pub cwd: PathBuf,
    /// `--state`, if given.
    pub state_path: Option<PathBuf>,
    pub cancel: CancellationToken,
    /// Suppress the progress bar and summary line.
    pub quiet: bool,
}

impl CommandContext {
    #[must_use]
    pub fn new(settings: Settings, cwd: PathBuf) -> Self {
        Self {
            settings,
            cwd,
            state_path: None,
            cancel: CancellationToken::new(),
            quiet: false,
        }
    }

    /// The git backend, killing its child processes at the per-repository
    /// timeout or on Ctrl-C.
    fn git_backend(&self) -> ConductorResult<Arc<dyn VcsBackend>> {
        let backend = GitBackend::new()?
            .with_timeout(self.settings.dispatch.timeout())
            .with_cancel(self.cancel.clone());
        Ok(Arc::new(backend))
    }

    fn dispatcher(&self, backend: Arc<dyn VcsBackend>) -> Dispatcher {
        Dispatcher::builder()
            .backend(backend)
            .with_jobs(self.settings.dispatch.jobs)
            .maybe_with_timeout(self.settings.dispatch.timeout())
            .with_cancel(self.cancel.clone())
            .build()
    }
}

/// What a dispatching command did.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// State file written, or read for non-mutating commands.
    pub state_file: PathBuf,
    pub rows: Vec<ResultRow>,
}

impl RunReport {
    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary::from_rows(&self.rows)
    }
}
