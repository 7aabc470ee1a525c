// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Fan one operation out across a set of projects.
//!
//! ```text
//! dispatch(root, projects (pre-order), op, reporter)
//!   reporter.begin
//!   clone: Unbound/Failed targets -> Cloning
//!   stream::iter(jobs).buffered(jobs)          <- result order == input order
//!     job: cancelled?  -> Outcome::Cancelled
//!          spawn_blocking(execute) under timeout
//!          error/timeout -> Outcome::Failed   (never aborts the run)
//!     reporter.row
//!   write back ProjectState + last_row
//!   reporter.finish(rows, summary)
//! ```
//!
//! A timed-out job's worker is not awaited. `GitBackend` kills its git child
//! at the same limit, so the worker ends shortly after.
//!
//! Unknown command names and missing arguments are rejected when the
//! [`Operation`] is parsed, so they never reach a project. Everything that
//! goes wrong for a single project after that is local to its row.

pub mod operation;
pub mod report;


use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use bon::Builder;
use futures_util::StreamExt;
use futures_util::stream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::error::ConductorResult;
use crate::git::{RepoHandle, VcsBackend};
use crate::tree::{ProjectNode, ProjectState};

pub use operation::{Operation, OperationKind, Outcome, ResultRow, Summary};
pub use report::{CollectingReporter, ConsoleReporter, Reporter};

/// Runs operations with bounded parallelism.
#[derive(Debug, Builder)]
pub struct Dispatcher {
    backend: Arc<dyn VcsBackend>,
    /// Maximum number of projects worked on at once.
    #[builder(setters(name = with_jobs), default = 4)]
    jobs: usize,
    /// Per-project time limit.
    #[builder(setters(name = with_timeout))]
    timeout: Option<Duration>,
    #[builder(setters(name = with_cancel), default)]
    cancel: CancellationToken,
}

/// Everything a worker needs, detached from the tree.
#[derive(Debug, Clone)]
struct JobSpec {
    local_path: PathBuf,
    clone_url: String,
    handle: Option<RepoHandle>,
}

/// Identity of the project a job belongs to.
#[derive(Debug, Clone)]
struct JobMeta {
    name: String,
    fullname: String,
    rel_path: String,
    clone_url: String,
    prior: ProjectState,
}

#[derive(Debug)]
struct Execution {
    outcome: Outcome,
    handle: RepoHandle,
    branch: String,
    remote: String,
}

#[derive(Debug)]
struct JobResult {
    row: ResultRow,
    /// Replacement state, if the job changed it.
    state: Option<ProjectState>,
}

impl Dispatcher {
    /// The cancellation token checked before each project.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run `op` on every project in `projects`, in order.
    ///
    /// Rows are returned in the same order as `projects`. Each project's
    /// `state` and `last_row` are updated in place.
    #[instrument(skip_all, fields(op = %op.kind(), projects = projects.len()))]
    pub async fn dispatch(
        &self,
        root: &Path,
        mut projects: Vec<&mut ProjectNode>,
        op: &Operation,
        reporter: &mut dyn Reporter,
    ) -> Vec<ResultRow> {
        let kind = op.kind();
        reporter.begin(kind, projects.len());

        let mut jobs = Vec::with_capacity(projects.len());
        for project in &mut projects {
            let meta = JobMeta {
                name: project.name.clone(),
                fullname: project.fullname.clone(),
                rel_path: relative(root, &project.local_path),
                clone_url: project.clone_url.clone(),
                prior: project.state.clone(),
            };
            let spec = JobSpec {
                local_path: project.local_path.clone(),
                clone_url: project.clone_url.clone(),
                handle: project.state.handle().cloned(),
            };
            if kind == OperationKind::Clone && !project.state.is_bound() {
                project.state = ProjectState::Cloning;
            }
            jobs.push((meta, spec));
        }

        let mut results = Vec::with_capacity(jobs.len());
        let mut stream = stream::iter(jobs)
            .map(|(meta, spec)| self.run_job(meta, spec, op))
            .buffered(self.jobs.max(1));
        while let Some(result) = stream.next().await {
            reporter.row(&result.row);
            results.push(result);
        }

        let mut rows = Vec::with_capacity(results.len());
        for (project, result) in projects.into_iter().zip(results) {
            if let Some(state) = result.state {
                project.state = state;
            }
            project.last_row = Some(result.row.clone());
            rows.push(result.row);
        }

        let summary = Summary::from_rows(&rows);
        info!(%summary, "dispatch finished");
        reporter.finish(kind, &rows, &summary);
        rows
    }

    async fn run_job(&self, meta: JobMeta, spec: JobSpec, op: &Operation) -> JobResult {
        if self.cancel.is_cancelled() {
            debug!(project = %meta.fullname, "skipped after cancellation");
            let state = matches!(op, Operation::Clone).then(|| meta.prior.clone());
            return failed_or_cancelled(meta, Outcome::Cancelled, state);
        }

        let backend = Arc::clone(&self.backend);
        let task_op = op.clone();
        let task = tokio::task::spawn_blocking(move || execute(&backend, &spec, &task_op));
        let joined = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    warn!(project = %meta.fullname, ?limit, "operation timed out");
                    let message = format!("timed out after {}s", limit.as_secs());
                    return failure(meta, op, message);
                }
            },
            None => task.await,
        };

        match joined {
            Ok(Ok(execution)) => {
                debug!(project = %meta.fullname, outcome = ?execution.outcome, "done");
                JobResult {
                    row: ResultRow {
                        name: meta.name,
                        fullname: meta.fullname,
                        rel_path: meta.rel_path,
                        branch: execution.branch,
                        remote: execution.remote,
                        outcome: execution.outcome,
                    },
                    state: Some(ProjectState::Bound(execution.handle)),
                }
            }
            Ok(Err(err)) => {
                warn!(project = %meta.fullname, error = %err, "operation failed");
                failure(meta, op, err.to_string())
            }
            Err(join_err) => failure(meta, op, format!("worker failed: {join_err}")),
        }
    }
}

/// A clone failure marks the project failed; other failures leave it as is.
fn failure(meta: JobMeta, op: &Operation, message: String) -> JobResult {
    let state = match op {
        Operation::Clone => Some(ProjectState::Failed(message.clone())),
        _ => None,
    };
    failed_or_cancelled(meta, Outcome::Failed(message), state)
}

fn failed_or_cancelled(meta: JobMeta, outcome: Outcome, state: Option<ProjectState>) -> JobResult {
    JobResult {
        row: ResultRow {
            name: meta.name,
            fullname: meta.fullname,
            rel_path: meta.rel_path,
            branch: String::new(),
            remote: meta.clone_url,
            outcome,
        },
        state,
    }
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

/// Perform `op` on one project. Runs on a blocking thread.
fn execute(
    backend: &Arc<dyn VcsBackend>,
    spec: &JobSpec,
    op: &Operation,
) -> ConductorResult<Execution> {
    let open = || match &spec.handle {
        Some(handle) => Ok(handle.clone()),
        None => RepoHandle::open(Arc::clone(backend), &spec.local_path),
    };

    let (handle, outcome) = match op {
        Operation::Clone => {
            if backend.is_work_tree(&spec.local_path) {
                (open()?, Outcome::AlreadyCloned)
            } else {
                let handle =
                    RepoHandle::clone_into(Arc::clone(backend), &spec.clone_url, &spec.local_path)?;
                (handle, Outcome::Cloned)
            }
        }
        Operation::Branch { name } => {
            let handle = open()?;
            let from = handle.current_branch()?;
            handle.create_branch(name)?;
            let outcome = Outcome::BranchCreated {
                from,
                name: name.clone(),
            };
            (handle, outcome)
        }
        Operation::Checkout { name } => {
            let handle = open()?;
            let from = handle.current_branch()?;
            handle.checkout(name)?;
            let outcome = Outcome::CheckedOut {
                from,
                name: name.clone(),
            };
            (handle, outcome)
        }
        Operation::Add { files } => {
            let handle = open()?;
            let files = handle.stage_files(files)?;
            (handle, Outcome::Staged { files })
        }
        Operation::Commit { message } => {
            let handle = open()?;
            let files = handle.commit(message)?;
            let outcome = if files.is_empty() {
                Outcome::NothingToCommit
            } else {
                Outcome::Committed {
                    files,
                    message: message.clone(),
                }
            };
            (handle, outcome)
        }
        Operation::Status => {
            let handle = open()?;
            let status = handle.status()?;
            (handle, Outcome::Status(status))
        }
        Operation::Push => {
            let handle = open()?;
            handle.push_current_branch()?;
            (handle, Outcome::Pushed)
        }
    };

    let branch = handle.current_branch().unwrap_or_default();
    let remote = handle
        .remote_url()
        .unwrap_or_else(|_| spec.clone_url.clone());
    Ok(Execution {
        outcome,
        handle,
        branch,
        remote,
    })
}
