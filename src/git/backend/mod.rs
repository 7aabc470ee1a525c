// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! VCS backend abstraction layer.
//!
//! ```text
//! VcsBackend (trait object, Send + Sync)
//!      |
//!      v
//! GitBackend
//!   reads:  gix   (work tree check, HEAD name)
//!   writes: git   (clone, branch, checkout, add, commit, push,
//!                  status --porcelain, remote get-url)
//!
//! git child (tokio::process, kill_on_drop)
//!   select! { exit          -> output
//!             sleep(limit)  -> drop child (killed), GitError::TimedOut
//!             cancelled     -> drop child (killed), GitError::Interrupted }
//! ```

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::error::{ConductorError, ConductorResult, GitError, GixError};

/// Working tree changes grouped the way `git status` reports them.
///
/// Paths are relative to the work tree root, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoStatus {
    /// Changes to be committed.
    pub staged: Vec<String>,
    /// Changes not staged for commit.
    pub modified: Vec<String>,
    /// Untracked files.
    pub untracked: Vec<String>,
}

impl RepoStatus {
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.modified.is_empty() && self.untracked.is_empty()
    }

    /// Whether `rel_path` is untracked or has unstaged modifications.
    #[must_use]
    pub fn is_stageable(&self, rel_path: &str) -> bool {
        self.untracked.iter().any(|p| p == rel_path) || self.modified.iter().any(|p| p == rel_path)
    }
}

/// Per-repository VCS operations.
///
/// Every method takes the work tree root. Implementations are shared across
/// worker threads, so they must not keep per-repository state.
pub trait VcsBackend: Send + Sync + std::fmt::Debug {
    /// Whether `path` is itself the root of a git work tree.
    fn is_work_tree(&self, path: &Path) -> bool;

    /// Clone `url` into `dest`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::CloneFailed`] if git fails.
    fn clone_repo(&self, url: &str, dest: &Path) -> ConductorResult<()>;

    /// Current branch name (`None` if HEAD is detached).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository or HEAD cannot be read.
    fn current_branch(&self, workdir: &Path) -> ConductorResult<Option<String>>;

    /// Fetch URL of the `origin` remote, if configured.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if git cannot be executed.
    fn remote_url(&self, workdir: &Path) -> ConductorResult<Option<String>>;

    /// Create a branch at HEAD without switching to it.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::CommandFailed`] if the branch exists or HEAD is unborn.
    fn create_branch(&self, workdir: &Path, name: &str) -> ConductorResult<()>;

    /// Switch to an existing branch.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::CommandFailed`] if the branch does not exist.
    fn checkout(&self, workdir: &Path, name: &str) -> ConductorResult<()>;

    /// Stage the given work-tree-relative paths.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::CommandFailed`] if `git add` fails.
    fn stage_files(&self, workdir: &Path, rel_paths: &[String]) -> ConductorResult<()>;

    /// Commit the index.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::CommandFailed`] if `git commit` fails.
    fn commit(&self, workdir: &Path, message: &str) -> ConductorResult<()>;

    /// Staged, modified and untracked files.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::CommandFailed`] if `git status` fails.
    fn status(&self, workdir: &Path) -> ConductorResult<RepoStatus>;

    /// Push the current branch to `origin`, setting upstream.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::CommandFailed`] if the push is rejected.
    fn push_current_branch(&self, workdir: &Path) -> ConductorResult<()>;
}

/// Git backend: gix for reads, the git CLI for everything that writes.
///
/// The CLI is used for writes so that credential helpers, SSH agents and
/// hooks behave exactly as they do for the user's own git.
#[derive(Debug, Clone)]
pub struct GitBackend {
    git: PathBuf,
    /// Limit for a single git invocation.
    timeout: Option<Duration>,
    cancel: CancellationToken,
}

impl GitBackend {
    /// Locate `git` on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::ExecutableNotFound`] if git is not installed.
    pub fn new() -> ConductorResult<Self> {
        let git = which::which("git").map_err(|_| GitError::ExecutableNotFound {
            name: "git".to_string(),
        })?;
        Ok(Self {
            git,
            timeout: None,
            cancel: CancellationToken::new(),
        })
    }

    /// Kill any git process still running after `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Kill running git processes once `cancel` fires.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Path of the git executable in use.
    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.git
    }

    /// Run git and return raw stdout. Sets `GCM_INTERACTIVE=never` and
    /// `GIT_TERMINAL_PROMPT=0` so a missing credential fails instead of
    /// blocking a worker.
    fn git_raw(&self, args: &[&str], cwd: &Path) -> ConductorResult<String> {
        let command_line = format!("git {}", args.join(" "));
        trace!(cwd = %cwd.display(), "{command_line}");

        let mut command = Command::new(&self.git);
        command
            .args(args)
            .current_dir(cwd)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        let output = run_detached(self.wait(command, &command_line))??;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: command_line,
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Wait for the child, dropping (and so killing) it on timeout or
    /// cancellation.
    async fn wait(&self, mut command: Command, command_line: &str) -> ConductorResult<Output> {
        let child = command
            .spawn()
            .map_err(|e| std::io::Error::new(e.kind(), format!("failed to execute git: {e}")))?;
        let limit = async {
            match self.timeout {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            output = child.wait_with_output() => Ok(output?),
            () = limit => {
                let secs = self.timeout.map_or(0, |t| t.as_secs());
                warn!(command = %command_line, secs, "git timed out, killed");
                Err(GitError::TimedOut { command: command_line.to_string(), secs }.into())
            }
            () = self.cancel.cancelled() => {
                debug!(command = %command_line, "git interrupted, killed");
                Err(GitError::Interrupted { command: command_line.to_string() }.into())
            }
        }
    }

    fn git_command(&self, args: &[&str], cwd: &Path) -> ConductorResult<String> {
        self.git_raw(args, cwd).map(|out| out.trim().to_string())
    }
}

/// Drive `future` to completion on a private current-thread runtime.
///
/// Runs on its own thread so that it works from blocking workers and from
/// inside an async task alike.
fn run_detached<F>(future: F) -> ConductorResult<F::Output>
where
    F: Future + Send,
    F::Output: Send,
{
    std::thread::scope(|scope| {
        scope
            .spawn(|| {
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .map(|runtime| runtime.block_on(future))
            })
            .join()
            .map_err(|_| ConductorError::Other("git runner thread panicked".into()))?
            .map_err(ConductorError::from)
    })
}

fn open_repo(path: &Path) -> ConductorResult<gix::Repository> {
    gix::open(path).map_err(|e| ConductorError::from(GitError::Gix(GixError::Open(Box::new(e)))))
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

impl VcsBackend for GitBackend {
    fn is_work_tree(&self, path: &Path) -> bool {
        gix::open(path)
            .ok()
            .and_then(|repo| repo.workdir().map(|w| same_dir(w, path)))
            .unwrap_or(false)
    }

    fn clone_repo(&self, url: &str, dest: &Path) -> ConductorResult<()> {
        let clone_failed = |message: String| GitError::CloneFailed {
            url: url.to_string(),
            message,
        };
        let dest_str = dest
            .to_str()
            .ok_or_else(|| clone_failed("invalid destination path".to_string()))?;
        let parent = dest
            .parent()
            .ok_or_else(|| clone_failed("destination has no parent directory".to_string()))?;
        std::fs::create_dir_all(parent)?;
        let existed = dest.exists();

        let result = self.git_command(&["clone", "--quiet", url, dest_str], parent);
        if result.is_err() && !existed && dest.exists() {
            // Leftovers of an interrupted clone would block the next attempt.
            if let Err(e) = std::fs::remove_dir_all(dest) {
                warn!(path = %dest.display(), error = %e, "failed to remove partial clone");
            }
        }
        match result {
            Ok(_) => Ok(()),
            Err(ConductorError::Git(err)) => match *err {
                GitError::CommandFailed { message, .. } => Err(clone_failed(message).into()),
                other => Err(other.into()),
            },
            Err(other) => Err(other),
        }
    }

    fn current_branch(&self, workdir: &Path) -> ConductorResult<Option<String>> {
        let repo = open_repo(workdir)?;
        let head = repo
            .head_name()
            .map_err(|e| ConductorError::from(GitError::Gix(GixError::Head(e))))?;
        Ok(head.map(|name| name.shorten().to_string()))
    }

    fn remote_url(&self, workdir: &Path) -> ConductorResult<Option<String>> {
        // A missing origin is not an error for display purposes.
        Ok(self
            .git_command(&["remote", "get-url", "origin"], workdir)
            .ok()
            .filter(|url| !url.is_empty()))
    }

    fn create_branch(&self, workdir: &Path, name: &str) -> ConductorResult<()> {
        self.git_command(&["branch", name], workdir)?;
        Ok(())
    }

    fn checkout(&self, workdir: &Path, name: &str) -> ConductorResult<()> {
        self.git_command(&["checkout", "-q", name], workdir)?;
        Ok(())
    }

    fn stage_files(&self, workdir: &Path, rel_paths: &[String]) -> ConductorResult<()> {
        if rel_paths.is_empty() {
            return Ok(());
        }
        let mut args = vec!["add", "--"];
        args.extend(rel_paths.iter().map(String::as_str));
        self.git_command(&args, workdir)?;
        Ok(())
    }

    fn commit(&self, workdir: &Path, message: &str) -> ConductorResult<()> {
        self.git_command(&["commit", "--quiet", "-m", message], workdir)?;
        Ok(())
    }

    fn status(&self, workdir: &Path) -> ConductorResult<RepoStatus> {
        let raw = self.git_raw(
            &["status", "--porcelain=v1", "-z", "--untracked-files=all"],
            workdir,
        )?;
        Ok(parse_porcelain(&raw))
    }

    fn push_current_branch(&self, workdir: &Path) -> ConductorResult<()> {
        self.git_command(&["push", "--quiet", "--set-upstream", "origin", "HEAD"], workdir)?;
        Ok(())
    }
}

/// Parse `git status --porcelain=v1 -z` output.
///
/// ```text
/// XY<sp>path\0            X = index column, Y = work tree column
/// R<sp><sp>new\0old\0     renames and copies carry the source path
/// ??<sp>path\0            untracked
/// ```
#[must_use]
pub fn parse_porcelain(raw: &str) -> RepoStatus {
    let mut status = RepoStatus::default();
    let mut entries = raw.split('\0').filter(|e| !e.is_empty());

    while let Some(entry) = entries.next() {
        let mut chars = entry.chars();
        let (Some(x), Some(y)) = (chars.next(), chars.next()) else {
            continue;
        };
        let Some(path) = entry.get(3..) else {
            continue;
        };
        let path = path.to_string();

        if x == '?' && y == '?' {
            status.untracked.push(path);
            continue;
        }
        if x == '!' {
            continue;
        }
        if matches!(x, 'R' | 'C') {
            entries.next();
        }
        if x != ' ' {
            status.staged.push(path.clone());
        }
        if y != ' ' {
            status.modified.push(path);
        }
    }

    status.staged.sort();
    status.modified.sort();
    status.untracked.sort();
    status
}
