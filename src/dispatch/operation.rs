// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Operations, their outcomes and result rows.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use crate::error::{ConductorResult, DispatchError};
use crate::git::RepoStatus;

/// Name of an operation in the fixed operation set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Clone,
    Branch,
    Checkout,
    Add,
    Commit,
    Status,
    Push,
}

impl OperationKind {
    pub const ALL: [Self; 7] = [
        Self::Clone,
        Self::Branch,
        Self::Checkout,
        Self::Add,
        Self::Commit,
        Self::Status,
        Self::Push,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Clone => "clone",
            Self::Branch => "branch",
            Self::Checkout => "checkout",
            Self::Add => "add",
            Self::Commit => "commit",
            Self::Status => "status",
            Self::Push => "push",
        }
    }

    /// Whether the operation changes repositories or the state file.
    #[must_use]
    pub const fn is_mutating(self) -> bool {
        !matches!(self, Self::Status)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OperationKind {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| DispatchError::UnknownCommand {
                name: s.to_string(),
            })
    }
}

/// A fully specified operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Clone,
    Branch { name: String },
    Checkout { name: String },
    /// Absolute paths.
    Add { files: Vec<PathBuf> },
    Commit { message: String },
    Status,
    Push,
}

impl Operation {
    /// Build an operation from a command name and its positional arguments.
    ///
    /// Relative `add` paths are resolved against `cwd`, then `.` and `..`
    /// are folded lexically so paths to deleted files still resolve.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownCommand`] for a name outside the
    /// operation set and [`DispatchError::MissingArgument`] if a required
    /// argument is absent.
    pub fn parse(name: &str, args: &[String], cwd: &Path) -> ConductorResult<Self> {
        let kind: OperationKind = name.parse()?;
        let first = || {
            args.first()
                .filter(|a| !a.is_empty())
                .cloned()
                .ok_or(DispatchError::MissingArgument {
                    command: kind.name(),
                    argument: match kind {
                        OperationKind::Commit => "a message",
                        _ => "a branch name",
                    },
                })
        };

        Ok(match kind {
            OperationKind::Clone => Self::Clone,
            OperationKind::Branch => Self::Branch { name: first()? },
            OperationKind::Checkout => Self::Checkout { name: first()? },
            OperationKind::Commit => Self::Commit { message: first()? },
            OperationKind::Status => Self::Status,
            OperationKind::Push => Self::Push,
            OperationKind::Add => {
                if args.is_empty() {
                    return Err(DispatchError::MissingArgument {
                        command: "add",
                        argument: "at least one file",
                    }
                    .into());
                }
                Self::Add {
                    files: args.iter().map(|f| normalize(&cwd.join(f))).collect(),
                }
            }
        })
    }

    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::Clone => OperationKind::Clone,
            Self::Branch { .. } => OperationKind::Branch,
            Self::Checkout { .. } => OperationKind::Checkout,
            Self::Add { .. } => OperationKind::Add,
            Self::Commit { .. } => OperationKind::Commit,
            Self::Status => OperationKind::Status,
            Self::Push => OperationKind::Push,
        }
    }
}

/// What happened to one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Cloned,
    /// The target already was a work tree and got bound instead.
    AlreadyCloned,
    BranchCreated { from: String, name: String },
    CheckedOut { from: String, name: String },
    Staged { files: Vec<String> },
    Committed { files: Vec<String>, message: String },
    NothingToCommit,
    Status(RepoStatus),
    Pushed,
    Failed(String),
    Cancelled,
}

impl Outcome {
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// One project's line in the aggregated output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub name: String,
    pub fullname: String,
    /// Local path relative to the tree root.
    pub rel_path: String,
    /// Active branch after the operation, empty if unknown.
    pub branch: String,
    /// `origin` URL, falling back to the clone URL.
    pub remote: String,
    pub outcome: Outcome,
}

/// Row counts of one dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: usize,
}

impl Summary {
    #[must_use]
    pub fn from_rows(rows: &[ResultRow]) -> Self {
        let failed = rows.iter().filter(|r| r.outcome.is_failure()).count();
        let cancelled = rows.iter().filter(|r| r.outcome.is_cancelled()).count();
        Self {
            total: rows.len(),
            succeeded: rows.len() - failed - cancelled,
            failed,
            cancelled,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} repositories: {} succeeded, {} failed, {} cancelled",
            self.total, self.succeeded, self.failed, self.cancelled
        )
    }
}

/// Fold `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
