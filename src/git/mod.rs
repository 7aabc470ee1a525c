// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations module.
//!
//! ```text
//!   dispatch (one job per project)
//!            |
//!            v
//!       RepoHandle  ---- open(): NotCloned unless the path is a work tree
//!            |
//!            v
//!   Arc<dyn VcsBackend>
//!            |
//!            v
//!       GitBackend
//!     gix: is_work_tree, current_branch
//!     git: clone, branch, checkout, add,
//!          commit, status, push, get-url
//! ```
//!
//! The backend is a trait object so tests can record calls or inject
//! failures without a git binary.

pub mod backend;
pub mod handle;

pub use backend::{GitBackend, RepoStatus, VcsBackend};
pub use handle::RepoHandle;

#[cfg(test)]
mod tests;
