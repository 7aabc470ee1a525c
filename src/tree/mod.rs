// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Local mirror of a remote group hierarchy.
//!
//! ```text
//! GroupNode  acme            root/acme
//! |-- ProjectNode  api       root/acme/api        (nested)
//! |-- ProjectNode  web       root/acme/web
//! '-- GroupNode  tools       root/acme/tools
//!     '-- ProjectNode  ci    root/acme/tools/ci
//!
//! flat layout: root/acme, root/acme-api, root/acme-web,
//!              root/acme-tools, root/acme-tools-ci
//! ```
//!
//! Nodes own their children exclusively and hold no parent links. The
//! enclosing node of a path is recovered by [`locate`], which matches local
//! paths; this works because every local path in a tree is unique.
//!
//! Traversal order everywhere is pre-order: a group's projects first, then
//! each sub-group in `children` order.

pub mod builder;
pub mod locate;
pub mod path;


use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::dispatch::ResultRow;
use crate::git::RepoHandle;

pub use builder::TreeBuilder;
pub use locate::{NodeAddress, Scope, ScopeMut, find, locate, locate_enclosing};
pub use path::resolve_path;

/// How remote paths map onto local directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Mirror the hierarchy as nested directories.
    #[default]
    Nested,
    /// One directory level below the root, names joined with `-`.
    Flat,
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nested => write!(f, "nested"),
            Self::Flat => write!(f, "flat"),
        }
    }
}

/// A remote group or sub-group.
#[derive(Debug, Clone)]
pub struct GroupNode {
    pub name: String,
    /// Slash-joined remote path, e.g. `acme/tools`.
    pub fullname: String,
    pub remote_id: u64,
    pub local_path: PathBuf,
    /// False only for the group the tree was built from.
    pub is_subgroup: bool,
    pub children: Vec<GroupNode>,
    pub projects: Vec<ProjectNode>,
}

/// Binding of a project to its local work tree.
#[derive(Debug, Clone, Default)]
pub enum ProjectState {
    /// No work tree known at `local_path`.
    #[default]
    Unbound,
    /// A clone is in flight.
    Cloning,
    Bound(RepoHandle),
    /// The last clone attempt failed.
    Failed(String),
}

impl ProjectState {
    #[must_use]
    pub const fn handle(&self) -> Option<&RepoHandle> {
        match self {
            Self::Bound(handle) => Some(handle),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_bound(&self) -> bool {
        matches!(self, Self::Bound(_))
    }
}

/// A remote repository.
#[derive(Debug, Clone)]
pub struct ProjectNode {
    pub name: String,
    /// Owning group's fullname plus the project path.
    pub fullname: String,
    pub remote_id: u64,
    pub local_path: PathBuf,
    pub clone_url: String,
    /// Runtime only, never persisted.
    pub state: ProjectState,
    /// Runtime only, never persisted.
    pub last_row: Option<ResultRow>,
}

impl ProjectNode {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        fullname: impl Into<String>,
        remote_id: u64,
        local_path: PathBuf,
        clone_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            fullname: fullname.into(),
            remote_id,
            local_path,
            clone_url: clone_url.into(),
            state: ProjectState::Unbound,
            last_row: None,
        }
    }
}

impl GroupNode {
    /// All projects in pre-order.
    #[must_use]
    pub fn projects(&self) -> Vec<&ProjectNode> {
        let mut out = Vec::new();
        collect(self, &mut out);
        out
    }

    /// All projects in pre-order, mutably.
    pub fn projects_mut(&mut self) -> Vec<&mut ProjectNode> {
        let mut out = Vec::new();
        collect_mut(self, &mut out);
        out
    }

    /// This group and every sub-group in pre-order.
    #[must_use]
    pub fn groups(&self) -> Vec<&Self> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.groups());
        }
        out
    }

    #[must_use]
    pub fn project_count(&self) -> usize {
        self.projects.len() + self.children.iter().map(Self::project_count).sum::<usize>()
    }
}

fn collect<'a>(group: &'a GroupNode, out: &mut Vec<&'a ProjectNode>) {
    out.extend(group.projects.iter());
    for child in &group.children {
        collect(child, out);
    }
}

fn collect_mut<'a>(group: &'a mut GroupNode, out: &mut Vec<&'a mut ProjectNode>) {
    let GroupNode {
        projects, children, ..
    } = group;
    out.extend(projects.iter_mut());
    for child in children.iter_mut() {
        collect_mut(child, out);
    }
}
