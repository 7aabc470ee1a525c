// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Working-directory scoped subtree resolution.
//!
//! ```text
//! find(G, dir):
//!   G.local_path == dir          -> G
//!   any project.local_path == dir -> that project
//!   for child in G.children:     -> find(child, dir), stop at first match
//!   otherwise                    -> no match
//! ```
//!
//! Matches are returned as a [`NodeAddress`] (child indices from the root),
//! which can then be resolved to a shared or mutable view of the node.

use std::path::Path;

use super::{GroupNode, ProjectNode};

/// Position of a node as indices from the tree root.
///
/// `groups` walks `children`; `project` indexes the final group's
/// `projects`. The empty address is the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeAddress {
    pub groups: Vec<usize>,
    pub project: Option<usize>,
}

impl NodeAddress {
    /// The root group.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.groups.is_empty() && self.project.is_none()
    }

    /// Shared view of the addressed node.
    #[must_use]
    pub fn resolve<'a>(&self, tree: &'a GroupNode) -> Option<Scope<'a>> {
        let mut group = tree;
        for &index in &self.groups {
            group = group.children.get(index)?;
        }
        match self.project {
            Some(index) => group.projects.get(index).map(Scope::Project),
            None => Some(Scope::Group(group)),
        }
    }

    /// Mutable view of the addressed node.
    pub fn resolve_mut<'a>(&self, tree: &'a mut GroupNode) -> Option<ScopeMut<'a>> {
        let mut group = tree;
        for &index in &self.groups {
            group = group.children.get_mut(index)?;
        }
        match self.project {
            Some(index) => group.projects.get_mut(index).map(ScopeMut::Project),
            None => Some(ScopeMut::Group(group)),
        }
    }
}

/// A located node.
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    Group(&'a GroupNode),
    Project(&'a ProjectNode),
}

impl<'a> Scope<'a> {
    #[must_use]
    pub fn fullname(&self) -> &'a str {
        match self {
            Self::Group(g) => &g.fullname,
            Self::Project(p) => &p.fullname,
        }
    }

    #[must_use]
    pub fn local_path(&self) -> &'a Path {
        match self {
            Self::Group(g) => &g.local_path,
            Self::Project(p) => &p.local_path,
        }
    }

    /// Projects covered by this scope, in pre-order.
    #[must_use]
    pub fn projects(&self) -> Vec<&'a ProjectNode> {
        match self {
            Self::Group(g) => g.projects(),
            Self::Project(p) => vec![*p],
        }
    }
}

/// A located node, mutably.
#[derive(Debug)]
pub enum ScopeMut<'a> {
    Group(&'a mut GroupNode),
    Project(&'a mut ProjectNode),
}

impl ScopeMut<'_> {
    /// Projects covered by this scope, in pre-order.
    pub fn projects_mut(&mut self) -> Vec<&mut ProjectNode> {
        match self {
            Self::Group(g) => g.projects_mut(),
            Self::Project(p) => vec![&mut **p],
        }
    }
}

/// Find the node whose local path equals `dir` exactly.
#[must_use]
pub fn find(tree: &GroupNode, dir: &Path) -> Option<NodeAddress> {
    let mut address = NodeAddress::root();
    find_in(tree, dir, &mut address).then_some(address)
}

fn find_in(group: &GroupNode, dir: &Path, address: &mut NodeAddress) -> bool {
    if group.local_path == dir {
        return true;
    }
    if let Some(index) = group.projects.iter().position(|p| p.local_path == dir) {
        address.project = Some(index);
        return true;
    }
    for (index, child) in group.children.iter().enumerate() {
        address.groups.push(index);
        if find_in(child, dir, address) {
            return true;
        }
        address.groups.pop();
    }
    false
}

/// Address of the node at `dir`, or the root if no node matches.
#[must_use]
pub fn locate(tree: &GroupNode, dir: &Path) -> NodeAddress {
    find(tree, dir).unwrap_or_default()
}

/// Address of the innermost node containing `dir`.
///
/// Tries `dir` and then each ancestor, so running from a subdirectory of a
/// checkout still scopes to that project. Falls back to the root.
#[must_use]
pub fn locate_enclosing(tree: &GroupNode, dir: &Path) -> NodeAddress {
    dir.ancestors()
        .find_map(|candidate| find(tree, candidate))
        .unwrap_or_default()
}
