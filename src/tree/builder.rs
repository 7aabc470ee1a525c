// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build a [`GroupNode`] tree from a remote hierarchy.
//!
//! ```text
//! build("acme", root, layout)
//!   group("acme") ----------------> GroupNode acme  (is_subgroup = false)
//!   projects(acme)  sort by path -> ProjectNode ...
//!   subgroups(acme) sort by path -> build_group(child, ...)  (recursive)
//!   check_unique_paths(tree)      -> TreeError::PathCollision
//! ```
//!
//! The builder only issues read-only remote queries. Any remote failure
//! aborts the whole build, so callers never see a partial tree.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use futures_util::future::BoxFuture;
use tracing::{debug, instrument};

use super::{GroupNode, Layout, ProjectNode, resolve_path};
use crate::config::types::CloneProtocol;
use crate::error::{ConductorResult, TreeError};
use crate::remote::{RemoteGroup, RemoteHierarchy};

/// Walks a remote hierarchy and assigns local paths.
pub struct TreeBuilder<'a> {
    remote: &'a dyn RemoteHierarchy,
    protocol: CloneProtocol,
}

impl<'a> TreeBuilder<'a> {
    #[must_use]
    pub fn new(remote: &'a dyn RemoteHierarchy, protocol: CloneProtocol) -> Self {
        Self { remote, protocol }
    }

    /// Build the tree rooted at the remote group `group_ref`.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::RemoteError`] if any remote query fails, or
    /// [`TreeError::PathCollision`] if two nodes resolve to the same
    /// directory.
    #[instrument(skip(self), fields(layout = %layout))]
    pub async fn build(
        &self,
        group_ref: &str,
        root: &Path,
        layout: Layout,
    ) -> ConductorResult<GroupNode> {
        let group = self.remote.group(group_ref).await?;
        let tree = self.build_group(group, root, root, layout, false).await?;
        check_unique_paths(&tree)?;
        debug!(
            groups = tree.groups().len(),
            projects = tree.project_count(),
            "tree built"
        );
        Ok(tree)
    }

    fn build_group<'b>(
        &'b self,
        group: RemoteGroup,
        root: &'b Path,
        parent: &'b Path,
        layout: Layout,
        is_subgroup: bool,
    ) -> BoxFuture<'b, ConductorResult<GroupNode>> {
        Box::pin(async move {
            let local_path = resolve_path(root, parent, layout, &group.path);

            let mut remote_projects = self.remote.projects(&group).await?;
            remote_projects.sort_by(|a, b| a.path.cmp(&b.path));
            let projects = remote_projects
                .into_iter()
                .map(|p| {
                    ProjectNode::new(
                        p.name.clone(),
                        format!("{}/{}", group.full_path, p.path),
                        p.id,
                        resolve_path(root, &local_path, layout, &p.path),
                        p.clone_url(self.protocol),
                    )
                })
                .collect();

            let mut subgroups = self.remote.subgroups(&group).await?;
            subgroups.sort_by(|a, b| a.full_path.cmp(&b.full_path));
            let mut children = Vec::with_capacity(subgroups.len());
            for subgroup in subgroups {
                children.push(
                    self.build_group(subgroup, root, &local_path, layout, true)
                        .await?,
                );
            }

            Ok(GroupNode {
                name: group.name,
                fullname: group.full_path,
                remote_id: group.id,
                local_path,
                is_subgroup,
                children,
                projects,
            })
        })
    }
}

/// Fail if any two nodes in `tree` share a local path.
///
/// # Errors
///
/// Returns [`TreeError::PathCollision`] naming the first clash found in
/// pre-order.
pub fn check_unique_paths(tree: &GroupNode) -> ConductorResult<()> {
    let mut seen: HashMap<&Path, &str> = HashMap::new();
    let mut entries: Vec<(&PathBuf, &str)> = Vec::new();
    for group in tree.groups() {
        entries.push((&group.local_path, &group.fullname));
        entries.extend(group.projects.iter().map(|p| (&p.local_path, p.fullname.as_str())));
    }

    for (path, fullname) in entries {
        if let Some(first) = seen.insert(path.as_path(), fullname) {
            return Err(TreeError::PathCollision {
                first: first.to_string(),
                second: fullname.to_string(),
                path: path.clone(),
            }
            .into());
        }
    }
    Ok(())
}
