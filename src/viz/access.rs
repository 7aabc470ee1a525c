// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Membership listing.
//!
//! Nodes are visited in pre-order. A node's own members are always listed;
//! its projects and sub-groups only while `depth < maxdepth`. A member
//! already listed higher up is skipped unless `explicit` is set. The path
//! column is filled on a node's first row only.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use super::relative;
use crate::error::ConductorResult;
use crate::remote::{MemberScope, RemoteHierarchy};
use crate::tree::Scope;

/// Column headers of [`access_rows`].
pub const ACCESS_HEADERS: [&str; 5] = ["Group/Project", "User", "Access Level", "Public Email", "Expiry"];

/// Display name of a GitLab access level code.
#[must_use]
pub fn access_level_name(code: u32) -> String {
    match code {
        10 => "Guest".to_string(),
        20 => "Reporter".to_string(),
        30 => "Developer".to_string(),
        40 => "Maintainer".to_string(),
        50 => "Owner".to_string(),
        other => format!("Level {other}"),
    }
}

/// Membership rows for `scope` and its descendants.
///
/// # Errors
///
/// Returns a [`crate::error::RemoteError`] if a member listing fails.
pub async fn access_rows(
    remote: &dyn RemoteHierarchy,
    scope: Scope<'_>,
    root: &Path,
    explicit: bool,
    maxdepth: Option<usize>,
) -> ConductorResult<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let mut seen: HashSet<u64> = HashSet::new();
    let mut stack = vec![(scope, 0_usize)];

    while let Some((node, depth)) = stack.pop() {
        let member_scope = match node {
            Scope::Group(group) => MemberScope::Group(group.remote_id),
            Scope::Project(project) => MemberScope::Project(project.remote_id),
        };
        let members = remote.members(member_scope).await?;
        debug!(node = node.fullname(), count = members.len(), "members listed");

        let path = relative(root, node.local_path());
        let mut first = true;
        for member in members {
            if !explicit && seen.contains(&member.id) {
                continue;
            }
            seen.insert(member.id);
            rows.push(vec![
                if first { path.clone() } else { String::new() },
                member.name,
                access_level_name(member.access_level),
                member.public_email.unwrap_or_default(),
                member.expires_at.unwrap_or_default(),
            ]);
            first = false;
        }

        if let Scope::Group(group) = node
            && maxdepth.is_none_or(|max| depth < max)
        {
            let children = group
                .projects
                .iter()
                .map(Scope::Project)
                .chain(group.children.iter().map(Scope::Group));
            let pending: Vec<_> = children.map(|child| (child, depth + 1)).collect();
            stack.extend(pending.into_iter().rev());
        }
    }
    Ok(rows)
}
