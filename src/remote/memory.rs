// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-memory remote hierarchy.
//!
//! Groups and projects are registered by full path; ids are assigned in
//! registration order. Listings come back in registration order, which is
//! deliberately not sorted so callers can check their own ordering.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures_util::future::{self, BoxFuture};

use super::{MemberScope, RemoteGroup, RemoteHierarchy, RemoteMember, RemoteProject};
use crate::error::{ConductorResult, RemoteError};

/// Fixed remote hierarchy held in memory.
#[derive(Debug, Default)]
pub struct MemoryRemote {
    groups: Vec<RemoteGroup>,
    projects: Vec<(u64, RemoteProject)>,
    members: HashMap<MemberScope, Vec<RemoteMember>>,
    next_id: u64,
    calls: AtomicUsize,
}

fn leaf(full_path: &str) -> &str {
    full_path.rsplit('/').next().unwrap_or(full_path)
}

fn parent(full_path: &str) -> Option<&str> {
    full_path.rsplit_once('/').map(|(parent, _)| parent)
}

impl MemoryRemote {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    const fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Register a group. Returns its id.
    pub fn add_group(&mut self, full_path: &str) -> u64 {
        let id = self.allocate_id();
        self.groups.push(RemoteGroup {
            id,
            name: leaf(full_path).to_string(),
            path: leaf(full_path).to_string(),
            full_path: full_path.to_string(),
        });
        id
    }

    /// Register a project inside an already registered group.
    ///
    /// The clone URLs are `<url_base>/<path_with_namespace>.git` for both
    /// protocols, so a directory of bare repositories can serve as remote.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::GroupNotFound`] if the group was not added first.
    pub fn add_project(
        &mut self,
        group_full_path: &str,
        path: &str,
        url_base: &str,
    ) -> ConductorResult<u64> {
        let group_id = self
            .groups
            .iter()
            .find(|g| g.full_path == group_full_path)
            .map(|g| g.id)
            .ok_or_else(|| RemoteError::GroupNotFound {
                group: group_full_path.to_string(),
            })?;
        let id = self.allocate_id();
        let path_with_namespace = format!("{group_full_path}/{path}");
        let url = format!("{}/{path_with_namespace}.git", url_base.trim_end_matches('/'));
        self.projects.push((
            group_id,
            RemoteProject {
                id,
                name: path.to_string(),
                path: path.to_string(),
                path_with_namespace,
                ssh_url_to_repo: url.clone(),
                http_url_to_repo: url,
            },
        ));
        Ok(id)
    }

    pub fn add_member(&mut self, scope: MemberScope, member: RemoteMember) {
        self.members.entry(scope).or_default().push(member);
    }

    /// Number of remote calls served so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn count(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }
}

impl RemoteHierarchy for MemoryRemote {
    fn group<'a>(&'a self, full_path: &'a str) -> BoxFuture<'a, ConductorResult<RemoteGroup>> {
        self.count();
        let found: ConductorResult<RemoteGroup> = self
            .groups
            .iter()
            .find(|g| g.full_path == full_path.trim_matches('/'))
            .cloned()
            .ok_or_else(|| {
                RemoteError::GroupNotFound {
                    group: full_path.to_string(),
                }
                .into()
            });
        Box::pin(future::ready(found))
    }

    fn projects<'a>(
        &'a self,
        group: &'a RemoteGroup,
    ) -> BoxFuture<'a, ConductorResult<Vec<RemoteProject>>> {
        self.count();
        let projects: Vec<RemoteProject> = self
            .projects
            .iter()
            .filter(|(owner, _)| *owner == group.id)
            .map(|(_, p)| p.clone())
            .collect();
        Box::pin(future::ready(Ok(projects)))
    }

    fn subgroups<'a>(
        &'a self,
        group: &'a RemoteGroup,
    ) -> BoxFuture<'a, ConductorResult<Vec<RemoteGroup>>> {
        self.count();
        let subgroups: Vec<RemoteGroup> = self
            .groups
            .iter()
            .filter(|g| parent(&g.full_path) == Some(group.full_path.as_str()))
            .cloned()
            .collect();
        Box::pin(future::ready(Ok(subgroups)))
    }

    fn members(&self, scope: MemberScope) -> BoxFuture<'_, ConductorResult<Vec<RemoteMember>>> {
        self.count();
        let members = self.members.get(&scope).cloned().unwrap_or_default();
        Box::pin(future::ready(Ok(members)))
    }
}
