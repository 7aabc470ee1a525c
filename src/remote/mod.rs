// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Remote hosting platform contract.
//!
//! ```text
//!             RemoteHierarchy (BoxFuture methods)
//!               |                         |
//!               v                         v
//!        GitLabClient                MemoryRemote
//!   GET /api/v4/groups/:path       fixed hierarchy,
//!   GET .../projects, /subgroups   used by tests
//!   GET .../members/all
//!   (x-next-page pagination)
//! ```
//!
//! Every list call returns the complete result set; pagination never leaks
//! to callers.

pub mod gitlab;
pub mod memory;

#[cfg(test)]
mod tests;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::config::types::CloneProtocol;
use crate::error::ConductorResult;

pub use gitlab::GitLabClient;
pub use memory::MemoryRemote;

/// A group as returned by the remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteGroup {
    pub id: u64,
    pub name: String,
    /// Leaf path segment, e.g. `backend`.
    pub path: String,
    /// Slash-joined path from the top of the namespace, e.g. `acme/backend`.
    pub full_path: String,
}

/// A project (repository) as returned by the remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteProject {
    pub id: u64,
    pub name: String,
    pub path: String,
    pub path_with_namespace: String,
    pub ssh_url_to_repo: String,
    pub http_url_to_repo: String,
}

impl RemoteProject {
    /// Clone URL for the configured protocol.
    #[must_use]
    pub fn clone_url(&self, protocol: CloneProtocol) -> &str {
        match protocol {
            CloneProtocol::Ssh => &self.ssh_url_to_repo,
            CloneProtocol::Https => &self.http_url_to_repo,
        }
    }
}

/// A member of a group or project, including inherited members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteMember {
    pub id: u64,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub public_email: Option<String>,
    pub access_level: u32,
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// What a membership query is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberScope {
    Group(u64),
    Project(u64),
}

/// Read-only view of the remote group hierarchy.
pub trait RemoteHierarchy: Send + Sync {
    /// Resolve a group by its full path.
    ///
    /// Fails with `RemoteError::GroupNotFound` when the group does not exist.
    fn group<'a>(&'a self, full_path: &'a str) -> BoxFuture<'a, ConductorResult<RemoteGroup>>;

    /// Projects directly inside the group.
    fn projects<'a>(
        &'a self,
        group: &'a RemoteGroup,
    ) -> BoxFuture<'a, ConductorResult<Vec<RemoteProject>>>;

    /// Direct sub-groups of the group.
    fn subgroups<'a>(
        &'a self,
        group: &'a RemoteGroup,
    ) -> BoxFuture<'a, ConductorResult<Vec<RemoteGroup>>>;

    /// Members of a group or project, inherited ones included.
    fn members(&self, scope: MemberScope) -> BoxFuture<'_, ConductorResult<Vec<RemoteMember>>>;
}
