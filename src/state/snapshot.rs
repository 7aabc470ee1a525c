// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Persisted form of a tree and its binary envelope.
//!
//! ```text
//! offset  size  field
//! 0       8     magic     "GCSTATE\0"
//! 8       4     version   u32 little-endian
//! 12      32    digest    BLAKE3 of payload
//! 44      ..    payload   bincode(Snapshot)
//! ```
//!
//! Records hold paths as components relative to the state directory and
//! never carry repository handles or result rows.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConductorError, ConductorResult};
use crate::tree::{GroupNode, Layout, ProjectNode};

pub const MAGIC: &[u8; 8] = b"GCSTATE\0";
pub const FORMAT_VERSION: u32 = 2;
const HEADER_LEN: usize = MAGIC.len() + 4 + blake3::OUT_LEN;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub layout: Layout,
    pub top: GroupRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub name: String,
    pub fullname: String,
    pub remote_id: u64,
    pub rel_path: Vec<String>,
    pub is_subgroup: bool,
    pub children: Vec<GroupRecord>,
    pub projects: Vec<ProjectRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub name: String,
    pub fullname: String,
    pub remote_id: u64,
    pub rel_path: Vec<String>,
    pub clone_url: String,
}

fn relative_components(root: &Path, path: &Path) -> ConductorResult<Vec<String>> {
    let rel = path.strip_prefix(root).map_err(|_| {
        ConductorError::Other(
            format!("{} is not inside {}", path.display(), root.display()).into_boxed_str(),
        )
    })?;
    Ok(rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect())
}

fn absolute(root: &Path, rel: &[String]) -> PathBuf {
    rel.iter().fold(root.to_path_buf(), |acc, part| acc.join(part))
}

impl Snapshot {
    /// Capture `tree` with paths made relative to `base`.
    ///
    /// # Errors
    ///
    /// Fails if a node's path lies outside `base`.
    pub fn capture(tree: &GroupNode, base: &Path, layout: Layout) -> ConductorResult<Self> {
        Ok(Self {
            layout,
            top: GroupRecord::capture(tree, base)?,
        })
    }

    /// Rebuild an unbound tree under `base`.
    #[must_use]
    pub fn restore(&self, base: &Path) -> GroupNode {
        self.top.restore(base)
    }
}

impl GroupRecord {
    fn capture(group: &GroupNode, root: &Path) -> ConductorResult<Self> {
        Ok(Self {
            name: group.name.clone(),
            fullname: group.fullname.clone(),
            remote_id: group.remote_id,
            rel_path: relative_components(root, &group.local_path)?,
            is_subgroup: group.is_subgroup,
            children: group
                .children
                .iter()
                .map(|child| Self::capture(child, root))
                .collect::<ConductorResult<_>>()?,
            projects: group
                .projects
                .iter()
                .map(|project| ProjectRecord::capture(project, root))
                .collect::<ConductorResult<_>>()?,
        })
    }

    fn restore(&self, root: &Path) -> GroupNode {
        GroupNode {
            name: self.name.clone(),
            fullname: self.fullname.clone(),
            remote_id: self.remote_id,
            local_path: absolute(root, &self.rel_path),
            is_subgroup: self.is_subgroup,
            children: self.children.iter().map(|c| c.restore(root)).collect(),
            projects: self.projects.iter().map(|p| p.restore(root)).collect(),
        }
    }
}

impl ProjectRecord {
    fn capture(project: &ProjectNode, root: &Path) -> ConductorResult<Self> {
        Ok(Self {
            name: project.name.clone(),
            fullname: project.fullname.clone(),
            remote_id: project.remote_id,
            rel_path: relative_components(root, &project.local_path)?,
            clone_url: project.clone_url.clone(),
        })
    }

    fn restore(&self, root: &Path) -> ProjectNode {
        ProjectNode::new(
            self.name.clone(),
            self.fullname.clone(),
            self.remote_id,
            absolute(root, &self.rel_path),
            self.clone_url.clone(),
        )
    }
}

/// Serialize a snapshot into the framed binary format.
///
/// # Errors
///
/// Returns [`ConductorError::Other`] if bincode cannot encode the snapshot.
pub fn encode(snapshot: &Snapshot) -> ConductorResult<Vec<u8>> {
    let payload = bincode::serde::encode_to_vec(snapshot, bincode::config::standard())
        .map_err(|e| ConductorError::Other(format!("encode state: {e}").into_boxed_str()))?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    bytes.extend_from_slice(blake3::hash(&payload).as_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Parse the framed binary format.
///
/// Returns the reason as a plain string so the caller can attach the file
/// path.
///
/// # Errors
///
/// Fails on a bad magic, unknown version, digest mismatch or undecodable
/// payload.
pub fn decode(bytes: &[u8]) -> Result<Snapshot, String> {
    if bytes.len() < HEADER_LEN {
        return Err(format!("file is {} bytes, header needs {HEADER_LEN}", bytes.len()));
    }
    let (magic, rest) = bytes.split_at(MAGIC.len());
    if magic != MAGIC {
        return Err("bad magic".to_string());
    }
    let (version, rest) = rest.split_at(4);
    let version = u32::from_le_bytes([version[0], version[1], version[2], version[3]]);
    if version != FORMAT_VERSION {
        return Err(format!("unsupported format version {version}"));
    }
    let (digest, payload) = rest.split_at(blake3::OUT_LEN);
    if blake3::hash(payload).as_bytes().as_slice() != digest {
        return Err("checksum mismatch".to_string());
    }

    let (snapshot, read): (Snapshot, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())
            .map_err(|e| format!("decode payload: {e}"))?;
    if read != payload.len() {
        return Err(format!("{} trailing bytes", payload.len() - read));
    }
    Ok(snapshot)
}
