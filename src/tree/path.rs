// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Remote path to local directory mapping.
//!
//! ```text
//! parent == root          -> root/<leaf>              (both layouts)
//! nested                  -> parent/<leaf>
//! flat                    -> root/<parent dir>-<leaf>
//! flat, leaf already
//!   "<parent dir>-..."    -> root/<leaf>
//! ```
//!
//! In the flat layout the parent's directory name already is its flattened
//! name, so each node extends its parent's name once instead of rebuilding
//! the whole chain.

use std::path::{Path, PathBuf};

use super::Layout;

/// Separator joining ancestor segments in the flat layout.
pub const FLAT_SEPARATOR: char = '-';

/// Compute the local path of a node whose remote leaf segment is `leaf`.
///
/// `parent` is the parent node's local path; pass `root` itself for the
/// top-level group.
#[must_use]
pub fn resolve_path(root: &Path, parent: &Path, layout: Layout, leaf: &str) -> PathBuf {
    if parent == root {
        return root.join(leaf);
    }
    match layout {
        Layout::Nested => parent.join(leaf),
        Layout::Flat => {
            let parent_name = parent
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            root.join(flat_name(&parent_name, leaf))
        }
    }
}

fn flat_name(parent_name: &str, leaf: &str) -> String {
    if parent_name.is_empty() {
        return leaf.to_string();
    }
    let prefix = format!("{parent_name}{FLAT_SEPARATOR}");
    if leaf.starts_with(&prefix) {
        leaf.to_string()
    } else {
        format!("{prefix}{leaf}")
    }
}
