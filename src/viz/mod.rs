// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Read-only views of a (sub)tree.
//!
//! ```text
//! tree    G                 table   Name  Tree    Branch  Path    Remote
//!         |-- p1                    p1    G/p1    main    G/p1    git@..
//!         |-- p2                    p3    G/S/p3  main    G/S/p3  git@..
//!         '-- S
//!             '-- p3        access  members per node, see [`access`]
//! ```
//!
//! `maxdepth` counts group levels below the scope; `Some(0)` limits a view
//! to the scope itself.

pub mod access;


use std::fmt::Write;
use std::path::Path;

use crate::tree::{GroupNode, ProjectNode, Scope};

pub use access::{ACCESS_HEADERS, access_level_name, access_rows};

/// Column headers of [`table_rows`].
pub const TABLE_HEADERS: [&str; 5] = ["Name", "Tree", "Branch", "Path", "Remote"];

/// Left-aligned columns separated by two spaces, with a dashed rule under
/// the header. Trailing whitespace is trimmed from every line.
#[must_use]
pub fn format_table<S: AsRef<str>>(headers: &[&str], rows: &[Vec<S>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.as_ref().chars().count();
            match widths.get_mut(i) {
                Some(width) => *width = (*width).max(len),
                None => widths.push(len),
            }
        }
    }

    let line = |cells: &mut dyn Iterator<Item = &str>| -> String {
        let mut out = String::new();
        for (i, cell) in cells.enumerate() {
            if i > 0 {
                out.push_str("  ");
            }
            let width = widths.get(i).copied().unwrap_or(0);
            let _ = write!(out, "{cell:<width$}");
        }
        out.trim_end().to_string()
    };

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let mut lines = vec![
        line(&mut headers.iter().copied()),
        line(&mut rule.iter().map(String::as_str)),
    ];
    lines.extend(rows.iter().map(|row| line(&mut row.iter().map(AsRef::as_ref))));
    lines.join("\n")
}

/// Indented name tree: projects first, then sub-groups.
#[must_use]
pub fn render_tree(scope: Scope<'_>) -> String {
    match scope {
        Scope::Project(project) => project.name.clone(),
        Scope::Group(group) => {
            let mut out = group.name.clone();
            tree_children(group, "", &mut out);
            out
        }
    }
}

fn tree_children(group: &GroupNode, prefix: &str, out: &mut String) {
    let total = group.projects.len() + group.children.len();
    let names = group
        .projects
        .iter()
        .map(|p| (p.name.as_str(), None))
        .chain(group.children.iter().map(|g| (g.name.as_str(), Some(g))));

    for (i, (name, child)) in names.enumerate() {
        let last = i + 1 == total;
        let (branch, indent) = if last { ("'-- ", "    ") } else { ("|-- ", "|   ") };
        let _ = write!(out, "\n{prefix}{branch}{name}");
        if let Some(child) = child {
            tree_children(child, &format!("{prefix}{indent}"), out);
        }
    }
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

fn project_row(project: &ProjectNode, root: &Path) -> Vec<String> {
    let (branch, remote) = match project.state.handle() {
        Some(handle) => (
            handle.current_branch().unwrap_or_default(),
            handle
                .remote_url()
                .ok()
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| project.clone_url.clone()),
        ),
        None => (String::new(), project.clone_url.clone()),
    };
    vec![
        project.name.clone(),
        project.fullname.clone(),
        branch,
        relative(root, &project.local_path),
        remote,
    ]
}

/// One row per project down to `maxdepth` group levels below the scope.
#[must_use]
pub fn table_rows(scope: Scope<'_>, root: &Path, maxdepth: Option<usize>) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    match scope {
        Scope::Project(project) => rows.push(project_row(project, root)),
        Scope::Group(group) => table_group(group, root, 0, maxdepth, &mut rows),
    }
    rows
}

fn table_group(
    group: &GroupNode,
    root: &Path,
    depth: usize,
    maxdepth: Option<usize>,
    rows: &mut Vec<Vec<String>>,
) {
    if maxdepth.is_some_and(|max| depth > max) {
        return;
    }
    rows.extend(group.projects.iter().map(|p| project_row(p, root)));
    for child in &group.children {
        table_group(child, root, depth + 1, maxdepth, rows);
    }
}
