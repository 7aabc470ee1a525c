// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `viz` arguments.

use clap::{Args, ValueEnum};

/// Which visualisation to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VizKind {
    /// Names as an indented tree.
    Tree,
    /// One row per repository with branch, path and remote.
    Table,
    /// Members and access levels per group and project.
    Access,
}

/// Arguments for the `viz` command.
#[derive(Debug, Clone, Args)]
pub struct VizArgs {
    /// Visualisation type.
    #[arg(value_enum)]
    pub kind: VizKind,

    /// List every member at every level, not only the first time they appear.
    #[arg(long)]
    pub explicit: bool,

    /// Maximum number of group levels below the current one (0 = current only).
    #[arg(long, value_name = "N")]
    pub maxdepth: Option<usize>,
}
