// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `clone` arguments.

use std::path::PathBuf;

use clap::Args;

use crate::tree::Layout;

/// Arguments for the `clone` command.
#[derive(Debug, Clone, Args)]
pub struct CloneArgs {
    /// Full path of the remote group, e.g. `acme/backend`.
    pub group: String,

    /// Directory to clone into (defaults to the current directory).
    pub directory: Option<PathBuf>,

    /// Put every repository one level below the directory, named
    /// `<group>-<subgroup>-<project>`.
    #[arg(long)]
    pub flat: bool,
}

impl CloneArgs {
    #[must_use]
    pub const fn layout(&self) -> Layout {
        if self.flat { Layout::Flat } else { Layout::Nested }
    }
}
