// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments of the commands that run in every repository.

use std::path::PathBuf;

use clap::Args;

/// Arguments for `branch` and `checkout`.
#[derive(Debug, Clone, Args)]
pub struct BranchArgs {
    /// Branch name.
    pub name: String,
}

/// Arguments for `add`.
#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    /// Files to stage, relative to the current directory.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Arguments for `commit`.
#[derive(Debug, Clone, Args)]
pub struct CommitArgs {
    /// Commit message.
    #[arg(short = 'm', long = "message", required = true)]
    pub message: String,
}
