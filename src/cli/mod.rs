// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for gitconductor using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! gitconductor [global options] <command>
//! clone <group> [directory] [--flat]
//! branch <name> | checkout <name>
//! add <files...> | commit -m <message>
//! status | push
//! viz {tree|table|access} [--explicit] [--maxdepth N]
//! config | version
//! ```

pub mod clone;
pub mod fanout;
pub mod global;
pub mod viz;

#[cfg(test)]
mod tests;

use clap::{Parser, Subcommand};

use crate::cli::clone::CloneArgs;
use crate::cli::fanout::{AddArgs, BranchArgs, CommitArgs};
use crate::cli::global::GlobalOptions;
use crate::cli::viz::VizArgs;

/// GitLab Group Mirror Tool
///
/// Mirrors a GitLab group hierarchy and runs git across every repository in it.
#[derive(Debug, Parser)]
#[command(
    name = "gitconductor",
    author,
    version,
    about = "GitLab Group Mirror Tool",
    long_about = "gitconductor Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Mirrors a GitLab group, its sub-groups and projects into a local\n\
                  directory tree and runs git commands across every repository in it.\n\n\
                  `gitconductor clone <group>` builds the tree and clones it. Every\n\
                  other command finds the tree from the current directory and only\n\
                  touches the part of it you are standing in.",
    after_help = "STATE FILE:\n\n\
                  `clone` writes `.gitconductor.state` into the group's top-level\n\
                  directory (the target directory itself with --flat). Later commands\n\
                  search the current directory and its parents for that file, or use\n\
                  --state. Moving the tree or renaming its top directory is fine;\n\
                  paths are rebased on load."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    Version,

    /// Lists the effective settings and the files they came from.
    Config,

    /// Builds the tree for a remote group and clones every project.
    Clone(CloneArgs),

    /// Creates a branch in every repository.
    Branch(BranchArgs),

    /// Switches every repository to an existing branch.
    Checkout(BranchArgs),

    /// Stages files in the repositories that contain them.
    Add(AddArgs),

    /// Commits staged changes in every repository.
    Commit(CommitArgs),

    /// Shows staged, modified and untracked files.
    Status,

    /// Pushes the current branch of every repository to origin.
    Push,

    /// Visualises the tree without touching any repository.
    Viz(VizArgs),
}

impl Command {
    /// Operation name and positional arguments for fan-out commands.
    #[must_use]
    pub fn as_operation(&self) -> Option<(&'static str, Vec<String>)> {
        match self {
            Self::Branch(args) => Some(("branch", vec![args.name.clone()])),
            Self::Checkout(args) => Some(("checkout", vec![args.name.clone()])),
            Self::Add(args) => Some((
                "add",
                args.files.iter().map(|f| f.display().to_string()).collect(),
            )),
            Self::Commit(args) => Some(("commit", vec![args.message.clone()])),
            Self::Status => Some(("status", Vec::new())),
            Self::Push => Some(("push", Vec::new())),
            Self::Version | Self::Config | Self::Clone(_) | Self::Viz(_) => None,
        }
    }
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
