// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `clone` command.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use super::{CommandContext, RunReport};
use crate::cli::clone::CloneArgs;
use crate::dispatch::{ConsoleReporter, Operation, Reporter};
use crate::error::Result;
use crate::git::VcsBackend;
use crate::remote::{GitLabClient, RemoteHierarchy};
use crate::state::{StateLock, TreeState};
use crate::tree::TreeBuilder;

/// Main handler for the clone command.
///
/// # Errors
///
/// Returns an error if the GitLab client or git cannot be set up, or if
/// [`clone_tree`] fails.
pub async fn run_clone_command(args: &CloneArgs, ctx: &CommandContext) -> Result<()> {
    let remote = GitLabClient::new(&ctx.settings.gitlab)?;
    let backend = ctx.git_backend()?;
    let mut reporter = ConsoleReporter::new(ctx.quiet);
    clone_tree(args, ctx, &remote, backend, &mut reporter).await?;
    Ok(())
}

/// Build the tree for `args.group` and clone every project in it.
///
/// The state file is saved even when some clones fail.
///
/// # Errors
///
/// Returns an error if the root cannot be created, the remote group does not
/// exist, two nodes map to the same path, the tree is locked by another
/// process, or the state file cannot be written.
pub async fn clone_tree(
    args: &CloneArgs,
    ctx: &CommandContext,
    remote: &dyn RemoteHierarchy,
    backend: Arc<dyn VcsBackend>,
    reporter: &mut dyn Reporter,
) -> Result<RunReport> {
    let root = args
        .directory
        .as_ref()
        .map_or_else(|| ctx.cwd.clone(), |dir| ctx.cwd.join(dir));
    std::fs::create_dir_all(&root)
        .with_context(|| format!("failed to create {}", root.display()))?;
    let root = dunce::canonicalize(&root)
        .with_context(|| format!("failed to resolve {}", root.display()))?;

    let layout = args.layout();
    let protocol = ctx.settings.gitlab.clone_protocol;
    let tree = TreeBuilder::new(remote, protocol)
        .build(&args.group, &root, layout)
        .await?;
    info!(
        group = %args.group,
        root = %root.display(),
        %layout,
        projects = tree.project_count(),
        "tree built"
    );

    let mut state = TreeState::new(root, layout, tree);
    let _lock = StateLock::acquire(state.state_dir())?;

    let dispatcher = ctx.dispatcher(backend);
    let root = state.root.clone();
    let projects = state.tree.projects_mut();
    let rows = dispatcher
        .dispatch(&root, projects, &Operation::Clone, reporter)
        .await;

    let state_file = state.save()?;
    Ok(RunReport { state_file, rows })
}
