// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `viz` command.

use std::sync::Arc;

use super::CommandContext;
use crate::cli::viz::{VizArgs, VizKind};
use crate::error::{ConductorError, Result};
use crate::git::VcsBackend;
use crate::remote::{GitLabClient, RemoteHierarchy};
use crate::state::{self, TreeState};
use crate::tree::locate_enclosing;
use crate::viz::{ACCESS_HEADERS, TABLE_HEADERS, access_rows, format_table, render_tree, table_rows};

/// Main handler for the viz command.
///
/// # Errors
///
/// Returns an error if git cannot be found, the GitLab client cannot be
/// built for `access`, or [`render_viz`] fails.
pub async fn run_viz_command(args: &VizArgs, ctx: &CommandContext) -> Result<()> {
    let backend = ctx.git_backend()?;
    let client = match args.kind {
        VizKind::Access => Some(GitLabClient::new(&ctx.settings.gitlab)?),
        VizKind::Tree | VizKind::Table => None,
    };
    let remote = client.as_ref().map(|c| c as &dyn RemoteHierarchy);
    let output = render_viz(args, ctx, &backend, remote).await?;
    println!("{output}");
    Ok(())
}

/// Render the requested view of the current scope.
///
/// # Errors
///
/// Returns an error if the state file cannot be found or decoded, or if
/// `access` is requested without a remote or a member listing fails.
pub async fn render_viz(
    args: &VizArgs,
    ctx: &CommandContext,
    backend: &Arc<dyn VcsBackend>,
    remote: Option<&dyn RemoteHierarchy>,
) -> Result<String> {
    let state_file = state::discover(ctx.state_path.as_deref(), &ctx.cwd)?;
    let state = TreeState::load(&state_file, backend)?;
    let cwd = dunce::canonicalize(&ctx.cwd).unwrap_or_else(|_| ctx.cwd.clone());
    let scope = locate_enclosing(&state.tree, &cwd)
        .resolve(&state.tree)
        .ok_or_else(|| ConductorError::Other("located scope is not in the tree".into()))?;

    let output = match args.kind {
        VizKind::Tree => render_tree(scope),
        VizKind::Table => {
            let rows = table_rows(scope, &state.root, args.maxdepth);
            format_table(&TABLE_HEADERS, &rows)
        }
        VizKind::Access => {
            let remote = remote
                .ok_or_else(|| ConductorError::Other("access view needs a remote".into()))?;
            let rows = access_rows(remote, scope, &state.root, args.explicit, args.maxdepth).await?;
            format_table(&ACCESS_HEADERS, &rows)
        }
    };
    Ok(output)
}
