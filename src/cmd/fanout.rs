// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Commands that run one operation in every repository of the current scope.
//!
//! The scope is the node whose directory encloses the working directory; the
//! top-level group when nothing does.

use std::sync::Arc;

use tracing::{debug, info};

use super::{CommandContext, RunReport};
use crate::dispatch::{ConsoleReporter, Operation, Reporter};
use crate::error::{ConductorError, Result};
use crate::git::VcsBackend;
use crate::state::{self, StateLock, TreeState};
use crate::tree::locate_enclosing;

/// Main handler for `branch`, `checkout`, `add`, `commit`, `status` and `push`.
///
/// # Errors
///
/// Returns an error if git cannot be found or [`run_operation`] fails.
pub async fn run_fanout_command(name: &str, args: &[String], ctx: &CommandContext) -> Result<()> {
    let backend = ctx.git_backend()?;
    let mut reporter = ConsoleReporter::new(ctx.quiet);
    run_operation(name, args, ctx, backend, &mut reporter).await?;
    Ok(())
}

/// Run the operation `name` over the current scope.
///
/// Per-repository failures end up in the returned rows, not in the error.
///
/// # Errors
///
/// Returns an error, before any repository is touched, if the operation is
/// unknown or misses an argument, the state file cannot be found or decoded,
/// or the tree is locked. Also fails if the state cannot be saved afterwards.
pub async fn run_operation(
    name: &str,
    args: &[String],
    ctx: &CommandContext,
    backend: Arc<dyn VcsBackend>,
    reporter: &mut dyn Reporter,
) -> Result<RunReport> {
    let cwd = dunce::canonicalize(&ctx.cwd).unwrap_or_else(|_| ctx.cwd.clone());
    let op = Operation::parse(name, args, &cwd)?;
    let state_file = state::discover(ctx.state_path.as_deref(), &cwd)?;

    let mutating = op.kind().is_mutating();
    let _lock = match state_file.parent() {
        Some(state_dir) if mutating => Some(StateLock::acquire(state_dir)?),
        _ => None,
    };

    let mut state = TreeState::load(&state_file, &backend)?;
    let address = locate_enclosing(&state.tree, &cwd);
    debug!(?address, cwd = %cwd.display(), "scope located");

    let root = state.root.clone();
    let mut scope = address
        .resolve_mut(&mut state.tree)
        .ok_or_else(|| ConductorError::Other("located scope is not in the tree".into()))?;
    let projects = scope.projects_mut();
    let rows = ctx.dispatcher(backend).dispatch(&root, projects, &op, reporter).await;

    let state_file = if mutating {
        state.save()?
    } else {
        state_file
    };
    info!(op = %op.kind(), rows = rows.len(), "operation finished");
    Ok(RunReport { state_file, rows })
}
