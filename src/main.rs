// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Settings --> Logging --> Ctrl-C watch --> Command Dispatch
//!   Clone | Branch | Checkout | Add | Commit | Status | Push | Viz | Config
//! ```

use std::process::ExitCode;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use gitconductor::cli::global::GlobalOptions;
use gitconductor::cli::{self, Command};
use gitconductor::cmd::CommandContext;
use gitconductor::cmd::clone::run_clone_command;
use gitconductor::cmd::config::run_config_command;
use gitconductor::cmd::fanout::run_fanout_command;
use gitconductor::cmd::viz::run_viz_command;
use gitconductor::config::loader::ConfigLoader;
use gitconductor::config::{ENV_PREFIX, Settings, default_config_file};
use gitconductor::logging::{LogConfig, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let Some(command) = &cli.command else {
        eprintln!("No command specified. Use --help for usage information.");
        return ExitCode::FAILURE;
    };
    if matches!(command, Command::Version) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let loader = build_config_loader(&cli.global);
    let config_files = loader.format_loaded_files();
    let settings = match loader.build() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let log_config = build_log_config(&cli.global, &settings);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match command {
        Command::Config => {
            run_config_command(&settings, &config_files);
            Ok(())
        }
        _ => match build_context(&cli.global, settings) {
            Ok(ctx) => dispatch_command(command, &ctx).await,
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn dispatch_command(command: &Command, ctx: &CommandContext) -> anyhow::Result<()> {
    match command {
        Command::Clone(args) => run_clone_command(args, ctx).await,
        Command::Viz(args) => run_viz_command(args, ctx).await,
        other => match other.as_operation() {
            Some((name, args)) => run_fanout_command(name, &args, ctx).await,
            None => Ok(()),
        },
    }
}

fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = Settings::builder();
    if let Some(path) = &global.config {
        loader = loader.add_toml_file(path);
    } else if let Some(path) = default_config_file() {
        loader = loader.add_toml_file_optional(path);
    }
    loader = loader.with_env_prefix(ENV_PREFIX);
    for (key, value) in global.to_config_overrides() {
        loader = loader.set(key, value);
    }
    loader
}

fn build_log_config(global: &GlobalOptions, settings: &Settings) -> LogConfig {
    let console_level = settings
        .global
        .output_log_level
        .adjusted(global.verbose, global.quiet);

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(settings.global.file_log_level)
        .maybe_with_log_file(
            settings
                .global
                .log_file
                .as_ref()
                .map(|p| p.display().to_string()),
        )
        .with_json_file(settings.global.json_log)
        .build()
}

/// Command context with a cancellation token tripped by Ctrl-C.
fn build_context(global: &GlobalOptions, settings: Settings) -> anyhow::Result<CommandContext> {
    let cwd = std::env::current_dir().context("failed to read the working directory")?;
    let mut ctx = CommandContext::new(settings, cwd);
    ctx.state_path.clone_from(&global.state);
    ctx.quiet = global.quiet > 0;

    let cancel: CancellationToken = ctx.cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling remaining repositories");
            cancel.cancel();
        }
    });
    Ok(ctx)
}
