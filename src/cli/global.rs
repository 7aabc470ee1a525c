// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --config FILE       <- settings file (env GITCONDUCTOR_CONFIG)
//! --state FILE        <- explicit state file instead of the ancestor search
//! --gitlab-url URL    <- gitlab.url      (env GITCONDUCTOR_URL)
//! --gitlab-key KEY    <- gitlab.api_key  (env GITCONDUCTOR_GITLAB_API_KEY)
//! --jobs N            <- dispatch.jobs
//! --timeout SECS      <- dispatch.timeout_secs
//! --log-level N       <- console verbosity (0-6), then -v / -q
//! --file-log-level N  <- file verbosity (falls back to --log-level)
//! --log-file FILE     <- global.log_file
//!
//! Precedence: CLI flags > GITCONDUCTOR_<SECTION>__<KEY> > --config > defaults
//! ```

use std::path::PathBuf;

use clap::Args;

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Settings file to load instead of the default one.
    #[arg(short = 'c', long = "config", value_name = "FILE", env = "GITCONDUCTOR_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// State file to use instead of searching the working directory and its
    /// parents.
    #[arg(long = "state", value_name = "FILE", global = true)]
    pub state: Option<PathBuf>,

    /// GitLab base URL.
    #[arg(long = "gitlab-url", value_name = "URL", env = "GITCONDUCTOR_URL", global = true)]
    pub gitlab_url: Option<String>,

    /// GitLab personal access token.
    #[arg(
        long = "gitlab-key",
        value_name = "KEY",
        env = "GITCONDUCTOR_GITLAB_API_KEY",
        hide_env_values = true,
        global = true
    )]
    pub gitlab_key: Option<String>,

    /// Number of repositories processed at once.
    #[arg(short = 'j', long = "jobs", value_name = "N", value_parser = clap::value_parser!(u16).range(1..), global = true)]
    pub jobs: Option<u16>,

    /// Per-repository timeout in seconds (0 disables it).
    #[arg(long = "timeout", value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// More console output (repeatable).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Less console output (repeatable).
    #[arg(short = 'q', long = "quiet", action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6), global = true)]
    pub log_level: Option<u8>,

    /// File log level, overrides --log-level for the log file.
    #[arg(long = "file-log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6), global = true)]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,
}

impl GlobalOptions {
    /// Converts command-line options to settings overrides.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<(&'static str, config::Value)> {
        let mut overrides: Vec<(&'static str, config::Value)> = Vec::new();

        if let Some(url) = &self.gitlab_url {
            overrides.push(("gitlab.url", url.clone().into()));
        }
        if let Some(key) = &self.gitlab_key {
            overrides.push(("gitlab.api_key", key.clone().into()));
        }
        if let Some(jobs) = self.jobs {
            overrides.push(("dispatch.jobs", i64::from(jobs).into()));
        }
        if let Some(timeout) = self.timeout {
            let secs = i64::try_from(timeout).unwrap_or(i64::MAX);
            overrides.push(("dispatch.timeout_secs", secs.into()));
        }
        if let Some(level) = self.log_level {
            overrides.push(("global.output_log_level", i64::from(level).into()));
        }

        // file_log_level falls back to log_level if not specified
        if let Some(level) = self.file_log_level.or(self.log_level) {
            overrides.push(("global.file_log_level", i64::from(level).into()));
        }

        if let Some(path) = &self.log_file {
            overrides.push(("global.log_file", path.display().to_string().into()));
        }

        overrides
    }
}
