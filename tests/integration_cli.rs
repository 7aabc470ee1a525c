// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for CLI parsing and settings layering.
//!
//! Command-line flags are turned into overrides and layered over a TOML
//! file and environment variables the way `main` does it.

use std::collections::HashMap;

use clap::Parser;
use gitconductor::cli::{Cli, Command};
use gitconductor::config::types::CloneProtocol;
use gitconductor::config::{ENV_PREFIX, Settings};
use gitconductor::logging::LogLevel;

fn settings_for(argv: &[&str], toml: &str, env: &[(&str, &str)]) -> gitconductor::error::Result<Settings> {
    let cli = Cli::try_parse_from(argv).unwrap();
    let vars: HashMap<String, String> = env
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    let mut loader = Settings::builder()
        .add_toml_str(toml)
        .with_env_prefix(ENV_PREFIX)
        .with_env_vars(vars);
    for (key, value) in cli.global.to_config_overrides() {
        loader = loader.set(key, value);
    }
    loader.build()
}

const FILE: &str = r#"
[gitlab]
url = "https://file.example"
clone_protocol = "https"

[dispatch]
jobs = 2
"#;

#[test]
fn cli_flags_beat_env_and_file() {
    let settings = settings_for(
        &["gitconductor", "status", "--jobs", "16", "--gitlab-url", "https://cli.example"],
        FILE,
        &[("GITCONDUCTOR_GITLAB__URL", "https://env.example"), ("GITCONDUCTOR_DISPATCH__JOBS", "6")],
    )
    .unwrap();

    assert_eq!(settings.gitlab.url, "https://cli.example");
    assert_eq!(settings.dispatch.jobs, 16);
    assert_eq!(settings.gitlab.clone_protocol, CloneProtocol::Https);
}

#[test]
fn env_beats_file() {
    let settings = settings_for(
        &["gitconductor", "status"],
        FILE,
        &[("GITCONDUCTOR_DISPATCH__JOBS", "6"), ("GITCONDUCTOR_GITLAB__API_KEY", "glpat-env")],
    )
    .unwrap();

    assert_eq!(settings.dispatch.jobs, 6);
    assert_eq!(settings.gitlab.url, "https://file.example");
    assert_eq!(settings.gitlab.api_key, "glpat-env");
}

#[test]
fn log_level_flags_fill_both_levels() {
    let settings = settings_for(&["gitconductor", "-l", "5", "status"], "", &[]).unwrap();
    assert_eq!(settings.global.output_log_level, LogLevel::TRACE);
    assert_eq!(settings.global.file_log_level, LogLevel::TRACE);

    let settings = settings_for(
        &["gitconductor", "-l", "1", "--file-log-level", "4", "status"],
        "",
        &[],
    )
    .unwrap();
    assert_eq!(settings.global.output_log_level, LogLevel::ERROR);
    assert_eq!(settings.global.file_log_level, LogLevel::DEBUG);
}

#[test]
fn timeout_zero_disables_the_limit() {
    let settings = settings_for(&["gitconductor", "push", "--timeout", "0"], "", &[]).unwrap();
    assert_eq!(settings.dispatch.timeout(), None);
}

#[test]
fn bad_url_from_cli_is_rejected() {
    let err = settings_for(&["gitconductor", "status", "--gitlab-url", "ftp://nope"], "", &[])
        .unwrap_err();
    insta::assert_snapshot!(
        err,
        @"invalid value for 'url' in section '[gitlab]': expected an http(s) URL, got 'ftp://nope'"
    );
}

#[test]
fn commit_message_is_the_only_argument() {
    let cli = Cli::try_parse_from(["gitconductor", "commit", "-m", "one two"]).unwrap();
    let (name, args) = cli.command.as_ref().and_then(Command::as_operation).unwrap();
    assert_eq!(name, "commit");
    assert_eq!(args, ["one two"]);
}
