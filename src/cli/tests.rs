// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use clap::Parser;

use crate::cli::viz::VizKind;
use crate::cli::{Cli, Command};
use crate::tree::Layout;

#[test]
fn test_parse_version() {
    let cli = Cli::try_parse_from(["gitconductor", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn test_parse_clone() {
    let cli = Cli::try_parse_from(["gitconductor", "clone", "acme/backend", "work", "--flat"]).unwrap();
    let Some(Command::Clone(args)) = cli.command else {
        panic!("expected clone");
    };
    assert_eq!(args.group, "acme/backend");
    assert_eq!(args.directory, Some(PathBuf::from("work")));
    assert_eq!(args.layout(), Layout::Flat);

    let cli = Cli::try_parse_from(["gitconductor", "clone", "acme"]).unwrap();
    let Some(Command::Clone(args)) = cli.command else {
        panic!("expected clone");
    };
    assert_eq!(args.directory, None);
    assert_eq!(args.layout(), Layout::Nested);
}

#[test]
fn test_parse_fanout_commands() {
    let cases: [(&[&str], &str, &[&str]); 6] = [
        (&["branch", "feature"], "branch", &["feature"]),
        (&["checkout", "main"], "checkout", &["main"]),
        (&["add", "a.txt", "dir/b.txt"], "add", &["a.txt", "dir/b.txt"]),
        (&["commit", "-m", "fix build"], "commit", &["fix build"]),
        (&["status"], "status", &[]),
        (&["push"], "push", &[]),
    ];
    for (argv, name, args) in cases {
        let cli = Cli::try_parse_from(std::iter::once("gitconductor").chain(argv.iter().copied()))
            .unwrap();
        let (parsed_name, parsed_args) = cli.command.unwrap().as_operation().unwrap();
        assert_eq!(parsed_name, name);
        assert_eq!(parsed_args, args);
    }
}

#[test]
fn test_fanout_commands_require_arguments() {
    for argv in [
        &["gitconductor", "branch"][..],
        &["gitconductor", "add"],
        &["gitconductor", "commit"],
    ] {
        assert!(Cli::try_parse_from(argv).is_err(), "{argv:?} should fail");
    }
}

#[test]
fn test_parse_viz() {
    let cli = Cli::try_parse_from(["gitconductor", "viz", "access", "--explicit", "--maxdepth", "2"])
        .unwrap();
    let Some(Command::Viz(args)) = cli.command else {
        panic!("expected viz");
    };
    assert_eq!(args.kind, VizKind::Access);
    assert!(args.explicit);
    assert_eq!(args.maxdepth, Some(2));
    assert!(Command::Viz(args).as_operation().is_none());

    let err = Cli::try_parse_from(["gitconductor", "viz", "graph"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
}

#[test]
fn test_parse_global_options() {
    let cli = Cli::try_parse_from([
        "gitconductor",
        "status",
        "-j",
        "8",
        "--timeout",
        "30",
        "-l",
        "4",
        "-vv",
        "--gitlab-url",
        "https://git.example",
        "--state",
        "/tmp/t/.gitconductor.state",
    ])
    .unwrap();
    let global = &cli.global;
    assert_eq!(global.jobs, Some(8));
    assert_eq!(global.verbose, 2);
    assert_eq!(global.state, Some(PathBuf::from("/tmp/t/.gitconductor.state")));

    let overrides: Vec<String> = global
        .to_config_overrides()
        .into_iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    insta::assert_debug_snapshot!(overrides, @r#"
    [
        "gitlab.url=https://git.example",
        "dispatch.jobs=8",
        "dispatch.timeout_secs=30",
        "global.output_log_level=4",
        "global.file_log_level=4",
    ]
    "#);
}

#[test]
fn test_jobs_must_be_positive() {
    assert!(Cli::try_parse_from(["gitconductor", "status", "-j", "0"]).is_err());
    assert!(Cli::try_parse_from(["gitconductor", "status", "-l", "7"]).is_err());
}
