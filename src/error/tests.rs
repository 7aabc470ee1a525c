// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use super::{
    ConductorError, ConductorResult, ConfigError, DispatchError, GitError, StateError, TreeError,
};

#[test]
fn test_config_error_display() {
    let err = ConfigError::InvalidValue {
        section: "dispatch".to_string(),
        key: "jobs".to_string(),
        message: "must be at least 1".to_string(),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"invalid value for 'jobs' in section '[dispatch]': must be at least 1"
    );
}

#[test]
fn test_unknown_command_display() {
    let err: ConductorError = DispatchError::UnknownCommand {
        name: "rebase".to_string(),
    }
    .into();
    insta::assert_snapshot!(
        err.to_string(),
        @r#"dispatch error: command "rebase" not recognised"#
    );
}

#[test]
fn test_state_not_found_variants_are_distinct() {
    let walked = StateError::NotFoundUpToRoot {
        file_name: ".gitconductor.state".to_string(),
        start: PathBuf::from("/work"),
    };
    let explicit = StateError::NotFound {
        path: PathBuf::from("missing_file"),
    };

    assert!(walked.to_string().contains("up to root"));
    assert!(explicit.to_string().contains("\"missing_file\" does not exist"));
}

#[test]
fn test_not_cloned_names_path() {
    let err = GitError::NotCloned {
        path: PathBuf::from("/r/g/p1"),
    };
    assert_eq!(err.to_string(), "not cloned: no git working tree at /r/g/p1");
}

#[test]
fn test_path_collision_display() {
    let err = TreeError::PathCollision {
        first: "g/s-p".to_string(),
        second: "g/s/p".to_string(),
        path: PathBuf::from("/r/g-s-p"),
    };
    assert_eq!(
        err.to_string(),
        "'g/s-p' and 'g/s/p' both resolve to /r/g-s-p"
    );
}

#[test]
fn test_conductor_error_size() {
    // Box<str> variants (Bailed, Other) are 16 bytes (fat pointer: ptr + len)
    // With discriminant + alignment = 24 bytes
    let size = std::mem::size_of::<ConductorError>();
    assert!(size <= 24, "ConductorError is {size} bytes, expected <= 24");
}

#[test]
fn test_conductor_result_size() {
    let size = std::mem::size_of::<ConductorResult<()>>();
    assert!(size <= 24, "ConductorResult<()> is {size} bytes, expected <= 24");
}

#[test]
fn test_alternate_display_prints_message_once() {
    let err: ConductorError = StateError::NotFound {
        path: PathBuf::from("x.state"),
    }
    .into();
    let err = anyhow::Error::from(err);
    insta::assert_snapshot!(
        format!("{err:#}"),
        @r#"state error: the provided state file "x.state" does not exist"#
    );
}
