// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{LogConfig, LogLevel};

#[test]
fn test_log_level_bounds() {
    assert!(LogLevel::new(6).is_ok());
    let err = LogLevel::new(7).unwrap_err();
    assert!(err.to_string().contains("log level must be 0-6, got 7"));
}

#[test]
fn test_adjusted_saturates() {
    let levels = vec![
        ("warn +1", LogLevel::WARN.adjusted(1, 0).as_u8()),
        ("warn +9", LogLevel::WARN.adjusted(9, 0).as_u8()),
        ("warn -5", LogLevel::WARN.adjusted(0, 5).as_u8()),
        ("info +2 -1", LogLevel::INFO.adjusted(2, 1).as_u8()),
    ];
    insta::assert_debug_snapshot!(levels, @r#"
    [
        (
            "warn +1",
            3,
        ),
        (
            "warn +9",
            6,
        ),
        (
            "warn -5",
            0,
        ),
        (
            "info +2 -1",
            4,
        ),
    ]
    "#);
}

#[test]
fn test_filter_strings_scope_dependencies() {
    assert_eq!(LogLevel::SILENT.to_filter_string(), "off");
    assert_eq!(LogLevel::WARN.to_filter_string(), "warn");
    assert_eq!(LogLevel::DEBUG.to_filter_string(), "warn,gitconductor=debug");
    assert_eq!(LogLevel::DUMP.to_filter_string(), "trace");
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level(), LogLevel::WARN);
    assert_eq!(config.file_level(), LogLevel::DEBUG);
    assert!(config.log_file().is_none());
    assert!(!config.json_file());
}

#[test]
fn test_log_level_deserialize_rejects_out_of_range() {
    let ok: LogLevel = serde_json::from_str("4").unwrap();
    assert_eq!(ok, LogLevel::DEBUG);
    assert!(serde_json::from_str::<LogLevel>("9").is_err());
}
