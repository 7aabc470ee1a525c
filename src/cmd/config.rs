// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `config` command.

use crate::config::Settings;

/// Lines printed by the config command: settings first, then sources.
#[must_use]
pub fn config_report(settings: &Settings, config_files: &[String]) -> Vec<String> {
    let mut lines = settings.format_options();
    lines.push(String::new());
    if config_files.is_empty() {
        lines.push("No configuration files loaded".to_string());
    } else {
        lines.push("Configuration files:".to_string());
        lines.extend(config_files.iter().map(|f| format!("  {f}")));
    }
    lines
}

/// Display the effective settings and the files they were read from.
pub fn run_config_command(settings: &Settings, config_files: &[String]) {
    for line in config_report(settings, config_files) {
        println!("{line}");
    }
}
