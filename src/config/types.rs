// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration section types.
//!
//! ```text
//! Settings: GlobalConfig, GitlabConfig, DispatchConfig
//! CloneProtocol: ssh (default) | https
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::logging::LogLevel;

/// Which clone URL of a remote project to record in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloneProtocol {
    #[default]
    Ssh,
    Https,
}

impl std::fmt::Display for CloneProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ssh => write!(f, "ssh"),
            Self::Https => write!(f, "https"),
        }
    }
}

impl std::str::FromStr for CloneProtocol {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ssh" => Ok(Self::Ssh),
            "https" | "http" => Ok(Self::Https),
            _ => Err(ConfigError::InvalidValue {
                section: "gitlab".to_string(),
                key: "clone_protocol".to_string(),
                message: format!("expected 'ssh' or 'https', got '{s}'"),
            }),
        }
    }
}

/// Global options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Optional log file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Write the log file as JSON lines.
    pub json_log: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::WARN,
            file_log_level: LogLevel::DEBUG,
            log_file: None,
            json_log: false,
        }
    }
}

/// GitLab connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitlabConfig {
    /// Base URL of the GitLab instance.
    pub url: String,
    /// Personal access token sent as `PRIVATE-TOKEN`.
    pub api_key: String,
    pub clone_protocol: CloneProtocol,
    /// Page size for list requests (GitLab caps this at 100).
    pub per_page: u32,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for GitlabConfig {
    fn default() -> Self {
        Self {
            url: "https://gitlab.com".to_string(),
            api_key: String::new(),
            clone_protocol: CloneProtocol::Ssh,
            per_page: 100,
            request_timeout_secs: 30,
        }
    }
}

impl GitlabConfig {
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Fan-out execution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// Number of repositories processed concurrently.
    pub jobs: usize,
    /// Per-repository operation timeout; 0 disables it.
    pub timeout_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            jobs: 4,
            timeout_secs: 600,
        }
    }
}

impl DispatchConfig {
    /// The per-operation timeout, `None` when disabled.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        }
    }
}
