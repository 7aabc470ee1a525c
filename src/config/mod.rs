// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for gitconductor.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low -> high)
//! 1. defaults
//! 2. config file: --config / GITCONDUCTOR_CONFIG,
//!    else <user config dir>/gitconductor/gitconductor.toml (optional)
//! 3. GITCONDUCTOR_<SECTION>__<KEY> env vars
//! 4. CLI overrides (--gitlab-url, --gitlab-key, --jobs, --timeout, ...)
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! GITCONDUCTOR_GITLAB__URL=https://git.example  -> gitlab.url
//! GITCONDUCTOR_GITLAB__API_KEY=glpat-...         -> gitlab.api_key
//! GITCONDUCTOR_DISPATCH__JOBS=8                  -> dispatch.jobs
//! ```
//!
//! The short names `GITCONDUCTOR_URL` and `GITCONDUCTOR_GITLAB_API_KEY` are
//! read by the CLI layer and applied as overrides.

pub mod loader;
pub mod types;


use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{DispatchConfig, GitlabConfig, GlobalConfig};

/// File name looked up in the user configuration directory.
pub const CONFIG_FILE_NAME: &str = "gitconductor.toml";

/// Prefix of every environment variable read by the loader.
pub const ENV_PREFIX: &str = "GITCONDUCTOR";

/// Complete application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub global: GlobalConfig,
    pub gitlab: GitlabConfig,
    pub dispatch: DispatchConfig,
}

impl Settings {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use gitconductor::config::Settings;
    ///
    /// let settings = Settings::builder()
    ///     .add_toml_file_optional("gitconductor.toml")
    ///     .with_env_prefix("GITCONDUCTOR")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load settings from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Settings` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load settings from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Settings` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Check value ranges the type system cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for the first offending key.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.dispatch.jobs == 0 {
            return Err(invalid("dispatch", "jobs", "must be at least 1"));
        }
        if self.gitlab.per_page == 0 || self.gitlab.per_page > 100 {
            return Err(invalid("gitlab", "per_page", "must be between 1 and 100"));
        }
        if !(self.gitlab.url.starts_with("http://") || self.gitlab.url.starts_with("https://")) {
            return Err(invalid(
                "gitlab",
                "url",
                &format!("expected an http(s) URL, got '{}'", self.gitlab.url),
            ));
        }
        Ok(())
    }

    /// Format settings for display as sorted `key = value` lines.
    ///
    /// The API key is shown as `[hidden]`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();

        options.insert(
            "global.output_log_level",
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level",
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file",
            self.global
                .log_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
        options.insert("global.json_log", self.global.json_log.to_string());

        options.insert("gitlab.url", self.gitlab.url.clone());
        options.insert(
            "gitlab.api_key",
            if self.gitlab.has_api_key() {
                "[hidden]".to_string()
            } else {
                String::new()
            },
        );
        options.insert(
            "gitlab.clone_protocol",
            self.gitlab.clone_protocol.to_string(),
        );
        options.insert("gitlab.per_page", self.gitlab.per_page.to_string());
        options.insert(
            "gitlab.request_timeout_secs",
            self.gitlab.request_timeout_secs.to_string(),
        );

        options.insert("dispatch.jobs", self.dispatch.jobs.to_string());
        options.insert(
            "dispatch.timeout_secs",
            self.dispatch.timeout_secs.to_string(),
        );

        let max_key_len = options.keys().map(|k| k.len()).max().unwrap_or(0);
        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}

fn invalid(section: &str, key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        message: message.to_string(),
    }
}

/// Default configuration file, `<user config dir>/gitconductor/gitconductor.toml`.
#[must_use]
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gitconductor").join(CONFIG_FILE_NAME))
}
