// snapcommit: versioned backup and commit tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. --config FILE (repeatable)
//! 3. --set KEY=VALUE
//! 4. CLI flags (--repo, --remote, --branch, --no-push, --dry, ...)
//! ```
//!
//! A bare `snapcommit` invocation needs none of these.
//!
//! # Example
//!
//! ```toml
//! [commit]
//! message_prefix = "Snapshot"
//!
//! [push]
//! remote = "origin"
//! branch = "main"
//! ```

pub mod loader;
pub mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{BackupConfig, CommitConfig, GlobalConfig, PushConfig, RepoConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Repository selection.
    pub repo: RepoConfig,
    /// Commit message settings.
    pub commit: CommitConfig,
    /// Push target.
    pub push: PushConfig,
    /// Backup creation settings.
    pub backup: BackupConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use snapcommit::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file("snapcommit.toml")
    ///     .set("push.enabled", false)?
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Check cross-field constraints serde can't express.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when a branch is set without a remote, a
    /// remote/branch is blank, or the commit message prefix is empty.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.push.branch.is_some() && self.push.remote.is_none() {
            return Err(ConfigError::MissingKey {
                section: "push".to_string(),
                key: "remote".to_string(),
            });
        }
        for (key, value) in [("remote", &self.push.remote), ("branch", &self.push.branch)] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    section: "push".to_string(),
                    key: key.to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        if self.commit.message_prefix.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                section: "commit".to_string(),
                key: "message_prefix".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Format configuration options for display, sorted by key.
    ///
    /// Unset optional values are left out.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        options.insert("global.dry", self.global.dry.to_string());
        options.insert(
            "global.output_log_level",
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level",
            self.global.file_log_level.as_u8().to_string(),
        );
        if let Some(log_file) = &self.global.log_file {
            options.insert("global.log_file", log_file.display().to_string());
        }
        if let Some(root) = &self.repo.root {
            options.insert("repo.root", root.display().to_string());
        }
        options.insert("commit.message_prefix", self.commit.message_prefix.clone());
        options.insert("push.enabled", self.push.enabled.to_string());
        if let Some(remote) = &self.push.remote {
            options.insert("push.remote", remote.clone());
        }
        if let Some(branch) = &self.push.branch {
            options.insert("push.branch", branch.clone());
        }
        options.insert(
            "backup.collision_retries",
            self.backup.collision_retries.to_string(),
        );

        let max_key_len = options.keys().map(|k| k.len()).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}
