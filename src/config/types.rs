// snapcommit: versioned backup and commit tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types.
//!
//! ```text
//! Config: GlobalConfig, RepoConfig, CommitConfig, PushConfig, BackupConfig
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::logging::LogLevel;

/// Default prefix of the synthesized commit message.
pub const DEFAULT_MESSAGE_PREFIX: &str = "Versioned backup";

/// Default number of re-resolutions when a backup name is taken at create time.
pub const DEFAULT_COLLISION_RETRIES: u32 = 8;

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Detect and resolve names only; no files written, no git mutations.
    pub dry: bool,
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file. No file logging when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            dry: false,
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}

/// Repository selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Any path inside the working tree; the current directory when unset.
    pub root: Option<PathBuf>,
}

/// Commit message settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommitConfig {
    /// Text placed before the list of backup files.
    pub message_prefix: String,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            message_prefix: DEFAULT_MESSAGE_PREFIX.to_string(),
        }
    }
}

/// Push settings.
///
/// With neither `remote` nor `branch`, a bare `git push` is issued and git's
/// own upstream configuration decides where it goes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PushConfig {
    /// Run the push step after committing.
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    /// Requires `remote`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            remote: None,
            branch: None,
        }
    }
}

/// Backup file creation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackupConfig {
    /// How many times a name that was taken between scan and create is re-resolved.
    pub collision_retries: u32,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            collision_retries: DEFAULT_COLLISION_RETRIES,
        }
    }
}
