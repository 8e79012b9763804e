// snapcommit: versioned backup and commit tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!            SnapError (~24 bytes)
//!                   |
//!     +------+------+------+------+
//!     |      |      |      |      |
//!     v      v      v      v      v
//!   Bail    Git  Backup   Cfg   Proc
//! Box<str>  Box   Box     Box    Box
//!
//! Sub-errors (unboxed internally):
//!   Git     QueryFailed, MutationFailed{step}, RepoNotFound, Gix
//!   Backup  PathNotFound, CopyFailure, ScanFailed,
//!           UnsupportedName, VersionExhausted
//!   Config  MissingKey, InvalidValue
//!   Process ExecutableNotFound
//!
//! Fatal to the run:          Git::QueryFailed
//! Fatal to the commit phase: Git::MutationFailed
//! Per-file, collected:       Backup::*
//! ```

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`SnapError`].
pub type SnapResult<T> = std::result::Result<T, SnapError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum SnapError {
    /// Fatal error that should terminate the application.
    #[error("fatal error: {0}")]
    Bailed(Box<str>),

    /// Git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Backup of a single file failed.
    #[error("backup error: {0}")]
    Backup(#[from] Box<BackupError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),
}

/// Create a fatal [`SnapError::Bailed`] that terminates the application.
pub fn bail_out(message: impl Into<String>) -> SnapError {
    SnapError::Bailed(message.into().into_boxed_str())
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for SnapError {
                fn from(err: $error) -> Self {
                    SnapError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    GitError => Git,
    BackupError => Backup,
    ConfigError => Config,
    ProcessError => Process,
}

// --- Gix Errors ---

/// Wrapper for gix-specific errors.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to discover repository from path.
    #[error("failed to discover repository: {0}")]
    Discover(#[from] Box<gix::discover::Error>),

    /// Repository has no worktree (bare repository).
    #[error("repository has no worktree (bare repository)")]
    BareRepository,
}

// --- Git Errors ---

/// Steps of the commit phase, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStep {
    Stage,
    Commit,
    Push,
}

impl fmt::Display for PublishStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stage => write!(f, "stage"),
            Self::Commit => write!(f, "commit"),
            Self::Push => write!(f, "push"),
        }
    }
}

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found at the specified path.
    #[error("repository not found: {path}")]
    RepoNotFound { path: String },

    /// Read-only query (status) failed; nothing downstream can run.
    #[error("git query failed: {command} - {message}")]
    QueryFailed { command: String, message: String },

    /// A stage/commit/push step exited non-zero.
    #[error("{step} failed: {command} - {message}")]
    MutationFailed {
        step: PublishStep,
        command: String,
        message: String,
    },

    /// Error from gix library.
    #[error("gix error: {0}")]
    Gix(#[from] GixError),
}

// --- Backup Errors ---

/// Per-file backup errors. Never abort the batch.
#[derive(Debug, Error)]
pub enum BackupError {
    /// Source is missing or not a regular file.
    #[error("path not found: {}", path.display())]
    PathNotFound { path: PathBuf },

    /// I/O failure while creating or writing the backup.
    #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
    CopyFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The directory holding the file could not be listed.
    #[error("failed to scan {} for existing backups: {source}", dir.display())]
    ScanFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File name is not valid UTF-8, so no backup name can be derived.
    #[error("unsupported file name: {}", path.display())]
    UnsupportedName { path: PathBuf },

    /// Existing backups already use the largest representable version.
    #[error("no version left after v{highest} for {}", path.display())]
    VersionExhausted { path: PathBuf, highest: u64 },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },
}
