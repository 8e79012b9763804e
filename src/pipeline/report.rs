// snapcommit: versioned backup and commit tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Outcome of one pipeline run.
//!
//! ```text
//! RunReport
//!   phase            last phase reached (Done or Failed when finished)
//!   changes          what git reported
//!   backups          ChangedFile -> backup path (repo-relative)
//!   failures         per-file, never abort the batch
//!   commit_message   set once at least one backup exists
//!   publish          Skipped{reason} | Succeeded{pushed} | Failed{step}
//! ```

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{BackupError, PublishStep};
use crate::git::status::ChangedFile;

/// Pipeline phases in the order they are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Idle,
    Detecting,
    BackingUp,
    Committing,
    Pushing,
    Done,
    Failed,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Detecting => "detecting",
            Self::BackingUp => "backing up",
            Self::Committing => "committing",
            Self::Pushing => "pushing",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A changed file and the backup made (or, in a dry run, planned) for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupRecord {
    pub source: ChangedFile,
    /// Relative to the repository root.
    pub backup: PathBuf,
}

/// Coarse classification of a per-file failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The file vanished between detection and backup.
    PathNotFound,
    /// Anything that went wrong creating the copy.
    CopyFailure,
}

impl From<&BackupError> for FailureKind {
    fn from(err: &BackupError) -> Self {
        match err {
            BackupError::PathNotFound { .. } => Self::PathNotFound,
            BackupError::CopyFailure { .. }
            | BackupError::ScanFailed { .. }
            | BackupError::UnsupportedName { .. }
            | BackupError::VersionExhausted { .. } => Self::CopyFailure,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    /// Repo-relative path of the changed file.
    pub path: PathBuf,
    pub kind: FailureKind,
    pub message: String,
}

/// Why the commit phase did not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    DetectionFailed,
    NothingToBackUp,
    NoBackupCreated,
    DryRun,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DetectionFailed => write!(f, "status query failed"),
            Self::NothingToBackUp => write!(f, "nothing to back up"),
            Self::NoBackupCreated => write!(f, "no backup was created"),
            Self::DryRun => write!(f, "dry run"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PublishOutcome {
    Skipped {
        reason: SkipReason,
    },
    /// `pushed` is false when pushing is disabled.
    Succeeded {
        pushed: bool,
    },
    Failed {
        step: PublishStep,
        command: String,
        message: String,
    },
}

/// Everything one invocation did, in a form that prints as text or JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub dry_run: bool,
    pub phase: RunPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection_error: Option<String>,
    pub changes: Vec<ChangedFile>,
    pub backups: Vec<BackupRecord>,
    pub failures: Vec<FileFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
    pub publish: PublishOutcome,
}

impl RunReport {
    #[must_use]
    pub const fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            phase: RunPhase::Idle,
            detection_error: None,
            changes: Vec::new(),
            backups: Vec::new(),
            failures: Vec::new(),
            commit_message: None,
            publish: PublishOutcome::Skipped {
                reason: SkipReason::NothingToBackUp,
            },
        }
    }

    /// True when the run finished and no backup hit a copy failure.
    ///
    /// Files that disappeared before they could be copied don't count
    /// against success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.phase == RunPhase::Done
            && !self
                .failures
                .iter()
                .any(|f| f.kind == FailureKind::CopyFailure)
    }

    /// Human-readable summary, one line per fact.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(error) = &self.detection_error {
            lines.push(format!("status query failed: {error}"));
            return lines;
        }

        let verb = if self.dry_run {
            "would back up"
        } else {
            "backed up"
        };
        for record in &self.backups {
            lines.push(format!(
                "{verb} {} -> {}",
                slash_path(&record.source.path),
                slash_path(&record.backup)
            ));
        }
        for failure in &self.failures {
            lines.push(format!(
                "failed {}: {}",
                slash_path(&failure.path),
                failure.message
            ));
        }

        match &self.publish {
            PublishOutcome::Skipped {
                reason: SkipReason::NothingToBackUp,
            } => lines.push("nothing to back up".to_string()),
            PublishOutcome::Skipped {
                reason: SkipReason::DryRun,
            } => {
                if let Some(message) = &self.commit_message {
                    lines.push(format!("would commit: {message}"));
                }
            }
            PublishOutcome::Skipped { reason } => lines.push(format!("commit skipped: {reason}")),
            PublishOutcome::Succeeded { pushed } => {
                if let Some(message) = &self.commit_message {
                    lines.push(format!("committed: {message}"));
                }
                lines.push(if *pushed { "pushed" } else { "push disabled" }.to_string());
            }
            PublishOutcome::Failed {
                step,
                command,
                message,
            } => lines.push(format!("{step} failed: {command}: {message}")),
        }

        lines
    }
}

/// Render a relative path with `/` separators on every platform.
#[must_use]
pub fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
