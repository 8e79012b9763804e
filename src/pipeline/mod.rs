// snapcommit: versioned backup and commit tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Detect, back up, then stage/commit/push.
//!
//! ```text
//! Idle --> Detecting --error--------------------------------> Failed
//!             |
//!             | changes (possibly none)
//!             v
//!          BackingUp --none / no backup created / dry run--> Done
//!             |            (per-file failures collected)
//!             | >= 1 backup
//!             v
//!          Committing: add --all, commit -m --error---------> Failed
//!             |
//!             v
//!          Pushing (unless disabled) --error----------------> Failed
//!             |
//!             v
//!           Done
//! ```
//!
//! A failed step stops the phase. Nothing is retried or rolled back:
//! backups and a local commit stay in place after a failed push.

pub mod report;


use bon::Builder;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::backup::executor::BackupExecutor;
use crate::config::Config;
use crate::config::types::{DEFAULT_COLLISION_RETRIES, DEFAULT_MESSAGE_PREFIX};
use crate::error::{GitError, PublishStep, SnapError};
use crate::git::backend::{GitMutation, GitQuery, PushTarget};
use crate::git::status::{self, ChangedFile};

use report::{
    BackupRecord, FailureKind, FileFailure, PublishOutcome, RunPhase, RunReport, SkipReason,
    slash_path,
};

/// Everything one run needs, passed explicitly.
#[derive(Debug, Clone, Builder)]
pub struct RunOptions {
    /// Root of the working tree; changed paths are relative to it.
    #[builder(into)]
    pub repo_root: PathBuf,
    #[builder(default)]
    pub push_target: PushTarget,
    /// When false the run stops after committing.
    #[builder(default = true)]
    pub push_enabled: bool,
    #[builder(into, default = DEFAULT_MESSAGE_PREFIX.to_string())]
    pub message_prefix: String,
    /// Detect and resolve names only.
    #[builder(default = false)]
    pub dry_run: bool,
    #[builder(default = DEFAULT_COLLISION_RETRIES)]
    pub collision_retries: u32,
}

impl RunOptions {
    /// Options for `repo_root` taken from a loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config, repo_root: PathBuf) -> Self {
        Self {
            repo_root,
            push_target: PushTarget {
                remote: config.push.remote.clone(),
                branch: config.push.branch.clone(),
            },
            push_enabled: config.push.enabled,
            message_prefix: config.commit.message_prefix.clone(),
            dry_run: config.global.dry,
            collision_retries: config.backup.collision_retries,
        }
    }
}

/// Build the commit message for a set of backups.
///
/// ```text
/// "<prefix>: notes_v2.txt, docs/guide_v5.md"
/// ```
#[must_use]
pub fn commit_message(prefix: &str, backups: &[BackupRecord]) -> String {
    let names: Vec<String> = backups.iter().map(|r| slash_path(&r.backup)).collect();
    format!("{prefix}: {}", names.join(", "))
}

/// Drives a single pass of the pipeline against a git backend.
pub struct CommitOrchestrator<'a, G> {
    git: &'a G,
    options: RunOptions,
    executor: BackupExecutor,
}

impl<'a, G> CommitOrchestrator<'a, G>
where
    G: GitQuery + GitMutation,
{
    #[must_use]
    pub fn new(git: &'a G, options: RunOptions) -> Self {
        let executor = BackupExecutor::builder()
            .collision_retries(options.collision_retries)
            .dry_run(options.dry_run)
            .build();
        Self {
            git,
            options,
            executor,
        }
    }

    /// Run the pipeline once.
    ///
    /// Never returns an error: every failure is recorded in the report, and
    /// [`RunReport::is_success`] tells the caller how to exit.
    pub fn run(&self) -> RunReport {
        let mut report = RunReport::new(self.options.dry_run);

        enter(&mut report, RunPhase::Detecting);
        match status::detect(self.git, &self.options.repo_root) {
            Ok(changes) => report.changes = changes,
            Err(e) => {
                error!(error = %e, "could not determine changed files");
                report.detection_error = Some(detection_message(&e));
                report.publish = PublishOutcome::Skipped {
                    reason: SkipReason::DetectionFailed,
                };
                enter(&mut report, RunPhase::Failed);
                return report;
            }
        }

        enter(&mut report, RunPhase::BackingUp);
        if report.changes.is_empty() {
            info!("nothing to back up");
            report.publish = PublishOutcome::Skipped {
                reason: SkipReason::NothingToBackUp,
            };
            enter(&mut report, RunPhase::Done);
            return report;
        }
        self.back_up_all(&mut report);

        if report.backups.is_empty() {
            warn!(
                failures = report.failures.len(),
                "no backup was created, skipping commit"
            );
            report.publish = PublishOutcome::Skipped {
                reason: SkipReason::NoBackupCreated,
            };
            enter(&mut report, RunPhase::Done);
            return report;
        }

        let message = commit_message(&self.options.message_prefix, &report.backups);
        report.commit_message = Some(message.clone());

        if self.options.dry_run {
            info!(message = %message, "dry run, not committing");
            report.publish = PublishOutcome::Skipped {
                reason: SkipReason::DryRun,
            };
            enter(&mut report, RunPhase::Done);
            return report;
        }

        report.publish = match self.publish(&mut report, &message) {
            Ok(pushed) => {
                enter(&mut report, RunPhase::Done);
                PublishOutcome::Succeeded { pushed }
            }
            Err(outcome) => {
                enter(&mut report, RunPhase::Failed);
                outcome
            }
        };
        report
    }

    fn back_up_all(&self, report: &mut RunReport) {
        let root = &self.options.repo_root;
        for change in &report.changes {
            let source = root.join(&change.path);
            match self.executor.backup(&source) {
                Ok(created) => {
                    let backup = relative_to(&created, root);
                    report.backups.push(BackupRecord {
                        source: change.clone(),
                        backup,
                    });
                }
                Err(e) => {
                    let kind = FailureKind::from(&e);
                    warn!(path = %change.path.display(), error = %e, "backup failed");
                    report.failures.push(failure(change, kind, e.to_string()));
                }
            }
        }
        info!(
            created = report.backups.len(),
            failed = report.failures.len(),
            "backups finished"
        );
    }

    /// Stage, commit and (optionally) push. `Ok(pushed)` on success.
    fn publish(&self, report: &mut RunReport, message: &str) -> Result<bool, PublishOutcome> {
        let root = &self.options.repo_root;

        enter(report, RunPhase::Committing);
        self.git.stage_all(root).map_err(publish_failure)?;
        self.git.commit(root, message).map_err(publish_failure)?;
        info!(message, "committed");

        if !self.options.push_enabled {
            info!("push disabled, stopping after commit");
            return Ok(false);
        }

        enter(report, RunPhase::Pushing);
        self.git
            .push(root, &self.options.push_target)
            .map_err(publish_failure)?;
        info!("pushed");
        Ok(true)
    }
}

fn enter(report: &mut RunReport, phase: RunPhase) {
    debug!(from = %report.phase, to = %phase, "phase");
    report.phase = phase;
}

fn failure(change: &ChangedFile, kind: FailureKind, message: String) -> FileFailure {
    FileFailure {
        path: change.path.clone(),
        kind,
        message,
    }
}

fn relative_to(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
}

fn detection_message(err: &SnapError) -> String {
    match err {
        SnapError::Git(git) => match git.as_ref() {
            GitError::QueryFailed { command, message } => format!("{command}: {message}"),
            other => other.to_string(),
        },
        other => other.to_string(),
    }
}

/// Turn a mutation error into the report's failed outcome.
fn publish_failure(err: SnapError) -> PublishOutcome {
    let outcome = match &err {
        SnapError::Git(git) => match git.as_ref() {
            GitError::MutationFailed {
                step,
                command,
                message,
            } => PublishOutcome::Failed {
                step: *step,
                command: command.clone(),
                message: message.clone(),
            },
            other => unknown_step(other.to_string()),
        },
        other => unknown_step(other.to_string()),
    };
    error!(error = %err, "commit phase failed");
    outcome
}

// Backends only return MutationFailed from mutations; anything else is
// attributed to staging, the first step.
fn unknown_step(message: String) -> PublishOutcome {
    PublishOutcome::Failed {
        step: PublishStep::Stage,
        command: String::new(),
        message,
    }
}
