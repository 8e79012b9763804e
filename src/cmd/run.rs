// snapcommit: versioned backup and commit tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The default command: one full pipeline run.

use tracing::info;

use super::resolve_repo_root;
use crate::config::Config;
use crate::error::{Result, bail_out};
use crate::git::backend::ShellBackend;
use crate::pipeline::report::{PublishOutcome, RunReport};
use crate::pipeline::{CommitOrchestrator, RunOptions};

/// Run the pipeline and print its report.
///
/// # Errors
///
/// Returns an error if git or the repository can't be found, or if the run
/// itself did not succeed (status query failed, commit phase failed, or a
/// backup could not be written). The report is printed in every case.
pub fn run_pipeline_command(config: &Config, json: bool) -> Result<()> {
    let git = ShellBackend::locate()?;
    let repo_root = resolve_repo_root(config)?;
    let options = RunOptions::from_config(config, repo_root);
    info!(
        root = %options.repo_root.display(),
        dry = options.dry_run,
        push = options.push_enabled,
        "starting run"
    );

    let report = CommitOrchestrator::new(&git, options).run();
    print_report(&report, json)?;

    if report.is_success() {
        Ok(())
    } else {
        Err(bail_out(failure_summary(&report)).into())
    }
}

fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        for line in report.summary_lines() {
            println!("{line}");
        }
    }
    Ok(())
}

fn failure_summary(report: &RunReport) -> String {
    if report.detection_error.is_some() {
        return "could not determine changed files".to_string();
    }
    if let PublishOutcome::Failed { step, .. } = &report.publish {
        return format!("commit phase failed at {step}");
    }
    format!(
        "{} of {} file(s) could not be backed up",
        report.failures.len(),
        report.changes.len()
    )
}
