// snapcommit: versioned backup and commit tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Read-only commands: `status` and `next`.

use serde::Serialize;
use std::path::PathBuf;

use super::resolve_repo_root;
use crate::backup::version::next_version;
use crate::cli::NextArgs;
use crate::config::Config;
use crate::error::{Result, bail_out};
use crate::git::backend::ShellBackend;
use crate::git::status::detect;
use crate::pipeline::report::slash_path;

/// Print the files a run would back up.
///
/// # Errors
///
/// Returns an error if git or the repository can't be found or the status
/// query fails.
pub fn run_status_command(config: &Config, json: bool) -> Result<()> {
    let git = ShellBackend::locate()?;
    let repo_root = resolve_repo_root(config)?;
    let changes = detect(&git, &repo_root)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&changes)?);
    } else if changes.is_empty() {
        println!("nothing to back up");
    } else {
        for change in &changes {
            println!("{:<20} {}", change.kind, slash_path(&change.path));
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct NextName {
    path: PathBuf,
    backup: PathBuf,
}

/// Print the name each file's next backup would get. Creates nothing.
///
/// # Errors
///
/// Returns an error if any path could not be resolved; the others are still
/// printed.
pub fn run_next_command(args: &NextArgs, json: bool) -> Result<()> {
    let mut resolved = Vec::new();
    let mut failed = 0usize;

    for path in &args.paths {
        match next_version(path) {
            Ok(name) => resolved.push(NextName {
                path: path.clone(),
                backup: path.with_file_name(name.file_name()),
            }),
            Err(e) => {
                failed += 1;
                eprintln!("{e}");
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
    } else {
        for name in &resolved {
            println!("{} -> {}", name.path.display(), name.backup.display());
        }
    }

    if failed > 0 {
        return Err(bail_out(format!("{failed} path(s) could not be resolved")).into());
    }
    Ok(())
}
