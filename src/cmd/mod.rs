// snapcommit: versioned backup and commit tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   run, status, next, options
//! ```

pub mod config;
pub mod inspect;
pub mod run;

use anyhow::Context;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::git::discovery::find_worktree_root;

/// Working tree root for `repo.root`, or for the current directory when unset.
///
/// # Errors
///
/// Returns an error if the current directory can't be read or the start
/// directory is not inside a non-bare git repository.
pub fn resolve_repo_root(config: &Config) -> Result<PathBuf> {
    let start = match &config.repo.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    let root = find_worktree_root(&start)?;
    tracing::debug!(root = %root.display(), "repository root");
    Ok(root)
}
