// snapcommit: versioned backup and commit tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Working tree discovery.
//!
//! ```text
//! /work/notes/          <-- returned root
//!   .git/
//!   drafts/
//!     chapter1.md
//!
//! find_worktree_root("/work/notes/drafts") == "/work/notes"
//! ```
//!
//! Porcelain status paths are relative to this root, so every later step
//! runs with it as the working directory.

use crate::error::{GitError, GixError, SnapResult};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Find the root of the working tree containing `start`.
///
/// # Errors
///
/// Returns `GitError::RepoNotFound` if `start` doesn't exist, a gix discovery
/// error if it isn't inside a repository, and `GixError::BareRepository` for
/// repositories without a working tree.
pub fn find_worktree_root(start: &Path) -> SnapResult<PathBuf> {
    let start = std::fs::canonicalize(start).map_err(|_| GitError::RepoNotFound {
        path: start.display().to_string(),
    })?;
    let repo =
        gix::discover(&start).map_err(|e| GitError::Gix(GixError::Discover(Box::new(e))))?;
    let workdir = repo
        .workdir()
        .ok_or(GitError::Gix(GixError::BareRepository))?;

    // gix may hand back a relative workdir; anchor it at the start path.
    let root = if workdir.is_absolute() {
        workdir.to_path_buf()
    } else {
        start.join(workdir)
    };
    let root = std::fs::canonicalize(&root).unwrap_or(root);
    debug!(root = %root.display(), "found working tree");
    Ok(root)
}
