// snapcommit: versioned backup and commit tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! GitQuery (read)     --> ShellBackend (git status)
//! GitMutation (write) --> ShellBackend (git add/commit/push)
//! ```
//!
//! The pipeline is generic over both traits so tests can script git's
//! answers without spawning processes.

use crate::error::{GitError, ProcessError, PublishStep, SnapResult};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, trace};

/// Where `git push` sends the commit.
///
/// An empty target means a bare `git push`, leaving the choice to git's
/// configured upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushTarget {
    pub remote: Option<String>,
    /// Only meaningful together with `remote`.
    pub branch: Option<String>,
}

impl PushTarget {
    /// Arguments appended after `git push`.
    #[must_use]
    pub fn args(&self) -> Vec<&str> {
        match (&self.remote, &self.branch) {
            (Some(remote), Some(branch)) => vec![remote.as_str(), branch.as_str()],
            (Some(remote), None) => vec![remote.as_str()],
            (None, _) => Vec::new(),
        }
    }
}

// --- Query Trait (Read-only operations) ---

/// Read-only git query operations.
pub trait GitQuery {
    /// Raw `git status --porcelain` output for the working tree at `repo_root`.
    ///
    /// # Errors
    ///
    /// Returns `GitError::QueryFailed` if git cannot be run or exits non-zero.
    fn status_porcelain(&self, repo_root: &Path) -> SnapResult<String>;
}

// --- Mutation Trait (Write operations) ---

/// Git operations that modify repository state.
pub trait GitMutation {
    /// Stage every change in the working tree, including deletions.
    ///
    /// # Errors
    ///
    /// Returns `GitError::MutationFailed` with step `stage`.
    fn stage_all(&self, repo_root: &Path) -> SnapResult<()>;

    /// Commit the index with `message`.
    ///
    /// # Errors
    ///
    /// Returns `GitError::MutationFailed` with step `commit`.
    fn commit(&self, repo_root: &Path, message: &str) -> SnapResult<()>;

    /// Push the current branch.
    ///
    /// # Errors
    ///
    /// Returns `GitError::MutationFailed` with step `push`.
    fn push(&self, repo_root: &Path, target: &PushTarget) -> SnapResult<()>;
}

// --- ShellBackend Implementation (Git CLI) ---

/// Shell-based git backend using the git CLI.
#[derive(Debug, Clone)]
pub struct ShellBackend {
    program: PathBuf,
}

impl ShellBackend {
    /// Use a specific git executable.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Find `git` on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::ExecutableNotFound` if git is not installed.
    pub fn locate() -> SnapResult<Self> {
        let program = which::which("git").map_err(|_| ProcessError::ExecutableNotFound {
            name: "git".to_string(),
        })?;
        debug!(git = %program.display(), "using git executable");
        Ok(Self::new(program))
    }

    /// Execute a git command. Sets `GCM_INTERACTIVE=never` and `GIT_TERMINAL_PROMPT=0`.
    ///
    /// Returns stdout untrimmed: porcelain lines start with a significant space.
    /// `failed` builds the error from the command line and git's diagnostics;
    /// it is used both for spawn failures and non-zero exits.
    pub(crate) fn git_command<F>(&self, args: &[&str], cwd: &Path, failed: F) -> SnapResult<String>
    where
        F: FnOnce(String, String) -> GitError,
    {
        let command_line = format!("git {}", args.join(" "));
        trace!(command = %command_line, cwd = %cwd.display(), "running git");

        let output = match Command::new(&self.program)
            .args(args)
            .current_dir(cwd)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
        {
            Ok(output) => output,
            Err(e) => return Err(failed(command_line, format!("failed to execute git: {e}")).into()),
        };

        if !output.status.success() {
            return Err(failed(command_line, failure_message(&output)).into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn mutate(&self, step: PublishStep, args: &[&str], repo_root: &Path) -> SnapResult<()> {
        self.git_command(args, repo_root, |command, message| GitError::MutationFailed {
            step,
            command,
            message,
        })?;
        Ok(())
    }
}

/// Best diagnostic text for a failed command: stderr, else stdout, else the status.
fn failure_message(output: &std::process::Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        return stderr.trim().to_string();
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        return stdout.trim().to_string();
    }
    output.status.to_string()
}

impl GitQuery for ShellBackend {
    fn status_porcelain(&self, repo_root: &Path) -> SnapResult<String> {
        self.git_command(
            &["-c", "core.quotePath=false", "status", "--porcelain"],
            repo_root,
            |command, message| GitError::QueryFailed { command, message },
        )
    }
}

impl GitMutation for ShellBackend {
    fn stage_all(&self, repo_root: &Path) -> SnapResult<()> {
        self.mutate(PublishStep::Stage, &["add", "--all"], repo_root)
    }

    fn commit(&self, repo_root: &Path, message: &str) -> SnapResult<()> {
        self.mutate(
            PublishStep::Commit,
            &["commit", "--quiet", "-m", message],
            repo_root,
        )
    }

    fn push(&self, repo_root: &Path, target: &PushTarget) -> SnapResult<()> {
        let mut args = vec!["push", "--quiet"];
        args.extend(target.args());
        self.mutate(PublishStep::Push, &args, repo_root)
    }
}
