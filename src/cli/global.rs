// snapcommit: versioned backup and commit tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --config FILE     ← TOML config file(s) (can repeat)
//! --set KEY=VAL     ← Direct config override
//! -C/--repo DIR     ← repo.root
//! --remote/--branch ← push.remote / push.branch
//! --no-push         ← push.enabled=false
//! --dry             ← global.dry
//! --log-level N     ← Console verbosity (0-6)
//! --file-log-level  ← File verbosity (overrides --log-level)
//!
//! Precedence: CLI flags > --set > --config > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to a TOML configuration file.
    /// Can be specified multiple times; later files win.
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true, action = clap::ArgAction::Append)]
    pub configs: Vec<PathBuf>,

    /// Sets an option, such as 'push.remote=origin' or 'commit/message_prefix=Snapshot'.
    /// Can be specified multiple times.
    #[arg(short = 's', long = "set", value_name = "OPTION", global = true, action = clap::ArgAction::Append)]
    pub options: Vec<String>,

    /// Any directory inside the repository (defaults to the current directory).
    #[arg(short = 'C', long = "repo", value_name = "DIR", global = true)]
    pub repo: Option<PathBuf>,

    /// Remote to push to. Without it a plain `git push` is run.
    #[arg(long, value_name = "NAME", global = true)]
    pub remote: Option<String>,

    /// Branch to push; requires --remote.
    #[arg(long, value_name = "NAME", global = true, requires = "remote")]
    pub branch: Option<String>,

    /// Commit but don't push.
    #[arg(long = "no-push", global = true)]
    pub no_push: bool,

    /// Shows what would be backed up and committed without writing anything.
    #[arg(long, global = true)]
    pub dry: bool,

    /// Prints the run report as JSON instead of a summary.
    #[arg(long, global = true)]
    pub json: bool,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(
        short = 'l',
        long = "log-level",
        value_name = "LEVEL",
        global = true,
        value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub log_level: Option<u8>,

    /// File log level, overrides --log-level for the log file.
    #[arg(
        long = "file-log-level",
        value_name = "LEVEL",
        global = true,
        value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,
}

impl GlobalOptions {
    /// Converts command-line options to `section/key=value` configuration overrides.
    ///
    /// Explicit `--set` values come first so dedicated flags override them.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<String> {
        let mut overrides = self.options.clone();

        if let Some(level) = self.log_level {
            overrides.push(format!("global/output_log_level={level}"));
        }

        // file_log_level falls back to log_level if not specified
        if let Some(level) = self.file_log_level.or(self.log_level) {
            overrides.push(format!("global/file_log_level={level}"));
        }

        if let Some(ref path) = self.log_file {
            overrides.push(format!("global/log_file={}", path.display()));
        }

        if self.dry {
            overrides.push("global/dry=true".to_string());
        }

        if let Some(ref repo) = self.repo {
            overrides.push(format!("repo/root={}", repo.display()));
        }

        if let Some(ref remote) = self.remote {
            overrides.push(format!("push/remote={remote}"));
        }

        if let Some(ref branch) = self.branch {
            overrides.push(format!("push/branch={branch}"));
        }

        if self.no_push {
            overrides.push("push/enabled=false".to_string());
        }

        overrides
    }
}
