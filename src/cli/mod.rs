// snapcommit: versioned backup and commit tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for snapcommit using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! snapcommit [global options] [command]
//! (none) | run      back up changed files, commit, push
//! status            list the files a run would back up
//! next <PATH>...    show the backup name each file would get
//! options           print the effective configuration
//! version
//! ```

pub mod global;


use crate::cli::global::GlobalOptions;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Versioned backup and commit tool.
#[derive(Debug, Parser)]
#[command(
    name = "snapcommit",
    author,
    version,
    about = "Back up changed files as _vN copies, then commit and push",
    long_about = "snapcommit Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Every modified or added file reported by `git status` is copied\n\
                  to `<name>_v<N><ext>` next to itself, where N is one more than\n\
                  the highest existing version (the first copy is _v2). The whole\n\
                  tree is then staged, committed and pushed.\n\n\
                  Invoking `snapcommit` without a command performs a run.",
    after_help = "CONFIG FILES:\n\n\
                  No configuration file is read unless given with --config. Keys\n\
                  can also be set individually with --set section.key=value, and\n\
                  the dedicated flags (--remote, --no-push, ...) win over both."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Backs up changed files, then stages, commits and pushes.
    Run,

    /// Lists the changed files that a run would back up.
    Status,

    /// Shows the backup name the given files would get next.
    Next(NextArgs),

    /// Lists all options and their effective values.
    Options,

    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,
}

/// Arguments for `next`.
#[derive(Debug, Clone, Args)]
pub struct NextArgs {
    /// Files to resolve, relative to the current directory.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
