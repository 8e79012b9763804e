// snapcommit: versioned backup and commit tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations module.
//!
//! ```text
//!      discovery.rs        status.rs
//!   (gix, find root)   (porcelain parser)
//!          |                  |
//!          |                  v
//!          |       ,---------------------,
//!          |       |  backend (traits)   |
//!          |       '--+---------------+--'
//!          |          |               |
//!          v          v               v
//!     gix::discover  GitQuery     GitMutation
//!                   .status       .stage_all
//!                                 .commit
//!                                 .push
//!                       \           /
//!                        ShellBackend
//!                        (git CLI)
//! ```
//!
//! Reads and writes both go through the git CLI so that status output and
//! commits match exactly what the operator would see by hand. gix is only
//! used to locate the working tree.

pub mod backend;
pub mod discovery;
pub mod status;

#[cfg(test)]
mod tests;
