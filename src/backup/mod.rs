// snapcommit: versioned backup and commit tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Versioned file backups.
//!
//! ```text
//! version:   next_version()    scan siblings, pick max(_vN)+1 (or 2)
//! executor:  BackupExecutor    exclusive create + copy + metadata
//! ```

pub mod executor;
pub mod version;

#[cfg(test)]
mod tests;
