// snapcommit: versioned backup and commit tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Changeset detection from `git status --porcelain`.
//!
//! ```text
//! XY PATH
//! |\
//! | worktree column
//! index column
//!
//! " M notes.txt"  -> Modified
//! "M  notes.txt"  -> Modified
//! "A  new.txt"    -> Added
//! "AM new.txt"    -> Added
//! "MM both.txt"   -> StagedAndModified
//! "?? scratch"    -> excluded (and D, R, C, U*, !!)
//! ```

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::backend::GitQuery;
use crate::error::SnapResult;

/// How a changed file differs from `HEAD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Modified,
    Added,
    StagedAndModified,
}

impl ChangeKind {
    /// Classify a two-character porcelain status code.
    ///
    /// The code is trimmed first, so `" M"` and `"M "` are both `Modified`.
    /// Returns `None` for every status outside the allow-list.
    #[must_use]
    pub fn from_status(code: &str) -> Option<Self> {
        match code.trim() {
            "M" => Some(Self::Modified),
            "A" | "AM" => Some(Self::Added),
            "MM" => Some(Self::StagedAndModified),
            _ => None,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Modified => "modified",
            Self::Added => "added",
            Self::StagedAndModified => "modified and staged",
        };
        f.pad(name)
    }
}

/// A file reported as changed, relative to the repository root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangedFile {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl ChangedFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Query git for the working tree status and keep the modified/added files.
///
/// # Errors
///
/// Returns `GitError::QueryFailed` if the status command can't run or exits
/// non-zero. An error is never turned into an empty changeset.
pub fn detect<Q: GitQuery>(git: &Q, repo_root: &Path) -> SnapResult<Vec<ChangedFile>> {
    let output = git.status_porcelain(repo_root)?;
    let changes = parse_porcelain(&output);
    info!(count = changes.len(), "detected changed files");
    Ok(changes)
}

/// Parse porcelain v1 output, keeping only allow-listed statuses, in order.
#[must_use]
pub fn parse_porcelain(output: &str) -> Vec<ChangedFile> {
    output.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<ChangedFile> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let (Some(code), Some(raw_path)) = (line.get(..2), line.get(3..)) else {
        if !line.is_empty() {
            debug!(line, "skipping malformed status line");
        }
        return None;
    };
    if raw_path.is_empty() {
        debug!(line, "skipping status line without a path");
        return None;
    }

    let Some(kind) = ChangeKind::from_status(code) else {
        debug!(status = code, path = raw_path, "status not eligible for backup");
        return None;
    };
    Some(ChangedFile::new(unquote_path(raw_path), kind))
}

/// Undo git's C-style quoting of unusual path names.
///
/// Unquoted input is returned as-is. Escapes: `\a \b \t \n \v \f \r \" \\`
/// and three-digit octal bytes, which are reassembled before UTF-8 decoding.
#[must_use]
pub fn unquote_path(raw: &str) -> String {
    let Some(inner) = raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return raw.to_string();
    };

    let mut bytes = Vec::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.next() {
            Some('a') => bytes.push(0x07),
            Some('b') => bytes.push(0x08),
            Some('t') => bytes.push(b'\t'),
            Some('n') => bytes.push(b'\n'),
            Some('v') => bytes.push(0x0b),
            Some('f') => bytes.push(0x0c),
            Some('r') => bytes.push(b'\r'),
            Some(d @ '0'..='7') => {
                let mut value = u32::from(d) - u32::from('0');
                for _ in 0..2 {
                    match chars.peek() {
                        Some(&n @ '0'..='7') => {
                            value = value * 8 + (u32::from(n) - u32::from('0'));
                            chars.next();
                        }
                        _ => break,
                    }
                }
                bytes.push(u8::try_from(value).unwrap_or(u8::MAX));
            }
            Some(other) => {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(other.encode_utf8(&mut buf).as_bytes());
            }
            None => bytes.push(b'\\'),
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}
