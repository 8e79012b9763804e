// snapcommit: versioned backup and commit tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Next free `_v<N>` name for a file.
//!
//! ```text
//! drafts/notes.txt
//!   siblings: notes_v2.txt notes_v7.txt notes_v3.txt.bak Notes_v9.txt
//!   matched:  2, 7            (anchored, case-sensitive)
//!   next:     drafts/notes_v8.txt
//!
//! no siblings match -> notes_v2.txt   (numbering starts at 2)
//! ```
//!
//! The scan and the later create are not atomic: another process can take
//! the name in between. The executor creates exclusively and re-resolves.

use regex::Regex;
use std::fmt;
use std::fs::{self, Metadata};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::error::BackupError;

/// Version used when no backup exists yet.
pub const FIRST_VERSION: u64 = 2;

/// A resolved backup name: `<stem>_v<version><extension>` inside `directory`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedBackupName {
    pub directory: PathBuf,
    pub stem: String,
    pub version: u64,
    /// Includes the leading dot; empty for files without an extension.
    pub extension: String,
}

impl VersionedBackupName {
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}_v{}{}", self.stem, self.version, self.extension)
    }

    /// Full path of the backup file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.directory.join(self.file_name())
    }
}

impl fmt::Display for VersionedBackupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

/// Compute the next unused backup name for `path`.
///
/// # Errors
///
/// - `PathNotFound` if `path` does not exist or is not a regular file.
/// - `CopyFailure` if `path` exists but can't be inspected.
/// - `UnsupportedName` if the file name is not valid UTF-8.
/// - `ScanFailed` if the containing directory can't be listed.
/// - `VersionExhausted` if an existing backup already uses `u64::MAX`.
pub fn next_version(path: &Path) -> Result<VersionedBackupName, BackupError> {
    source_metadata(path)?;

    let (directory, stem, extension) = split_name(path)?;
    let pattern = version_pattern(&stem, &extension).map_err(|e| BackupError::ScanFailed {
        dir: directory.clone(),
        source: io::Error::other(e),
    })?;

    let highest = scan_versions(&directory, &pattern)?.into_iter().max();
    let version = match highest {
        None => FIRST_VERSION,
        Some(highest) => highest
            .checked_add(1)
            .ok_or_else(|| BackupError::VersionExhausted {
                path: path.to_path_buf(),
                highest,
            })?,
    };

    let name = VersionedBackupName {
        directory,
        stem,
        version,
        extension,
    };
    debug!(source = %path.display(), backup = %name, ?highest, "resolved backup name");
    Ok(name)
}

/// Metadata of a backup source that must be an existing regular file.
///
/// A missing file or a non-file is `PathNotFound`. Any other I/O error,
/// such as a permission error on the parent directory, is `CopyFailure`.
pub(crate) fn source_metadata(path: &Path) -> Result<Metadata, BackupError> {
    classify_source(path, fs::metadata(path))
}

pub(crate) fn classify_source(
    path: &Path,
    metadata: io::Result<Metadata>,
) -> Result<Metadata, BackupError> {
    match metadata {
        Ok(metadata) if metadata.is_file() => Ok(metadata),
        Ok(_) => Err(BackupError::PathNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(BackupError::PathNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(BackupError::CopyFailure {
            from: path.to_path_buf(),
            to: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Split into (directory, stem, extension-with-dot).
///
/// Follows `Path::file_stem`: the extension is what follows the last dot,
/// unless that dot is the first character (`.bashrc` has none).
fn split_name(path: &Path) -> Result<(PathBuf, String, String), BackupError> {
    let unsupported = || BackupError::UnsupportedName {
        path: path.to_path_buf(),
    };

    let stem = path
        .file_stem()
        .ok_or_else(unsupported)?
        .to_str()
        .ok_or_else(unsupported)?
        .to_string();
    let extension = match path.extension() {
        Some(ext) => format!(".{}", ext.to_str().ok_or_else(unsupported)?),
        None => String::new(),
    };
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((directory, stem, extension))
}

/// Anchored `^<stem>_v([0-9]+)<ext>$` with both literals escaped.
pub(crate) fn version_pattern(stem: &str, extension: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        "^{}_v([0-9]+){}$",
        regex::escape(stem),
        regex::escape(extension)
    ))
}

/// Version numbers of every directory entry whose name matches `pattern`.
///
/// Names that aren't UTF-8 or whose number doesn't fit in a `u64` are skipped.
fn scan_versions(directory: &Path, pattern: &Regex) -> Result<Vec<u64>, BackupError> {
    let scan_failed = |source| BackupError::ScanFailed {
        dir: directory.to_path_buf(),
        source,
    };

    let mut versions = Vec::new();
    for entry in fs::read_dir(directory).map_err(scan_failed)? {
        let entry = entry.map_err(scan_failed)?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Some(digits) = pattern.captures(name).and_then(|c| c.get(1)) else {
            continue;
        };
        match digits.as_str().parse::<u64>() {
            Ok(version) => {
                trace!(name, version, "existing backup");
                versions.push(version);
            }
            Err(_) => debug!(name, "ignoring backup with out-of-range version"),
        }
    }
    Ok(versions)
}
