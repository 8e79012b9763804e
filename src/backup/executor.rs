// snapcommit: versioned backup and commit tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Copy a file to its next versioned name.
//!
//! ```text
//! backup(src)
//!   |-- missing / not a regular file ---------------> PathNotFound
//!   |-- stat fails otherwise -----------------------> CopyFailure
//!   v
//! next_version(src) --> open(dst, create_new)
//!   ^                        |
//!   |   AlreadyExists        |  ok
//!   +--- (retry <= N) -------+
//!                            v
//!              copy bytes --> permissions --> atime/mtime (best effort)
//!                  |
//!                  +-- io error: remove dst --> CopyFailure
//! ```

use std::fs::{self, File, FileTimes, Metadata, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use bon::Builder;
use tracing::{debug, info, warn};

use super::version::{next_version, source_metadata};
use crate::config::types::DEFAULT_COLLISION_RETRIES;
use crate::error::BackupError;

/// Creates versioned copies. Never overwrites an existing file.
#[derive(Debug, Clone, Builder)]
pub struct BackupExecutor {
    /// Re-resolutions allowed when the resolved name is taken at create time.
    #[builder(default = DEFAULT_COLLISION_RETRIES)]
    collision_retries: u32,
    /// Resolve names without creating anything.
    #[builder(default = false)]
    dry_run: bool,
}

impl Default for BackupExecutor {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl BackupExecutor {
    /// Copy `source` to `<stem>_v<N><ext>` next to it and return the new path.
    ///
    /// In dry-run mode the path that would be created is returned instead.
    ///
    /// # Errors
    ///
    /// - `PathNotFound` if `source` is missing or not a regular file; nothing is created.
    /// - `CopyFailure` if `source` exists but can't be inspected.
    /// - `CopyFailure` for any I/O error while creating or writing the copy,
    ///   or when every retry found its name already taken.
    /// - Any error from [`next_version`].
    pub fn backup(&self, source: &Path) -> Result<PathBuf, BackupError> {
        let metadata = source_metadata(source)?;

        if self.dry_run {
            let destination = next_version(source)?.path();
            debug!(source = %source.display(), backup = %destination.display(), "dry run, not copying");
            return Ok(destination);
        }

        let (destination, file) = create_exclusive(
            source,
            || next_version(source).map(|name| name.path()),
            self.collision_retries,
        )?;
        copy_into(source, file, &destination, &metadata)?;
        info!(source = %source.display(), backup = %destination.display(), "backed up");
        Ok(destination)
    }
}

/// Create the path `resolve` returns with `create_new`, calling it again
/// each time the name turns out to be taken, at most `retries` more times.
///
/// An existing file is never opened for writing.
pub(super) fn create_exclusive<F>(
    source: &Path,
    mut resolve: F,
    retries: u32,
) -> Result<(PathBuf, File), BackupError>
where
    F: FnMut() -> Result<PathBuf, BackupError>,
{
    let mut attempt = 0;
    loop {
        let destination = resolve()?;
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&destination)
        {
            Ok(file) => return Ok((destination, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists && attempt < retries => {
                attempt += 1;
                warn!(
                    backup = %destination.display(),
                    attempt,
                    "backup name taken since scan, resolving again"
                );
            }
            Err(e) => {
                return Err(BackupError::CopyFailure {
                    from: source.to_path_buf(),
                    to: destination,
                    source: e,
                });
            }
        }
    }
}

/// Fill the freshly created `file` and carry metadata over.
///
/// A failed write removes `destination` so no truncated backup is left behind.
pub(super) fn copy_into(
    source: &Path,
    mut file: File,
    destination: &Path,
    metadata: &Metadata,
) -> Result<(), BackupError> {
    let copied = File::open(source).and_then(|mut input| io::copy(&mut input, &mut file));
    if let Err(e) = copied {
        drop(file);
        if let Err(cleanup) = fs::remove_file(destination) {
            warn!(backup = %destination.display(), error = %cleanup, "failed to remove partial backup");
        }
        return Err(BackupError::CopyFailure {
            from: source.to_path_buf(),
            to: destination.to_path_buf(),
            source: e,
        });
    }

    preserve_metadata(&file, destination, metadata);
    Ok(())
}

/// Best effort: permission bits, then access/modification times.
fn preserve_metadata(file: &File, destination: &Path, metadata: &Metadata) {
    if let Err(e) = file.set_permissions(metadata.permissions()) {
        warn!(backup = %destination.display(), error = %e, "could not copy permissions");
    }

    let mut times = FileTimes::new();
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Err(e) = file.set_times(times) {
        warn!(backup = %destination.display(), error = %e, "could not copy timestamps");
    }
}
