// snapcommit: versioned backup and commit tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::executor::{BackupExecutor, copy_into, create_exclusive};
use super::version::{FIRST_VERSION, classify_source, next_version, version_pattern};
use crate::error::BackupError;
use crate::pipeline::report::FailureKind;
use std::cell::Cell;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn touch(dir: &Path, name: &str) {
    std::fs::write(dir.join(name), name).expect("failed to create file");
}

fn names_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok()?.file_name().into_string().ok())
        .collect();
    names.sort();
    names
}

// =============================================================================
// next_version
// =============================================================================

#[test]
fn test_first_backup_is_v2_not_v1() {
    let temp = temp_dir();
    touch(temp.path(), "notes.txt");

    let name = next_version(&temp.path().join("notes.txt")).unwrap();
    assert_eq!(name.version, FIRST_VERSION);
    assert_eq!(name.file_name(), "notes_v2.txt");
    assert_eq!(name.path(), temp.path().join("notes_v2.txt"));
}

#[test]
fn test_next_is_max_plus_one() {
    let temp = temp_dir();
    for name in ["notes.txt", "notes_v2.txt", "notes_v10.txt", "notes_v3.txt"] {
        touch(temp.path(), name);
    }

    let name = next_version(&temp.path().join("notes.txt")).unwrap();
    assert_eq!(name.file_name(), "notes_v11.txt");
}

#[test]
fn test_gaps_are_not_filled() {
    let temp = temp_dir();
    touch(temp.path(), "a.md");
    touch(temp.path(), "a_v7.md");

    assert_eq!(next_version(&temp.path().join("a.md")).unwrap().version, 8);
}

#[test]
fn test_pattern_is_anchored_and_exact() {
    let temp = temp_dir();
    for name in [
        "notes.txt",
        "notes_v9.txt.bak",
        "old_notes_v8.txt",
        "Notes_v7.txt",
        "notes_v6.md",
        "notes_vX.txt",
        "notes_v.txt",
    ] {
        touch(temp.path(), name);
    }

    let name = next_version(&temp.path().join("notes.txt")).unwrap();
    assert_eq!(name.file_name(), "notes_v2.txt");
}

#[test]
fn test_stem_with_regex_metacharacters() {
    let temp = temp_dir();
    touch(temp.path(), "a+b (1).txt");
    touch(temp.path(), "a+b (1)_v4.txt");
    touch(temp.path(), "aab (1)_v9.txt");

    let name = next_version(&temp.path().join("a+b (1).txt")).unwrap();
    assert_eq!(name.file_name(), "a+b (1)_v5.txt");
}

#[test]
fn test_extension_handling() {
    let temp = temp_dir();
    for name in ["archive.tar.gz", "Makefile", ".bashrc", "Makefile_v3"] {
        touch(temp.path(), name);
    }

    let resolve = |n: &str| next_version(&temp.path().join(n)).unwrap().file_name();
    assert_eq!(resolve("archive.tar.gz"), "archive.tar_v2.gz");
    assert_eq!(resolve("Makefile"), "Makefile_v4");
    assert_eq!(resolve(".bashrc"), ".bashrc_v2");
}

#[test]
fn test_out_of_range_versions_are_ignored() {
    let temp = temp_dir();
    touch(temp.path(), "big.txt");
    touch(temp.path(), "big_v99999999999999999999999.txt");
    touch(temp.path(), "big_v5.txt");

    assert_eq!(next_version(&temp.path().join("big.txt")).unwrap().version, 6);
}

#[test]
fn test_version_exhausted() {
    let temp = temp_dir();
    touch(temp.path(), "max.txt");
    touch(temp.path(), &format!("max_v{}.txt", u64::MAX));

    let err = next_version(&temp.path().join("max.txt")).unwrap_err();
    assert!(matches!(err, BackupError::VersionExhausted { highest, .. } if highest == u64::MAX));
}

#[test]
fn test_next_version_missing_file() {
    let temp = temp_dir();
    let err = next_version(&temp.path().join("ghost.txt")).unwrap_err();
    assert!(matches!(err, BackupError::PathNotFound { .. }));
}

#[test]
fn test_next_version_rejects_directory() {
    let temp = temp_dir();
    std::fs::create_dir(temp.path().join("folder")).unwrap();
    let err = next_version(&temp.path().join("folder")).unwrap_err();
    assert!(matches!(err, BackupError::PathNotFound { .. }));
}

#[test]
fn test_next_version_does_not_create_files() {
    let temp = temp_dir();
    touch(temp.path(), "notes.txt");
    let _ = next_version(&temp.path().join("notes.txt")).unwrap();
    assert_eq!(names_in(temp.path()), vec!["notes.txt"]);
}

#[test]
fn test_version_pattern_captures_digits() {
    let pattern = version_pattern("report", ".pdf").unwrap();
    let caps = pattern.captures("report_v42.pdf").unwrap();
    assert_eq!(&caps[1], "42");
    assert!(!pattern.is_match("report_v42.pdfx"));
    assert!(!pattern.is_match("xreport_v42.pdf"));
}

// =============================================================================
// BackupExecutor
// =============================================================================

#[test]
fn test_backup_copies_content() {
    let temp = temp_dir();
    let source = temp.path().join("notes.txt");
    std::fs::write(&source, "draft one").unwrap();

    let created = BackupExecutor::default().backup(&source).unwrap();
    assert_eq!(created, temp.path().join("notes_v2.txt"));
    assert_eq!(std::fs::read_to_string(&created).unwrap(), "draft one");
    assert_eq!(std::fs::read_to_string(&source).unwrap(), "draft one");
}

#[test]
fn test_backup_missing_source_creates_nothing() {
    let temp = temp_dir();
    let err = BackupExecutor::default()
        .backup(&temp.path().join("vanished.txt"))
        .unwrap_err();
    assert!(matches!(err, BackupError::PathNotFound { .. }));
    assert!(names_in(temp.path()).is_empty());
}

#[test]
fn test_sequential_backups_never_overwrite() {
    let temp = temp_dir();
    let source = temp.path().join("notes.txt");
    std::fs::write(&source, "first").unwrap();

    let executor = BackupExecutor::default();
    let first = executor.backup(&source).unwrap();
    std::fs::write(&source, "second").unwrap();
    let second = executor.backup(&source).unwrap();

    assert_ne!(first, second);
    assert_eq!(first.file_name().unwrap(), "notes_v2.txt");
    assert_eq!(second.file_name().unwrap(), "notes_v3.txt");
    assert_eq!(std::fs::read_to_string(first).unwrap(), "first");
    assert_eq!(std::fs::read_to_string(second).unwrap(), "second");
}

#[test]
fn test_backup_preserves_mtime() {
    let temp = temp_dir();
    let source = temp.path().join("dated.txt");
    std::fs::write(&source, "x").unwrap();
    let past = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
    std::fs::File::options()
        .write(true)
        .open(&source)
        .unwrap()
        .set_modified(past)
        .unwrap();

    let created = BackupExecutor::default().backup(&source).unwrap();
    let modified = std::fs::metadata(created).unwrap().modified().unwrap();
    assert_eq!(modified, past);
}

#[cfg(unix)]
#[test]
fn test_backup_preserves_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let temp = temp_dir();
    let source = temp.path().join("script.sh");
    std::fs::write(&source, "#!/bin/sh\n").unwrap();
    std::fs::set_permissions(&source, std::fs::Permissions::from_mode(0o750)).unwrap();

    let created = BackupExecutor::default().backup(&source).unwrap();
    let mode = std::fs::metadata(created).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o750);
}

#[test]
fn test_dry_run_creates_nothing() {
    let temp = temp_dir();
    touch(temp.path(), "notes.txt");
    touch(temp.path(), "notes_v4.txt");

    let executor = BackupExecutor::builder().dry_run(true).build();
    let would_create = executor.backup(&temp.path().join("notes.txt")).unwrap();
    assert_eq!(would_create, temp.path().join("notes_v5.txt"));
    assert_eq!(names_in(temp.path()), vec!["notes.txt", "notes_v4.txt"]);
}

#[test]
fn test_backup_in_subdirectory() {
    let temp = temp_dir();
    let nested = temp.path().join("drafts");
    std::fs::create_dir(&nested).unwrap();
    touch(&nested, "ch1.md");
    touch(&nested, "ch1_v3.md");
    // same name at the top level must not count
    touch(temp.path(), "ch1_v9.md");

    let created = BackupExecutor::default()
        .backup(&nested.join("ch1.md"))
        .unwrap();
    assert_eq!(created, nested.join("ch1_v4.md"));
}

// =============================================================================
// Source classification
// =============================================================================

#[test]
fn test_missing_source_is_path_not_found() {
    let path = Path::new("gone.txt");
    let err = classify_source(path, Err(io::Error::from(ErrorKind::NotFound))).unwrap_err();
    assert!(matches!(err, BackupError::PathNotFound { .. }));
    assert_eq!(FailureKind::from(&err), FailureKind::PathNotFound);
}

#[test]
fn test_unreadable_source_is_copy_failure() {
    let path = Path::new("locked/notes.txt");
    let err =
        classify_source(path, Err(io::Error::from(ErrorKind::PermissionDenied))).unwrap_err();
    let BackupError::CopyFailure { from, source, .. } = &err else {
        panic!("expected CopyFailure, got {err:?}");
    };
    assert_eq!(from.as_path(), path);
    assert_eq!(source.kind(), ErrorKind::PermissionDenied);
    assert_eq!(FailureKind::from(&err), FailureKind::CopyFailure);
}

#[cfg(unix)]
#[test]
fn test_backup_in_unsearchable_directory_is_copy_failure() {
    use std::os::unix::fs::PermissionsExt;

    let temp = temp_dir();
    let locked = temp.path().join("locked");
    std::fs::create_dir(&locked).unwrap();
    touch(&locked, "notes.txt");
    let source = locked.join("notes.txt");

    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();
    let still_visible = std::fs::metadata(&source).is_ok();
    let result = BackupExecutor::default().backup(&source);
    let next = next_version(&source);
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

    // root ignores directory permissions
    if still_visible {
        return;
    }
    let err = result.unwrap_err();
    assert!(matches!(err, BackupError::CopyFailure { .. }), "{err:?}");
    assert!(matches!(next.unwrap_err(), BackupError::CopyFailure { .. }));
    assert_eq!(names_in(&locked), vec!["notes.txt"]);
}

// =============================================================================
// Exclusive create and partial copies
// =============================================================================

#[test]
fn test_create_exclusive_gives_up_after_retries() {
    let temp = temp_dir();
    touch(temp.path(), "notes_v2.txt");
    let taken = temp.path().join("notes_v2.txt");
    let calls = Cell::new(0u32);

    let err = create_exclusive(
        &temp.path().join("notes.txt"),
        || {
            calls.set(calls.get() + 1);
            Ok(taken.clone())
        },
        3,
    )
    .unwrap_err();

    assert_eq!(calls.get(), 4);
    let BackupError::CopyFailure { to, source, .. } = err else {
        panic!("expected CopyFailure");
    };
    assert_eq!(to, taken);
    assert_eq!(source.kind(), ErrorKind::AlreadyExists);
    assert_eq!(std::fs::read_to_string(&taken).unwrap(), "notes_v2.txt");
}

#[test]
fn test_create_exclusive_zero_retries_tries_once() {
    let temp = temp_dir();
    touch(temp.path(), "a_v2.txt");
    let calls = Cell::new(0u32);

    let result = create_exclusive(
        &temp.path().join("a.txt"),
        || {
            calls.set(calls.get() + 1);
            Ok(temp.path().join("a_v2.txt"))
        },
        0,
    );
    assert!(result.is_err());
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_create_exclusive_moves_past_taken_name() {
    let temp = temp_dir();
    touch(temp.path(), "notes_v2.txt");
    let mut candidates = vec![
        temp.path().join("notes_v3.txt"),
        temp.path().join("notes_v2.txt"),
    ];

    let (created, _file) = create_exclusive(
        &temp.path().join("notes.txt"),
        || Ok(candidates.pop().expect("resolved too often")),
        8,
    )
    .unwrap();

    assert_eq!(created, temp.path().join("notes_v3.txt"));
    assert!(candidates.is_empty());
    // the taken name keeps its content
    assert_eq!(
        std::fs::read_to_string(temp.path().join("notes_v2.txt")).unwrap(),
        "notes_v2.txt"
    );
    assert_eq!(std::fs::read_to_string(&created).unwrap(), "");
}

#[test]
fn test_create_exclusive_propagates_resolve_error() {
    let temp = temp_dir();
    let err = create_exclusive(
        &temp.path().join("x.txt"),
        || {
            Err(BackupError::PathNotFound {
                path: PathBuf::from("x.txt"),
            })
        },
        8,
    )
    .unwrap_err();
    assert!(matches!(err, BackupError::PathNotFound { .. }));
    assert!(names_in(temp.path()).is_empty());
}

#[cfg(unix)]
#[test]
fn test_failed_copy_removes_destination() {
    let temp = temp_dir();
    touch(temp.path(), "notes.txt");
    let metadata = std::fs::metadata(temp.path().join("notes.txt")).unwrap();
    // opening a directory works on unix, reading it does not
    let source = temp.path().join("folder");
    std::fs::create_dir(&source).unwrap();
    let destination = temp.path().join("folder_v2");
    let file = std::fs::File::create_new(&destination).unwrap();

    let err = copy_into(&source, file, &destination, &metadata).unwrap_err();
    assert!(matches!(err, BackupError::CopyFailure { .. }));
    assert!(!destination.exists());
    assert_eq!(names_in(temp.path()), vec!["folder", "notes.txt"]);
}
