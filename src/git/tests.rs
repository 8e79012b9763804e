// snapcommit: versioned backup and commit tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{GitError, SnapError, SnapResult};
use crate::git::backend::GitQuery;
use crate::git::discovery::find_worktree_root;
use crate::git::status::{ChangeKind, ChangedFile, detect, parse_porcelain, unquote_path};
use std::path::Path;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

/// Canned status output, or a canned failure.
struct FixedStatus(Result<&'static str, &'static str>);

impl GitQuery for FixedStatus {
    fn status_porcelain(&self, _repo_root: &Path) -> SnapResult<String> {
        match self.0 {
            Ok(out) => Ok(out.to_string()),
            Err(message) => Err(GitError::QueryFailed {
                command: "git status --porcelain".to_string(),
                message: message.to_string(),
            }
            .into()),
        }
    }
}

#[test]
fn test_parse_keeps_modified_and_added_only() {
    let output = " M a.txt\n?? b.txt\nA  c.txt\n";
    assert_eq!(
        parse_porcelain(output),
        vec![
            ChangedFile::new("a.txt", ChangeKind::Modified),
            ChangedFile::new("c.txt", ChangeKind::Added),
        ]
    );
}

#[test]
fn test_parse_full_allow_list() {
    let output = "M  staged.txt\n M unstaged.txt\nAM added_then_edited.txt\nMM both.txt\n";
    let kinds: Vec<_> = parse_porcelain(output)
        .into_iter()
        .map(|c| (c.path.display().to_string(), c.kind))
        .collect();
    insta::assert_debug_snapshot!(kinds, @r#"
    [
        (
            "staged.txt",
            Modified,
        ),
        (
            "unstaged.txt",
            Modified,
        ),
        (
            "added_then_edited.txt",
            Added,
        ),
        (
            "both.txt",
            StagedAndModified,
        ),
    ]
    "#);
}

#[test]
fn test_parse_excludes_other_statuses() {
    let output = " D deleted.txt\nD  removed.txt\nR  old.txt -> new.txt\n\
                  UU conflict.txt\n!! ignored.log\n?? untracked.txt\nC  copy.txt\n";
    assert!(parse_porcelain(output).is_empty());
}

#[test]
fn test_parse_skips_malformed_lines() {
    let output = "\nM\n M \n M kept.txt\r\n";
    assert_eq!(
        parse_porcelain(output),
        vec![ChangedFile::new("kept.txt", ChangeKind::Modified)]
    );
}

#[test]
fn test_parse_nested_and_quoted_paths() {
    let output = " M docs/guide.md\n M \"with space.txt\"\n";
    assert_eq!(
        parse_porcelain(output),
        vec![
            ChangedFile::new("docs/guide.md", ChangeKind::Modified),
            ChangedFile::new("with space.txt", ChangeKind::Modified),
        ]
    );
}

#[test]
fn test_unquote_path() {
    assert_eq!(unquote_path("plain.txt"), "plain.txt");
    assert_eq!(unquote_path(r#""tab\there.txt""#), "tab\there.txt");
    assert_eq!(unquote_path(r#""quote\"d.txt""#), "quote\"d.txt");
    assert_eq!(unquote_path(r#""back\\slash""#), "back\\slash");
    // "ü" as octal UTF-8 bytes
    assert_eq!(unquote_path(r#""\303\274ber.txt""#), "über.txt");
}

#[test]
fn test_change_kind_from_status() {
    assert_eq!(ChangeKind::from_status(" M"), Some(ChangeKind::Modified));
    assert_eq!(ChangeKind::from_status("M "), Some(ChangeKind::Modified));
    assert_eq!(ChangeKind::from_status("A "), Some(ChangeKind::Added));
    assert_eq!(ChangeKind::from_status("??"), None);
    assert_eq!(ChangeKind::from_status("AD"), None);
}

#[test]
fn test_detect_surfaces_query_failure() {
    let git = FixedStatus(Err("fatal: not a git repository"));
    let err = detect(&git, Path::new(".")).unwrap_err();
    match err {
        SnapError::Git(inner) => assert!(matches!(*inner, GitError::QueryFailed { .. })),
        other => panic!("expected a git query failure, got {other:?}"),
    }
}

#[test]
fn test_detect_empty_status() {
    let git = FixedStatus(Ok(""));
    assert!(detect(&git, Path::new(".")).unwrap().is_empty());
}

#[test]
fn test_find_worktree_root_from_subdirectory() {
    let temp = temp_dir();
    gix::init(temp.path()).expect("failed to init repo");
    let nested = temp.path().join("a").join("b");
    std::fs::create_dir_all(&nested).unwrap();

    let root = find_worktree_root(&nested).expect("should find root");
    assert_eq!(root, std::fs::canonicalize(temp.path()).unwrap());
}

#[test]
fn test_find_worktree_root_outside_repo() {
    let temp = temp_dir();
    let missing = temp.path().join("does_not_exist");
    let err = find_worktree_root(&missing).unwrap_err();
    assert!(err.to_string().contains("repository not found"), "got: {err}");
}
