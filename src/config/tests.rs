// snapcommit: versioned backup and commit tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{Config, ConfigLoader};
use crate::config::types::{DEFAULT_COLLISION_RETRIES, DEFAULT_MESSAGE_PREFIX};
use crate::logging::LogLevel;
use std::path::PathBuf;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert!(!config.global.dry);
    assert_eq!(config.global.output_log_level, LogLevel::INFO);
    assert!(config.repo.root.is_none());
    assert_eq!(config.commit.message_prefix, DEFAULT_MESSAGE_PREFIX);
    assert!(config.push.enabled);
    assert!(config.push.remote.is_none());
    assert_eq!(config.backup.collision_retries, DEFAULT_COLLISION_RETRIES);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_parse() {
    let toml = r#"
[global]
dry = true
output_log_level = 4

[repo]
root = "/work/notes"

[commit]
message_prefix = "Snapshot"

[push]
remote = "backup"
branch = "main"
"#;

    let config = Config::parse(toml).unwrap();
    assert!(config.global.dry);
    assert_eq!(config.global.output_log_level, LogLevel::DEBUG);
    assert_eq!(config.repo.root, Some(PathBuf::from("/work/notes")));
    assert_eq!(config.commit.message_prefix, "Snapshot");
    assert_eq!(config.push.remote.as_deref(), Some("backup"));
    assert_eq!(config.push.branch.as_deref(), Some("main"));
}

#[test]
fn test_config_rejects_unknown_keys() {
    let result = Config::parse("[push]\nforce = true\n");
    assert!(result.is_err(), "unknown keys should be rejected");
}

#[test]
fn test_branch_without_remote_rejected() {
    let err = Config::parse("[push]\nbranch = \"main\"\n").unwrap_err();
    assert!(
        err.to_string().contains("remote"),
        "error should mention the missing remote, got: {err}"
    );
}

#[test]
fn test_empty_prefix_rejected() {
    let result = Config::parse("[commit]\nmessage_prefix = \"  \"\n");
    assert!(result.is_err());
}

#[test]
fn test_set_str_overrides() {
    let config = ConfigLoader::new()
        .add_toml_str("[push]\nremote = \"origin\"\n")
        .set_str("push.enabled=false")
        .unwrap()
        .set_str("backup/collision_retries=3")
        .unwrap()
        .set_str("commit.message_prefix=Nightly snapshot")
        .unwrap()
        .build()
        .unwrap();

    assert!(!config.push.enabled);
    assert_eq!(config.push.remote.as_deref(), Some("origin"));
    assert_eq!(config.backup.collision_retries, 3);
    assert_eq!(config.commit.message_prefix, "Nightly snapshot");
}

#[test]
fn test_set_str_requires_assignment() {
    assert!(ConfigLoader::new().set_str("push.enabled").is_err());
    assert!(ConfigLoader::new().set_str("=true").is_err());
}

#[test]
fn test_missing_required_file() {
    let temp = tempfile::tempdir().unwrap();
    let result = Config::from_file(temp.path().join("absent.toml"));
    assert!(result.is_err());
}

#[test]
fn test_from_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("snapcommit.toml");
    std::fs::write(&path, "[backup]\ncollision_retries = 2\n").unwrap();

    let config = Config::builder().add_toml_file(&path).build().unwrap();
    assert_eq!(config.backup.collision_retries, 2);
}

#[test]
fn test_format_options() {
    let config = Config::parse("[push]\nremote = \"origin\"\n").unwrap();
    insta::assert_snapshot!(config.format_options().join("\n"), @r"
    backup.collision_retries = 8
    commit.message_prefix    = Versioned backup
    global.dry               = false
    global.file_log_level    = 5
    global.output_log_level  = 3
    push.enabled             = true
    push.remote              = origin
    ");
}
