//! Common test utilities for CLI integration tests.
//!
//! This module provides an isolated environment with a fake `zfs` binary
//! and a configuration file, plus command builders pointing at them.

use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A fake `zfs` serving a small fixed pool layout.
///
/// `pool/home` has three snapshots and a bookmark; `backup/pool/home` has
/// received the first snapshot; `backup/diverged` has a snapshot the sender
/// never had.
pub const FAKE_ZFS: &str = r#"
case "$*" in
  *"-t filesystem,volume"*)
    printf 'pool\npool/home\npool/home/alice\npool/var\nbackup\nbackup/pool/home\nbackup/diverged\n'
    ;;
  *"snapshot,bookmark pool/home")
    printf 'pool/home@a\t1\t10\npool/home@b\t2\t20\npool/home#b\t2\t20\npool/home@c\t3\t30\n'
    ;;
  *"snapshot,bookmark backup/pool/home")
    printf 'backup/pool/home@a\t1\t11\n'
    ;;
  *"snapshot,bookmark backup/diverged")
    printf 'backup/diverged@a\t1\t11\nbackup/diverged@x\t99\t12\n'
    ;;
  *"snapshot,bookmark"*)
    ;;
  *)
    echo "unexpected: $*" >&2
    exit 2
    ;;
esac"#;

/// Test environment with an isolated configuration and zfs binary.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the fake zfs binary
    pub zfs_binary: PathBuf,
    /// Path to the configuration file
    pub config: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create an environment whose configuration contains `config_yaml`.
    pub fn new(config_yaml: &str) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let zfs_binary = write_script(&temp_dir, "zfs", FAKE_ZFS);
        let config = temp_dir.path().join("config.yaml");
        fs::write(&config, config_yaml).expect("Failed to write config");

        Self {
            temp_dir,
            zfs_binary,
            config,
        }
    }

    /// Write an additional executable script into the environment.
    pub fn script(&self, name: &str, body: &str) -> PathBuf {
        write_script(&self.temp_dir, name, body)
    }

    /// Replace the configuration file contents.
    pub fn write_config(&self, config_yaml: &str) {
        fs::write(&self.config, config_yaml).expect("Failed to write config");
    }

    /// Get a command builder with no zrepl environment leaking in.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("zrepl").expect("Failed to find zrepl binary");
        cmd.env_remove("ZREPL_CONFIG")
            .env_remove("ZREPL_ZFS_BINARY")
            .env_remove("ZREPL_LOG_MODE");
        cmd
    }

    /// Get a command builder with the config and zfs binary pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--config")
            .arg(&self.config)
            .arg("--zfs-binary")
            .arg(&self.zfs_binary);
        cmd
    }
}

#[cfg(unix)]
fn write_script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.path().join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("Failed to make script executable");
    path
}

#[cfg(not(unix))]
fn write_script(dir: &TempDir, name: &str, _body: &str) -> PathBuf {
    dir.path().join(name)
}
