//! CLI end-to-end tests
//!
//! Tests for the encforge command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

/// Get a command for the encforge binary
#[allow(deprecated)]
fn encforge_cmd() -> Command {
    Command::cargo_bin("encforge").unwrap()
}

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"").unwrap();
}

/// Temp layout with a config pointing at `system/` and `data/`.
struct Fixture {
    dir: TempDir,
    config: PathBuf,
}

impl Fixture {
    fn new(version: &str) -> Self {
        let dir = tempdir().unwrap();
        let system = dir.path().join("system");
        let data = dir.path().join("data");
        fs::create_dir_all(&system).unwrap();

        let config = dir.path().join("encforge.toml");
        fs::write(
            &config,
            format!(
                r#"
[paths]
program_system_path = '{}'
program_data_path = '{}'

[toolchain]
encoder_filename = "ffmpeg"
prober_filename = "ffprobe"
version = "{version}"
"#,
                system.display(),
                data.display(),
            ),
        )
        .unwrap();

        Self { dir, config }
    }

    fn versioned(&self, version: &str) -> PathBuf {
        self.dir.path().join("data/ffmpeg").join(version)
    }

    fn install(&self, version: &str) -> PathBuf {
        let dir = self.versioned(version);
        touch(&dir.join("ffmpeg"));
        touch(&dir.join("ffprobe"));
        dir
    }

    fn cmd(&self) -> Command {
        let mut cmd = encforge_cmd();
        cmd.arg("--config").arg(&self.config);
        cmd
    }
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = encforge_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = encforge_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("encforge"));
}

#[test]
fn test_cli_resolve_help() {
    let mut cmd = encforge_cmd();
    cmd.args(["resolve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolve the encoder and prober paths"));
}

#[test]
fn test_cli_resolve_versioned() {
    let fx = Fixture::new("7.1");
    let dir = fx.install("7.1");

    fx.cmd()
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains("Source: versioned"))
        .stdout(predicate::str::contains("Version: 7.1"))
        .stdout(predicate::str::contains(dir.join("ffprobe").display().to_string()));
}

#[test]
fn test_cli_resolve_fallback_json() {
    let fx = Fixture::new("3.0");
    fx.install("1.0");
    touch(&fx.versioned("2.0").join("ffmpeg"));

    let output = fx.cmd().args(["resolve", "--json"]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["source"], "fallback");
    assert_eq!(json["toolchain"]["version"], "1.0");
    assert_eq!(json["retained_dirs"].as_array().unwrap().len(), 2);
    assert!(fx.versioned("3.0").is_dir());
}

#[test]
fn test_cli_resolve_nothing_found_succeeds() {
    let fx = Fixture::new("3.0");

    fx.cmd()
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains("No usable toolchain"))
        .stdout(predicate::str::contains("not_found"));
}

#[test]
fn test_cli_resolve_disabled() {
    let fx = Fixture::new("0");
    fx.install("1.0");

    fx.cmd()
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains("Source: disabled"));
}

#[test]
fn test_cli_overrides_from_flags() {
    let fx = Fixture::new("3.0");

    fx.cmd()
        .args([
            "--ffmpeg-path",
            "/custom/ffmpeg",
            "--ffprobe-path",
            "/custom/ffprobe",
            "resolve",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Source: override"))
        .stdout(predicate::str::contains("Version: external"))
        .stdout(predicate::str::contains("/custom/ffmpeg"));
}

#[test]
fn test_cli_stale_lists_then_prunes() {
    let fx = Fixture::new("7.1");
    fx.install("7.1");
    fx.install("6.0");

    fx.cmd()
        .arg("stale")
        .assert()
        .success()
        .stdout(predicate::str::contains("6.0"))
        .stdout(predicate::str::contains("--prune"));
    assert!(fx.versioned("6.0").exists());

    fx.cmd()
        .args(["stale", "--prune"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed"));
    assert!(!fx.versioned("6.0").exists());
    assert!(fx.versioned("7.1").exists());
}

#[test]
fn test_cli_stale_without_managed_install() {
    let fx = Fixture::new("0");
    fx.install("6.0");

    fx.cmd()
        .arg("stale")
        .assert()
        .success()
        .stdout(predicate::str::contains("no versioned install"));
    assert!(fx.versioned("6.0").exists());
}

#[test]
fn test_cli_init_then_validate() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("conf/encforge.toml");

    encforge_cmd()
        .arg("init")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config"));
    assert!(path.exists());

    encforge_cmd()
        .arg("validate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));

    // Second init must not clobber the file.
    encforge_cmd().arg("init").arg(&path).assert().failure();
}

#[test]
fn test_cli_validate_invalid_config() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("bad.toml");
    fs::write(&path, "[toolchain]\nencoder_filename = \"bin/ffmpeg\"\n").unwrap();

    encforge_cmd()
        .arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("toolchain"));
}
