//! Shared testing utilities for preflight CLI tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command as StdCommand, Stdio};
use tempfile::TempDir;

pub const VALID_SPEC: &str = r#"services:
  - name: web
    image:
      repository: registry.example.com/app
      tag: main-abc123
    envs:
      - key: APP_ENV
        value: production
      - key: STREAMLIT_SERVER_PORT
        value: "8501"
"#;

pub const SECRET_SPEC: &str = r#"services:
  - name: web
    image:
      repository: registry.example.com/app
      tag: main-abc123
    envs:
      - key: SUPABASE_KEY
        value: sb-secret
        type: SECRET
"#;

/// Testing harness providing an isolated environment for CLI exercises.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
    work_dir: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    /// Create a new isolated environment.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let work_dir = root.path().join("work");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");
        Self { root, work_dir }
    }

    /// Directory CLI invocations run in.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Build a command for invoking the compiled `preflight` binary within the work directory.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("preflight").expect("Failed to locate preflight binary");
        cmd.current_dir(&self.work_dir).env_remove("PREFLIGHT_LOG");
        cmd
    }

    /// Start the `preflight` binary without waiting for it, capturing its output.
    pub fn spawn(&self, args: &[&str]) -> Child {
        let binary = assert_cmd::cargo::cargo_bin("preflight");
        StdCommand::new(binary)
            .args(args)
            .current_dir(&self.work_dir)
            .env_remove("PREFLIGHT_LOG")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to start preflight binary")
    }

    /// Write an executable shell script relative to the work directory.
    #[cfg(unix)]
    pub fn write_script(&self, relative: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = self.write(relative, &format!("#!/bin/sh\n{}\n", body));
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to mark script executable");
        path
    }

    /// Write a file relative to the work directory, creating parents.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.work_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, content).expect("Failed to write test file");
        path
    }

    /// Write settings that point probes at tools which cannot exist.
    pub fn write_missing_tool_settings(&self) -> PathBuf {
        self.write(
            "preflight.toml",
            r#"[probes]
timeout = "5s"

[build]
program = "preflight-missing-docker"

[registry]
program = "preflight-missing-doctl"
"#,
        )
    }
}
