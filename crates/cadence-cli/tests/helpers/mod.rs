use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

/// Runs the `cadence` binary against a throwaway database.
pub struct CliTestHarness {
    temp_dir: TempDir,
    db_path: PathBuf,
}

impl CliTestHarness {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        Self { temp_dir, db_path }
    }

    /// A command isolated from any `cadence.toml` in the working directory.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("cadence").expect("Failed to find cadence binary");
        cmd.current_dir(self.temp_dir.path());
        cmd.env("CADENCE_DATABASE_PATH", &self.db_path);
        cmd.env_remove("CADENCE_DEFAULT_ACCOUNT");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Creates a rule and returns its full id, read back from the confirmation line.
    pub fn add_rule(&self, args: &[&str]) -> String {
        let mut full = vec!["rule", "add"];
        full.extend_from_slice(args);
        let output = self.run_success(&full).get_output().stdout.clone();
        let stdout = String::from_utf8_lossy(&output);
        extract_uuid(&stdout).unwrap_or_else(|| panic!("no rule id in output: {stdout}"))
    }
}

/// Finds the first rule id in colored command output.
pub fn extract_uuid(text: &str) -> Option<String> {
    let plain = strip_ansi_escapes::strip(text.as_bytes());
    String::from_utf8_lossy(&plain)
        .split_whitespace()
        .find_map(|word| Uuid::parse_str(word).ok())
        .map(|id| id.to_string())
}

#[test]
fn test_extract_uuid_ignores_colors() {
    let line = "Created rule \u{1b}[33m0190a1b2-c3d4-7e5f-8a9b-0c1d2e3f4a5b\u{1b}[39m 'Rent' (every month on day 1)";
    assert_eq!(
        extract_uuid(line).as_deref(),
        Some("0190a1b2-c3d4-7e5f-8a9b-0c1d2e3f4a5b")
    );
    assert_eq!(extract_uuid("Created rule without id"), None);
}
