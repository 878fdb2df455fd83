//! Common test utilities for Stagehand integration tests.
//!
//! Provides an origin repository fixture built with the real `git`
//! binary, a deploy environment with isolated temp directories, and
//! helpers to run the Stagehand CLI. Tests that need git or rsync call
//! [`tools_available`] first and skip cleanly when the tools are missing.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::TempDir;

/// Path to the stagehand binary under test.
pub fn stagehand_bin() -> &'static str {
    env!("CARGO_BIN_EXE_stagehand")
}

pub fn has_git() -> bool {
    probe("git", "--version")
}

pub fn has_rsync() -> bool {
    probe("rsync", "--version")
}

/// Both external tools the deploy pipeline shells out to.
pub fn tools_available() -> bool {
    if !has_git() || !has_rsync() {
        eprintln!("git or rsync not available, skipping");
        return false;
    }
    true
}

fn probe(command: &str, arg: &str) -> bool {
    Command::new(command)
        .arg(arg)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Result of running a Stagehand CLI command.
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Run the stagehand binary in `cwd` with the given arguments.
pub fn run_stagehand(cwd: &Path, args: &[&str]) -> TestResult {
    let output = Command::new(stagehand_bin())
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("failed to run stagehand binary");

    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

/// An origin git repository to deploy from, built with the real git
/// binary in a temp directory.
pub struct OriginRepo {
    pub dir: TempDir,
}

impl OriginRepo {
    /// Initialize a repository on branch `main` with two committed files:
    /// `a.txt` and `sub/b.txt`.
    pub fn init() -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Self { dir };

        repo.git(&["-c", "init.defaultBranch=main", "init", "."]);
        repo.git(&["config", "user.email", "deploy@example.com"]);
        repo.git(&["config", "user.name", "Deploy Tests"]);

        repo.write("a.txt", "alpha\n");
        repo.write("sub/b.txt", "beta\n");
        repo.commit_all("initial");
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A `file://` URL, so shallow clone and fetch behave like a remote.
    pub fn url(&self) -> String {
        format!("file://{}", self.path().display())
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn commit_all(&self, message: &str) {
        self.git(&["add", "-A"]);
        self.git(&["commit", "-m", message]);
    }

    pub fn tag(&self, name: &str) {
        self.git(&["tag", name]);
    }

    /// Commit id of HEAD.
    pub fn head(&self) -> String {
        self.rev_parse("HEAD")
    }

    pub fn rev_parse(&self, rev: &str) -> String {
        let output = Command::new("git")
            .args(["rev-parse", rev])
            .current_dir(self.path())
            .output()
            .unwrap();
        assert!(output.status.success());
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    pub fn git(&self, args: &[&str]) {
        git_in(self.path(), args);
    }
}

/// Run a git command in an arbitrary directory, panicking on failure.
pub fn git_in(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Isolated deploy environment: a deploy root and a working directory
/// holding the config file.
pub struct DeployEnv {
    pub deploy_root: TempDir,
    pub workdir: TempDir,
}

impl DeployEnv {
    pub fn new() -> Self {
        Self {
            deploy_root: TempDir::new().unwrap(),
            workdir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.deploy_root.path()
    }

    /// Write `stagehand.toml` into the working directory.
    pub fn write_config(&self, body: &str) {
        fs::write(self.workdir.path().join("stagehand.toml"), body).unwrap();
    }

    /// Standard config pointing at `origin` with the given extra sections.
    pub fn write_standard_config(&self, origin: &OriginRepo, extra: &str) {
        self.write_config(&format!(
            "repo_url = \"{}\"\nbranch = \"main\"\ndeploy_root = \"{}\"\n{}",
            origin.url(),
            self.root().display(),
            extra
        ));
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        run_stagehand(self.workdir.path(), args)
    }

    /// Paths of release directories, sorted oldest first.
    pub fn releases(&self) -> Vec<PathBuf> {
        let releases_dir = self.root().join("releases");
        if !releases_dir.exists() {
            return Vec::new();
        }
        let mut entries: Vec<PathBuf> = fs::read_dir(releases_dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        entries.sort();
        entries
    }

    pub fn stage(&self) -> PathBuf {
        self.root().join("tmp/deploy")
    }

    pub fn cache(&self) -> PathBuf {
        self.root().join("shared/deploy")
    }
}
