//! Git operations against the local stage
//!
//! Git is treated purely as an external command invoked with resolved
//! arguments; clone/fetch/checkout semantics belong to git itself. Every
//! operation here is fatal on failure and never retried; a failed attempt
//! leaves the stage intact so the next deploy can resume from it.
//!
//! Argument lists are assembled by free functions so the exact command
//! lines can be asserted without spawning git.

use std::path::{Path, PathBuf};

use crate::error::StageResult;
use crate::plan::{CheckoutTarget, DepthOption};
use crate::process;

fn clone_args(remote: &str, url: &str, stage: &Path, depth: &DepthOption) -> Vec<String> {
    let mut args = vec!["clone".to_string()];
    args.extend(depth.clone_args());
    args.push("--origin".to_string());
    args.push(remote.to_string());
    args.push(url.to_string());
    args.push(stage.display().to_string());
    args
}

fn fetch_args(remote: &str, branch_label: &str, depth: &DepthOption) -> Vec<String> {
    let mut args = vec!["fetch".to_string()];
    args.extend(depth.fetch_args());
    args.push(remote.to_string());
    args.push(branch_label.to_string());
    args
}

fn checkout_args(target: &CheckoutTarget) -> Vec<String> {
    vec![
        "checkout".to_string(),
        "--force".to_string(),
        target.target.clone(),
    ]
}

/// The ordered submodule command lines: an optional hard reset of every
/// submodule, then the init-and-update.
fn submodule_commands(reset: bool) -> Vec<Vec<String>> {
    let mut commands = Vec::new();
    if reset {
        commands.push(
            ["submodule", "foreach", "--recursive", "git", "reset", "--hard"]
                .map(str::to_string)
                .to_vec(),
        );
    }
    commands.push(
        ["submodule", "update", "--init", "--recursive"]
            .map(str::to_string)
            .to_vec(),
    );
    commands
}

/// Git client bound to one staging directory.
#[derive(Debug, Clone)]
pub struct GitClient {
    stage: PathBuf,
    remote: String,
}

impl GitClient {
    pub fn new(stage: impl Into<PathBuf>, remote: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            remote: remote.into(),
        }
    }

    /// Whether the stage already holds a checkout from a prior deploy.
    pub fn has_checkout(&self) -> bool {
        self.stage.join(".git").exists()
    }

    /// Full clone into the stage.
    ///
    /// A shallow clone keeps multi-branch refs available so later deploys
    /// can re-target without a fresh clone.
    pub fn clone_into(&self, url: &str, depth: &DepthOption) -> StageResult<()> {
        let args = clone_args(&self.remote, url, &self.stage, depth);
        process::run("git", &args, None)?;
        Ok(())
    }

    /// Depth-limited fetch of a single ref from the configured remote.
    pub fn fetch(&self, branch_label: &str, depth: &DepthOption) -> StageResult<()> {
        let args = fetch_args(&self.remote, branch_label, depth);
        process::run("git", &args, Some(&self.stage))?;
        Ok(())
    }

    /// Check out the planned target (detached is fine for a deploy stage).
    pub fn checkout(&self, target: &CheckoutTarget) -> StageResult<()> {
        process::run("git", &checkout_args(target), Some(&self.stage))?;
        Ok(())
    }

    /// Update submodules after checkout.
    ///
    /// With `reset`, submodule state is force-reset first so a prior
    /// partial update in a dirty, non-fast-forwardable state cannot block
    /// the update.
    pub fn update_submodules(&self, reset: bool) -> StageResult<()> {
        for args in submodule_commands(reset) {
            process::run("git", &args, Some(&self.stage))?;
        }
        Ok(())
    }

    /// The concrete revision actually checked out in the stage.
    pub fn current_revision(&self) -> StageResult<String> {
        let args = vec!["rev-parse".to_string(), "HEAD".to_string()];
        let output = process::run("git", &args, Some(&self.stage))?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
