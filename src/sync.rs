//! Sync orchestration for one deploy attempt
//!
//! Sequences the three transfer operations of a deploy: git update of the
//! local stage, optional sparse narrowing of the transfer source, and the
//! rsync hops into the cache and the release directory. The release
//! directory is never promoted until every transfer completes; a failure
//! anywhere aborts the attempt and leaves the stage intact for the next
//! one.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StageResult;
use crate::paths::PathSpec;
use crate::plan::{CheckoutTarget, DepthOption};
use crate::settings::{keys, Settings};
use crate::transfer::{self, CopyCommand};
use crate::vcs::GitClient;

/// Result of a successful release creation.
///
/// Only exists once every transfer hop has completed; a failed attempt
/// returns an error instead, so holding a `SyncOutcome` means the release
/// directory is fully populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub release_path: PathBuf,
    /// Whether the transfer went through an intermediate cache
    pub cache_used: bool,
}

/// Orchestrates git update and rsync transfer for one deploy attempt.
///
/// All inputs are resolved up front from the settings registry; the
/// orchestrator itself carries no mutable state.
#[derive(Debug, Clone)]
pub struct SyncOrchestrator {
    repo_url: String,
    target: CheckoutTarget,
    depth: DepthOption,
    paths: PathSpec,
    target_dir: String,
    sparse: Vec<String>,
    transfer_options: Vec<String>,
    copy: CopyCommand,
    enable_submodules: bool,
    reset_submodules: bool,
    bypass_clone: bool,
    git: GitClient,
}

impl SyncOrchestrator {
    /// Resolve every input the orchestrator needs from settings.
    pub fn from_settings(settings: &mut Settings) -> StageResult<Self> {
        let deploy_root = PathBuf::from(settings.get_str(keys::DEPLOY_ROOT)?);
        let repo_url = settings.get_str(keys::REPO_URL)?;
        let target = CheckoutTarget::from_settings(settings)?;
        let depth = DepthOption::from_settings(settings)?;
        let paths = PathSpec::from_settings(settings, &deploy_root)?;
        let target_dir = settings.get_str(keys::TARGET_DIR)?;
        let sparse = settings.get_list(keys::SPARSE_CHECKOUT)?;
        let transfer_options = settings.get_list(keys::TRANSFER_OPTIONS)?;
        let copy = CopyCommand::parse(&settings.get_str(keys::COPY_COMMAND)?)?;
        let enable_submodules = settings.get_bool(keys::ENABLE_SUBMODULES)?;
        let reset_submodules = settings.get_bool(keys::RESET_SUBMODULES)?;
        let bypass_clone = settings.get_bool(keys::BYPASS_CLONE)?;
        let remote = settings.get_str(keys::GIT_REMOTE)?;
        let git = GitClient::new(paths.stage.clone(), remote);

        Ok(Self {
            repo_url,
            target,
            depth,
            paths,
            target_dir,
            sparse,
            transfer_options,
            copy,
            enable_submodules,
            reset_submodules,
            bypass_clone,
            git,
        })
    }

    pub fn target(&self) -> &CheckoutTarget {
        &self.target
    }

    pub fn paths(&self) -> &PathSpec {
        &self.paths
    }

    pub fn depth(&self) -> &DepthOption {
        &self.depth
    }

    /// Lightweight sanity check before committing to a full sync.
    ///
    /// Creates the stage and cache parents if needed and verifies the
    /// external commands can run at all.
    pub fn check(&self) -> StageResult<()> {
        if let Some(parent) = self.paths.stage.parent() {
            fs::create_dir_all(parent)?;
        }
        if let Some(cache) = &self.paths.cache {
            if let Some(parent) = cache.parent() {
                fs::create_dir_all(parent)?;
            }
        }
        crate::process::run("git", &["--version".to_string()], None)?;
        crate::process::run("rsync", &["--version".to_string()], None)?;
        Ok(())
    }

    /// Bring the stage up to the planned target.
    ///
    /// No existing checkout means a full clone; otherwise only the planned
    /// branch label is fetched before checkout. `bypass_clone` trusts
    /// whatever is already staged.
    fn update_stage(&self) -> StageResult<()> {
        if self.bypass_clone {
            return Ok(());
        }

        if self.git.has_checkout() {
            self.git.fetch(&self.target.branch_label, &self.depth)?;
        } else {
            if let Some(parent) = self.paths.stage.parent() {
                fs::create_dir_all(parent)?;
            }
            self.git.clone_into(&self.repo_url, &self.depth)?;
        }
        self.git.checkout(&self.target)?;

        if self.enable_submodules {
            self.git.update_submodules(self.reset_submodules)?;
        }
        Ok(())
    }

    /// The rsync source arguments for the first transfer hop.
    ///
    /// A non-empty sparse set narrows the transfer to the listed paths
    /// under the stage; otherwise the whole configured target directory is
    /// transferred.
    fn transfer_sources(&self) -> Vec<String> {
        if self.sparse.is_empty() {
            vec![transfer::contents_of(
                &self.paths.stage.join(&self.target_dir),
            )]
        } else {
            self.sparse
                .iter()
                .map(|p| transfer::path_arg(&self.paths.stage.join(p)))
                .collect()
        }
    }

    /// Run the full attempt: update, transfer, promote.
    pub fn create_release(&self, release_path: &Path) -> StageResult<SyncOutcome> {
        self.update_stage()?;

        fs::create_dir_all(release_path)?;
        let sources = self.transfer_sources();

        match &self.paths.cache {
            Some(cache) => {
                fs::create_dir_all(cache)?;
                transfer::rsync(&self.transfer_options, &sources, cache)?;
                // Second hop: the cache already holds the previous release,
                // so only changed files move into the release directory.
                self.copy.run(cache, release_path)?;
            }
            None => {
                transfer::rsync(&self.transfer_options, &sources, release_path)?;
            }
        }

        Ok(SyncOutcome {
            release_path: release_path.to_path_buf(),
            cache_used: self.paths.cache.is_some(),
        })
    }

    /// The revision actually checked out in the stage.
    pub fn current_revision(&self) -> StageResult<String> {
        self.git.current_revision()
    }
}
