//! Deploy driver
//!
//! Owns the lifecycle of one deploy run: computes the timestamped release
//! path, invokes the hook registry points in their fixed order, and
//! records the deployed revision into the release directory. The ordering
//! here is the contract the rest of the crate relies on: the sync
//! orchestrator has populated the release before the revision is recorded
//! and before anything reads from it.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::Utc;
use serde::Serialize;

use crate::error::StageResult;
use crate::hooks::{bind_deploy_hooks, DeployContext, HookRegistry, LifecyclePoint};
use crate::plan::CheckoutMode;
use crate::settings::{keys, Settings};
use crate::sync::SyncOrchestrator;

/// Name of the file recording the deployed revision in each release.
pub const REVISION_FILE: &str = "REVISION";

/// Machine-readable summary of a completed deploy.
#[derive(Debug, Clone, Serialize)]
pub struct DeployReport {
    pub deploy_root: PathBuf,
    pub release_path: PathBuf,
    pub revision: String,
    pub cache_used: bool,
}

/// Resolved view of what a deploy would do, for preview output.
#[derive(Debug, Clone, Serialize)]
pub struct PlanSummary {
    pub mode: &'static str,
    pub target: String,
    pub branch_label: String,
    pub stage: PathBuf,
    pub cache: Option<PathBuf>,
    pub depth: Option<u64>,
    pub release_path: PathBuf,
}

/// Compute the new release path under the deploy root.
pub fn new_release_path(deploy_root: &Path) -> PathBuf {
    let stamp = Utc::now().format("%Y%m%d%H%M%S");
    deploy_root.join("releases").join(stamp.to_string())
}

/// One deploy run over the bound lifecycle.
pub struct Deploy {
    registry: HookRegistry,
    ctx: DeployContext,
}

impl Deploy {
    /// Resolve settings into an orchestrator and bind the standard hooks.
    pub fn new(settings: &mut Settings) -> StageResult<Self> {
        let orchestrator = Rc::new(SyncOrchestrator::from_settings(settings)?);
        let deploy_root = PathBuf::from(settings.get_str(keys::DEPLOY_ROOT)?);
        let release_path = new_release_path(&deploy_root);

        let mut registry = HookRegistry::new();
        bind_deploy_hooks(&mut registry, orchestrator);

        Ok(Self {
            registry,
            ctx: DeployContext {
                deploy_root,
                release_path,
                outcome: None,
                revision: None,
            },
        })
    }

    pub fn release_path(&self) -> &Path {
        &self.ctx.release_path
    }

    /// Run the lifecycle points in their fixed order.
    ///
    /// Check runs before any sync work is committed to; the release is
    /// fully populated before the revision is resolved and recorded.
    pub fn run(&mut self) -> StageResult<DeployReport> {
        self.registry
            .run(LifecyclePoint::PreDeployCheck, &mut self.ctx)?;
        self.registry
            .run(LifecyclePoint::ReleasePathReady, &mut self.ctx)?;
        self.registry
            .run(LifecyclePoint::PreRecordRevision, &mut self.ctx)?;

        let revision = self.ctx.revision.clone().unwrap_or_default();
        fs::write(
            self.ctx.release_path.join(REVISION_FILE),
            format!("{revision}\n"),
        )?;

        // The report describes what the transfer actually did, not what the
        // configuration asked for.
        let cache_used = self
            .ctx
            .outcome
            .as_ref()
            .map(|o| o.cache_used)
            .unwrap_or(false);

        Ok(DeployReport {
            deploy_root: self.ctx.deploy_root.clone(),
            release_path: self.ctx.release_path.clone(),
            revision,
            cache_used,
        })
    }

    /// Run only the pre-deploy check point.
    pub fn check(&mut self) -> StageResult<()> {
        self.registry
            .run(LifecyclePoint::PreDeployCheck, &mut self.ctx)
    }
}

/// Resolve the plan a deploy would execute, without running anything.
pub fn plan_summary(settings: &mut Settings) -> StageResult<PlanSummary> {
    let orchestrator = SyncOrchestrator::from_settings(settings)?;
    let mode = CheckoutMode::from_settings(settings)?;
    let deploy_root = PathBuf::from(settings.get_str(keys::DEPLOY_ROOT)?);
    Ok(PlanSummary {
        mode: mode.as_str(),
        target: orchestrator.target().target.clone(),
        branch_label: orchestrator.target().branch_label.clone(),
        stage: orchestrator.paths().stage.clone(),
        cache: orchestrator.paths().cache.clone(),
        depth: orchestrator.depth().depth(),
        release_path: deploy_root.join("releases"),
    })
}
