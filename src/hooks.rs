//! Lifecycle hook registry
//!
//! Deploy operations are bound against typed lifecycle points rather than
//! matched by name, so the ordering contract (sync strictly before
//! revision recording) is enforced by the registry's fixed invocation
//! order instead of naming convention. Hooks bound to the same point run
//! in declaration order.

use std::path::PathBuf;
use std::rc::Rc;

use crate::error::StageResult;
use crate::sync::{SyncOrchestrator, SyncOutcome};

/// Lifecycle points, listed in the order the deploy driver invokes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifecyclePoint {
    /// Before committing to a full sync: fail fast on misconfigured paths
    PreDeployCheck,
    /// The new release path has been computed; populate it
    ReleasePathReady,
    /// About to record what is deployed; must observe the post-checkout
    /// revision
    PreRecordRevision,
}

/// Mutable state threaded through one deploy run.
#[derive(Debug)]
pub struct DeployContext {
    pub deploy_root: PathBuf,
    pub release_path: PathBuf,
    /// Transfer outcome recorded by the ReleasePathReady hook
    pub outcome: Option<SyncOutcome>,
    /// Concrete revision id recorded by the PreRecordRevision hook
    pub revision: Option<String>,
}

type Hook = Box<dyn FnMut(&mut DeployContext) -> StageResult<()>>;

/// Registry of hooks keyed by lifecycle point.
#[derive(Default)]
pub struct HookRegistry {
    hooks: Vec<(LifecyclePoint, Hook)>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a hook to a lifecycle point.
    pub fn bind<F>(&mut self, point: LifecyclePoint, hook: F)
    where
        F: FnMut(&mut DeployContext) -> StageResult<()> + 'static,
    {
        self.hooks.push((point, Box::new(hook)));
    }

    /// Run every hook bound to `point`, in declaration order, stopping at
    /// the first failure.
    pub fn run(&mut self, point: LifecyclePoint, ctx: &mut DeployContext) -> StageResult<()> {
        for (bound, hook) in self.hooks.iter_mut() {
            if *bound == point {
                hook(ctx)?;
            }
        }
        Ok(())
    }
}

/// Bind the standard deploy operations against the lifecycle.
///
/// - `PreDeployCheck` → path/tool sanity check
/// - `ReleasePathReady` → run the sync orchestrator, recording its outcome
/// - `PreRecordRevision` → resolve the checked-out revision into the context
pub fn bind_deploy_hooks(registry: &mut HookRegistry, orchestrator: Rc<SyncOrchestrator>) {
    let orch = Rc::clone(&orchestrator);
    registry.bind(LifecyclePoint::PreDeployCheck, move |_ctx| orch.check());

    let orch = Rc::clone(&orchestrator);
    registry.bind(LifecyclePoint::ReleasePathReady, move |ctx| {
        ctx.outcome = Some(orch.create_release(&ctx.release_path)?);
        Ok(())
    });

    registry.bind(LifecyclePoint::PreRecordRevision, move |ctx| {
        ctx.revision = Some(orchestrator.current_revision()?);
        Ok(())
    });
}
