//! Stagehand - incremental release deployment using git and rsync
//!
//! Stagehand plans and executes incremental deployment of a versioned
//! source tree: git is the source of truth, rsync moves only the changed
//! bytes, and each deploy lands in a fresh, isolated release directory
//! that is never exposed until the transfer completes. A local staging
//! checkout and an optional server-side cache are reused across deploys so
//! repeated deploys fetch and transfer as little as possible.

pub mod config;
pub mod deploy;
pub mod error;
pub mod hooks;
pub mod paths;
pub mod plan;
pub mod process;
pub mod settings;
pub mod sync;
pub mod transfer;
pub mod vcs;

// Re-exports for convenience
pub use deploy::{Deploy, DeployReport, PlanSummary};
pub use error::{StageError, StageResult};
pub use hooks::{DeployContext, HookRegistry, LifecyclePoint};
pub use paths::PathSpec;
pub use plan::{CheckoutMode, CheckoutTarget, DepthOption};
pub use settings::{Settings, Value};
pub use sync::{SyncOrchestrator, SyncOutcome};
pub use vcs::GitClient;
