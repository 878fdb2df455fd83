//! Checkout target planning
//!
//! Pure derivations from the configured checkout mode, git remote, and
//! requested reference: the `target` argument handed to git to select what
//! to check out, and the `branch_label` used for depth-limited fetch and
//! local comparison.

use crate::error::{StageError, StageResult};
use crate::settings::{keys, Settings, Value};

/// What kind of reference a deploy is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutMode {
    Branch,
    Tag,
    Revision,
}

impl CheckoutMode {
    /// Parse a configured mode string. Unknown modes are rejected rather
    /// than silently treated as branch mode.
    pub fn parse(mode: &str) -> StageResult<Self> {
        match mode {
            "branch" => Ok(CheckoutMode::Branch),
            "tag" => Ok(CheckoutMode::Tag),
            "revision" => Ok(CheckoutMode::Revision),
            other => Err(StageError::InvalidReference {
                message: format!("unknown checkout mode '{other}'"),
            }),
        }
    }

    /// Resolve the mode from settings.
    ///
    /// The `checkout` setting defaults to a derivation from the legacy
    /// `checkout_tag` boolean, so an explicit mode always wins over the
    /// legacy flag.
    pub fn from_settings(settings: &mut Settings) -> StageResult<Self> {
        Self::parse(&settings.get_str(keys::CHECKOUT)?)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutMode::Branch => "branch",
            CheckoutMode::Tag => "tag",
            CheckoutMode::Revision => "revision",
        }
    }
}

/// Install the lazy default deriving the checkout mode from the legacy
/// tag boolean (`true` means tag mode).
pub fn install_checkout_default(settings: &mut Settings) {
    settings.set_if_empty_with(keys::CHECKOUT, |s| {
        let tag = s.get_bool(keys::CHECKOUT_TAG).unwrap_or(false);
        Value::Str(if tag { "tag" } else { "branch" }.to_string())
    });
}

/// The two derived strings git needs for one deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutTarget {
    /// Argument passed to git to select what to check out,
    /// e.g. `origin/main`, `tags/v1.2.0`, or a bare revision id.
    pub target: String,
    /// Ref name used for depth-limited fetch and local comparison.
    pub branch_label: String,
}

impl CheckoutTarget {
    /// Compute target and branch label from mode, remote, and reference.
    ///
    /// Revision mode ignores the remote entirely, so deploys can be pinned
    /// to a commit hash rather than a moving ref.
    pub fn plan(mode: CheckoutMode, remote: &str, reference: &str) -> StageResult<Self> {
        if reference.is_empty() {
            return Err(StageError::InvalidReference {
                message: "reference must not be empty".to_string(),
            });
        }

        match mode {
            CheckoutMode::Branch => {
                if remote.is_empty() {
                    return Err(StageError::InvalidReference {
                        message: "remote name must not be empty in branch mode".to_string(),
                    });
                }
                Ok(Self {
                    target: format!("{remote}/{reference}"),
                    branch_label: reference.to_string(),
                })
            }
            CheckoutMode::Tag => Ok(Self {
                target: format!("tags/{reference}"),
                branch_label: format!("tags/{reference}"),
            }),
            CheckoutMode::Revision => Ok(Self {
                target: reference.to_string(),
                branch_label: reference.to_string(),
            }),
        }
    }

    /// Resolve mode, remote, and reference from settings and plan.
    pub fn from_settings(settings: &mut Settings) -> StageResult<Self> {
        let mode = CheckoutMode::from_settings(settings)?;
        let remote = settings.get_str(keys::GIT_REMOTE)?;
        let reference = settings.get_str(keys::BRANCH)?;
        Self::plan(mode, &remote, &reference)
    }
}

/// Optional shallow-fetch depth.
///
/// Absent or zero depth means full history; this mirrors the documented
/// default rather than treating zero as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthOption(Option<u64>);

impl DepthOption {
    pub fn new(depth: Option<u64>) -> Self {
        Self(depth.filter(|n| *n > 0))
    }

    pub fn disabled() -> Self {
        Self(None)
    }

    pub fn from_settings(settings: &mut Settings) -> StageResult<Self> {
        Ok(Self::new(settings.get_opt_int(keys::DEPTH)?))
    }

    pub fn is_enabled(&self) -> bool {
        self.0.is_some()
    }

    pub fn depth(&self) -> Option<u64> {
        self.0
    }

    /// Flags for `git fetch`.
    pub fn fetch_args(&self) -> Vec<String> {
        match self.0 {
            Some(n) => vec![format!("--depth={n}")],
            None => Vec::new(),
        }
    }

    /// Flags for the initial `git clone`.
    ///
    /// A shallow clone also disables the single-branch restriction so the
    /// configured branch can still be followed across re-targeting.
    pub fn clone_args(&self) -> Vec<String> {
        match self.0 {
            Some(n) => vec![format!("--depth={n}"), "--no-single-branch".to_string()],
            None => Vec::new(),
        }
    }
}
