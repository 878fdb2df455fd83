//! Stage and cache path resolution
//!
//! Relative paths are rooted under the deploy root; paths that are already
//! absolute are returned unchanged, so resolution is idempotent.

use std::path::{Path, PathBuf};

use crate::error::StageResult;
use crate::settings::{keys, Settings};

/// Root a path under `root` unless it is already absolute.
pub fn resolve_under(root: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        root.join(candidate)
    }
}

/// Resolved staging and cache locations for one deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
    /// Absolute local staging path (checkout lives here between deploys)
    pub stage: PathBuf,
    /// Absolute cache path, or `None` to transfer straight to the release
    /// directory
    pub cache: Option<PathBuf>,
}

impl PathSpec {
    pub fn resolve(deploy_root: &Path, stage: &str, cache: Option<&str>) -> Self {
        let cache = cache
            .filter(|c| !c.is_empty())
            .map(|c| resolve_under(deploy_root, c));
        Self {
            stage: resolve_under(deploy_root, stage),
            cache,
        }
    }

    pub fn from_settings(settings: &mut Settings, deploy_root: &Path) -> StageResult<Self> {
        let stage = settings.get_str(keys::STAGE)?;
        let cache = settings.get_opt_str(keys::CACHE)?;
        Ok(Self::resolve(deploy_root, &stage, cache.as_deref()))
    }
}
