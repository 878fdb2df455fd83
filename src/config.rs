//! Configuration loading
//!
//! A `stagehand.toml` file and `STAGEHAND_*` environment variables
//! populate the settings registry before the lazy defaults are installed,
//! so anything configured explicitly wins over a default. Unknown keys are
//! collected as non-fatal warnings rather than rejected.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{StageError, StageResult};
use crate::plan::install_checkout_default;
use crate::settings::{keys, Settings, Value};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "stagehand.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
}

/// Top-level deploy configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub repo_url: Option<String>,
    pub branch: Option<String>,
    pub deploy_root: Option<String>,

    #[serde(default)]
    pub scm: ScmConfig,

    #[serde(default)]
    pub transfer: TransferConfig,
}

/// Source-control section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScmConfig {
    /// "branch", "tag", or "revision"
    pub checkout: Option<String>,
    /// Legacy flag; true means tag mode
    pub checkout_tag: Option<bool>,
    pub git_remote: Option<String>,
    /// 0 means full history
    pub depth: Option<u64>,
    pub stage: Option<String>,
    /// Empty string disables the cache hop
    pub cache: Option<String>,
    pub enable_submodules: Option<bool>,
    pub reset_submodules: Option<bool>,
    pub bypass_clone: Option<bool>,
}

/// Transfer section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransferConfig {
    pub options: Option<Vec<String>>,
    pub copy_command: Option<String>,
    pub sparse: Option<Vec<String>>,
    pub target_dir: Option<String>,
}

impl FileConfig {
    /// Load a config file, collecting unknown-key warnings.
    pub fn load_with_warnings(path: &Path) -> StageResult<(Self, Vec<ConfigWarning>)> {
        let content = fs::read_to_string(path)?;

        let mut unknown = Vec::new();
        let deserializer = toml::de::Deserializer::new(&content);
        let config: FileConfig = serde_ignored::deserialize(deserializer, |p| {
            unknown.push(p.to_string());
        })
        .map_err(|e| StageError::Config {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let warnings = unknown
            .into_iter()
            .map(|key| ConfigWarning {
                key,
                file: path.to_path_buf(),
            })
            .collect();

        Ok((config, warnings))
    }

    /// Write every configured value into the settings registry.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(v) = &self.repo_url {
            settings.set(keys::REPO_URL, v.clone());
        }
        if let Some(v) = &self.branch {
            settings.set(keys::BRANCH, v.clone());
        }
        if let Some(v) = &self.deploy_root {
            settings.set(keys::DEPLOY_ROOT, v.clone());
        }

        if let Some(v) = &self.scm.checkout {
            settings.set(keys::CHECKOUT, v.clone());
        }
        if let Some(v) = self.scm.checkout_tag {
            settings.set(keys::CHECKOUT_TAG, v);
        }
        if let Some(v) = &self.scm.git_remote {
            settings.set(keys::GIT_REMOTE, v.clone());
        }
        if let Some(v) = self.scm.depth {
            settings.set(keys::DEPTH, v);
        }
        if let Some(v) = &self.scm.stage {
            settings.set(keys::STAGE, v.clone());
        }
        if let Some(v) = &self.scm.cache {
            if v.is_empty() {
                settings.set(keys::CACHE, Value::Empty);
            } else {
                settings.set(keys::CACHE, v.clone());
            }
        }
        if let Some(v) = self.scm.enable_submodules {
            settings.set(keys::ENABLE_SUBMODULES, v);
        }
        if let Some(v) = self.scm.reset_submodules {
            settings.set(keys::RESET_SUBMODULES, v);
        }
        if let Some(v) = self.scm.bypass_clone {
            settings.set(keys::BYPASS_CLONE, v);
        }

        if let Some(v) = &self.transfer.options {
            settings.set(keys::TRANSFER_OPTIONS, v.clone());
        }
        if let Some(v) = &self.transfer.copy_command {
            settings.set(keys::COPY_COMMAND, v.clone());
        }
        if let Some(v) = &self.transfer.sparse {
            settings.set(keys::SPARSE_CHECKOUT, v.clone());
        }
        if let Some(v) = &self.transfer.target_dir {
            settings.set(keys::TARGET_DIR, v.clone());
        }
    }
}

/// Apply environment variable overrides (`STAGEHAND_*` prefix).
///
/// Every scalar setting has a corresponding variable. String variables
/// are ignored when empty, except `STAGEHAND_CACHE`, where an empty value
/// disables the cache hop just like an empty config entry. Values that do
/// not parse for their kind are ignored rather than fatal.
pub fn apply_env_overrides(settings: &mut Settings) {
    for (var, key) in [
        ("STAGEHAND_REPO_URL", keys::REPO_URL),
        ("STAGEHAND_BRANCH", keys::BRANCH),
        ("STAGEHAND_DEPLOY_ROOT", keys::DEPLOY_ROOT),
        ("STAGEHAND_CHECKOUT", keys::CHECKOUT),
        ("STAGEHAND_GIT_REMOTE", keys::GIT_REMOTE),
        ("STAGEHAND_STAGE", keys::STAGE),
        ("STAGEHAND_TARGET_DIR", keys::TARGET_DIR),
        ("STAGEHAND_COPY_COMMAND", keys::COPY_COMMAND),
    ] {
        if let Ok(value) = std::env::var(var) {
            if !value.is_empty() {
                settings.set(key, value);
            }
        }
    }

    if let Ok(value) = std::env::var("STAGEHAND_CACHE") {
        if value.is_empty() {
            settings.set(keys::CACHE, Value::Empty);
        } else {
            settings.set(keys::CACHE, value);
        }
    }

    if let Ok(value) = std::env::var("STAGEHAND_DEPTH") {
        if let Ok(depth) = value.parse::<u64>() {
            settings.set(keys::DEPTH, depth);
        }
    }

    for (var, key) in [
        ("STAGEHAND_ENABLE_SUBMODULES", keys::ENABLE_SUBMODULES),
        ("STAGEHAND_RESET_SUBMODULES", keys::RESET_SUBMODULES),
        ("STAGEHAND_BYPASS_CLONE", keys::BYPASS_CLONE),
    ] {
        if let Ok(value) = std::env::var(var) {
            match value.as_str() {
                "1" | "true" => settings.set(key, true),
                "0" | "false" => settings.set(key, false),
                _ => {}
            }
        }
    }
}

/// Install the default setting table.
///
/// Defaults never replace values configured earlier; the checkout mode
/// default is deferred because it depends on the legacy tag flag.
pub fn apply_defaults(settings: &mut Settings) {
    settings.set_if_empty(
        keys::TRANSFER_OPTIONS,
        Value::List(vec!["--archive".to_string()]),
    );
    settings.set_if_empty(keys::COPY_COMMAND, "rsync --archive --acls --xattrs");
    settings.set_if_empty(keys::SPARSE_CHECKOUT, Value::List(Vec::new()));
    settings.set_if_empty(keys::CHECKOUT_TAG, false);
    install_checkout_default(settings);
    settings.set_if_empty(keys::DEPTH, 1u64);
    settings.set_if_empty(keys::STAGE, "tmp/deploy");
    settings.set_if_empty(keys::CACHE, "shared/deploy");
    settings.set_if_empty(keys::TARGET_DIR, ".");
    settings.set_if_empty(keys::GIT_REMOTE, "origin");
    settings.set_if_empty(keys::ENABLE_SUBMODULES, false);
    settings.set_if_empty(keys::RESET_SUBMODULES, false);
    settings.set_if_empty(keys::BYPASS_CLONE, false);
}
