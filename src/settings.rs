//! Lazily-resolved deploy settings
//!
//! A [`Settings`] registry maps string keys to values that are either
//! literals or deferred computations. Defaults are installed with
//! [`Settings::set_if_empty`] so that anything configured earlier (config
//! file, CLI flags) wins. Deferred defaults are evaluated exactly once, on
//! first read, and may read other settings.
//!
//! One `Settings` instance is created per deploy run and discarded
//! afterward; it is the only mutable state shared between components.

use std::collections::HashMap;
use std::fmt;

use crate::error::{StageError, StageResult};

/// Setting keys used by the deploy pipeline.
pub mod keys {
    /// Repository URL to clone from (required, no default)
    pub const REPO_URL: &str = "repo_url";
    /// Branch, tag, or revision to deploy (required, no default)
    pub const BRANCH: &str = "branch";
    /// Absolute deployment root on the target (required, no default)
    pub const DEPLOY_ROOT: &str = "deploy_root";
    /// Checkout mode: "branch", "tag", or "revision"
    pub const CHECKOUT: &str = "checkout";
    /// Legacy boolean; true means tag mode (superseded by CHECKOUT)
    pub const CHECKOUT_TAG: &str = "checkout_tag";
    /// Name of the git remote
    pub const GIT_REMOTE: &str = "git_remote";
    /// Shallow fetch depth; 0 or empty means full history
    pub const DEPTH: &str = "depth";
    /// Local staging path, relative paths rooted under DEPLOY_ROOT
    pub const STAGE: &str = "stage";
    /// Cache path, relative paths rooted under DEPLOY_ROOT; empty disables
    pub const CACHE: &str = "cache";
    /// Subdirectory of the stage used as the transfer source
    pub const TARGET_DIR: &str = "target_dir";
    /// Sparse path list; non-empty restricts what is transferred
    pub const SPARSE_CHECKOUT: &str = "sparse_checkout";
    /// Option list for the stage-to-cache transfer
    pub const TRANSFER_OPTIONS: &str = "transfer_options";
    /// Full command line for the cache-to-release copy
    pub const COPY_COMMAND: &str = "copy_command";
    /// Update submodules after checkout
    pub const ENABLE_SUBMODULES: &str = "enable_submodules";
    /// Force-reset submodule state before updating
    pub const RESET_SUBMODULES: &str = "reset_submodules";
    /// Skip clone/fetch and transfer whatever is already staged
    pub const BYPASS_CLONE: &str = "bypass_clone";
}

/// A resolved setting value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    Bool(bool),
    Int(u64),
    List(Vec<String>),
    /// Explicitly disabled ("nil cache", "no depth")
    Empty,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Int(n)
    }
}

impl From<Vec<String>> for Value {
    fn from(list: Vec<String>) -> Self {
        Value::List(list)
    }
}

type Thunk = Box<dyn Fn(&mut Settings) -> Value>;

enum Entry {
    Resolved(Value),
    Deferred(Thunk),
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Resolved(v) => write!(f, "Resolved({v:?})"),
            Entry::Deferred(_) => write!(f, "Deferred(<thunk>)"),
        }
    }
}

/// Write-once-effectively registry of deploy settings.
#[derive(Debug, Default)]
pub struct Settings {
    entries: HashMap<String, Entry>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a literal value, replacing any existing entry.
    ///
    /// Intended for config-file and CLI overrides, which are applied
    /// before the lazy defaults are installed.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.entries
            .insert(key.to_string(), Entry::Resolved(value.into()));
    }

    /// Store a literal default only if `key` has no value yet.
    pub fn set_if_empty(&mut self, key: &str, value: impl Into<Value>) {
        self.entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Resolved(value.into()));
    }

    /// Store a deferred default only if `key` has no value yet.
    ///
    /// The thunk runs at most once, on first read, and may read other
    /// settings through the registry it is handed.
    pub fn set_if_empty_with<F>(&mut self, key: &str, thunk: F)
    where
        F: Fn(&mut Settings) -> Value + 'static,
    {
        self.entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Deferred(Box::new(thunk)));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Resolve a setting, memoizing deferred defaults on first access.
    pub fn get(&mut self, key: &str) -> StageResult<Value> {
        match self.entries.get(key) {
            Some(Entry::Resolved(value)) => Ok(value.clone()),
            Some(Entry::Deferred(_)) => {
                // Take the thunk out so it can borrow the registry while
                // it resolves the settings it depends on.
                let Some(Entry::Deferred(thunk)) = self.entries.remove(key) else {
                    unreachable!();
                };
                let value = thunk(self);
                self.entries
                    .insert(key.to_string(), Entry::Resolved(value.clone()));
                Ok(value)
            }
            None => Err(StageError::UnresolvedSetting {
                key: key.to_string(),
            }),
        }
    }

    pub fn get_str(&mut self, key: &str) -> StageResult<String> {
        match self.get(key)? {
            Value::Str(s) => Ok(s),
            _ => Err(StageError::SettingKind {
                key: key.to_string(),
                expected: "string",
            }),
        }
    }

    /// Resolve a string setting where `Empty` (or an empty string) means
    /// "disabled".
    pub fn get_opt_str(&mut self, key: &str) -> StageResult<Option<String>> {
        match self.get(key)? {
            Value::Empty => Ok(None),
            Value::Str(s) if s.is_empty() => Ok(None),
            Value::Str(s) => Ok(Some(s)),
            _ => Err(StageError::SettingKind {
                key: key.to_string(),
                expected: "string",
            }),
        }
    }

    pub fn get_bool(&mut self, key: &str) -> StageResult<bool> {
        match self.get(key)? {
            Value::Bool(b) => Ok(b),
            _ => Err(StageError::SettingKind {
                key: key.to_string(),
                expected: "boolean",
            }),
        }
    }

    pub fn get_list(&mut self, key: &str) -> StageResult<Vec<String>> {
        match self.get(key)? {
            Value::List(list) => Ok(list),
            Value::Empty => Ok(Vec::new()),
            _ => Err(StageError::SettingKind {
                key: key.to_string(),
                expected: "list",
            }),
        }
    }

    /// Resolve an integer setting where `Empty`, `false`, or zero means
    /// "disabled".
    pub fn get_opt_int(&mut self, key: &str) -> StageResult<Option<u64>> {
        match self.get(key)? {
            Value::Int(0) | Value::Bool(false) | Value::Empty => Ok(None),
            Value::Int(n) => Ok(Some(n)),
            _ => Err(StageError::SettingKind {
                key: key.to_string(),
                expected: "integer",
            }),
        }
    }
}
