//! Error types for Stagehand
//!
//! Uses `thiserror` for library errors. Every variant is fatal to the
//! current deploy attempt and propagates unmodified to the caller; there
//! is no automatic retry and no rollback of already-staged local state.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Stagehand operations
pub type StageResult<T> = Result<T, StageError>;

/// Main error type for Stagehand operations
#[derive(Error, Debug)]
pub enum StageError {
    /// A setting was read with no value and no default
    #[error("setting '{key}' has no value and no default")]
    UnresolvedSetting { key: String },

    /// A setting resolved to a value of the wrong kind
    #[error("setting '{key}' is not a {expected}")]
    SettingKind { key: String, expected: &'static str },

    /// Malformed checkout target inputs (empty reference, unknown mode)
    #[error("invalid checkout reference: {message}")]
    InvalidReference { message: String },

    /// Non-zero exit from an invoked git or rsync command
    #[error("command `{command} {}` exited with {}: {stderr}", args.join(" "), status_label(*status))]
    ExternalCommand {
        command: String,
        args: Vec<String>,
        status: Option<i32>,
        stderr: String,
    },

    /// Invalid configuration file
    #[error("invalid config in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn status_label(status: Option<i32>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => "signal".to_string(),
    }
}
