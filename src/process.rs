//! Subprocess invocation for the external git and rsync commands
//!
//! Commands report success or failure through their exit status; a
//! non-zero exit becomes an [`ExternalCommand`](crate::StageError::ExternalCommand)
//! error carrying the command line and captured stderr. Commands block
//! until the process exits; there is no internal timeout.

use std::path::Path;
use std::process::{Command, Output, Stdio};

use crate::error::{StageError, StageResult};

/// Run a command, capturing output, and fail on non-zero exit.
pub fn run(command: &str, args: &[String], cwd: Option<&Path>) -> StageResult<Output> {
    let mut cmd = Command::new(command);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let output = cmd.output().map_err(|e| StageError::ExternalCommand {
        command: command.to_string(),
        args: args.to_vec(),
        status: None,
        stderr: format!("failed to start: {e}"),
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(StageError::ExternalCommand {
            command: command.to_string(),
            args: args.to_vec(),
            status: output.status.code(),
            stderr,
        });
    }

    Ok(output)
}

/// Check whether a command is runnable on this host.
pub fn available(command: &str, probe_arg: &str) -> bool {
    Command::new(command)
        .arg(probe_arg)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
