//! File-sync transfer via rsync
//!
//! rsync's wire protocol and delta algorithm are its own business; this
//! module only builds argument lists and runs the command. Sources given
//! with a trailing slash transfer directory contents rather than the
//! directory itself.

use std::path::Path;

use crate::error::{StageError, StageResult};
use crate::process;

/// A transfer source argument.
///
/// `contents_of` copies what is inside the directory (trailing slash);
/// `path` copies the path itself, which is what the sparse case wants.
pub fn contents_of(dir: &Path) -> String {
    format!("{}/", dir.display())
}

pub fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

/// Build the full rsync argument list: options, then sources, then the
/// destination.
pub fn rsync_args(options: &[String], sources: &[String], dest: &Path) -> Vec<String> {
    let mut args = Vec::with_capacity(options.len() + sources.len() + 1);
    args.extend(options.iter().cloned());
    args.extend(sources.iter().cloned());
    args.push(dest.display().to_string());
    args
}

/// Run one rsync transfer. Any non-zero exit is fatal.
pub fn rsync(options: &[String], sources: &[String], dest: &Path) -> StageResult<()> {
    let args = rsync_args(options, sources, dest);
    process::run("rsync", &args, None)?;
    Ok(())
}

/// The separately-configured command for the cache-to-release hop,
/// e.g. `rsync --archive --acls --xattrs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyCommand {
    program: String,
    base_args: Vec<String>,
}

impl CopyCommand {
    pub fn parse(command_line: &str) -> StageResult<Self> {
        let mut parts = command_line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| StageError::InvalidReference {
                message: "copy command must not be empty".to_string(),
            })?
            .to_string();
        Ok(Self {
            program,
            base_args: parts.map(str::to_string).collect(),
        })
    }

    /// Copy the contents of `source_dir` into `dest`.
    pub fn run(&self, source_dir: &Path, dest: &Path) -> StageResult<()> {
        let mut args = self.base_args.clone();
        args.push(contents_of(source_dir));
        args.push(dest.display().to_string());
        process::run(&self.program, &args, None)?;
        Ok(())
    }
}

/// Check if rsync is available on this host.
pub fn has_rsync() -> bool {
    process::available("rsync", "--version")
}
