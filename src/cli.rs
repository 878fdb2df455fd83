use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Stagehand - incremental release deployment using git and rsync
#[derive(Parser, Debug)]
#[command(name = "stagehand")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which reference to deploy; at most one of these may be given.
#[derive(Args, Debug, Clone, Default)]
pub struct RefArgs {
    /// Deploy the tip of this branch
    #[arg(long, conflicts_with_all = ["tag", "revision"])]
    pub branch: Option<String>,

    /// Deploy this tag
    #[arg(long, conflicts_with = "revision")]
    pub tag: Option<String>,

    /// Deploy this exact revision (commit id)
    #[arg(long)]
    pub revision: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create and populate a new release directory
    Deploy {
        /// Path to the config file
        #[arg(short, long, default_value = "stagehand.toml")]
        config: PathBuf,

        #[command(flatten)]
        refs: RefArgs,
    },

    /// Sanity-check resolved paths and external tools without deploying
    Check {
        /// Path to the config file
        #[arg(short, long, default_value = "stagehand.toml")]
        config: PathBuf,

        #[command(flatten)]
        refs: RefArgs,
    },

    /// Show what a deploy would do, without running anything
    Plan {
        /// Path to the config file
        #[arg(short, long, default_value = "stagehand.toml")]
        config: PathBuf,

        #[command(flatten)]
        refs: RefArgs,
    },

    /// Print the revision currently checked out in the stage
    Revision {
        /// Path to the config file
        #[arg(short, long, default_value = "stagehand.toml")]
        config: PathBuf,

        #[command(flatten)]
        refs: RefArgs,
    },
}
