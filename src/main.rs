//! Stagehand CLI - incremental release deployment using git and rsync
//!
//! Usage: stagehand <COMMAND>
//!
//! Commands:
//!   deploy    Create and populate a new release directory
//!   check     Sanity-check paths and external tools
//!   plan      Show what a deploy would do
//!   revision  Print the revision checked out in the stage

mod cli;

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use stagehand::config::{self, FileConfig};
use stagehand::deploy::{plan_summary, Deploy};
use stagehand::settings::{keys, Settings};
use stagehand::sync::SyncOrchestrator;

use cli::{Cli, Commands, RefArgs};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Deploy { config, refs } => {
            let mut settings = build_settings(&config, &refs)?;
            let mut deploy = Deploy::new(&mut settings)?;

            if cli.verbose > 0 {
                eprintln!("release path: {}", deploy.release_path().display());
            }

            let report = deploy.run().context("deploy failed")?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "deployed {} to {}",
                    report.revision,
                    report.release_path.display()
                );
            }
        }

        Commands::Check { config, refs } => {
            let mut settings = build_settings(&config, &refs)?;
            let mut deploy = Deploy::new(&mut settings)?;
            deploy.check().context("check failed")?;

            if cli.json {
                println!("{}", serde_json::json!({ "ok": true }));
            } else {
                println!("ok");
            }
        }

        Commands::Plan { config, refs } => {
            let mut settings = build_settings(&config, &refs)?;
            let plan = plan_summary(&mut settings)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                println!("mode:         {}", plan.mode);
                println!("target:       {}", plan.target);
                println!("branch label: {}", plan.branch_label);
                println!("stage:        {}", plan.stage.display());
                match &plan.cache {
                    Some(cache) => println!("cache:        {}", cache.display()),
                    None => println!("cache:        (disabled)"),
                }
                match plan.depth {
                    Some(n) => println!("depth:        {n}"),
                    None => println!("depth:        full history"),
                }
                println!("releases:     {}", plan.release_path.display());
            }
        }

        Commands::Revision { config, refs } => {
            let mut settings = build_settings(&config, &refs)?;
            let orchestrator = SyncOrchestrator::from_settings(&mut settings)?;
            let revision = orchestrator.current_revision()?;

            if cli.json {
                println!("{}", serde_json::json!({ "revision": revision }));
            } else {
                println!("{revision}");
            }
        }
    }

    Ok(())
}

/// Build the settings registry for one run: config file, environment,
/// CLI reference selection, then the lazy defaults.
fn build_settings(config_path: &Path, refs: &RefArgs) -> Result<Settings> {
    let mut settings = Settings::new();

    if config_path.exists() {
        let (file_config, warnings) = FileConfig::load_with_warnings(config_path)
            .with_context(|| format!("cannot load {}", config_path.display()))?;
        for warning in &warnings {
            eprintln!(
                "warning: unknown config key '{}' in {}",
                warning.key,
                warning.file.display()
            );
        }
        file_config.apply(&mut settings);
    }

    config::apply_env_overrides(&mut settings);

    if let Some(branch) = &refs.branch {
        settings.set(keys::BRANCH, branch.clone());
        settings.set(keys::CHECKOUT, "branch");
    }
    if let Some(tag) = &refs.tag {
        settings.set(keys::BRANCH, tag.clone());
        settings.set(keys::CHECKOUT, "tag");
    }
    if let Some(revision) = &refs.revision {
        settings.set(keys::BRANCH, revision.clone());
        settings.set(keys::CHECKOUT, "revision");
    }

    config::apply_defaults(&mut settings);
    Ok(settings)
}
