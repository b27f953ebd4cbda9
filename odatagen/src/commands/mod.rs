mod check;
mod completions;
mod generate;
mod init;

use std::path::PathBuf;

use check::CheckCommand;
use clap::{Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::{Context, Result};
use generate::GenerateCommand;
use init::InitCommand;
use odatagen_manifest::ConfigFile;

/// Extension trait for exiting on configuration errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for odatagen_manifest::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

/// Discover and open the configuration, honouring an explicit `--config`.
pub(crate) fn open_config(explicit: Option<&PathBuf>) -> Result<ConfigFile> {
    let cwd = std::env::current_dir().wrap_err("Failed to get current directory")?;
    Ok(odatagen_manifest::discover(explicit.map(PathBuf::as_path), &cwd).unwrap_or_exit())
}

#[derive(Parser)]
#[command(name = "odatagen")]
#[command(version)]
#[command(about = "Generate typed Rust clients from OData metadata")]
pub(crate) struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Generate(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Init(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate client code for every configured service
    Generate(GenerateCommand),

    /// Load metadata and run the pipeline without writing anything
    Check(CheckCommand),

    /// Write a starter odatagen.toml
    Init(InitCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}
