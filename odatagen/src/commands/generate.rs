use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use super::open_config;
use crate::{
    ops::{self, GenerateOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    /// Path to the configuration file (discovered when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Preview generated code without writing to disk
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    pub fn run(&self) -> Result<()> {
        let config = open_config(self.config.as_ref())?;
        let report = ops::generate(
            &config,
            GenerateOptions {
                dry_run: self.dry_run,
            },
        )?;
        report.render(&mut TerminalOutput);
        Ok(())
    }
}
