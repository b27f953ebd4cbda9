use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use super::open_config;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    /// Path to the configuration file (discovered when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl CheckCommand {
    pub fn run(&self) -> Result<()> {
        let config = open_config(self.config.as_ref())?;
        let report = ops::check(&config)?;
        report.render(&mut TerminalOutput);
        Ok(())
    }
}
