//! Generation configuration for odatagen.
//!
//! A configuration names an output directory and the services to generate
//! clients for. It is read from `odatagen.toml` or `odataconfig.json`, found
//! through [`Discovery`], and validated with span-carrying diagnostics.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod config;
mod discovery;
mod error;
mod file;
mod starter;
mod validate;

use std::path::Path;

pub use config::{
    Config, FILE_NAMES, Format, JSON_FILE_NAME, ServiceConfig, TOML_FILE_NAME, parse_config,
};
pub use discovery::{CONFIG_ENV, Discovery, Probe, Strategy, USER_DIR_NAME};
pub use error::{Error, Result, SourceContext};
pub use file::ConfigFile;
pub use starter::StarterConfig;

/// Find and open the configuration using the standard strategies.
pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<ConfigFile> {
    let path = Discovery::standard(explicit, cwd).find()?;
    ConfigFile::open(path)
}
