//! Check operation - everything except writing.

use eyre::{Context, Result};
use odatagen_codegen_rust::Generator;
use odatagen_manifest::ConfigFile;

use super::prepare;
use crate::reports::{CheckReport, ServiceSummary};

/// Execute the check operation.
///
/// Loads every service, runs the pipeline and renders all artifacts in
/// memory, so anything `generate` would fail on fails here too.
pub fn check(config: &ConfigFile) -> Result<CheckReport> {
    let prepared = prepare(config)?;

    let services = prepared.iter().map(ServiceSummary::from_prepared).collect();
    let plans = prepared.into_iter().map(|p| p.plan).collect();
    let files = Generator::new(plans)
        .render()
        .wrap_err("Failed to render generated code")?
        .files()
        .count();

    Ok(CheckReport {
        config_path: config.path().to_path_buf(),
        services,
        files,
    })
}
