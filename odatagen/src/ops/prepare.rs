//! Prepare operation - load metadata and run the pipeline per service.

use eyre::{Context, Result};
use odatagen_codegen::pipeline::{GenerationPlan, Pipeline, ServiceTarget};
use odatagen_manifest::ConfigFile;

use crate::plugin::TracingPlugin;

/// One configured service, ready for emission.
#[derive(Debug)]
pub struct PreparedService {
    /// Where the metadata came from, as resolved by the loader
    pub origin: String,
    pub plan: GenerationPlan,
}

/// Load every service's metadata and run the pipeline on it, in
/// configuration order. The first fatal error stops the run.
pub fn prepare(config: &ConfigFile) -> Result<Vec<PreparedService>> {
    let pipeline = Pipeline::new().plugin(TracingPlugin);
    let mut prepared = Vec::with_capacity(config.services().len());

    for service in config.services() {
        let graph = odatagen_edm::load(&service.metadata, config.base_dir())
            .wrap_err_with(|| format!("Failed to load metadata for '{}'", service.namespace))?;
        let origin = graph.origin.clone();

        let target = ServiceTarget::new(&service.namespace, service.context_name.clone());
        let plan = pipeline
            .run(graph, target)
            .and_then(|ctx| ctx.into_plan())
            .wrap_err_with(|| format!("Failed to prepare service '{}'", service.namespace))?;

        tracing::info!(
            namespace = %service.namespace,
            origin = %origin,
            warnings = plan.diagnostics.iter().filter(|d| d.severity.is_warning()).count(),
            "prepared service"
        );
        prepared.push(PreparedService { origin, plan });
    }

    Ok(prepared)
}
