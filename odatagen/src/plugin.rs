//! Pipeline plugin that reports phase progress through `tracing`.

use eyre::Result;
use odatagen_codegen::pipeline::{CompilationContext, Plugin};

pub struct TracingPlugin;

impl Plugin for TracingPlugin {
    fn name(&self) -> &'static str {
        "tracing"
    }

    fn on_before_phase(&self, phase: &str, ctx: &mut CompilationContext) -> Result<()> {
        tracing::debug!(phase, namespace = %ctx.target.namespace, "running phase");
        Ok(())
    }

    fn on_after_phase(&self, phase: &str, ctx: &mut CompilationContext) -> Result<()> {
        tracing::debug!(
            phase,
            namespace = %ctx.target.namespace,
            warnings = ctx.warning_count(),
            errors = ctx.error_count(),
            "phase finished"
        );
        Ok(())
    }
}
