//! Pipeline orchestrator.

use eyre::Result;
use odatagen_edm::SchemaGraph;

use super::{
    CompilationContext, Phase, Plugin, ServiceTarget,
    phases::{MapTypesPhase, ResolveNamesPhase, ValidatePhase},
};

/// The compilation pipeline orchestrator.
///
/// Runs the built-in phases (validate, map-types, resolve-names) followed
/// by any user phases, calling plugin hooks before and after each phase.
///
/// # Example
///
/// ```ignore
/// let pipeline = Pipeline::new()
///     .plugin(TracingPlugin)
///     .phase(MyCustomPhase);
///
/// let ctx = pipeline.run(graph, target)?;
/// ```
pub struct Pipeline {
    phases: Vec<Box<dyn Phase>>,
    plugins: Vec<Box<dyn Plugin>>,
}

impl Pipeline {
    /// Create a new pipeline with only the built-in phases.
    pub fn new() -> Self {
        Self {
            phases: Vec::new(),
            plugins: Vec::new(),
        }
    }

    /// Add a phase to run after the built-in phases.
    pub fn phase(mut self, phase: impl Phase + 'static) -> Self {
        self.phases.push(Box::new(phase));
        self
    }

    /// Add a plugin to receive phase lifecycle hooks.
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Run the pipeline on one service's schema graph.
    ///
    /// # Errors
    ///
    /// Returns an error if any phase fails fatally. Generation errors
    /// (`odatagen_codegen::Error`) can be recovered with `downcast_ref`.
    pub fn run(&self, graph: SchemaGraph, target: ServiceTarget) -> Result<CompilationContext> {
        let mut ctx = CompilationContext::new(graph, target);

        let builtin_phases: Vec<Box<dyn Phase>> = vec![
            Box::new(ValidatePhase::new()),
            Box::new(MapTypesPhase),
            Box::new(ResolveNamesPhase),
        ];

        for phase in builtin_phases.iter().chain(self.phases.iter()) {
            self.run_phase(phase.as_ref(), &mut ctx)?;
        }

        Ok(ctx)
    }

    fn run_phase(&self, phase: &dyn Phase, ctx: &mut CompilationContext) -> Result<()> {
        let phase_name = phase.name();

        for plugin in &self.plugins {
            plugin.on_before_phase(phase_name, ctx)?;
        }

        phase.run(ctx)?;

        for plugin in &self.plugins {
            plugin.on_after_phase(phase_name, ctx)?;
        }

        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
