//! Compilation context passed through pipeline phases.

use eyre::{OptionExt, Result};
use odatagen_edm::SchemaGraph;

use super::diagnostic::{Diagnostic, Severity};
use crate::{mapped::MappedSchema, names::ResolvedNames};

/// What one generation pass produces: the artifact namespace and the
/// name of the root container type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceTarget {
    /// Names the emitted artifact
    pub namespace: String,
    /// Name of the root container type
    pub context_name: String,
}

impl ServiceTarget {
    pub const DEFAULT_CONTEXT: &'static str = "ODataContainer";

    pub fn new(namespace: impl Into<String>, context_name: Option<String>) -> Self {
        Self {
            namespace: namespace.into(),
            context_name: context_name.unwrap_or_else(|| Self::DEFAULT_CONTEXT.to_string()),
        }
    }
}

/// Context passed through all pipeline phases.
///
/// This struct carries the state of compilation through each phase,
/// accumulating results and diagnostics along the way.
#[derive(Debug)]
pub struct CompilationContext {
    /// The schema graph being compiled.
    pub graph: SchemaGraph,
    /// The service this pass generates.
    pub target: ServiceTarget,
    /// Type mappings (populated by MapTypesPhase).
    pub mapped: Option<MappedSchema>,
    /// Operation identifiers (populated by ResolveNamesPhase).
    pub names: Option<ResolvedNames>,
    /// Diagnostics collected during compilation.
    pub diagnostics: Vec<Diagnostic>,
}

impl CompilationContext {
    /// Create a new compilation context for one service.
    pub fn new(graph: SchemaGraph, target: ServiceTarget) -> Self {
        Self {
            graph,
            target,
            mapped: None,
            names: None,
            diagnostics: Vec::new(),
        }
    }

    /// Check if any error diagnostics have been recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }

    /// Count the number of error diagnostics.
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// Count the number of warning diagnostics.
    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Add a diagnostic.
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Get all error diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.severity, Severity::Error))
    }

    /// Get all warning diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.severity, Severity::Warning))
    }

    /// Finish compilation, handing everything an emitter needs over as one
    /// plan.
    ///
    /// # Errors
    ///
    /// Fails if the mapping or naming phase has not run.
    pub fn into_plan(self) -> Result<GenerationPlan> {
        let mapped = self
            .mapped
            .ok_or_eyre("type mappings not set - did MapTypesPhase run?")?;
        let names = self
            .names
            .ok_or_eyre("operation names not set - did ResolveNamesPhase run?")?;
        Ok(GenerationPlan {
            graph: self.graph,
            target: self.target,
            mapped,
            names,
            diagnostics: self.diagnostics,
        })
    }
}

/// A fully prepared generation pass.
#[derive(Debug, Clone)]
pub struct GenerationPlan {
    pub graph: SchemaGraph,
    pub target: ServiceTarget,
    pub mapped: MappedSchema,
    pub names: ResolvedNames,
    pub diagnostics: Vec<Diagnostic>,
}
