//! Per-service summary shared by the check and generate reports.

use odatagen_codegen::pipeline::Diagnostic;

use crate::ops::PreparedService;

#[derive(Debug)]
pub struct ServiceSummary {
    pub namespace: String,
    pub context_name: String,
    pub origin: String,
    pub types: usize,
    pub operations: usize,
    pub resource_sets: usize,
    pub warnings: Vec<Diagnostic>,
}

impl ServiceSummary {
    pub fn from_prepared(prepared: &PreparedService) -> Self {
        let plan = &prepared.plan;
        Self {
            namespace: plan.target.namespace.clone(),
            context_name: plan.target.context_name.clone(),
            origin: prepared.origin.clone(),
            types: plan.graph.type_count(),
            operations: plan.graph.operations.len(),
            resource_sets: plan.graph.resource_sets.len(),
            warnings: plan
                .diagnostics
                .iter()
                .filter(|d| d.severity.is_warning())
                .cloned()
                .collect(),
        }
    }

    /// One line per warning, with its schema location when known.
    pub fn warning_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.warnings.iter().map(|d| match &d.location {
            Some(loc) => format!("[{}] {}\n  --> {}", self.namespace, d.message, loc),
            None => format!("[{}] {}", self.namespace, d.message),
        })
    }
}
