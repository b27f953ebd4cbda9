//! Validate phase - runs lints on the schema graph.

use eyre::{Result, bail};
use odatagen_edm::SchemaGraph;

use crate::pipeline::{CompilationContext, Diagnostic, Phase};

/// A lint that checks the schema graph for issues.
pub trait Lint: Send + Sync {
    /// The name of this lint.
    fn name(&self) -> &'static str;

    /// Check the graph and add any diagnostics.
    fn check(&self, graph: &SchemaGraph, diagnostics: &mut Vec<Diagnostic>);
}

/// Phase that validates the schema graph using configurable lints.
pub struct ValidatePhase {
    lints: Vec<Box<dyn Lint>>,
}

impl ValidatePhase {
    /// Create a new validate phase with default lints.
    pub fn new() -> Self {
        Self {
            lints: vec![Box::new(EmptyContainerLint), Box::new(AbstractResourceSetLint)],
        }
    }

    /// Create a validate phase with no lints.
    pub fn empty() -> Self {
        Self { lints: Vec::new() }
    }

    /// Add a custom lint to the validation phase.
    pub fn with_lint(mut self, lint: impl Lint + 'static) -> Self {
        self.lints.push(Box::new(lint));
        self
    }
}

impl Default for ValidatePhase {
    fn default() -> Self {
        Self::new()
    }
}

impl Phase for ValidatePhase {
    fn name(&self) -> &'static str {
        "validate"
    }

    fn description(&self) -> &'static str {
        "Lint the schema graph"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        for lint in &self.lints {
            lint.check(&ctx.graph, &mut ctx.diagnostics);
        }

        // Fail if there are any errors (warnings are allowed)
        if ctx.has_errors() {
            bail!("Validation failed with {} error(s)", ctx.error_count());
        }

        Ok(())
    }
}

// ============================================================================
// Built-in lints
// ============================================================================

/// Lint that warns when the service exposes no entity sets.
pub struct EmptyContainerLint;

impl Lint for EmptyContainerLint {
    fn name(&self) -> &'static str {
        "empty-container"
    }

    fn check(&self, graph: &SchemaGraph, diagnostics: &mut Vec<Diagnostic>) {
        if graph.resource_sets.is_empty() {
            diagnostics.push(
                Diagnostic::warning(
                    "validate",
                    "the service exposes no entity sets; the container will only carry operations",
                )
                .at(graph.origin.clone()),
            );
        }
    }
}

/// Lint that warns about entity sets typed with an abstract entity type.
/// Such a set can only be populated with derived entities.
pub struct AbstractResourceSetLint;

impl Lint for AbstractResourceSetLint {
    fn name(&self) -> &'static str {
        "abstract-resource-set"
    }

    fn check(&self, graph: &SchemaGraph, diagnostics: &mut Vec<Diagnostic>) {
        for set in &graph.resource_sets {
            let is_abstract = graph
                .entity_type(&set.entity_type)
                .is_some_and(|entity| entity.is_abstract);
            if is_abstract {
                diagnostics.push(
                    Diagnostic::warning(
                        "validate",
                        format!(
                            "entity set `{}` is typed with abstract entity type `{}`",
                            set.name, set.entity_type
                        ),
                    )
                    .at(set.name.clone()),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use odatagen_edm::{EntityType, QualifiedName, ResourceSet};

    use super::*;
    use crate::pipeline::ServiceTarget;

    fn graph_with_set(is_abstract: bool) -> SchemaGraph {
        let name = QualifiedName::new("Sales", "Party");
        let mut graph = SchemaGraph::default();
        graph.entity_types.insert(
            name.clone(),
            EntityType {
                name: name.clone(),
                base: None,
                key: vec!["Id".into()],
                properties: Vec::new(),
                navigation: Vec::new(),
                is_abstract,
            },
        );
        graph.resource_sets.push(ResourceSet {
            name: "Parties".into(),
            entity_type: name,
        });
        graph
    }

    struct AlwaysFails;

    impl Lint for AlwaysFails {
        fn name(&self) -> &'static str {
            "always-fails"
        }

        fn check(&self, _graph: &SchemaGraph, diagnostics: &mut Vec<Diagnostic>) {
            diagnostics.push(Diagnostic::error("validate", "nope"));
        }
    }

    fn run(phase: ValidatePhase, graph: SchemaGraph) -> (Result<()>, CompilationContext) {
        let mut ctx = CompilationContext::new(graph, ServiceTarget::new("Sales", None));
        let result = phase.run(&mut ctx);
        (result, ctx)
    }

    #[test]
    fn test_empty_container_warns() {
        let (result, ctx) = run(ValidatePhase::new(), SchemaGraph::default());
        assert!(result.is_ok());
        assert_eq!(ctx.warning_count(), 1);
    }

    #[test]
    fn test_abstract_set_warns() {
        let (_, ctx) = run(ValidatePhase::new(), graph_with_set(true));
        let warnings: Vec<_> = ctx.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].location.as_deref(), Some("Parties"));
    }

    #[test]
    fn test_concrete_set_is_clean() {
        let (_, ctx) = run(ValidatePhase::new(), graph_with_set(false));
        assert!(ctx.diagnostics.is_empty());
    }

    #[test]
    fn test_error_diagnostics_fail_the_phase() {
        let phase = ValidatePhase::empty().with_lint(AlwaysFails);
        let (result, _) = run(phase, graph_with_set(false));
        assert!(result.is_err());
    }
}
