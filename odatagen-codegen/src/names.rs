//! Canonical identifiers for emitted operations, and per-scope collision
//! detection for every emitted identifier.

use indexmap::IndexMap;
use odatagen_edm::{Operation, QualifiedName, SchemaGraph};

use crate::{Error, Result};

/// Computes the canonical identifier of an operation.
///
/// The base identifier is `{Name}In{Namespace}`. Bound operations append
/// `On{Entity}In{EntityNamespace}`, and operations bound to a collection
/// additionally append `OnEntitySet`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameResolver;

impl NameResolver {
    pub fn resolve(&self, operation: &Operation) -> String {
        let mut identifier = format!("{}In{}", operation.name.name, operation.name.namespace);
        if let Some(binding) = &operation.binding {
            identifier.push_str("On");
            identifier.push_str(&binding.entity.name);
            identifier.push_str("In");
            identifier.push_str(&binding.entity.namespace);
            if binding.collection {
                identifier.push_str("OnEntitySet");
            }
        }
        // Dotted namespaces are not valid inside identifiers.
        identifier.replace('.', "")
    }

    /// Resolve every operation of `graph`, rejecting duplicates.
    pub fn resolve_all(&self, graph: &SchemaGraph) -> Result<ResolvedNames> {
        let mut scope = Scope::new("operations");
        let mut identifiers = Vec::with_capacity(graph.operations.len());
        for operation in &graph.operations {
            let identifier = self.resolve(operation);
            scope.claim(&identifier, &operation.name)?;
            identifiers.push(identifier);
        }
        Ok(ResolvedNames { identifiers })
    }
}

/// Resolved identifiers, parallel to `SchemaGraph::operations`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedNames {
    identifiers: Vec<String>,
}

impl ResolvedNames {
    /// Identifier of the operation at `index` in the graph.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.identifiers.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.identifiers
            .iter()
            .enumerate()
            .map(|(i, id)| (i, id.as_str()))
    }
}

/// A set of identifiers that must not repeat, such as the items of one
/// generated module.
#[derive(Debug, Clone)]
pub struct Scope {
    name: String,
    claimed: IndexMap<String, QualifiedName>,
}

impl Scope {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            claimed: IndexMap::new(),
        }
    }

    /// Claim `identifier` for the schema element `origin`.
    pub fn claim(&mut self, identifier: &str, origin: &QualifiedName) -> Result<()> {
        if self.claimed.contains_key(identifier) {
            return Err(Error::NameCollision {
                identifier: identifier.to_string(),
                scope: self.name.clone(),
                namespace: origin.namespace.clone(),
                name: origin.name.clone(),
            });
        }
        self.claimed.insert(identifier.to_string(), origin.clone());
        Ok(())
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.claimed.contains_key(identifier)
    }
}

#[cfg(test)]
mod tests {
    use odatagen_edm::{BindingTarget, OperationKind};

    use super::*;

    fn operation(name: &str, binding: Option<(&str, bool)>) -> Operation {
        Operation {
            name: QualifiedName::new("Sales", name),
            kind: OperationKind::Action,
            binding: binding.map(|(entity, collection)| BindingTarget {
                parameter: "bindingParameter".into(),
                entity: QualifiedName::new("Sales", entity),
                collection,
            }),
            parameters: Vec::new(),
            return_type: None,
        }
    }

    #[test]
    fn test_unbound_identifier() {
        assert_eq!(
            NameResolver.resolve(&operation("ResetAll", None)),
            "ResetAllInSales"
        );
    }

    #[test]
    fn test_binding_disambiguation() {
        let single = NameResolver.resolve(&operation("Activate", Some(("Order", false))));
        let set = NameResolver.resolve(&operation("Activate", Some(("Order", true))));
        assert_eq!(single, "ActivateInSalesOnOrderInSales");
        assert_eq!(set, "ActivateInSalesOnOrderInSalesOnEntitySet");
        assert_ne!(single, set);
    }

    #[test]
    fn test_dotted_namespace_is_flattened() {
        let mut op = operation("Ping", None);
        op.name = QualifiedName::new("Sales.Core", "Ping");
        assert_eq!(NameResolver.resolve(&op), "PingInSalesCore");
    }

    #[test]
    fn test_resolve_all_keeps_graph_order() {
        let graph = SchemaGraph {
            operations: vec![
                operation("Activate", Some(("Order", false))),
                operation("Activate", Some(("Order", true))),
                operation("ResetAll", None),
            ],
            ..Default::default()
        };
        let names = NameResolver.resolve_all(&graph).unwrap();
        assert_eq!(names.len(), 3);
        assert_eq!(names.get(1), Some("ActivateInSalesOnOrderInSalesOnEntitySet"));
        assert_eq!(names.get(3), None);
    }

    #[test]
    fn test_same_target_overloads_collide() {
        let graph = SchemaGraph {
            operations: vec![
                operation("Activate", Some(("Order", false))),
                operation("Activate", Some(("Order", false))),
            ],
            ..Default::default()
        };
        let err = NameResolver.resolve_all(&graph).unwrap_err();
        match err {
            Error::NameCollision {
                identifier,
                namespace,
                name,
                ..
            } => {
                assert_eq!(identifier, "ActivateInSalesOnOrderInSales");
                assert_eq!(namespace, "Sales");
                assert_eq!(name, "Activate");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_scope_claims() {
        let origin = QualifiedName::new("Sales", "Customers");
        let mut scope = Scope::new("module `sales`");
        scope.claim("Customers", &origin).unwrap();
        assert!(scope.contains("Customers"));
        assert!(scope.claim("Customers", &origin).is_err());
    }
}
