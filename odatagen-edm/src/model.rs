//! The schema graph: every namespace, type, operation and resource set of a
//! service, fully resolved.

use indexmap::IndexMap;

use crate::{QualifiedName, TypeRef};

/// The closed, read-only description of one service.
///
/// Type tables are keyed by qualified name and keep declaration order.
#[derive(Debug, Clone, Default)]
pub struct SchemaGraph {
    /// Where the document was loaded from (used in diagnostics)
    pub origin: String,
    /// Namespaces in declaration order
    pub namespaces: Vec<String>,
    /// Enumeration types
    pub enums: IndexMap<QualifiedName, EnumType>,
    /// Complex types
    pub complex_types: IndexMap<QualifiedName, ComplexType>,
    /// Entity types
    pub entity_types: IndexMap<QualifiedName, EntityType>,
    /// Actions and functions, bound and unbound
    pub operations: Vec<Operation>,
    /// Entity sets exposed at the service root, in declaration order
    pub resource_sets: Vec<ResourceSet>,
    /// Name of the first entity container, if any
    pub container_name: Option<String>,
}

impl SchemaGraph {
    /// Look up an entity type.
    pub fn entity_type(&self, name: &QualifiedName) -> Option<&EntityType> {
        self.entity_types.get(name)
    }

    /// Look up a complex type.
    pub fn complex_type(&self, name: &QualifiedName) -> Option<&ComplexType> {
        self.complex_types.get(name)
    }

    /// Look up an enumeration type.
    pub fn enum_type(&self, name: &QualifiedName) -> Option<&EnumType> {
        self.enums.get(name)
    }

    /// The key of an entity type, inherited from the nearest base type that
    /// declares one.
    pub fn effective_key<'a>(&'a self, entity: &'a EntityType) -> &'a [String] {
        let mut current = entity;
        // Depth bound guards against cyclic base chains.
        for _ in 0..=self.entity_types.len() {
            if !current.key.is_empty() {
                return &current.key;
            }
            match current.base.as_ref().and_then(|b| self.entity_type(b)) {
                Some(base) => current = base,
                None => break,
            }
        }
        &[]
    }

    /// Operations bound to `entity`, either to a single instance
    /// (`collection == false`) or to a collection of it.
    pub fn operations_bound_to<'a>(
        &'a self,
        entity: &'a QualifiedName,
        collection: bool,
    ) -> impl Iterator<Item = &'a Operation> {
        self.operations.iter().filter(move |op| {
            op.binding
                .as_ref()
                .is_some_and(|b| &b.entity == entity && b.collection == collection)
        })
    }

    /// Operations callable at the service root.
    pub fn unbound_operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter().filter(|op| op.binding.is_none())
    }

    /// Total number of declared types.
    pub fn type_count(&self) -> usize {
        self.enums.len() + self.complex_types.len() + self.entity_types.len()
    }
}

/// An enumeration type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub name: QualifiedName,
    /// Members in declaration order
    pub members: Vec<EnumMember>,
    /// Whether members combine as bit flags
    pub is_flags: bool,
}

/// One member of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

/// A structured type without identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexType {
    pub name: QualifiedName,
    pub base: Option<QualifiedName>,
    /// Declared structural properties (inherited ones are not repeated)
    pub properties: Vec<Property>,
    pub navigation: Vec<NavigationProperty>,
    pub is_abstract: bool,
}

/// A structured type with identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityType {
    pub name: QualifiedName,
    pub base: Option<QualifiedName>,
    /// Declared key property names, in key order (empty when inherited)
    pub key: Vec<String>,
    pub properties: Vec<Property>,
    pub navigation: Vec<NavigationProperty>,
    pub is_abstract: bool,
}

/// A structural property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub ty: TypeRef,
    pub nullable: bool,
}

/// A reference from one structured type to related entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationProperty {
    pub name: String,
    /// Entity or collection of entity
    pub ty: TypeRef,
    pub nullable: bool,
}

/// Action or function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Invoked with POST, may have side effects
    Action,
    /// Invoked with GET, side-effect free
    Function,
}

/// The resource a bound operation is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingTarget {
    /// Name of the binding parameter
    pub parameter: String,
    /// Entity type the operation is bound to
    pub entity: QualifiedName,
    /// Bound to a collection of the entity rather than one instance
    pub collection: bool,
}

/// An action or function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub name: QualifiedName,
    pub kind: OperationKind,
    /// Present iff the operation is bound
    pub binding: Option<BindingTarget>,
    /// Parameters in declaration order, excluding the binding parameter
    pub parameters: Vec<Parameter>,
    pub return_type: Option<ReturnType>,
}

impl Operation {
    /// Whether the operation is bound to an entity or entity collection.
    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }
}

/// An operation parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeRef,
    pub nullable: bool,
}

/// The declared result of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnType {
    pub ty: TypeRef,
    pub nullable: bool,
}

/// A named, root-addressable collection of entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSet {
    pub name: String,
    pub entity_type: QualifiedName,
}
