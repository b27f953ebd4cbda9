//! Type mappings computed once per schema and shared by every emitter.

use indexmap::IndexMap;
use odatagen_edm::QualifiedName;

use crate::type_mapper::{MappedType, TargetType};

/// A property or parameter that survived type mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedMember {
    /// Name as declared in the metadata
    pub name: String,
    pub target: TargetType,
    /// Optional regardless of nullability (see `TypeMapper`)
    pub optional: bool,
    /// Declared nullable in the metadata
    pub nullable: bool,
}

impl MappedMember {
    /// Whether the member may be absent or `null` on the wire.
    pub fn is_optional(&self) -> bool {
        self.optional || self.nullable
    }
}

/// Mapped members of one complex or entity type. Inherited members are not
/// repeated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedStructure {
    pub properties: Vec<MappedMember>,
    pub navigation: Vec<MappedMember>,
}

/// Mapped signature of one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedOperation {
    pub parameters: Vec<MappedMember>,
    pub returns: Option<MappedType>,
}

/// Every mapping for one schema graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedSchema {
    pub structures: IndexMap<QualifiedName, MappedStructure>,
    /// Parallel to `SchemaGraph::operations`
    pub operations: Vec<MappedOperation>,
}

impl MappedSchema {
    pub fn structure(&self, name: &QualifiedName) -> Option<&MappedStructure> {
        self.structures.get(name)
    }

    pub fn operation(&self, index: usize) -> Option<&MappedOperation> {
        self.operations.get(index)
    }
}
