//! Map-types phase - runs the type mapper over the whole schema.

use eyre::Result;
use odatagen_edm::{QualifiedName, SchemaGraph, TypeRef};
use tracing::{debug, warn};

use crate::{
    Error,
    mapped::{MappedMember, MappedOperation, MappedSchema, MappedStructure},
    pipeline::{CompilationContext, Diagnostic, Phase},
    type_mapper::{MappedType, Mapping, TypeMapper},
};

/// Phase that maps every property, navigation property, parameter and
/// return type.
///
/// An unsupported type on a nullable member omits the member with a
/// warning. On a required member it aborts with
/// [`Error::UnsupportedTypeKind`].
pub struct MapTypesPhase;

impl Phase for MapTypesPhase {
    fn name(&self) -> &'static str {
        "map-types"
    }

    fn description(&self) -> &'static str {
        "Map metadata types to target types"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        let mut mapper = Mapper {
            graph: &ctx.graph,
            mapper: TypeMapper,
            diagnostics: Vec::new(),
        };
        let mapped = mapper.map_schema()?;
        let omitted = mapper.diagnostics.len();
        ctx.diagnostics.append(&mut mapper.diagnostics);

        debug!(
            structures = mapped.structures.len(),
            operations = mapped.operations.len(),
            omitted,
            "mapped schema types"
        );
        ctx.mapped = Some(mapped);
        Ok(())
    }
}

/// A member to map: its name, declared type and nullability.
struct Member<'a> {
    name: &'a str,
    ty: &'a TypeRef,
    nullable: bool,
}

struct Mapper<'a> {
    graph: &'a SchemaGraph,
    mapper: TypeMapper,
    diagnostics: Vec<Diagnostic>,
}

impl Mapper<'_> {
    fn map_schema(&mut self) -> Result<MappedSchema, Error> {
        let graph = self.graph;
        let mut schema = MappedSchema::default();

        for complex in graph.complex_types.values() {
            let properties = complex.properties.iter().map(|p| Member {
                name: &p.name,
                ty: &p.ty,
                nullable: p.nullable,
            });
            let navigation = complex.navigation.iter().map(|n| Member {
                name: &n.name,
                ty: &n.ty,
                nullable: n.nullable,
            });
            let structure = self.map_structure(&complex.name, properties, navigation)?;
            schema.structures.insert(complex.name.clone(), structure);
        }

        for entity in graph.entity_types.values() {
            let properties = entity.properties.iter().map(|p| Member {
                name: &p.name,
                ty: &p.ty,
                nullable: p.nullable,
            });
            let navigation = entity.navigation.iter().map(|n| Member {
                name: &n.name,
                ty: &n.ty,
                nullable: n.nullable,
            });
            let structure = self.map_structure(&entity.name, properties, navigation)?;
            schema.structures.insert(entity.name.clone(), structure);
        }

        for operation in &graph.operations {
            let mut parameters = Vec::with_capacity(operation.parameters.len());
            for parameter in &operation.parameters {
                let member = Member {
                    name: &parameter.name,
                    ty: &parameter.ty,
                    nullable: parameter.nullable,
                };
                let mapping = self.mapper.map(member.ty);
                if let Some(mapped) =
                    self.accept(&operation.name, "parameter", &member, mapping)?
                {
                    parameters.push(mapped);
                }
            }

            let returns = match &operation.return_type {
                None => None,
                Some(ret) => match self.mapper.map(&ret.ty) {
                    Mapping::Mapped(mapped) => Some(MappedType {
                        optional: mapped.optional || ret.nullable,
                        target: mapped.target,
                    }),
                    Mapping::Unsupported { kind } => {
                        return Err(unsupported(&operation.name, "return type", kind, "value"));
                    }
                },
            };

            schema.operations.push(MappedOperation {
                parameters,
                returns,
            });
        }

        Ok(schema)
    }

    fn map_structure<'m>(
        &mut self,
        owner: &QualifiedName,
        properties: impl Iterator<Item = Member<'m>>,
        navigation: impl Iterator<Item = Member<'m>>,
    ) -> Result<MappedStructure, Error> {
        let mut structure = MappedStructure::default();
        for member in properties {
            let mapping = self.mapper.map(member.ty);
            if let Some(mapped) = self.accept(owner, "property", &member, mapping)? {
                structure.properties.push(mapped);
            }
        }
        for member in navigation {
            let mapping = self.mapper.map_navigation(member.ty);
            if let Some(mapped) = self.accept(owner, "navigation property", &member, mapping)? {
                structure.navigation.push(mapped);
            }
        }
        Ok(structure)
    }

    /// Keep a mapped member, omit an unsupported optional one, or fail.
    fn accept(
        &mut self,
        owner: &QualifiedName,
        element: &'static str,
        member: &Member<'_>,
        mapping: Mapping,
    ) -> Result<Option<MappedMember>, Error> {
        match mapping {
            Mapping::Mapped(mapped) => Ok(Some(MappedMember {
                name: member.name.to_string(),
                target: mapped.target,
                optional: mapped.optional,
                nullable: member.nullable,
            })),
            Mapping::Unsupported { kind } if member.nullable || is_navigation(element) => {
                warn!(%owner, member = member.name, %kind, "omitting {element} with unsupported type");
                self.diagnostics.push(
                    Diagnostic::warning(
                        "map-types",
                        format!(
                            "omitted {element} `{}` of `{owner}`: unsupported type `{kind}`",
                            member.name
                        ),
                    )
                    .at(format!("{owner}.{}", member.name)),
                );
                Ok(None)
            }
            Mapping::Unsupported { kind } => Err(unsupported(owner, element, kind, member.name)),
        }
    }
}

fn is_navigation(element: &str) -> bool {
    element == "navigation property"
}

fn unsupported(owner: &QualifiedName, element: &'static str, kind: String, member: &str) -> Error {
    Error::UnsupportedTypeKind {
        kind,
        element,
        member: member.to_string(),
        namespace: owner.namespace.clone(),
        owner: owner.name.clone(),
    }
}
