//! Lowering of raw CSDL records into the schema graph.

use std::collections::HashMap;

use tracing::{debug, info};

use super::{EnumType as RawEnum, Operation as RawOperation, Schema, StructuredType};
use crate::{
    BindingTarget, ComplexType, EntityType, EnumMember, EnumType, Error, NavigationProperty,
    Operation, OperationKind, Parameter, PrimitiveKind, Property, QualifiedName, ResourceSet,
    Result, ReturnType, SchemaGraph, TypeRef,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Enum,
    Complex,
    Entity,
}

/// Name resolution shared by every lowering step.
struct Resolver {
    aliases: HashMap<String, String>,
    kinds: HashMap<QualifiedName, Kind>,
}

impl Resolver {
    fn new(schemas: &[Schema]) -> Result<Self> {
        let mut aliases = HashMap::new();
        let mut kinds = HashMap::new();

        for schema in schemas {
            if let Some(alias) = &schema.alias {
                aliases.insert(alias.clone(), schema.namespace.clone());
            }
            let declared = schema
                .enum_types
                .iter()
                .map(|t| (&t.name, Kind::Enum))
                .chain(schema.complex_types.iter().map(|t| (&t.name, Kind::Complex)))
                .chain(schema.entity_types.iter().map(|t| (&t.name, Kind::Entity)));
            for (name, kind) in declared {
                let qualified = QualifiedName::new(&schema.namespace, name);
                if kinds.insert(qualified, kind).is_some() {
                    return Err(Error::invalid(
                        "type",
                        &schema.namespace,
                        name,
                        "declared more than once",
                    ));
                }
            }
        }

        Ok(Self { aliases, kinds })
    }

    /// Resolve a dotted name, replacing a schema alias with its namespace.
    fn qualify(&self, text: &str) -> Option<QualifiedName> {
        let mut name = QualifiedName::parse(text.trim())?;
        if let Some(namespace) = self.aliases.get(&name.namespace) {
            name.namespace = namespace.clone();
        }
        Some(name)
    }

    fn kind_of(&self, name: &QualifiedName) -> Option<Kind> {
        self.kinds.get(name).copied()
    }

    /// Resolve a `Type` attribute.
    ///
    /// Fails only on nested collections; anything else that does not resolve
    /// becomes [`TypeRef::Unsupported`].
    fn resolve(&self, text: &str) -> std::result::Result<TypeRef, String> {
        let text = text.trim();
        if let Some(inner) = text
            .strip_prefix("Collection(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let element = self.resolve(inner)?;
            if element.is_collection() {
                return Err(format!("nested collection type '{text}'"));
            }
            return Ok(TypeRef::collection(element));
        }

        if let Some(kind) = PrimitiveKind::from_edm_name(text) {
            return Ok(TypeRef::Primitive(kind));
        }

        let resolved = self.qualify(text).and_then(|name| {
            self.kind_of(&name).map(|kind| match kind {
                Kind::Enum => TypeRef::Enum(name),
                Kind::Complex => TypeRef::Complex(name),
                Kind::Entity => TypeRef::Entity(name),
            })
        });
        Ok(resolved.unwrap_or_else(|| TypeRef::Unsupported(text.to_string())))
    }

    /// Resolve a base type reference, which must name a type of `expected` kind.
    fn base(
        &self,
        element: &'static str,
        owner: &QualifiedName,
        base: Option<&str>,
        expected: Kind,
    ) -> Result<Option<QualifiedName>> {
        let Some(text) = base else {
            return Ok(None);
        };
        match self.qualify(text) {
            Some(name) if self.kind_of(&name) == Some(expected) => Ok(Some(name)),
            _ => Err(Error::invalid(
                element,
                &owner.namespace,
                &owner.name,
                format!("base type '{text}' is not a declared {element}"),
            )),
        }
    }
}

pub(super) fn lower(origin: &str, schemas: &[Schema]) -> Result<SchemaGraph> {
    let resolver = Resolver::new(schemas)?;
    let mut graph = SchemaGraph {
        origin: origin.to_string(),
        ..SchemaGraph::default()
    };

    for schema in schemas {
        let ns = schema.namespace.as_str();
        graph.namespaces.push(ns.to_string());

        for raw in &schema.enum_types {
            let ty = lower_enum(ns, raw)?;
            graph.enums.insert(ty.name.clone(), ty);
        }
        for raw in &schema.complex_types {
            let ty = lower_complex(&resolver, ns, raw)?;
            graph.complex_types.insert(ty.name.clone(), ty);
        }
        for raw in &schema.entity_types {
            let ty = lower_entity(&resolver, ns, raw)?;
            graph.entity_types.insert(ty.name.clone(), ty);
        }
        for raw in &schema.actions {
            graph
                .operations
                .push(lower_operation(&resolver, ns, raw, OperationKind::Action)?);
        }
        for raw in &schema.functions {
            graph
                .operations
                .push(lower_operation(&resolver, ns, raw, OperationKind::Function)?);
        }
    }

    for schema in schemas {
        for container in &schema.containers {
            if graph.container_name.is_none() {
                graph.container_name = Some(container.name.clone());
            }
            for set in &container.entity_sets {
                let resource_set = lower_entity_set(&resolver, &graph, &schema.namespace, set)?;
                graph.resource_sets.push(resource_set);
            }
        }
    }

    info!(
        origin,
        namespaces = graph.namespaces.len(),
        types = graph.type_count(),
        operations = graph.operations.len(),
        resource_sets = graph.resource_sets.len(),
        "lowered metadata"
    );
    Ok(graph)
}

fn lower_enum(ns: &str, raw: &RawEnum) -> Result<EnumType> {
    let mut members = Vec::with_capacity(raw.members.len());
    for (index, member) in raw.members.iter().enumerate() {
        let value = match &member.value {
            Some(text) => text.trim().parse::<i64>().map_err(|_| {
                Error::invalid(
                    "enum type",
                    ns,
                    &raw.name,
                    format!("member '{}' has non-integer value '{text}'", member.name),
                )
            })?,
            None => index as i64,
        };
        members.push(EnumMember {
            name: member.name.clone(),
            value,
        });
    }

    Ok(EnumType {
        name: QualifiedName::new(ns, &raw.name),
        members,
        is_flags: raw.is_flags.unwrap_or(false),
    })
}

fn lower_properties(
    resolver: &Resolver,
    element: &'static str,
    owner: &QualifiedName,
    raw: &StructuredType,
) -> Result<(Vec<Property>, Vec<NavigationProperty>)> {
    let invalid = |message: String| Error::invalid(element, &owner.namespace, &owner.name, message);

    let mut properties = Vec::with_capacity(raw.properties.len());
    for property in &raw.properties {
        let ty = resolver
            .resolve(&property.ty)
            .map_err(|m| invalid(format!("property '{}': {m}", property.name)))?;
        if let TypeRef::Unsupported(text) = &ty {
            debug!(owner = %owner, property = %property.name, ty = %text, "unresolved property type");
        }
        properties.push(Property {
            name: property.name.clone(),
            ty,
            nullable: property.nullable.unwrap_or(true),
        });
    }

    let mut navigation = Vec::with_capacity(raw.navigation.len());
    for nav in &raw.navigation {
        let mut ty = resolver
            .resolve(&nav.ty)
            .map_err(|m| invalid(format!("navigation property '{}': {m}", nav.name)))?;
        if ty.entity_name().is_none() {
            debug!(owner = %owner, navigation = %nav.name, ty = %nav.ty, "unresolved navigation target");
            ty = TypeRef::Unsupported(nav.ty.trim().to_string());
        }
        navigation.push(NavigationProperty {
            name: nav.name.clone(),
            ty,
            nullable: nav.nullable.unwrap_or(true),
        });
    }

    Ok((properties, navigation))
}

fn lower_complex(resolver: &Resolver, ns: &str, raw: &StructuredType) -> Result<ComplexType> {
    let name = QualifiedName::new(ns, &raw.name);
    let base = resolver.base(
        "complex type",
        &name,
        raw.base_type.as_deref(),
        Kind::Complex,
    )?;
    let (properties, navigation) = lower_properties(resolver, "complex type", &name, raw)?;

    Ok(ComplexType {
        name,
        base,
        properties,
        navigation,
        is_abstract: raw.is_abstract.unwrap_or(false),
    })
}

fn lower_entity(resolver: &Resolver, ns: &str, raw: &StructuredType) -> Result<EntityType> {
    let name = QualifiedName::new(ns, &raw.name);
    let base = resolver.base(
        "entity type",
        &name,
        raw.base_type.as_deref(),
        Kind::Entity,
    )?;
    let (properties, navigation) = lower_properties(resolver, "entity type", &name, raw)?;
    let key = raw
        .key
        .as_ref()
        .map(|k| k.property_refs.iter().map(|r| r.name.clone()).collect())
        .unwrap_or_default();

    Ok(EntityType {
        name,
        base,
        key,
        properties,
        navigation,
        is_abstract: raw.is_abstract.unwrap_or(false),
    })
}

fn lower_operation(
    resolver: &Resolver,
    ns: &str,
    raw: &RawOperation,
    kind: OperationKind,
) -> Result<Operation> {
    let element = match kind {
        OperationKind::Action => "action",
        OperationKind::Function => "function",
    };
    let invalid = |message: String| Error::invalid(element, ns, &raw.name, message);

    let mut params = raw.parameters.iter();
    let binding = if raw.is_bound.unwrap_or(false) {
        let first = params
            .next()
            .ok_or_else(|| invalid("bound operation declares no binding parameter".into()))?;
        let ty = resolver
            .resolve(&first.ty)
            .map_err(|m| invalid(format!("binding parameter '{}': {m}", first.name)))?;
        let entity = ty.entity_name().cloned().ok_or_else(|| {
            invalid(format!(
                "binding parameter '{}' has type '{}'; expected an entity type or a collection of one",
                first.name, first.ty
            ))
        })?;
        Some(BindingTarget {
            parameter: first.name.clone(),
            entity,
            collection: ty.is_collection(),
        })
    } else {
        None
    };

    let mut parameters = Vec::new();
    for param in params {
        let ty = resolver
            .resolve(&param.ty)
            .map_err(|m| invalid(format!("parameter '{}': {m}", param.name)))?;
        parameters.push(Parameter {
            name: param.name.clone(),
            ty,
            nullable: param.nullable.unwrap_or(true),
        });
    }

    let return_type = match &raw.return_type {
        Some(ret) => Some(ReturnType {
            ty: resolver
                .resolve(&ret.ty)
                .map_err(|m| invalid(format!("return type: {m}")))?,
            nullable: ret.nullable.unwrap_or(true),
        }),
        None => None,
    };

    Ok(Operation {
        name: QualifiedName::new(ns, &raw.name),
        kind,
        binding,
        parameters,
        return_type,
    })
}

fn lower_entity_set(
    resolver: &Resolver,
    graph: &SchemaGraph,
    ns: &str,
    raw: &super::EntitySet,
) -> Result<ResourceSet> {
    let entity = resolver
        .qualify(&raw.entity_type)
        .and_then(|name| graph.entity_type(&name))
        .ok_or_else(|| {
            Error::invalid(
                "entity set",
                ns,
                &raw.name,
                format!("'{}' is not a declared entity type", raw.entity_type),
            )
        })?;

    if graph.effective_key(entity).is_empty() {
        return Err(Error::invalid(
            "entity type",
            &entity.name.namespace,
            &entity.name.name,
            format!("exposed by entity set '{}' but declares no key", raw.name),
        ));
    }

    Ok(ResourceSet {
        name: raw.name.clone(),
        entity_type: entity.name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edmx(schemas: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<edmx:Edmx Version="4.0" xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx">
  <edmx:DataServices>{schemas}</edmx:DataServices>
</edmx:Edmx>"#
        )
    }

    fn parse(schemas: &str) -> Result<SchemaGraph> {
        SchemaGraph::from_csdl(&edmx(schemas), "test.xml")
    }

    #[test]
    fn test_alias_is_resolved() {
        let graph = parse(
            r#"<Schema Namespace="Sales.Core" Alias="S" xmlns="http://docs.oasis-open.org/odata/ns/edm">
  <ComplexType Name="Address"><Property Name="City" Type="Edm.String"/></ComplexType>
  <EntityType Name="Customer">
    <Key><PropertyRef Name="Id"/></Key>
    <Property Name="Id" Type="Edm.Int32" Nullable="false"/>
    <Property Name="Home" Type="S.Address"/>
  </EntityType>
</Schema>"#,
        )
        .unwrap();

        let customer = graph
            .entity_type(&QualifiedName::new("Sales.Core", "Customer"))
            .unwrap();
        assert_eq!(
            customer.properties[1].ty,
            TypeRef::Complex(QualifiedName::new("Sales.Core", "Address"))
        );
        assert!(!customer.properties[0].nullable);
        assert!(customer.properties[1].nullable);
    }

    #[test]
    fn test_unknown_type_is_unsupported() {
        let graph = parse(
            r#"<Schema Namespace="Sales">
  <ComplexType Name="Shape">
    <Property Name="Where" Type="Edm.GeographyPoint"/>
    <Property Name="Code" Type="Sales.Missing"/>
  </ComplexType>
</Schema>"#,
        )
        .unwrap();

        let shape = graph
            .complex_type(&QualifiedName::new("Sales", "Shape"))
            .unwrap();
        assert_eq!(
            shape.properties[0].ty,
            TypeRef::Primitive(PrimitiveKind::Other("GeographyPoint".into()))
        );
        assert_eq!(
            shape.properties[1].ty,
            TypeRef::Unsupported("Sales.Missing".into())
        );
    }

    #[test]
    fn test_nested_collection_is_rejected() {
        let err = parse(
            r#"<Schema Namespace="Sales">
  <ComplexType Name="Grid"><Property Name="Cells" Type="Collection(Collection(Edm.Int32))"/></ComplexType>
</Schema>"#,
        )
        .unwrap_err();

        assert!(matches!(err, Error::Invalid { ref name, .. } if name == "Grid"));
    }

    #[test]
    fn test_enum_values_default_to_position() {
        let graph = parse(
            r#"<Schema Namespace="Sales">
  <EnumType Name="Status">
    <Member Name="Open"/>
    <Member Name="Closed"/>
    <Member Name="Archived" Value="10"/>
  </EnumType>
</Schema>"#,
        )
        .unwrap();

        let status = graph
            .enum_type(&QualifiedName::new("Sales", "Status"))
            .unwrap();
        let values: Vec<_> = status.members.iter().map(|m| m.value).collect();
        assert_eq!(values, [0, 1, 10]);
    }

    #[test]
    fn test_binding_parameter_is_first_parameter() {
        let graph = parse(
            r#"<Schema Namespace="Sales">
  <EntityType Name="Order"><Key><PropertyRef Name="Id"/></Key><Property Name="Id" Type="Edm.Int32" Nullable="false"/></EntityType>
  <Action Name="Activate" IsBound="true">
    <Parameter Name="bindingParameter" Type="Collection(Sales.Order)"/>
    <Parameter Name="Reason" Type="Edm.String"/>
  </Action>
</Schema>"#,
        )
        .unwrap();

        let op = &graph.operations[0];
        let binding = op.binding.as_ref().unwrap();
        assert_eq!(binding.entity, QualifiedName::new("Sales", "Order"));
        assert!(binding.collection);
        assert_eq!(op.parameters.len(), 1);
        assert_eq!(op.parameters[0].name, "Reason");
    }

    #[test]
    fn test_binding_to_non_entity_is_rejected() {
        let err = parse(
            r#"<Schema Namespace="Sales">
  <Function Name="Double" IsBound="true">
    <Parameter Name="value" Type="Edm.Int32"/>
    <ReturnType Type="Edm.Int32"/>
  </Function>
</Schema>"#,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::Invalid { element: "function", ref name, .. } if name == "Double"
        ));
    }

    #[test]
    fn test_entity_set_requires_key() {
        let err = parse(
            r#"<Schema Namespace="Sales">
  <EntityType Name="Note"><Property Name="Text" Type="Edm.String"/></EntityType>
  <EntityContainer Name="Container"><EntitySet Name="Notes" EntityType="Sales.Note"/></EntityContainer>
</Schema>"#,
        )
        .unwrap_err();

        assert!(matches!(err, Error::Invalid { ref name, .. } if name == "Note"));
    }

    #[test]
    fn test_document_without_schema_is_rejected() {
        let err = parse("").unwrap_err();
        assert!(matches!(err, Error::NoSchema { .. }));
    }
}
