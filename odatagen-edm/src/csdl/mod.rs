//! Raw CSDL records as they appear in an EDMX document.
//!
//! These mirror the XML shape and carry unresolved type names; [`lower`]
//! turns them into the [`SchemaGraph`](crate::SchemaGraph). Elements the
//! generator has no use for (annotations, terms, references) are skipped by
//! the deserializer.

mod lower;

use serde::Deserialize;

use crate::{Error, Result, SchemaGraph};

impl SchemaGraph {
    /// Build a schema graph from an EDMX document.
    ///
    /// `origin` names the document in errors and diagnostics.
    pub fn from_csdl(xml: &str, origin: &str) -> Result<Self> {
        let edmx: Edmx = quick_xml::de::from_str(xml).map_err(|source| Error::Xml {
            uri: origin.to_string(),
            source,
        })?;
        let schemas = edmx.data_services.schemas;
        if schemas.is_empty() {
            return Err(Error::NoSchema {
                uri: origin.to_string(),
            });
        }
        lower::lower(origin, &schemas)
    }
}

#[derive(Debug, Deserialize)]
struct Edmx {
    #[serde(rename = "DataServices")]
    data_services: DataServices,
}

#[derive(Debug, Deserialize)]
struct DataServices {
    #[serde(rename = "Schema", default)]
    schemas: Vec<Schema>,
}

#[derive(Debug, Deserialize)]
struct Schema {
    #[serde(rename = "@Namespace")]
    namespace: String,
    #[serde(rename = "@Alias")]
    alias: Option<String>,
    #[serde(rename = "EnumType", default)]
    enum_types: Vec<EnumType>,
    #[serde(rename = "ComplexType", default)]
    complex_types: Vec<StructuredType>,
    #[serde(rename = "EntityType", default)]
    entity_types: Vec<StructuredType>,
    #[serde(rename = "Action", default)]
    actions: Vec<Operation>,
    #[serde(rename = "Function", default)]
    functions: Vec<Operation>,
    #[serde(rename = "EntityContainer", default)]
    containers: Vec<EntityContainer>,
}

#[derive(Debug, Deserialize)]
struct EnumType {
    #[serde(rename = "@Name")]
    name: String,
    #[serde(rename = "@IsFlags")]
    is_flags: Option<bool>,
    #[serde(rename = "Member", default)]
    members: Vec<EnumMember>,
}

#[derive(Debug, Deserialize)]
struct EnumMember {
    #[serde(rename = "@Name")]
    name: String,
    #[serde(rename = "@Value")]
    value: Option<String>,
}

/// Shared shape of `ComplexType` and `EntityType`.
#[derive(Debug, Deserialize)]
struct StructuredType {
    #[serde(rename = "@Name")]
    name: String,
    #[serde(rename = "@BaseType")]
    base_type: Option<String>,
    #[serde(rename = "@Abstract")]
    is_abstract: Option<bool>,
    #[serde(rename = "Key")]
    key: Option<Key>,
    #[serde(rename = "Property", default)]
    properties: Vec<Property>,
    #[serde(rename = "NavigationProperty", default)]
    navigation: Vec<Property>,
}

#[derive(Debug, Deserialize)]
struct Key {
    #[serde(rename = "PropertyRef", default)]
    property_refs: Vec<PropertyRef>,
}

#[derive(Debug, Deserialize)]
struct PropertyRef {
    #[serde(rename = "@Name")]
    name: String,
}

/// `Property`, `NavigationProperty` and `Parameter` share this shape.
#[derive(Debug, Deserialize)]
struct Property {
    #[serde(rename = "@Name")]
    name: String,
    #[serde(rename = "@Type")]
    ty: String,
    #[serde(rename = "@Nullable")]
    nullable: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct Operation {
    #[serde(rename = "@Name")]
    name: String,
    #[serde(rename = "@IsBound")]
    is_bound: Option<bool>,
    #[serde(rename = "Parameter", default)]
    parameters: Vec<Property>,
    #[serde(rename = "ReturnType")]
    return_type: Option<ReturnType>,
}

#[derive(Debug, Deserialize)]
struct ReturnType {
    #[serde(rename = "@Type")]
    ty: String,
    #[serde(rename = "@Nullable")]
    nullable: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct EntityContainer {
    #[serde(rename = "@Name")]
    name: String,
    #[serde(rename = "EntitySet", default)]
    entity_sets: Vec<EntitySet>,
}

#[derive(Debug, Deserialize)]
struct EntitySet {
    #[serde(rename = "@Name")]
    name: String,
    #[serde(rename = "@EntityType")]
    entity_type: String,
}
