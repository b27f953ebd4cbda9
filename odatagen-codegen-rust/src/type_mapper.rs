//! Rendering of neutral target types as Rust type expressions.

use odatagen_codegen::{
    mapped::MappedMember,
    naming::RUST_NAMING,
    type_mapper::{MappedType, NamedKind, Scalar, TargetType},
};
use odatagen_edm::QualifiedName;

/// Where a type expression is written. Decides how named types are
/// qualified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site<'a> {
    /// The artifact root, beside the namespace modules
    Root,
    /// Inside the module of the given namespace
    Namespace(&'a str),
}

/// The Rust identifier of a schema type.
pub fn type_ident(name: &QualifiedName) -> String {
    RUST_NAMING.type_name(&name.name)
}

/// Maps [`TargetType`]s to Rust syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustTypeMapper;

impl RustTypeMapper {
    pub fn scalar(&self, scalar: Scalar) -> &'static str {
        match scalar {
            Scalar::Text => "String",
            Scalar::Boolean => "bool",
            Scalar::Number => "f64",
            Scalar::Date => "odata::DateValue",
        }
    }

    /// Path to a named schema type as seen from `site`.
    pub fn path(&self, name: &QualifiedName, site: Site<'_>) -> String {
        let module = RUST_NAMING.module_name(&name.namespace);
        match site {
            Site::Root => format!("{}::{}", module, type_ident(name)),
            Site::Namespace(current) if current == name.namespace => type_ident(name),
            Site::Namespace(_) => format!("super::{}::{}", module, type_ident(name)),
        }
    }

    pub fn target(&self, target: &TargetType, site: Site<'_>) -> String {
        match target {
            TargetType::Scalar(scalar) => self.scalar(*scalar).to_string(),
            TargetType::Named { name, .. } => self.path(name, site),
            TargetType::Array(inner) => format!("Vec<{}>", self.target(inner, site)),
        }
    }

    /// Field type of a property or parameter. Optional single-valued
    /// complex and entity references are boxed.
    pub fn member(&self, member: &MappedMember, site: Site<'_>) -> String {
        let ty = self.target(&member.target, site);
        if !member.is_optional() {
            return ty;
        }
        if member.target.is_structured() && !member.target.is_array() {
            format!("Option<Box<{}>>", ty)
        } else {
            format!("Option<{}>", ty)
        }
    }

    /// The `Output` of an operation returning `returns`.
    ///
    /// Entity collections come back as a `QueryResult` page, single complex
    /// or entity values as the bare type, everything else in a
    /// `SingleValue` envelope. A nullable single value may arrive as an
    /// empty body and is wrapped in `Option`.
    pub fn output(&self, returns: Option<&MappedType>, site: Site<'_>) -> String {
        let Some(returns) = returns else {
            return "()".to_string();
        };
        if let Some(entity) = entity_collection(returns) {
            return format!("odata::QueryResult<{}>", self.path(entity, site));
        }

        let ty = self.target(&returns.target, site);
        let value = if returns.target.is_structured() && !returns.target.is_array() {
            ty
        } else {
            format!("odata::SingleValue<{}>", ty)
        };
        if returns.optional && !returns.target.is_array() {
            format!("Option<{}>", value)
        } else {
            value
        }
    }
}

/// The entity type of a return that is a collection of entities.
pub fn entity_collection(returns: &MappedType) -> Option<&QualifiedName> {
    match &returns.target {
        TargetType::Array(inner) => match inner.as_ref() {
            TargetType::Named {
                name,
                kind: NamedKind::Entity,
            } => Some(name),
            _ => None,
        },
        _ => None,
    }
}
