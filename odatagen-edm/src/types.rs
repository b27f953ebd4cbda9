//! Type references used by properties, parameters and return types.

use std::fmt;

use crate::QualifiedName;

/// A primitive `Edm.*` type kind.
///
/// Kinds the generator has no mapping for are kept as [`PrimitiveKind::Other`]
/// with their original `Edm.` name, so the decision about them is made by the
/// type mapper rather than the reader.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Binary,
    Boolean,
    Byte,
    SByte,
    Int16,
    Int32,
    Int64,
    Single,
    Double,
    Decimal,
    Date,
    DateTimeOffset,
    Guid,
    Duration,
    TimeOfDay,
    String,
    /// Any other `Edm.*` kind (streams, spatial types, `Edm.Untyped`, ...)
    Other(std::string::String),
}

impl PrimitiveKind {
    /// Every kind that has a fixed, named variant.
    pub const KNOWN: [PrimitiveKind; 16] = [
        PrimitiveKind::Binary,
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::SByte,
        PrimitiveKind::Int16,
        PrimitiveKind::Int32,
        PrimitiveKind::Int64,
        PrimitiveKind::Single,
        PrimitiveKind::Double,
        PrimitiveKind::Decimal,
        PrimitiveKind::Date,
        PrimitiveKind::DateTimeOffset,
        PrimitiveKind::Guid,
        PrimitiveKind::Duration,
        PrimitiveKind::TimeOfDay,
        PrimitiveKind::String,
    ];

    /// Parse a fully qualified `Edm.*` name.
    ///
    /// Returns `None` if `name` is not in the `Edm` namespace.
    pub fn from_edm_name(name: &str) -> Option<Self> {
        let simple = name.strip_prefix("Edm.")?;
        let kind = match simple {
            "Binary" => Self::Binary,
            "Boolean" => Self::Boolean,
            "Byte" => Self::Byte,
            "SByte" => Self::SByte,
            "Int16" => Self::Int16,
            "Int32" => Self::Int32,
            "Int64" => Self::Int64,
            "Single" => Self::Single,
            "Double" => Self::Double,
            "Decimal" => Self::Decimal,
            "Date" => Self::Date,
            "DateTimeOffset" => Self::DateTimeOffset,
            "Guid" => Self::Guid,
            "Duration" => Self::Duration,
            "TimeOfDay" => Self::TimeOfDay,
            "String" => Self::String,
            other => Self::Other(other.to_string()),
        };
        Some(kind)
    }

    /// The `Edm.*` name of this kind.
    pub fn edm_name(&self) -> std::string::String {
        let simple = match self {
            Self::Binary => "Binary",
            Self::Boolean => "Boolean",
            Self::Byte => "Byte",
            Self::SByte => "SByte",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::Single => "Single",
            Self::Double => "Double",
            Self::Decimal => "Decimal",
            Self::Date => "Date",
            Self::DateTimeOffset => "DateTimeOffset",
            Self::Guid => "Guid",
            Self::Duration => "Duration",
            Self::TimeOfDay => "TimeOfDay",
            Self::String => "String",
            Self::Other(name) => name,
        };
        format!("Edm.{simple}")
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.edm_name())
    }
}

/// A resolved reference to a type.
///
/// This is a closed set: every `Type` attribute in a metadata document lowers
/// to exactly one of these variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Primitive(PrimitiveKind),
    Enum(QualifiedName),
    Complex(QualifiedName),
    Entity(QualifiedName),
    /// Collection of exactly one non-collection element type
    Collection(Box<TypeRef>),
    /// A type the model cannot express, kept with its original text
    Unsupported(String),
}

impl TypeRef {
    /// Wrap `element` in a collection.
    pub fn collection(element: TypeRef) -> Self {
        Self::Collection(Box::new(element))
    }

    /// The element type of a collection, or the type itself.
    pub fn element(&self) -> &TypeRef {
        match self {
            Self::Collection(inner) => inner,
            other => other,
        }
    }

    /// Whether this is a collection.
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }

    /// The entity type this references, directly or as a collection element.
    pub fn entity_name(&self) -> Option<&QualifiedName> {
        match self.element() {
            Self::Entity(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => write!(f, "{kind}"),
            Self::Enum(name) | Self::Complex(name) | Self::Entity(name) => write!(f, "{name}"),
            Self::Collection(inner) => write!(f, "Collection({inner})"),
            Self::Unsupported(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_kinds_round_trip_through_edm_names() {
        for kind in PrimitiveKind::KNOWN {
            assert_eq!(PrimitiveKind::from_edm_name(&kind.edm_name()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_edm_kind_is_other() {
        assert_eq!(
            PrimitiveKind::from_edm_name("Edm.GeographyPoint"),
            Some(PrimitiveKind::Other("GeographyPoint".into()))
        );
        assert_eq!(PrimitiveKind::from_edm_name("Sales.Order"), None);
    }

    #[test]
    fn test_type_ref_display() {
        let ty = TypeRef::collection(TypeRef::Entity(QualifiedName::new("Sales", "Order")));
        assert_eq!(ty.to_string(), "Collection(Sales.Order)");
        assert_eq!(ty.entity_name().unwrap().name, "Order");
    }
}
