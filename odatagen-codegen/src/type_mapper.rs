//! Mapping from metadata type references to language-neutral target types.
//!
//! Every target language renders [`TargetType`] its own way; the rules for
//! which kinds are representable and which references are optional live
//! here, once.

use std::fmt;

use odatagen_edm::{PrimitiveKind, QualifiedName, TypeRef};

/// Scalar shape a primitive kind maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    Text,
    Boolean,
    Number,
    Date,
}

impl Scalar {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Date => "date",
        }
    }
}

/// Which kind of schema type a named reference points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKind {
    Enum,
    Complex,
    Entity,
}

/// A language-neutral target type expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetType {
    Scalar(Scalar),
    Named { name: QualifiedName, kind: NamedKind },
    Array(Box<TargetType>),
}

impl TargetType {
    /// The element of an array, or the type itself.
    pub fn element(&self) -> &TargetType {
        match self {
            Self::Array(inner) => inner,
            other => other,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Whether the element is a complex or entity type.
    pub fn is_structured(&self) -> bool {
        matches!(
            self.element(),
            Self::Named {
                kind: NamedKind::Complex | NamedKind::Entity,
                ..
            }
        )
    }

    /// Render the expression as seen from `current_namespace`.
    ///
    /// Names declared in `current_namespace` are shortened to their simple
    /// name; collections render as `element[]`.
    pub fn expression(&self, current_namespace: &str) -> String {
        match self {
            Self::Scalar(scalar) => scalar.as_str().to_string(),
            Self::Named { name, .. } => {
                let qualified = name.to_string();
                match qualified.strip_prefix(&format!("{current_namespace}.")) {
                    Some(local) => local.to_string(),
                    None => qualified,
                }
            }
            Self::Array(inner) => format!("{}[]", inner.expression(current_namespace)),
        }
    }
}

/// A mapped type plus whether the reference is optional regardless of
/// declared nullability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedType {
    pub target: TargetType,
    pub optional: bool,
}

/// Outcome of mapping one type reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mapping {
    Mapped(MappedType),
    /// The reference has no target representation; carries the offending
    /// type kind as written in the metadata.
    Unsupported { kind: String },
}

impl Mapping {
    fn mapped(target: TargetType, optional: bool) -> Self {
        Self::Mapped(MappedType { target, optional })
    }
}

/// Converts [`TypeRef`]s into [`TargetType`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeMapper;

impl TypeMapper {
    /// The fixed primitive table. `None` for kinds without a mapping.
    pub fn scalar(kind: &PrimitiveKind) -> Option<Scalar> {
        use PrimitiveKind as P;
        let scalar = match kind {
            P::Binary | P::String | P::Guid | P::Duration | P::TimeOfDay => Scalar::Text,
            P::Boolean => Scalar::Boolean,
            P::Byte
            | P::SByte
            | P::Int16
            | P::Int32
            | P::Int64
            | P::Single
            | P::Double
            | P::Decimal => Scalar::Number,
            P::Date | P::DateTimeOffset => Scalar::Date,
            P::Other(_) => return None,
        };
        Some(scalar)
    }

    /// Map a structural property, parameter or return type.
    ///
    /// Collections of complex or entity types are optional; a collection of
    /// primitives or enums never is. Single values are not optional here;
    /// declared nullability is the emitter's concern.
    pub fn map(&self, ty: &TypeRef) -> Mapping {
        match ty {
            TypeRef::Collection(inner) => match self.map(inner) {
                Mapping::Mapped(element) => {
                    let optional = element.target.is_structured();
                    Mapping::mapped(TargetType::Array(Box::new(element.target)), optional)
                }
                unsupported => unsupported,
            },
            TypeRef::Primitive(kind) => match Self::scalar(kind) {
                Some(scalar) => Mapping::mapped(TargetType::Scalar(scalar), false),
                None => Mapping::Unsupported {
                    kind: kind.edm_name(),
                },
            },
            TypeRef::Enum(name) => Mapping::mapped(named(name, NamedKind::Enum), false),
            TypeRef::Complex(name) => Mapping::mapped(named(name, NamedKind::Complex), false),
            TypeRef::Entity(name) => Mapping::mapped(named(name, NamedKind::Entity), false),
            TypeRef::Unsupported(text) => Mapping::Unsupported { kind: text.clone() },
        }
    }

    /// Map a navigation property. Related data may not have been expanded,
    /// so navigation is always optional.
    pub fn map_navigation(&self, ty: &TypeRef) -> Mapping {
        match self.map(ty) {
            Mapping::Mapped(mapped) => Mapping::mapped(mapped.target, true),
            unsupported => unsupported,
        }
    }
}

fn named(name: &QualifiedName, kind: NamedKind) -> TargetType {
    TargetType::Named {
        name: name.clone(),
        kind,
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapped(mapping: Mapping) -> MappedType {
        match mapping {
            Mapping::Mapped(m) => m,
            Mapping::Unsupported { kind } => panic!("unexpected unsupported kind {kind}"),
        }
    }

    #[test]
    fn test_primitive_table_is_total_and_stable() {
        let mapper = TypeMapper;
        for kind in PrimitiveKind::KNOWN {
            let ty = TypeRef::Primitive(kind.clone());
            let first = mapper.map(&ty);
            assert!(matches!(first, Mapping::Mapped(_)), "{kind} is unmapped");
            assert_eq!(first, mapper.map(&ty));
        }
    }

    #[test]
    fn test_primitive_table_entries() {
        let scalar = |k: PrimitiveKind| TypeMapper::scalar(&k);
        assert_eq!(scalar(PrimitiveKind::Binary), Some(Scalar::Text));
        assert_eq!(scalar(PrimitiveKind::Boolean), Some(Scalar::Boolean));
        assert_eq!(scalar(PrimitiveKind::Decimal), Some(Scalar::Number));
        assert_eq!(scalar(PrimitiveKind::SByte), Some(Scalar::Number));
        assert_eq!(scalar(PrimitiveKind::DateTimeOffset), Some(Scalar::Date));
        assert_eq!(scalar(PrimitiveKind::Guid), Some(Scalar::Text));
        assert_eq!(scalar(PrimitiveKind::TimeOfDay), Some(Scalar::Text));
        assert_eq!(scalar(PrimitiveKind::Other("Stream".into())), None);
    }

    #[test]
    fn test_unknown_primitive_is_unsupported() {
        let ty = TypeRef::Primitive(PrimitiveKind::Other("Stream".into()));
        assert_eq!(
            TypeMapper.map(&ty),
            Mapping::Unsupported {
                kind: "Edm.Stream".into()
            }
        );
    }

    #[test]
    fn test_unsupported_propagates_through_collection() {
        let ty = TypeRef::collection(TypeRef::Unsupported("Edm.GeographyPoint".into()));
        assert!(matches!(TypeMapper.map(&ty), Mapping::Unsupported { .. }));
    }

    #[test]
    fn test_namespace_shortening() {
        let ty = TypeRef::Entity(QualifiedName::new("Sales", "Customer"));
        let target = mapped(TypeMapper.map(&ty)).target;
        assert_eq!(target.expression("Sales"), "Customer");
        assert_eq!(target.expression("Ops"), "Sales.Customer");
    }

    #[test]
    fn test_shortening_strips_namespace_prefix() {
        let ty = TypeRef::Complex(QualifiedName::new("Sales.Core", "Address"));
        let target = mapped(TypeMapper.map(&ty)).target;
        assert_eq!(target.expression("Sales"), "Core.Address");
        assert_eq!(target.expression("Sales.Core"), "Address");
        assert_eq!(target.expression("Sal"), "Sales.Core.Address");
    }

    #[test]
    fn test_collection_optionality() {
        let structured = TypeRef::collection(TypeRef::Complex(QualifiedName::new("S", "Line")));
        let m = mapped(TypeMapper.map(&structured));
        assert!(m.optional);
        assert_eq!(m.target.expression("S"), "Line[]");

        let primitives = TypeRef::collection(TypeRef::Primitive(PrimitiveKind::String));
        let m = mapped(TypeMapper.map(&primitives));
        assert!(!m.optional);
        assert_eq!(m.target.to_string(), "text[]");
    }

    #[test]
    fn test_navigation_is_always_optional() {
        let single = TypeRef::Entity(QualifiedName::new("Sales", "Customer"));
        assert!(!mapped(TypeMapper.map(&single)).optional);
        assert!(mapped(TypeMapper.map_navigation(&single)).optional);
    }
}
