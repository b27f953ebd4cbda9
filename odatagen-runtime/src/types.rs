use crate::TypeName;

/// A generated complex or entity type.
pub trait StructuredType {
    const NAMESPACE: &'static str;
    const NAME: &'static str;

    /// The qualified type name, for `@odata.type` annotations.
    fn type_name() -> TypeName {
        TypeName::new(Self::NAMESPACE, Self::NAME)
    }
}

/// A generated entity type.
pub trait EntityType: StructuredType {
    /// Key property names, in key order. Inherited keys are included.
    const KEY: &'static [&'static str];
}
