//! Entity data model for the odatagen client generator.
//!
//! This crate holds the read-only schema graph the generator walks, and the
//! provider that builds it from a CSDL metadata document.
//!
//! # Architecture
//!
//! ```text
//! $metadata (EDMX XML) → csdl (raw records) → lowering → SchemaGraph → codegen
//! ```
//!
//! The model types are designed to be:
//! - Language-agnostic (no Rust-specific concerns)
//! - Closed (every type reference resolves to a declared type, a primitive,
//!   or an explicit `Unsupported` marker)
//! - Immutable once built

mod csdl;
mod error;
mod model;
mod name;
mod source;
mod types;

pub use error::{Error, Result};
pub use model::{
    BindingTarget, ComplexType, EntityType, EnumMember, EnumType, NavigationProperty, Operation,
    OperationKind, Parameter, Property, ResourceSet, ReturnType, SchemaGraph,
};
pub use name::QualifiedName;
pub use source::{MetadataSource, load};
pub use types::{PrimitiveKind, TypeRef};
