//! Runtime contract for odatagen-generated clients.
//!
//! Generated code is written against the types in this crate:
//!
//! - value types: [`Literal`], [`Path`], [`Binding`], [`TypeName`], [`DateValue`]
//! - a two-state filter builder: [`FilterBuilder`] expects a comparison,
//!   [`FilterChain`] expects a connective
//! - [`QueryBuilder`] and the recursive [`ExpandBuilder`], both serializing
//!   their clauses in a fixed order
//! - the resource-set facade [`EntitySet`] with its get, mutation and link
//!   operations, plus bound and unbound [`ActionOperation`]s and
//!   [`FunctionOperation`]s
//!
//! Transport is injected through the [`Transport`] trait; this crate never
//! opens a connection itself.
//!
//! # Example
//!
//! ```ignore
//! let customers = container
//!     .customers
//!     .query()
//!     .filter(|f| f.equals("Age", 5).and().contains("Name", "x"))
//!     .order_by_desc("Name")
//!     .top(10)
//!     .execute()
//!     .await?;
//! ```

mod entity_set;
mod error;
mod expand;
mod filter;
mod literal;
mod operation;
mod query;
mod response;
mod settings;
mod transport;
mod types;

pub use entity_set::{
    DeleteOperation, EntitySet, GetOperation, LinkOperation, MutationOperation, ResourceSet,
};
pub use error::{Error, Result};
pub use expand::ExpandBuilder;
pub use filter::{FilterBuilder, FilterChain};
pub use literal::{Binding, DateValue, Literal, Path, ToLiteral, TypeName};
pub use operation::{
    Action, ActionOperation, Function, FunctionOperation, FunctionSetOperation, NoOperations,
    OperationContext, OperationSet,
};
pub use query::{CountQuery, Order, QueryBuilder};
pub use response::{QueryResult, SingleValue};
pub use settings::ClientSettings;
pub use transport::{BoxError, Method, Request, Response, Transport};
pub use types::{EntityType, StructuredType};

/// Re-exported so generated code and transports can name it.
pub use async_trait::async_trait;
