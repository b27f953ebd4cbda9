//! Runtime support for the generated OData clients.
//!
//! Every generated service module imports this module as `super::odata`.
//! Add `odatagen-runtime` and `serde` (with the `derive` feature) to the
//! dependencies of the crate that includes the generated code.

pub use odatagen_runtime::*;
