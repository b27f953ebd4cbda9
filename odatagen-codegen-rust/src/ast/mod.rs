//! Rust AST builders for generating structs, enums, impls, functions and
//! modules.
//!
//! Every node implements [`Renderable`](odatagen_codegen::builder::Renderable)
//! and is rendered through a `CodeBuilder`.

mod enums;
mod fns;
mod impls;
mod items;
mod structs;

pub use enums::{Enum, Variant};
pub use fns::{Fn, Param};
pub use impls::Impl;
pub use items::{Module, TypeAlias};
pub use structs::{Field, Struct};

#[cfg(test)]
pub(crate) fn render(node: &impl odatagen_codegen::builder::Renderable) -> String {
    let mut builder = odatagen_codegen::builder::CodeBuilder::rust();
    builder.emit(node);
    builder.build()
}
