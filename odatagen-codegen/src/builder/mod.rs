//! Code generation building blocks.
//!
//! Emitters build immutable [`CodeFragment`] trees bottom-up; a
//! [`CodeBuilder`] renders each tree once into text.

mod code_builder;
mod indent;
mod renderable;

pub use code_builder::CodeBuilder;
pub use indent::Indent;
pub use renderable::{CodeFragment, Renderable};
