//! Rust client emitter for the odatagen client generator.
//!
//! Turns [`GenerationPlan`](odatagen_codegen::pipeline::GenerationPlan)s into
//! one Rust artifact per service plus an output `mod.rs`. Generated code is
//! written against `odatagen-runtime`, imported through the `odata`
//! template module.

pub mod ast;
mod emit;
pub mod files;
mod generator;
mod rust_file;
mod type_mapper;

pub use ast::{Enum, Field, Fn, Impl, Module, Param, Struct, TypeAlias, Variant};
pub use files::{GENERATED_HEADER, OutputMod, ServiceRs, TEMPLATE_MODULE};
pub use generator::{Artifacts, Generator};
pub use rust_file::{RawCode, RustFile, Use};
pub use type_mapper::{RustTypeMapper, Site};
