//! Core utilities and types for the odatagen client generator.
//!
//! This crate provides the generated-file abstraction, string utilities
//! and the language-agnostic code generation trait shared by every other
//! crate in the workspace.

mod codegen;
mod file;
mod utils;

pub use codegen::{GenerateResult, LanguageCodegen, PreviewFile};
// File operations
pub use file::{File, FileRules, GeneratedFile, Overwrite, WriteResult, write_atomic};
// String utilities
pub use utils::{is_identifier, to_pascal_case, to_snake_case};
