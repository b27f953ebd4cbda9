//! Shared code generation utilities for the odatagen client generator.
//!
//! This crate provides the language-agnostic half of generation, used by
//! target-specific emitters (e.g., `odatagen-codegen-rust`).
//!
//! # Module Organization
//!
//! - [`builder`] - Fragment trees and the indented text builder
//! - [`type_mapper`] - Metadata type references to neutral target types
//! - [`mapped`] - Per-schema results of type mapping
//! - [`names`] - Canonical operation identifiers and collision checks
//! - [`naming`] - Case conventions and reserved words per target language
//! - [`pipeline`] - Phases that prepare a schema graph for emission

pub mod builder;
mod error;
pub mod mapped;
pub mod names;
pub mod naming;
pub mod pipeline;
pub mod type_mapper;

pub use error::{Error, Result};
