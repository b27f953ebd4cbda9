//! Compilation pipeline for code generation.
//!
//! A [`Pipeline`] prepares one service's [`SchemaGraph`](odatagen_edm::SchemaGraph)
//! for emission:
//!
//! - Explicit phase boundaries (validate → map-types → resolve-names)
//! - Plugin hooks for extensibility (before/after each phase)
//! - Unified diagnostics collection
//! - A finished [`GenerationPlan`] handed to a language emitter
//!
//! # Example
//!
//! ```ignore
//! use odatagen_codegen::pipeline::{Pipeline, ServiceTarget};
//!
//! let ctx = Pipeline::new().run(graph, ServiceTarget::new("Sales", None))?;
//! for diag in ctx.warnings() {
//!     eprintln!("warning: {}", diag);
//! }
//! let plan = ctx.into_plan()?;
//! ```

mod context;
mod diagnostic;
mod phase;
pub mod phases;
mod plugin;
mod runner;

pub use context::{CompilationContext, GenerationPlan, ServiceTarget};
pub use diagnostic::{Diagnostic, Severity};
pub use phase::{Phase, PhaseInfo};
pub use plugin::Plugin;
pub use runner::Pipeline;
