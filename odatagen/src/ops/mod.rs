//! Core operations.
//!
//! This module contains the business logic for odatagen commands,
//! separated from CLI argument parsing and output rendering.

pub mod check;
pub mod generate;
pub mod prepare;

pub use check::check;
pub use generate::{GenerateOptions, generate};
pub use prepare::{PreparedService, prepare};
