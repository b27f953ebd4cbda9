//! Files written into the output directory.

mod output_mod;
mod service_rs;

pub use output_mod::OutputMod;
pub use service_rs::ServiceRs;

/// First line of every generated file.
pub const GENERATED_HEADER: &str = "// Code generated by odatagen. DO NOT EDIT.";

/// Name of the template module generated code imports the runtime through.
pub const TEMPLATE_MODULE: &str = "odata";
