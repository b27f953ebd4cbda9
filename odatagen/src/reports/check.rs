//! Check command report data structures.

use std::path::PathBuf;

use super::{
    ServiceSummary,
    output::{Output, Report},
};

/// Report data from a check run.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the configuration file.
    pub config_path: PathBuf,
    /// One entry per configured service.
    pub services: Vec<ServiceSummary>,
    /// Number of files a generate run would produce.
    pub files: usize,
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        let mut warned = false;
        for service in &self.services {
            for line in service.warning_lines() {
                out.warning(&line);
                warned = true;
            }
        }
        if warned {
            out.newline();
        }

        out.preformatted(&format!("✓ {} is valid", self.config_path.display()));
        out.newline();

        for service in &self.services {
            out.section(&service.namespace);
            out.key_value_indented("metadata", &service.origin);
            out.key_value_indented("context", &service.context_name);
            out.key_value_indented(
                "schema",
                &format!(
                    "{} types, {} operations, {} resource sets",
                    service.types, service.operations, service.resource_sets
                ),
            );
            if !service.warnings.is_empty() {
                out.key_value_indented("warnings", &service.warnings.len().to_string());
            }
        }

        out.newline();
        out.preformatted(&format!(
            "{} file{} would be generated",
            self.files,
            if self.files == 1 { "" } else { "s" }
        ));
    }
}
