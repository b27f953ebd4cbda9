//! Generate command report data structures.

use std::path::PathBuf;

use super::{
    ServiceSummary,
    output::{Output, Report},
};
use crate::templates::Materialized;

/// Report data from code generation.
#[derive(Debug)]
pub struct GenerateReport {
    /// Resolved output directory.
    pub output_dir: PathBuf,
    /// One entry per configured service.
    pub services: Vec<ServiceSummary>,
    /// Files written or previewed.
    pub result: GenerationResult,
}

/// Result of code generation.
#[derive(Debug)]
pub enum GenerationResult {
    /// Files were written to disk.
    Written(Materialized),
    /// Dry-run preview.
    Preview(Vec<PreviewFile>),
}

/// A file in preview mode.
#[derive(Debug)]
pub struct PreviewFile {
    /// Path relative to the output directory.
    pub path: String,
    /// File content.
    pub content: String,
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        for service in &self.services {
            for line in service.warning_lines() {
                out.warning(&line);
            }
        }

        match &self.result {
            GenerationResult::Written(written) => self.render_written(out, written),
            GenerationResult::Preview(files) => self.render_preview(out, files),
        }
    }
}

impl GenerateReport {
    fn render_written(&self, out: &mut dyn Output, written: &Materialized) {
        for service in &self.services {
            out.key_value(
                &service.namespace,
                &format!("{} from {}", service.context_name, service.origin),
            );
        }
        out.newline();

        let verb = if written.initialized {
            "Rebuilt"
        } else {
            "Updated"
        };
        out.section(&format!("{} {}", verb, self.output_dir.display()));
        for file in &written.written {
            out.added_item(file);
        }
        for file in &written.unchanged {
            out.unchanged_item(file);
        }
    }

    fn render_preview(&self, out: &mut dyn Output, files: &[PreviewFile]) {
        for file in files {
            out.divider(&file.path);
            out.preformatted(&file.content);
        }

        out.divider("Summary");
        out.preformatted(&format!(
            "{} files would be generated in {}",
            files.len(),
            self.output_dir.display()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::RecordingOutput;

    fn report(result: GenerationResult) -> GenerateReport {
        GenerateReport {
            output_dir: PathBuf::from("src/client"),
            services: vec![ServiceSummary {
                namespace: "Sales".to_string(),
                context_name: "ODataContainer".to_string(),
                origin: "sales.xml".to_string(),
                types: 1,
                operations: 0,
                resource_sets: 1,
                warnings: Vec::new(),
            }],
            result,
        }
    }

    #[test]
    fn test_written_lists_files() {
        let report = report(GenerationResult::Written(Materialized {
            written: vec!["sales.rs".to_string()],
            unchanged: vec!["mod.rs".to_string()],
            initialized: false,
        }));
        let mut out = RecordingOutput::default();

        report.render(&mut out);

        assert_eq!(
            out.lines,
            [
                "Sales: ODataContainer from sales.xml",
                "",
                "Updated src/client:",
                "  + sales.rs",
                "  = mod.rs",
            ]
        );
    }

    #[test]
    fn test_preview_prints_each_file() {
        let report = report(GenerationResult::Preview(vec![PreviewFile {
            path: "mod.rs".to_string(),
            content: "pub mod odata;".to_string(),
        }]));
        let mut out = RecordingOutput::default();

        report.render(&mut out);

        assert_eq!(
            out.lines,
            [
                "── mod.rs ──",
                "pub mod odata;",
                "── Summary ──",
                "1 files would be generated in src/client",
            ]
        );
    }
}
