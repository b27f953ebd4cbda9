//! Generate operation - render every artifact, then materialize.

use eyre::{Context, Result};
use odatagen_codegen_rust::Generator;
use odatagen_core::LanguageCodegen;
use odatagen_manifest::ConfigFile;

use super::prepare;
use crate::{
    reports::{GenerateReport, GenerationResult, PreviewFile, ServiceSummary},
    templates,
};

/// Options for the generate operation.
pub struct GenerateOptions {
    /// Whether to preview without writing files.
    pub dry_run: bool,
}

/// Execute the generate operation.
pub fn generate(config: &ConfigFile, opts: GenerateOptions) -> Result<GenerateReport> {
    let prepared = prepare(config)?;
    let services = prepared.iter().map(ServiceSummary::from_prepared).collect();

    let generator = Generator::new(prepared.into_iter().map(|p| p.plan).collect());
    let output_dir = config.output_dir();
    let initialize = config.config().initialize;

    let result = if opts.dry_run {
        let mut files: Vec<PreviewFile> = Vec::new();
        if initialize {
            files.extend(templates::deployable().map(|t| PreviewFile {
                path: t.name.to_string(),
                content: t.content.to_string(),
            }));
        }
        files.extend(
            generator
                .preview()
                .wrap_err("Failed to render generated code")?
                .into_iter()
                .map(|f| PreviewFile {
                    path: f.path,
                    content: f.content,
                }),
        );
        GenerationResult::Preview(files)
    } else {
        let artifacts = generator
            .render()
            .wrap_err("Failed to render generated code")?;
        let materialized = templates::materialize(&output_dir, &artifacts, initialize)
            .wrap_err("Failed to write generated code")?;
        GenerationResult::Written(materialized)
    };

    Ok(GenerateReport {
        output_dir,
        services,
        result,
    })
}
