use std::{collections::HashSet, path::Path};

use eyre::{Result, bail};
use odatagen_codegen::pipeline::GenerationPlan;
use odatagen_core::{GenerateResult, GeneratedFile, LanguageCodegen, PreviewFile, WriteResult};
use tracing::{debug, info};

use crate::files::{OutputMod, ServiceRs, TEMPLATE_MODULE};

/// Rust client generator: one artifact per service plus the output
/// `mod.rs`.
pub struct Generator {
    plans: Vec<GenerationPlan>,
}

impl LanguageCodegen for Generator {
    fn language(&self) -> &'static str {
        "rust"
    }

    fn file_extension(&self) -> &'static str {
        "rs"
    }

    fn preview(&self) -> Result<Vec<PreviewFile>> {
        let artifacts = self.render()?;
        Ok(artifacts
            .files()
            .map(|file| PreviewFile {
                path: file.path(Path::new("")).to_string_lossy().into_owned(),
                content: file.render(),
            })
            .collect())
    }

    fn generate(&self, output_dir: &Path) -> Result<GenerateResult> {
        let artifacts = self.render()?;
        artifacts.write(output_dir)
    }
}

impl Generator {
    pub fn new(plans: Vec<GenerationPlan>) -> Self {
        Self { plans }
    }

    pub fn plans(&self) -> &[GenerationPlan] {
        &self.plans
    }

    /// Render every file in memory. Nothing is written; a fatal condition in
    /// any service fails the whole pass.
    pub fn render(&self) -> Result<Artifacts> {
        let mut modules = HashSet::new();
        let mut services = Vec::with_capacity(self.plans.len());

        for plan in &self.plans {
            let service = ServiceRs::new(plan)?;
            if service.module() == TEMPLATE_MODULE {
                bail!(
                    "namespace `{}` maps to module `{}`, which is reserved for the runtime template",
                    plan.target.namespace,
                    TEMPLATE_MODULE
                );
            }
            if !modules.insert(service.module().to_string()) {
                bail!(
                    "namespace `{}` maps to module `{}`, which another service already uses",
                    plan.target.namespace,
                    service.module()
                );
            }
            services.push(service);
        }

        let output_mod = OutputMod::new(services.iter().map(|s| s.module().to_string()).collect());
        debug!(services = services.len(), "rendered all artifacts");
        Ok(Artifacts {
            services,
            output_mod,
        })
    }
}

/// Every rendered file of one generation pass.
pub struct Artifacts {
    services: Vec<ServiceRs>,
    output_mod: OutputMod,
}

impl Artifacts {
    /// Service artifacts first, then `mod.rs`.
    pub fn files(&self) -> impl Iterator<Item = &dyn GeneratedFile> {
        self.services
            .iter()
            .map(|s| s as &dyn GeneratedFile)
            .chain(std::iter::once(&self.output_mod as &dyn GeneratedFile))
    }

    /// Write every file into `output_dir`, each through a temporary file.
    pub fn write(&self, output_dir: &Path) -> Result<GenerateResult> {
        let mut result = GenerateResult::default();
        for file in self.files() {
            let path = file.path(output_dir);
            let name = path.display().to_string();
            match file.write(output_dir)? {
                WriteResult::Written => result.written.push(name),
                WriteResult::Unchanged | WriteResult::Skipped => result.unchanged.push(name),
            }
        }
        info!(
            written = result.written.len(),
            unchanged = result.unchanged.len(),
            "generated client files"
        );
        Ok(result)
    }
}
