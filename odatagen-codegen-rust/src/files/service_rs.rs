use std::path::{Path, PathBuf};

use eyre::Result;
use odatagen_codegen::{
    names::Scope,
    naming::RUST_NAMING,
    pipeline::GenerationPlan,
};
use odatagen_core::{FileRules, GeneratedFile};
use odatagen_edm::QualifiedName;
use tracing::debug;

use super::{GENERATED_HEADER, TEMPLATE_MODULE};
use crate::{RustFile, Use, emit};

/// Lints schema names routinely trip, silenced for the whole artifact.
const ALLOWED_LINTS: &str =
    "allow(non_snake_case, non_camel_case_types, dead_code, unused_imports, clippy::all)";

/// The artifact of one service: `<snake_case(namespace)>.rs`.
///
/// The content is rendered when the file is created, so every fatal
/// condition surfaces before anything is written.
#[derive(Debug, Clone)]
pub struct ServiceRs {
    module: String,
    content: String,
}

impl ServiceRs {
    pub fn new(plan: &GenerationPlan) -> Result<Self> {
        let module = RUST_NAMING.file_name(&plan.target.namespace);
        let content = render_service(plan)?;
        debug!(
            namespace = %plan.target.namespace,
            bytes = content.len(),
            "rendered service artifact"
        );
        Ok(Self { module, content })
    }

    /// File stem, also the module name declared in `mod.rs`.
    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn file_name(&self) -> String {
        format!("{}.rs", self.module)
    }
}

impl GeneratedFile for ServiceRs {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(self.file_name())
    }

    fn rules(&self) -> FileRules {
        FileRules::always_overwrite().with_header(GENERATED_HEADER)
    }

    fn render(&self) -> String {
        self.content.clone()
    }
}

fn render_service(plan: &GenerationPlan) -> Result<String> {
    let mut root = Scope::new(format!("artifact {}", plan.target.namespace));
    let origin = QualifiedName::new(&plan.target.namespace, TEMPLATE_MODULE);
    root.claim(TEMPLATE_MODULE, &origin)?;

    let mut namespaces = plan.graph.namespaces.clone();
    namespaces.sort();
    namespaces.dedup();

    let mut file = RustFile::new()
        .inner_attr(ALLOWED_LINTS)
        .use_stmt(Use::new(format!("super::{}", TEMPLATE_MODULE)));

    for namespace in &namespaces {
        root.claim(
            &RUST_NAMING.module_name(namespace),
            &QualifiedName::new(namespace, namespace),
        )?;
        file = file.add(emit::namespace_module(plan, namespace)?);
    }

    for (index, ident) in plan.names.iter() {
        let origin = plan
            .graph
            .operations
            .get(index)
            .map(|op| op.name.clone())
            .unwrap_or_else(|| origin.clone());
        root.claim(ident, &origin)?;
    }
    file = file.add_all(emit::operation_structs(plan)?);
    file = file.add_all(emit::resource_set_facades(plan, &mut root)?);
    file = file.add_all(emit::container(plan, &mut root)?);

    Ok(file.render_with_header(GENERATED_HEADER))
}
