use std::path::{Path, PathBuf};

use odatagen_codegen::naming::RUST_NAMING;
use odatagen_core::{FileRules, GeneratedFile};

use super::{GENERATED_HEADER, TEMPLATE_MODULE};
use crate::{RawCode, RustFile};

/// The output directory's `mod.rs`: the template module plus one module per
/// service artifact.
pub struct OutputMod {
    services: Vec<String>,
}

impl OutputMod {
    pub fn new(mut services: Vec<String>) -> Self {
        services.sort();
        Self { services }
    }
}

impl GeneratedFile for OutputMod {
    fn path(&self, base: &Path) -> PathBuf {
        base.join("mod.rs")
    }

    fn rules(&self) -> FileRules {
        FileRules::always_overwrite().with_header(GENERATED_HEADER)
    }

    fn render(&self) -> String {
        RustFile::new()
            .add(RawCode::new(format!("pub mod {};", TEMPLATE_MODULE)))
            .add(RawCode::lines(
                self.services
                    .iter()
                    .map(|service| format!("pub mod {};", RUST_NAMING.safe_name(service))),
            ))
            .render_with_header(GENERATED_HEADER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_mod_sorts_services() {
        let content = OutputMod::new(vec!["sales".to_string(), "inventory".to_string()]).render();
        insta::assert_snapshot!(content, @r###"
        // Code generated by odatagen. DO NOT EDIT.

        pub mod odata;

        pub mod inventory;
        pub mod sales;
        "###);
    }

    #[test]
    fn test_output_mod_path() {
        let file = OutputMod::new(Vec::new());
        assert_eq!(file.path(Path::new("out")), Path::new("out").join("mod.rs"));
    }
}
