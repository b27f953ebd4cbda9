use std::path::{Path, PathBuf};

use odatagen_core::{FileRules, GeneratedFile, Overwrite};

use crate::TOML_FILE_NAME;

/// A starter `odatagen.toml` with a single service.
#[derive(Debug, Clone)]
pub struct StarterConfig {
    pub namespace: String,
    pub metadata: String,
    pub output: String,
    pub overwrite: Overwrite,
}

impl StarterConfig {
    pub fn new(
        namespace: impl Into<String>,
        metadata: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            metadata: metadata.into(),
            output: output.into(),
            overwrite: Overwrite::IfMissing,
        }
    }

    pub fn with_overwrite(mut self, overwrite: Overwrite) -> Self {
        self.overwrite = overwrite;
        self
    }
}

impl GeneratedFile for StarterConfig {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(TOML_FILE_NAME)
    }

    fn rules(&self) -> FileRules {
        FileRules {
            overwrite: self.overwrite,
            header: None,
        }
    }

    fn render(&self) -> String {
        format!(
            r#"# Directory receiving the odata template module and one file per service.
output = {}

# Delete and rebuild the output directory on every run.
initialize = true

[[services]]
namespace = {}
# Local path (relative to this file) or http(s) URL of the $metadata document.
metadata = {}
# context_name = "ODataContainer"
"#,
            toml::Value::from(self.output.as_str()),
            toml::Value::from(self.namespace.as_str()),
            toml::Value::from(self.metadata.as_str()),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use odatagen_core::WriteResult;
    use tempfile::TempDir;

    use super::*;
    use crate::Config;

    #[test]
    fn test_starter_parses_back() {
        let starter = StarterConfig::new("Sales", "https://example.com/odata/$metadata", "src/odata");

        let config: Config = starter.render().parse().unwrap();

        assert_eq!(config.output, "src/odata");
        assert!(config.initialize);
        assert_eq!(config.services[0].namespace, "Sales");
        assert_eq!(
            config.services[0].metadata,
            "https://example.com/odata/$metadata"
        );
        assert_eq!(config.services[0].context_name, None);
    }

    #[test]
    fn test_starter_escapes_values() {
        let starter = StarterConfig::new("Sales", r#"C:\meta "dir"\sales.xml"#, "out");

        let config: Config = starter.render().parse().unwrap();

        assert_eq!(config.services[0].metadata, r#"C:\meta "dir"\sales.xml"#);
    }

    #[test]
    fn test_starter_keeps_existing_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("odatagen.toml"), "# mine\n").unwrap();

        let result = StarterConfig::new("Sales", "sales.xml", "out")
            .write(temp.path())
            .unwrap();

        assert_eq!(result, WriteResult::Skipped);
        assert_eq!(
            fs::read_to_string(temp.path().join("odatagen.toml")).unwrap(),
            "# mine\n"
        );
    }

    #[test]
    fn test_starter_force_overwrites() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("odatagen.toml"), "# mine\n").unwrap();

        let result = StarterConfig::new("Sales", "sales.xml", "out")
            .with_overwrite(Overwrite::Always)
            .write(temp.path())
            .unwrap();

        assert_eq!(result, WriteResult::Written);
    }
}
