//! Configuration document types and parsing.

use std::{path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, error::SourceContext, validate};

/// File name of the TOML configuration format.
pub const TOML_FILE_NAME: &str = "odatagen.toml";
/// File name of the JSON configuration format.
pub const JSON_FILE_NAME: &str = "odataconfig.json";

/// Configuration file names, in the order a directory is searched.
pub const FILE_NAMES: [&str; 2] = [TOML_FILE_NAME, JSON_FILE_NAME];

/// Root of a generation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory receiving the templates and generated artifacts
    #[serde(alias = "Output")]
    pub output: String,

    /// Rebuild the output directory from scratch, templates included
    #[serde(default = "default_initialize", alias = "Initialize")]
    pub initialize: bool,

    /// Services to generate, in order
    #[serde(default, alias = "Services")]
    pub services: Vec<ServiceConfig>,
}

fn default_initialize() -> bool {
    true
}

/// One service to generate a client for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    /// Names the generated artifact; unique per configuration
    #[serde(alias = "Namespace")]
    pub namespace: String,

    /// Path or `http(s)://` URL of the `$metadata` document
    #[serde(alias = "Metadata")]
    pub metadata: String,

    /// Name of the generated root container
    #[serde(
        default,
        alias = "context_name",
        alias = "ContextName",
        skip_serializing_if = "Option::is_none"
    )]
    pub context_name: Option<String>,
}

/// On-disk format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
}

impl Format {
    /// Pick the format from the file extension; anything but `.json` is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

impl FromStr for Config {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        parse_config(s, TOML_FILE_NAME, Format::Toml)
    }
}

impl Config {
    /// Parse a configuration file, picking the format from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        parse_config(&content, &path.display().to_string(), Format::from_path(path))
    }

    /// Parse a configuration from a string with a filename for error reporting.
    pub fn from_str_with_format(content: &str, filename: &str, format: Format) -> Result<Self> {
        parse_config(content, filename, format)
    }
}

/// Parse and validate a configuration document.
pub fn parse_config(content: &str, filename: &str, format: Format) -> Result<Config> {
    let ctx = SourceContext::new(content, filename);
    let config: Config = match format {
        Format::Toml => toml::from_str(content).map_err(|e| ctx.toml_error(e))?,
        Format::Json => serde_json::from_str(content).map_err(|e| ctx.json_error(e))?,
    };
    validate::validate_config(&config, &ctx)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml() {
        let config: Config = r#"
output = "src/client"

[[services]]
namespace = "Sales"
metadata = "metadata/sales.xml"
context_name = "SalesContext"
"#
        .parse()
        .unwrap();

        assert_eq!(config.output, "src/client");
        assert!(config.initialize);
        assert_eq!(config.services.len(), 1);
        assert_eq!(
            config.services[0].context_name.as_deref(),
            Some("SalesContext")
        );
    }

    #[test]
    fn test_parse_toml_camel_case_keys() {
        let config: Config = r#"
output = "out"
initialize = false

[[services]]
namespace = "Sales"
metadata = "sales.xml"
contextName = "SalesContext"
"#
        .parse()
        .unwrap();

        assert!(!config.initialize);
        assert_eq!(
            config.services[0].context_name.as_deref(),
            Some("SalesContext")
        );
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{
  "output": "Generated",
  "services": [
    { "namespace": "Sales", "metadata": "https://example.com/odata/$metadata" },
    { "namespace": "Ops", "metadata": "ops.xml", "contextName": "OpsContext" }
  ]
}"#;
        let config = Config::from_str_with_format(json, JSON_FILE_NAME, Format::Json).unwrap();

        assert_eq!(config.output, "Generated");
        assert!(config.initialize);
        assert_eq!(config.services[0].context_name, None);
        assert_eq!(
            config.services[1].context_name.as_deref(),
            Some("OpsContext")
        );
    }

    #[test]
    fn test_parse_json_pascal_case_keys() {
        let json = r#"{
  "Output": "Generated",
  "Initialize": false,
  "Services": [{ "Namespace": "Sales", "Metadata": "sales.xml", "ContextName": "Ctx" }]
}"#;
        let config = Config::from_str_with_format(json, JSON_FILE_NAME, Format::Json).unwrap();

        assert!(!config.initialize);
        assert_eq!(config.services[0].namespace, "Sales");
        assert_eq!(config.services[0].context_name.as_deref(), Some("Ctx"));
    }

    #[test]
    fn test_toml_syntax_error_is_parse_error() {
        let err = "output = ".parse::<Config>().unwrap_err();
        assert!(matches!(*err, Error::Parse { span: Some(_), .. }));
    }

    #[test]
    fn test_missing_output_is_parse_error() {
        let err = r#"
[[services]]
namespace = "Sales"
metadata = "sales.xml"
"#
        .parse::<Config>()
        .unwrap_err();
        assert!(matches!(*err, Error::Parse { .. }));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("odataconfig.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("a/B.JSON")), Format::Json);
        assert_eq!(Format::from_path(Path::new("odatagen.toml")), Format::Toml);
        assert_eq!(Format::from_path(Path::new("config")), Format::Toml);
    }

    #[test]
    fn test_from_file_missing_is_io_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = Config::from_file(temp.path().join("odatagen.toml")).unwrap_err();
        assert!(matches!(*err, Error::Io { .. }));
    }
}
