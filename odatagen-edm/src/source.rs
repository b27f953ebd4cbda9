//! Locating and reading metadata documents.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{Error, Result, SchemaGraph};

/// Where a metadata document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataSource {
    /// An `http://` or `https://` URL
    Remote(String),
    /// A file on disk
    File(PathBuf),
}

impl MetadataSource {
    /// Classify `uri`, resolving relative paths against `base_dir`.
    pub fn resolve(uri: &str, base_dir: &Path) -> Self {
        let uri = uri.trim();
        if uri.starts_with("http://") || uri.starts_with("https://") {
            return Self::Remote(uri.to_string());
        }

        let path = Path::new(uri.strip_prefix("file://").unwrap_or(uri));
        if path.is_absolute() {
            Self::File(path.to_path_buf())
        } else {
            Self::File(base_dir.join(path))
        }
    }

    /// Read the document text.
    pub fn read(&self) -> Result<String> {
        match self {
            Self::Remote(url) => {
                debug!(url, "fetching metadata");
                fetch(url).map_err(|source| Error::Fetch {
                    uri: url.clone(),
                    source,
                })
            }
            Self::File(path) => {
                debug!(path = %path.display(), "reading metadata");
                std::fs::read_to_string(path).map_err(|source| Error::Read {
                    uri: path.display().to_string(),
                    source,
                })
            }
        }
    }
}

impl fmt::Display for MetadataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

fn fetch(url: &str) -> reqwest::Result<String> {
    reqwest::blocking::get(url)?.error_for_status()?.text()
}

/// Load and lower the metadata document at `uri`.
///
/// Relative paths are resolved against `base_dir`, normally the directory
/// holding the configuration file.
pub fn load(uri: &str, base_dir: &Path) -> Result<SchemaGraph> {
    let source = MetadataSource::resolve(uri, base_dir);
    let xml = source.read()?;
    SchemaGraph::from_csdl(&xml, &source.to_string())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_resolve_classifies_uris() {
        let base = Path::new("/work/config");
        assert_eq!(
            MetadataSource::resolve("https://example.com/odata/$metadata", base),
            MetadataSource::Remote("https://example.com/odata/$metadata".into())
        );
        assert_eq!(
            MetadataSource::resolve("metadata.xml", base),
            MetadataSource::File(PathBuf::from("/work/config/metadata.xml"))
        );
        assert_eq!(
            MetadataSource::resolve("file:///srv/metadata.xml", base),
            MetadataSource::File(PathBuf::from("/srv/metadata.xml"))
        );
    }

    #[test]
    fn test_load_relative_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("metadata.xml"),
            r#"<edmx:Edmx xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx" Version="4.0">
  <edmx:DataServices><Schema Namespace="Sales"/></edmx:DataServices>
</edmx:Edmx>"#,
        )
        .unwrap();

        let graph = load("metadata.xml", temp.path()).unwrap();
        assert_eq!(graph.namespaces, ["Sales".to_string()]);
    }

    #[test]
    fn test_missing_file_names_the_path() {
        let temp = TempDir::new().unwrap();
        let err = load("absent.xml", temp.path()).unwrap_err();
        match err {
            Error::Read { uri, .. } => assert!(uri.ends_with("absent.xml")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
