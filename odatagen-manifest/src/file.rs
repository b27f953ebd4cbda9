use std::path::{Path, PathBuf};

use crate::{Config, Error, Format, Result, ServiceConfig, config::parse_config};

/// A configuration file on disk: its location, raw text and parsed content.
///
/// Relative paths inside the document resolve against the directory that
/// holds the file, not the working directory of the process.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    content: String,
    config: Config,
}

impl ConfigFile {
    /// Open and parse a configuration file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Box::new(Error::Io {
                path: path.clone(),
                source: e,
            })
        })?;
        let config = parse_config(
            &content,
            &path.display().to_string(),
            Format::from_path(&path),
        )?;
        tracing::debug!(
            path = %path.display(),
            services = config.services.len(),
            "loaded configuration"
        );

        Ok(Self {
            path,
            content,
            config,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn services(&self) -> &[ServiceConfig] {
        &self.config.services
    }

    /// Directory relative paths in the document are resolved against.
    pub fn base_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// The output directory, resolved against [`Self::base_dir`].
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir().join(&self.config.output)
    }
}
