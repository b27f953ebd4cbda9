use std::{
    io::Write,
    path::{Path, PathBuf},
};

use eyre::Result;
use tempfile::NamedTempFile;

/// Trait for types that represent a generated file
pub trait GeneratedFile {
    /// Get the file path relative to the base directory
    fn path(&self, base: &Path) -> PathBuf;

    /// Get the rules for writing this file
    fn rules(&self) -> FileRules;

    /// Render the file content
    fn render(&self) -> String;

    /// Write the file to disk
    fn write(&self, base: &Path) -> Result<WriteResult> {
        write_with_rules(&self.path(base), &self.render(), &self.rules())
    }
}

/// Write `content` to `path` through a temporary sibling file that is renamed
/// into place, so readers never observe a half-written file.
///
/// Parent directories are created as needed.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(content.as_bytes())?;
    temp.flush()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn write_with_rules(path: &Path, content: &str, rules: &FileRules) -> Result<WriteResult> {
    let content = match rules.header {
        Some(header) if !content.starts_with(header) => format!("{}\n\n{}", header, content),
        _ => content.to_string(),
    };

    if path.exists() {
        if rules.overwrite == Overwrite::IfMissing {
            return Ok(WriteResult::Skipped);
        }
        if std::fs::read_to_string(path).is_ok_and(|existing| existing == content) {
            return Ok(WriteResult::Unchanged);
        }
    }

    write_atomic(path, &content)?;
    Ok(WriteResult::Written)
}

/// Result of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written
    Written,
    /// File already held exactly this content
    Unchanged,
    /// File was skipped (already exists)
    Skipped,
}

/// A file to be generated
#[derive(Debug, Clone)]
pub struct File {
    path: PathBuf,
    content: String,
    rules: FileRules,
}

impl File {
    /// Create a new file with the given path and content (default rules: always overwrite)
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            rules: FileRules::default(),
        }
    }

    /// Replace the write rules for this file
    pub fn with_rules(mut self, rules: FileRules) -> Self {
        self.rules = rules;
        self
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the file content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Check if the file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write the file according to its rules
    pub fn write(&self) -> Result<WriteResult> {
        write_with_rules(&self.path, &self.content, &self.rules)
    }
}

/// Rules that determine how a file should be written
#[derive(Debug, Clone)]
pub struct FileRules {
    pub overwrite: Overwrite,
    pub header: Option<&'static str>,
}

impl FileRules {
    /// Rules for generated code: always overwrite.
    pub fn always_overwrite() -> Self {
        Self::default()
    }

    /// Rules for user-owned files: only create when missing.
    pub fn create_once() -> Self {
        Self {
            overwrite: Overwrite::IfMissing,
            header: None,
        }
    }

    /// Prepend a header to the content unless it already starts with it.
    pub fn with_header(mut self, header: &'static str) -> Self {
        self.header = Some(header);
        self
    }
}

/// How to handle existing files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overwrite {
    /// Always overwrite (generated code)
    Always,
    /// Only create if file doesn't exist
    IfMissing,
}

impl Default for FileRules {
    fn default() -> Self {
        Self {
            overwrite: Overwrite::Always,
            header: None,
        }
    }
}
