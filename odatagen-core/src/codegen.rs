//! Language-agnostic code generation traits.

use std::path::Path;

use eyre::Result;

/// Trait for language-specific client generators.
///
/// Implement this trait to add support for emitting client code in a new language.
pub trait LanguageCodegen {
    /// Language identifier (e.g., "rust")
    fn language(&self) -> &'static str;

    /// File extension for generated source files (e.g., "rs")
    fn file_extension(&self) -> &'static str;

    /// Render every generated file without writing to disk
    fn preview(&self) -> Result<Vec<PreviewFile>>;

    /// Generate all files into the specified output directory
    fn generate(&self, output_dir: &Path) -> Result<GenerateResult>;
}

/// Result of code generation
#[derive(Debug, Default)]
pub struct GenerateResult {
    /// Files whose content was written
    pub written: Vec<String>,
    /// Files that already held the generated content
    pub unchanged: Vec<String>,
}

impl GenerateResult {
    /// Total number of files produced by the generator.
    pub fn total(&self) -> usize {
        self.written.len() + self.unchanged.len()
    }
}

/// A generated file for preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFile {
    /// Relative path from output directory
    pub path: String,
    /// File content
    pub content: String,
}
