//! Modules and type aliases.

use odatagen_codegen::builder::{CodeFragment, Renderable};

/// An inline `pub mod name { ... }` block.
#[derive(Debug, Clone)]
pub struct Module {
    name: String,
    doc: Option<String>,
    items: Vec<Vec<CodeFragment>>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            items: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Add an item. Items are separated by one blank line.
    pub fn item(mut self, item: &impl Renderable) -> Self {
        self.items.push(item.to_fragments());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.iter().all(Vec::is_empty)
    }
}

impl Renderable for Module {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let mut fragments = Vec::new();
        if let Some(doc) = &self.doc {
            fragments.push(CodeFragment::doc(doc));
        }
        fragments.push(CodeFragment::braced(
            format!("pub mod {}", self.name),
            CodeFragment::separated(self.items.iter().cloned()),
        ));
        fragments
    }
}

/// A `pub type Name = Target;` alias.
#[derive(Debug, Clone)]
pub struct TypeAlias {
    name: String,
    target: String,
    doc: Option<String>,
}

impl TypeAlias {
    pub fn new(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            doc: None,
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

impl Renderable for TypeAlias {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let mut fragments = Vec::new();
        if let Some(doc) = &self.doc {
            fragments.push(CodeFragment::doc(doc));
        }
        fragments.push(CodeFragment::line(format!(
            "pub type {} = {};",
            self.name, self.target
        )));
        fragments
    }
}
