//! RustFile abstraction for structured Rust file generation.
//!
//! A file is inner attributes, then use statements, then body items
//! separated by blank lines.

use odatagen_codegen::builder::{CodeBuilder, CodeFragment, Indent, Renderable};

/// A Rust use statement.
#[derive(Debug, Clone)]
pub struct Use {
    module: String,
    symbols: Vec<String>,
}

impl Use {
    /// Create a use statement for a module.
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            symbols: Vec::new(),
        }
    }

    /// Add a symbol to import from the module.
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbols.push(symbol.into());
        self
    }

    /// Add multiple symbols to import.
    pub fn symbols(mut self, symbols: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.symbols.extend(symbols.into_iter().map(Into::into));
        self
    }

    fn format(&self) -> String {
        match self.symbols.as_slice() {
            [] => format!("use {};", self.module),
            [one] => format!("use {}::{};", self.module, one),
            many => format!("use {}::{{{}}};", self.module, many.join(", ")),
        }
    }
}

impl Renderable for Use {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        vec![CodeFragment::line(self.format())]
    }
}

/// A structured representation of a Rust file.
///
/// # Example
///
/// ```ignore
/// let file = RustFile::new()
///     .inner_attr("allow(dead_code)")
///     .use_stmt(Use::new("super::odata"))
///     .add(my_struct)
///     .render();
/// ```
#[derive(Debug, Default)]
pub struct RustFile {
    inner_attrs: Vec<String>,
    uses: Vec<Use>,
    body: Vec<Vec<CodeFragment>>,
}

impl RustFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a crate- or module-level attribute, rendered as `#![...]`.
    pub fn inner_attr(mut self, attr: impl Into<String>) -> Self {
        self.inner_attrs.push(attr.into());
        self
    }

    pub fn use_stmt(mut self, use_stmt: Use) -> Self {
        self.uses.push(use_stmt);
        self
    }

    /// Add a body element (any Renderable). Empty elements are skipped.
    #[allow(clippy::should_implement_trait)]
    pub fn add<R: Renderable>(mut self, node: R) -> Self {
        let fragments = node.to_fragments();
        if !fragments.is_empty() {
            self.body.push(fragments);
        }
        self
    }

    /// Add multiple body elements.
    pub fn add_all<R: Renderable>(self, nodes: impl IntoIterator<Item = R>) -> Self {
        nodes.into_iter().fold(self, RustFile::add)
    }

    /// Render the file with Rust indentation (4 spaces).
    pub fn render(&self) -> String {
        self.render_with_indent(Indent::RUST)
    }

    /// Render the file with a header comment.
    pub fn render_with_header(&self, header: &str) -> String {
        let content = self.render();
        if content.is_empty() {
            format!("{}\n", header)
        } else {
            format!("{}\n\n{}", header, content)
        }
    }

    /// Render the file with custom indentation.
    pub fn render_with_indent(&self, indent: Indent) -> String {
        let mut builder = CodeBuilder::new(indent);

        for attr in &self.inner_attrs {
            builder.push_line(&format!("#![{}]", attr));
        }
        if !self.inner_attrs.is_empty() && (!self.uses.is_empty() || !self.body.is_empty()) {
            builder.push_blank();
        }

        for use_stmt in &self.uses {
            builder.emit(use_stmt);
        }
        if !self.uses.is_empty() && !self.body.is_empty() {
            builder.push_blank();
        }

        for (i, fragments) in self.body.iter().enumerate() {
            if i > 0 {
                builder.push_blank();
            }
            builder.emit(fragments);
        }

        builder.build()
    }

    pub fn is_empty(&self) -> bool {
        self.inner_attrs.is_empty() && self.uses.is_empty() && self.body.is_empty()
    }
}

/// A raw code fragment that implements Renderable.
#[derive(Debug, Clone)]
pub struct RawCode(String);

impl RawCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Create a raw code fragment from multiple lines.
    pub fn lines(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(
            lines
                .into_iter()
                .map(Into::into)
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}

impl Renderable for RawCode {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        self.0.lines().map(CodeFragment::line).collect()
    }
}
