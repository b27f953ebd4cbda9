//! Renderable trait and CodeFragment for decoupled code generation.
//!
//! Schema traversal produces fragments; layout happens later, when a
//! [`CodeBuilder`](super::CodeBuilder) applies them.

/// Represents a fragment of generated code.
#[derive(Debug, Clone, PartialEq)]
pub enum CodeFragment {
    /// A single line of code (will have newline appended).
    Line(String),
    /// A blank line.
    Blank,
    /// Raw text without newline.
    Raw(String),
    /// A block with header, body fragments, and optional closing line.
    Block {
        header: String,
        body: Vec<CodeFragment>,
        close: Option<String>,
    },
    /// Indent the contained fragments.
    Indent(Vec<CodeFragment>),
    /// A sequence of fragments.
    Sequence(Vec<CodeFragment>),
    /// A doc comment, one `///` line per line of text.
    Doc(String),
}

impl CodeFragment {
    /// Create a line fragment.
    pub fn line(s: impl Into<String>) -> Self {
        Self::Line(s.into())
    }

    /// Create a blank line fragment.
    pub fn blank() -> Self {
        Self::Blank
    }

    /// Create a raw text fragment.
    pub fn raw(s: impl Into<String>) -> Self {
        Self::Raw(s.into())
    }

    /// Create a block fragment.
    pub fn block(
        header: impl Into<String>,
        body: Vec<CodeFragment>,
        close: Option<String>,
    ) -> Self {
        Self::Block {
            header: header.into(),
            body,
            close,
        }
    }

    /// Create a brace-delimited block: `header {` ... `}`.
    pub fn braced(header: impl AsRef<str>, body: Vec<CodeFragment>) -> Self {
        Self::block(format!("{} {{", header.as_ref()), body, Some("}".to_string()))
    }

    /// Create an indented fragment sequence.
    pub fn indent(fragments: Vec<CodeFragment>) -> Self {
        Self::Indent(fragments)
    }

    /// Create a sequence of fragments.
    pub fn sequence(fragments: Vec<CodeFragment>) -> Self {
        Self::Sequence(fragments)
    }

    /// Create a doc comment fragment.
    pub fn doc(s: impl Into<String>) -> Self {
        Self::Doc(s.into())
    }

    /// Join groups of fragments with one blank line between groups.
    pub fn separated(groups: impl IntoIterator<Item = Vec<CodeFragment>>) -> Vec<CodeFragment> {
        let mut out = Vec::new();
        for group in groups.into_iter().filter(|g| !g.is_empty()) {
            if !out.is_empty() {
                out.push(Self::Blank);
            }
            out.extend(group);
        }
        out
    }
}

/// Trait for types that can be rendered to code fragments.
///
/// Implement this trait for AST nodes to enable them to be rendered
/// through CodeBuilder without direct coupling.
pub trait Renderable {
    /// Convert this node to a sequence of code fragments.
    fn to_fragments(&self) -> Vec<CodeFragment>;
}

/// Blanket implementation for references.
impl<T: Renderable + ?Sized> Renderable for &T {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        (*self).to_fragments()
    }
}

/// Blanket implementation for Box.
impl<T: Renderable + ?Sized> Renderable for Box<T> {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        self.as_ref().to_fragments()
    }
}

impl Renderable for [CodeFragment] {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        self.to_vec()
    }
}

impl Renderable for Vec<CodeFragment> {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        self.clone()
    }
}
