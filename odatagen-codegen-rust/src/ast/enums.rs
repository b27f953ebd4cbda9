//! Rust enum builder.

use odatagen_codegen::builder::{CodeFragment, Renderable};

/// A fieldless variant in a Rust enum.
#[derive(Debug, Clone)]
pub struct Variant {
    pub name: String,
    pub doc: Option<String>,
    pub attrs: Vec<String>,
    pub discriminant: Option<i64>,
}

impl Variant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            attrs: Vec::new(),
            discriminant: None,
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn attr(mut self, attr: impl Into<String>) -> Self {
        self.attrs.push(attr.into());
        self
    }

    /// Explicit discriminant (`Name = value`).
    pub fn discriminant(mut self, value: i64) -> Self {
        self.discriminant = Some(value);
        self
    }
}

/// Builder for Rust enums.
#[derive(Debug, Clone)]
pub struct Enum {
    name: String,
    doc: Option<String>,
    derives: Vec<String>,
    attrs: Vec<String>,
    variants: Vec<Variant>,
}

impl Enum {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            derives: Vec::new(),
            attrs: Vec::new(),
            variants: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn derive(mut self, derive: impl Into<String>) -> Self {
        self.derives.push(derive.into());
        self
    }

    pub fn derives(mut self, derives: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.derives.extend(derives.into_iter().map(Into::into));
        self
    }

    pub fn attr(mut self, attr: impl Into<String>) -> Self {
        self.attrs.push(attr.into());
        self
    }

    pub fn variant(mut self, variant: Variant) -> Self {
        self.variants.push(variant);
        self
    }

    pub fn variants(mut self, variants: impl IntoIterator<Item = Variant>) -> Self {
        self.variants.extend(variants);
        self
    }
}

impl Renderable for Enum {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let mut fragments = Vec::new();

        if let Some(doc) = &self.doc {
            fragments.push(CodeFragment::doc(doc));
        }
        if !self.derives.is_empty() {
            fragments.push(CodeFragment::line(format!(
                "#[derive({})]",
                self.derives.join(", ")
            )));
        }
        for attr in &self.attrs {
            fragments.push(CodeFragment::line(format!("#[{}]", attr)));
        }

        if self.variants.is_empty() {
            fragments.push(CodeFragment::line(format!("pub enum {} {{}}", self.name)));
            return fragments;
        }

        let body = self
            .variants
            .iter()
            .flat_map(|variant| {
                let mut lines = Vec::new();
                if let Some(doc) = &variant.doc {
                    lines.push(CodeFragment::doc(doc));
                }
                for attr in &variant.attrs {
                    lines.push(CodeFragment::line(format!("#[{}]", attr)));
                }
                lines.push(CodeFragment::line(match variant.discriminant {
                    Some(value) => format!("{} = {},", variant.name, value),
                    None => format!("{},", variant.name),
                }));
                lines
            })
            .collect();

        fragments.push(CodeFragment::braced(format!("pub enum {}", self.name), body));
        fragments
    }
}
