//! Rust struct builder.

use odatagen_codegen::builder::{CodeFragment, Renderable};

/// A field in a Rust struct.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub ty: String,
    pub doc: Option<String>,
    pub attrs: Vec<String>,
    pub is_public: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            doc: None,
            attrs: Vec::new(),
            is_public: true,
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

    pub fn private(mut self) -> Self {
        self.is_public = false;
        self
    }

    fn to_fragments(&self) -> Vec<CodeFragment> {
        let mut fragments = Vec::new();
        let vis = if self.is_public { "pub " } else { "" };

        if let Some(doc) = &self.doc {
            fragments.push(CodeFragment::doc(doc));
        }
        for attr in &self.attrs {
            fragments.push(CodeFragment::line(format!("#[{}]", attr)));
        }
        fragments.push(CodeFragment::line(format!(
            "{}{}: {},",
            vis, self.name, self.ty
        )));
        fragments
    }
}

/// Builder for Rust structs.
#[derive(Debug, Clone)]
pub struct Struct {
    name: String,
    doc: Option<String>,
    derives: Vec<String>,
    attrs: Vec<String>,
    fields: Vec<Field>,
    is_public: bool,
    is_unit: bool,
}

impl Struct {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            derives: Vec::new(),
            attrs: Vec::new(),
            fields: Vec::new(),
            is_public: true,
            is_unit: false,
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

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Render as a unit struct (`pub struct Name;`). Fields are ignored.
    pub fn unit(mut self) -> Self {
        self.is_unit = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Renderable for Struct {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let vis = if self.is_public { "pub " } else { "" };
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

        if self.is_unit {
            fragments.push(CodeFragment::line(format!("{}struct {};", vis, self.name)));
        } else if self.fields.is_empty() {
            fragments.push(CodeFragment::line(format!(
                "{}struct {} {{}}",
                vis, self.name
            )));
        } else {
            fragments.push(CodeFragment::braced(
                format!("{}struct {}", vis, self.name),
                self.fields.iter().flat_map(Field::to_fragments).collect(),
            ));
        }

        fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::render;

    #[test]
    fn test_empty_struct() {
        assert_eq!(render(&Struct::new("Empty")), "pub struct Empty {}\n");
    }

    #[test]
    fn test_unit_struct() {
        let s = Struct::new("Customers").derive("Debug").unit();
        assert_eq!(render(&s), "#[derive(Debug)]\npub struct Customers;\n");
    }

    #[test]
    fn test_struct_with_fields() {
        let s = Struct::new("Customer")
            .derives(["Debug", "Clone"])
            .field(Field::new("name", "String").attr("serde(rename = \"Name\")"))
            .field(Field::new("settings", "ClientSettings").private());
        insta::assert_snapshot!(render(&s), @r###"
        #[derive(Debug, Clone)]
        pub struct Customer {
            #[serde(rename = "Name")]
            pub name: String,
            settings: ClientSettings,
        }
        "###);
    }

    #[test]
    fn test_field_doc() {
        let s = Struct::new("Args").field(Field::new("count", "f64").doc("How many"));
        assert!(render(&s).contains("    /// How many\n    pub count: f64,"));
    }
}
