//! Rust function builder.

use odatagen_codegen::builder::{CodeFragment, Renderable};

/// A parameter in a Rust function.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: String,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// Builder for Rust functions.
#[derive(Debug, Clone)]
pub struct Fn {
    name: String,
    doc: Option<String>,
    attrs: Vec<String>,
    is_public: bool,
    is_const: bool,
    params: Vec<Param>,
    return_type: Option<String>,
    body: Vec<String>,
}

impl Fn {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            attrs: Vec::new(),
            is_public: true,
            is_const: false,
            params: Vec::new(),
            return_type: None,
            body: Vec::new(),
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

    pub fn const_(mut self) -> Self {
        self.is_const = true;
        self
    }

    /// Add a parameter. An empty type renders the name alone (`&self`).
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Shorthand for a `&self` receiver.
    pub fn receiver(self) -> Self {
        self.param(Param::new("&self", ""))
    }

    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.return_type = Some(ty.into());
        self
    }

    /// Add a line to the function body.
    pub fn body_line(mut self, line: impl Into<String>) -> Self {
        self.body.push(line.into());
        self
    }

    /// Add raw body content (can contain multiple lines).
    pub fn body(mut self, content: impl Into<String>) -> Self {
        for line in content.into().lines() {
            self.body.push(line.to_string());
        }
        self
    }

    fn signature(&self) -> String {
        let vis = if self.is_public { "pub " } else { "" };
        let const_kw = if self.is_const { "const " } else { "" };

        let params = self
            .params
            .iter()
            .map(|p| {
                if p.ty.is_empty() {
                    p.name.clone()
                } else {
                    format!("{}: {}", p.name, p.ty)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        match &self.return_type {
            Some(ret) => format!("{}{}fn {}({}) -> {}", vis, const_kw, self.name, params, ret),
            None => format!("{}{}fn {}({})", vis, const_kw, self.name, params),
        }
    }
}

impl Renderable for Fn {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let mut fragments = Vec::new();

        if let Some(doc) = &self.doc {
            fragments.push(CodeFragment::doc(doc));
        }
        for attr in &self.attrs {
            fragments.push(CodeFragment::line(format!("#[{}]", attr)));
        }

        if self.body.is_empty() {
            fragments.push(CodeFragment::line(format!("{} {{}}", self.signature())));
        } else {
            fragments.push(CodeFragment::braced(
                self.signature(),
                self.body.iter().map(CodeFragment::line).collect(),
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
    fn test_simple_fn() {
        assert_eq!(render(&Fn::new("greet")), "pub fn greet() {}\n");
    }

    #[test]
    fn test_fn_with_params() {
        let f = Fn::new("add")
            .param(Param::new("a", "i32"))
            .param(Param::new("b", "i32"))
            .returns("i32")
            .body_line("a + b");
        insta::assert_snapshot!(render(&f), @r###"
        pub fn add(a: i32, b: i32) -> i32 {
            a + b
        }
        "###);
    }

    #[test]
    fn test_private_method() {
        let f = Fn::new("name")
            .private()
            .receiver()
            .returns("&'static str")
            .body_line("\"x\"");
        assert!(render(&f).starts_with("fn name(&self) -> &'static str {"));
    }

    #[test]
    fn test_const_fn_with_doc() {
        let f = Fn::new("customer").const_().doc("Sales.Customer").receiver();
        let out = render(&f);
        assert!(out.contains("/// Sales.Customer"));
        assert!(out.contains("pub const fn customer(&self) {}"));
    }
}
