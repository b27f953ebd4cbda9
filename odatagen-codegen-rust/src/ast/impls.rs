//! Rust impl block builder.

use odatagen_codegen::builder::{CodeFragment, Renderable};

use super::Fn;

/// Builder for `impl` blocks, inherent or trait.
#[derive(Debug, Clone)]
pub struct Impl {
    type_name: String,
    trait_name: Option<String>,
    attrs: Vec<String>,
    items: Vec<String>,
    methods: Vec<Fn>,
}

impl Impl {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            trait_name: None,
            attrs: Vec::new(),
            items: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Make this a trait implementation.
    pub fn for_trait(mut self, trait_name: impl Into<String>) -> Self {
        self.trait_name = Some(trait_name.into());
        self
    }

    pub fn attr(mut self, attr: impl Into<String>) -> Self {
        self.attrs.push(attr.into());
        self
    }

    /// Add a one-line associated item, such as `const NAME: &'static str = "x";`
    /// or `type Output = ();`. Items render before methods.
    pub fn item(mut self, item: impl Into<String>) -> Self {
        self.items.push(item.into());
        self
    }

    pub fn method(mut self, method: Fn) -> Self {
        self.methods.push(method);
        self
    }

    pub fn methods(mut self, methods: impl IntoIterator<Item = Fn>) -> Self {
        self.methods.extend(methods);
        self
    }
}

impl Renderable for Impl {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let header = match &self.trait_name {
            Some(trait_name) => format!("impl {} for {}", trait_name, self.type_name),
            None => format!("impl {}", self.type_name),
        };

        let items: Vec<CodeFragment> = self.items.iter().map(CodeFragment::line).collect();
        let methods = self.methods.iter().map(Renderable::to_fragments);
        let body = CodeFragment::separated(std::iter::once(items).chain(methods));

        let mut fragments: Vec<CodeFragment> = self
            .attrs
            .iter()
            .map(|attr| CodeFragment::line(format!("#[{}]", attr)))
            .collect();
        if body.is_empty() {
            fragments.push(CodeFragment::line(format!("{} {{}}", header)));
        } else {
            fragments.push(CodeFragment::braced(header, body));
        }
        fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::render;

    #[test]
    fn test_empty_impl() {
        assert_eq!(
            render(&Impl::new("Marker").for_trait("Send")),
            "impl Send for Marker {}\n"
        );
    }

    #[test]
    fn test_trait_impl_with_items_and_methods() {
        let i = Impl::new("ResetAllInSales")
            .for_trait("odata::Action")
            .item("const NAME: &'static str = \"Sales.ResetAll\";")
            .item("type Output = ();")
            .method(Fn::new("noop").private().receiver());
        insta::assert_snapshot!(render(&i), @r###"
        impl odata::Action for ResetAllInSales {
            const NAME: &'static str = "Sales.ResetAll";
            type Output = ();

            fn noop(&self) {}
        }
        "###);
    }

    #[test]
    fn test_methods_are_separated() {
        let i = Impl::new("Client")
            .method(Fn::new("a").body_line("1"))
            .method(Fn::new("b").body_line("2"));
        assert!(render(&i).contains("    }\n\n    pub fn b() {"));
    }
}
