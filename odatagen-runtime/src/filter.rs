//! Boolean `$filter` expressions.
//!
//! A filter alternates between two states. [`FilterBuilder`] expects a
//! comparison; every comparison consumes it and yields a [`FilterChain`].
//! A chain expects a connective (`and`/`or`), which yields a builder again.
//! Only a chain can be handed to a query, so a filter can never end on a
//! dangling connective.

use std::fmt;

use crate::{Literal, ToLiteral};

/// A filter waiting for its next comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterBuilder {
    segments: Vec<String>,
}

/// A filter waiting for a connective, or ready to be serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChain {
    segments: Vec<String>,
}

fn value_segment(value: impl ToLiteral) -> String {
    format!("({})", Literal::of(value).to_url_string())
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, segment: String) -> FilterChain {
        self.segments.push(segment);
        FilterChain {
            segments: self.segments,
        }
    }

    fn compare(self, field: impl fmt::Display, op: &str, value: impl ToLiteral) -> FilterChain {
        let segment = format!("{field} {op} {}", value_segment(value));
        self.push(segment)
    }

    fn call(self, function: &str, field: impl fmt::Display, value: impl ToLiteral) -> FilterChain {
        let segment = format!("{function}({field}, {})", value_segment(value));
        self.push(segment)
    }

    fn nested(build: impl FnOnce(FilterBuilder) -> FilterChain) -> String {
        build(FilterBuilder::new()).to_string()
    }

    /// `field eq (value)`
    pub fn equals(self, field: impl fmt::Display, value: impl ToLiteral) -> FilterChain {
        self.compare(field, "eq", value)
    }

    /// `field ne (value)`
    pub fn not_equals(self, field: impl fmt::Display, value: impl ToLiteral) -> FilterChain {
        self.compare(field, "ne", value)
    }

    /// `field gt (value)`
    pub fn greater_than(self, field: impl fmt::Display, value: impl ToLiteral) -> FilterChain {
        self.compare(field, "gt", value)
    }

    /// `field ge (value)`
    pub fn greater_than_or_equals(
        self,
        field: impl fmt::Display,
        value: impl ToLiteral,
    ) -> FilterChain {
        self.compare(field, "ge", value)
    }

    /// `field lt (value)`
    pub fn less_than(self, field: impl fmt::Display, value: impl ToLiteral) -> FilterChain {
        self.compare(field, "lt", value)
    }

    /// `field le (value)`
    pub fn less_than_or_equals(
        self,
        field: impl fmt::Display,
        value: impl ToLiteral,
    ) -> FilterChain {
        self.compare(field, "le", value)
    }

    /// `field has (value)`, for flag enumerations.
    pub fn has(self, field: impl fmt::Display, value: impl ToLiteral) -> FilterChain {
        self.compare(field, "has", value)
    }

    /// `contains(field, (value))`
    pub fn contains(self, field: impl fmt::Display, value: impl ToLiteral) -> FilterChain {
        self.call("contains", field, value)
    }

    /// `startswith(field, (value))`
    pub fn starts_with(self, field: impl fmt::Display, value: impl ToLiteral) -> FilterChain {
        self.call("startswith", field, value)
    }

    /// `endswith(field, (value))`
    pub fn ends_with(self, field: impl fmt::Display, value: impl ToLiteral) -> FilterChain {
        self.call("endswith", field, value)
    }

    /// `not (inner)`
    pub fn not(self, build: impl FnOnce(FilterBuilder) -> FilterChain) -> FilterChain {
        let inner = Self::nested(build);
        self.push(format!("not ({inner})"))
    }

    /// `(inner)`, grouping a sub-expression.
    pub fn group(self, build: impl FnOnce(FilterBuilder) -> FilterChain) -> FilterChain {
        let inner = Self::nested(build);
        self.push(format!("({inner})"))
    }

    /// `field/any(variable: inner)`
    ///
    /// Inside `inner`, refer to the element through `variable`, e.g.
    /// `Path::new(["l", "Quantity"])`.
    pub fn any(
        self,
        field: impl fmt::Display,
        variable: &str,
        build: impl FnOnce(FilterBuilder) -> FilterChain,
    ) -> FilterChain {
        let inner = Self::nested(build);
        self.push(format!("{field}/any({variable}: {inner})"))
    }

    /// `field/all(variable: inner)`
    pub fn all(
        self,
        field: impl fmt::Display,
        variable: &str,
        build: impl FnOnce(FilterBuilder) -> FilterChain,
    ) -> FilterChain {
        let inner = Self::nested(build);
        self.push(format!("{field}/all({variable}: {inner})"))
    }

    /// A segment written by hand. It is not validated or encoded.
    pub fn raw(self, expression: impl Into<String>) -> FilterChain {
        self.push(expression.into())
    }
}

impl FilterChain {
    fn connect(mut self, connective: &str) -> FilterBuilder {
        self.segments.push(connective.to_string());
        FilterBuilder {
            segments: self.segments,
        }
    }

    pub fn and(self) -> FilterBuilder {
        self.connect("and")
    }

    pub fn or(self) -> FilterBuilder {
        self.connect("or")
    }

    /// The rendered segments, in append order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(" "))
    }
}
