//! Nested `$expand` options.

use std::fmt;

use crate::{FilterBuilder, FilterChain, Order};

/// Options applied to one expanded navigation property.
///
/// Serializes as `$expand=..;$select=..;$orderby=..;$filter=..;$top=..;$skip=..`,
/// always in that order and leaving out absent options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandBuilder {
    expand: Vec<String>,
    select: Vec<String>,
    order_by: Vec<String>,
    filter: Option<String>,
    top: Option<u64>,
    skip: Option<u64>,
}

/// Render `property`, followed by its nested options in parentheses when
/// there are any.
pub(crate) fn expand_item(
    property: impl fmt::Display,
    build: impl FnOnce(ExpandBuilder) -> ExpandBuilder,
) -> String {
    let inner = build(ExpandBuilder::new());
    if inner.is_empty() {
        property.to_string()
    } else {
        format!("{property}({inner})")
    }
}

pub(crate) fn order_item(property: impl fmt::Display, order: Option<Order>) -> String {
    match order {
        Some(order) => format!("{property} {order}"),
        None => property.to_string(),
    }
}

impl ExpandBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add properties to `$select`.
    pub fn select<I>(mut self, properties: I) -> Self
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        self.select.extend(properties.into_iter().map(|p| p.to_string()));
        self
    }

    /// Expand a navigation property without options.
    pub fn expand(mut self, property: impl fmt::Display) -> Self {
        self.expand.push(property.to_string());
        self
    }

    /// Expand a navigation property with nested options.
    pub fn expand_with(
        mut self,
        property: impl fmt::Display,
        build: impl FnOnce(ExpandBuilder) -> ExpandBuilder,
    ) -> Self {
        self.expand.push(expand_item(property, build));
        self
    }

    /// Order by a property in the service's default direction.
    pub fn order_by(mut self, property: impl fmt::Display) -> Self {
        self.order_by.push(order_item(property, None));
        self
    }

    pub fn order_by_asc(mut self, property: impl fmt::Display) -> Self {
        self.order_by.push(order_item(property, Some(Order::Asc)));
        self
    }

    pub fn order_by_desc(mut self, property: impl fmt::Display) -> Self {
        self.order_by.push(order_item(property, Some(Order::Desc)));
        self
    }

    /// Set `$filter`, replacing any previous filter.
    pub fn filter(mut self, build: impl FnOnce(FilterBuilder) -> FilterChain) -> Self {
        self.filter = Some(build(FilterBuilder::new()).to_string());
        self
    }

    pub fn top(mut self, top: u64) -> Self {
        self.top = Some(top);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Whether no option has been set.
    pub fn is_empty(&self) -> bool {
        self.expand.is_empty()
            && self.select.is_empty()
            && self.order_by.is_empty()
            && self.filter.is_none()
            && self.top.is_none()
            && self.skip.is_none()
    }
}

impl fmt::Display for ExpandBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut options = Vec::new();
        if !self.expand.is_empty() {
            options.push(format!("$expand={}", self.expand.join(",")));
        }
        if !self.select.is_empty() {
            options.push(format!("$select={}", self.select.join(",")));
        }
        if !self.order_by.is_empty() {
            options.push(format!("$orderby={}", self.order_by.join(",")));
        }
        if let Some(filter) = &self.filter {
            options.push(format!("$filter={filter}"));
        }
        if let Some(top) = self.top {
            options.push(format!("$top={top}"));
        }
        if let Some(skip) = self.skip {
            options.push(format!("$skip={skip}"));
        }
        f.write_str(&options.join(";"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_use_fixed_order() {
        let expand = ExpandBuilder::new()
            .filter(|f| f.equals("Status", "Open"))
            .order_by_desc("Total")
            .select(["Id", "Total"])
            .expand("Customer");

        assert_eq!(
            expand.to_string(),
            "$expand=Customer;$select=Id,Total;$orderby=Total desc;$filter=Status eq ('Open')"
        );
    }

    #[test]
    fn test_nested_expansion_is_parenthesized() {
        let item = expand_item("Orders", |o| {
            o.select(["Id"])
                .expand_with("Lines", |l| l.select(["Sku"]).top(5))
        });
        assert_eq!(item, "Orders($expand=Lines($select=Sku;$top=5);$select=Id)");
    }

    #[test]
    fn test_empty_nested_options_are_dropped() {
        assert_eq!(expand_item("Customer", |c| c), "Customer");
        assert!(ExpandBuilder::new().is_empty());
    }
}
