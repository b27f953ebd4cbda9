//! Collection queries.

use std::{fmt, marker::PhantomData};

use serde::de::DeserializeOwned;

use crate::{
    ClientSettings, ExpandBuilder, FilterBuilder, FilterChain, Method, QueryResult, Result,
    expand::{expand_item, order_item},
    settings::decode,
};

/// Sort direction for `$orderby`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        })
    }
}

/// A query against an entity collection.
///
/// Setters can be called in any order; the query string always lists
/// `$filter`, `$top`, `$skip`, `$orderby`, `$expand`, `$select`, `$count`
/// and then raw parameters.
#[derive(Debug, Clone)]
pub struct QueryBuilder<T> {
    settings: ClientSettings,
    url: String,
    filter: Option<String>,
    top: Option<u64>,
    skip: Option<u64>,
    order_by: Vec<String>,
    expand: Vec<String>,
    select: Vec<String>,
    with_count: bool,
    parameters: Vec<String>,
    operation: Option<&'static str>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> QueryBuilder<T> {
    /// A query against the collection at `url`.
    pub fn new(settings: ClientSettings, url: impl Into<String>) -> Self {
        Self {
            settings,
            url: url.into(),
            filter: None,
            top: None,
            skip: None,
            order_by: Vec::new(),
            expand: Vec::new(),
            select: Vec::new(),
            with_count: false,
            parameters: Vec::new(),
            operation: None,
            _entity: PhantomData,
        }
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

    /// Expand a navigation property.
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

    /// Add properties to `$select`.
    pub fn select<I>(mut self, properties: I) -> Self
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        self.select.extend(properties.into_iter().map(|p| p.to_string()));
        self
    }

    /// Append a raw query parameter such as `$search=blue`. It is not
    /// validated or encoded.
    pub fn parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameters.push(parameter.into());
        self
    }

    /// Ask the service to include `@odata.count` in the result.
    pub fn with_count(mut self) -> Self {
        self.with_count = true;
        self
    }

    /// Count the matching entities instead of fetching them.
    pub fn count(mut self) -> CountQuery {
        self.operation = Some("$count");
        CountQuery {
            url: self.url(),
            settings: self.settings,
        }
    }

    fn clauses(&self) -> Vec<String> {
        let mut clauses = Vec::new();
        if let Some(filter) = &self.filter {
            clauses.push(format!("$filter={filter}"));
        }
        if let Some(top) = self.top {
            clauses.push(format!("$top={top}"));
        }
        if let Some(skip) = self.skip {
            clauses.push(format!("$skip={skip}"));
        }
        if !self.order_by.is_empty() {
            clauses.push(format!("$orderby={}", self.order_by.join(",")));
        }
        if !self.expand.is_empty() {
            clauses.push(format!("$expand={}", self.expand.join(",")));
        }
        if !self.select.is_empty() {
            clauses.push(format!("$select={}", self.select.join(",")));
        }
        if self.with_count {
            clauses.push("$count=true".to_string());
        }
        clauses.extend(self.parameters.iter().cloned());
        clauses
    }

    /// The query string, starting with `?`, or empty when nothing is set.
    ///
    /// An operation prefix such as `/$count` comes first.
    pub fn query_string(&self) -> String {
        let mut query = String::new();
        if let Some(operation) = self.operation {
            query.push('/');
            query.push_str(operation);
        }
        let clauses = self.clauses();
        if !clauses.is_empty() {
            query.push('?');
            query.push_str(&clauses.join("&"));
        }
        query
    }

    /// The absolute request URL.
    pub fn url(&self) -> String {
        format!("{}{}", self.url, self.query_string())
    }
}

impl<T: DeserializeOwned> QueryBuilder<T> {
    /// Run the query.
    pub async fn execute(self) -> Result<QueryResult<T>> {
        self.settings.send_json(Method::Get, self.url(), None).await
    }
}

/// A `/$count` request.
#[derive(Debug, Clone)]
pub struct CountQuery {
    settings: ClientSettings,
    url: String,
}

impl CountQuery {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Run the request and return the number of matching entities.
    pub async fn execute(self) -> Result<u64> {
        let response = self.settings.send(Method::Get, self.url.clone(), None).await?;
        decode(&self.url, response.body.trim())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::{BoxError, Request, Response, Transport};

    struct Offline;

    #[async_trait]
    impl Transport for Offline {
        async fn send(&self, _request: Request) -> std::result::Result<Response, BoxError> {
            Err("offline".into())
        }
    }

    fn query() -> QueryBuilder<()> {
        let settings = ClientSettings::new("https://example.com/odata", Arc::new(Offline));
        QueryBuilder::new(settings, "https://example.com/odata/Orders")
    }

    #[test]
    fn test_clause_order_ignores_call_order() {
        let a = query()
            .skip(10)
            .filter(|f| f.equals("Status", "Open"))
            .top(5);
        let b = query()
            .top(5)
            .filter(|f| f.equals("Status", "Open"))
            .skip(10);

        assert_eq!(a.query_string(), b.query_string());
        assert_eq!(
            a.query_string(),
            "?$filter=Status eq ('Open')&$top=5&$skip=10"
        );
    }

    #[test]
    fn test_every_clause_in_fixed_order() {
        let q = query()
            .parameter("$search=blue")
            .select(["Id", "Total"])
            .with_count()
            .expand_with("Customer", |c| c.select(["Name"]))
            .order_by_asc("Total")
            .order_by("Id")
            .top(0);

        assert_eq!(
            q.query_string(),
            "?$top=0&$orderby=Total asc,Id&$expand=Customer($select=Name)&$select=Id,Total&$count=true&$search=blue"
        );
    }

    #[test]
    fn test_empty_query_has_no_question_mark() {
        assert_eq!(query().query_string(), "");
        assert_eq!(query().url(), "https://example.com/odata/Orders");
    }

    #[test]
    fn test_count_is_a_path_prefix() {
        let count = query().filter(|f| f.greater_than("Total", 10)).count();
        assert_eq!(
            count.url(),
            "https://example.com/odata/Orders/$count?$filter=Total gt (10)"
        );
    }

    #[test]
    fn test_filter_replaces_previous_filter() {
        let q = query()
            .filter(|f| f.equals("A", 1))
            .filter(|f| f.equals("B", 2));
        assert_eq!(q.query_string(), "?$filter=B eq (2)");
    }
}
