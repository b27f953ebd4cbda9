//! Actions and functions, bound and unbound.
//!
//! Generated code declares one parameter struct per operation and
//! implements [`Action`] or [`Function`] for it. Dispatch structs (one per
//! binding target, plus the container's) implement [`OperationSet`] and hand
//! parameter structs to an [`OperationContext`].

use std::marker::PhantomData;

use serde::{Serialize, de::DeserializeOwned};

use crate::{ClientSettings, Error, Literal, Method, QueryBuilder, QueryResult, Result};

/// A set of operations callable on one resource.
pub trait OperationSet: Sized {
    /// Operations bound to the resource at `base_url`.
    fn new(settings: ClientSettings, base_url: String) -> Self;
}

/// The operation set of a resource that has no bound operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOperations;

impl OperationSet for NoOperations {
    fn new(_settings: ClientSettings, _base_url: String) -> Self {
        NoOperations
    }
}

/// Parameters of an action. Serialized as the JSON request body.
pub trait Action: Serialize {
    /// Qualified operation name, e.g. `Sales.Activate`
    const NAME: &'static str;
    type Output: DeserializeOwned;
}

/// Parameters of a function. Rendered into the URL as literals.
pub trait Function {
    /// Qualified operation name, e.g. `Sales.OrderTotal`
    const NAME: &'static str;
    type Output: DeserializeOwned;

    /// Parameter names and literal values, in declaration order.
    fn parameters(&self) -> Result<Vec<(&'static str, Literal)>>;
}

/// The resource an operation set is bound to.
#[derive(Debug, Clone)]
pub struct OperationContext {
    settings: ClientSettings,
    base_url: String,
}

impl OperationContext {
    pub fn new(settings: ClientSettings, base_url: String) -> Self {
        Self { settings, base_url }
    }

    fn operation_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }

    fn function_url<F: Function>(&self, parameters: &F) -> Result<String> {
        let arguments: Vec<String> = parameters
            .parameters()?
            .into_iter()
            .map(|(name, value)| format!("{name}={}", value.to_url_string()))
            .collect();
        Ok(format!(
            "{}({})",
            self.operation_url(F::NAME),
            arguments.join(",")
        ))
    }

    /// Prepare an action call.
    pub fn action<A: Action>(&self, parameters: A) -> ActionOperation<A> {
        ActionOperation {
            settings: self.settings.clone(),
            url: self.operation_url(A::NAME),
            parameters,
        }
    }

    /// Prepare a function call. Fails if a parameter has no literal form.
    pub fn function<F: Function>(&self, parameters: F) -> Result<FunctionOperation<F>> {
        Ok(FunctionOperation {
            settings: self.settings.clone(),
            url: self.function_url(&parameters)?,
            _function: PhantomData,
        })
    }

    /// Prepare a call to a function returning an entity collection.
    pub fn function_set<F: Function, T>(&self, parameters: F) -> Result<FunctionSetOperation<T>> {
        Ok(FunctionSetOperation {
            settings: self.settings.clone(),
            url: self.function_url(&parameters)?,
            _entity: PhantomData,
        })
    }
}

/// A prepared action call, sent as `POST <resource>/<Namespace.Name>`.
#[derive(Debug, Clone)]
pub struct ActionOperation<A> {
    settings: ClientSettings,
    url: String,
    parameters: A,
}

impl<A: Action> ActionOperation<A> {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn parameters(&self) -> &A {
        &self.parameters
    }

    pub async fn execute(self) -> Result<A::Output> {
        let body = serde_json::to_value(&self.parameters).map_err(|source| Error::Encode {
            url: self.url.clone(),
            source,
        })?;
        self.settings
            .send_json(Method::Post, self.url, Some(body))
            .await
    }
}

/// A prepared function call, sent as
/// `GET <resource>/<Namespace.Name>(p1=v1,...)`.
#[derive(Debug, Clone)]
pub struct FunctionOperation<F> {
    settings: ClientSettings,
    url: String,
    _function: PhantomData<fn() -> F>,
}

impl<F: Function> FunctionOperation<F> {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn execute(self) -> Result<F::Output> {
        self.settings.send_json(Method::Get, self.url, None).await
    }
}

/// A prepared call to a function that returns an entity collection, which
/// can be refined like any other collection.
#[derive(Debug, Clone)]
pub struct FunctionSetOperation<T> {
    settings: ClientSettings,
    url: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T> FunctionSetOperation<T> {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Query the function's result.
    pub fn query(self) -> QueryBuilder<T> {
        QueryBuilder::new(self.settings, self.url)
    }
}

impl<T: DeserializeOwned> FunctionSetOperation<T> {
    pub async fn execute(self) -> Result<QueryResult<T>> {
        self.query().execute().await
    }
}
