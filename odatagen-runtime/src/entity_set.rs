//! The resource-set facade and the single-entity operations it hands out.

use std::{fmt, marker::PhantomData};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value, json};

use crate::{
    Binding, ClientSettings, EntityType, Error, ExpandBuilder, Literal, Method, OperationSet,
    QueryBuilder, Result, StructuredType, ToLiteral,
    expand::expand_item,
    settings::decode,
};

/// Compile-time description of one entity set.
///
/// Generated code declares a marker type per entity set and implements this
/// trait for it.
pub trait ResourceSet {
    /// Name of the set at the service root
    const NAME: &'static str;
    type Entity: EntityType;
    /// Operations bound to a single entity of the set
    type EntityActions: OperationSet;
    type EntityFunctions: OperationSet;
    /// Operations bound to the set as a whole
    type SetActions: OperationSet;
    type SetFunctions: OperationSet;
}

fn single_key(value: impl ToLiteral) -> String {
    format!("({})", Literal::of(value).to_url_string())
}

fn compound_key<I, K, V>(pairs: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: fmt::Display,
    V: ToLiteral,
{
    let parts: Vec<String> = pairs
        .into_iter()
        .map(|(name, value)| format!("{name}={}", Literal::of(value).to_url_string()))
        .collect();
    format!("({})", parts.join(","))
}

/// Where an entity operation points.
#[derive(Debug, Clone)]
struct Target {
    url: String,
    key: Option<String>,
    /// `url` already addresses one entity, e.g. a single-valued navigation
    addressed: bool,
}

impl Target {
    fn collection(url: String) -> Self {
        Self {
            url,
            key: None,
            addressed: false,
        }
    }

    fn entity_url(&self) -> Result<String> {
        match &self.key {
            Some(key) => Ok(format!("{}{key}", self.url)),
            None if self.addressed => Ok(self.url.clone()),
            None => Err(Error::MissingKey {
                url: self.url.clone(),
            }),
        }
    }
}

/// Entry point for every request against one entity set.
#[derive(Debug, Clone)]
pub struct EntitySet<S> {
    settings: ClientSettings,
    url: String,
    _set: PhantomData<fn() -> S>,
}

impl<S: ResourceSet> EntitySet<S> {
    pub fn new(settings: ClientSettings) -> Self {
        Self {
            url: settings.resource_url(S::NAME),
            settings,
            _set: PhantomData,
        }
    }

    /// Absolute URL of the set.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn query(&self) -> QueryBuilder<S::Entity> {
        QueryBuilder::new(self.settings.clone(), self.url.clone())
    }

    /// Fetch one entity by key.
    pub fn get(&self) -> GetOperation<S::Entity, S::EntityActions, S::EntityFunctions> {
        GetOperation::new(self.settings.clone(), Target::collection(self.url.clone()))
    }

    /// Create an entity (`POST`).
    pub fn create(&self) -> MutationOperation<S::Entity> {
        MutationOperation::new(self.settings.clone(), self.url.clone(), Method::Post)
    }

    /// Replace an entity (`PUT`). Requires a key.
    pub fn replace(&self) -> MutationOperation<S::Entity> {
        MutationOperation::new(self.settings.clone(), self.url.clone(), Method::Put)
    }

    /// Update some properties of an entity (`PATCH`). Requires a key.
    pub fn update(&self) -> MutationOperation<S::Entity> {
        MutationOperation::new(self.settings.clone(), self.url.clone(), Method::Patch)
    }

    pub fn delete(&self) -> DeleteOperation<S::Entity> {
        DeleteOperation {
            settings: self.settings.clone(),
            target: Target::collection(self.url.clone()),
            _entity: PhantomData,
        }
    }

    /// Add or remove entity references on a navigation property.
    pub fn link(&self) -> LinkOperation<S::Entity> {
        LinkOperation {
            settings: self.settings.clone(),
            target: Target::collection(self.url.clone()),
            link: None,
            _entity: PhantomData,
        }
    }

    /// Actions bound to the whole set.
    pub fn actions(&self) -> S::SetActions {
        S::SetActions::new(self.settings.clone(), self.url.clone())
    }

    /// Functions bound to the whole set.
    pub fn functions(&self) -> S::SetFunctions {
        S::SetFunctions::new(self.settings.clone(), self.url.clone())
    }
}

/// Fetches a single entity, and addresses it for navigation and bound
/// operations.
#[derive(Debug, Clone)]
pub struct GetOperation<T, A = crate::NoOperations, F = crate::NoOperations> {
    settings: ClientSettings,
    target: Target,
    select: Vec<String>,
    expand: Vec<String>,
    raw_value: bool,
    _marker: PhantomData<fn() -> (T, A, F)>,
}

impl<T, A, F> GetOperation<T, A, F> {
    fn new(settings: ClientSettings, target: Target) -> Self {
        Self {
            settings,
            target,
            select: Vec::new(),
            expand: Vec::new(),
            raw_value: false,
            _marker: PhantomData,
        }
    }

    pub fn key(mut self, key: impl ToLiteral) -> Self {
        self.target.key = Some(single_key(key));
        self
    }

    /// Address the entity by a multi-part key, e.g. `(OrderId=1,Sku='A')`.
    pub fn compound_key<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: fmt::Display,
        V: ToLiteral,
    {
        self.target.key = Some(compound_key(pairs));
        self
    }

    pub fn select<I>(mut self, properties: I) -> Self
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        self.select.extend(properties.into_iter().map(|p| p.to_string()));
        self
    }

    pub fn expand(mut self, property: impl fmt::Display) -> Self {
        self.expand.push(property.to_string());
        self
    }

    pub fn expand_with(
        mut self,
        property: impl fmt::Display,
        build: impl FnOnce(ExpandBuilder) -> ExpandBuilder,
    ) -> Self {
        self.expand.push(expand_item(property, build));
        self
    }

    /// Address the raw value (`/$value`). Use with [`execute_text`](Self::execute_text).
    pub fn raw_value(mut self) -> Self {
        self.raw_value = true;
        self
    }

    /// The entity's address, relative to the service root.
    pub fn binding(&self) -> Result<Binding> {
        let url = self.target.entity_url()?;
        let relative = url
            .strip_prefix(self.settings.base_url())
            .map(str::to_string)
            .unwrap_or(url);
        Ok(Binding::new(relative))
    }

    /// The entity's absolute address.
    pub fn absolute_binding(&self) -> Result<Binding> {
        Ok(Binding::new(self.target.entity_url()?))
    }

    /// Follow a single-valued navigation property.
    pub fn navigate<R>(&self, property: impl fmt::Display) -> Result<GetOperation<R>> {
        let url = format!("{}/{property}", self.target.entity_url()?);
        let target = Target {
            url,
            key: None,
            addressed: true,
        };
        Ok(GetOperation::new(self.settings.clone(), target))
    }

    /// Follow a collection-valued navigation property.
    pub fn navigate_collection<R>(&self, property: impl fmt::Display) -> Result<QueryBuilder<R>> {
        let url = format!("{}/{property}", self.target.entity_url()?);
        Ok(QueryBuilder::new(self.settings.clone(), url))
    }

    /// Actions bound to this entity.
    pub fn actions(&self) -> Result<A>
    where
        A: OperationSet,
    {
        Ok(A::new(self.settings.clone(), self.target.entity_url()?))
    }

    /// Functions bound to this entity.
    pub fn functions(&self) -> Result<F>
    where
        F: OperationSet,
    {
        Ok(F::new(self.settings.clone(), self.target.entity_url()?))
    }

    fn query_string(&self) -> String {
        let mut clauses = Vec::new();
        if !self.expand.is_empty() {
            clauses.push(format!("$expand={}", self.expand.join(",")));
        }
        if !self.select.is_empty() {
            clauses.push(format!("$select={}", self.select.join(",")));
        }
        if clauses.is_empty() {
            String::new()
        } else {
            format!("?{}", clauses.join("&"))
        }
    }

    /// The absolute request URL.
    pub fn url(&self) -> Result<String> {
        let suffix = if self.raw_value { "/$value" } else { "" };
        Ok(format!(
            "{}{suffix}{}",
            self.target.entity_url()?,
            self.query_string()
        ))
    }

    /// Fetch the body as text, for raw values.
    pub async fn execute_text(self) -> Result<String> {
        let url = self.url()?;
        let response = self.settings.send(Method::Get, url, None).await?;
        Ok(response.body)
    }
}

impl<T: DeserializeOwned, A, F> GetOperation<T, A, F> {
    pub async fn execute(self) -> Result<T> {
        let url = self.url()?;
        self.settings.send_json(Method::Get, url, None).await
    }
}

/// Creates, replaces or updates an entity.
#[derive(Debug, Clone)]
pub struct MutationOperation<T> {
    settings: ClientSettings,
    target: Target,
    method: Method,
    body: Map<String, Value>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> MutationOperation<T> {
    fn new(settings: ClientSettings, url: String, method: Method) -> Self {
        Self {
            settings,
            target: Target {
                url,
                key: None,
                addressed: method == Method::Post,
            },
            method,
            body: Map::new(),
            _entity: PhantomData,
        }
    }

    pub fn key(mut self, key: impl ToLiteral) -> Self {
        self.target.key = Some(single_key(key));
        self
    }

    pub fn compound_key<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: fmt::Display,
        V: ToLiteral,
    {
        self.target.key = Some(compound_key(pairs));
        self
    }

    fn encode(&self, value: &impl Serialize) -> Result<Value> {
        serde_json::to_value(value).map_err(|source| Error::Encode {
            url: self.target.url.clone(),
            source,
        })
    }

    /// Send every property of `value`, keeping bindings set so far.
    pub fn value(mut self, value: &T) -> Result<Self>
    where
        T: Serialize,
    {
        let object: Map<String, Value> =
            serde_json::from_value(self.encode(value)?).map_err(|source| Error::Encode {
                url: self.target.url.clone(),
                source,
            })?;
        self.body.extend(object);
        Ok(self)
    }

    /// Send `value` annotated with its `@odata.type`, for derived types.
    pub fn value_typed<V>(mut self, value: &V) -> Result<Self>
    where
        V: StructuredType + Serialize,
    {
        if let Value::Object(object) = self.encode(value)? {
            self.body.extend(object);
        }
        self.body.insert(
            "@odata.type".to_string(),
            Value::String(V::type_name().annotation()),
        );
        Ok(self)
    }

    /// Set one property. A `null` value removes it from the body.
    pub fn property(mut self, name: &str, value: impl Serialize) -> Result<Self> {
        match self.encode(&value)? {
            Value::Null => {
                self.body.remove(name);
            }
            value => {
                self.body.insert(name.to_string(), value);
            }
        }
        Ok(self)
    }

    /// Bind a single-valued navigation property to an existing entity.
    pub fn bind(mut self, property: &str, binding: &Binding) -> Self {
        self.body.remove(property);
        self.body.insert(
            format!("{property}@odata.bind"),
            Value::String(binding.to_string()),
        );
        self
    }

    /// Bind a collection-valued navigation property to existing entities.
    pub fn bind_many<I>(mut self, property: &str, bindings: I) -> Self
    where
        I: IntoIterator<Item = Binding>,
    {
        let urls: Vec<Value> = bindings
            .into_iter()
            .map(|b| Value::String(b.to_string()))
            .collect();
        self.body.remove(property);
        self.body
            .insert(format!("{property}@odata.bind"), Value::Array(urls));
        self
    }

    /// The JSON body assembled so far.
    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn url(&self) -> Result<String> {
        self.target.entity_url()
    }
}

impl<T: DeserializeOwned> MutationOperation<T> {
    /// Send the request. Returns the entity when the service echoes it back.
    pub async fn execute(self) -> Result<Option<T>> {
        let url = self.url()?;
        let response = self
            .settings
            .send(self.method, url.clone(), Some(Value::Object(self.body)))
            .await?;
        if response.body.trim().is_empty() {
            return Ok(None);
        }
        decode(&url, &response.body).map(Some)
    }
}

/// Deletes an entity.
#[derive(Debug, Clone)]
pub struct DeleteOperation<T> {
    settings: ClientSettings,
    target: Target,
    _entity: PhantomData<fn() -> T>,
}

impl<T> DeleteOperation<T> {
    pub fn key(mut self, key: impl ToLiteral) -> Self {
        self.target.key = Some(single_key(key));
        self
    }

    pub fn compound_key<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: fmt::Display,
        V: ToLiteral,
    {
        self.target.key = Some(compound_key(pairs));
        self
    }

    pub fn url(&self) -> Result<String> {
        self.target.entity_url()
    }

    pub async fn execute(self) -> Result<()> {
        let url = self.url()?;
        self.settings.send(Method::Delete, url, None).await?;
        Ok(())
    }
}

/// Adds or removes a reference between two entities.
#[derive(Debug, Clone)]
pub struct LinkOperation<T> {
    settings: ClientSettings,
    target: Target,
    link: Option<(String, Binding)>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> LinkOperation<T> {
    pub fn key(mut self, key: impl ToLiteral) -> Self {
        self.target.key = Some(single_key(key));
        self
    }

    pub fn compound_key<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: fmt::Display,
        V: ToLiteral,
    {
        self.target.key = Some(compound_key(pairs));
        self
    }

    /// The navigation property and the entity on the other side.
    pub fn value(mut self, property: impl fmt::Display, binding: Binding) -> Self {
        self.link = Some((property.to_string(), binding));
        self
    }

    fn reference(&self) -> Result<(String, &Binding)> {
        let entity_url = self.target.entity_url()?;
        let (property, binding) = self.link.as_ref().ok_or_else(|| Error::MissingLink {
            url: entity_url.clone(),
        })?;
        Ok((format!("{entity_url}/{property}/$ref"), binding))
    }

    /// Add the reference (`POST .../$ref`).
    pub async fn add(self) -> Result<()> {
        let (url, binding) = self.reference()?;
        let body = json!({ "@odata.id": binding.to_string() });
        self.settings.send(Method::Post, url, Some(body)).await?;
        Ok(())
    }

    /// Remove the reference (`DELETE .../$ref?$id=...`).
    pub async fn remove(self) -> Result<()> {
        let (url, binding) = self.reference()?;
        let url = format!("{url}?$id={}", binding.to_url_string());
        self.settings.send(Method::Delete, url, None).await?;
        Ok(())
    }
}
