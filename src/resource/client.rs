//! Collection handles.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::envelope::{Entity, extract, into_entities, into_entity, lookup};
use super::kind::{Anchor, ResourceKind};
use super::pager::ListRequest;
use super::{EntityId, Resource};
use crate::transport::{AdminRequest, RawResponse};
use crate::{Client, Error};

/// Where a collection URL starts.
#[derive(Clone)]
enum Base {
    /// The kind's own anchor on the top-level client.
    Root,
    /// Below a parent resource.
    Parent(Arc<ParentRef>),
    /// A fixed base URL.
    Url(Arc<str>),
}

struct ParentRef {
    collection: ResourceClient,
    entity_id: Option<EntityId>,
}

/// A handle on one collection of remote resources.
///
/// The handle is bound to a [`ResourceKind`] and to a parent: either the
/// top-level [`Client`] or another resource. Its URL is a pure function of
/// that chain; it owns no resource state and is cheap to clone.
///
/// ## Example
///
/// ```rust,no_run
/// # async fn example(client: threescale::Client) -> threescale::Result<()> {
/// let services = client.services();
/// let mut service = services.read(42);            // no request yet
/// let name = service.get("name").await?;          // first access fetches
///
/// let metrics = service.metrics();
/// assert!(metrics.url().ends_with("/admin/api/services/42/metrics"));
/// let hits = metrics.read_by_name("hits").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ResourceClient {
    client: Client,
    kind: &'static ResourceKind,
    base: Base,
    scope: Option<String>,
}

impl ResourceClient {
    pub(crate) fn root(client: Client, kind: &'static ResourceKind) -> Self {
        Self {
            client,
            kind,
            base: Base::Root,
            scope: None,
        }
    }

    pub(crate) fn nested(parent: &Resource, kind: &'static ResourceKind) -> Self {
        let collection = parent.collection().clone();
        Self {
            client: collection.client.clone(),
            kind,
            base: Base::Parent(Arc::new(ParentRef {
                collection,
                entity_id: parent.entity_id().cloned(),
            })),
            scope: None,
        }
    }

    pub(crate) fn at(client: Client, kind: &'static ResourceKind, base_url: String) -> Self {
        Self {
            client,
            kind,
            base: Base::Url(base_url.into()),
            scope: None,
        }
    }

    /// Returns the kind of the collection.
    pub fn kind(&self) -> &'static ResourceKind {
        self.kind
    }

    /// Returns the top-level client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Returns a copy whose URL carries an extra trailing segment, such as the
    /// environment of proxy configurations.
    #[must_use]
    pub fn scoped(&self, scope: impl Into<String>) -> Self {
        Self {
            scope: Some(scope.into()),
            ..self.clone()
        }
    }

    /// Returns the scope segment, if any.
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Returns the URL this collection hangs off.
    pub fn base_url(&self) -> String {
        match &self.base {
            Base::Parent(parent) => parent.url(),
            Base::Url(url) => url.to_string(),
            Base::Root => match self.kind.anchor() {
                Anchor::MasterApi => self.client.master_api_url(),
                Anchor::TenantRoot => self.client.url().to_string(),
                Anchor::AdminApi | Anchor::Parent => self.client.admin_api_url(),
            },
        }
    }

    /// Returns the collection URL.
    pub fn url(&self) -> String {
        let mut url = format!("{}/{}", self.base_url(), self.kind.url_segment());
        if let Some(scope) = &self.scope {
            url.push('/');
            url.push_str(scope);
        }
        url
    }

    /// Returns the URL of one entity; the collection URL for `None` and for
    /// singleton kinds.
    pub fn entity_url(&self, entity_id: Option<&EntityId>) -> String {
        match entity_id {
            Some(id) if !self.kind.is_singleton() => {
                format!("{}/{}", self.url(), urlencoding::encode(id.as_str()))
            },
            _ => self.url(),
        }
    }

    /// Returns an unloaded handle on the parent resource.
    pub fn parent(&self) -> Option<Resource> {
        match &self.base {
            Base::Parent(parent) => Some(Resource::unloaded(
                parent.collection.clone(),
                parent.entity_id.clone(),
            )),
            _ => None,
        }
    }

    /// Returns the id of the closest ancestor of the given kind.
    pub fn ancestor_id(&self, kind: &ResourceKind) -> Option<EntityId> {
        let mut current = self;
        while let Base::Parent(parent) = &current.base {
            if parent.collection.kind == kind {
                return parent.entity_id.clone();
            }
            current = &parent.collection;
        }
        None
    }

    // ------------------------------------------------------------------------
    // CRUD
    // ------------------------------------------------------------------------

    /// Creates a resource from `params` and returns it loaded.
    pub async fn create(&self, params: impl Into<Value>) -> Result<Resource, Error> {
        let url = match self.kind.create_path() {
            Some(path) => format!("{}/{}", self.client.admin_api_url(), path),
            None => self.entity_url(None),
        };
        tracing::info!(op = "create", kind = %self.kind, url = %url, "creating resource");
        let response = self
            .client
            .request(AdminRequest::post(url).json(params))
            .await?;
        self.wrap(response)
    }

    /// Lists the collection. Await the request, or stream it with
    /// [`ListRequest::into_stream`].
    pub fn list(&self) -> ListRequest {
        ListRequest::new(self.clone())
    }

    /// Returns an unloaded resource; nothing is fetched until first access.
    pub fn read(&self, entity_id: impl Into<EntityId>) -> Resource {
        let entity_id = entity_id.into();
        tracing::debug!(op = "read", kind = %self.kind, id = %entity_id, "lazy read");
        Resource::unloaded(self.clone(), Some(entity_id))
    }

    /// Returns an unloaded handle on a singleton kind.
    pub fn single(&self) -> Resource {
        Resource::unloaded(self.clone(), None)
    }

    /// Lists the collection and returns the first resource whose naming
    /// attribute equals `name`.
    pub async fn read_by_name(&self, name: &str) -> Result<Option<Resource>, Error> {
        let attribute = self.kind.name_attribute();
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|item| item.cached_attr(attribute).and_then(Value::as_str) == Some(name)))
    }

    /// Lists the collection and keeps the resources matching `predicate`.
    pub async fn select<F>(&self, mut predicate: F) -> Result<Vec<Resource>, Error>
    where
        F: FnMut(&Resource) -> bool,
    {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|item| predicate(item))
            .collect())
    }

    /// Lists the collection and keeps the resources whose attributes equal
    /// every given value.
    ///
    /// ```rust,no_run
    /// # async fn example(client: threescale::Client) -> threescale::Result<()> {
    /// let suspended = client
    ///     .accounts()
    ///     .select_by([("state", "suspended"), ("org_name", "acme")])
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn select_by<I, K, V>(&self, filters: I) -> Result<Vec<Resource>, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let filters: Vec<(String, Value)> = filters
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        tracing::debug!(op = "select", kind = %self.kind, filters = ?filters, "select by");
        self.select(|item| {
            filters
                .iter()
                .all(|(key, value)| item.cached_attr(key) == Some(value))
        })
        .await
    }

    /// The first resource [`select_by`](Self::select_by) returns.
    pub async fn read_by<I, K, V>(&self, filters: I) -> Result<Option<Resource>, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Ok(self.select_by(filters).await?.into_iter().next())
    }

    /// Updates a resource with `params` (PUT) and returns the new state.
    pub async fn update(
        &self,
        entity_id: impl Into<EntityId>,
        params: impl Into<Value>,
    ) -> Result<Resource, Error> {
        self.update_at(Some(&entity_id.into()), params.into()).await
    }

    /// Deletes a resource. Returns whether the call itself succeeded; absence
    /// is not verified afterwards.
    pub async fn delete(&self, entity_id: impl Into<EntityId>) -> Result<bool, Error> {
        self.delete_at(Some(&entity_id.into())).await
    }

    /// Returns `true` if GETting the resource answers 2xx. HTTP statuses never
    /// produce an error; transport failures still do.
    pub async fn exists(&self, entity_id: impl Into<EntityId>) -> Result<bool, Error> {
        self.exists_at(Some(&entity_id.into())).await
    }

    /// Fetches and unwraps the attribute map of a resource.
    pub async fn fetch(&self, entity_id: impl Into<EntityId>) -> Result<Entity, Error> {
        self.fetch_at(Some(&entity_id.into())).await
    }

    // ------------------------------------------------------------------------
    // Internals shared with `Resource`
    // ------------------------------------------------------------------------

    pub(crate) async fn fetch_at(&self, entity_id: Option<&EntityId>) -> Result<Entity, Error> {
        let url = self.entity_url(entity_id);
        tracing::debug!(op = "fetch", kind = %self.kind, url = %url, "fetching entity");
        let response = self.client.request(AdminRequest::get(url)).await?;
        let value: Value = response.json()?;
        into_entity(extract(value, Some(self.kind.entity_name()), None))
    }

    pub(crate) async fn update_at(
        &self,
        entity_id: Option<&EntityId>,
        params: Value,
    ) -> Result<Resource, Error> {
        let url = self.entity_url(entity_id);
        tracing::info!(op = "update", kind = %self.kind, url = %url, "updating resource");
        let response = self
            .client
            .request(AdminRequest::put(url).json(params))
            .await?;
        self.wrap(response)
    }

    pub(crate) async fn delete_at(&self, entity_id: Option<&EntityId>) -> Result<bool, Error> {
        let url = self.entity_url(entity_id);
        tracing::info!(op = "delete", kind = %self.kind, url = %url, "deleting resource");
        let response = self.client.request(AdminRequest::delete(url)).await?;
        Ok(response.is_success())
    }

    pub(crate) async fn exists_at(&self, entity_id: Option<&EntityId>) -> Result<bool, Error> {
        let url = self.entity_url(entity_id);
        tracing::info!(op = "exists", kind = %self.kind, url = %url, "checking existence");
        let response = self
            .client
            .request(AdminRequest::get(url).throws(false))
            .await?;
        Ok(response.is_success())
    }

    /// Lists one page: GETs the collection URL with `params`.
    pub(crate) async fn list_page(
        &self,
        params: Vec<(String, String)>,
    ) -> Result<Vec<Resource>, Error> {
        let url = self.url();
        tracing::info!(op = "list", kind = %self.kind, url = %url, params = ?params, "listing");
        let response = self
            .client
            .request(AdminRequest::get(url).params(params))
            .await?;
        self.wrap_many(response)
    }

    /// Unwraps a single-entity response into a resource of this collection.
    pub(crate) fn wrap(&self, response: RawResponse) -> Result<Resource, Error> {
        let value: Value = response.json()?;
        let entity = into_entity(extract(value, Some(self.kind.entity_name()), None))?;
        Ok(Resource::from_entity(self.clone(), entity))
    }

    /// Unwraps a collection response into resources of this collection.
    pub(crate) fn wrap_many(&self, response: RawResponse) -> Result<Vec<Resource>, Error> {
        let value: Value = response.json()?;
        let collection = self.kind.collection_name();
        let extracted = extract(value, Some(self.kind.entity_name()), Some(&collection));
        Ok(into_entities(extracted)?
            .into_iter()
            .map(|entity| Resource::from_entity(self.clone(), entity))
            .collect())
    }

    /// Fails unless this collection is of one of the given kinds.
    pub(crate) fn ensure_kind(&self, expected: &[&ResourceKind], op: &str) -> Result<(), Error> {
        if expected.iter().any(|kind| *kind == self.kind) {
            Ok(())
        } else {
            Err(Error::invalid_argument(format!(
                "{} is not available on {} resources",
                op, self.kind
            )))
        }
    }

    pub(crate) fn id_of(&self, entity: &Entity) -> Option<EntityId> {
        lookup(entity, self.kind.id_pointer()).and_then(EntityId::from_value)
    }
}

impl ParentRef {
    fn url(&self) -> String {
        self.collection.entity_url(self.entity_id.as_ref())
    }
}

impl fmt::Debug for ResourceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("kind", &self.kind.key())
            .field("url", &self.url())
            .finish_non_exhaustive()
    }
}
