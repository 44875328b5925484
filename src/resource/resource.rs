//! Single resource references with lazily loaded state.

use std::fmt;

use serde_json::Value;

use super::envelope::{Entity, lookup};
use super::kind::ResourceKind;
use super::{EntityId, ResourceClient};
use crate::{Client, Error};

/// A reference to one remote entity.
///
/// A resource is either *unloaded* (only the id is known) or *loaded* (the
/// attribute map from the last fetch is cached). Reading through
/// [`entity`](Self::entity) or [`get`](Self::get) loads it on first access;
/// [`read`](Self::read) drops the cache and loads it again.
///
/// Attribute changes made with [`set`](Self::set) are kept as pending changes
/// and only sent by [`update`](Self::update), which merges them over the last
/// known server state.
///
/// A resource is a plain value: clones share nothing, and mutation needs
/// `&mut self`.
///
/// ## Example
///
/// ```rust,no_run
/// # async fn example(client: threescale::Client) -> threescale::Result<()> {
/// let mut service = client.services().read(42);
/// assert!(!service.is_loaded());
///
/// service.set("description", "Echo API");
/// service.update().await?;                    // PUT with the merged attributes
/// assert_eq!(service.attr_str("description"), Some("Echo API"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Resource {
    collection: ResourceClient,
    entity_id: Option<EntityId>,
    entity: Option<Entity>,
    pending: Entity,
}

impl Resource {
    pub(crate) fn unloaded(collection: ResourceClient, entity_id: Option<EntityId>) -> Self {
        Self {
            collection,
            entity_id,
            entity: None,
            pending: Entity::new(),
        }
    }

    pub(crate) fn from_entity(collection: ResourceClient, entity: Entity) -> Self {
        let entity_id = collection.id_of(&entity);
        Self {
            collection,
            entity_id,
            entity: Some(entity),
            pending: Entity::new(),
        }
    }

    /// Returns the id. Available whether or not the resource is loaded.
    pub fn entity_id(&self) -> Option<&EntityId> {
        self.entity_id.as_ref()
    }

    /// Returns the id, or an error for resources without one.
    pub fn require_id(&self) -> Result<&EntityId, Error> {
        self.entity_id.as_ref().ok_or_else(|| {
            Error::invalid_argument(format!("{} resource has no id", self.collection.kind()))
        })
    }

    /// Returns the collection this resource belongs to.
    pub fn collection(&self) -> &ResourceClient {
        &self.collection
    }

    /// Returns the kind of the resource.
    pub fn kind(&self) -> &'static ResourceKind {
        self.collection.kind()
    }

    /// Returns the top-level client.
    pub fn client(&self) -> &Client {
        self.collection.client()
    }

    /// Returns the resource URL.
    pub fn url(&self) -> String {
        self.collection.entity_url(self.entity_id.as_ref())
    }

    /// Returns `true` if the attribute map is cached.
    pub fn is_loaded(&self) -> bool {
        self.entity.is_some()
    }

    /// Returns the attribute map, fetching it on first access.
    pub async fn entity(&mut self) -> Result<&Entity, Error> {
        if self.entity.is_none() {
            let fetched = self.collection.fetch_at(self.entity_id.as_ref()).await?;
            if self.entity_id.is_none() {
                self.entity_id = self.collection.id_of(&fetched);
            }
            self.entity = Some(fetched);
        }
        let entity: &Entity = self.entity.get_or_insert_with(Entity::new);
        Ok(entity)
    }

    /// Returns the cached attribute map without fetching.
    pub fn cached(&self) -> Option<&Entity> {
        self.entity.as_ref()
    }

    /// Returns an attribute, loading the resource if needed. Pending changes
    /// take precedence.
    pub async fn get(&mut self, key: &str) -> Result<Option<Value>, Error> {
        if let Some(value) = self.pending.get(key) {
            return Ok(Some(value.clone()));
        }
        Ok(self.entity().await?.get(key).cloned())
    }

    /// Returns a string attribute, loading the resource if needed.
    pub async fn get_str(&mut self, key: &str) -> Result<Option<String>, Error> {
        Ok(self
            .get(key)
            .await?
            .and_then(|value| value.as_str().map(str::to_string)))
    }

    /// Returns an attribute as an id (number or string), loading the resource
    /// if needed.
    pub async fn get_id(&mut self, key: &str) -> Result<Option<EntityId>, Error> {
        Ok(self
            .get(key)
            .await?
            .and_then(|value| EntityId::from_value(&value)))
    }

    /// Returns an attribute without fetching: pending changes first, then the
    /// cached state.
    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.pending
            .get(key)
            .or_else(|| self.entity.as_ref().and_then(|e| e.get(key)))
    }

    /// Returns a string attribute without fetching.
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attr(key).and_then(Value::as_str)
    }

    /// Looks up a JSON pointer (e.g. `/signup/account/id`) in the cached state.
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.entity.as_ref().and_then(|e| lookup(e, pointer))
    }

    pub(crate) fn cached_attr(&self, attribute: &str) -> Option<&Value> {
        self.entity.as_ref().and_then(|e| lookup(e, attribute))
    }

    /// Returns the value of the kind's naming attribute in the cached state.
    pub fn entity_name(&self) -> Option<&str> {
        self.cached_attr(self.kind().name_attribute())
            .and_then(Value::as_str)
    }

    /// Records a pending attribute change.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.pending.insert(key.into(), value.into());
    }

    /// Returns the pending changes.
    pub fn pending(&self) -> &Entity {
        &self.pending
    }

    /// Drops the cached state. The next access fetches again.
    pub fn invalidate(&mut self) {
        self.entity = None;
    }

    /// Drops the cached state and pending changes, then fetches.
    pub async fn read(&mut self) -> Result<&Entity, Error> {
        self.invalidate();
        self.pending.clear();
        self.entity().await
    }

    /// Fetches the current attribute map without touching the cache.
    pub async fn fetch(&self) -> Result<Entity, Error> {
        self.collection.fetch_at(self.entity_id.as_ref()).await
    }

    /// Sends the last known state merged with the pending changes (PUT) and
    /// replaces the cache with the server's answer.
    pub async fn update(&mut self) -> Result<&Entity, Error> {
        let mut params = self.entity().await?.clone();
        params.extend(std::mem::take(&mut self.pending));
        let updated = self
            .collection
            .update_at(self.entity_id.as_ref(), Value::Object(params))
            .await?;
        self.entity = updated.entity;
        if self.entity_id.is_none() {
            self.entity_id = updated.entity_id;
        }
        let entity: &Entity = self.entity.get_or_insert_with(Entity::new);
        Ok(entity)
    }

    /// Records every key of `params` as a pending change, then
    /// [`update`](Self::update)s.
    pub async fn update_with(&mut self, params: Entity) -> Result<&Entity, Error> {
        self.pending.extend(params);
        self.update().await
    }

    /// Deletes the resource. Returns whether the call itself succeeded.
    pub async fn delete(&self) -> Result<bool, Error> {
        self.collection.delete_at(self.entity_id.as_ref()).await
    }

    /// Returns `true` if the resource answers 2xx.
    pub async fn exists(&self) -> Result<bool, Error> {
        self.collection.exists_at(self.entity_id.as_ref()).await
    }

    /// Returns a collection nested below this resource.
    pub fn child(&self, kind: &'static ResourceKind) -> ResourceClient {
        ResourceClient::nested(self, kind)
    }

    /// Returns an unloaded handle on the parent resource.
    pub fn parent(&self) -> Option<Resource> {
        self.collection.parent()
    }

    /// Consumes the resource, returning the cached state.
    pub fn into_entity(self) -> Option<Entity> {
        self.entity
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("kind", &self.kind().key())
            .field("entity_id", &self.entity_id)
            .field("entity", &self.entity)
            .field("pending", &self.pending)
            .finish()
    }
}
