//! Resource kind descriptors.

use std::borrow::Cow;
use std::fmt;

/// Where the URL of a collection starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Below the URL of the parent resource.
    Parent,
    /// Below the tenant admin API root (`<url>/admin/api`).
    AdminApi,
    /// Below the master API root (`<url>/master/api`).
    MasterApi,
    /// Below the tenant URL itself (`<url>`).
    TenantRoot,
}

/// Describes one kind of remote resource.
///
/// A single generic [`ResourceClient`](crate::ResourceClient) and
/// [`Resource`](crate::Resource) serve every kind; the descriptor carries
/// everything that differs between them: envelope keys, URL segment, how the
/// entity is named, where its id lives, which state transitions it accepts and
/// whether its collection is paginated.
///
/// The platform's kinds are in [`kinds`](crate::kinds). Custom kinds can be
/// declared as statics:
///
/// ```rust
/// use threescale::{Anchor, ResourceKind};
///
/// static CMS_PAGE: ResourceKind = ResourceKind::new("cms_page", "page", "cms/pages")
///     .anchored(Anchor::AdminApi)
///     .named_by("title")
///     .paginated(100);
///
/// assert_eq!(CMS_PAGE.collection_name(), "pages");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ResourceKind {
    key: &'static str,
    entity_name: &'static str,
    collection_name: Option<&'static str>,
    url_segment: &'static str,
    name_attribute: &'static str,
    anchor: Anchor,
    singleton: bool,
    id_pointer: &'static str,
    page_size: Option<u32>,
    states: &'static [&'static str],
    plan: bool,
    create_path: Option<&'static str>,
}

impl ResourceKind {
    /// Creates a parent-anchored kind named by `name`, with id at `/id`.
    pub const fn new(
        key: &'static str,
        entity_name: &'static str,
        url_segment: &'static str,
    ) -> Self {
        Self {
            key,
            entity_name,
            collection_name: None,
            url_segment,
            name_attribute: "name",
            anchor: Anchor::Parent,
            singleton: false,
            id_pointer: "/id",
            page_size: None,
            states: &[],
            plan: false,
            create_path: None,
        }
    }

    /// Sets the collection envelope key (defaults to the entity name plus `s`).
    pub const fn collection(mut self, collection_name: &'static str) -> Self {
        self.collection_name = Some(collection_name);
        self
    }

    /// Sets the attribute used by name lookups. A leading `/` makes it a JSON
    /// pointer into the entity.
    pub const fn named_by(mut self, attribute: &'static str) -> Self {
        self.name_attribute = attribute;
        self
    }

    /// Sets the URL anchor.
    pub const fn anchored(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Marks the kind as a singleton: its URL never carries an id.
    pub const fn singleton(mut self) -> Self {
        self.singleton = true;
        self
    }

    /// Sets the JSON pointer of the id inside the entity.
    pub const fn id_at(mut self, pointer: &'static str) -> Self {
        self.id_pointer = pointer;
        self
    }

    /// Enables page-by-page listing with the given page size.
    pub const fn paginated(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Records the transitions the platform documents for this kind.
    pub const fn with_states(mut self, states: &'static [&'static str]) -> Self {
        self.states = states;
        self
    }

    /// Marks the kind as a plan (supports the default flag).
    pub const fn plan(mut self) -> Self {
        self.plan = true;
        self
    }

    /// Creates instances by POSTing to `<admin api>/<path>` instead of the
    /// collection URL.
    pub const fn created_at(mut self, path: &'static str) -> Self {
        self.create_path = Some(path);
        self
    }

    /// Returns the registry key.
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Returns the entity envelope key.
    pub fn entity_name(&self) -> &'static str {
        self.entity_name
    }

    /// Returns the collection envelope key.
    pub fn collection_name(&self) -> Cow<'static, str> {
        match self.collection_name {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(format!("{}s", self.entity_name)),
        }
    }

    /// Returns the URL segment appended to the anchor.
    pub fn url_segment(&self) -> &'static str {
        self.url_segment
    }

    /// Returns the naming attribute.
    pub fn name_attribute(&self) -> &'static str {
        self.name_attribute
    }

    /// Returns the URL anchor.
    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Returns `true` for singleton kinds.
    pub fn is_singleton(&self) -> bool {
        self.singleton
    }

    /// Returns the JSON pointer of the id.
    pub fn id_pointer(&self) -> &'static str {
        self.id_pointer
    }

    /// Returns the page size of paginated kinds.
    pub fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    /// Transitions the platform documents for this kind. Informational:
    /// [`ResourceClient::set_state`](super::ResourceClient::set_state) sends
    /// any state and leaves the verdict to the server.
    pub fn states(&self) -> &'static [&'static str] {
        self.states
    }

    /// Returns `true` if `state` is one of the documented transitions.
    pub fn supports_state(&self, state: &str) -> bool {
        self.states.contains(&state)
    }

    /// Returns `true` for plan kinds.
    pub fn is_plan(&self) -> bool {
        self.plan
    }

    /// Returns the creation path, if creation bypasses the collection URL.
    pub fn create_path(&self) -> Option<&'static str> {
        self.create_path
    }
}

impl fmt::Debug for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceKind")
            .field("key", &self.key)
            .field("url_segment", &self.url_segment)
            .field("anchor", &self.anchor)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    static WIDGET: ResourceKind = ResourceKind::new("widget", "widget", "widgets");

    #[test]
    fn test_defaults() {
        assert_eq!(WIDGET.collection_name(), "widgets");
        assert_eq!(WIDGET.name_attribute(), "name");
        assert_eq!(WIDGET.anchor(), Anchor::Parent);
        assert_eq!(WIDGET.id_pointer(), "/id");
        assert!(!WIDGET.is_singleton());
        assert!(WIDGET.page_size().is_none());
        assert!(!WIDGET.supports_state("approve"));
    }

    #[test]
    fn test_builders() {
        let kind = ResourceKind::new("gizmo", "gizmo", "gizmos")
            .collection("items")
            .anchored(Anchor::MasterApi)
            .with_states(&["approve"])
            .plan()
            .paginated(50);
        assert_eq!(kind.collection_name(), "items");
        assert_eq!(kind.anchor(), Anchor::MasterApi);
        assert!(kind.supports_state("approve"));
        assert!(kind.is_plan());
        assert_eq!(kind.page_size(), Some(50));
        assert_eq!(kind.to_string(), "gizmo");
    }
}
