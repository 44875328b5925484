//! Auth strategy factories and their registry.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use super::{AuthMode, ClientAuth, CredentialsLocation};
use crate::resource::{Entity, Resource};
use crate::Error;

/// The boxed future returned by [`AuthFactory::create`].
pub type AuthFuture<'a> = Pin<Box<dyn Future<Output = Result<ClientAuth, Error>> + Send + 'a>>;

/// Everything a factory may need to build credentials for one application.
#[derive(Debug, Clone)]
pub struct AuthContext {
    application: Resource,
    app_entity: Entity,
    proxy: Entity,
    location: CredentialsLocation,
}

impl AuthContext {
    pub(crate) fn new(
        application: Resource,
        app_entity: Entity,
        proxy: Entity,
        location: CredentialsLocation,
    ) -> Self {
        Self {
            application,
            app_entity,
            proxy,
            location,
        }
    }

    /// The application resource, for follow-up requests such as its keys.
    pub fn application(&self) -> &Resource {
        &self.application
    }

    /// The application attributes.
    pub fn app(&self) -> &Entity {
        &self.app_entity
    }

    /// The proxy configuration of the application's service.
    pub fn proxy(&self) -> &Entity {
        &self.proxy
    }

    /// Where the credentials go.
    pub fn location(&self) -> CredentialsLocation {
        self.location
    }

    /// A string attribute of the application.
    pub fn app_str(&self, key: &str) -> Result<String, Error> {
        string_attr(&self.app_entity, key, "application")
    }

    /// A string attribute of the proxy configuration.
    pub fn proxy_str(&self, key: &str) -> Result<String, Error> {
        string_attr(&self.proxy, key, "proxy")
    }
}

fn string_attr(entity: &Entity, key: &str, what: &str) -> Result<String, Error> {
    match entity.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(Error::invalid_response(format!(
            "{} has no '{}' attribute",
            what, key
        ))),
    }
}

/// Builds the credential strategy of one auth mode.
///
/// ## Example: a custom mode
///
/// ```rust
/// use threescale::auth::{AuthContext, AuthFactory, AuthFuture, ClientAuth};
///
/// #[derive(Debug)]
/// struct StaticToken(String);
///
/// impl AuthFactory for StaticToken {
///     fn create<'a>(&'a self, ctx: &'a AuthContext) -> AuthFuture<'a> {
///         Box::pin(async move {
///             Ok(ClientAuth::new(ctx.location(), [("token", self.0.clone())]))
///         })
///     }
/// }
/// ```
pub trait AuthFactory: Send + Sync + fmt::Debug {
    /// Resolves the credentials.
    fn create<'a>(&'a self, ctx: &'a AuthContext) -> AuthFuture<'a>;
}

/// `{proxy.auth_user_key: app.user_key}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserKeyFactory;

impl AuthFactory for UserKeyFactory {
    fn create<'a>(&'a self, ctx: &'a AuthContext) -> AuthFuture<'a> {
        Box::pin(async move {
            let name = ctx.proxy_str("auth_user_key")?;
            let value = ctx.app_str("user_key")?;
            Ok(ClientAuth::new(ctx.location(), [(name, value)]))
        })
    }
}

/// `{proxy.auth_app_id: app.application_id, proxy.auth_app_key: <first key>}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppIdKeyFactory;

impl AuthFactory for AppIdKeyFactory {
    fn create<'a>(&'a self, ctx: &'a AuthContext) -> AuthFuture<'a> {
        Box::pin(async move {
            let id_name = ctx.proxy_str("auth_app_id")?;
            let key_name = ctx.proxy_str("auth_app_key")?;
            let app_id = ctx.app_str("application_id")?;
            let keys = ctx.application().keys().list().await?;
            let key = keys
                .first()
                .and_then(|key| key.attr_str("value"))
                .ok_or_else(|| Error::invalid_response("application has no keys"))?
                .to_string();
            Ok(ClientAuth::new(
                ctx.location(),
                [(id_name, app_id), (key_name, key)],
            ))
        })
    }
}

/// Maps auth modes to factories.
///
/// Starts with [`UserKeyFactory`] and [`AppIdKeyFactory`]; more modes can be
/// registered at runtime. Clones share the factories, not the map.
#[derive(Debug, Clone)]
pub struct AuthRegistry {
    factories: HashMap<String, Arc<dyn AuthFactory>>,
}

impl Default for AuthRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(AuthMode::UserKey, Arc::new(UserKeyFactory));
        registry.register(AuthMode::AppIdKey, Arc::new(AppIdKeyFactory));
        registry
    }
}

impl AuthRegistry {
    /// A registry with the built-in factories.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry without any factory.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registers (or replaces) the factory of a mode.
    pub fn register(&mut self, mode: AuthMode, factory: Arc<dyn AuthFactory>) {
        self.factories.insert(mode.key().to_string(), factory);
    }

    /// Returns the factory of a mode.
    pub fn get(&self, mode: &AuthMode) -> Option<Arc<dyn AuthFactory>> {
        self.factories.get(mode.key()).cloned()
    }

    /// Returns the factory of a mode or the unknown-configuration error.
    pub fn resolve(&self, mode: &AuthMode) -> Result<Arc<dyn AuthFactory>, Error> {
        self.get(mode).ok_or_else(|| {
            Error::configuration(format!("Unknown credentials for configuration {}", mode))
        })
    }

    /// Returns `true` if a factory is registered for the mode.
    pub fn contains(&self, mode: &AuthMode) -> bool {
        self.factories.contains_key(mode.key())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_default_registry() {
        let registry = AuthRegistry::new();
        assert!(registry.contains(&AuthMode::UserKey));
        assert!(registry.contains(&AuthMode::AppIdKey));
        assert!(!registry.contains(&AuthMode::Oidc));
    }

    #[test]
    fn test_unknown_mode() {
        let err = AuthRegistry::new().resolve(&AuthMode::Oidc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.message().contains("Unknown credentials for configuration oidc"));
    }

    #[test]
    fn test_register_custom() {
        let mut registry = AuthRegistry::empty();
        registry.register(AuthMode::Custom("jwt".into()), Arc::new(UserKeyFactory));
        assert!(registry.contains(&AuthMode::from_backend_version("jwt")));
        assert!(!registry.contains(&AuthMode::UserKey));
    }
}
