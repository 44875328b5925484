//! JSON envelope extraction.
//!
//! The admin API wraps entities as `{"<entity>": {...}}` and collections as
//! `{"<collection>": [{"<entity>": {...}}, ...]}`, but not consistently: some
//! endpoints return bare objects or arrays, and some collections skip the
//! per-element wrapper. [`extract`] handles every combination.

use serde_json::{Map, Value};

use crate::Error;

/// The attribute map of a remote entity.
pub type Entity = Map<String, Value>;

/// Extracts an entity or a collection from a response body.
///
/// 1. If `collection` is given and present as a key, its value is taken.
/// 2. If the result is an array, every element that is an object holding the
///    `entity` key is replaced by the inner value; other elements are kept.
/// 3. Otherwise, if the result is an object holding the `entity` key, the
///    inner value is returned; if not, the value is returned untouched.
///
/// ```rust
/// use serde_json::json;
/// use threescale::resource::envelope::extract;
///
/// let body = json!({"services": [{"service": {"id": 1}}, {"service": {"id": 2}}]});
/// assert_eq!(
///     extract(body, Some("service"), Some("services")),
///     json!([{"id": 1}, {"id": 2}])
/// );
///
/// let body = json!({"proxy": {"endpoint": "https://api.example.com"}});
/// assert_eq!(
///     extract(body, Some("proxy"), None),
///     json!({"endpoint": "https://api.example.com"})
/// );
/// ```
pub fn extract(value: Value, entity: Option<&str>, collection: Option<&str>) -> Value {
    let value = match (collection, value) {
        (Some(key), Value::Object(mut map)) if map.contains_key(key) => {
            map.remove(key).unwrap_or(Value::Null)
        },
        (_, value) => value,
    };

    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| unwrap_entity(item, entity))
                .collect(),
        ),
        other => unwrap_entity(other, entity),
    }
}

fn unwrap_entity(value: Value, entity: Option<&str>) -> Value {
    match (entity, value) {
        (Some(key), Value::Object(mut map)) if map.contains_key(key) => {
            map.remove(key).unwrap_or(Value::Null)
        },
        (_, value) => value,
    }
}

/// Looks up an attribute. A leading `/` makes `attribute` a JSON pointer.
pub fn lookup<'a>(entity: &'a Entity, attribute: &str) -> Option<&'a Value> {
    let Some(path) = attribute.strip_prefix('/') else {
        return entity.get(attribute);
    };
    match path.split_once('/') {
        None => entity.get(path),
        Some((head, rest)) => entity.get(head)?.pointer(&format!("/{}", rest)),
    }
}

pub(crate) fn into_entity(value: Value) -> Result<Entity, Error> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::invalid_response(format!(
            "expected a JSON object, got {}",
            describe(&other)
        ))),
    }
}

/// A single object is treated as a one-element collection.
pub(crate) fn into_entities(value: Value) -> Result<Vec<Entity>, Error> {
    match value {
        Value::Array(items) => items.into_iter().map(into_entity).collect(),
        Value::Object(map) => Ok(vec![map]),
        other => Err(Error::invalid_response(format!(
            "expected a JSON array, got {}",
            describe(&other)
        ))),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
