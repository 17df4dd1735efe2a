// Request parameter marshaling
//
// Optional arguments are carried as `Option` until the last moment and
// dropped here, so the wire never sees a placeholder for "not given".
// Values that are set but falsy (`0`, `false`, `""`) always go out.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Error;

/// Keep the entries whose value is set, in their original order.
pub fn filter_unset<K, V>(entries: impl IntoIterator<Item = (K, Option<V>)>) -> Vec<(K, V)> {
    entries
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect()
}

/// Drop `null` members from a JSON object body.
pub fn strip_nulls(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter().filter(|(_, v)| !v.is_null()).collect()
}

/// Serialize a request payload, dropping top-level `null` members.
pub fn json_body<T: Serialize>(payload: &T) -> Result<Value, Error> {
    Ok(match serde_json::to_value(payload)? {
        Value::Object(map) => Value::Object(strip_nulls(map)),
        other => other,
    })
}

/// Ordered query-string / form-body builder.
///
/// Every setter records an entry, set or not; [`into_pairs`](Self::into_pairs)
/// applies [`filter_unset`] once at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(&'static str, Option<String>)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &'static str, value: impl ToString) -> Self {
        self.entries.push((key, Some(value.to_string())));
        self
    }

    pub fn set_opt<T: ToString>(mut self, key: &'static str, value: Option<T>) -> Self {
        self.entries.push((key, value.map(|v| v.to_string())));
        self
    }

    /// Send `token` when `enabled`, omit the key entirely otherwise.
    pub fn flag(mut self, key: &'static str, enabled: bool, token: &str) -> Self {
        self.entries.push((key, enabled.then(|| token.to_owned())));
        self
    }

    /// Always send, as `1` or `0`.
    pub fn toggle(self, key: &'static str, enabled: bool) -> Self {
        self.set(key, u8::from(enabled))
    }

    /// JSON-encode a list; an empty list is treated as unset.
    pub fn json_list<T: Serialize>(mut self, key: &'static str, items: &[T]) -> Result<Self, Error> {
        let value = if items.is_empty() {
            None
        } else {
            Some(serde_json::to_string(items)?)
        };
        self.entries.push((key, value));
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, v)| v.is_none())
    }

    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        filter_unset(self.entries)
    }
}
