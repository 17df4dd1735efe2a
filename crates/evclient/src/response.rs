// Response classification
//
// Every call funnels through `classify`: status first, then content type.
// It works on plain data (status, content type, body) so the dispatch table
// can be exercised without a server.

use bytes::Bytes;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::trace;

use crate::error::Error;

/// Decoded body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// JSON or YAML body, decoded.
    Parsed(Value),
    /// Any other content type, untouched.
    Raw(Bytes),
    /// The server sent no body.
    Empty,
}

impl ApiResponse {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Parsed(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Parsed(v) => Some(v),
            _ => None,
        }
    }

    /// Raw bytes for [`Raw`](Self::Raw), empty for [`Empty`](Self::Empty).
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Raw(b) => Some(b),
            Self::Empty => Some(&[]),
            Self::Parsed(_) => None,
        }
    }

    /// Decode a parsed body into `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, Error> {
        match self {
            Self::Parsed(value) => from_value(value),
            Self::Empty => Err(Error::Deserialization {
                message: "expected a structured body, got an empty response".into(),
                body: String::new(),
            }),
            Self::Raw(bytes) => Err(Error::Deserialization {
                message: "expected a structured body, got raw content".into(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            }),
        }
    }

    /// Decode the list held under `key` in a `{ "<key>": [...] }` wrapper.
    ///
    /// An empty body or a missing key yields an empty list.
    pub fn unwrap_list<T: DeserializeOwned>(self, key: &str) -> Result<Vec<T>, Error> {
        match self {
            Self::Empty => Ok(Vec::new()),
            Self::Parsed(Value::Object(mut map)) => match map.remove(key) {
                None | Some(Value::Null) => Ok(Vec::new()),
                Some(inner) => from_value(inner),
            },
            Self::Parsed(other) => Err(Error::Deserialization {
                message: format!("expected an object with a '{key}' member"),
                body: other.to_string(),
            }),
            Self::Raw(bytes) => Err(Error::Deserialization {
                message: format!("expected an object with a '{key}' member, got raw content"),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            }),
        }
    }
}

fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    T::deserialize(&value).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: value.to_string(),
    })
}

// ── Status dispatch ──────────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<Value>,
}

/// Pull the `error` string out of a JSON error body.
fn error_message(body: &[u8]) -> Option<String> {
    match serde_json::from_slice::<ErrorBody>(body).ok()?.error? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Null | Value::String(_) => None,
        other => Some(other.to_string()),
    }
}

/// Map a response to its result.
///
/// - `< 400`: decoded per [`ApiResponse`]
/// - `400..=499`: the fixed 4xx table, message from the body's `error` field
/// - `>= 500`: [`Error::InternalServerError`], body ignored
pub fn classify(
    status: StatusCode,
    content_type: Option<&str>,
    body: Bytes,
) -> Result<ApiResponse, Error> {
    let code = status.as_u16();
    if code >= 500 {
        return Err(Error::from_status(code, None));
    }
    if code >= 400 {
        return Err(Error::from_status(code, error_message(&body)));
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        trace!(code, "empty response body");
        return Ok(ApiResponse::Empty);
    }

    match content_type.map(BodyKind::from_content_type) {
        Some(BodyKind::Json) => serde_json::from_slice(&body)
            .map(ApiResponse::Parsed)
            .map_err(|e| decode_error("JSON", &e, &body)),
        Some(BodyKind::Yaml) => serde_yaml::from_slice(&body)
            .map(ApiResponse::Parsed)
            .map_err(|e| decode_error("YAML", &e, &body)),
        Some(BodyKind::Other) | None => {
            trace!(code, ?content_type, len = body.len(), "passing body through raw");
            Ok(ApiResponse::Raw(body))
        }
    }
}

fn decode_error(kind: &str, err: &dyn std::fmt::Display, body: &[u8]) -> Error {
    let body = String::from_utf8_lossy(body).into_owned();
    let preview: String = body.chars().take(200).collect();
    Error::Deserialization {
        message: format!("invalid {kind}: {err} (body preview: {preview:?})"),
        body,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Yaml,
    Other,
}

impl BodyKind {
    fn from_content_type(content_type: &str) -> Self {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "application/json" => Self::Json,
            "application/yaml" | "application/x-yaml" | "text/yaml" | "text/x-yaml" => Self::Yaml,
            s if s.ends_with("+json") => Self::Json,
            s if s.ends_with("+yaml") => Self::Yaml,
            _ => Self::Other,
        }
    }
}
