use thiserror::Error;

pub use evclient_config::ConfigError;

/// Top-level error type for the `evclient` crate.
///
/// One variant per HTTP status the EnergyView API documents, plus the
/// transport and decoding failures that can occur around them. Nothing in
/// this crate retries; every error is handed straight back to the caller.
#[derive(Debug, Error)]
pub enum Error {
    // ── Configuration ───────────────────────────────────────────────
    /// Domain or API key could not be resolved at construction time.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    // ── Mapped 4xx ──────────────────────────────────────────────────
    /// 400: insufficient data or invalid options.
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// 401: missing or rejected credentials.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// 402: parameters were valid but the request failed.
    #[error("Request failed: {message}")]
    RequestFailed { message: String },

    /// 403: authenticated but not allowed.
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// 404: the requested resource does not exist.
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// 409: conflicts with the current state of the resource.
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// 429: rate limited. Callers decide whether and when to retry.
    #[error("Too many requests: {message}")]
    TooManyRequests { message: String },

    /// Any other 4xx.
    #[error("Unexpected status code {status}: {message}")]
    UnexpectedStatusCode { status: u16, message: String },

    // ── 5xx ─────────────────────────────────────────────────────────
    #[error("Internal server error (HTTP {status}): {message}")]
    InternalServerError { status: u16, message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A default header (the API key) contained bytes HTTP can't carry.
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    // ── Data ────────────────────────────────────────────────────────
    /// Response body could not be decoded, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A request parameter could not be JSON-encoded.
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl Error {
    /// Map an error status to its error kind.
    ///
    /// Exact codes are matched first, then the 4xx range, then 5xx and up
    /// as a server error. `message` is only used below 500; server errors
    /// always carry the default text. A status below 400 is not an error
    /// response and maps to [`UnexpectedStatusCode`](Self::UnexpectedStatusCode).
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        let msg = |default: &str| message.unwrap_or_else(|| default.to_owned());
        match status {
            400 => Self::BadRequest { message: msg("Bad Request") },
            401 => Self::Unauthorized { message: msg("Unauthorized") },
            402 => Self::RequestFailed { message: msg("Request Failed") },
            403 => Self::Forbidden { message: msg("Forbidden") },
            404 => Self::NotFound { message: msg("Not Found") },
            409 => Self::Conflict { message: msg("Conflict") },
            429 => Self::TooManyRequests { message: msg("Too Many Requests") },
            0..=499 => Self::UnexpectedStatusCode {
                status,
                message: msg("Unexpected Status Code"),
            },
            _ => Self::InternalServerError {
                status,
                message: "Internal Server Error".to_owned(),
            },
        }
    }

    /// The HTTP status behind this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest { .. } => Some(400),
            Self::Unauthorized { .. } => Some(401),
            Self::RequestFailed { .. } => Some(402),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::Conflict { .. } => Some(409),
            Self::TooManyRequests { .. } => Some(429),
            Self::UnexpectedStatusCode { status, .. }
            | Self::InternalServerError { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The server-provided (or default) message of a status error.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::BadRequest { message }
            | Self::Unauthorized { message }
            | Self::RequestFailed { message }
            | Self::Forbidden { message }
            | Self::NotFound { message }
            | Self::Conflict { message }
            | Self::TooManyRequests { message }
            | Self::UnexpectedStatusCode { message, .. }
            | Self::InternalServerError { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if a later identical request might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::TooManyRequests { .. } | Self::InternalServerError { .. } => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_codes_map_to_their_kind() {
        assert!(matches!(Error::from_status(400, None), Error::BadRequest { .. }));
        assert!(matches!(Error::from_status(401, None), Error::Unauthorized { .. }));
        assert!(matches!(Error::from_status(402, None), Error::RequestFailed { .. }));
        assert!(matches!(Error::from_status(403, None), Error::Forbidden { .. }));
        assert!(matches!(Error::from_status(404, None), Error::NotFound { .. }));
        assert!(matches!(Error::from_status(409, None), Error::Conflict { .. }));
        assert!(matches!(Error::from_status(429, None), Error::TooManyRequests { .. }));
    }

    #[test]
    fn unlisted_4xx_is_unexpected() {
        for code in [405, 410, 418, 422, 451, 499] {
            let err = Error::from_status(code, None);
            assert!(
                matches!(err, Error::UnexpectedStatusCode { status, .. } if status == code),
                "{code} -> {err:?}"
            );
        }
    }

    #[test]
    fn server_errors_ignore_message() {
        let err = Error::from_status(503, Some("upstream down".into()));
        assert!(matches!(err, Error::InternalServerError { status: 503, .. }));
        assert_eq!(err.message(), Some("Internal Server Error"));
        assert!(err.is_transient());
    }

    #[test]
    fn default_messages() {
        assert_eq!(Error::from_status(404, None).message(), Some("Not Found"));
        assert_eq!(
            Error::from_status(429, None).message(),
            Some("Too Many Requests")
        );
        assert_eq!(
            Error::from_status(404, Some("no such node".into())).message(),
            Some("no such node")
        );
    }

    #[test]
    fn success_codes_are_never_server_errors() {
        for code in [100, 200, 204, 304, 399] {
            let err = Error::from_status(code, None);
            assert!(
                matches!(err, Error::UnexpectedStatusCode { status, .. } if status == code),
                "{code} -> {err:?}"
            );
            assert!(!err.is_transient());
        }
    }

    #[test]
    fn status_round_trips() {
        for code in [400, 401, 402, 403, 404, 409, 429, 418, 500, 502] {
            assert_eq!(Error::from_status(code, None).status(), Some(code));
        }
    }
}
