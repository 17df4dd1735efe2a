//! Connection configuration for the EnergyView API client.
//!
//! Resolves the tenant domain, API key and endpoint once, before any request
//! is made. Each value is taken from the first layer that provides it:
//! explicit arguments, then `EV_*` environment variables, then the built-in
//! default (endpoint only). The resulting [`ClientConfig`] is immutable.

use std::fmt;

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Endpoint used when neither an argument nor `EV_ENDPOINT_URL` is given.
pub const DEFAULT_ENDPOINT_URL: &str = "https://customer.noda.se";

/// Prefix of the environment variables consulted during resolution.
pub const ENV_PREFIX: &str = "EV_";

pub const API_ROOT: &str = "api";
pub const API_VERSION: &str = "v1";

const ENV_DOMAIN: &str = "DOMAIN";
const ENV_API_KEY: &str = "API_KEY";
const ENV_ENDPOINT_URL: &str = "ENDPOINT_URL";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no domain provided (pass one explicitly or set EV_DOMAIN)")]
    MissingDomain,

    #[error("no API key provided (pass one explicitly or set EV_API_KEY)")]
    MissingApiKey,

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Explicit arguments ──────────────────────────────────────────────

/// Values passed directly by the caller. Any field left as `None` (or set
/// to a blank string) falls through to the environment.
#[derive(Clone, Default, Serialize)]
pub struct ClientArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
}

impl ClientArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// The `EV_*` variables as raw strings: `EV_API_KEY=007` stays `007`.
    fn from_env_vars() -> Self {
        let var = |name: &str| Env::var(&format!("{ENV_PREFIX}{name}"));
        Self {
            domain: var(ENV_DOMAIN),
            api_key: var(ENV_API_KEY),
            endpoint_url: var(ENV_ENDPOINT_URL),
        }
    }

    /// Copy with blank values dropped so they don't shadow the environment.
    fn non_blank(&self) -> Self {
        let keep = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());
        Self {
            domain: keep(&self.domain),
            api_key: keep(&self.api_key),
            endpoint_url: keep(&self.endpoint_url),
        }
    }
}

impl fmt::Debug for ClientArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientArgs")
            .field("domain", &self.domain)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("endpoint_url", &self.endpoint_url)
            .finish()
    }
}

#[derive(Serialize)]
struct Defaults {
    endpoint_url: &'static str,
}

// ── Raw layered values ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    endpoint_url: Option<String>,
}

// ── Resolved config ─────────────────────────────────────────────────

/// Fully resolved connection settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    domain: String,
    api_key: SecretString,
    endpoint_url: Url,
    api_base_url: Url,
}

impl ClientConfig {
    /// Build from explicit values only. The environment is not consulted.
    pub fn new(
        domain: &str,
        api_key: impl Into<String>,
        endpoint_url: &str,
    ) -> Result<Self, ConfigError> {
        Self::validate(RawConfig {
            domain: Some(domain.to_owned()),
            api_key: Some(api_key.into()),
            endpoint_url: Some(endpoint_url.to_owned()),
        })
    }

    /// Resolve `args`, falling back to `EV_DOMAIN`, `EV_API_KEY` and
    /// `EV_ENDPOINT_URL`.
    pub fn resolve(args: &ClientArgs) -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment(args))
    }

    /// Resolve from the environment alone.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(&ClientArgs::default())
    }

    /// The layered provider used by [`resolve`](Self::resolve).
    pub fn figment(args: &ClientArgs) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Defaults {
                endpoint_url: DEFAULT_ENDPOINT_URL,
            }))
            .merge(Serialized::defaults(ClientArgs::from_env_vars().non_blank()))
            .merge(Serialized::defaults(args.non_blank()))
    }

    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let raw: RawConfig = figment.extract()?;
        Self::validate(raw)
    }

    fn validate(raw: RawConfig) -> Result<Self, ConfigError> {
        let domain = raw
            .domain
            .as_deref()
            .map(|d| d.trim().trim_matches('/'))
            .filter(|d| !d.is_empty())
            .ok_or(ConfigError::MissingDomain)?
            .to_owned();
        if domain.contains('/') {
            return Err(ConfigError::Validation {
                field: "domain".into(),
                reason: format!("'{domain}' must be a single path segment"),
            });
        }

        let api_key = raw
            .api_key
            .map(|k| k.trim().to_owned())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let endpoint_raw = raw
            .endpoint_url
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_ENDPOINT_URL);
        let endpoint_url = parse_endpoint(endpoint_raw)?;

        let base = endpoint_url.as_str().trim_end_matches('/');
        let api_base_url = Url::parse(&format!("{base}/{domain}/{API_ROOT}/{API_VERSION}"))
            .map_err(|e| ConfigError::Validation {
                field: "domain".into(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            domain,
            api_key: SecretString::from(api_key),
            endpoint_url,
            api_base_url,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    pub fn endpoint_url(&self) -> &Url {
        &self.endpoint_url
    }

    /// `{endpoint}/{domain}/api/v1`, without a trailing slash.
    pub fn api_base_url(&self) -> &Url {
        &self.api_base_url
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::Validation {
        field: "endpoint_url".into(),
        reason,
    };

    let url = Url::parse(raw.trim_end_matches('/')).map_err(|e| invalid(format!("'{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" if !url.cannot_be_a_base() => Ok(url),
        scheme => Err(invalid(format!("unsupported scheme '{scheme}' in '{raw}'"))),
    }
}
