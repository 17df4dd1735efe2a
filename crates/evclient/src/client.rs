// EnergyView HTTP client
//
// Owns the `reqwest::Client` and the `{endpoint}/{domain}/api/v1` base URL.
// Resource operations (nodes, tags, timeseries, ...) are inherent methods
// implemented in `crate::resources`, keeping this module to transport
// mechanics: URL building, one request per call, and handing the response
// to `response::classify`.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder};
use serde_json::Value;
use tracing::debug;
use url::Url;

use evclient_config::{ClientArgs, ClientConfig};

use crate::error::Error;
use crate::params::Params;
use crate::response::{self, ApiResponse};
use crate::transport::TransportConfig;

/// Async client for the EnergyView API.
///
/// One value covers every resource; construct it once and reuse it. It
/// keeps no state between calls beyond the HTTP connection pool and the
/// credentials baked into its default headers.
#[derive(Debug, Clone)]
pub struct EvClient {
    http: reqwest::Client,
    base_url: Url,
    domain: String,
}

impl EvClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Resolve `args` (falling back to `EV_DOMAIN` / `EV_API_KEY` /
    /// `EV_ENDPOINT_URL`) and build a client with default transport settings.
    ///
    /// Fails with [`Error::Configuration`] before any network activity if
    /// the domain or API key can't be resolved.
    pub fn new(args: &ClientArgs) -> Result<Self, Error> {
        let config = ClientConfig::resolve(args)?;
        Self::from_config(&config, &TransportConfig::default())
    }

    /// Build purely from the environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::new(&ClientArgs::default())
    }

    pub fn from_config(config: &ClientConfig, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client(config.api_key())?;
        Ok(Self::with_client(http, config))
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn with_client(http: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            http,
            base_url: config.api_base_url().clone(),
            domain: config.domain().to_owned(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// `{endpoint}/{domain}/api/v1`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a resource path (e.g. `"dataset/{uuid}/raw"`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Start a request against `path` for endpoints this crate does not wrap.
    /// Send it with [`execute`](Self::execute).
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, Error> {
        Ok(self.http.request(method, self.url(path)?))
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get(&self, path: &str, params: Params) -> Result<ApiResponse, Error> {
        let mut builder = self.request(Method::GET, path)?;
        if !params.is_empty() {
            builder = builder.query(&params.into_pairs());
        }
        self.execute(builder).await
    }

    pub(crate) async fn post_form(&self, path: &str, params: Params) -> Result<ApiResponse, Error> {
        let builder = self.request(Method::POST, path)?.form(&params.into_pairs());
        self.execute(builder).await
    }

    pub(crate) async fn put_form(&self, path: &str, params: Params) -> Result<ApiResponse, Error> {
        let builder = self.request(Method::PUT, path)?.form(&params.into_pairs());
        self.execute(builder).await
    }

    pub(crate) async fn post_json(&self, path: &str, body: &Value) -> Result<ApiResponse, Error> {
        let builder = self.request(Method::POST, path)?.json(body);
        self.execute(builder).await
    }

    pub(crate) async fn put_json(&self, path: &str, body: &Value) -> Result<ApiResponse, Error> {
        let builder = self.request(Method::PUT, path)?.json(body);
        self.execute(builder).await
    }

    pub(crate) async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<ApiResponse, Error> {
        let builder = self.request(Method::POST, path)?.multipart(form);
        self.execute(builder).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<ApiResponse, Error> {
        let builder = self.request(Method::DELETE, path)?;
        self.execute(builder).await
    }

    // ── Execution ────────────────────────────────────────────────────

    /// Send one request and classify the response.
    ///
    /// Server errors (5xx) are reported without reading the body.
    pub async fn execute(&self, builder: RequestBuilder) -> Result<ApiResponse, Error> {
        let request = builder.build()?;
        let method = request.method().clone();
        let url = request.url().clone();
        let body = request
            .body()
            .and_then(reqwest::Body::as_bytes)
            .map(|b| String::from_utf8_lossy(b).into_owned());

        let resp = self.http.execute(request).await?;
        let status = resp.status();
        debug!(
            %method,
            %url,
            body = body.as_deref().unwrap_or_default(),
            status = status.as_u16(),
            "API request sent"
        );

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let payload = if status.is_server_error() {
            bytes::Bytes::new()
        } else {
            resp.bytes().await?
        };

        response::classify(status, content_type.as_deref(), payload)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> EvClient {
        let config = ClientConfig::new("test", "123456789", "http://localhost:3000/").unwrap();
        EvClient::with_client(reqwest::Client::new(), &config)
    }

    #[test]
    fn base_url_includes_domain_and_version() {
        assert_eq!(
            client().base_url().as_str(),
            "http://localhost:3000/test/api/v1"
        );
    }

    #[test]
    fn url_joins_resource_paths() {
        let c = client();
        assert_eq!(
            c.url("nodes").unwrap().as_str(),
            "http://localhost:3000/test/api/v1/nodes"
        );
        assert_eq!(
            c.url("/settings/node/1").unwrap().as_str(),
            "http://localhost:3000/test/api/v1/settings/node/1"
        );
    }

    #[test]
    fn request_targets_joined_url() {
        let req = client()
            .request(Method::DELETE, "dataset/abc")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(req.method(), Method::DELETE);
        assert_eq!(
            req.url().as_str(),
            "http://localhost:3000/test/api/v1/dataset/abc"
        );
    }
}
