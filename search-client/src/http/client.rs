//! reqwest-backed transport implementation.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::config::ClientConfig;
use crate::errors::{IndexError, Result};
use crate::interfaces::{Method, RequestKind, Transport, TransportRequest};

/// Header carrying the application identifier.
pub const APPLICATION_ID_HEADER: &str = "x-algolia-application-id";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-algolia-api-key";

/// Transport that signs requests with the configured credentials and sends
/// them over HTTPS.
///
/// There is no retry, pooling across hosts or DNS failover: each request goes
/// to exactly one base URL, chosen by its [`RequestKind`].
///
/// # Example
///
/// ```ignore
/// let transport = HttpTransport::new(ClientConfig::from_env()?)?;
/// let index = Index::new(Arc::new(transport), "products")?;
/// ```
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    /// Create a transport from the given config.
    ///
    /// # Returns
    ///
    /// * `Ok(HttpTransport)` - A new transport instance
    /// * `Err(IndexError::InvalidArgument)` - If a base URL or credential is unusable
    /// * `Err(IndexError::Transport)` - If the HTTP client cannot be built
    pub fn new(config: ClientConfig) -> Result<Self> {
        for url in [&config.write_url, &config.read_url] {
            Url::parse(url).map_err(|e| {
                IndexError::invalid_argument(format!("Invalid base URL {}: {}", url, e))
            })?;
        }

        let mut headers = HeaderMap::new();
        let application_id = HeaderValue::from_str(&config.application_id)
            .map_err(|e| IndexError::invalid_argument(format!("Invalid application id: {}", e)))?;
        let mut api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| IndexError::invalid_argument(format!("Invalid API key: {}", e)))?;
        api_key.set_sensitive(true);
        headers.insert(APPLICATION_ID_HEADER, application_id);
        headers.insert(API_KEY_HEADER, api_key);

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| IndexError::connection(e.to_string()))?;

        info!(
            application_id = %config.application_id,
            write_url = %config.write_url,
            read_url = %config.read_url,
            "Created HTTP transport"
        );

        Ok(Self { client, config })
    }

    fn url_for(&self, request: &TransportRequest) -> String {
        let base = match request.kind {
            RequestKind::Read => &self.config.read_url,
            RequestKind::Write => &self.config.write_url,
        };
        format!("{}{}", base.trim_end_matches('/'), request.path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: TransportRequest) -> Result<Value> {
        let url = self.url_for(&request);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &url);
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| IndexError::connection(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| IndexError::connection(e.to_string()))?;

        if !status.is_success() {
            let message = service_message(&text);
            error!(status = %status, message = %message, "Request failed");
            return Err(IndexError::transport(status.as_u16(), message));
        }

        debug!(status = %status, bytes = text.len(), "Request succeeded");

        serde_json::from_str(&text)
            .map_err(|e| IndexError::malformed(format!("Response is not valid JSON: {}", e)))
    }
}

/// Pull the service's `message` field out of an error body, falling back to
/// the raw body.
fn service_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
