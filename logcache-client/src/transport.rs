//! Log store transport
//!
//! [`HttpLogStore`] talks to the Log Cache read endpoint over HTTP. The
//! [`LogStore`] trait is the seam the retriever depends on.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use logcache_core::domain::envelope::LogEnvelope;
use logcache_core::dto::read::{ReadQuery, ReadResponse};
use reqwest::header::{AUTHORIZATION, RETRY_AFTER};
use reqwest::{Client, Proxy, StatusCode, Url};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::token::{TokenSupplier, authorization_value};

/// Path segments of the read endpoint, the source id follows
pub const READ_PATH_SEGMENTS: [&str; 3] = ["api", "v1", "read"];

/// Explicit HTTP transport settings
///
/// Nothing here is read from the process environment; proxies are only
/// used when configured.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Accept any server certificate
    pub skip_ssl_validation: bool,
    /// Whole-request timeout, none by default
    pub timeout: Option<Duration>,
    /// Proxy URL applied to all schemes
    pub proxy: Option<String>,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            skip_ssl_validation: false,
            timeout: None,
            proxy: None,
            user_agent: concat!("logcache-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl TransportConfig {
    /// Build a reqwest client honoring these settings
    pub fn build_client(&self) -> Result<Client> {
        let mut builder = Client::builder()
            .danger_accept_invalid_certs(self.skip_ssl_validation)
            .user_agent(self.user_agent.as_str());

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder = match &self.proxy {
            Some(proxy) => {
                builder.proxy(Proxy::all(proxy.as_str()).map_err(ClientError::ClientBuild)?)
            }
            None => builder.no_proxy(),
        };

        builder.build().map_err(ClientError::ClientBuild)
    }
}

/// Read access to the log store
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Reads envelopes for `source_id` matching `query`
    ///
    /// # Arguments
    /// * `source_id` - Application identifier in the store
    /// * `query` - Time bound, envelope types, limit and ordering
    ///
    /// # Returns
    /// Envelopes in the order the store returned them
    async fn read(&self, source_id: &str, query: &ReadQuery) -> Result<Vec<LogEnvelope>>;
}

/// HTTP implementation of [`LogStore`]
#[derive(Clone)]
pub struct HttpLogStore {
    /// Base URL of the log store (e.g., "https://log-cache.example.com")
    base_url: String,
    /// Parsed form of `base_url`, request URLs are built from it
    endpoint: Url,
    client: Client,
    token_supplier: Arc<dyn TokenSupplier>,
}

impl HttpLogStore {
    /// Create a new HTTP log store
    ///
    /// # Arguments
    /// * `endpoint` - Absolute http(s) URL of the log store
    /// * `config` - Transport settings
    /// * `token_supplier` - Queried for a token on every request
    ///
    /// # Errors
    /// [`ClientError::InvalidEndpoint`] for a malformed endpoint,
    /// [`ClientError::ClientBuild`] when the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        config: &TransportConfig,
        token_supplier: Arc<dyn TokenSupplier>,
    ) -> Result<Self> {
        let endpoint = endpoint.into();
        let base_url = endpoint.trim_end_matches('/').to_string();

        let parsed = Url::parse(&base_url)
            .map_err(|e| ClientError::InvalidEndpoint(format!("{endpoint}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidEndpoint(format!(
                "{endpoint}: scheme must be http or https"
            )));
        }

        Ok(Self {
            base_url,
            endpoint: parsed,
            client: config.build_client()?,
            token_supplier,
        })
    }

    /// Get the base URL of the log store
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the read endpoint for `source_id`
    ///
    /// The id is a single percent-encoded path segment, so reserved
    /// characters cannot alter the path or the query. Ids that cannot form
    /// a segment (empty, `.` or `..`) are rejected.
    fn read_url(&self, source_id: &str) -> Result<Url> {
        if matches!(source_id, "" | "." | "..") {
            return Err(ClientError::InvalidSourceId(source_id.to_string()));
        }

        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidEndpoint(self.base_url.clone()))?
            .pop_if_empty()
            .extend(READ_PATH_SEGMENTS)
            .push(source_id);
        Ok(url)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle a read response and decode its envelopes
    async fn handle_response(&self, response: reqwest::Response) -> Result<Vec<LogEnvelope>> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::RateLimited {
                message,
                retry_after,
            });
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        let body: ReadResponse = response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))?;

        Ok(body.into_envelopes()?)
    }
}

impl std::fmt::Debug for HttpLogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpLogStore")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl LogStore for HttpLogStore {
    async fn read(&self, source_id: &str, query: &ReadQuery) -> Result<Vec<LogEnvelope>> {
        let url = self.read_url(source_id)?;
        let mut request = self.client.get(url).query(&query.to_query_pairs());

        if let Some(value) = authorization_value(&self.token_supplier.access_token()) {
            request = request.header(AUTHORIZATION, value);
        }

        debug!(source_id, limit = query.limit, "Reading envelopes from log store");
        let response = request.send().await?;

        self.handle_response(response).await
    }
}
