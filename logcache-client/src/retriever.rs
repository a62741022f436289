//! Recent logs retrieval
//!
//! Reads the newest log envelopes of an application and renders them
//! oldest-first as a single text block.

use std::fmt::Display;
use std::sync::Arc;

use chrono::{Local, TimeZone};
use logcache_core::dto::read::ReadQuery;
use logcache_core::render::render_recent;
use tracing::{debug, warn};

use crate::error::Result;
use crate::token::TokenSupplier;
use crate::transport::{HttpLogStore, LogStore, TransportConfig};

/// Fetches and renders recent application logs
///
/// Configuration is fixed at construction and no state is kept between
/// calls, so one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct RecentLogs<S = HttpLogStore> {
    store: S,
    /// Upper bound on rendered envelopes
    max_lines: usize,
}

impl RecentLogs<HttpLogStore> {
    /// Create a retriever backed by the HTTP log store
    ///
    /// # Arguments
    /// * `endpoint` - Log store URL
    /// * `skip_ssl_validation` - Accept any server certificate
    /// * `token_supplier` - Asked for a token on every request
    /// * `max_lines` - Most envelopes rendered per call
    ///
    /// # Example
    /// ```no_run
    /// use std::sync::Arc;
    /// use logcache_client::{RecentLogs, StaticToken};
    ///
    /// # async fn example() -> anyhow::Result<()> {
    /// let logs = RecentLogs::new(
    ///     "https://log-cache.example.com",
    ///     false,
    ///     Arc::new(StaticToken::new("bearer eyJhbGciOi...")),
    ///     100,
    /// )?;
    /// print!("{}", logs.fetch_recent_logs("app-guid", 100).await?);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(
        endpoint: impl Into<String>,
        skip_ssl_validation: bool,
        token_supplier: Arc<dyn TokenSupplier>,
        max_lines: usize,
    ) -> Result<Self> {
        let config = TransportConfig {
            skip_ssl_validation,
            ..Default::default()
        };
        Self::with_transport(endpoint, &config, token_supplier, max_lines)
    }

    /// Create a retriever with full control over the HTTP transport
    pub fn with_transport(
        endpoint: impl Into<String>,
        config: &TransportConfig,
        token_supplier: Arc<dyn TokenSupplier>,
        max_lines: usize,
    ) -> Result<Self> {
        let store = HttpLogStore::new(endpoint, config, token_supplier)?;
        Ok(Self::with_store(store, max_lines))
    }
}

impl<S: LogStore> RecentLogs<S> {
    /// Create a retriever over any log store
    pub fn with_store(store: S, max_lines: usize) -> Self {
        Self { store, max_lines }
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    /// Fetch the most recent logs of `application_id`, rendered in local time
    ///
    /// # Arguments
    /// * `application_id` - Source id of the application in the store
    /// * `requested_line_count` - Limit passed to the store
    ///
    /// # Returns
    /// The rendered block, or an empty string when the store has nothing or
    /// failed with anything other than rate limiting.
    ///
    /// # Errors
    /// [`ClientError::RateLimited`](crate::ClientError::RateLimited) is passed
    /// through so the caller can back off.
    pub async fn fetch_recent_logs(
        &self,
        application_id: &str,
        requested_line_count: usize,
    ) -> Result<String> {
        self.fetch_recent_logs_in(&Local, application_id, requested_line_count)
            .await
    }

    /// Same as [`fetch_recent_logs`](Self::fetch_recent_logs), rendering timestamps in `tz`
    pub async fn fetch_recent_logs_in<Tz>(
        &self,
        tz: &Tz,
        application_id: &str,
        requested_line_count: usize,
    ) -> Result<String>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let query = ReadQuery::recent_logs(requested_line_count);

        let batch = match self.store.read(application_id, &query).await {
            Ok(batch) => batch,
            Err(err) if err.is_rate_limited() => {
                warn!(application_id, error = %err, "Log store rate limited the read");
                return Err(err);
            }
            Err(err) => {
                warn!(application_id, error = %err, "Log store read failed, reporting no logs");
                return Ok(String::new());
            }
        };

        debug!(
            application_id,
            received = batch.len(),
            max_lines = self.max_lines,
            "Rendering recent logs"
        );

        Ok(render_recent(&batch, self.max_lines, tz))
    }
}
