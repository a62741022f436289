//! Log Cache HTTP Client
//!
//! Retrieves recent application logs from a Log Cache service and renders
//! them as a chronologically ordered text block.
//!
//! Every request is authenticated with a token obtained from a caller
//! supplied [`TokenSupplier`] at request time, so token rotation needs no
//! client rebuild.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use logcache_client::{RecentLogs, StaticToken};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let logs = RecentLogs::new(
//!         "https://log-cache.example.com",
//!         false,
//!         Arc::new(StaticToken::new("my-token")),
//!         100,
//!     )?;
//!
//!     print!("{}", logs.fetch_recent_logs("6f0b3c1e-app-guid", 100).await?);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod retriever;
pub mod token;
pub mod transport;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use logcache_core::domain::envelope::{LogEnvelope, MessageType};
pub use retriever::RecentLogs;
pub use token::{StaticToken, TokenSupplier};
pub use transport::{HttpLogStore, LogStore, TransportConfig};
