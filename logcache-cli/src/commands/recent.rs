//! Recent logs command handler

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use colored::*;
use logcache_client::{RecentLogs, StaticToken};
use tracing::debug;

use crate::config::Config;

/// Fetch and print the recent logs of `app_id`
///
/// Rendered lines go to stdout; notices go to stderr so the output can be
/// piped.
pub async fn handle_recent_command(
    app_id: &str,
    lines: usize,
    utc: bool,
    config: &Config,
) -> Result<()> {
    let logs = RecentLogs::with_transport(
        &config.url,
        &config.transport,
        Arc::new(StaticToken::new(config.token.clone())),
        config.max_lines,
    )
    .context("Failed to set up log store client")?;

    debug!(app_id, lines, url = %config.url, "Fetching recent logs");
    let result = if utc {
        logs.fetch_recent_logs_in(&Utc, app_id, lines).await
    } else {
        logs.fetch_recent_logs(app_id, lines).await
    };

    let rendered = match result {
        Ok(rendered) => rendered,
        Err(err) => {
            if let Some(wait) = err.retry_after() {
                eprintln!(
                    "{}",
                    format!("Rate limited, retry in {}s", wait.as_secs()).yellow()
                );
            }
            return Err(err).context(format!("Failed to fetch recent logs for {}", app_id));
        }
    };

    if rendered.is_empty() {
        eprintln!("{}", format!("No recent logs for {}.", app_id).yellow());
    } else {
        print!("{}", rendered);
    }

    Ok(())
}
