//! Log Cache CLI
//!
//! Command-line interface for reading recent application logs from Log Cache.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "logcache")]
#[command(about = "Recent application logs from Log Cache", long_about = None)]
struct Cli {
    /// Log Cache URL
    #[arg(long, env = "LOGCACHE_URL")]
    url: String,

    /// Access token, with or without the "bearer " prefix
    #[arg(long, env = "LOGCACHE_TOKEN", default_value = "", hide_env_values = true)]
    token: String,

    /// Skip TLS certificate validation
    #[arg(long, env = "LOGCACHE_SKIP_SSL_VALIDATION")]
    skip_ssl_validation: bool,

    /// Maximum number of log envelopes to print
    #[arg(long, env = "LOGCACHE_MAX_LINES", default_value_t = 100)]
    max_lines: usize,

    /// Request timeout in seconds
    #[arg(long, env = "LOGCACHE_TIMEOUT")]
    timeout: Option<u64>,

    /// Proxy URL for all requests
    #[arg(long, env = "LOGCACHE_PROXY")]
    proxy: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn config(&self) -> Config {
        Config::new(self.url.clone(), self.token.clone())
            .with_skip_ssl_validation(self.skip_ssl_validation)
            .with_timeout_secs(self.timeout)
            .with_proxy(self.proxy.clone())
            .with_max_lines(self.max_lines)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, stdout carries the rendered block
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "logcache=info,logcache_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    config.validate()?;

    handle_command(cli.command, &config).await
}
