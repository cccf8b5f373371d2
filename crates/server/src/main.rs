//! rechtsbron server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use anyhow::Result;
use rechtsbron_client::VerifiedSearch;
use rechtsbron_core::AppConfig;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    config.require_search_credentials()?;
    let pipeline = VerifiedSearch::from_config(&config)?;

    tracing::info!(
        domains = pipeline.registry().domain_count(),
        max_concurrency = config.max_concurrency,
        timeout_ms = config.timeout_ms,
        "Starting rechtsbron server on stdio transport"
    );

    let handler = handler::RechtsbronServer::new(pipeline);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
