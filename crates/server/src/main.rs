//! shoptrends server entry point.
//!
//! Loads configuration, wires the strategy cascade into the cache and daily
//! scheduler, then serves the trend tools on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use shoptrends_client::{Cascade, FetchClient, FetchConfig};
use shoptrends_core::{AppConfig, CacheStore, DailyTrigger, RefreshScheduler, TrendService};
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

    let config = AppConfig::load().context("loading configuration")?;
    tracing::info!(
        source_url = %config.source_url,
        refresh_hour = config.refresh_hour,
        refresh_minute = config.refresh_minute,
        timezone = %config.timezone,
        api_credentials = config.api_credentials().is_some(),
        "Starting shoptrends server on stdio transport"
    );

    let fetcher = FetchClient::new(FetchConfig::from_app_config(&config))?;
    let cascade = Cascade::from_config(&config, Arc::new(fetcher))?;
    tracing::debug!(strategies = ?cascade.strategy_names(), "cascade ready");

    let store = Arc::new(CacheStore::new(Arc::new(cascade)));
    let trigger = DailyTrigger::from_config(&config)?;
    let scheduler = RefreshScheduler::new(Arc::clone(&store), trigger).spawn();
    tracing::info!(next_update = %scheduler.next_update().to_rfc3339(), "daily refresh scheduled");

    let service = Arc::new(TrendService::new(Arc::clone(&store)).with_scheduler(scheduler));

    if config.refresh_on_start {
        // Bootstrap in the background; reads arriving early wait on the same run.
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            store.read().await;
        });
    }

    let handler = handler::TrendsServer::new(Arc::clone(&service), config.tz());
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    if let Some(scheduler) = service.scheduler() {
        scheduler.shutdown();
    }
    tracing::info!("shoptrends server stopped");

    Ok(())
}
