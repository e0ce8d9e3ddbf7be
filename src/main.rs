use anyhow::Result;
use gridtariff::feed::FeedClient;
use gridtariff::poller::RatesPoller;
use gridtariff::{Config, logging};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid config: {}", e))?;
    logging::init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(
        "Gridtariff starting up for {}",
        config.company.display_name
    );

    let client = FeedClient::new(Duration::from_secs(config.polling.timeout_secs))
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;
    let mut poller = RatesPoller::new(&config, Arc::new(client))
        .map_err(|e| anyhow::anyhow!("Failed to create poller: {}", e))?;

    // First fetch is fatal on failure; there is no previous snapshot.
    poller
        .refresh()
        .await
        .map_err(|e| anyhow::anyhow!("Initial feed fetch failed: {}", e))?;

    let mut tick = tokio::time::interval(Duration::from_secs(config.polling.interval_secs));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tick.tick().await;
        if let Err(e) = poller.refresh().await {
            error!("Feed refresh failed: {}", e);
            continue;
        }
        let reading = poller.current_reading(poller.local_now());
        info!(
            "Current rate: {} ({}, {})",
            reading.value,
            reading.active_peak,
            reading.season.as_str()
        );
    }
}
