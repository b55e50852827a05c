use std::time::Duration;

use redstream::{Consumer, ConsumerConfig, Error, RedisConfig, StreamClient};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

/// Example: Stream Consumer Loop
///
/// This example runs a full consume -> still-mine -> ack loop against a
/// Redis server, reading its settings from the environment:
///
/// - `REDIS_URL` (default `redis://localhost:6379/0`)
/// - `STREAM_NAME` (default `payments`)
/// - `CONSUMER_GROUP_NAME` (default `workers`)
/// - `CONSUMER_NAME` (default `worker`, uniquified with a UUID suffix)
///
/// To run this example:
/// 1. Start Redis: docker run --rm -p 6379:6379 redis:7.2-alpine
/// 2. Run: cargo run --example consumer
/// 3. Feed it entries: redis-cli XADD payments '*' tx_id abc-123

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let redis = RedisConfig::from_url(&env_or("REDIS_URL", "redis://localhost:6379/0"))?;

    // A unique consumer name per process keeps restarted consumers from
    // inheriting a dead instance's pending entries by accident.
    let consumer_name = format!("{}-{}", env_or("CONSUMER_NAME", "worker"), Uuid::new_v4());

    let config = ConsumerConfig::new(
        env_or("STREAM_NAME", "payments"),
        env_or("CONSUMER_GROUP_NAME", "workers"),
        consumer_name,
    )
    .with_batch_size(10)
    .with_pending_batch_size(10)
    .with_claim_batch_size(10)
    .with_block(Duration::from_secs(2))
    .with_min_idle_to_claim(Duration::from_secs(30));

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal.cancel();
        }
    });

    let client = StreamClient::connect(redis).await?;
    let mut consumer = Consumer::new(client, config, shutdown).await?;

    loop {
        let entries = match consumer.consume().await {
            Ok(entries) => entries,
            Err(Error::Cancelled) => break,
            Err(err) => {
                warn!(error = %err, "consume cycle failed, backing off");
                tokio::time::sleep(Duration::from_secs(1)).await;
                continue;
            }
        };

        for entry in entries {
            match consumer.still_mine(&entry.id).await {
                Ok(true) => {}
                Ok(false) => {
                    info!(id = %entry.id, "entry reclaimed by another consumer, skipping");
                    continue;
                }
                Err(Error::Cancelled) => return Ok(()),
                Err(err) => return Err(err.into()),
            }

            info!(id = %entry.id, fields = ?entry.fields, "processing entry");

            match consumer.ack(&entry.id).await {
                Ok(()) => {}
                Err(Error::Cancelled) => return Ok(()),
                Err(err) => return Err(err.into()),
            }
        }
    }

    info!("shutting down");
    Ok(())
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}
