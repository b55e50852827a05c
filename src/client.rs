use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use tracing::debug;

use crate::broker::{ClaimedBatch, GroupStatus, StreamBroker};
use crate::connection::RedisConfig;
use crate::error::{Error, Result};
use crate::operations;
use crate::types::Entry;

/// Concrete stream broker backed by a Redis connection
///
/// Cloning is cheap; clones share the managed connection.
///
/// # Example
///
/// ```no_run
/// use redstream::{RedisConfig, StreamClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = RedisConfig::from_url("redis://localhost:6379/0")?;
///     let client = StreamClient::connect(config).await?;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct StreamClient {
    manager: ConnectionManager,
}

impl StreamClient {
    /// Connect to the configured server and verify the connection
    ///
    /// A failed connect or ping is fatal: no client is created.
    pub async fn connect(config: RedisConfig) -> Result<Self> {
        debug!(host = %config.host, port = config.port, db = config.db, "connecting to broker");
        let mut manager = config.build_manager().await?;

        let pong: String = redis::cmd("PING")
            .query_async(&mut manager)
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;
        debug!(%pong, "broker connection verified");

        Ok(Self { manager })
    }
}

#[async_trait]
impl StreamBroker for StreamClient {
    async fn stream_exists(&self, stream: &str) -> Result<bool> {
        operations::stream_exists(&self.manager, stream).await
    }

    async fn create_group(
        &self,
        stream: &str,
        group: &str,
        start_id: &str,
    ) -> Result<GroupStatus> {
        operations::create_group(&self.manager, stream, group, start_id).await
    }

    async fn read_new(
        &self,
        stream: &str,
        group: &str,
        consumer: &str,
        count: usize,
        block: Duration,
    ) -> Result<Vec<Entry>> {
        operations::read_new(&self.manager, stream, group, consumer, count, block).await
    }

    async fn read_pending(
        &self,
        stream: &str,
        group: &str,
        consumer: &str,
        cursor: &str,
        count: usize,
    ) -> Result<Vec<Entry>> {
        operations::read_pending(&self.manager, stream, group, consumer, cursor, count).await
    }

    async fn auto_claim(
        &self,
        stream: &str,
        group: &str,
        consumer: &str,
        min_idle: Duration,
        cursor: &str,
        count: usize,
    ) -> Result<ClaimedBatch> {
        operations::auto_claim(&self.manager, stream, group, consumer, min_idle, cursor, count)
            .await
    }

    async fn pending_entry(
        &self,
        stream: &str,
        group: &str,
        consumer: &str,
        idle_floor: Duration,
        id: &str,
    ) -> Result<bool> {
        operations::pending_entry(&self.manager, stream, group, consumer, idle_floor, id).await
    }

    async fn ack(&self, stream: &str, group: &str, id: &str) -> Result<()> {
        operations::ack(&self.manager, stream, group, id).await
    }
}
