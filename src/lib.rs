//! Consumer-group client for Redis Streams
//!
//! This library provides the consumption side of a Redis Streams consumer
//! group: multiple named consumers cooperatively process a shared stream,
//! each entry delivered to exactly one live consumer, with explicit
//! acknowledgment and reclaim-on-timeout for crashed consumers.
//!
//! Each consumption cycle tries three fetch phases in strict priority
//! order and returns the first non-empty batch: new deliveries, then this
//! consumer's own pending entries, then stale entries claimed from other
//! consumers.
//!
//! # Quick Start
//!
//! ```no_run
//! use redstream::{Consumer, ConsumerConfig, RedisConfig, StreamClient};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = StreamClient::connect(RedisConfig::default()).await?;
//!
//!     let config = ConsumerConfig::new("payments", "workers", "worker-1")
//!         .with_pending_batch_size(10)
//!         .with_claim_batch_size(10);
//!
//!     let mut consumer = Consumer::new(client, config, CancellationToken::new()).await?;
//!
//!     loop {
//!         for entry in consumer.consume().await? {
//!             println!("processing {}", entry.id);
//!             consumer.ack(&entry.id).await?;
//!         }
//!     }
//! }
//! ```

pub mod broker;
pub mod client;
pub mod connection;
pub mod consumer;
pub mod error;
pub mod operations;
pub mod types;

// Re-export main types for convenience
pub use broker::{ClaimedBatch, GroupStatus, StreamBroker};
pub use client::StreamClient;
pub use connection::RedisConfig;
pub use consumer::{Consumer, ConsumerConfig};
pub use error::{Error, Result};
pub use types::{Entry, ORIGIN_ID};
