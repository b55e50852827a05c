/// Consumer module implementing the group-consumption state machine
///
/// This module provides:
/// - `Consumer`: bootstrap, three-phase fetch, ownership re-check and ack
/// - `ConsumerConfig`: identity and fetch policy for one consumer
///
/// # Consumption cycle
///
/// Each call to `consume()` tries the fetch phases in strict priority
/// order and returns the first non-empty batch:
///
/// 1. **New delivery**: entries never delivered to any consumer in the
///    group, blocking up to the configured duration
/// 2. **Pending retry**: entries previously delivered to *this* consumer
///    but not yet acknowledged, scanned from the pending cursor
/// 3. **Stale claim**: entries another consumer left idle past the claim
///    threshold, reassigned to this consumer
///
/// The caller processes the returned entries, optionally re-checks
/// ownership per entry with `still_mine()`, acknowledges with `ack()`,
/// and loops. An empty result means the stream is drained, not an error.
///
/// # Example
///
/// ```no_run
/// use redstream::{Consumer, ConsumerConfig, RedisConfig, StreamClient};
/// use tokio_util::sync::CancellationToken;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = StreamClient::connect(RedisConfig::default()).await?;
///
///     let config = ConsumerConfig::new("payments", "workers", "worker-1")
///         .with_batch_size(10)
///         .with_pending_batch_size(10)
///         .with_claim_batch_size(10);
///
///     let mut consumer = Consumer::new(client, config, CancellationToken::new()).await?;
///
///     loop {
///         for entry in consumer.consume().await? {
///             if !consumer.still_mine(&entry.id).await? {
///                 continue;
///             }
///             println!("processing {}", entry.id);
///             consumer.ack(&entry.id).await?;
///         }
///     }
/// }
/// ```
pub mod consumer;
pub(crate) mod cursor;

pub use consumer::{Consumer, ConsumerConfig};
