//! The abstract broker operation set the consumer is written against.
//!
//! [`StreamClient`](crate::client::StreamClient) is the production
//! implementation; test suites inject scripted implementations to exercise
//! each fetch phase in isolation.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Entry;

/// Outcome of a group-creation attempt
///
/// Creating a group that already exists is a normal, non-fatal outcome
/// during bootstrap; it gets its own value rather than an error variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStatus {
    /// The group was created at the requested position
    Created,
    /// The group already existed; its position is untouched
    AlreadyExists,
}

/// Entries reassigned by one claim scan, with the broker's continuation
/// cursor for the next scan
#[derive(Debug, Clone)]
pub struct ClaimedBatch {
    /// Entries now owned by the claiming consumer
    pub entries: Vec<Entry>,
    /// Where the next claim scan should start
    pub next_cursor: String,
}

/// Operations a stream broker must expose to support group consumption
#[async_trait]
pub trait StreamBroker: Send + Sync {
    /// Whether the stream key currently exists
    async fn stream_exists(&self, stream: &str) -> Result<bool>;

    /// Create `group` on `stream`, positioned at `start_id`
    async fn create_group(&self, stream: &str, group: &str, start_id: &str)
        -> Result<GroupStatus>;

    /// Read up to `count` entries never delivered to any consumer in the
    /// group, blocking up to `block` when none are immediately available
    async fn read_new(
        &self,
        stream: &str,
        group: &str,
        consumer: &str,
        count: usize,
        block: Duration,
    ) -> Result<Vec<Entry>>;

    /// Read up to `count` of this consumer's own pending entries with ids
    /// greater than `cursor`
    async fn read_pending(
        &self,
        stream: &str,
        group: &str,
        consumer: &str,
        cursor: &str,
        count: usize,
    ) -> Result<Vec<Entry>>;

    /// Reassign up to `count` entries idle for at least `min_idle` to this
    /// consumer, scanning from `cursor`
    async fn auto_claim(
        &self,
        stream: &str,
        group: &str,
        consumer: &str,
        min_idle: Duration,
        cursor: &str,
        count: usize,
    ) -> Result<ClaimedBatch>;

    /// Whether `id` is currently pending for this consumer, subject to the
    /// idle floor
    async fn pending_entry(
        &self,
        stream: &str,
        group: &str,
        consumer: &str,
        idle_floor: Duration,
        id: &str,
    ) -> Result<bool>;

    /// Acknowledge one entry as processed
    async fn ack(&self, stream: &str, group: &str, id: &str) -> Result<()>;
}
