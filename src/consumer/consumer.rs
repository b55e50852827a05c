use std::future::Future;
use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::broker::{GroupStatus, StreamBroker};
use crate::consumer::cursor::CursorState;
use crate::error::{Error, Result};
use crate::types::{Entry, ORIGIN_ID};

/// Configuration for a group consumer
///
/// The stream/group/consumer triple identifies this consumer within its
/// group and is immutable after construction; the remaining fields are the
/// fetch policy. The pending and claim batch sizes are feature toggles:
/// leaving one unset disables that phase entirely.
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Stream to consume from
    pub stream: String,

    /// Consumer group this consumer joins
    pub group: String,

    /// Name of this consumer within the group
    pub consumer: String,

    /// Maximum entries per new-delivery read
    pub batch_size: usize,

    /// Maximum entries per pending-retry read; unset disables the phase
    pub pending_batch_size: Option<usize>,

    /// Maximum entries per stale-claim scan; unset disables the phase
    pub claim_batch_size: Option<usize>,

    /// How long a new-delivery read may block waiting for entries
    pub block: Duration,

    /// Minimum idle time before another consumer's entry can be claimed
    pub min_idle_to_claim: Duration,

    /// Idle floor for ownership checks; zero counts any pending state as
    /// still owned
    pub idle_still_mine: Duration,

    /// Waits between stream-existence checks during bootstrap, in order
    pub bootstrap_schedule: Vec<Duration>,
}

impl ConsumerConfig {
    /// Create a new consumer configuration
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use redstream::ConsumerConfig;
    ///
    /// let config = ConsumerConfig::new("payments", "workers", "worker-1")
    ///     .with_batch_size(50)
    ///     .with_pending_batch_size(50)
    ///     .with_claim_batch_size(10)
    ///     .with_min_idle_to_claim(Duration::from_secs(60));
    /// ```
    pub fn new(
        stream: impl Into<String>,
        group: impl Into<String>,
        consumer: impl Into<String>,
    ) -> Self {
        Self {
            stream: stream.into(),
            group: group.into(),
            consumer: consumer.into(),
            batch_size: 10,
            pending_batch_size: None,
            claim_batch_size: None,
            block: Duration::from_secs(5),
            min_idle_to_claim: Duration::from_secs(30),
            idle_still_mine: Duration::ZERO,
            bootstrap_schedule: [1, 2, 3, 10, 15].map(Duration::from_secs).to_vec(),
        }
    }

    /// Set the new-delivery batch size (builder pattern)
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Enable the pending-retry phase with the given batch size (builder pattern)
    pub fn with_pending_batch_size(mut self, batch_size: usize) -> Self {
        self.pending_batch_size = Some(batch_size);
        self
    }

    /// Enable the stale-claim phase with the given batch size (builder pattern)
    pub fn with_claim_batch_size(mut self, batch_size: usize) -> Self {
        self.claim_batch_size = Some(batch_size);
        self
    }

    /// Set the new-delivery block duration (builder pattern)
    pub fn with_block(mut self, block: Duration) -> Self {
        self.block = block;
        self
    }

    /// Set the minimum idle time before claiming (builder pattern)
    pub fn with_min_idle_to_claim(mut self, min_idle: Duration) -> Self {
        self.min_idle_to_claim = min_idle;
        self
    }

    /// Set the ownership-check idle floor (builder pattern)
    pub fn with_idle_still_mine(mut self, idle_floor: Duration) -> Self {
        self.idle_still_mine = idle_floor;
        self
    }

    /// Set the bootstrap retry schedule (builder pattern)
    ///
    /// Each duration is slept once, in order, before the corresponding
    /// stream-existence check.
    pub fn with_bootstrap_schedule(mut self, schedule: Vec<Duration>) -> Self {
        self.bootstrap_schedule = schedule;
        self
    }
}

/// Group consumer over a [`StreamBroker`]
///
/// One instance owns its scan cursors and runs one consumption cycle at a
/// time; run multiple instances (with distinct consumer names) for
/// parallelism. Construction performs the bootstrap sequence: wait for the
/// stream to exist, then create the group at the stream origin.
#[derive(Debug)]
pub struct Consumer<B> {
    broker: B,
    config: ConsumerConfig,
    cursors: CursorState,
    shutdown: CancellationToken,
}

impl<B: StreamBroker> Consumer<B> {
    /// Create a new consumer and bootstrap its group
    ///
    /// Fails if the stream does not appear within the bootstrap retry
    /// schedule, or if group creation fails for any reason other than the
    /// group already existing.
    pub async fn new(
        broker: B,
        config: ConsumerConfig,
        shutdown: CancellationToken,
    ) -> Result<Self> {
        info!(
            stream = %config.stream,
            group = %config.group,
            consumer = %config.consumer,
            "creating consumer"
        );

        let consumer = Self {
            broker,
            config,
            cursors: CursorState::new(),
            shutdown,
        };

        consumer.ensure_group().await?;
        Ok(consumer)
    }

    /// The configuration this consumer was built with
    pub fn config(&self) -> &ConsumerConfig {
        &self.config
    }

    /// Run one consumption cycle
    ///
    /// Tries the fetch phases in strict priority order and returns the
    /// first non-empty batch; an empty result means no phase had entries
    /// and the caller should simply loop. If the consumer group has
    /// vanished, the group is recreated before the error is returned, so
    /// the next cycle can succeed without intervention.
    pub async fn consume(&mut self) -> Result<Vec<Entry>> {
        let entries = match self.new_entries().await {
            Ok(entries) => entries,
            Err(err) => return Err(self.recover(err).await),
        };
        if !entries.is_empty() {
            return Ok(entries);
        }

        if let Some(count) = self.config.pending_batch_size {
            let entries = match self.pending_entries(count).await {
                Ok(entries) => entries,
                Err(err) => return Err(self.recover(err).await),
            };
            if !entries.is_empty() {
                return Ok(entries);
            }
        }

        if let Some(count) = self.config.claim_batch_size {
            let entries = match self.claimed_entries(count).await {
                Ok(entries) => entries,
                Err(err) => return Err(self.recover(err).await),
            };
            if !entries.is_empty() {
                return Ok(entries);
            }
        }

        Ok(Vec::new())
    }

    /// Whether `entry_id` is still assigned to this consumer
    ///
    /// Call between fetch and any irreversible side effect to detect a
    /// concurrent reclaim by another consumer.
    pub async fn still_mine(&self, entry_id: &str) -> Result<bool> {
        debug!(id = %entry_id, "checking entry ownership");
        self.guarded(self.broker.pending_entry(
            &self.config.stream,
            &self.config.group,
            &self.config.consumer,
            self.config.idle_still_mine,
            entry_id,
        ))
        .await
    }

    /// Acknowledge one entry as processed
    pub async fn ack(&self, entry_id: &str) -> Result<()> {
        debug!(id = %entry_id, "acknowledging entry");
        self.guarded(
            self.broker
                .ack(&self.config.stream, &self.config.group, entry_id),
        )
        .await
    }

    /// Wait for the stream, then create the group at the stream origin
    ///
    /// Group creation against an existing group is success: bootstrap is
    /// idempotent so any number of consumers can race through it.
    async fn ensure_group(&self) -> Result<()> {
        self.wait_for_stream().await?;

        let status = self
            .guarded(self.broker.create_group(
                &self.config.stream,
                &self.config.group,
                ORIGIN_ID,
            ))
            .await?;

        match status {
            GroupStatus::Created => info!(group = %self.config.group, "consumer group created"),
            GroupStatus::AlreadyExists => {
                debug!(group = %self.config.group, "consumer group already exists")
            }
        }
        Ok(())
    }

    /// Poll stream existence over the configured retry schedule
    ///
    /// Each schedule entry is slept once, in order, before the
    /// corresponding existence check; exhausting the schedule without the
    /// stream appearing is fatal.
    async fn wait_for_stream(&self) -> Result<()> {
        debug!(stream = %self.config.stream, "waiting for stream");
        for wait in &self.config.bootstrap_schedule {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => return Err(Error::Cancelled),
                _ = time::sleep(*wait) => {}
            }

            if self
                .guarded(self.broker.stream_exists(&self.config.stream))
                .await?
            {
                return Ok(());
            }
            debug!(stream = %self.config.stream, waited = ?wait, "stream not present yet");
        }

        Err(Error::BootstrapTimeout(self.config.stream.clone()))
    }

    /// New-delivery phase: entries never delivered to any group member
    async fn new_entries(&self) -> Result<Vec<Entry>> {
        debug!("fetching new entries");
        self.guarded(self.broker.read_new(
            &self.config.stream,
            &self.config.group,
            &self.config.consumer,
            self.config.batch_size,
            self.config.block,
        ))
        .await
    }

    /// Pending-retry phase: this consumer's own delivered-but-unacked
    /// entries, scanned from the pending cursor
    async fn pending_entries(&mut self, count: usize) -> Result<Vec<Entry>> {
        let cursor = self.cursors.pending_cursor().to_owned();
        debug!(%cursor, "fetching pending entries");

        let entries = self
            .guarded(self.broker.read_pending(
                &self.config.stream,
                &self.config.group,
                &self.config.consumer,
                &cursor,
                count,
            ))
            .await?;

        // An empty scan restarts from the origin next cycle, picking up
        // entries whose delivery state changed since.
        match entries.last() {
            Some(last) => self.cursors.advance_pending(&last.id),
            None => self.cursors.reset_pending(),
        }

        Ok(entries)
    }

    /// Stale-claim phase: reassign entries another consumer left idle
    /// past the claim threshold
    async fn claimed_entries(&mut self, count: usize) -> Result<Vec<Entry>> {
        let cursor = self.cursors.claim_cursor().to_owned();
        debug!(%cursor, "claiming stale entries");

        let batch = match self
            .guarded(self.broker.auto_claim(
                &self.config.stream,
                &self.config.group,
                &self.config.consumer,
                self.config.min_idle_to_claim,
                &cursor,
                count,
            ))
            .await
        {
            Ok(batch) => batch,
            Err(err) => {
                warn!(error = %err, "claim scan failed, resetting claim cursor");
                self.cursors.reset_claim();
                return Err(err);
            }
        };

        // The continuation cursor is broker-driven, not result-driven:
        // the scan order is independent of the idle filter, so adopt it
        // even when nothing was claimed.
        self.cursors.advance_claim(batch.next_cursor);

        Ok(batch.entries)
    }

    /// Recreate the group after a missing-group fetch error
    ///
    /// Recovery prepares state for the next cycle; the original error is
    /// always returned so the caller sees the failed cycle.
    async fn recover(&self, err: Error) -> Error {
        if err.is_group_missing() {
            warn!(error = %err, "consumer group missing, recreating before the next cycle");
            if let Err(bootstrap_err) = self.ensure_group().await {
                warn!(error = %bootstrap_err, "group recreation failed");
            }
        }
        err
    }

    /// Race a broker call against the shutdown token
    ///
    /// Cursors are only touched after a call fully completes, so a
    /// cancelled call leaves no partial state behind.
    async fn guarded<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => Err(Error::Cancelled),
            result = call => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consumer_config_builder() {
        let config = ConsumerConfig::new("payments", "workers", "worker-1")
            .with_batch_size(50)
            .with_pending_batch_size(20)
            .with_claim_batch_size(5)
            .with_block(Duration::from_millis(200))
            .with_min_idle_to_claim(Duration::from_secs(60))
            .with_idle_still_mine(Duration::from_secs(1))
            .with_bootstrap_schedule(vec![Duration::from_secs(1), Duration::from_secs(2)]);

        assert_eq!(config.stream, "payments");
        assert_eq!(config.group, "workers");
        assert_eq!(config.consumer, "worker-1");
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.pending_batch_size, Some(20));
        assert_eq!(config.claim_batch_size, Some(5));
        assert_eq!(config.block, Duration::from_millis(200));
        assert_eq!(config.min_idle_to_claim, Duration::from_secs(60));
        assert_eq!(config.idle_still_mine, Duration::from_secs(1));
        assert_eq!(config.bootstrap_schedule.len(), 2);
    }

    #[test]
    fn test_optional_phases_default_to_disabled() {
        let config = ConsumerConfig::new("payments", "workers", "worker-1");

        assert_eq!(config.pending_batch_size, None);
        assert_eq!(config.claim_batch_size, None);
        assert_eq!(config.idle_still_mine, Duration::ZERO);
    }
}
