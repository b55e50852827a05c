use std::time::Duration;

use redis::aio::ConnectionManager;
use redis::streams::{StreamAutoClaimOptions, StreamAutoClaimReply};
use redis::AsyncCommands;

use crate::broker::ClaimedBatch;
use crate::error::Result;
use crate::operations::read::parse_stream_id;

/// Reassign up to `count` entries idle for at least `min_idle` to this
/// consumer, scanning from `cursor`
///
/// The reply always carries a continuation cursor, even when nothing was
/// claimed: the broker's scan order is independent of the idle filter.
pub async fn auto_claim(
    manager: &ConnectionManager,
    stream: &str,
    group: &str,
    consumer: &str,
    min_idle: Duration,
    cursor: &str,
    count: usize,
) -> Result<ClaimedBatch> {
    let mut conn = manager.clone();

    let options = StreamAutoClaimOptions::default().count(count);
    let reply: StreamAutoClaimReply = conn
        .xautoclaim_options(
            stream,
            group,
            consumer,
            min_idle.as_millis() as u64,
            cursor,
            options,
        )
        .await?;

    let entries = reply
        .claimed
        .iter()
        .map(parse_stream_id)
        .collect::<Result<Vec<_>>>()?;

    Ok(ClaimedBatch {
        entries,
        next_cursor: reply.next_stream_id,
    })
}
