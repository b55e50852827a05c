use std::time::Duration;

use redis::aio::ConnectionManager;
use redis::streams::StreamPendingCountReply;
use redis::AsyncCommands;

use crate::error::Result;

/// Whether the stream key currently exists
pub async fn stream_exists(manager: &ConnectionManager, stream: &str) -> Result<bool> {
    let mut conn = manager.clone();
    let exists: bool = conn.exists(stream).await?;
    Ok(exists)
}

/// Whether `id` is currently pending for this consumer
///
/// Uses the extended pending query filtered to the single id. An idle
/// floor of zero counts any pending state as owned; a non-zero floor only
/// counts entries that have been idle at least that long.
pub async fn pending_entry(
    manager: &ConnectionManager,
    stream: &str,
    group: &str,
    consumer: &str,
    idle_floor: Duration,
    id: &str,
) -> Result<bool> {
    let mut conn = manager.clone();

    // The typed pending API has no IDLE form; build the command directly.
    let mut cmd = redis::cmd("XPENDING");
    cmd.arg(stream).arg(group);
    let idle_ms = idle_floor.as_millis() as u64;
    if idle_ms > 0 {
        cmd.arg("IDLE").arg(idle_ms);
    }
    cmd.arg(id).arg(id).arg(1).arg(consumer);

    let reply: StreamPendingCountReply = cmd.query_async(&mut conn).await?;
    Ok(!reply.ids.is_empty())
}
