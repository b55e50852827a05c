use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::broker::GroupStatus;
use crate::error::{Result, BUSYGROUP};

/// Create `group` on `stream`, positioned at `start_id`
///
/// Creating a group that already exists reports
/// [`GroupStatus::AlreadyExists`]; the existing group's position is left
/// untouched.
pub async fn create_group(
    manager: &ConnectionManager,
    stream: &str,
    group: &str,
    start_id: &str,
) -> Result<GroupStatus> {
    let mut conn = manager.clone();

    let created: std::result::Result<String, redis::RedisError> =
        conn.xgroup_create(stream, group, start_id).await;

    match created {
        Ok(_) => Ok(GroupStatus::Created),
        Err(err) if err.code() == Some(BUSYGROUP) => Ok(GroupStatus::AlreadyExists),
        Err(err) => Err(err.into()),
    }
}

/// Acknowledge one entry as processed
///
/// Acknowledging an already-acknowledged or unknown id is not an error;
/// the broker simply reports zero entries acknowledged.
pub async fn ack(manager: &ConnectionManager, stream: &str, group: &str, id: &str) -> Result<()> {
    let mut conn = manager.clone();
    let _acked: i64 = conn.xack(stream, group, &[id]).await?;
    Ok(())
}
