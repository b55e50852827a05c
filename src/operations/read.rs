use std::collections::HashMap;
use std::time::Duration;

use redis::aio::ConnectionManager;
use redis::streams::{StreamId, StreamReadOptions, StreamReadReply};
use redis::AsyncCommands;

use crate::error::Result;
use crate::types::Entry;

/// Cursor meaning "entries never delivered to any consumer in the group"
const NEW_ENTRIES: &str = ">";

/// Convert one reply entry into an [`Entry`]
///
/// Field values arrive as bulk strings; anything else is a broker error.
pub(crate) fn parse_stream_id(id: &StreamId) -> Result<Entry> {
    let mut fields = HashMap::with_capacity(id.map.len());
    for (name, value) in &id.map {
        let value: String = redis::from_redis_value(value)?;
        fields.insert(name.clone(), value);
    }
    Ok(Entry {
        id: id.id.clone(),
        fields,
    })
}

/// Read up to `count` never-delivered entries for this consumer
///
/// Blocks up to `block` when no entries are immediately available. An
/// empty result is not an error.
pub async fn read_new(
    manager: &ConnectionManager,
    stream: &str,
    group: &str,
    consumer: &str,
    count: usize,
    block: Duration,
) -> Result<Vec<Entry>> {
    let mut options = StreamReadOptions::default().group(group, consumer).count(count);
    // BLOCK 0 would block forever on the server; omit it instead.
    if !block.is_zero() {
        options = options.block(block.as_millis() as usize);
    }

    read_with_options(manager, stream, NEW_ENTRIES, &options).await
}

/// Read up to `count` of this consumer's own pending entries with ids
/// greater than `cursor`
///
/// Reading with a concrete id scans the consumer's pending entries rather
/// than undelivered ones, so no block duration applies.
pub async fn read_pending(
    manager: &ConnectionManager,
    stream: &str,
    group: &str,
    consumer: &str,
    cursor: &str,
    count: usize,
) -> Result<Vec<Entry>> {
    let options = StreamReadOptions::default().group(group, consumer).count(count);

    read_with_options(manager, stream, cursor, &options).await
}

async fn read_with_options(
    manager: &ConnectionManager,
    stream: &str,
    cursor: &str,
    options: &StreamReadOptions,
) -> Result<Vec<Entry>> {
    let mut conn = manager.clone();

    // A blocked read that times out replies nil rather than an empty set.
    let reply: Option<StreamReadReply> =
        conn.xread_options(&[stream], &[cursor], options).await?;

    let Some(reply) = reply else {
        return Ok(Vec::new());
    };

    let mut entries = Vec::new();
    for key in reply.keys {
        if key.key == stream {
            for id in &key.ids {
                entries.push(parse_stream_id(id)?);
            }
            break;
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use redis::Value;

    #[test]
    fn test_parse_stream_id() {
        let mut map = HashMap::new();
        map.insert("tx_id".to_string(), Value::BulkString(b"abc-123".to_vec()));

        let id = StreamId {
            id: "1-0".to_string(),
            map,
        };

        let entry = parse_stream_id(&id).unwrap();
        assert_eq!(entry.id, "1-0");
        assert_eq!(entry.field("tx_id"), Some("abc-123"));
    }

    #[test]
    fn test_parse_stream_id_empty_fields() {
        let id = StreamId {
            id: "2-0".to_string(),
            map: HashMap::new(),
        };

        let entry = parse_stream_id(&id).unwrap();
        assert_eq!(entry.id, "2-0");
        assert!(entry.fields.is_empty());
    }
}
