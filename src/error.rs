//! Error taxonomy for the consumer client.
//!
//! Redis reports consumer-group conditions through server error codes
//! (`NOGROUP`, `BUSYGROUP`). Classification happens once, at the broker
//! boundary: `NOGROUP` becomes the recoverable [`Error::GroupMissing`]
//! variant, `BUSYGROUP` is swallowed into a successful group-creation
//! outcome, and everything else propagates verbatim as [`Error::Broker`].

/// Result type for consumer client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Server code reported when a group is created twice.
pub(crate) const BUSYGROUP: &str = "BUSYGROUP";

/// Server code reported when the stream or group no longer exists.
pub(crate) const NOGROUP: &str = "NOGROUP";

/// Error types for consumer client operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Initial connect or ping failed; no client is created
    #[error("connection error: {0}")]
    Connection(String),

    /// Invalid connection URL or settings
    #[error("configuration error: {0}")]
    Config(String),

    /// The stream never appeared within the bootstrap retry schedule
    #[error("stream '{0}' did not appear within the bootstrap retry schedule")]
    BootstrapTimeout(String),

    /// The consumer group no longer exists, typically because the stream
    /// was deleted and recreated externally
    #[error("consumer group missing: {0}")]
    GroupMissing(String),

    /// Entry fields did not decode into the requested type
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The cancellation token fired while a call or sleep was in flight
    #[error("operation cancelled")]
    Cancelled,

    /// Any other broker error, propagated verbatim
    #[error("broker error: {0}")]
    Broker(redis::RedisError),
}

impl Error {
    /// True for the recoverable "group no longer exists" classification.
    ///
    /// A group-missing fetch error triggers group recreation before it is
    /// surfaced; the caller retries the cycle.
    pub fn is_group_missing(&self) -> bool {
        matches!(self, Error::GroupMissing(_))
    }
}

/// Classify Redis errors by server code, never by message text.
impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        match err.code() {
            Some(NOGROUP) => Error::GroupMissing(err.to_string()),
            _ => Error::Broker(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_missing_classification() {
        let err = Error::GroupMissing("NOGROUP No such key 'payments'".to_string());
        assert!(err.is_group_missing());

        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "connection reset");
        let err = Error::from(redis::RedisError::from(io));
        assert!(!err.is_group_missing());
        assert!(matches!(err, Error::Broker(_)));
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(
            Error::BootstrapTimeout("payments".to_string()).to_string(),
            "stream 'payments' did not appear within the bootstrap retry schedule"
        );
        assert_eq!(Error::Cancelled.to_string(), "operation cancelled");
        assert_eq!(
            Error::Connection("refused".to_string()).to_string(),
            "connection error: refused"
        );
    }
}
