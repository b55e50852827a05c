use crate::types::ORIGIN_ID;

/// Scan positions for the pending-retry and stale-claim phases
///
/// Both cursors start at the stream origin and are owned exclusively by
/// one consumer instance; they are scanned and mutated sequentially within
/// one consumption cycle.
///
/// `latest_pending_id` tracks progress through this consumer's
/// delivered-but-unacked entries and resets to the origin whenever a scan
/// comes back empty, so the next cycle picks up entries whose delivery
/// state changed since. `next_claim_id` follows the broker's continuation
/// cursor regardless of whether anything was claimed, and resets to the
/// origin only after a failed claim scan.
#[derive(Debug)]
pub(crate) struct CursorState {
    latest_pending_id: String,
    next_claim_id: String,
}

impl CursorState {
    pub(crate) fn new() -> Self {
        Self {
            latest_pending_id: ORIGIN_ID.to_string(),
            next_claim_id: ORIGIN_ID.to_string(),
        }
    }

    pub(crate) fn pending_cursor(&self) -> &str {
        &self.latest_pending_id
    }

    pub(crate) fn advance_pending(&mut self, last_id: &str) {
        self.latest_pending_id = last_id.to_string();
    }

    pub(crate) fn reset_pending(&mut self) {
        self.latest_pending_id = ORIGIN_ID.to_string();
    }

    pub(crate) fn claim_cursor(&self) -> &str {
        &self.next_claim_id
    }

    pub(crate) fn advance_claim(&mut self, next_cursor: String) {
        self.next_claim_id = next_cursor;
    }

    pub(crate) fn reset_claim(&mut self) {
        self.next_claim_id = ORIGIN_ID.to_string();
    }
}
