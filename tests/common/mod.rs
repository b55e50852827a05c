use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use redstream::{ClaimedBatch, Entry, GroupStatus, Result, StreamBroker, ORIGIN_ID};

/// One recorded broker call, with the arguments the cursor and phase
/// assertions care about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    StreamExists,
    CreateGroup { start_id: String },
    ReadNew { count: usize },
    ReadPending { cursor: String, count: usize },
    AutoClaim { cursor: String, count: usize },
    PendingEntry { id: String },
    Ack { id: String },
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<Call>,
    stream_exists: VecDeque<bool>,
    create_group: VecDeque<Result<GroupStatus>>,
    read_new: VecDeque<Result<Vec<Entry>>>,
    read_pending: VecDeque<Result<Vec<Entry>>>,
    auto_claim: VecDeque<Result<ClaimedBatch>>,
    pending_ids: Vec<String>,
    ack: VecDeque<Result<()>>,
}

/// Scripted broker for driving the consumer state machine in tests
///
/// Each operation pops the next scripted outcome for its queue, falling
/// back to the "nothing happened" outcome when the queue is empty: the
/// stream exists, the group already exists, reads return no entries, and
/// claim scans return an empty batch whose continuation cursor is the
/// origin. Clones share state, so tests keep a handle for assertions
/// after handing the broker to a consumer.
#[derive(Clone, Debug, Default)]
pub struct MockBroker {
    state: Arc<Mutex<MockState>>,
}

impl MockBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_stream_exists(&self, exists: bool) {
        self.state.lock().unwrap().stream_exists.push_back(exists);
    }

    pub fn push_create_group(&self, result: Result<GroupStatus>) {
        self.state.lock().unwrap().create_group.push_back(result);
    }

    pub fn push_new(&self, result: Result<Vec<Entry>>) {
        self.state.lock().unwrap().read_new.push_back(result);
    }

    pub fn push_pending(&self, result: Result<Vec<Entry>>) {
        self.state.lock().unwrap().read_pending.push_back(result);
    }

    pub fn push_claim(&self, result: Result<ClaimedBatch>) {
        self.state.lock().unwrap().auto_claim.push_back(result);
    }

    pub fn push_ack(&self, result: Result<()>) {
        self.state.lock().unwrap().ack.push_back(result);
    }

    pub fn set_pending_ids(&self, ids: &[&str]) {
        self.state.lock().unwrap().pending_ids = ids.iter().map(|id| id.to_string()).collect();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Cursors passed to the pending-retry reads, in call order
    pub fn pending_cursors(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::ReadPending { cursor, .. } => Some(cursor),
                _ => None,
            })
            .collect()
    }

    /// Cursors passed to the claim scans, in call order
    pub fn claim_cursors(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::AutoClaim { cursor, .. } => Some(cursor),
                _ => None,
            })
            .collect()
    }

    pub fn count_create_group(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::CreateGroup { .. }))
            .count()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl StreamBroker for MockBroker {
    async fn stream_exists(&self, _stream: &str) -> Result<bool> {
        self.record(Call::StreamExists);
        let next = self.state.lock().unwrap().stream_exists.pop_front();
        Ok(next.unwrap_or(true))
    }

    async fn create_group(
        &self,
        _stream: &str,
        _group: &str,
        start_id: &str,
    ) -> Result<GroupStatus> {
        self.record(Call::CreateGroup {
            start_id: start_id.to_string(),
        });
        let next = self.state.lock().unwrap().create_group.pop_front();
        next.unwrap_or(Ok(GroupStatus::AlreadyExists))
    }

    async fn read_new(
        &self,
        _stream: &str,
        _group: &str,
        _consumer: &str,
        count: usize,
        _block: Duration,
    ) -> Result<Vec<Entry>> {
        self.record(Call::ReadNew { count });
        let next = self.state.lock().unwrap().read_new.pop_front();
        next.unwrap_or(Ok(Vec::new()))
    }

    async fn read_pending(
        &self,
        _stream: &str,
        _group: &str,
        _consumer: &str,
        cursor: &str,
        count: usize,
    ) -> Result<Vec<Entry>> {
        self.record(Call::ReadPending {
            cursor: cursor.to_string(),
            count,
        });
        let next = self.state.lock().unwrap().read_pending.pop_front();
        next.unwrap_or(Ok(Vec::new()))
    }

    async fn auto_claim(
        &self,
        _stream: &str,
        _group: &str,
        _consumer: &str,
        _min_idle: Duration,
        cursor: &str,
        count: usize,
    ) -> Result<ClaimedBatch> {
        self.record(Call::AutoClaim {
            cursor: cursor.to_string(),
            count,
        });
        let next = self.state.lock().unwrap().auto_claim.pop_front();
        next.unwrap_or(Ok(ClaimedBatch {
            entries: Vec::new(),
            next_cursor: ORIGIN_ID.to_string(),
        }))
    }

    async fn pending_entry(
        &self,
        _stream: &str,
        _group: &str,
        _consumer: &str,
        _idle_floor: Duration,
        id: &str,
    ) -> Result<bool> {
        self.record(Call::PendingEntry { id: id.to_string() });
        let owned = self
            .state
            .lock()
            .unwrap()
            .pending_ids
            .iter()
            .any(|pending| pending == id);
        Ok(owned)
    }

    async fn ack(&self, _stream: &str, _group: &str, id: &str) -> Result<()> {
        self.record(Call::Ack { id: id.to_string() });
        let next = self.state.lock().unwrap().ack.pop_front();
        next.unwrap_or(Ok(()))
    }
}
