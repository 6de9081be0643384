//! Mock implementations for testing.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use sxt_core::{
    AuthRoute, AuthTransport, TransportError, TransportRequest, TransportResponse, UserId,
};
use sxt_storage::{MemorySessionStore, SessionRecord, SessionStore, StorageError, StorageResult};

type Canned = Result<TransportResponse, TransportError>;

/// Mock implementation of [`AuthTransport`] for testing.
///
/// Responses are queued per route and handed out in order. A route with an
/// empty queue answers with a connection error. Every request is captured.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    /// Queued responses per route.
    responses: Arc<Mutex<HashMap<AuthRoute, VecDeque<Canned>>>>,
    /// Captured requests, in send order.
    requests: Arc<Mutex<Vec<TransportRequest>>>,
}

impl MockTransport {
    /// Create a mock with nothing queued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn queue(self, route: AuthRoute, canned: Canned) -> Self {
        if let Ok(mut guard) = self.responses.lock() {
            guard.entry(route).or_default().push_back(canned);
        }
        self
    }

    /// Queue a raw response for `route`.
    #[must_use]
    pub fn with_response(self, route: AuthRoute, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.queue(route, Ok(TransportResponse::new(status, body)))
    }

    /// Queue a JSON response for `route`.
    #[must_use]
    pub fn with_json(self, route: AuthRoute, status: u16, body: &Value) -> Self {
        self.with_response(route, status, body.to_string())
    }

    /// Queue a transport failure for `route`.
    #[must_use]
    pub fn with_error(self, route: AuthRoute, error: TransportError) -> Self {
        self.queue(route, Err(error))
    }

    /// All captured requests, in send order.
    #[must_use]
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Captured requests for one route.
    #[must_use]
    pub fn requests_for(&self, route: AuthRoute) -> Vec<TransportRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.route == route)
            .collect()
    }

    /// Number of requests sent to `route`.
    #[must_use]
    pub fn request_count(&self, route: AuthRoute) -> usize {
        self.requests_for(route).len()
    }

    /// Responses still queued for `route`.
    #[must_use]
    pub fn pending(&self, route: AuthRoute) -> usize {
        self.responses
            .lock()
            .map(|guard| guard.get(&route).map_or(0, VecDeque::len))
            .unwrap_or_default()
    }
}

impl AuthTransport for MockTransport {
    fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        if let Ok(mut guard) = self.requests.lock() {
            guard.push(request.clone());
        }

        self.responses
            .lock()
            .ok()
            .and_then(|mut guard| guard.get_mut(&request.route).and_then(VecDeque::pop_front))
            .unwrap_or_else(|| {
                Err(TransportError::Connection(format!(
                    "no response queued for {}",
                    request.route
                )))
            })
    }
}

/// Session store that counts calls and can be told to fail writes.
///
/// Backed by a [`MemorySessionStore`].
#[derive(Debug, Default)]
pub struct RecordingSessionStore {
    inner: MemorySessionStore,
    reads: AtomicUsize,
    writes: AtomicUsize,
    deletes: AtomicUsize,
    fail_writes: AtomicBool,
    written: Mutex<Vec<SessionRecord>>,
}

impl RecordingSessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record without counting it as a write.
    #[must_use]
    pub fn with_record(self, record: SessionRecord) -> Self {
        let _ = self.inner.persist(&record);
        self
    }

    /// Make every subsequent write fail.
    #[must_use]
    pub fn failing_writes(self) -> Self {
        self.fail_writes.store(true, Ordering::SeqCst);
        self
    }

    /// Toggle write failures.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of reads.
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of records that reached storage.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of deletes.
    #[must_use]
    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    /// Every record that reached storage, in order.
    #[must_use]
    pub fn written(&self) -> Vec<SessionRecord> {
        self.written
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl SessionStore for RecordingSessionStore {
    fn read(&self, user_id: &UserId) -> StorageResult<Option<SessionRecord>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read(user_id)
    }

    fn persist(&self, record: &SessionRecord) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Io(io::Error::other("injected write failure")));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.written.lock() {
            guard.push(record.clone());
        }
        self.inner.persist(record)
    }

    fn delete(&self, user_id: &UserId) -> StorageResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{test_token_pair, test_user_id};
    use sxt_crypto::KeyPair;

    #[test]
    fn test_mock_transport_queues_per_route() {
        let transport = MockTransport::new()
            .with_response(AuthRoute::ValidToken, 200, "first")
            .with_response(AuthRoute::ValidToken, 401, "second")
            .with_error(AuthRoute::Refresh, TransportError::Timeout);

        let validate = TransportRequest::new(AuthRoute::ValidToken);
        assert_eq!(transport.send(&validate).unwrap().body, b"first");
        assert_eq!(transport.send(&validate).unwrap().status, 401);
        assert!(transport.send(&validate).is_err());

        let refresh = TransportRequest::new(AuthRoute::Refresh);
        assert_eq!(transport.send(&refresh).unwrap_err(), TransportError::Timeout);

        assert_eq!(transport.request_count(AuthRoute::ValidToken), 3);
        assert_eq!(transport.pending(AuthRoute::Refresh), 0);
    }

    #[test]
    fn test_recording_store_counts() {
        let store = RecordingSessionStore::new();
        let record = SessionRecord::new(test_user_id(), test_token_pair(), KeyPair::generate().unwrap());

        store.write(&record).unwrap();
        store.read(&record.user_id).unwrap();
        store.set_fail_writes(true);
        assert!(store.write(&record).is_err());

        assert_eq!(store.write_count(), 1);
        assert_eq!(store.read_count(), 1);
        assert_eq!(store.written().len(), 1);
    }
}
