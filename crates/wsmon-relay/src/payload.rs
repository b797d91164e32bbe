//! Payload handle store.
//!
//! Frame payloads can be large, so events carry a [`PayloadRef`] — handle
//! id, total length, bounded initial chunk — instead of the bytes. The full
//! payload stays here, keyed by handle id, until the transport releases it
//! or the relay is destroyed. `Bytes` slices share the original buffer, so
//! neither registration nor range fetches copy payload data.

use std::collections::HashMap;

use bytes::Bytes;
use parking_lot::Mutex;
use wsmon_core::errors::RelayError;
use wsmon_core::events::PayloadRef;
use wsmon_core::ids::PayloadId;

/// Default cap on the `initial` chunk embedded in event envelopes, in bytes.
pub const DEFAULT_INITIAL_CHUNK_LEN: usize = 1_000;

/// Store of registered payloads awaiting on-demand retrieval.
pub struct PayloadStore {
    payloads: Mutex<HashMap<PayloadId, Bytes>>,
    initial_chunk_len: usize,
}

impl PayloadStore {
    /// Create a store with the default initial-chunk cap.
    pub fn new() -> Self {
        Self::with_initial_chunk_len(DEFAULT_INITIAL_CHUNK_LEN)
    }

    /// Create a store with a custom initial-chunk cap.
    pub fn with_initial_chunk_len(initial_chunk_len: usize) -> Self {
        Self {
            payloads: Mutex::new(HashMap::new()),
            initial_chunk_len,
        }
    }

    /// Register a payload and hand back its remote-retrievable handle.
    pub fn register(&self, payload: Bytes) -> PayloadRef {
        let id = PayloadId::generate();
        let reference = PayloadRef {
            id: id.clone(),
            length: payload.len() as u64,
            initial: initial_chunk(&payload, self.initial_chunk_len),
        };
        let _ = self.payloads.lock().insert(id, payload);
        reference
    }

    /// Fetch `start..end` of a registered payload. The slice shares the
    /// stored buffer.
    pub fn fetch(&self, id: &PayloadId, start: u64, end: u64) -> Result<Bytes, RelayError> {
        let payloads = self.payloads.lock();
        let payload = payloads
            .get(id)
            .ok_or_else(|| RelayError::PayloadNotFound { id: id.clone() })?;
        let length = payload.len() as u64;
        if start > end || end > length {
            return Err(RelayError::InvalidRange { start, end, length });
        }
        Ok(payload.slice(start as usize..end as usize))
    }

    /// Fetch an entire registered payload.
    pub fn fetch_all(&self, id: &PayloadId) -> Result<Bytes, RelayError> {
        let payloads = self.payloads.lock();
        payloads
            .get(id)
            .cloned()
            .ok_or_else(|| RelayError::PayloadNotFound { id: id.clone() })
    }

    /// Release a handle. Unknown ids are a no-op (double release is fine).
    pub fn release(&self, id: &PayloadId) {
        let _ = self.payloads.lock().remove(id);
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.payloads.lock().len()
    }

    /// Whether no handles are registered.
    pub fn is_empty(&self) -> bool {
        self.payloads.lock().is_empty()
    }

    /// Drop every handle (relay teardown).
    pub fn clear(&self) {
        self.payloads.lock().clear();
    }
}

impl Default for PayloadStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Lossy-UTF-8 preview of at most `limit` bytes.
fn initial_chunk(payload: &Bytes, limit: usize) -> String {
    if payload.len() <= limit {
        return String::from_utf8_lossy(payload).into_owned();
    }
    let mut chunk = String::from_utf8_lossy(&payload[..limit]).into_owned();
    // A multi-byte sequence split at the cut decodes to a trailing
    // replacement char; drop it rather than showing decode garbage.
    if chunk.ends_with('\u{FFFD}') {
        let _ = chunk.pop();
    }
    chunk
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn register_builds_reference() {
        let store = PayloadStore::new();
        let reference = store.register(Bytes::from_static(b"hello"));
        assert_eq!(reference.length, 5);
        assert_eq!(reference.initial, "hello");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn fetch_returns_requested_range() {
        let store = PayloadStore::new();
        let reference = store.register(Bytes::from_static(b"hello world"));
        let slice = store.fetch(&reference.id, 6, 11).unwrap();
        assert_eq!(&slice[..], b"world");
    }

    #[test]
    fn fetch_all_returns_everything() {
        let store = PayloadStore::new();
        let reference = store.register(Bytes::from_static(b"abc"));
        assert_eq!(&store.fetch_all(&reference.id).unwrap()[..], b"abc");
    }

    #[test]
    fn fetch_shares_buffer() {
        let store = PayloadStore::new();
        let payload = Bytes::from(vec![7u8; 64]);
        let ptr = payload.as_ptr();
        let reference = store.register(payload);
        let slice = store.fetch(&reference.id, 0, 64).unwrap();
        assert_eq!(slice.as_ptr(), ptr);
    }

    #[test]
    fn fetch_unknown_id_errors() {
        let store = PayloadStore::new();
        let err = store.fetch(&PayloadId::from("nope"), 0, 1).unwrap_err();
        assert_matches!(err, RelayError::PayloadNotFound { .. });
    }

    #[test]
    fn fetch_bad_range_errors() {
        let store = PayloadStore::new();
        let reference = store.register(Bytes::from_static(b"abc"));
        let err = store.fetch(&reference.id, 0, 4).unwrap_err();
        assert_matches!(
            err,
            RelayError::InvalidRange {
                start: 0,
                end: 4,
                length: 3
            }
        );
        let err = store.fetch(&reference.id, 2, 1).unwrap_err();
        assert_matches!(err, RelayError::InvalidRange { .. });
    }

    #[test]
    fn release_then_fetch_errors() {
        let store = PayloadStore::new();
        let reference = store.register(Bytes::from_static(b"x"));
        store.release(&reference.id);
        assert!(store.is_empty());
        assert_matches!(
            store.fetch_all(&reference.id),
            Err(RelayError::PayloadNotFound { .. })
        );
        // Double release is a no-op.
        store.release(&reference.id);
    }

    #[test]
    fn clear_drops_all_handles() {
        let store = PayloadStore::new();
        let _ = store.register(Bytes::from_static(b"a"));
        let _ = store.register(Bytes::from_static(b"b"));
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn initial_chunk_bounded() {
        let store = PayloadStore::with_initial_chunk_len(4);
        let reference = store.register(Bytes::from_static(b"abcdefgh"));
        assert_eq!(reference.initial, "abcd");
        assert_eq!(reference.length, 8);
    }

    #[test]
    fn initial_chunk_does_not_split_multibyte_char() {
        // "héllo" — 'é' is two bytes (0xC3 0xA9) straddling a 2-byte cut.
        let store = PayloadStore::with_initial_chunk_len(2);
        let reference = store.register(Bytes::from("héllo".to_owned()));
        assert_eq!(reference.initial, "h");
    }

    #[test]
    fn initial_chunk_lossy_for_binary() {
        let store = PayloadStore::new();
        let reference = store.register(Bytes::from(vec![0xFF, 0xFE]));
        assert_eq!(reference.initial, "\u{FFFD}\u{FFFD}");
    }
}
