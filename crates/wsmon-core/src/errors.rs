//! Error hierarchy for the relay.
//!
//! The taxonomy is deliberately narrow: unattributable events and redundant
//! subscribe/unsubscribe calls are not errors (they are defined no-ops), so
//! only payload retrieval and host listener registration can actually fail.

use thiserror::Error;

use crate::ids::PayloadId;

/// Errors surfaced by the relay and its payload store.
#[derive(Debug, Error)]
pub enum RelayError {
    /// A payload handle was fetched after release (or never existed).
    #[error("payload {id} not found")]
    PayloadNotFound {
        /// The missing handle id.
        id: PayloadId,
    },

    /// A payload range request fell outside the stored payload.
    #[error("invalid payload range {start}..{end} (length {length})")]
    InvalidRange {
        /// Requested range start (inclusive).
        start: u64,
        /// Requested range end (exclusive).
        end: u64,
        /// Actual payload length.
        length: u64,
    },

    /// The host socket event source refused listener (un)registration.
    ///
    /// Fatal to this relay instance's ability to observe traffic; callers
    /// surface it as an actor-initialization failure.
    #[error("socket event source registration failed: {0}")]
    Registration(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn display_messages() {
        let e = RelayError::PayloadNotFound {
            id: PayloadId::from("p9"),
        };
        assert_eq!(e.to_string(), "payload p9 not found");

        let e = RelayError::InvalidRange {
            start: 4,
            end: 10,
            length: 6,
        };
        assert_eq!(e.to_string(), "invalid payload range 4..10 (length 6)");
    }

    #[test]
    fn registration_wraps_reason() {
        let e = RelayError::Registration("scope gone".into());
        assert_matches!(e, RelayError::Registration(ref msg) if msg == "scope gone");
    }
}
