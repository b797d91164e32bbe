//! Branded ID newtypes.
//!
//! Each identifier in the relay's data model gets its own type so a
//! connection id can never be passed where a channel id is expected. All of
//! them serialize transparently as their inner value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of the logical HTTP request/response exchange that was
/// upgraded to a socket connection.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

/// Host-assigned identifier for one live socket connection instance.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

/// Identity of the currently loaded document in a browsing context.
///
/// Socket event subscriptions are scoped by this value, so events from a
/// previous document never leak into the next one after navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeId(u64);

/// Identifier of a registered payload handle.
///
/// Handed to the remote peer inside a [`crate::events::PayloadRef`] so the
/// full payload can be fetched on demand instead of being copied into every
/// event envelope.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayloadId(String);

macro_rules! string_id {
    ($ty:ident) => {
        impl $ty {
            /// Wrap a raw identifier string.
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// The raw identifier string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $ty {
            fn from(raw: &str) -> Self {
                Self(raw.to_owned())
            }
        }

        impl From<String> for $ty {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(ChannelId);
string_id!(ConnectionId);
string_id!(PayloadId);

impl ScopeId {
    /// Wrap a raw scope value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw scope value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PayloadId {
    /// Generate a fresh payload id (UUID v7, time-ordered).
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_ids_round_trip() {
        let ch = ChannelId::from("chan-42");
        assert_eq!(ch.as_str(), "chan-42");
        assert_eq!(ch.to_string(), "chan-42");

        let json = serde_json::to_string(&ch).unwrap();
        assert_eq!(json, "\"chan-42\"");
        let back: ChannelId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ch);
    }

    #[test]
    fn scope_id_transparent() {
        let scope = ScopeId::new(7);
        assert_eq!(scope.value(), 7);
        let json = serde_json::to_string(&scope).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn generated_payload_ids_are_unique() {
        let a = PayloadId::generate();
        let b = PayloadId::generate();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }

    #[test]
    fn ids_usable_as_map_keys() {
        let mut map = std::collections::HashMap::new();
        let _ = map.insert(ConnectionId::from("c1"), ChannelId::from("ch1"));
        assert_eq!(
            map.get(&ConnectionId::from("c1")),
            Some(&ChannelId::from("ch1"))
        );
    }
}
