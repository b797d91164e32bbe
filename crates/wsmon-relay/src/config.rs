//! Relay tunables.

use crate::payload::DEFAULT_INITIAL_CHUNK_LEN;

/// Construction-time settings for a relay and its provided sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelayConfig {
    /// Channel capacity of the sink built by
    /// [`FrameRelay::with_broadcast_sink`](crate::FrameRelay::with_broadcast_sink).
    /// Ignored when the caller supplies its own sink.
    pub sink_capacity: usize,
    /// Cap on the `initial` chunk embedded in frame events, in bytes.
    pub initial_chunk_len: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            sink_capacity: 1024,
            initial_chunk_len: DEFAULT_INITIAL_CHUNK_LEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RelayConfig::default();
        assert_eq!(config.sink_capacity, 1024);
        assert_eq!(config.initial_chunk_len, 1_000);
    }
}
