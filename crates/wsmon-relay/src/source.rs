//! The inbound seam: the host socket event source and its listener contract.
//!
//! The host parses WebSocket traffic and delivers lifecycle and frame
//! callbacks, serialized per connection, to whoever registered for a given
//! document scope. The relay implements [`SocketEventListener`]; the source
//! is injected at construction so tests run against a fake instead of a live
//! host service.

use std::sync::Arc;

use wsmon_core::errors::RelayError;
use wsmon_core::frames::Frame;
use wsmon_core::ids::{ChannelId, ConnectionId, ScopeId};

/// Callback contract for socket events. All calls are synchronous; the host
/// guarantees per-connection ordering (open, then interleaved frames, then
/// close).
pub trait SocketEventListener: Send + Sync {
    /// A connection completed its protocol upgrade. `channel` identifies the
    /// HTTP exchange that was upgraded.
    fn connection_opened(
        &self,
        connection: &ConnectionId,
        effective_uri: &str,
        protocols: &[String],
        extensions: &str,
        channel: &ChannelId,
    );

    /// A connection closed.
    fn connection_closed(&self, connection: &ConnectionId, was_clean: bool, code: u16, reason: &str);

    /// A frame arrived from the server on `connection`.
    fn frame_received(&self, connection: &ConnectionId, frame: Frame);

    /// A frame was sent by the page on `connection`.
    fn frame_sent(&self, connection: &ConnectionId, frame: Frame);
}

/// A source of socket events, scoped by document identity.
///
/// Registration and removal are synchronous: once `remove_listener` returns,
/// the source delivers no further callbacks for that scope.
pub trait SocketEventSource: Send + Sync {
    /// Register `listener` for events in `scope`. One listener per scope.
    fn add_listener(
        &self,
        scope: ScopeId,
        listener: Arc<dyn SocketEventListener>,
    ) -> Result<(), RelayError>;

    /// Remove the listener registered for `scope`, if any.
    fn remove_listener(&self, scope: ScopeId) -> Result<(), RelayError>;
}
