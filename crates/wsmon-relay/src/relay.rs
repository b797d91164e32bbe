//! The frame relay actor.
//!
//! [`FrameRelay`] bridges host-level per-connection socket events into
//! channel-scoped [`RelayEvent`]s, bound to the owning browsing context's
//! navigation lifecycle: listening starts when a navigation commits and
//! stops just before the next one begins.
//!
//! The connection map is exclusively owned here. A frame whose connection
//! has no map entry cannot be attributed to any channel and is dropped
//! silently — open/close races make that an expected condition, not an
//! error.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::Mutex;
use tracing::{debug, warn};
use wsmon_core::errors::RelayError;
use wsmon_core::events::{FrameEnvelope, RelayEvent};
use wsmon_core::frames::{Frame, FrameDirection};
use wsmon_core::ids::{ChannelId, ConnectionId, ScopeId};

use crate::config::RelayConfig;
use crate::payload::PayloadStore;
use crate::sink::{BroadcastSink, EventSink};
use crate::source::{SocketEventListener, SocketEventSource};
use crate::target::{ListenerKey, NavigationListener, Target};

struct RelayState {
    /// Each live connection maps to the channel whose HTTP exchange was
    /// upgraded into it.
    connections: HashMap<ConnectionId, ChannelId>,
    /// The scope we registered with, while listening. Stop must unregister
    /// the scope captured at start, not the target's possibly-newer one.
    listening: Option<ScopeId>,
    destroyed: bool,
}

/// Relay from a host socket event source to a transport sink, scoped to one
/// browsing context.
pub struct FrameRelay {
    target: Arc<Target>,
    source: Arc<dyn SocketEventSource>,
    sink: Arc<dyn EventSink>,
    payloads: PayloadStore,
    state: Mutex<RelayState>,
    nav_key: Mutex<Option<ListenerKey>>,
    self_ref: OnceLock<Weak<FrameRelay>>,
}

impl FrameRelay {
    /// Create a relay with default configuration and wire it to the
    /// target's navigation signals. The relay is idle until a navigation
    /// commits or [`start_listening`](Self::start_listening) is called.
    pub fn new(
        target: Arc<Target>,
        source: Arc<dyn SocketEventSource>,
        sink: Arc<dyn EventSink>,
    ) -> Arc<Self> {
        Self::with_config(target, source, sink, RelayConfig::default())
    }

    /// Create a relay with explicit configuration.
    pub fn with_config(
        target: Arc<Target>,
        source: Arc<dyn SocketEventSource>,
        sink: Arc<dyn EventSink>,
        config: RelayConfig,
    ) -> Arc<Self> {
        let relay = Arc::new(Self {
            target: Arc::clone(&target),
            source,
            sink,
            payloads: PayloadStore::with_initial_chunk_len(config.initial_chunk_len),
            state: Mutex::new(RelayState {
                connections: HashMap::new(),
                listening: None,
                destroyed: false,
            }),
            nav_key: Mutex::new(None),
            self_ref: OnceLock::new(),
        });
        let _ = relay.self_ref.set(Arc::downgrade(&relay));
        let key = target.on_navigation(Arc::downgrade(&relay) as Weak<dyn NavigationListener>);
        *relay.nav_key.lock() = Some(key);
        relay
    }

    /// Create a relay emitting into a fresh [`BroadcastSink`] sized by
    /// `config.sink_capacity`. Returns the sink alongside the relay so
    /// consumers can subscribe.
    pub fn with_broadcast_sink(
        target: Arc<Target>,
        source: Arc<dyn SocketEventSource>,
        config: RelayConfig,
    ) -> (Arc<Self>, Arc<BroadcastSink>) {
        let sink = Arc::new(BroadcastSink::with_capacity(config.sink_capacity));
        let relay = Self::with_config(
            target,
            source,
            Arc::clone(&sink) as Arc<dyn EventSink>,
            config,
        );
        (relay, sink)
    }

    /// Register with the socket event source for the target's current
    /// document scope. Idempotent: a second call while already listening is
    /// a no-op, as is any call after [`destroy`](Self::destroy).
    pub fn start_listening(&self) -> Result<(), RelayError> {
        {
            let state = self.state.lock();
            if state.destroyed || state.listening.is_some() {
                return Ok(());
            }
        }
        let listener = self
            .self_ref
            .get()
            .and_then(Weak::upgrade)
            .ok_or_else(|| RelayError::Registration("relay already dropped".into()))?;
        let scope = self.target.scope();
        self.source.add_listener(scope, listener)?;
        self.state.lock().listening = Some(scope);
        debug!(%scope, "socket listener registered");
        Ok(())
    }

    /// Unregister from the socket event source. Idempotent. Once this
    /// returns, the source delivers no further callbacks (its removal is
    /// synchronous by contract).
    pub fn stop_listening(&self) -> Result<(), RelayError> {
        let scope = {
            let mut state = self.state.lock();
            match state.listening.take() {
                Some(scope) => scope,
                None => return Ok(()),
            }
        };
        self.source.remove_listener(scope)?;
        debug!(%scope, "socket listener removed");
        Ok(())
    }

    /// Tear the relay down: detach from navigation signals, stop listening,
    /// drop the connection map and all payload handles. Safe to call when
    /// listening never started; callbacks arriving afterwards are no-ops.
    pub fn destroy(&self) {
        if let Some(key) = self.nav_key.lock().take() {
            self.target.off_navigation(key);
        }
        if let Err(error) = self.stop_listening() {
            warn!(%error, "failed to unregister socket listener during teardown");
        }
        {
            let mut state = self.state.lock();
            state.destroyed = true;
            state.connections.clear();
        }
        self.payloads.clear();
    }

    /// The payload store backing this relay's frame events. The transport
    /// fetches and releases handles through this.
    pub fn payloads(&self) -> &PayloadStore {
        &self.payloads
    }

    /// Whether the relay is currently registered with the event source.
    pub fn is_listening(&self) -> bool {
        self.state.lock().listening.is_some()
    }

    /// Number of live tracked connections.
    pub fn connection_count(&self) -> usize {
        self.state.lock().connections.len()
    }

    /// Attribute a frame to its channel and emit; drop silently when the
    /// connection is unknown.
    fn relay_frame(&self, connection: &ConnectionId, frame: &Frame, direction: FrameDirection) {
        let channel = {
            let state = self.state.lock();
            if state.destroyed {
                return;
            }
            state.connections.get(connection).cloned()
        };
        let Some(channel) = channel else {
            debug!(%connection, direction = direction.as_str(), "dropping frame for unknown connection");
            return;
        };
        let payload = self.payloads.register(frame.payload.clone());
        let envelope = FrameEnvelope::from_frame(frame, direction, payload);
        let event = match direction {
            FrameDirection::Sent => RelayEvent::FrameSent {
                channel_id: channel,
                frame: envelope,
            },
            FrameDirection::Received => RelayEvent::FrameReceived {
                channel_id: channel,
                frame: envelope,
            },
        };
        self.sink.emit(event);
    }
}

impl NavigationListener for FrameRelay {
    fn will_navigate(&self) {
        if let Err(error) = self.stop_listening() {
            warn!(%error, "failed to stop listening on will-navigate");
        }
    }

    fn navigated(&self) {
        if let Err(error) = self.start_listening() {
            warn!(%error, "failed to start listening on navigate");
        }
    }
}

impl SocketEventListener for FrameRelay {
    fn connection_opened(
        &self,
        connection: &ConnectionId,
        effective_uri: &str,
        protocols: &[String],
        extensions: &str,
        channel: &ChannelId,
    ) {
        {
            let mut state = self.state.lock();
            if state.destroyed {
                return;
            }
            // Last-write-wins: connection ids are host-unique per live
            // connection, so a prior entry is stale by definition.
            let _ = state
                .connections
                .insert(connection.clone(), channel.clone());
        }
        self.sink.emit(RelayEvent::WebSocketOpened {
            channel_id: channel.clone(),
            effective_uri: effective_uri.to_owned(),
            protocols: protocols.to_vec(),
            extensions: extensions.to_owned(),
        });
    }

    fn connection_closed(
        &self,
        connection: &ConnectionId,
        was_clean: bool,
        code: u16,
        reason: &str,
    ) {
        {
            let mut state = self.state.lock();
            if state.destroyed {
                return;
            }
            let _ = state.connections.remove(connection);
        }
        // Emitted without a channel id — the consumer correlates by the
        // channel context it already tracks (wire-compatible schema).
        self.sink.emit(RelayEvent::WebSocketClosed {
            was_clean,
            code,
            reason: reason.to_owned(),
        });
    }

    fn frame_received(&self, connection: &ConnectionId, frame: Frame) {
        self.relay_frame(connection, &frame, FrameDirection::Received);
    }

    fn frame_sent(&self, connection: &ConnectionId, frame: Frame) {
        self.relay_frame(connection, &frame, FrameDirection::Sent);
    }
}
