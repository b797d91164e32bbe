//! Shared test doubles for the relay seams.
//!
//! Provides [`FakeSocketSource`] (registration counting + event forwarding)
//! and [`VecSink`] (event-collecting sink) so test modules do not each grow
//! their own copies.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use wsmon_core::errors::RelayError;
use wsmon_core::events::RelayEvent;
use wsmon_core::frames::Frame;
use wsmon_core::ids::{ChannelId, ConnectionId, ScopeId};

use crate::sink::EventSink;
use crate::source::{SocketEventListener, SocketEventSource};

#[derive(Default)]
struct FakeSourceInner {
    listeners: HashMap<ScopeId, Arc<dyn SocketEventListener>>,
    adds: HashMap<ScopeId, u32>,
    removes: HashMap<ScopeId, u32>,
}

/// In-memory socket event source.
///
/// Counts add/remove calls per scope (idempotence assertions) and forwards
/// synthetic events to whatever listener is registered for a scope.
#[derive(Default)]
pub struct FakeSocketSource {
    inner: Mutex<FakeSourceInner>,
}

impl FakeSocketSource {
    /// Create an empty fake source.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `add_listener` was called for `scope`.
    pub fn add_count(&self, scope: ScopeId) -> u32 {
        self.inner.lock().adds.get(&scope).copied().unwrap_or(0)
    }

    /// How many times `remove_listener` was called for `scope`.
    pub fn remove_count(&self, scope: ScopeId) -> u32 {
        self.inner.lock().removes.get(&scope).copied().unwrap_or(0)
    }

    /// Whether a listener is currently registered for `scope`.
    pub fn has_listener(&self, scope: ScopeId) -> bool {
        self.inner.lock().listeners.contains_key(&scope)
    }

    fn listener(&self, scope: ScopeId) -> Option<Arc<dyn SocketEventListener>> {
        self.inner.lock().listeners.get(&scope).cloned()
    }

    /// Deliver a connection-opened event to the listener for `scope`.
    pub fn opened(
        &self,
        scope: ScopeId,
        connection: &ConnectionId,
        effective_uri: &str,
        protocols: &[String],
        extensions: &str,
        channel: &ChannelId,
    ) {
        if let Some(listener) = self.listener(scope) {
            listener.connection_opened(connection, effective_uri, protocols, extensions, channel);
        }
    }

    /// Deliver a connection-closed event.
    pub fn closed(
        &self,
        scope: ScopeId,
        connection: &ConnectionId,
        was_clean: bool,
        code: u16,
        reason: &str,
    ) {
        if let Some(listener) = self.listener(scope) {
            listener.connection_closed(connection, was_clean, code, reason);
        }
    }

    /// Deliver a received frame.
    pub fn frame_received(&self, scope: ScopeId, connection: &ConnectionId, frame: Frame) {
        if let Some(listener) = self.listener(scope) {
            listener.frame_received(connection, frame);
        }
    }

    /// Deliver a sent frame.
    pub fn frame_sent(&self, scope: ScopeId, connection: &ConnectionId, frame: Frame) {
        if let Some(listener) = self.listener(scope) {
            listener.frame_sent(connection, frame);
        }
    }
}

impl SocketEventSource for FakeSocketSource {
    fn add_listener(
        &self,
        scope: ScopeId,
        listener: Arc<dyn SocketEventListener>,
    ) -> Result<(), RelayError> {
        let mut inner = self.inner.lock();
        *inner.adds.entry(scope).or_insert(0) += 1;
        let _ = inner.listeners.insert(scope, listener);
        Ok(())
    }

    fn remove_listener(&self, scope: ScopeId) -> Result<(), RelayError> {
        let mut inner = self.inner.lock();
        *inner.removes.entry(scope).or_insert(0) += 1;
        let _ = inner.listeners.remove(&scope);
        Ok(())
    }
}

/// Sink that appends every emitted event to a vector.
#[derive(Default)]
pub struct VecSink {
    events: Mutex<Vec<RelayEvent>>,
}

impl VecSink {
    /// Create an empty collecting sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn events(&self) -> Vec<RelayEvent> {
        self.events.lock().clone()
    }

    /// Number of events emitted so far.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether nothing has been emitted.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Drain and return everything emitted so far.
    pub fn take(&self) -> Vec<RelayEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl EventSink for VecSink {
    fn emit(&self, event: RelayEvent) {
        self.events.lock().push(event);
    }
}
