//! # wsmon-relay
//!
//! The server-side frame relay: bridges host-level per-connection socket
//! events into channel-scoped events for a remote debugging consumer.
//!
//! ## Submodules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `relay` | [`relay::FrameRelay`] — mapping, lifecycle, callback handling |
//! | `source` | Inbound seam: socket event source + listener traits |
//! | `target` | Owning browsing-context handle with navigation signals |
//! | `payload` | Payload handle store for large-frame retrieval |
//! | `sink` | Outbound seam: event sink trait + tokio broadcast impl |
//! | `config` | Relay tunables |
//! | `testutil` | Shared test doubles (fake source, collecting sink) |
//!
//! ## Data Flow
//!
//! host socket layer → `source` callbacks → `relay` (attribute by channel,
//! register payload handle) → `sink` → remote peer. Navigation signals from
//! `target` gate the subscription: `will_navigate` stops listening,
//! `navigated` starts again for the new document scope.
//!
//! Everything here is synchronous and callback-driven; the relay does no
//! queuing, buffering, or reordering of its own.

#![deny(unsafe_code)]

pub mod config;
pub mod payload;
pub mod relay;
pub mod sink;
pub mod source;
pub mod target;
pub mod testutil;

pub use config::RelayConfig;
pub use payload::PayloadStore;
pub use relay::FrameRelay;
pub use sink::{BroadcastSink, EventSink};
pub use source::{SocketEventListener, SocketEventSource};
pub use target::{NavigationListener, Target};
