//! # wsmon-client
//!
//! The consumer side of the relay event contract: a [`store::FrameStore`]
//! that ingests [`wsmon_core::events::RelayEvent`]s and maintains
//! per-channel frame history for display, with direction and text filtering,
//! frame selection, and per-channel clearing.
//!
//! ## Crate Position
//!
//! Leaf crate. Depends on `wsmon-core` only; the transport deserializes
//! events and feeds them to [`store::FrameStore::ingest`].

#![deny(unsafe_code)]

pub mod store;

pub use store::{ChannelInfo, CloseInfo, FrameEntry, FrameFilter, FrameStore, FrameStoreAction};
