//! # wsmon-core
//!
//! Foundation types for the wsmon WebSocket inspection subsystem.
//!
//! This crate provides the shared vocabulary the relay and its consumers
//! depend on:
//!
//! - **Branded IDs**: [`ids::ChannelId`], [`ids::ConnectionId`],
//!   [`ids::ScopeId`], [`ids::PayloadId`] as newtypes
//! - **Frames**: [`frames::Frame`] — one parsed message unit as delivered by
//!   the host socket layer, with direction and protocol control bits
//! - **Events**: [`events::RelayEvent`] — the channel-scoped events the relay
//!   emits to its transport, with the exact wire field names the remote
//!   consumer expects
//! - **Errors**: [`errors::RelayError`] hierarchy via `thiserror`
//! - **Logging**: [`logging::init`] for tracing-subscriber setup
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by `wsmon-relay` and `wsmon-client`.

#![deny(unsafe_code)]

pub mod errors;
pub mod events;
pub mod frames;
pub mod ids;
pub mod logging;
