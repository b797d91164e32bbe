//! The relay event vocabulary.
//!
//! [`RelayEvent`] is what the relay emits to its transport sink. The serde
//! shape is the wire contract: the remote consumer matches on the `type` tag
//! and the exact camelCase field names below, so renames here are breaking
//! changes.
//!
//! Frame payloads travel as a [`PayloadRef`] — an id plus a bounded initial
//! chunk — never as the full byte sequence. The full payload stays behind
//! the relay's payload store and is fetched on demand.

use serde::{Deserialize, Serialize};

use crate::frames::{Frame, FrameDirection, OpCode};
use crate::ids::{ChannelId, PayloadId};

/// Remote-retrievable handle to a frame payload.
///
/// `initial` carries the first chunk so small payloads need no follow-up
/// fetch; `length` is the total byte length of the full payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadRef {
    /// Handle id for on-demand retrieval.
    pub id: PayloadId,
    /// Total payload length in bytes.
    pub length: u64,
    /// First chunk of the payload, lossy UTF-8.
    pub initial: String,
}

/// The frame description carried by `serverFrameSent` / `serverFrameReceived`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameEnvelope {
    /// Direction tag (`"sent"` / `"received"`).
    #[serde(rename = "type")]
    pub direction: FrameDirection,
    /// Payload handle.
    pub payload: PayloadRef,
    /// Host-reported timestamp (microseconds).
    pub time_stamp: i64,
    /// Final-fragment bit.
    pub fin_bit: bool,
    /// Reserved bit 1.
    pub rsv_bit1: bool,
    /// Reserved bit 2.
    pub rsv_bit2: bool,
    /// Reserved bit 3.
    pub rsv_bit3: bool,
    /// Frame opcode.
    pub op_code: OpCode,
    /// Literal masking key. Received frames only — the sent side omits it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<u32>,
    /// Mask bit from the frame header.
    pub mask_bit: bool,
}

impl FrameEnvelope {
    /// Build an envelope from a host frame and a registered payload handle.
    #[must_use]
    pub fn from_frame(frame: &Frame, direction: FrameDirection, payload: PayloadRef) -> Self {
        Self {
            direction,
            payload,
            time_stamp: frame.time_stamp,
            fin_bit: frame.fin_bit,
            rsv_bit1: frame.rsv_bit1,
            rsv_bit2: frame.rsv_bit2,
            rsv_bit3: frame.rsv_bit3,
            op_code: frame.op_code,
            mask: frame.mask,
            mask_bit: frame.mask_bit,
        }
    }
}

/// Channel-scoped event emitted by the relay to its transport.
///
/// `WebSocketClosed` carries no channel id: the wire schema omits it (the
/// consumer correlates by the channel context it already tracks), and the
/// consumer side depends on that shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RelayEvent {
    /// A connection finished its protocol upgrade.
    #[serde(rename = "serverWebSocketOpened", rename_all = "camelCase")]
    WebSocketOpened {
        /// Channel the upgraded request belongs to.
        channel_id: ChannelId,
        /// Final URI after redirects.
        #[serde(rename = "effectiveURI")]
        effective_uri: String,
        /// Negotiated subprotocols.
        protocols: Vec<String>,
        /// Negotiated extensions.
        extensions: String,
    },

    /// A connection closed.
    #[serde(rename = "serverWebSocketClosed", rename_all = "camelCase")]
    WebSocketClosed {
        /// Whether the close handshake completed cleanly.
        was_clean: bool,
        /// Close status code.
        code: u16,
        /// Close reason string.
        reason: String,
    },

    /// A frame arrived from the server.
    #[serde(rename = "serverFrameReceived", rename_all = "camelCase")]
    FrameReceived {
        /// Channel the frame is attributed to.
        channel_id: ChannelId,
        /// Frame description.
        frame: FrameEnvelope,
    },

    /// A frame was sent by the page.
    #[serde(rename = "serverFrameSent", rename_all = "camelCase")]
    FrameSent {
        /// Channel the frame is attributed to.
        channel_id: ChannelId,
        /// Frame description.
        frame: FrameEnvelope,
    },
}

impl RelayEvent {
    /// The wire tag of this event (for type discrimination).
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::WebSocketOpened { .. } => "serverWebSocketOpened",
            Self::WebSocketClosed { .. } => "serverWebSocketClosed",
            Self::FrameReceived { .. } => "serverFrameReceived",
            Self::FrameSent { .. } => "serverFrameSent",
        }
    }

    /// The channel id this event is keyed by, where the schema carries one.
    #[must_use]
    pub fn channel_id(&self) -> Option<&ChannelId> {
        match self {
            Self::WebSocketOpened { channel_id, .. }
            | Self::FrameReceived { channel_id, .. }
            | Self::FrameSent { channel_id, .. } => Some(channel_id),
            Self::WebSocketClosed { .. } => None,
        }
    }
}
