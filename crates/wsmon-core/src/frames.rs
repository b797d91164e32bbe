//! Frame records as delivered by the host socket layer.
//!
//! A [`Frame`] is one discrete message unit on the socket, already parsed by
//! the host — this crate never touches the wire format itself. Frames are
//! immutable once constructed and handed to the relay by value.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Direction of a frame relative to the inspected page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameDirection {
    /// Page → server.
    Sent,
    /// Server → page.
    Received,
}

impl FrameDirection {
    /// The wire label for this direction (`"sent"` / `"received"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Received => "received",
        }
    }
}

/// WebSocket opcode, passed through as the host reported it.
///
/// Unknown values are preserved — the relay does not validate opcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpCode(pub u8);

impl OpCode {
    /// Continuation frame.
    pub const CONTINUATION: Self = Self(0);
    /// Text frame.
    pub const TEXT: Self = Self(1);
    /// Binary frame.
    pub const BINARY: Self = Self(2);
    /// Close control frame.
    pub const CLOSE: Self = Self(8);
    /// Ping control frame.
    pub const PING: Self = Self(9);
    /// Pong control frame.
    pub const PONG: Self = Self(10);

    /// Whether this is a control opcode (close/ping/pong range).
    #[must_use]
    pub const fn is_control(self) -> bool {
        self.0 >= 8
    }
}

/// One parsed frame from the host socket layer.
///
/// `mask` carries the literal masking key and is only present on received
/// frames — client-to-server frames are the masked direction in the
/// protocol, and the host reports the key only where one was applied.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Frame payload. Shared, not copied, when handed around.
    pub payload: Bytes,
    /// Host-reported timestamp (microseconds), passed through untouched.
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
    /// Literal masking key, present on received frames only.
    pub mask: Option<u32>,
    /// Mask bit from the frame header.
    pub mask_bit: bool,
}

impl Frame {
    /// A final text frame with defaulted control bits, as a sent frame
    /// would arrive from the host (mask bit set, key not reported).
    pub fn text(payload: impl Into<Bytes>, time_stamp: i64) -> Self {
        Self {
            payload: payload.into(),
            time_stamp,
            fin_bit: true,
            rsv_bit1: false,
            rsv_bit2: false,
            rsv_bit3: false,
            op_code: OpCode::TEXT,
            mask: None,
            mask_bit: true,
        }
    }

    /// A final binary frame with defaulted control bits.
    pub fn binary(payload: impl Into<Bytes>, time_stamp: i64) -> Self {
        Self {
            op_code: OpCode::BINARY,
            ..Self::text(payload, time_stamp)
        }
    }

    /// Attach the literal masking key (received frames).
    #[must_use]
    pub fn with_mask(mut self, mask: u32) -> Self {
        self.mask = Some(mask);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_wire_labels() {
        assert_eq!(FrameDirection::Sent.as_str(), "sent");
        assert_eq!(FrameDirection::Received.as_str(), "received");
        assert_eq!(
            serde_json::to_value(FrameDirection::Sent).unwrap(),
            serde_json::json!("sent")
        );
    }

    #[test]
    fn opcode_constants() {
        assert_eq!(OpCode::TEXT.0, 1);
        assert_eq!(OpCode::CLOSE.0, 8);
        assert!(OpCode::PING.is_control());
        assert!(!OpCode::BINARY.is_control());
    }

    #[test]
    fn opcode_unknown_value_preserved() {
        let op = OpCode(13);
        assert_eq!(serde_json::to_value(op).unwrap(), serde_json::json!(13));
    }

    #[test]
    fn text_frame_defaults() {
        let frame = Frame::text("hello", 1000);
        assert_eq!(&frame.payload[..], b"hello");
        assert_eq!(frame.time_stamp, 1000);
        assert!(frame.fin_bit);
        assert!(!frame.rsv_bit1);
        assert_eq!(frame.op_code, OpCode::TEXT);
        assert_eq!(frame.mask, None);
        assert!(frame.mask_bit);
    }

    #[test]
    fn with_mask_sets_key() {
        let frame = Frame::binary(vec![1u8, 2, 3], 5).with_mask(0xDEAD_BEEF);
        assert_eq!(frame.mask, Some(0xDEAD_BEEF));
        assert_eq!(frame.op_code, OpCode::BINARY);
    }

    #[test]
    fn payload_clone_shares_buffer() {
        let frame = Frame::text("shared", 0);
        let other = frame.clone();
        // Bytes clones share the underlying allocation.
        assert_eq!(frame.payload.as_ptr(), other.payload.as_ptr());
    }
}
