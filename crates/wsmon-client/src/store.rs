//! Per-channel frame history for the inspection UI.
//!
//! [`FrameStore`] is the reducer behind the frames panel: every mutation
//! goes through [`FrameStore::apply`] with a [`FrameStoreAction`], and
//! [`FrameStore::ingest`] maps incoming relay events onto those actions.
//!
//! Clearing only drops the currently selected channel's history — other
//! channels keep theirs, and the active filter settings survive the clear.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use wsmon_core::events::{PayloadRef, RelayEvent};
use wsmon_core::frames::{FrameDirection, OpCode};
use wsmon_core::ids::ChannelId;

/// One displayed frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameEntry {
    /// Channel the frame belongs to.
    pub channel_id: ChannelId,
    /// Frame direction.
    pub direction: FrameDirection,
    /// Payload handle (full payload fetched on demand).
    pub payload: PayloadRef,
    /// Host-reported timestamp (microseconds).
    pub time_stamp: i64,
    /// Frame opcode.
    pub op_code: OpCode,
    /// Final-fragment bit.
    pub fin_bit: bool,
    /// Mask bit.
    pub mask_bit: bool,
    /// When this consumer recorded the frame (RFC 3339).
    pub received_at: String,
}

/// Connection metadata from a `serverWebSocketOpened` event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelInfo {
    /// Final URI after redirects.
    pub effective_uri: String,
    /// Negotiated subprotocols.
    pub protocols: Vec<String>,
    /// Negotiated extensions.
    pub extensions: String,
    /// Close details, once the connection closed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<CloseInfo>,
}

/// Close details from a `serverWebSocketClosed` event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseInfo {
    /// Whether the close handshake completed cleanly.
    pub was_clean: bool,
    /// Close status code.
    pub code: u16,
    /// Close reason string.
    pub reason: String,
}

/// Direction filter for the frames list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameFilter {
    /// Show everything.
    #[default]
    All,
    /// Only page → server frames.
    Sent,
    /// Only server → page frames.
    Received,
}

impl FrameFilter {
    fn admits(self, direction: FrameDirection) -> bool {
        match self {
            Self::All => true,
            Self::Sent => direction == FrameDirection::Sent,
            Self::Received => direction == FrameDirection::Received,
        }
    }
}

/// Store mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameStoreAction {
    /// A request was selected: switch the current channel and reset the
    /// filter text for the new connection.
    SelectChannel(ChannelId),
    /// Append a frame to its channel's history.
    AddFrame(FrameEntry),
    /// Select a frame by index in the current channel (and open/close the
    /// details pane).
    SelectFrame {
        /// Index into the current channel's frame list; `None` deselects.
        index: Option<usize>,
        /// Whether the details pane opens with the selection.
        open: bool,
    },
    /// Show or hide the frame details pane.
    OpenFrameDetails(bool),
    /// Drop the current channel's frames, keeping everything else.
    ClearFrames,
    /// Switch the direction filter.
    ToggleFilter(FrameFilter),
    /// Set the payload filter text.
    SetFilterText(String),
}

/// The frames panel state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameStore {
    frames: HashMap<ChannelId, Vec<FrameEntry>>,
    channels: HashMap<ChannelId, ChannelInfo>,
    filter_text: String,
    filter: FrameFilter,
    selected: Option<usize>,
    details_open: bool,
    current_channel: Option<ChannelId>,
}

impl FrameStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one action.
    pub fn apply(&mut self, action: FrameStoreAction) {
        match action {
            FrameStoreAction::SelectChannel(channel) => {
                self.current_channel = Some(channel);
                self.filter_text = String::new();
            }
            FrameStoreAction::AddFrame(entry) => {
                self.frames
                    .entry(entry.channel_id.clone())
                    .or_default()
                    .push(entry);
            }
            FrameStoreAction::SelectFrame { index, open } => {
                self.selected = index;
                self.details_open = open;
            }
            FrameStoreAction::OpenFrameDetails(open) => {
                self.details_open = open;
            }
            FrameStoreAction::ClearFrames => {
                if let Some(channel) = &self.current_channel {
                    let _ = self.frames.remove(channel);
                }
                self.selected = None;
                self.details_open = false;
            }
            FrameStoreAction::ToggleFilter(filter) => {
                self.filter = filter;
            }
            FrameStoreAction::SetFilterText(text) => {
                self.filter_text = text;
            }
        }
    }

    /// Fold a relay event into the store. This is the event contract the
    /// relay's consumer implements: frame events are keyed by channel;
    /// close events carry no channel id and are attributed to the currently
    /// selected channel.
    pub fn ingest(&mut self, event: &RelayEvent) {
        match event {
            RelayEvent::WebSocketOpened {
                channel_id,
                effective_uri,
                protocols,
                extensions,
            } => {
                let _ = self.channels.insert(
                    channel_id.clone(),
                    ChannelInfo {
                        effective_uri: effective_uri.clone(),
                        protocols: protocols.clone(),
                        extensions: extensions.clone(),
                        close: None,
                    },
                );
            }
            RelayEvent::WebSocketClosed {
                was_clean,
                code,
                reason,
            } => {
                let Some(channel) = self.current_channel.clone() else {
                    debug!("close event with no selected channel, ignoring");
                    return;
                };
                if let Some(info) = self.channels.get_mut(&channel) {
                    info.close = Some(CloseInfo {
                        was_clean: *was_clean,
                        code: *code,
                        reason: reason.clone(),
                    });
                }
            }
            RelayEvent::FrameSent { channel_id, frame } => {
                self.apply(FrameStoreAction::AddFrame(FrameEntry {
                    channel_id: channel_id.clone(),
                    direction: FrameDirection::Sent,
                    payload: frame.payload.clone(),
                    time_stamp: frame.time_stamp,
                    op_code: frame.op_code,
                    fin_bit: frame.fin_bit,
                    mask_bit: frame.mask_bit,
                    received_at: chrono::Utc::now().to_rfc3339(),
                }));
            }
            RelayEvent::FrameReceived { channel_id, frame } => {
                self.apply(FrameStoreAction::AddFrame(FrameEntry {
                    channel_id: channel_id.clone(),
                    direction: FrameDirection::Received,
                    payload: frame.payload.clone(),
                    time_stamp: frame.time_stamp,
                    op_code: frame.op_code,
                    fin_bit: frame.fin_bit,
                    mask_bit: frame.mask_bit,
                    received_at: chrono::Utc::now().to_rfc3339(),
                }));
            }
        }
    }

    /// Frames of the current channel that pass the direction filter and a
    /// case-insensitive substring match on the payload preview.
    pub fn visible_frames(&self) -> Vec<&FrameEntry> {
        let Some(channel) = &self.current_channel else {
            return Vec::new();
        };
        let needle = self.filter_text.to_lowercase();
        self.frames
            .get(channel)
            .into_iter()
            .flatten()
            .filter(|entry| self.filter.admits(entry.direction))
            .filter(|entry| {
                needle.is_empty() || entry.payload.initial.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// All frames recorded for `channel`, unfiltered.
    pub fn channel_frames(&self, channel: &ChannelId) -> &[FrameEntry] {
        self.frames.get(channel).map_or(&[], Vec::as_slice)
    }

    /// Metadata for `channel`, if an open event was seen.
    pub fn channel_info(&self, channel: &ChannelId) -> Option<&ChannelInfo> {
        self.channels.get(channel)
    }

    /// The currently selected channel.
    pub fn current_channel(&self) -> Option<&ChannelId> {
        self.current_channel.as_ref()
    }

    /// The currently selected frame, resolved against the current channel.
    pub fn selected_frame(&self) -> Option<&FrameEntry> {
        let channel = self.current_channel.as_ref()?;
        self.frames.get(channel)?.get(self.selected?)
    }

    /// Whether the details pane is open.
    pub fn details_open(&self) -> bool {
        self.details_open
    }

    /// The active direction filter.
    pub fn filter(&self) -> FrameFilter {
        self.filter
    }

    /// The active payload filter text.
    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }
}
