//! Wire message catalog and shared data model.
//!
//! Every message crossing the event channel is a closed tagged union: the
//! `type` tag selects the variant and payload fields are camelCase, matching
//! what the browser client sends and expects. Payload validation happens here
//! at the boundary (via serde) so malformed input never reaches the room
//! state machine.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Identifiers
// ─────────────────────────────────────────────────────────────────────────────

/// Identifies a room. Absent or blank room codes resolve to the default room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// The well-known default room used when a join carries no room code.
    pub const DEFAULT: &'static str = "lobby";

    /// Resolves an optional room code to a `RoomId`.
    ///
    /// `None`, empty, and whitespace-only codes all map to the default room;
    /// anything else is taken verbatim (room codes are free-form strings).
    pub fn resolve(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            Some(c) if !c.is_empty() => Self(c.to_string()),
            _ => Self(Self::DEFAULT.to_string()),
        }
    }

    /// Returns the room code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies one connection to the event channel. Unique per connection;
/// two connections may share a username, but never a `ConnectionId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Wraps a connection identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Data Model
// ─────────────────────────────────────────────────────────────────────────────

/// The playback backend a track requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    /// Direct audio file, played by the host's native player.
    File,
    /// YouTube video, played through the embedded iframe player.
    Youtube,
    /// SoundCloud track, played through the embedded widget.
    Soundcloud,
}

/// One entry in a room's playback queue.
///
/// Immutable once created: queue commands remove or relocate items, never
/// mutate them in place. `queue[0]`, when present, is the currently playing
/// item - there is no separate "now playing" field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    pub kind: TrackKind,
    pub url: String,
    /// Username of the participant who enqueued the item. The owner is the
    /// only one authorized to pause/seek/skip it while it plays.
    pub owner_username: String,
    pub display_name: String,
}

/// A completed queue item retired into the room's history ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    #[serde(flatten)]
    pub item: QueueItem,
    /// Server timestamp (Unix millis) when the track ended.
    pub completed_at: u64,
}

/// Classification of a chat entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    /// Ordinary text message.
    #[default]
    Message,
    /// Emoji reaction.
    Reaction,
    /// Server-generated notice (joins, leaves).
    System,
}

/// One entry in a room's chat ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEntry {
    pub username: String,
    pub text: String,
    pub kind: ChatKind,
    /// The sender's assigned room color.
    pub color: String,
    /// Server timestamp (Unix millis).
    pub timestamp: u64,
}

/// Roster entry broadcast with `participants` events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub username: String,
    pub color: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Client → Server Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Commands a client may send over the event channel.
///
/// Anything that fails to deserialize into this union is dropped at the
/// boundary; room state never sees a malformed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ClientCommand {
    /// Joins a room under a display name. Must be the first command on a
    /// connection; everything before a successful join is ignored.
    Join {
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        room_code: Option<String>,
    },
    /// Shares a track (`positionMs == 0`: enqueue) or resumes the current
    /// one at a position (`positionMs > 0`, owner only).
    Play {
        kind: TrackKind,
        url: String,
        #[serde(default)]
        position_ms: u64,
        #[serde(default)]
        display_name: Option<String>,
    },
    /// Pauses the current track (owner only).
    Pause,
    /// Seeks within the current track (owner only).
    Seek {
        #[serde(default)]
        position_ms: u64,
    },
    /// Posts a chat message or reaction.
    ChatMessage {
        text: String,
        #[serde(default)]
        kind: ChatKind,
    },
    /// Removes a pending queue item the sender owns (`index >= 1`).
    QueueRemove { index: usize },
    /// Moves a pending queue item (both indices `>= 1`; any member may do this).
    QueueReorder { from_index: usize, to_index: usize },
    /// Advisory in-progress drag gesture, relayed to the rest of the room.
    QueueDrag { from_index: usize, hover_index: usize },
    /// Clears the advisory drag preview.
    QueueDragEnd,
    /// The sender's local player finished the current track (owner only).
    TrackEnded,
}

// ─────────────────────────────────────────────────────────────────────────────
// Server → Client Events
// ─────────────────────────────────────────────────────────────────────────────

/// Authoritative events the server emits.
///
/// All are room-wide broadcasts except `joined` (unicast to the new joiner)
/// and the drag relay pair (room minus sender).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Full room snapshot sent once to a joiner.
    Joined {
        username: String,
        room: String,
        queue: Vec<QueueItem>,
        history: Vec<HistoryItem>,
        chat: Vec<ChatEntry>,
    },
    /// Updated roster.
    Participants { participants: Vec<Participant> },
    /// Start or resume playback. `queue` is present when the event starts a
    /// new front item and absent for a pause-resume (the queue is untouched).
    Play {
        kind: TrackKind,
        url: String,
        position_ms: u64,
        /// Server wall-clock time at dispatch. Clients apply immediately when
        /// it is already in the past, otherwise wait out the delta.
        at_timestamp: u64,
        owner_username: String,
        display_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        queue: Option<Vec<QueueItem>>,
    },
    /// The owner paused the current track.
    Pause { owner_username: String },
    /// The owner sought within the current track.
    Seek {
        position_ms: u64,
        owner_username: String,
    },
    /// Authoritative queue snapshot after a pending-list mutation.
    Queue { queue: Vec<QueueItem> },
    /// The queue drained completely; clear the now-playing display.
    QueueEmpty,
    /// Updated history ring after a track retired.
    History { history: Vec<HistoryItem> },
    /// A chat entry was appended.
    Chat {
        #[serde(flatten)]
        entry: ChatEntry,
    },
    /// Another member's in-progress drag gesture (advisory, never state).
    QueueDrag { from_index: usize, hover_index: usize },
    /// Clear the advisory drag preview.
    QueueDragEnd,
}
