//! Room-internal state: roster, color assignment, and the bounded
//! history/chat rings.
//!
//! Mutated only through [`Room`](super::Room) under its command mutex, so no
//! interior synchronization is needed here.

use std::collections::{HashMap, VecDeque};

use crate::protocol::{
    ChatEntry, ChatKind, ConnectionId, HistoryItem, Participant, QueueItem,
};
use crate::room::queue::Queue;
use crate::utils::{now_millis, truncate_chars};

/// History ring capacity; oldest entries evicted first.
pub const HISTORY_CAP: usize = 50;

/// Chat ring capacity; oldest entries evicted first.
pub const CHAT_CAP: usize = 200;

/// Chat text is truncated to this many characters.
pub const CHAT_MAX_CHARS: usize = 500;

/// Fixed 16-entry username color palette. A username's color is assigned on
/// first join and stays stable for the room's lifetime.
pub const COLOR_PALETTE: [&str; 16] = [
    "#e6194b", "#3cb44b", "#ffe119", "#4363d8", "#f58231", "#911eb4", "#46f0f0", "#f032e6",
    "#bcf60c", "#fabebe", "#008080", "#e6beff", "#9a6324", "#fffac8", "#800000", "#aaffc3",
];

/// Color used for server-generated system chat entries.
pub const SYSTEM_COLOR: &str = "#999999";

/// All authoritative per-room state. Lives only while the room has at least
/// one connection; torn down wholesale when the roster empties.
pub struct RoomState {
    /// Roster in join order: connection id -> participant. Connection ids
    /// are unique; usernames may repeat across connections.
    participants: Vec<(ConnectionId, Participant)>,
    /// The playback queue; `queue[0]` is the now-playing item.
    pub queue: Queue,
    history: VecDeque<HistoryItem>,
    chat: VecDeque<ChatEntry>,
    /// username -> palette color, assigned once and never reassigned.
    colors: HashMap<String, String>,
    /// Connection currently broadcasting a drag preview, if any. Advisory
    /// bookkeeping only - used to cancel the preview when that member leaves.
    pub active_drag: Option<ConnectionId>,
}

impl RoomState {
    pub fn new() -> Self {
        Self {
            participants: Vec::new(),
            queue: Queue::new(),
            history: VecDeque::with_capacity(HISTORY_CAP),
            chat: VecDeque::with_capacity(64),
            colors: HashMap::new(),
            active_drag: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Roster & Colors
    // ─────────────────────────────────────────────────────────────────────────

    /// Registers a connection under a username, assigning (or reusing) the
    /// username's room color. Returns the roster entry.
    pub fn add_participant(&mut self, conn: ConnectionId, username: &str) -> Participant {
        let color = self.color_for(username);
        let participant = Participant {
            username: username.to_string(),
            color,
        };
        self.participants.push((conn, participant.clone()));
        participant
    }

    /// Removes a connection from the roster, returning its entry if present.
    pub fn remove_participant(&mut self, conn: &ConnectionId) -> Option<Participant> {
        let pos = self.participants.iter().position(|(id, _)| id == conn)?;
        Some(self.participants.remove(pos).1)
    }

    /// Looks up the username registered for a connection.
    pub fn username_of(&self, conn: &ConnectionId) -> Option<&str> {
        self.participants
            .iter()
            .find(|(id, _)| id == conn)
            .map(|(_, p)| p.username.as_str())
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Roster snapshot in join order.
    pub fn roster(&self) -> Vec<Participant> {
        self.participants.iter().map(|(_, p)| p.clone()).collect()
    }

    /// Returns the username's color, assigning the next palette entry if the
    /// username is unmapped. Assignment order follows join order; the
    /// palette wraps once all 16 entries are handed out.
    fn color_for(&mut self, username: &str) -> String {
        if let Some(color) = self.colors.get(username) {
            return color.clone();
        }
        let color = COLOR_PALETTE[self.colors.len() % COLOR_PALETTE.len()].to_string();
        self.colors.insert(username.to_string(), color.clone());
        color
    }

    /// The color assigned to a username, if any.
    pub fn color_of(&self, username: &str) -> Option<&str> {
        self.colors.get(username).map(String::as_str)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // History Ring
    // ─────────────────────────────────────────────────────────────────────────

    /// Retires a completed queue item into history, evicting the oldest
    /// entry past capacity.
    pub fn push_history(&mut self, item: QueueItem) {
        if self.history.len() == HISTORY_CAP {
            self.history.pop_front();
        }
        self.history.push_back(HistoryItem {
            item,
            completed_at: now_millis(),
        });
    }

    pub fn history_snapshot(&self) -> Vec<HistoryItem> {
        self.history.iter().cloned().collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Chat Ring
    // ─────────────────────────────────────────────────────────────────────────

    /// Appends a chat entry from a participant. Returns `None` for
    /// empty/whitespace text; longer text is truncated to
    /// [`CHAT_MAX_CHARS`] characters.
    pub fn push_chat(&mut self, username: &str, text: &str, kind: ChatKind) -> Option<ChatEntry> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let color = self
            .color_of(username)
            .unwrap_or(SYSTEM_COLOR)
            .to_string();
        let entry = ChatEntry {
            username: username.to_string(),
            text: truncate_chars(trimmed, CHAT_MAX_CHARS).to_string(),
            kind,
            color,
            timestamp: now_millis(),
        };
        self.append_chat(entry.clone());
        Some(entry)
    }

    /// Appends a server-generated system notice ("<user> joined the room").
    pub fn push_system_chat(&mut self, text: String) -> ChatEntry {
        let entry = ChatEntry {
            username: String::new(),
            text,
            kind: ChatKind::System,
            color: SYSTEM_COLOR.to_string(),
            timestamp: now_millis(),
        };
        self.append_chat(entry.clone());
        entry
    }

    fn append_chat(&mut self, entry: ChatEntry) {
        if self.chat.len() == CHAT_CAP {
            self.chat.pop_front();
        }
        self.chat.push_back(entry);
    }

    pub fn chat_snapshot(&self) -> Vec<ChatEntry> {
        self.chat.iter().cloned().collect()
    }

    #[cfg(test)]
    pub(crate) fn chat_len(&self) -> usize {
        self.chat.len()
    }

    #[cfg(test)]
    pub(crate) fn history_len(&self) -> usize {
        self.history.len()
    }
}

impl Default for RoomState {
    fn default() -> Self {
        Self::new()
    }
}
