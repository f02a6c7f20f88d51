//! Per-room authoritative state machine.
//!
//! A [`Room`] owns one roster/queue/chat/history set and a broadcast channel
//! its members' connection handlers subscribe to. Every command is applied
//! - and its resulting events sent - under the room's command mutex, so all
//! mutations for a room are serialized in arrival order and broadcast order
//! always matches mutation order. Cross-room operations never contend.
//!
//! Invalid commands (ownership violations, out-of-range indices, transport
//! control from non-owners) are silently ignored: no event is emitted and no
//! error is surfaced to the offending client. A debug log line keeps the
//! behavior observable without changing the wire contract.

mod queue;
mod state;
mod store;

pub use queue::{Enqueued, Queue};
pub use state::{RoomState, CHAT_CAP, CHAT_MAX_CHARS, COLOR_PALETTE, HISTORY_CAP};
pub use store::RoomStore;

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::classifier::TrackClassifier;
use crate::protocol::{
    ChatKind, ConnectionId, QueueItem, RoomId, ServerEvent, TrackKind,
};
use crate::scheduler;

/// Broadcast channel depth per room. Slow receivers lag rather than block
/// the room's single writer.
const ROOM_CHANNEL_CAPACITY: usize = 256;

/// An event fanned out to a room's connection handlers.
///
/// `exclude` implements the drag-relay's room-minus-sender delivery: each
/// handler drops messages whose `exclude` matches its own connection id.
#[derive(Debug, Clone)]
pub struct RoomOutbound {
    pub exclude: Option<ConnectionId>,
    pub event: ServerEvent,
}

/// One room: id, state, and its broadcast fan-out.
pub struct Room {
    id: RoomId,
    state: Mutex<RoomState>,
    tx: broadcast::Sender<RoomOutbound>,
    classifier: Arc<dyn TrackClassifier>,
}

impl Room {
    pub(crate) fn new(id: RoomId, classifier: Arc<dyn TrackClassifier>) -> Self {
        let (tx, _) = broadcast::channel(ROOM_CHANNEL_CAPACITY);
        Self {
            id,
            state: Mutex::new(RoomState::new()),
            tx,
            classifier,
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// Subscribes to the room's event fan-out. Subscribe *before* issuing the
    /// join command so the joiner sees its own roster broadcast.
    pub fn subscribe(&self) -> broadcast::Receiver<RoomOutbound> {
        self.tx.subscribe()
    }

    pub fn participant_count(&self) -> usize {
        self.state.lock().participant_count()
    }

    fn broadcast(&self, event: ServerEvent) {
        let _ = self.tx.send(RoomOutbound {
            exclude: None,
            event,
        });
    }

    fn broadcast_except(&self, exclude: &ConnectionId, event: ServerEvent) {
        let _ = self.tx.send(RoomOutbound {
            exclude: Some(exclude.clone()),
            event,
        });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Membership
    // ─────────────────────────────────────────────────────────────────────────

    /// Registers a connection under a display name.
    ///
    /// Broadcasts the updated roster and a system chat notice to the room,
    /// and returns the full snapshot event for unicast to the joiner only.
    /// The notice is already in the snapshot's chat ring, so its broadcast
    /// excludes the joiner (who subscribed before joining).
    pub fn join(&self, conn: ConnectionId, username: &str) -> ServerEvent {
        let mut state = self.state.lock();
        state.add_participant(conn.clone(), username);
        log::info!("[Room:{}] {} joined", self.id, username);

        let notice = state.push_system_chat(format!("{} joined the room", username));
        let snapshot = ServerEvent::Joined {
            username: username.to_string(),
            room: self.id.as_str().to_string(),
            queue: state.queue.snapshot(),
            history: state.history_snapshot(),
            chat: state.chat_snapshot(),
        };
        self.broadcast(ServerEvent::Participants {
            participants: state.roster(),
        });
        self.broadcast_except(&conn, ServerEvent::Chat { entry: notice });
        snapshot
    }

    /// Removes a connection from the room.
    ///
    /// If the connection owned the playing front item, the queue advances
    /// exactly as in the track-ended transition. Any in-flight drag preview
    /// from the leaver is cancelled. Returns `true` when the room is now
    /// empty (the caller discards the room).
    pub fn leave(&self, conn: &ConnectionId) -> bool {
        let mut state = self.state.lock();
        let Some(participant) = state.remove_participant(conn) else {
            return state.participant_count() == 0;
        };
        log::info!("[Room:{}] {} left", self.id, participant.username);

        if state.active_drag.as_ref() == Some(conn) {
            state.active_drag = None;
            self.broadcast_except(conn, ServerEvent::QueueDragEnd);
        }

        if state.queue.front_owned_by(&participant.username) {
            if let Some(retired) = state.queue.advance(&participant.username) {
                self.retire_locked(&mut state, retired);
            }
        }

        if state.participant_count() == 0 {
            return true;
        }

        let notice = state.push_system_chat(format!("{} left the room", participant.username));
        self.broadcast(ServerEvent::Participants {
            participants: state.roster(),
        });
        self.broadcast(ServerEvent::Chat { entry: notice });
        false
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Chat
    // ─────────────────────────────────────────────────────────────────────────

    /// Appends a chat message or reaction from a participant and broadcasts
    /// it. Empty text is rejected; long text is truncated; the `system` kind
    /// is reserved for the server and coerced to `message`.
    pub fn post_chat(&self, conn: &ConnectionId, text: &str, kind: ChatKind) {
        let kind = match kind {
            ChatKind::System => ChatKind::Message,
            other => other,
        };
        let mut state = self.state.lock();
        let Some(username) = state.username_of(conn).map(str::to_string) else {
            return;
        };
        if let Some(entry) = state.push_chat(&username, text, kind) {
            self.broadcast(ServerEvent::Chat { entry });
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Playback & Queue
    // ─────────────────────────────────────────────────────────────────────────

    /// Handles a `play` command: enqueue when `position_ms == 0`, resume of
    /// the current track otherwise (owner only).
    pub fn play(
        &self,
        conn: &ConnectionId,
        kind: TrackKind,
        url: String,
        position_ms: u64,
        display_name: Option<String>,
    ) {
        let mut state = self.state.lock();
        let Some(username) = state.username_of(conn).map(str::to_string) else {
            return;
        };

        if position_ms > 0 {
            // Resume: forwarded verbatim with a fresh stamp; queue untouched
            if !state.queue.front_owned_by(&username) {
                log::debug!("[Room:{}] resume from non-owner {} ignored", self.id, username);
                return;
            }
            let display_name =
                display_name.unwrap_or_else(|| self.classifier.classify(&url).display_name);
            self.broadcast(scheduler::resume_event(
                kind,
                url,
                position_ms,
                username,
                display_name,
            ));
            return;
        }

        let display_name =
            display_name.unwrap_or_else(|| self.classifier.classify(&url).display_name);
        let item = QueueItem {
            kind,
            url,
            owner_username: username,
            display_name,
        };
        match state.queue.enqueue(item.clone()) {
            Enqueued::Started => {
                self.broadcast(scheduler::start_event(&item, state.queue.snapshot()));
            }
            Enqueued::Appended => {
                self.broadcast(ServerEvent::Queue {
                    queue: state.queue.snapshot(),
                });
            }
        }
    }

    /// Pauses the current track. Owner only; otherwise silently ignored.
    pub fn pause(&self, conn: &ConnectionId) {
        let state = self.state.lock();
        let Some(username) = state.username_of(conn) else {
            return;
        };
        if !state.queue.front_owned_by(username) {
            log::debug!("[Room:{}] pause from non-owner {} ignored", self.id, username);
            return;
        }
        self.broadcast(ServerEvent::Pause {
            owner_username: username.to_string(),
        });
    }

    /// Seeks within the current track. Owner only; otherwise silently ignored.
    pub fn seek(&self, conn: &ConnectionId, position_ms: u64) {
        let state = self.state.lock();
        let Some(username) = state.username_of(conn) else {
            return;
        };
        if !state.queue.front_owned_by(username) {
            log::debug!("[Room:{}] seek from non-owner {} ignored", self.id, username);
            return;
        }
        self.broadcast(ServerEvent::Seek {
            position_ms,
            owner_username: username.to_string(),
        });
    }

    /// Removes a pending queue item the sender owns.
    pub fn queue_remove(&self, conn: &ConnectionId, index: usize) {
        let mut state = self.state.lock();
        let Some(username) = state.username_of(conn).map(str::to_string) else {
            return;
        };
        if state.queue.remove(index, &username) {
            self.broadcast(ServerEvent::Queue {
                queue: state.queue.snapshot(),
            });
        } else {
            log::debug!("[Room:{}] remove({}) by {} ignored", self.id, index, username);
        }
    }

    /// Moves a pending queue item. Any member may reorder the pending list.
    pub fn queue_reorder(&self, conn: &ConnectionId, from: usize, to: usize) {
        let mut state = self.state.lock();
        if state.username_of(conn).is_none() {
            return;
        }
        if state.queue.reorder(from, to) {
            self.broadcast(ServerEvent::Queue {
                queue: state.queue.snapshot(),
            });
        } else {
            log::debug!("[Room:{}] reorder({}, {}) ignored", self.id, from, to);
        }
    }

    /// The sender's player finished the current track. Owner only.
    ///
    /// Moves the front into history and either starts the next item or
    /// signals an empty queue so clients clear the now-playing display
    /// rather than wait.
    pub fn track_ended(&self, conn: &ConnectionId) {
        let mut state = self.state.lock();
        let Some(username) = state.username_of(conn).map(str::to_string) else {
            return;
        };
        let Some(retired) = state.queue.advance(&username) else {
            log::debug!("[Room:{}] track_ended from non-owner {} ignored", self.id, username);
            return;
        };
        self.retire_locked(&mut state, retired);
    }

    /// Shared track-ended transition: history update, then next-track start
    /// or the explicit queue-empty signal. Caller holds the state lock and
    /// has already popped the front.
    fn retire_locked(&self, state: &mut RoomState, retired: QueueItem) {
        log::info!("[Room:{}] track ended: {}", self.id, retired.display_name);
        state.push_history(retired);
        self.broadcast(ServerEvent::History {
            history: state.history_snapshot(),
        });
        match state.queue.front() {
            Some(next) => {
                self.broadcast(scheduler::start_event(next, state.queue.snapshot()));
            }
            None => self.broadcast(ServerEvent::QueueEmpty),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Drag Preview Relay
    // ─────────────────────────────────────────────────────────────────────────

    /// Relays an in-progress drag gesture to every other member. Purely
    /// advisory: carries no consistency guarantee with the committed order
    /// and never mutates the queue.
    pub fn queue_drag(&self, conn: &ConnectionId, from_index: usize, hover_index: usize) {
        let mut state = self.state.lock();
        if state.username_of(conn).is_none() {
            return;
        }
        state.active_drag = Some(conn.clone());
        self.broadcast_except(
            conn,
            ServerEvent::QueueDrag {
                from_index,
                hover_index,
            },
        );
    }

    /// Clears the drag preview on every other member's display.
    pub fn queue_drag_end(&self, conn: &ConnectionId) {
        let mut state = self.state.lock();
        if state.username_of(conn).is_none() {
            return;
        }
        if state.active_drag.as_ref() == Some(conn) {
            state.active_drag = None;
        }
        self.broadcast_except(conn, ServerEvent::QueueDragEnd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::BasicClassifier;
    use tokio::sync::broadcast::error::TryRecvError;

    fn room() -> Room {
        Room::new(RoomId::resolve(Some("test")), Arc::new(BasicClassifier))
    }

    fn conn(n: u32) -> ConnectionId {
        ConnectionId::new(format!("ws-{}", n))
    }

    /// Drains every pending outbound event from a receiver.
    fn drain(rx: &mut broadcast::Receiver<RoomOutbound>) -> Vec<RoomOutbound> {
        let mut out = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(msg) => out.push(msg),
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                Err(TryRecvError::Lagged(_)) => continue,
            }
        }
        out
    }

    fn events(rx: &mut broadcast::Receiver<RoomOutbound>) -> Vec<ServerEvent> {
        drain(rx).into_iter().map(|o| o.event).collect()
    }

    fn play_file(room: &Room, conn: &ConnectionId, url: &str) {
        room.play(conn, TrackKind::File, url.to_string(), 0, None);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Join / Leave
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn join_returns_snapshot_and_broadcasts_roster() {
        let room = room();
        let mut rx = room.subscribe();
        let snapshot = room.join(conn(1), "ada");

        match snapshot {
            ServerEvent::Joined { username, room, .. } => {
                assert_eq!(username, "ada");
                assert_eq!(room, "test");
            }
            other => panic!("unexpected snapshot: {:?}", other),
        }

        let evs = events(&mut rx);
        assert!(matches!(&evs[0], ServerEvent::Participants { participants } if participants.len() == 1));
        assert!(
            matches!(&evs[1], ServerEvent::Chat { entry } if entry.text == "ada joined the room")
        );
    }

    #[test]
    fn join_notice_reaches_the_joiner_exactly_once() {
        // The joiner subscribes before joining; the notice is already in the
        // snapshot's chat, so its broadcast must skip the joiner.
        let room = room();
        let mut rx = room.subscribe();
        let snapshot = room.join(conn(1), "ada");

        match snapshot {
            ServerEvent::Joined { chat, .. } => {
                let notices = chat.iter().filter(|e| e.text == "ada joined the room").count();
                assert_eq!(notices, 1);
            }
            other => panic!("unexpected snapshot: {:?}", other),
        }

        let out = drain(&mut rx);
        let notice = out
            .iter()
            .find(|o| matches!(&o.event, ServerEvent::Chat { entry } if entry.text == "ada joined the room"))
            .expect("join notice broadcast");
        assert_eq!(notice.exclude, Some(conn(1)));
    }

    #[test]
    fn joiner_snapshot_includes_existing_queue_and_chat() {
        let room = room();
        room.join(conn(1), "ada");
        play_file(&room, &conn(1), "https://example.com/a.mp3");
        room.post_chat(&conn(1), "hello", ChatKind::Message);

        match room.join(conn(2), "brin") {
            ServerEvent::Joined { queue, chat, .. } => {
                assert_eq!(queue.len(), 1);
                // join notice + hello + brin's own join notice
                assert!(chat.iter().any(|e| e.text == "hello"));
            }
            other => panic!("unexpected snapshot: {:?}", other),
        }
    }

    #[test]
    fn leave_broadcasts_roster_and_notice_when_members_remain() {
        let room = room();
        room.join(conn(1), "ada");
        room.join(conn(2), "brin");
        let mut rx = room.subscribe();

        assert!(!room.leave(&conn(2)));
        let evs = events(&mut rx);
        assert!(matches!(&evs[0], ServerEvent::Participants { participants } if participants.len() == 1));
        assert!(
            matches!(&evs[1], ServerEvent::Chat { entry } if entry.text == "brin left the room")
        );
    }

    #[test]
    fn last_leave_reports_room_empty() {
        let room = room();
        room.join(conn(1), "ada");
        assert!(room.leave(&conn(1)));
    }

    #[test]
    fn owner_leaving_advances_queue_like_track_ended() {
        // Scenario 5: A disconnects while owning queue[0] with others present
        let room = room();
        room.join(conn(1), "ada");
        room.join(conn(2), "brin");
        play_file(&room, &conn(1), "https://example.com/a.mp3");
        play_file(&room, &conn(2), "https://example.com/b.mp3");

        let mut rx = room.subscribe();
        assert!(!room.leave(&conn(1)));

        let evs = events(&mut rx);
        assert!(matches!(&evs[0], ServerEvent::History { history } if history.len() == 1));
        match &evs[1] {
            ServerEvent::Play { url, owner_username, .. } => {
                assert_eq!(url, "https://example.com/b.mp3");
                assert_eq!(owner_username, "brin");
            }
            other => panic!("expected play for next track, got {:?}", other),
        }
        assert!(
            matches!(&evs[3], ServerEvent::Chat { entry } if entry.text == "ada left the room")
        );
    }

    #[test]
    fn leaver_in_flight_drag_is_cancelled_for_others() {
        let room = room();
        room.join(conn(1), "ada");
        room.join(conn(2), "brin");
        play_file(&room, &conn(1), "https://example.com/a.mp3");
        play_file(&room, &conn(1), "https://example.com/b.mp3");
        play_file(&room, &conn(1), "https://example.com/c.mp3");
        room.queue_drag(&conn(2), 1, 2);

        let mut rx = room.subscribe();
        room.leave(&conn(2));

        let out = drain(&mut rx);
        assert!(matches!(out[0].event, ServerEvent::QueueDragEnd));
        assert_eq!(out[0].exclude, Some(conn(2)));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Playback Scenarios
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn enqueue_into_empty_room_broadcasts_immediate_play() {
        // Scenario 1
        let room = room();
        room.join(conn(1), "ada");
        let mut rx = room.subscribe();
        play_file(&room, &conn(1), "https://example.com/a.mp3");

        let evs = events(&mut rx);
        match &evs[0] {
            ServerEvent::Play {
                position_ms,
                queue,
                owner_username,
                ..
            } => {
                assert_eq!(*position_ms, 0);
                assert_eq!(owner_username, "ada");
                assert_eq!(queue.as_ref().unwrap().len(), 1);
            }
            other => panic!("expected play, got {:?}", other),
        }
    }

    #[test]
    fn enqueue_into_playing_room_broadcasts_queue_only() {
        // Scenario 2
        let room = room();
        room.join(conn(1), "ada");
        room.join(conn(2), "brin");
        play_file(&room, &conn(1), "https://example.com/a.mp3");

        let mut rx = room.subscribe();
        play_file(&room, &conn(2), "https://example.com/b.mp3");

        let evs = events(&mut rx);
        assert_eq!(evs.len(), 1);
        assert!(matches!(&evs[0], ServerEvent::Queue { queue } if queue.len() == 2));
    }

    #[test]
    fn track_ended_retires_front_and_starts_next() {
        // Scenario 3
        let room = room();
        room.join(conn(1), "ada");
        room.join(conn(2), "brin");
        play_file(&room, &conn(1), "https://example.com/a.mp3");
        play_file(&room, &conn(2), "https://example.com/b.mp3");

        let mut rx = room.subscribe();
        room.track_ended(&conn(1));

        let evs = events(&mut rx);
        assert!(matches!(&evs[0], ServerEvent::History { history }
            if history[0].item.url == "https://example.com/a.mp3"));
        assert!(matches!(&evs[1], ServerEvent::Play { url, .. }
            if url == "https://example.com/b.mp3"));
    }

    #[test]
    fn track_ended_on_last_item_signals_queue_empty() {
        let room = room();
        room.join(conn(1), "ada");
        play_file(&room, &conn(1), "https://example.com/a.mp3");

        let mut rx = room.subscribe();
        room.track_ended(&conn(1));

        let evs = events(&mut rx);
        assert!(matches!(evs[0], ServerEvent::History { .. }));
        assert!(matches!(evs[1], ServerEvent::QueueEmpty));
    }

    #[test]
    fn track_ended_from_non_owner_is_ignored() {
        let room = room();
        room.join(conn(1), "ada");
        room.join(conn(2), "brin");
        play_file(&room, &conn(1), "https://example.com/a.mp3");

        let mut rx = room.subscribe();
        room.track_ended(&conn(2));
        assert!(events(&mut rx).is_empty());
    }

    #[test]
    fn remove_of_front_is_ignored() {
        // Scenario 4
        let room = room();
        room.join(conn(1), "ada");
        room.join(conn(2), "brin");
        play_file(&room, &conn(1), "https://example.com/a.mp3");

        let mut rx = room.subscribe();
        room.queue_remove(&conn(2), 0);
        assert!(events(&mut rx).is_empty());
    }

    #[test]
    fn pause_and_seek_gated_on_front_ownership() {
        let room = room();
        room.join(conn(1), "ada");
        room.join(conn(2), "brin");
        play_file(&room, &conn(1), "https://example.com/a.mp3");

        let mut rx = room.subscribe();
        room.pause(&conn(2));
        room.seek(&conn(2), 10_000);
        assert!(events(&mut rx).is_empty());

        room.pause(&conn(1));
        room.seek(&conn(1), 10_000);
        let evs = events(&mut rx);
        assert!(matches!(&evs[0], ServerEvent::Pause { owner_username } if owner_username == "ada"));
        assert!(matches!(&evs[1], ServerEvent::Seek { position_ms, .. } if *position_ms == 10_000));
    }

    #[test]
    fn resume_rebroadcasts_with_fresh_stamp_and_no_queue() {
        let room = room();
        room.join(conn(1), "ada");
        play_file(&room, &conn(1), "https://example.com/a.mp3");

        let mut rx = room.subscribe();
        room.play(
            &conn(1),
            TrackKind::File,
            "https://example.com/a.mp3".into(),
            42_000,
            Some("a".into()),
        );

        let evs = events(&mut rx);
        match &evs[0] {
            ServerEvent::Play {
                position_ms, queue, ..
            } => {
                assert_eq!(*position_ms, 42_000);
                assert!(queue.is_none());
            }
            other => panic!("expected resume play, got {:?}", other),
        }
    }

    #[test]
    fn resume_from_non_owner_is_ignored() {
        let room = room();
        room.join(conn(1), "ada");
        room.join(conn(2), "brin");
        play_file(&room, &conn(1), "https://example.com/a.mp3");

        let mut rx = room.subscribe();
        room.play(
            &conn(2),
            TrackKind::File,
            "https://example.com/a.mp3".into(),
            42_000,
            None,
        );
        assert!(events(&mut rx).is_empty());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Chat
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn chat_broadcasts_with_sender_color() {
        let room = room();
        room.join(conn(1), "ada");
        let mut rx = room.subscribe();
        room.post_chat(&conn(1), "hello", ChatKind::Message);

        let evs = events(&mut rx);
        match &evs[0] {
            ServerEvent::Chat { entry } => {
                assert_eq!(entry.username, "ada");
                assert_eq!(entry.color, COLOR_PALETTE[0]);
            }
            other => panic!("expected chat, got {:?}", other),
        }
    }

    #[test]
    fn client_supplied_system_kind_is_coerced() {
        let room = room();
        room.join(conn(1), "ada");
        let mut rx = room.subscribe();
        room.post_chat(&conn(1), "fake notice", ChatKind::System);

        match &events(&mut rx)[0] {
            ServerEvent::Chat { entry } => assert_eq!(entry.kind, ChatKind::Message),
            other => panic!("expected chat, got {:?}", other),
        }
    }

    #[test]
    fn commands_from_unjoined_connections_are_ignored() {
        let room = room();
        room.join(conn(1), "ada");
        let mut rx = room.subscribe();

        let ghost = conn(9);
        room.post_chat(&ghost, "hi", ChatKind::Message);
        play_file(&room, &ghost, "https://example.com/x.mp3");
        room.pause(&ghost);
        room.queue_drag(&ghost, 1, 2);

        assert!(events(&mut rx).is_empty());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Drag Relay
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn drag_relay_excludes_sender_and_never_mutates_queue() {
        let room = room();
        room.join(conn(1), "ada");
        play_file(&room, &conn(1), "https://example.com/a.mp3");
        play_file(&room, &conn(1), "https://example.com/b.mp3");
        play_file(&room, &conn(1), "https://example.com/c.mp3");

        let mut rx = room.subscribe();
        room.queue_drag(&conn(1), 1, 2);
        room.queue_drag_end(&conn(1));

        let out = drain(&mut rx);
        assert_eq!(out.len(), 2);
        assert!(matches!(out[0].event, ServerEvent::QueueDrag { from_index: 1, hover_index: 2 }));
        assert_eq!(out[0].exclude, Some(conn(1)));
        assert!(matches!(out[1].event, ServerEvent::QueueDragEnd));

        // Committing is the separate reorder command; the relay changed nothing
        let mut rx2 = room.subscribe();
        room.queue_reorder(&conn(1), 1, 2);
        assert!(matches!(&events(&mut rx2)[0], ServerEvent::Queue { queue }
            if queue[1].url == "https://example.com/c.mp3"));
    }
}
