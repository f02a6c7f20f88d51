//! Client synchronizer: turns authoritative server events into playback
//! calls and user gestures into outbound commands.
//!
//! The core hazard is lag: a scheduled play may still be pending when the
//! next one arrives. Every inbound `play` bumps a track generation counter,
//! and the scheduled application re-checks the counter at fire time and
//! drops itself if stale, so a late event can never clobber a newer track.
//! Position polling (for embeds, which report completion unreliably) is
//! likewise torn down and restarted per generation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::classifier::TrackClassifier;
use crate::client::backends::BackendSet;
use crate::client::playable::{BackendNotice, Playable, PlayerResult};
use crate::protocol::{
    ChatEntry, ChatKind, ClientCommand, HistoryItem, Participant, QueueItem, ServerEvent,
    TrackKind,
};
use crate::utils::now_millis;

/// Embed widgets are polled for position at this cadence while active.
pub const EMBED_POLL_INTERVAL: Duration = Duration::from_millis(300);

/// What the room is currently playing, mirrored for the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub struct NowPlaying {
    pub kind: TrackKind,
    pub url: String,
    pub display_name: String,
    pub owner_username: String,
}

/// Drives local playback from server events.
///
/// One per connection. The host feeds inbound [`ServerEvent`]s to
/// [`handle_event`](Self::handle_event), sends everything appearing on the
/// outbound channel to the server, and renders the watch mirrors.
pub struct ClientSynchronizer {
    username: String,
    backends: Arc<BackendSet>,
    classifier: Arc<dyn TrackClassifier>,
    outbound: mpsc::UnboundedSender<ClientCommand>,
    /// Bumped on every track switch; stale scheduled actions check it and
    /// drop themselves.
    generation: Arc<AtomicU64>,
    /// Cancels the running embed position poll, if any.
    poll_cancel: Mutex<Option<CancellationToken>>,
    /// Local output volume; applied to whichever backend is active.
    volume: Mutex<u8>,

    // UI mirrors
    now_playing_tx: watch::Sender<Option<NowPlaying>>,
    queue_tx: watch::Sender<Vec<QueueItem>>,
    history_tx: watch::Sender<Vec<HistoryItem>>,
    chat_tx: watch::Sender<Vec<ChatEntry>>,
    participants_tx: watch::Sender<Vec<Participant>>,
    /// `(from_index, hover_index)` of another member's in-progress drag.
    drag_preview_tx: watch::Sender<Option<(usize, usize)>>,
}

impl ClientSynchronizer {
    pub fn new(
        username: impl Into<String>,
        backends: Arc<BackendSet>,
        classifier: Arc<dyn TrackClassifier>,
        outbound: mpsc::UnboundedSender<ClientCommand>,
    ) -> Arc<Self> {
        Arc::new(Self {
            username: username.into(),
            backends,
            classifier,
            outbound,
            generation: Arc::new(AtomicU64::new(0)),
            poll_cancel: Mutex::new(None),
            volume: Mutex::new(100),
            now_playing_tx: watch::Sender::new(None),
            queue_tx: watch::Sender::new(Vec::new()),
            history_tx: watch::Sender::new(Vec::new()),
            chat_tx: watch::Sender::new(Vec::new()),
            participants_tx: watch::Sender::new(Vec::new()),
            drag_preview_tx: watch::Sender::new(None),
        })
    }

    /// Spawns the task that reacts to backend notices. The host wires the
    /// matching sender into its backends.
    pub fn spawn_notice_task(
        self: &Arc<Self>,
        mut notices: mpsc::UnboundedReceiver<BackendNotice>,
    ) {
        let sync = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(notice) = notices.recv().await {
                match notice {
                    BackendNotice::Finished => sync.on_track_finished(),
                }
            }
        });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // UI Mirrors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn now_playing(&self) -> watch::Receiver<Option<NowPlaying>> {
        self.now_playing_tx.subscribe()
    }

    pub fn queue(&self) -> watch::Receiver<Vec<QueueItem>> {
        self.queue_tx.subscribe()
    }

    pub fn history(&self) -> watch::Receiver<Vec<HistoryItem>> {
        self.history_tx.subscribe()
    }

    pub fn chat(&self) -> watch::Receiver<Vec<ChatEntry>> {
        self.chat_tx.subscribe()
    }

    pub fn participants(&self) -> watch::Receiver<Vec<Participant>> {
        self.participants_tx.subscribe()
    }

    pub fn drag_preview(&self) -> watch::Receiver<Option<(usize, usize)>> {
        self.drag_preview_tx.subscribe()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inbound Events
    // ─────────────────────────────────────────────────────────────────────────

    /// Applies one authoritative server event.
    pub async fn handle_event(self: &Arc<Self>, event: ServerEvent) {
        match event {
            ServerEvent::Joined {
                queue,
                history,
                chat,
                ..
            } => {
                self.queue_tx.send_replace(queue);
                self.history_tx.send_replace(history);
                self.chat_tx.send_replace(chat);
            }
            ServerEvent::Participants { participants } => {
                self.participants_tx.send_replace(participants);
            }
            ServerEvent::Play {
                kind,
                url,
                position_ms,
                at_timestamp,
                owner_username,
                display_name,
                queue,
            } => {
                if let Some(queue) = queue {
                    self.queue_tx.send_replace(queue);
                }
                self.now_playing_tx.send_replace(Some(NowPlaying {
                    kind,
                    url: url.clone(),
                    display_name,
                    owner_username,
                }));
                self.schedule_play(kind, url, position_ms, at_timestamp).await;
            }
            ServerEvent::Pause { .. } => {
                if let Some((_, backend)) = self.backends.active().await {
                    if let Err(e) = backend.pause().await {
                        log::warn!("[Sync] Pause failed: {}", e);
                    }
                }
            }
            ServerEvent::Seek { position_ms, .. } => {
                if let Some((_, backend)) = self.backends.active().await {
                    if let Err(e) = backend.seek_to(position_ms).await {
                        log::warn!("[Sync] Seek failed: {}", e);
                    }
                }
            }
            ServerEvent::Queue { queue } => {
                self.queue_tx.send_replace(queue);
            }
            ServerEvent::QueueEmpty => {
                self.generation.fetch_add(1, Ordering::SeqCst);
                self.cancel_poll();
                self.now_playing_tx.send_replace(None);
                self.queue_tx.send_replace(Vec::new());
                if let Err(e) = self.backends.stop_active().await {
                    log::warn!("[Sync] Stop failed: {}", e);
                }
            }
            ServerEvent::History { history } => {
                self.history_tx.send_replace(history);
            }
            ServerEvent::Chat { entry } => {
                self.chat_tx.send_modify(|chat| chat.push(entry));
            }
            ServerEvent::QueueDrag {
                from_index,
                hover_index,
            } => {
                self.drag_preview_tx.send_replace(Some((from_index, hover_index)));
            }
            ServerEvent::QueueDragEnd => {
                self.drag_preview_tx.send_replace(None);
            }
        }
    }

    /// Tears down the current track and schedules the new one at its stamp.
    async fn schedule_play(
        self: &Arc<Self>,
        kind: TrackKind,
        url: String,
        position_ms: u64,
        at_timestamp: u64,
    ) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.cancel_poll();
        if let Err(e) = self.backends.stop_active().await {
            log::warn!("[Sync] Stop before switch failed: {}", e);
        }

        let sync = Arc::clone(self);
        tokio::spawn(async move {
            let now = now_millis();
            if at_timestamp > now {
                tokio::time::sleep(Duration::from_millis(at_timestamp - now)).await;
            }
            // Re-check at fire time: a newer play may have superseded us
            if sync.generation.load(Ordering::SeqCst) != generation {
                log::debug!("[Sync] Dropping stale scheduled play for {}", url);
                return;
            }
            if let Err(e) = sync.apply_play(generation, kind, &url, position_ms).await {
                log::warn!("[Sync] Failed to start {}: {}", url, e);
            }
        });
    }

    /// Switches backends, loads, applies local volume, plays, and starts the
    /// position poll when the backend needs one.
    async fn apply_play(
        self: &Arc<Self>,
        generation: u64,
        kind: TrackKind,
        url: &str,
        position_ms: u64,
    ) -> PlayerResult<()> {
        let backend = self.backends.activate(kind).await?;
        backend.load(url, position_ms).await?;
        let volume = *self.volume.lock();
        backend.set_volume(volume).await?;
        backend.play().await?;
        if backend.needs_position_poll() {
            self.start_poll(generation, backend);
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Embed Position Poll
    // ─────────────────────────────────────────────────────────────────────────

    /// Polls an embed backend until cancellation, a generation change, or
    /// track completion (position reaching a known duration).
    fn start_poll(self: &Arc<Self>, generation: u64, backend: Arc<dyn Playable>) {
        let token = CancellationToken::new();
        if let Some(previous) = self.poll_cancel.lock().replace(token.clone()) {
            previous.cancel();
        }

        let sync = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticks = tokio::time::interval(EMBED_POLL_INTERVAL);
            ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            ticks.tick().await; // immediate first tick
            loop {
                tokio::select! {
                    _ = token.cancelled() => return,
                    _ = ticks.tick() => {}
                }
                if sync.generation.load(Ordering::SeqCst) != generation {
                    return;
                }
                let (position, duration) =
                    match (backend.position_ms().await, backend.duration_ms().await) {
                        (Ok(p), Ok(d)) => (p, d),
                        _ => continue, // widget not ready yet
                    };
                if let Some(duration) = duration {
                    if duration > 0 && position >= duration {
                        sync.on_track_finished();
                        return;
                    }
                }
            }
        });
    }

    fn cancel_poll(&self) {
        if let Some(token) = self.poll_cancel.lock().take() {
            token.cancel();
        }
    }

    /// The local player finished the track. Only the owner reports it; the
    /// server ignores everyone else anyway, but not sending avoids N-1
    /// redundant commands per track.
    fn on_track_finished(&self) {
        let owner = self
            .now_playing_tx
            .borrow()
            .as_ref()
            .map(|np| np.owner_username == self.username)
            .unwrap_or(false);
        if owner {
            self.send(ClientCommand::TrackEnded);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Gestures
    // ─────────────────────────────────────────────────────────────────────────

    fn send(&self, cmd: ClientCommand) {
        if self.outbound.send(cmd).is_err() {
            log::warn!("[Sync] Outbound channel closed");
        }
    }

    /// Shares a URL with the room: classify locally, then ask the server to
    /// enqueue it.
    pub fn share_url(&self, url: &str) {
        let source = self.classifier.classify(url);
        self.send(ClientCommand::Play {
            kind: source.kind,
            url: url.to_string(),
            position_ms: 0,
            display_name: Some(source.display_name),
        });
    }

    pub fn pause_clicked(&self) {
        self.send(ClientCommand::Pause);
    }

    /// Resume after a pause: re-share the current track at the local
    /// position. Clamped to at least 1ms because `positionMs == 0` means
    /// "enqueue", not "resume from the top".
    pub async fn resume_clicked(&self) {
        let Some(now_playing) = self.now_playing_tx.borrow().clone() else {
            return;
        };
        let position = match self.backends.active().await {
            Some((_, backend)) => backend.position_ms().await.unwrap_or(0),
            None => 0,
        };
        self.send(ClientCommand::Play {
            kind: now_playing.kind,
            url: now_playing.url,
            position_ms: position.max(1),
            display_name: Some(now_playing.display_name),
        });
    }

    pub fn seek_to(&self, position_ms: u64) {
        self.send(ClientCommand::Seek { position_ms });
    }

    /// Local volume only; never crosses the wire.
    pub async fn set_volume(&self, volume: u8) {
        let volume = volume.min(100);
        *self.volume.lock() = volume;
        if let Some((_, backend)) = self.backends.active().await {
            if let Err(e) = backend.set_volume(volume).await {
                log::warn!("[Sync] Volume change failed: {}", e);
            }
        }
    }

    pub fn send_chat(&self, text: &str) {
        self.send(ClientCommand::ChatMessage {
            text: text.to_string(),
            kind: ChatKind::Message,
        });
    }

    pub fn send_reaction(&self, emoji: &str) {
        self.send(ClientCommand::ChatMessage {
            text: emoji.to_string(),
            kind: ChatKind::Reaction,
        });
    }

    pub fn queue_remove(&self, index: usize) {
        self.send(ClientCommand::QueueRemove { index });
    }

    pub fn queue_reorder(&self, from_index: usize, to_index: usize) {
        self.send(ClientCommand::QueueReorder {
            from_index,
            to_index,
        });
    }

    pub fn queue_drag(&self, from_index: usize, hover_index: usize) {
        self.send(ClientCommand::QueueDrag {
            from_index,
            hover_index,
        });
    }

    pub fn queue_drag_end(&self) {
        self.send(ClientCommand::QueueDragEnd);
    }
}
