//! Per-room playback queue engine.
//!
//! The queue front (`queue[0]`) is the currently playing item. The front is
//! never removed or reordered by pending-list commands; it retires only
//! through the track-ended transition. Invalid commands (bad indices,
//! non-owner removals) are silent no-ops by design.

use crate::protocol::QueueItem;

/// Outcome of an enqueue.
#[derive(Debug, Clone, PartialEq)]
pub enum Enqueued {
    /// The queue was empty, so this push starts playback of the new front.
    /// Enqueue-into-empty-queue is the only path that begins playback.
    Started,
    /// The item joined the pending list; the current track keeps playing.
    Appended,
}

/// Ordered list of pending/playing items with ownership rules.
#[derive(Debug, Default)]
pub struct Queue {
    items: Vec<QueueItem>,
}

impl Queue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The currently playing item, if any.
    pub fn front(&self) -> Option<&QueueItem> {
        self.items.first()
    }

    /// Whether `username` owns the currently playing item. Transport
    /// control (pause/seek/skip) is gated on this.
    pub fn front_owned_by(&self, username: &str) -> bool {
        self.front()
            .map(|item| item.owner_username == username)
            .unwrap_or(false)
    }

    /// Cloned snapshot for broadcast payloads.
    pub fn snapshot(&self) -> Vec<QueueItem> {
        self.items.clone()
    }

    /// Appends an item. Returns [`Enqueued::Started`] when the queue was
    /// empty before the push (the item becomes the playing front).
    pub fn enqueue(&mut self, item: QueueItem) -> Enqueued {
        let was_empty = self.items.is_empty();
        self.items.push(item);
        if was_empty {
            Enqueued::Started
        } else {
            Enqueued::Appended
        }
    }

    /// Removes a pending item.
    ///
    /// Valid only for `1 <= index < len` and when `username` owns the item
    /// at `index`. Returns `false` (no-op) otherwise; index 0 is protected.
    pub fn remove(&mut self, index: usize, username: &str) -> bool {
        if index == 0 || index >= self.items.len() {
            return false;
        }
        if self.items[index].owner_username != username {
            return false;
        }
        self.items.remove(index);
        true
    }

    /// Moves a pending item from `from` to `to`, preserving the relative
    /// order of everything else.
    ///
    /// Valid only for both indices in `[1, len-1]` with `from != to`.
    /// Ownership of the moved item is deliberately not checked: any room
    /// member may rearrange the pending list; only the front is protected.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.items.len();
        if from == 0 || to == 0 || from >= len || to >= len || from == to {
            return false;
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        true
    }

    /// Retires the front item ("track ended").
    ///
    /// Valid only when the queue is non-empty and `username` owns the front;
    /// returns `None` (no-op) otherwise. The caller moves the returned item
    /// into history and, if a new front exists, starts it.
    pub fn advance(&mut self, username: &str) -> Option<QueueItem> {
        if !self.front_owned_by(username) {
            return None;
        }
        Some(self.items.remove(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::TrackKind;

    fn item(url: &str, owner: &str) -> QueueItem {
        QueueItem {
            kind: TrackKind::File,
            url: url.to_string(),
            owner_username: owner.to_string(),
            display_name: url.trim_end_matches(".mp3").to_string(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Enqueue
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn enqueue_into_empty_queue_starts_playback() {
        let mut queue = Queue::new();
        assert_eq!(queue.enqueue(item("a.mp3", "ada")), Enqueued::Started);
        assert_eq!(queue.front().unwrap().url, "a.mp3");
    }

    #[test]
    fn enqueue_into_nonempty_queue_only_appends() {
        let mut queue = Queue::new();
        queue.enqueue(item("a.mp3", "ada"));
        assert_eq!(queue.enqueue(item("b.mp3", "brin")), Enqueued::Appended);
        // Front unchanged: ada's track keeps playing
        assert_eq!(queue.front().unwrap().url, "a.mp3");
        assert_eq!(queue.len(), 2);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Remove
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn remove_front_is_ignored() {
        let mut queue = Queue::new();
        queue.enqueue(item("a.mp3", "ada"));
        queue.enqueue(item("b.mp3", "brin"));
        assert!(!queue.remove(0, "ada"));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn remove_requires_ownership() {
        let mut queue = Queue::new();
        queue.enqueue(item("a.mp3", "ada"));
        queue.enqueue(item("b.mp3", "brin"));
        assert!(!queue.remove(1, "ada"));
        assert!(queue.remove(1, "brin"));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn remove_out_of_range_is_ignored() {
        let mut queue = Queue::new();
        queue.enqueue(item("a.mp3", "ada"));
        assert!(!queue.remove(1, "ada"));
        assert!(!queue.remove(99, "ada"));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reorder
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn reorder_moves_pending_item_preserving_rest() {
        let mut queue = Queue::new();
        queue.enqueue(item("a.mp3", "ada"));
        queue.enqueue(item("b.mp3", "brin"));
        queue.enqueue(item("c.mp3", "cole"));
        queue.enqueue(item("d.mp3", "dana"));

        assert!(queue.reorder(3, 1));
        let snapshot = queue.snapshot();
        let urls: Vec<&str> = snapshot.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, vec!["a.mp3", "d.mp3", "b.mp3", "c.mp3"]);
    }

    #[test]
    fn reorder_does_not_require_ownership() {
        let mut queue = Queue::new();
        queue.enqueue(item("a.mp3", "ada"));
        queue.enqueue(item("b.mp3", "brin"));
        queue.enqueue(item("c.mp3", "cole"));
        // ada moves cole's item: allowed
        assert!(queue.reorder(2, 1));
    }

    #[test]
    fn reorder_protects_front_and_rejects_self_move() {
        let mut queue = Queue::new();
        queue.enqueue(item("a.mp3", "ada"));
        queue.enqueue(item("b.mp3", "brin"));
        queue.enqueue(item("c.mp3", "cole"));

        assert!(!queue.reorder(0, 1));
        assert!(!queue.reorder(1, 0));
        assert!(!queue.reorder(1, 1)); // from == to: idempotent no-op
        assert!(!queue.reorder(1, 3)); // out of range
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Advance
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn advance_retires_front_and_exposes_next() {
        let mut queue = Queue::new();
        queue.enqueue(item("a.mp3", "ada"));
        queue.enqueue(item("b.mp3", "brin"));

        let retired = queue.advance("ada").unwrap();
        assert_eq!(retired.url, "a.mp3");
        assert_eq!(queue.front().unwrap().url, "b.mp3");
    }

    #[test]
    fn advance_by_non_owner_is_ignored() {
        let mut queue = Queue::new();
        queue.enqueue(item("a.mp3", "ada"));
        assert!(queue.advance("brin").is_none());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn advance_on_empty_queue_is_ignored() {
        let mut queue = Queue::new();
        assert!(queue.advance("ada").is_none());
    }

    #[test]
    fn front_ownership_check() {
        let mut queue = Queue::new();
        assert!(!queue.front_owned_by("ada"));
        queue.enqueue(item("a.mp3", "ada"));
        assert!(queue.front_owned_by("ada"));
        assert!(!queue.front_owned_by("brin"));
    }
}
