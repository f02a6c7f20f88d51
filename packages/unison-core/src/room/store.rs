//! Registry of live rooms.
//!
//! Rooms exist only while occupied: created lazily on first join, discarded
//! when the last connection leaves. State never outlives the roster.

use std::sync::Arc;

use dashmap::DashMap;

use crate::classifier::TrackClassifier;
use crate::protocol::RoomId;
use crate::room::Room;

/// Concurrent room registry keyed by room id.
pub struct RoomStore {
    rooms: DashMap<RoomId, Arc<Room>>,
    classifier: Arc<dyn TrackClassifier>,
}

impl RoomStore {
    pub fn new(classifier: Arc<dyn TrackClassifier>) -> Self {
        Self {
            rooms: DashMap::new(),
            classifier,
        }
    }

    /// Returns the room for `id`, creating it if absent.
    pub fn get_or_create(&self, id: &RoomId) -> Arc<Room> {
        self.rooms
            .entry(id.clone())
            .or_insert_with(|| {
                log::info!("[Store] creating room {}", id);
                Arc::new(Room::new(id.clone(), Arc::clone(&self.classifier)))
            })
            .clone()
    }

    /// Drops the room if its roster is empty. The re-check under the map
    /// entry guards against a join racing the last leave.
    pub fn delete_if_empty(&self, id: &RoomId) {
        let removed = self
            .rooms
            .remove_if(id, |_, room| room.participant_count() == 0);
        if removed.is_some() {
            log::info!("[Store] discarded empty room {}", id);
        }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// The classifier rooms use for display-name fallbacks.
    pub fn classifier(&self) -> &Arc<dyn TrackClassifier> {
        &self.classifier
    }
}
