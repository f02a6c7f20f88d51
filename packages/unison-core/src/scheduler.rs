//! Playback scheduling: wall-clock stamping of transport events.
//!
//! The entire synchronization mechanism is a server-stamped `atTimestamp` on
//! each `play` event: clients apply immediately when the stamp is already in
//! the past, otherwise wait out the delta on their local clock. There is no
//! clock-offset negotiation and no drift correction after start - once
//! playing, each client's local player clock governs until the next
//! server-originated event.

use crate::protocol::{QueueItem, ServerEvent};
use crate::utils::now_millis;

/// Builds the authoritative "start playing front item" event.
///
/// Carries `positionMs: 0` and a queue snapshot so receivers can refresh
/// their pending list in the same frame they switch tracks.
pub fn start_event(front: &QueueItem, queue_snapshot: Vec<QueueItem>) -> ServerEvent {
    ServerEvent::Play {
        kind: front.kind,
        url: front.url.clone(),
        position_ms: 0,
        at_timestamp: now_millis(),
        owner_username: front.owner_username.clone(),
        display_name: front.display_name.clone(),
        queue: Some(queue_snapshot),
    }
}

/// Builds a resume event: the owner's track/position forwarded verbatim with
/// a freshly stamped `atTimestamp`. The queue is untouched, which is what
/// distinguishes "pause → resume at position" from "play next track".
pub fn resume_event(
    kind: crate::protocol::TrackKind,
    url: String,
    position_ms: u64,
    owner_username: String,
    display_name: String,
) -> ServerEvent {
    ServerEvent::Play {
        kind,
        url,
        position_ms,
        at_timestamp: now_millis(),
        owner_username,
        display_name,
        queue: None,
    }
}
