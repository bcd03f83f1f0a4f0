//! Distraction system: the single placeable lure.

use tracing::debug;

use nightwatch_core::commands::Denial;
use nightwatch_core::constants::{LURE_PLACE_COST, LURE_PLAY_MS};
use nightwatch_core::events::SimEvent;
use nightwatch_core::rooms::RoomNode;
use nightwatch_core::state::LureView;

use super::apparatus::ResourcePool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lure {
    pub room: RoomNode,
    /// Play time left; `None` until started.
    pub remaining_ms: Option<u32>,
}

impl Lure {
    pub fn playing(&self) -> bool {
        self.remaining_ms.is_some()
    }

    pub fn view(&self) -> LureView {
        LureView {
            room: self.room,
            playing: self.playing(),
            remaining_ms: self.remaining_ms.unwrap_or(LURE_PLAY_MS),
        }
    }
}

pub fn validate_place(lure: Option<&Lure>, room: RoomNode, pool: &ResourcePool) -> Result<(), Denial> {
    if lure.is_some() {
        return Err(Denial::LureExists);
    }
    if room.is_protected() {
        return Err(Denial::ProtectedRoom);
    }
    pool.check(LURE_PLACE_COST)
}

pub fn validate_play(lure: Option<&Lure>) -> Result<RoomNode, Denial> {
    match lure {
        None => Err(Denial::NoLure),
        Some(lure) if lure.playing() => Err(Denial::LurePlaying),
        Some(lure) => Ok(lure.room),
    }
}

/// Room the lure is drawing units toward this tick.
pub fn playing_room(lure: Option<&Lure>) -> Option<RoomNode> {
    lure.filter(|l| l.playing()).map(|l| l.room)
}

/// Counts a playing lure down and consumes it when it runs out.
pub fn run(lure: &mut Option<Lure>, delta_ms: u32, events: &mut Vec<SimEvent>) {
    let Some(current) = lure.as_mut() else {
        return;
    };
    let Some(remaining) = current.remaining_ms.as_mut() else {
        return;
    };
    *remaining = remaining.saturating_sub(delta_ms);
    if *remaining == 0 {
        let room = current.room;
        *lure = None;
        debug!(%room, "lure consumed");
        events.push(SimEvent::LureConsumed { room });
    }
}
