//! Evasion system: teleport transit, return to post and the escape countdown.

use tracing::{debug, info};

use nightwatch_core::commands::Denial;
use nightwatch_core::constants::{ESCAPE_COUNTDOWN_MS, TELEPORT_COST, TELEPORT_TRANSIT_MS};
use nightwatch_core::enums::{EnemyKind, LossCause};
use nightwatch_core::events::SimEvent;
use nightwatch_core::rooms::RoomNode;
use nightwatch_core::state::PlayerView;

use nightwatch_threat_ai::EnemyUnit;

use super::apparatus::ResourcePool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transit {
    pub target: RoomNode,
    pub remaining_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Escape {
    pub source: EnemyKind,
    pub remaining_ms: u32,
}

/// Where the player is and what is hunting them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evasion {
    room: RoomNode,
    transit: Option<Transit>,
    escape: Option<Escape>,
}

impl Evasion {
    pub fn room(&self) -> RoomNode {
        self.room
    }

    /// Teleported out of the protected room.
    pub fn is_away(&self) -> bool {
        !self.room.is_protected()
    }

    pub fn in_transit(&self) -> bool {
        self.transit.is_some()
    }

    pub fn transit(&self) -> Option<Transit> {
        self.transit
    }

    pub fn escape(&self) -> Option<Escape> {
        self.escape
    }

    /// The cost is only checked here; it is charged when the transit completes.
    pub fn validate_teleport(&self, target: RoomNode, pool: &ResourcePool) -> Result<(), Denial> {
        if target.is_protected() {
            return Err(Denial::ProtectedRoom);
        }
        if target == self.room {
            return Err(Denial::SameRoom);
        }
        pool.check(TELEPORT_COST)
    }

    pub fn start_teleport(&mut self, target: RoomNode) {
        self.transit = Some(Transit {
            target,
            remaining_ms: TELEPORT_TRANSIT_MS,
        });
    }

    /// Abandons the transit. Nothing was charged yet.
    pub fn cancel(&mut self) -> Result<RoomNode, Denial> {
        self.transit.take().map(|t| t.target).ok_or(Denial::NoTransit)
    }

    /// Instant return. Returns `true` when an escape countdown was dropped.
    pub fn return_to_post(&mut self) -> Result<bool, Denial> {
        if self.transit.is_some() {
            return Err(Denial::InTransit);
        }
        if !self.is_away() {
            return Err(Denial::AlreadyAtPost);
        }
        self.room = RoomNode::Intel;
        Ok(self.escape.take().is_some())
    }

    /// Runs the transit down. Returns the target once it is reached.
    pub fn advance_transit(&mut self, delta_ms: u32) -> Option<RoomNode> {
        let transit = self.transit.as_mut()?;
        transit.remaining_ms = transit.remaining_ms.saturating_sub(delta_ms);
        if transit.remaining_ms > 0 {
            return None;
        }
        self.transit.take().map(|t| t.target)
    }

    pub fn arrive(&mut self, room: RoomNode) {
        self.room = room;
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            teleported: self.is_away(),
            room: self.room,
            transit_target: self.transit.map(|t| t.target),
            transit_remaining_ms: self.transit.map_or(0, |t| t.remaining_ms),
            escape_source: self.escape.map(|e| e.source),
            escape_remaining_ms: self.escape.map_or(0, |e| e.remaining_ms),
        }
    }
}

/// First lethal body standing in `room`, in evaluation order.
pub fn occupant(units: &[EnemyUnit], room: RoomNode) -> Option<EnemyKind> {
    units.iter().find(|u| u.body_in(room)).map(|u| u.kind())
}

/// Checks listeners against a teleported player. Returns the loss if they
/// are found or the countdown runs out.
pub fn run(
    evasion: &mut Evasion,
    units: &[EnemyUnit],
    delta_ms: u32,
    events: &mut Vec<SimEvent>,
) -> Option<(EnemyKind, LossCause)> {
    if !evasion.is_away() {
        if evasion.escape.take().is_some() {
            events.push(SimEvent::EscapeCountdownCleared);
        }
        return None;
    }

    let room = evasion.room;
    let listeners = || units.iter().filter(|u| u.kind().listens_for_player());

    if let Some(found) = listeners().find(|u| u.room() == Some(room)) {
        info!(enemy = %found.kind(), %room, "player caught");
        return Some((found.kind(), LossCause::Caught));
    }

    if let Some(escape) = evasion.escape.as_mut() {
        let still_adjacent = units
            .iter()
            .find(|u| u.kind() == escape.source)
            .and_then(EnemyUnit::room)
            .is_some_and(|r| r.is_adjacent(room));
        if still_adjacent {
            escape.remaining_ms = escape.remaining_ms.saturating_sub(delta_ms);
            if escape.remaining_ms == 0 {
                info!(enemy = %escape.source, %room, "player overheard");
                return Some((escape.source, LossCause::Overheard));
            }
            return None;
        }
        debug!(enemy = %escape.source, "escape countdown cleared");
        evasion.escape = None;
        events.push(SimEvent::EscapeCountdownCleared);
    }

    if let Some(heard) = listeners().find(|u| u.room().is_some_and(|r| r.is_adjacent(room))) {
        evasion.escape = Some(Escape {
            source: heard.kind(),
            remaining_ms: ESCAPE_COUNTDOWN_MS,
        });
        debug!(enemy = %heard.kind(), %room, "escape countdown started");
        events.push(SimEvent::EscapeCountdownStarted {
            enemy: heard.kind(),
            remaining_ms: ESCAPE_COUNTDOWN_MS,
        });
    }
    None
}
