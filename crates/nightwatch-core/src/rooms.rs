//! Static room graph.
//!
//! The protected room (`Intel`) has no adjacency: enemies reach it as a
//! terminal state through one of the two doorways, never as a traversal hop.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::DoorSide;
use crate::select::pick_excluding;

/// A named location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoomNode {
    /// The protected room.
    #[default]
    Intel,
    LeftHall,
    RightHall,
    Lobby,
    Storage,
    Cafeteria,
    Courtyard,
    Balcony,
    Utility,
    Sewer,
    Bridge,
    Spawn,
}

impl RoomNode {
    pub const ALL: [RoomNode; 12] = [
        RoomNode::Intel,
        RoomNode::LeftHall,
        RoomNode::RightHall,
        RoomNode::Lobby,
        RoomNode::Storage,
        RoomNode::Cafeteria,
        RoomNode::Courtyard,
        RoomNode::Balcony,
        RoomNode::Utility,
        RoomNode::Sewer,
        RoomNode::Bridge,
        RoomNode::Spawn,
    ];

    /// Every room with a camera (all but the protected room).
    pub const CAMERA_ROOMS: [RoomNode; 11] = [
        RoomNode::LeftHall,
        RoomNode::RightHall,
        RoomNode::Lobby,
        RoomNode::Storage,
        RoomNode::Cafeteria,
        RoomNode::Courtyard,
        RoomNode::Balcony,
        RoomNode::Utility,
        RoomNode::Sewer,
        RoomNode::Bridge,
        RoomNode::Spawn,
    ];

    /// Rooms that are neither a doorway nor the protected room.
    pub const PATROL_ROOMS: [RoomNode; 9] = [
        RoomNode::Lobby,
        RoomNode::Storage,
        RoomNode::Cafeteria,
        RoomNode::Courtyard,
        RoomNode::Balcony,
        RoomNode::Utility,
        RoomNode::Sewer,
        RoomNode::Bridge,
        RoomNode::Spawn,
    ];

    /// Sensing points the Demoman head can sit on: every camera room plus the protected room.
    pub const HEAD_SPOTS: [RoomNode; 12] = RoomNode::ALL;

    pub fn is_protected(self) -> bool {
        self == RoomNode::Intel
    }

    pub fn is_doorway(self) -> bool {
        matches!(self, RoomNode::LeftHall | RoomNode::RightHall)
    }

    pub fn has_camera(self) -> bool {
        !self.is_protected()
    }

    /// Which doorway this node is, if any.
    pub fn door_side(self) -> Option<DoorSide> {
        match self {
            RoomNode::LeftHall => Some(DoorSide::Left),
            RoomNode::RightHall => Some(DoorSide::Right),
            _ => None,
        }
    }

    /// Rooms reachable in one hop.
    pub fn neighbors(self) -> &'static [RoomNode] {
        use RoomNode::*;
        match self {
            Intel => &[],
            LeftHall => &[Lobby, Storage],
            RightHall => &[Balcony, Utility],
            Lobby => &[Courtyard, Cafeteria, LeftHall],
            Storage => &[Sewer, Utility, LeftHall],
            Cafeteria => &[Courtyard, Balcony, Lobby],
            Courtyard => &[Spawn, Bridge, Lobby, Cafeteria],
            Balcony => &[Bridge, Cafeteria, RightHall],
            Utility => &[Sewer, Storage, RightHall],
            Sewer => &[Spawn, Utility, Storage],
            Bridge => &[Courtyard, Balcony],
            Spawn => &[Courtyard, Sewer],
        }
    }

    pub fn is_adjacent(self, other: RoomNode) -> bool {
        self.neighbors().contains(&other)
    }

    /// The doorway one hop away, if any.
    pub fn adjacent_doorway(self) -> Option<DoorSide> {
        self.neighbors().iter().find_map(|room| room.door_side())
    }
}

impl fmt::Display for RoomNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl DoorSide {
    /// The doorway node on this side.
    pub fn doorway(self) -> RoomNode {
        match self {
            DoorSide::Left => RoomNode::LeftHall,
            DoorSide::Right => RoomNode::RightHall,
        }
    }
}

/// Next node for a unit walking toward `target`.
///
/// Direct hop if `target` is adjacent, otherwise a neighbour that is itself
/// adjacent to `target`, otherwise any neighbour. `draw` breaks ties.
/// Returns `from` when already there or when `from` has no neighbours.
pub fn next_hop_toward(from: RoomNode, target: RoomNode, draw: u32) -> RoomNode {
    if from == target {
        return from;
    }
    let neighbors = from.neighbors();
    if neighbors.contains(&target) {
        return target;
    }
    let lookahead: Vec<RoomNode> = neighbors
        .iter()
        .copied()
        .filter(|room| room.is_adjacent(target))
        .collect();
    if let Some(room) = pick_excluding(&lookahead, None, draw) {
        return room;
    }
    let open: Vec<RoomNode> = neighbors
        .iter()
        .copied()
        .filter(|room| !room.is_protected())
        .collect();
    pick_excluding(&open, None, draw).unwrap_or(from)
}
