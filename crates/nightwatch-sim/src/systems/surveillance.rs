//! Surveillance system: camera breakage and restoration.

use std::collections::BTreeMap;

use tracing::{debug, info};

use nightwatch_core::constants::CAMERA_DOWN_MS;
use nightwatch_core::enums::EnemyKind;
use nightwatch_core::events::SimEvent;
use nightwatch_core::rooms::RoomNode;
use nightwatch_core::state::CameraView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Breakage {
    until_ms: u64,
    by: EnemyKind,
}

/// Broken cameras keyed by room. A room missing from the map is intact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Surveillance {
    broken: BTreeMap<RoomNode, Breakage>,
}

impl Surveillance {
    pub fn is_destroyed(&self, camera: RoomNode) -> bool {
        self.broken.contains_key(&camera)
    }

    /// Camera feed the player actually sees, if any.
    pub fn watched_room(&self, open: Option<RoomNode>) -> Option<RoomNode> {
        open.filter(|room| room.has_camera() && !self.is_destroyed(*room))
    }

    /// Breaks `camera` until `now + CAMERA_DOWN_MS`. A camera already down
    /// keeps its original timer.
    pub fn destroy(&mut self, camera: RoomNode, by: EnemyKind, now_ms: u64) -> bool {
        if !camera.has_camera() || self.is_destroyed(camera) {
            return false;
        }
        self.broken.insert(
            camera,
            Breakage {
                until_ms: now_ms + u64::from(CAMERA_DOWN_MS),
                by,
            },
        );
        true
    }

    /// Brings back every camera whose downtime is over.
    pub fn restore_expired(&mut self, now_ms: u64) -> Vec<RoomNode> {
        let expired: Vec<RoomNode> = self
            .broken
            .iter()
            .filter(|(_, b)| b.until_ms <= now_ms)
            .map(|(room, _)| *room)
            .collect();
        for room in &expired {
            self.broken.remove(room);
        }
        expired
    }

    pub fn views(&self, watched: Option<RoomNode>) -> Vec<CameraView> {
        RoomNode::CAMERA_ROOMS
            .iter()
            .map(|&camera| {
                let breakage = self.broken.get(&camera);
                CameraView {
                    camera,
                    destroyed: breakage.is_some(),
                    destroyed_until_ms: breakage.map(|b| b.until_ms),
                    destroyed_by: breakage.map(|b| b.by),
                    watched: watched == Some(camera),
                }
            })
            .collect()
    }
}

/// Restores expired cameras, then applies this tick's breaks.
pub fn run(
    surveillance: &mut Surveillance,
    breaks: &[(RoomNode, EnemyKind)],
    now_ms: u64,
    events: &mut Vec<SimEvent>,
) {
    for camera in surveillance.restore_expired(now_ms) {
        debug!(%camera, "camera restored");
        events.push(SimEvent::CameraRestored { camera });
    }
    for &(camera, by) in breaks {
        if surveillance.destroy(camera, by, now_ms) {
            info!(%camera, enemy = %by, "camera destroyed");
            events.push(SimEvent::CameraDestroyed { camera, by });
        }
    }
}
