//! Snapshot system: builds the complete GameStateSnapshot for one tick.
//!
//! This system is read-only.

use nightwatch_core::enums::SessionPhase;
use nightwatch_core::events::SimEvent;
use nightwatch_core::rooms::RoomNode;
use nightwatch_core::state::*;
use nightwatch_core::types::SimTime;

use nightwatch_threat_ai::EnemyUnit;

use super::apparatus::{Apparatus, ResourcePool};
use super::evasion::Evasion;
use super::lure::Lure;
use super::resolution::grant_holder;
use super::surveillance::Surveillance;

/// Read-only view of everything the snapshot is built from.
pub struct SnapshotSource<'a> {
    pub time: &'a SimTime,
    pub phase: SessionPhase,
    pub game_over: Option<&'a GameOver>,
    pub metal_delta: i64,
    pub resources: &'a ResourcePool,
    pub apparatus: &'a Apparatus,
    pub units: &'a [EnemyUnit],
    pub surveillance: &'a Surveillance,
    pub watched: Option<RoomNode>,
    pub lure: Option<&'a Lure>,
    pub evasion: &'a Evasion,
}

pub fn build_snapshot(source: SnapshotSource<'_>, events: Vec<SimEvent>) -> GameStateSnapshot {
    let sapped = source.units.iter().any(EnemyUnit::sapper_attached);
    GameStateSnapshot {
        time: *source.time,
        hour: source.time.hour(),
        phase: source.phase,
        events,
        game_over: source.game_over.cloned(),
        victory: source.phase == SessionPhase::Victory,
        metal_delta: source.metal_delta,
        resources: source.resources.view(),
        apparatus: source.apparatus.view(sapped),
        enemies: build_enemies(source.units),
        cameras: source.surveillance.views(source.watched),
        lure: source.lure.map(Lure::view),
        player: source.evasion.view(),
    }
}

fn build_enemies(units: &[EnemyUnit]) -> Vec<EnemyView> {
    let granted = grant_holder(units);
    units
        .iter()
        .map(|unit| EnemyView {
            invulnerable: granted == Some(unit.kind()),
            ..unit.view()
        })
        .collect()
}
