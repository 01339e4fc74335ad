//! Snapshot collection and restore between an authoritative and a
//! predicting world

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{EntityId, TimeSpan};
use crate::ecs::World;
use crate::effects::{EffectKind, StatusEffect};
use crate::replication::state::{EffectComponentState, ReplicatedComponent};

/// Replicated view of one effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectSnapshot {
    pub entity: EntityId,
    pub kind: EffectKind,
    /// Owned by the generic effect container
    pub remaining: TimeSpan,
    pub state: EffectComponentState,
}

impl EffectSnapshot {
    pub fn of(effect: &StatusEffect) -> Self {
        Self {
            entity: effect.owner(),
            kind: effect.kind(),
            remaining: effect.remaining(),
            state: effect.data().get_state(),
        }
    }

    /// Overwrite the effect's replicated fields. Does not mark it dirty.
    pub fn restore(&self, effect: &mut StatusEffect) -> bool {
        if effect.kind() != self.kind || !effect.data_mut().handle_state(&self.state) {
            return false;
        }
        effect.remaining = self.remaining;
        true
    }
}

/// Snapshot every dirty effect and clear the dirty flags
pub fn collect_dirty(world: &mut World) -> Vec<EffectSnapshot> {
    let mut snapshots = Vec::new();
    for (_, record) in world.entities_mut() {
        let Some(status) = record.status.as_mut() else {
            continue;
        };
        for effect in status.iter_mut() {
            if effect.dirty {
                snapshots.push(EffectSnapshot::of(effect));
                effect.dirty = false;
            }
        }
    }
    snapshots
}

/// Snapshot every effect in the world (full-state sync point)
pub fn full_state(world: &World) -> Vec<EffectSnapshot> {
    world
        .entities()
        .filter_map(|(_, record)| record.status.as_ref())
        .flat_map(|status| status.iter().map(EffectSnapshot::of))
        .collect()
}

/// Restore snapshots onto matching effects.
///
/// Snapshots for effects the receiver does not hold are skipped. Returns how
/// many were applied. Collaborator state derived from the effects (movement
/// speed) is left alone; `StunSystem::restore_snapshots` also refreshes it.
pub fn apply_snapshots(world: &mut World, snapshots: &[EffectSnapshot]) -> usize {
    let mut applied = 0;
    for snapshot in snapshots {
        let restored = world
            .status_mut(snapshot.entity)
            .and_then(|status| status.get_mut(snapshot.kind))
            .is_some_and(|effect| snapshot.restore(effect));
        if restored {
            applied += 1;
        } else {
            tracing::trace!(
                "Skipped {} snapshot for {:?}",
                snapshot.kind.key(),
                snapshot.entity
            );
        }
    }
    applied
}

pub fn encode(snapshots: &[EffectSnapshot]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(snapshots)?)
}

pub fn decode(bytes: &[u8]) -> Result<Vec<EffectSnapshot>> {
    Ok(serde_json::from_slice(bytes)?)
}
