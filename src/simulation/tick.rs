//! Tick system - advances status effect timers one frame at a time
//!
//! Each tick relays the per-frame update to every running effect, counts
//! their timers down, and shuts down the ones that ran out. Everything
//! completes before the tick counter moves on.

use crate::core::types::{EntityId, Tick};
use crate::ecs::World;
use crate::effects::EffectKind;
use crate::stun::StunSystem;

/// Events generated during a status tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    /// An effect's timer ran out and it was removed
    EffectExpired {
        entity: EntityId,
        kind: EffectKind,
        tick: Tick,
    },
}

/// Run one tick of the status effect simulation
pub fn run_status_tick(system: &StunSystem, world: &mut World) -> Vec<StatusEvent> {
    let tick = world.current_tick;
    let events = system
        .update(world)
        .into_iter()
        .map(|handle| StatusEvent::EffectExpired {
            entity: handle.entity,
            kind: handle.kind,
            tick,
        })
        .collect();

    world.tick();
    events
}

/// Run ticks until `entity` has no effects left or `max_ticks` pass.
///
/// Returns the number of ticks run.
pub fn run_until_clear(
    system: &StunSystem,
    world: &mut World,
    entity: EntityId,
    max_ticks: u64,
) -> u64 {
    let mut ticks = 0;
    while ticks < max_ticks && world.status(entity).is_some_and(|s| !s.is_empty()) {
        run_status_tick(system, world);
        ticks += 1;
    }
    ticks
}
