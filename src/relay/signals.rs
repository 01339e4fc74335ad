//! Attempt, query and lifecycle signals relayed through status effects
//!
//! These are owned by the subsystems that raise them (movement, hands,
//! inventory, combat...). Effects only know them as registration keys.

use crate::core::types::EntityId;
use crate::entity::mob_state::MobState;
use crate::relay::signal::{impl_signal, SignalFlags};

// === LIFECYCLE ===

/// Raised on an effect right after it is created, while it is still Added
#[derive(Debug, Clone, Default)]
pub struct EffectStarted {
    pub flags: SignalFlags,
}

/// Raised on an effect after it moved to Removed, before it is detached
#[derive(Debug, Clone, Default)]
pub struct EffectShutdown {
    pub flags: SignalFlags,
}

/// Raised once per tick on every Running effect
#[derive(Debug, Clone, Default)]
pub struct EffectUpdate {
    /// Seconds advanced this tick
    pub frame_time: f32,
    pub flags: SignalFlags,
}

impl EffectUpdate {
    pub fn new(frame_time: f32) -> Self {
        Self {
            frame_time,
            flags: SignalFlags::default(),
        }
    }
}

// === POSTURE ===

/// Entity tries to get up off the floor
#[derive(Debug, Clone, Default)]
pub struct StandAttempt {
    pub flags: SignalFlags,
}

impl StandAttempt {
    pub fn new() -> Self {
        Self::default()
    }
}

/// `user` interacts with `target` using an empty hand (e.g. helping them up)
///
/// Raised on the target.
#[derive(Debug, Clone)]
pub struct InteractHand {
    pub user: EntityId,
    pub target: EntityId,
    pub flags: SignalFlags,
}

impl InteractHand {
    pub fn new(user: EntityId, target: EntityId) -> Self {
        Self {
            user,
            target,
            flags: SignalFlags::default(),
        }
    }
}

// === MOVEMENT QUERIES ===

/// Friction applied to the entity by the tile it stands on
#[derive(Debug, Clone)]
pub struct TileFrictionQuery {
    pub modifier: f32,
    pub flags: SignalFlags,
}

impl TileFrictionQuery {
    pub fn new() -> Self {
        Self {
            modifier: 1.0,
            flags: SignalFlags::default(),
        }
    }
}

impl Default for TileFrictionQuery {
    fn default() -> Self {
        Self::new()
    }
}

/// Recomputes whether the entity can move; cancelled means it cannot
#[derive(Debug, Clone, Default)]
pub struct UpdateCanMove {
    pub flags: SignalFlags,
}

/// Aggregates walk/sprint multipliers from every contributor
#[derive(Debug, Clone)]
pub struct RefreshMovementSpeedModifiers {
    pub walk_speed_modifier: f32,
    pub sprint_speed_modifier: f32,
    pub flags: SignalFlags,
}

impl RefreshMovementSpeedModifiers {
    pub fn new() -> Self {
        Self {
            walk_speed_modifier: 1.0,
            sprint_speed_modifier: 1.0,
            flags: SignalFlags::default(),
        }
    }

    pub fn modify_speed(&mut self, walk: f32, sprint: f32) {
        self.walk_speed_modifier *= walk;
        self.sprint_speed_modifier *= sprint;
    }
}

impl Default for RefreshMovementSpeedModifiers {
    fn default() -> Self {
        Self::new()
    }
}

// === ACTION ATTEMPTS ===

#[derive(Debug, Clone, Default)]
pub struct ChangeDirectionAttempt {
    pub flags: SignalFlags,
}

#[derive(Debug, Clone, Default)]
pub struct InteractionAttempt {
    pub target: Option<EntityId>,
    pub flags: SignalFlags,
}

#[derive(Debug, Clone, Default)]
pub struct UseAttempt {
    pub used: Option<EntityId>,
    pub flags: SignalFlags,
}

#[derive(Debug, Clone, Default)]
pub struct ThrowAttempt {
    pub item: Option<EntityId>,
    pub flags: SignalFlags,
}

#[derive(Debug, Clone, Default)]
pub struct DropAttempt {
    pub item: Option<EntityId>,
    pub flags: SignalFlags,
}

#[derive(Debug, Clone, Default)]
pub struct AttackAttempt {
    pub target: Option<EntityId>,
    pub flags: SignalFlags,
}

#[derive(Debug, Clone, Default)]
pub struct PickupAttempt {
    pub item: Option<EntityId>,
    pub flags: SignalFlags,
}

/// `user` tries to put something into a slot of `equipee`
///
/// Raised on the user.
#[derive(Debug, Clone)]
pub struct IsEquippingAttempt {
    pub user: EntityId,
    pub equipee: EntityId,
    pub slot: String,
    pub flags: SignalFlags,
}

impl IsEquippingAttempt {
    pub fn new(user: EntityId, equipee: EntityId, slot: impl Into<String>) -> Self {
        Self {
            user,
            equipee,
            slot: slot.into(),
            flags: SignalFlags::default(),
        }
    }
}

/// `user` tries to take something out of a slot of `unequipee`
///
/// Raised on the user.
#[derive(Debug, Clone)]
pub struct IsUnequippingAttempt {
    pub user: EntityId,
    pub unequipee: EntityId,
    pub slot: String,
    pub flags: SignalFlags,
}

impl IsUnequippingAttempt {
    pub fn new(user: EntityId, unequipee: EntityId, slot: impl Into<String>) -> Self {
        Self {
            user,
            unequipee,
            slot: slot.into(),
            flags: SignalFlags::default(),
        }
    }
}

// === MOB STATE ===

#[derive(Debug, Clone)]
pub struct MobStateChanged {
    pub old_state: MobState,
    pub new_state: MobState,
    pub flags: SignalFlags,
}

impl MobStateChanged {
    pub fn new(old_state: MobState, new_state: MobState) -> Self {
        Self {
            old_state,
            new_state,
            flags: SignalFlags::default(),
        }
    }
}

impl_signal!(
    EffectStarted,
    EffectShutdown,
    EffectUpdate,
    StandAttempt,
    InteractHand,
    TileFrictionQuery,
    UpdateCanMove,
    RefreshMovementSpeedModifiers,
    ChangeDirectionAttempt,
    InteractionAttempt,
    UseAttempt,
    ThrowAttempt,
    DropAttempt,
    AttackAttempt,
    PickupAttempt,
    IsEquippingAttempt,
    IsUnequippingAttempt,
    MobStateChanged,
);
