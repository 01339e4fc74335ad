//! Stun system facade
//!
//! Owns the relay registry and runs every effect transition through it:
//! applying, modifying, ticking and removing effects, and routing attempt
//! signals from the rest of the game. Handler commands are flushed before
//! each public call returns, so a call is one synchronous state transition.

use crate::core::error::{Result, StatusError};
use crate::core::types::{EntityId, TimeSpan};
use crate::core::StunConfig;
use crate::ecs::World;
use crate::effects::{
    EffectComponent, EffectHandle, EffectKind, LifeStage, ModifyMode, SlowedDown, StackPolicy,
};
use crate::entity::{MobState, Posture};
use crate::relay::signals::{
    EffectShutdown, EffectStarted, EffectUpdate, InteractHand, MobStateChanged,
    RefreshMovementSpeedModifiers, StandAttempt, TileFrictionQuery, UpdateCanMove,
};
use crate::relay::{CommandQueue, EffectCommand, RelayRegistry, Signal};
use crate::replication::{self, EffectSnapshot};
use crate::stun::{knockdown, slowdown, stunned};

pub struct StunSystem {
    registry: RelayRegistry,
    config: StunConfig,
}

impl Default for StunSystem {
    /// The default config always passes `validate`
    fn default() -> Self {
        Self::build(StunConfig::default())
    }
}

impl StunSystem {
    /// Build a system from a validated config
    pub fn new(config: StunConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: StunConfig) -> Self {
        let mut registry = RelayRegistry::new();
        knockdown::register(&mut registry, &config);
        stunned::register(&mut registry);
        slowdown::register(&mut registry);

        Self { registry, config }
    }

    pub fn config(&self) -> &StunConfig {
        &self.config
    }

    pub fn registry(&self) -> &RelayRegistry {
        &self.registry
    }

    /// Extra handlers for signal kinds defined outside this crate
    pub fn registry_mut(&mut self) -> &mut RelayRegistry {
        &mut self.registry
    }

    // === EFFECT STORE ===

    /// Apply an effect and run its start callback if it is new
    pub fn try_apply(
        &self,
        world: &mut World,
        entity: EntityId,
        kind: EffectKind,
        duration: TimeSpan,
        policy: StackPolicy,
    ) -> Result<EffectHandle> {
        let mut commands = CommandQueue::new();
        let record = world
            .get_mut(entity)
            .ok_or(StatusError::EntityNotFound(entity))?;
        let status = record
            .status
            .as_mut()
            .ok_or(StatusError::NoEffectContainer(entity))?;

        let applied = status.try_apply(kind, duration, policy, &self.config)?;
        if applied.created {
            if let Some(effect) = status.get_mut(kind) {
                self.registry
                    .relay_to(effect, &mut EffectStarted::default(), &mut commands);
            }
            status.start(kind);
            tracing::debug!("Applied {} to {:?} for {}", kind.key(), entity, duration);
        } else {
            tracing::trace!("Stacked {} on {:?} ({:?})", kind.key(), entity, policy);
        }

        self.flush(world, &mut commands);
        Ok(applied.handle)
    }

    /// Adjust an active effect's remaining duration; no-op if absent
    pub fn modify(
        &self,
        world: &mut World,
        entity: EntityId,
        kind: EffectKind,
        amount: TimeSpan,
        mode: ModifyMode,
    ) -> bool {
        world
            .status_mut(entity)
            .is_some_and(|status| status.modify(kind, amount, mode))
    }

    /// Remove an effect ahead of its timer, running its shutdown callback
    pub fn remove_effect(&self, world: &mut World, entity: EntityId, kind: EffectKind) -> bool {
        let started = world
            .status_mut(entity)
            .is_some_and(|status| status.begin_removal(kind));
        if !started {
            return false;
        }
        let mut commands = CommandQueue::new();
        self.shutdown(world, entity, kind, &mut commands);
        true
    }

    /// Advance every effect in the world by one frame.
    ///
    /// Returns the effects that expired and were detached this tick.
    pub fn update(&self, world: &mut World) -> Vec<EffectHandle> {
        let frame_time = self.config.frame_time();
        let frame_secs = frame_time.as_secs_f32();
        let mut commands = CommandQueue::new();
        let mut expired = Vec::new();

        let entities: Vec<EntityId> = world.entity_ids().collect();
        for entity in entities {
            let kinds = {
                let Some(status) = world.status_mut(entity) else {
                    continue;
                };
                for effect in status.iter_mut() {
                    if effect.stage() == LifeStage::Running {
                        self.registry
                            .relay_to(effect, &mut EffectUpdate::new(frame_secs), &mut commands);
                    }
                }
                status.advance(frame_time)
            };
            self.flush(world, &mut commands);

            for kind in kinds {
                tracing::debug!("{} expired on {:?}", kind.key(), entity);
                self.shutdown(world, entity, kind, &mut commands);
                expired.push(EffectHandle { entity, kind });
            }
        }

        expired
    }

    /// Shutdown callback, then detach. The effect stays attached (stage
    /// Removed) while its commands flush.
    fn shutdown(
        &self,
        world: &mut World,
        entity: EntityId,
        kind: EffectKind,
        commands: &mut CommandQueue,
    ) {
        if let Some(effect) = world.status_mut(entity).and_then(|s| s.get_mut(kind)) {
            self.registry
                .relay_to(effect, &mut EffectShutdown::default(), commands);
        }
        self.flush(world, commands);
        if let Some(status) = world.status_mut(entity) {
            status.detach(kind);
        }
    }

    // === SIGNAL ROUTING ===

    /// Route an attempt through the entity's active effects.
    ///
    /// Returns false if any effect cancelled it.
    pub fn raise<S: Signal>(&self, world: &mut World, entity: EntityId, signal: &mut S) -> bool {
        let mut commands = CommandQueue::new();
        self.relay_in(world, entity, signal, &mut commands);
        self.flush(world, &mut commands);
        !signal.is_cancelled()
    }

    fn relay_in<S: Signal>(
        &self,
        world: &mut World,
        entity: EntityId,
        signal: &mut S,
        commands: &mut CommandQueue,
    ) -> usize {
        match world.status_mut(entity) {
            Some(status) => self.registry.relay(status, signal, commands),
            None => 0,
        }
    }

    fn flush(&self, world: &mut World, commands: &mut CommandQueue) {
        while let Some(command) = commands.pop() {
            match command {
                EffectCommand::ModifyEffect {
                    entity,
                    kind,
                    amount,
                    mode,
                } => {
                    self.modify(world, entity, kind, amount, mode);
                }
                EffectCommand::SetPosture { entity, posture } => match posture {
                    Posture::Down => self.lay_down(world, entity),
                    Posture::Standing => {
                        self.stand_in(world, entity, commands);
                    }
                },
                EffectCommand::UpdateCanMove { entity } => {
                    self.update_can_move_in(world, entity, commands);
                }
                EffectCommand::RefreshMovementSpeed { entity } => {
                    self.refresh_movement_speed_in(world, entity, commands);
                }
                EffectCommand::PlayCue(cue) => world.push_cue(cue),
            }
        }
    }

    // === REPLICATION ===

    /// Restore snapshots onto the receiving world, then recompute movement
    /// speed for every entity whose slowdown was overwritten.
    ///
    /// Returns how many snapshots were applied.
    pub fn restore_snapshots(&self, world: &mut World, snapshots: &[EffectSnapshot]) -> usize {
        let applied = replication::apply_snapshots(world, snapshots);

        let mut slowed: Vec<EntityId> = snapshots
            .iter()
            .filter(|s| s.kind == EffectKind::SlowedDown)
            .map(|s| s.entity)
            .collect();
        slowed.sort();
        slowed.dedup();
        for entity in slowed {
            if world.has_effect(entity, EffectKind::SlowedDown) {
                self.refresh_movement_speed(world, entity);
            }
        }

        applied
    }

    // === COLLABORATORS ===

    /// Try to stand the entity up. Fails while something cancels the attempt.
    pub fn stand(&self, world: &mut World, entity: EntityId) -> bool {
        let mut commands = CommandQueue::new();
        let stood = self.stand_in(world, entity, &mut commands);
        self.flush(world, &mut commands);
        stood
    }

    fn stand_in(&self, world: &mut World, entity: EntityId, commands: &mut CommandQueue) -> bool {
        match world.posture(entity) {
            None => return false,
            Some(Posture::Standing) => return true,
            Some(Posture::Down) => {}
        }

        let mut attempt = StandAttempt::new();
        self.relay_in(world, entity, &mut attempt, commands);
        if attempt.is_cancelled() {
            return false;
        }
        if let Some(record) = world.get_mut(entity) {
            record.posture = Posture::Standing;
        }
        true
    }

    /// Put the entity on the floor. Nothing vetoes lying down.
    pub fn lay_down(&self, world: &mut World, entity: EntityId) {
        if let Some(record) = world.get_mut(entity) {
            record.posture = Posture::Down;
        }
    }

    /// Recompute whether the entity can move
    pub fn update_can_move(&self, world: &mut World, entity: EntityId) -> bool {
        let mut commands = CommandQueue::new();
        let can_move = self.update_can_move_in(world, entity, &mut commands);
        self.flush(world, &mut commands);
        can_move
    }

    fn update_can_move_in(
        &self,
        world: &mut World,
        entity: EntityId,
        commands: &mut CommandQueue,
    ) -> bool {
        let mut query = UpdateCanMove::default();
        self.relay_in(world, entity, &mut query, commands);
        let can_move = !query.is_cancelled();
        if let Some(record) = world.get_mut(entity) {
            record.movement.can_move = can_move;
        }
        can_move
    }

    /// Recompute walk/sprint modifiers from every contributing effect
    pub fn refresh_movement_speed(&self, world: &mut World, entity: EntityId) {
        let mut commands = CommandQueue::new();
        self.refresh_movement_speed_in(world, entity, &mut commands);
        self.flush(world, &mut commands);
    }

    fn refresh_movement_speed_in(
        &self,
        world: &mut World,
        entity: EntityId,
        commands: &mut CommandQueue,
    ) {
        let mut query = RefreshMovementSpeedModifiers::new();
        self.relay_in(world, entity, &mut query, commands);
        if let Some(record) = world.get_mut(entity) {
            record.movement.walk_speed_modifier = query.walk_speed_modifier;
            record.movement.sprint_speed_modifier = query.sprint_speed_modifier;
        }
    }

    /// Friction modifier the tile should apply to the entity
    pub fn tile_friction(&self, world: &mut World, entity: EntityId) -> f32 {
        let mut query = TileFrictionQuery::new();
        self.raise(world, entity, &mut query);
        query.modifier
    }

    /// Record a new mob state and tell the entity's effects about it
    pub fn set_mob_state(&self, world: &mut World, entity: EntityId, new_state: MobState) {
        let Some(record) = world.get_mut(entity) else {
            return;
        };
        let old_state = record.mob_state;
        if old_state == new_state {
            return;
        }
        record.mob_state = new_state;
        self.raise(world, entity, &mut MobStateChanged::new(old_state, new_state));
    }

    /// `user` offers `target` a hand. Returns true if something consumed it.
    pub fn interact_hand(&self, world: &mut World, user: EntityId, target: EntityId) -> bool {
        let mut interact = InteractHand::new(user, target);
        self.raise(world, target, &mut interact);
        interact.is_handled()
    }

    // === GAMEPLAY ===

    /// Knock the entity down for `time`
    pub fn try_knockdown(
        &self,
        world: &mut World,
        entity: EntityId,
        time: TimeSpan,
        refresh: bool,
    ) -> bool {
        let policy = StackPolicy::from_refresh(refresh);
        self.try_apply_logged(world, entity, EffectKind::KnockedDown, time, policy)
    }

    /// Stun the entity for `time`
    pub fn try_stun(
        &self,
        world: &mut World,
        entity: EntityId,
        time: TimeSpan,
        refresh: bool,
    ) -> bool {
        let policy = StackPolicy::from_refresh(refresh);
        self.try_apply_logged(world, entity, EffectKind::Stunned, time, policy)
    }

    /// Applies knockdown and stun to the entity temporarily.
    ///
    /// The two applications are not rolled back: if the stun is declined the
    /// entity stays knocked down.
    pub fn try_paralyze(&self, world: &mut World, entity: EntityId, time: TimeSpan) -> bool {
        if world.status(entity).is_none() {
            tracing::debug!("Cannot paralyze {:?}: no status effect container", entity);
            return false;
        }

        self.try_knockdown(world, entity, time, true) && self.try_stun(world, entity, time, true)
    }

    /// Slows down the mob's walking/running speed temporarily.
    ///
    /// Multipliers are clamped to [0, 1] and folded into any active slowdown.
    pub fn try_slowdown(
        &self,
        world: &mut World,
        entity: EntityId,
        time: TimeSpan,
        refresh: bool,
        walk_speed_multiplier: f32,
        run_speed_multiplier: f32,
    ) -> bool {
        if world.status(entity).is_none() {
            return false;
        }
        if !time.is_positive() {
            return false;
        }

        if !self.try_apply_logged(
            world,
            entity,
            EffectKind::SlowedDown,
            time,
            StackPolicy::from_refresh(refresh),
        ) {
            return false;
        }

        if let Some(effect) = world
            .status_mut(entity)
            .and_then(|s| s.get_mut(EffectKind::SlowedDown))
        {
            if let Some(slowed) = SlowedDown::project_mut(effect.data_mut()) {
                slowed.stack(walk_speed_multiplier, run_speed_multiplier);
            }
            effect.mark_dirty();
        }

        self.refresh_movement_speed(world, entity);
        true
    }

    fn try_apply_logged(
        &self,
        world: &mut World,
        entity: EntityId,
        kind: EffectKind,
        time: TimeSpan,
        policy: StackPolicy,
    ) -> bool {
        match self.try_apply(world, entity, kind, time, policy) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("Declined {} on {:?}: {}", kind.key(), entity, e);
                false
            }
        }
    }
}
