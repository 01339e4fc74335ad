//! Relay dispatcher
//!
//! Handlers are registered per (effect kind, signal type). Dispatching a
//! signal on an entity invokes, in registration order, every handler whose
//! effect kind is currently attached to that entity. A signal with no
//! matching handler simply passes through.

use std::any::{Any, TypeId};

use ahash::AHashMap;

use crate::core::types::{EntityId, TimeSpan};
use crate::effects::{
    EffectComponent, EffectKind, LifeStage, ModifyMode, StatusEffect, StatusEffects,
};
use crate::relay::commands::{CommandQueue, EffectCommand};
use crate::relay::envelope::{RelayEnvelope, RelayOutcome};
use crate::relay::signal::Signal;

/// What a handler may touch: its own effect component plus the command queue
pub struct EffectContext<'a, C> {
    entity: EntityId,
    kind: EffectKind,
    stage: LifeStage,
    remaining: TimeSpan,
    component: &'a mut C,
    dirty: &'a mut bool,
    commands: &'a mut CommandQueue,
}

impl<'a, C: EffectComponent> EffectContext<'a, C> {
    fn new(effect: &'a mut StatusEffect, commands: &'a mut CommandQueue) -> Option<Self> {
        let entity = effect.owner();
        let kind = effect.kind();
        let stage = effect.stage();
        let remaining = effect.remaining();
        let StatusEffect { data, dirty, .. } = effect;
        let component = C::project_mut(data)?;

        Some(Self {
            entity,
            kind,
            stage,
            remaining,
            component,
            dirty,
            commands,
        })
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn stage(&self) -> LifeStage {
        self.stage
    }

    /// Added or Running, i.e. not yet shutting down
    pub fn is_active(&self) -> bool {
        self.stage <= LifeStage::Running
    }

    pub fn remaining(&self) -> TimeSpan {
        self.remaining
    }

    pub fn component(&self) -> &C {
        self.component
    }

    pub fn component_mut(&mut self) -> &mut C {
        self.component
    }

    /// Replicated fields of this effect changed
    pub fn mark_dirty(&mut self) {
        *self.dirty = true;
    }

    /// Queue a timer change for this effect
    pub fn modify_remaining(&mut self, amount: TimeSpan, mode: ModifyMode) {
        self.commands.push(EffectCommand::ModifyEffect {
            entity: self.entity,
            kind: self.kind,
            amount,
            mode,
        });
    }

    pub fn push(&mut self, command: EffectCommand) {
        self.commands.push(command);
    }
}

type ErasedHandler = Box<
    dyn Fn(&mut StatusEffect, EntityId, &mut dyn Any, &mut CommandQueue) -> Option<RelayOutcome>,
>;

struct HandlerEntry {
    kind: EffectKind,
    signal: &'static str,
    handler: ErasedHandler,
}

/// Registry of (effect kind, signal type) handlers
#[derive(Default)]
pub struct RelayRegistry {
    handlers: AHashMap<TypeId, Vec<HandlerEntry>>,
    registrations: usize,
}

impl RelayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for signal `S` on effects of component type `C`.
    ///
    /// A second registration for the same pair is ignored.
    pub fn register<C: EffectComponent, S: Signal>(
        &mut self,
        handler: impl Fn(&mut EffectContext<'_, C>, &mut RelayEnvelope<'_, S>) -> RelayOutcome
            + 'static,
    ) -> &mut Self {
        let signal = std::any::type_name::<S>();
        let entries = self.handlers.entry(TypeId::of::<S>()).or_default();
        if entries.iter().any(|e| e.kind == C::KIND) {
            tracing::warn!("Duplicate relay handler for {:?} / {} ignored", C::KIND, signal);
            return self;
        }

        let erased = move |effect: &mut StatusEffect,
                           afflicted: EntityId,
                           args: &mut dyn Any,
                           commands: &mut CommandQueue|
              -> Option<RelayOutcome> {
            let args = args.downcast_mut::<S>()?;
            let mut ctx = EffectContext::<C>::new(effect, commands)?;
            let mut envelope = RelayEnvelope::new(afflicted, args);
            let outcome = handler(&mut ctx, &mut envelope);
            envelope.apply(outcome);
            Some(outcome)
        };

        entries.push(HandlerEntry {
            kind: C::KIND,
            signal,
            handler: Box::new(erased),
        });
        self.registrations += 1;
        self
    }

    /// Relay `signal` through every attached effect that registered for it.
    ///
    /// Returns how many handlers ran.
    pub fn relay<S: Signal>(
        &self,
        effects: &mut StatusEffects,
        signal: &mut S,
        commands: &mut CommandQueue,
    ) -> usize {
        let Some(entries) = self.handlers.get(&TypeId::of::<S>()) else {
            return 0;
        };

        let afflicted = effects.owner();
        let mut invoked = 0;
        for entry in entries {
            let Some(effect) = effects.get_mut(entry.kind) else {
                continue;
            };
            if let Some(outcome) = (entry.handler)(effect, afflicted, &mut *signal, commands) {
                invoked += 1;
                if outcome != RelayOutcome::Pass {
                    tracing::trace!(
                        "{:?} on {:?}: {} -> {:?}",
                        entry.kind,
                        afflicted,
                        entry.signal,
                        outcome
                    );
                }
            }
        }
        invoked
    }

    /// Relay `signal` to a single effect (lifecycle notifications)
    pub fn relay_to<S: Signal>(
        &self,
        effect: &mut StatusEffect,
        signal: &mut S,
        commands: &mut CommandQueue,
    ) -> Option<RelayOutcome> {
        let entries = self.handlers.get(&TypeId::of::<S>())?;
        let entry = entries.iter().find(|e| e.kind == effect.kind())?;
        let afflicted = effect.owner();
        (entry.handler)(effect, afflicted, signal, commands)
    }

    pub fn has_handler<S: Signal>(&self, kind: EffectKind) -> bool {
        self.handlers
            .get(&TypeId::of::<S>())
            .is_some_and(|entries| entries.iter().any(|e| e.kind == kind))
    }

    /// Effect kinds registered for `S`, in invocation order
    pub fn kinds_for<S: Signal>(&self) -> Vec<EffectKind> {
        self.handlers
            .get(&TypeId::of::<S>())
            .map(|entries| entries.iter().map(|e| e.kind).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.registrations
    }

    pub fn is_empty(&self) -> bool {
        self.registrations == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StunConfig;
    use crate::effects::{KnockedDown, SlowedDown, StackPolicy, Stunned};
    use crate::relay::signals::{StandAttempt, TileFrictionQuery, ThrowAttempt};

    fn effects_with(kinds: &[EffectKind]) -> StatusEffects {
        let mut effects = StatusEffects::new(EntityId::new());
        let config = StunConfig::default();
        for kind in kinds {
            effects
                .try_apply(*kind, TimeSpan::from_secs(5), StackPolicy::Replace, &config)
                .unwrap();
            effects.start(*kind);
        }
        effects
    }

    #[test]
    fn test_unregistered_signal_passes_through() {
        let registry = RelayRegistry::new();
        let mut effects = effects_with(&[EffectKind::Stunned]);
        let mut attempt = StandAttempt::new();
        let mut commands = CommandQueue::new();

        assert_eq!(registry.relay(&mut effects, &mut attempt, &mut commands), 0);
        assert!(!attempt.is_cancelled());
    }

    #[test]
    fn test_only_attached_effects_are_invoked() {
        let mut registry = RelayRegistry::new();
        registry.register::<Stunned, ThrowAttempt>(|_, _| RelayOutcome::Cancel);
        registry.register::<SlowedDown, ThrowAttempt>(|_, _| RelayOutcome::Pass);

        let mut effects = effects_with(&[EffectKind::SlowedDown]);
        let mut attempt = ThrowAttempt::default();
        let mut commands = CommandQueue::new();

        assert_eq!(registry.relay(&mut effects, &mut attempt, &mut commands), 1);
        assert!(!attempt.is_cancelled());
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let mut registry = RelayRegistry::new();
        registry.register::<SlowedDown, TileFrictionQuery>(|_, env| {
            env.args_mut().modifier += 1.0;
            RelayOutcome::Pass
        });
        registry.register::<KnockedDown, TileFrictionQuery>(|_, env| {
            env.args_mut().modifier *= 0.5;
            RelayOutcome::Pass
        });

        let mut effects = effects_with(&[EffectKind::KnockedDown, EffectKind::SlowedDown]);
        let mut query = TileFrictionQuery::new();
        let mut commands = CommandQueue::new();
        registry.relay(&mut effects, &mut query, &mut commands);

        // (1 + 1) * 0.5, not 1 * 0.5 + 1
        assert_eq!(query.modifier, 1.0);
        assert_eq!(
            registry.kinds_for::<TileFrictionQuery>(),
            vec![EffectKind::SlowedDown, EffectKind::KnockedDown]
        );
    }

    #[test]
    fn test_duplicate_registration_ignored() {
        let mut registry = RelayRegistry::new();
        registry.register::<Stunned, ThrowAttempt>(|_, _| RelayOutcome::Cancel);
        registry.register::<Stunned, ThrowAttempt>(|_, _| RelayOutcome::Pass);
        assert_eq!(registry.len(), 1);

        let mut effects = effects_with(&[EffectKind::Stunned]);
        let mut attempt = ThrowAttempt::default();
        registry.relay(&mut effects, &mut attempt, &mut CommandQueue::new());
        assert!(attempt.is_cancelled());
    }

    #[test]
    fn test_context_queues_modify_for_own_effect() {
        let mut registry = RelayRegistry::new();
        registry.register::<Stunned, StandAttempt>(|ctx, _| {
            ctx.modify_remaining(TimeSpan::ZERO, ModifyMode::Set);
            RelayOutcome::Pass
        });

        let mut effects = effects_with(&[EffectKind::Stunned]);
        let owner = effects.owner();
        let mut commands = CommandQueue::new();
        registry.relay(&mut effects, &mut StandAttempt::new(), &mut commands);

        assert_eq!(
            commands.pop(),
            Some(EffectCommand::ModifyEffect {
                entity: owner,
                kind: EffectKind::Stunned,
                amount: TimeSpan::ZERO,
                mode: ModifyMode::Set,
            })
        );
    }

    #[test]
    fn test_relay_to_targets_single_effect() {
        let mut registry = RelayRegistry::new();
        registry.register::<Stunned, ThrowAttempt>(|_, _| RelayOutcome::Cancel);

        let mut effects = effects_with(&[EffectKind::Stunned, EffectKind::KnockedDown]);
        let mut commands = CommandQueue::new();

        let knocked = effects.get_mut(EffectKind::KnockedDown).unwrap();
        assert!(registry.relay_to(knocked, &mut ThrowAttempt::default(), &mut commands).is_none());

        let stunned = effects.get_mut(EffectKind::Stunned).unwrap();
        let mut attempt = ThrowAttempt::default();
        assert_eq!(
            registry.relay_to(stunned, &mut attempt, &mut commands),
            Some(RelayOutcome::Cancel)
        );
        assert!(attempt.is_cancelled());
    }
}
