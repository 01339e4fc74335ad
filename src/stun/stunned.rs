//! Stun: vetoes nearly every action while present

use crate::core::types::TimeSpan;
use crate::effects::{ModifyMode, Stunned};
use crate::entity::MobState;
use crate::relay::signals::{
    AttackAttempt, ChangeDirectionAttempt, DropAttempt, EffectShutdown, EffectStarted,
    InteractionAttempt, IsEquippingAttempt, IsUnequippingAttempt, MobStateChanged, PickupAttempt,
    ThrowAttempt, UpdateCanMove, UseAttempt,
};
use crate::relay::{
    EffectCommand, EffectContext, RelayEnvelope, RelayOutcome, RelayRegistry, Signal,
};

pub(crate) fn register(registry: &mut RelayRegistry) {
    registry
        .register::<Stunned, EffectStarted>(update_can_move::<EffectStarted>)
        .register::<Stunned, EffectShutdown>(update_can_move::<EffectShutdown>);

    register_veto::<ChangeDirectionAttempt>(registry);
    registry.register::<Stunned, UpdateCanMove>(on_move_attempt);
    register_veto::<InteractionAttempt>(registry);
    register_veto::<UseAttempt>(registry);
    register_veto::<ThrowAttempt>(registry);
    register_veto::<DropAttempt>(registry);
    register_veto::<AttackAttempt>(registry);
    register_veto::<PickupAttempt>(registry);

    registry
        .register::<Stunned, IsEquippingAttempt>(on_equip_attempt)
        .register::<Stunned, IsUnequippingAttempt>(on_unequip_attempt)
        .register::<Stunned, MobStateChanged>(on_mob_state_changed);
}

/// One blanket veto, instantiated per attempt kind
fn register_veto<S: Signal>(registry: &mut RelayRegistry) {
    registry.register::<Stunned, S>(on_attempt::<S>);
}

fn on_attempt<S: Signal>(
    _: &mut EffectContext<'_, Stunned>,
    _: &mut RelayEnvelope<'_, S>,
) -> RelayOutcome {
    RelayOutcome::Cancel
}

fn update_can_move<S: Signal>(
    ctx: &mut EffectContext<'_, Stunned>,
    _: &mut RelayEnvelope<'_, S>,
) -> RelayOutcome {
    ctx.push(EffectCommand::UpdateCanMove {
        entity: ctx.entity(),
    });
    RelayOutcome::Pass
}

fn on_move_attempt(
    ctx: &mut EffectContext<'_, Stunned>,
    _: &mut RelayEnvelope<'_, UpdateCanMove>,
) -> RelayOutcome {
    if !ctx.is_active() {
        return RelayOutcome::Pass;
    }
    RelayOutcome::Cancel
}

fn on_equip_attempt(
    _: &mut EffectContext<'_, Stunned>,
    env: &mut RelayEnvelope<'_, IsEquippingAttempt>,
) -> RelayOutcome {
    // self-equip is blocked, being dressed by someone else is not
    if env.args().equipee == env.afflicted() {
        RelayOutcome::Cancel
    } else {
        RelayOutcome::Pass
    }
}

fn on_unequip_attempt(
    _: &mut EffectContext<'_, Stunned>,
    env: &mut RelayEnvelope<'_, IsUnequippingAttempt>,
) -> RelayOutcome {
    // self-unequip is blocked, being stripped is not
    if env.args().unequipee == env.afflicted() {
        RelayOutcome::Cancel
    } else {
        RelayOutcome::Pass
    }
}

fn on_mob_state_changed(
    ctx: &mut EffectContext<'_, Stunned>,
    env: &mut RelayEnvelope<'_, MobStateChanged>,
) -> RelayOutcome {
    match env.args().new_state {
        MobState::Critical | MobState::Dead => {
            ctx.modify_remaining(TimeSpan::ZERO, ModifyMode::Set);
        }
        MobState::Alive | MobState::Invalid => {}
    }
    RelayOutcome::Pass
}
