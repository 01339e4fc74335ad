//! Slowdown: multiplicative walk/sprint reduction

use crate::effects::SlowedDown;
use crate::relay::signals::{EffectShutdown, EffectStarted, RefreshMovementSpeedModifiers};
use crate::relay::{EffectCommand, EffectContext, RelayEnvelope, RelayOutcome, RelayRegistry};

pub(crate) fn register(registry: &mut RelayRegistry) {
    registry
        .register::<SlowedDown, RefreshMovementSpeedModifiers>(on_refresh_movespeed)
        .register::<SlowedDown, EffectStarted>(on_slow_init)
        .register::<SlowedDown, EffectShutdown>(on_slow_remove);
}

fn on_slow_init(
    ctx: &mut EffectContext<'_, SlowedDown>,
    _: &mut RelayEnvelope<'_, EffectStarted>,
) -> RelayOutcome {
    ctx.push(EffectCommand::RefreshMovementSpeed {
        entity: ctx.entity(),
    });
    RelayOutcome::Pass
}

fn on_slow_remove(
    ctx: &mut EffectContext<'_, SlowedDown>,
    _: &mut RelayEnvelope<'_, EffectShutdown>,
) -> RelayOutcome {
    // reset before the refresh below reads the modifiers
    ctx.component_mut().reset();
    ctx.mark_dirty();
    ctx.push(EffectCommand::RefreshMovementSpeed {
        entity: ctx.entity(),
    });
    RelayOutcome::Pass
}

fn on_refresh_movespeed(
    ctx: &mut EffectContext<'_, SlowedDown>,
    env: &mut RelayEnvelope<'_, RefreshMovementSpeedModifiers>,
) -> RelayOutcome {
    let slowed = *ctx.component();
    env.args_mut()
        .modify_speed(slowed.walk_speed_modifier, slowed.sprint_speed_modifier);
    RelayOutcome::Pass
}
