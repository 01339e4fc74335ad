//! Knockdown: lays the entity down and keeps it there until the effect ends

use crate::core::types::TimeSpan;
use crate::core::StunConfig;
use crate::effects::{KnockedDown, ModifyMode};
use crate::entity::{FeedbackCue, Posture};
use crate::relay::signals::{
    EffectShutdown, EffectStarted, EffectUpdate, InteractHand, StandAttempt, TileFrictionQuery,
};
use crate::relay::{EffectCommand, EffectContext, RelayEnvelope, RelayOutcome, RelayRegistry};

pub(crate) fn register(registry: &mut RelayRegistry, config: &StunConfig) {
    let friction = config.knockdown_friction_modifier;
    let sound = config.knockdown_sound.clone();

    registry
        .register::<KnockedDown, EffectStarted>(on_knock_init)
        .register::<KnockedDown, EffectShutdown>(on_knock_shutdown)
        .register::<KnockedDown, EffectUpdate>(on_update)
        .register::<KnockedDown, StandAttempt>(on_stand_attempt)
        .register::<KnockedDown, InteractHand>(move |ctx, env| on_interact_hand(ctx, env, &sound))
        .register::<KnockedDown, TileFrictionQuery>(move |_, env| {
            env.args_mut().modifier *= friction;
            RelayOutcome::Pass
        });
}

fn on_knock_init(
    ctx: &mut EffectContext<'_, KnockedDown>,
    _: &mut RelayEnvelope<'_, EffectStarted>,
) -> RelayOutcome {
    ctx.push(EffectCommand::SetPosture {
        entity: ctx.entity(),
        posture: Posture::Down,
    });
    RelayOutcome::Pass
}

fn on_knock_shutdown(
    ctx: &mut EffectContext<'_, KnockedDown>,
    _: &mut RelayEnvelope<'_, EffectShutdown>,
) -> RelayOutcome {
    ctx.push(EffectCommand::SetPosture {
        entity: ctx.entity(),
        posture: Posture::Standing,
    });
    RelayOutcome::Pass
}

fn on_update(
    ctx: &mut EffectContext<'_, KnockedDown>,
    env: &mut RelayEnvelope<'_, EffectUpdate>,
) -> RelayOutcome {
    let frame_time = env.args().frame_time;
    ctx.component_mut().tick_help(frame_time);
    RelayOutcome::Pass
}

fn on_stand_attempt(
    ctx: &mut EffectContext<'_, KnockedDown>,
    _: &mut RelayEnvelope<'_, StandAttempt>,
) -> RelayOutcome {
    if ctx.is_active() {
        RelayOutcome::Cancel
    } else {
        RelayOutcome::Pass
    }
}

/// Someone offers a hand: shave one help interval off the knockdown
fn on_interact_hand(
    ctx: &mut EffectContext<'_, KnockedDown>,
    env: &mut RelayEnvelope<'_, InteractHand>,
    sound: &str,
) -> RelayOutcome {
    if env.handled() || !ctx.component().can_be_helped() {
        return RelayOutcome::Pass;
    }

    let interval = ctx.component_mut().accept_help();
    ctx.modify_remaining(TimeSpan::from_secs_f32(-interval), ModifyMode::AddTime);
    ctx.push(EffectCommand::PlayCue(FeedbackCue {
        sound: sound.to_string(),
        source: ctx.entity(),
        predicted_by: Some(env.args().user),
    }));
    ctx.mark_dirty();

    tracing::debug!("{:?} helped up {:?} ({}s)", env.args().user, ctx.entity(), interval);
    RelayOutcome::Handled
}
