//! Knockdown and stun integration tests
//!
//! Drives `StunSystem` end to end: applying effects, routing attempts
//! through them, and letting the tick driver expire them.

use status_relay::core::types::{EntityId, TimeSpan};
use status_relay::core::StunConfig;
use status_relay::ecs::World;
use status_relay::effects::{EffectKind, LifeStage, Stunned};
use status_relay::entity::{MobState, Posture};
use status_relay::relay::signals::{
    AttackAttempt, ChangeDirectionAttempt, DropAttempt, InteractHand, InteractionAttempt,
    IsEquippingAttempt, IsUnequippingAttempt, PickupAttempt, StandAttempt, ThrowAttempt,
    UseAttempt,
};
use status_relay::relay::{RelayOutcome, Signal, SignalFlags};
use status_relay::simulation::run_status_tick;
use status_relay::stun::StunSystem;

/// 10 ticks per second keeps tick arithmetic readable
fn system() -> StunSystem {
    StunSystem::new(StunConfig {
        tick_rate: 10,
        ..StunConfig::default()
    })
    .unwrap()
}

fn setup() -> (StunSystem, World, EntityId) {
    let system = system();
    let mut world = World::new();
    let mob = world.spawn_mob("Urist");
    (system, world, mob)
}

/// Raise every blanket-vetoed attempt; returns how many were allowed
fn allowed_attempts(system: &StunSystem, world: &mut World, actor: EntityId) -> usize {
    [
        system.raise(world, actor, &mut ChangeDirectionAttempt::default()),
        system.raise(world, actor, &mut InteractionAttempt::default()),
        system.raise(world, actor, &mut UseAttempt::default()),
        system.raise(world, actor, &mut ThrowAttempt::default()),
        system.raise(world, actor, &mut DropAttempt::default()),
        system.raise(world, actor, &mut AttackAttempt::default()),
        system.raise(world, actor, &mut PickupAttempt::default()),
    ]
    .into_iter()
    .filter(|allowed| *allowed)
    .count()
}

fn remaining(world: &World, mob: EntityId, kind: EffectKind) -> Option<TimeSpan> {
    world.status(mob).and_then(|s| s.remaining(kind))
}

#[test]
fn test_system_rejects_invalid_config() {
    let speedup = StunConfig {
        knockdown_friction_modifier: 1.5,
        ..StunConfig::default()
    };
    assert!(StunSystem::new(speedup).is_err());

    let frozen_timers = StunConfig {
        tick_rate: 2_000_000,
        ..StunConfig::default()
    };
    assert!(StunSystem::new(frozen_timers).is_err());
}

#[test]
fn test_unaffected_mob_can_do_anything() {
    let (system, mut world, mob) = setup();
    assert_eq!(allowed_attempts(&system, &mut world, mob), 7);
}

#[test]
fn test_stun_blocks_attempts_until_expiry() {
    let (system, mut world, mob) = setup();
    assert!(system.try_stun(&mut world, mob, TimeSpan::from_secs(1), true));

    // 1s at 10 ticks/s: blocked for the first 9 ticks
    for _ in 0..9 {
        assert_eq!(allowed_attempts(&system, &mut world, mob), 0);
        run_status_tick(&system, &mut world);
    }
    assert_eq!(allowed_attempts(&system, &mut world, mob), 0);

    run_status_tick(&system, &mut world);
    assert!(!world.has_effect(mob, EffectKind::Stunned));
    assert_eq!(allowed_attempts(&system, &mut world, mob), 7);
}

#[test]
fn test_stun_toggles_can_move() {
    let (system, mut world, mob) = setup();
    assert!(world.movement(mob).unwrap().can_move);

    system.try_stun(&mut world, mob, TimeSpan::from_millis(300), true);
    assert!(!world.movement(mob).unwrap().can_move);
    assert!(!system.update_can_move(&mut world, mob));

    for _ in 0..3 {
        run_status_tick(&system, &mut world);
    }
    assert!(!world.has_effect(mob, EffectKind::Stunned));
    assert!(world.movement(mob).unwrap().can_move);
}

#[test]
fn test_paralyze_applies_both_effects() {
    let (system, mut world, mob) = setup();
    assert!(system.try_paralyze(&mut world, mob, TimeSpan::from_secs(5)));

    let status = world.status(mob).unwrap();
    for kind in [EffectKind::KnockedDown, EffectKind::Stunned] {
        let effect = status.get(kind).unwrap();
        assert_eq!(effect.stage(), LifeStage::Running);
        assert_eq!(effect.remaining(), TimeSpan::from_secs(5));
    }
    assert_eq!(world.posture(mob), Some(Posture::Down));
    assert!(!world.movement(mob).unwrap().can_move);
}

#[test]
fn test_paralyze_without_container_fails() {
    let (system, mut world, _) = setup();
    let crate_box = world.spawn_without_status("crate");

    assert!(!system.try_paralyze(&mut world, crate_box, TimeSpan::from_secs(5)));
    assert!(world.status(crate_box).is_none());
    assert_eq!(world.posture(crate_box), Some(Posture::Standing));
}

#[test]
fn test_paralyze_unknown_entity_fails() {
    let (system, mut world, _) = setup();
    assert!(!system.try_paralyze(&mut world, EntityId::new(), TimeSpan::from_secs(5)));
}

#[test]
fn test_paralyze_rejects_non_positive_duration() {
    let (system, mut world, mob) = setup();
    assert!(!system.try_paralyze(&mut world, mob, TimeSpan::ZERO));
    assert!(world.status(mob).unwrap().is_empty());
}

#[test]
fn test_partial_paralyze_is_not_rolled_back() {
    let (system, mut world, _) = setup();
    let mob = world.spawn_with_allowed("ghost", [EffectKind::KnockedDown]);

    assert!(!system.try_paralyze(&mut world, mob, TimeSpan::from_secs(5)));
    assert!(world.has_effect(mob, EffectKind::KnockedDown));
    assert!(!world.has_effect(mob, EffectKind::Stunned));
    assert_eq!(world.posture(mob), Some(Posture::Down));
}

#[test]
fn test_paralyze_refresh_replaces_timer() {
    let (system, mut world, mob) = setup();
    system.try_paralyze(&mut world, mob, TimeSpan::from_secs(5));
    system.try_paralyze(&mut world, mob, TimeSpan::from_secs(2));

    assert_eq!(remaining(&world, mob, EffectKind::Stunned), Some(TimeSpan::from_secs(2)));
    assert_eq!(remaining(&world, mob, EffectKind::KnockedDown), Some(TimeSpan::from_secs(2)));
}

#[test]
fn test_knockdown_without_refresh_adds_time() {
    let (system, mut world, mob) = setup();
    system.try_knockdown(&mut world, mob, TimeSpan::from_secs(2), false);
    system.try_knockdown(&mut world, mob, TimeSpan::from_secs(3), false);
    assert_eq!(remaining(&world, mob, EffectKind::KnockedDown), Some(TimeSpan::from_secs(5)));
}

#[test]
fn test_knockdown_blocks_standing_until_removed() {
    let (system, mut world, mob) = setup();
    system.try_knockdown(&mut world, mob, TimeSpan::from_millis(200), true);
    assert_eq!(world.posture(mob), Some(Posture::Down));

    assert!(!system.stand(&mut world, mob));
    assert!(!system.raise(&mut world, mob, &mut StandAttempt::new()));

    run_status_tick(&system, &mut world);
    run_status_tick(&system, &mut world);

    assert!(!world.has_effect(mob, EffectKind::KnockedDown));
    assert_eq!(world.posture(mob), Some(Posture::Standing));
}

#[test]
fn test_unaffected_mob_stands_back_up() {
    let (system, mut world, mob) = setup();
    system.lay_down(&mut world, mob);
    assert_eq!(world.posture(mob), Some(Posture::Down));

    assert!(system.stand(&mut world, mob));
    assert_eq!(world.posture(mob), Some(Posture::Standing));
}

#[test]
fn test_explicit_removal_stands_mob_up() {
    let (system, mut world, mob) = setup();
    system.try_paralyze(&mut world, mob, TimeSpan::from_secs(5));

    assert!(system.remove_effect(&mut world, mob, EffectKind::KnockedDown));
    assert_eq!(world.posture(mob), Some(Posture::Standing));
    assert!(world.has_effect(mob, EffectKind::Stunned));
    assert!(!system.remove_effect(&mut world, mob, EffectKind::KnockedDown));
}

#[test]
fn test_knockdown_slows_friction() {
    let (system, mut world, mob) = setup();
    assert_eq!(system.tile_friction(&mut world, mob), 1.0);

    system.try_knockdown(&mut world, mob, TimeSpan::from_secs(1), true);
    assert_eq!(system.tile_friction(&mut world, mob), 0.4);
}

#[test]
fn test_help_shortens_knockdown_once_per_cooldown() {
    let (system, mut world, mob) = setup();
    let helper = world.spawn_mob("Helper");
    system.try_knockdown(&mut world, mob, TimeSpan::from_secs(5), true);

    assert!(system.interact_hand(&mut world, helper, mob));
    assert_eq!(remaining(&world, mob, EffectKind::KnockedDown), Some(TimeSpan::from_secs(4)));
    assert_eq!(world.cues().len(), 1);
    assert_eq!(world.cues()[0].predicted_by, Some(helper));

    // cooldown is half the interval
    assert!(!system.interact_hand(&mut world, helper, mob));
    assert_eq!(remaining(&world, mob, EffectKind::KnockedDown), Some(TimeSpan::from_secs(4)));
    assert_eq!(world.cues().len(), 1);

    for _ in 0..6 {
        run_status_tick(&system, &mut world);
    }
    assert_eq!(
        remaining(&world, mob, EffectKind::KnockedDown),
        Some(TimeSpan::from_millis(3_400))
    );
    assert!(system.interact_hand(&mut world, helper, mob));
    assert_eq!(
        remaining(&world, mob, EffectKind::KnockedDown),
        Some(TimeSpan::from_millis(2_400))
    );
}

#[test]
fn test_help_ignored_when_already_handled() {
    let (system, mut world, mob) = setup();
    let helper = world.spawn_mob("Helper");
    system.try_knockdown(&mut world, mob, TimeSpan::from_secs(5), true);

    let mut interact = InteractHand::new(helper, mob);
    interact.flags.handled = true;
    system.raise(&mut world, mob, &mut interact);

    assert_eq!(remaining(&world, mob, EffectKind::KnockedDown), Some(TimeSpan::from_secs(5)));
    assert!(world.cues().is_empty());
}

#[test]
fn test_help_on_standing_mob_passes_through() {
    let (system, mut world, mob) = setup();
    let helper = world.spawn_mob("Helper");
    assert!(!system.interact_hand(&mut world, helper, mob));
}

#[test]
fn test_critical_state_ends_stun_next_tick() {
    let (system, mut world, mob) = setup();
    system.try_stun(&mut world, mob, TimeSpan::from_secs(5), true);

    system.set_mob_state(&mut world, mob, MobState::Critical);
    assert_eq!(remaining(&world, mob, EffectKind::Stunned), Some(TimeSpan::ZERO));
    assert!(world.has_effect(mob, EffectKind::Stunned));

    run_status_tick(&system, &mut world);
    assert!(!world.has_effect(mob, EffectKind::Stunned));
    assert!(world.movement(mob).unwrap().can_move);
}

#[test]
fn test_dead_state_ends_stun() {
    let (system, mut world, mob) = setup();
    system.try_stun(&mut world, mob, TimeSpan::from_secs(5), true);
    system.set_mob_state(&mut world, mob, MobState::Dead);
    assert_eq!(remaining(&world, mob, EffectKind::Stunned), Some(TimeSpan::ZERO));
}

#[test]
fn test_alive_and_invalid_states_leave_stun() {
    let (system, mut world, mob) = setup();
    system.try_stun(&mut world, mob, TimeSpan::from_secs(5), true);

    system.set_mob_state(&mut world, mob, MobState::Invalid);
    system.set_mob_state(&mut world, mob, MobState::Alive);
    assert_eq!(remaining(&world, mob, EffectKind::Stunned), Some(TimeSpan::from_secs(5)));
}

#[test]
fn test_stun_blocks_self_equip_only() {
    let (system, mut world, mob) = setup();
    let other = world.spawn_mob("Other");
    system.try_stun(&mut world, mob, TimeSpan::from_secs(5), true);

    assert!(!system.raise(&mut world, mob, &mut IsEquippingAttempt::new(mob, mob, "head")));
    assert!(!system.raise(&mut world, mob, &mut IsUnequippingAttempt::new(mob, mob, "head")));

    assert!(system.raise(&mut world, mob, &mut IsEquippingAttempt::new(mob, other, "head")));
    assert!(system.raise(&mut world, mob, &mut IsUnequippingAttempt::new(mob, other, "head")));

    // a healthy mob stripping the stunned one is not intercepted
    assert!(system.raise(&mut world, other, &mut IsUnequippingAttempt::new(other, mob, "head")));
}

/// A signal kind this crate knows nothing about
#[derive(Default)]
struct SpellCastAttempt {
    flags: SignalFlags,
}

impl Signal for SpellCastAttempt {
    fn flags(&self) -> &SignalFlags {
        &self.flags
    }

    fn flags_mut(&mut self) -> &mut SignalFlags {
        &mut self.flags
    }
}

#[test]
fn test_new_signal_kinds_register_without_touching_effects() {
    let mut system = system();
    let mut world = World::new();
    let mob = world.spawn_mob("Urist");

    // unregistered kinds pass straight through
    system.try_stun(&mut world, mob, TimeSpan::from_secs(5), true);
    assert!(system.raise(&mut world, mob, &mut SpellCastAttempt::default()));

    system
        .registry_mut()
        .register::<Stunned, SpellCastAttempt>(|_, _| RelayOutcome::Cancel);
    assert!(!system.raise(&mut world, mob, &mut SpellCastAttempt::default()));
}
