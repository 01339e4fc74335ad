//! Headless Paralysis Simulation
//!
//! Drives an authoritative world and a predicting copy from one seeded input
//! stream. Helping hands and mob state changes come from other players, so
//! only the authority sees them; the predicting copy catches up through
//! dirty-state syncs. Reports how often a sync had something to repair and
//! whether the two converged.

use std::path::PathBuf;

use clap::Parser;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use status_relay::core::types::{EntityId, TimeSpan};
use status_relay::core::StunConfig;
use status_relay::ecs::World;
use status_relay::entity::MobState;
use status_relay::relay::signals::{AttackAttempt, ThrowAttempt};
use status_relay::replication::{collect_dirty, decode, encode, full_state};
use status_relay::simulation::run_status_tick;
use status_relay::stun::StunSystem;

/// Headless Paralysis Simulation - authoritative vs predicted status effects
#[derive(Parser, Debug)]
#[command(name = "paralysis_sim")]
#[command(about = "Run seeded status effect traffic against two replicas and check they converge")]
struct Args {
    /// Number of mobs to spawn
    #[arg(long, default_value_t = 8)]
    mobs: usize,

    /// Ticks to simulate
    #[arg(long, default_value_t = 900)]
    ticks: u64,

    /// Ticks between dirty-state syncs
    #[arg(long, default_value_t = 15)]
    sync_interval: u64,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Optional TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Log every input as it is applied
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// One externally generated input
#[derive(Debug, Clone)]
enum Input {
    Paralyze { target: EntityId, millis: i64 },
    Slowdown { target: EntityId, millis: i64, refresh: bool, walk: f32, sprint: f32 },
    Help { user: EntityId, target: EntityId },
    MobState { target: EntityId, state: MobState },
    Throw { actor: EntityId },
    Attack { actor: EntityId, target: EntityId },
}

impl Input {
    /// Inputs the predicting client never sees locally
    fn authority_only(&self) -> bool {
        matches!(self, Input::Help { .. } | Input::MobState { .. })
    }
}

/// JSON output structure
#[derive(Serialize, Default)]
struct SimulationResult {
    seed: u64,
    ticks: u64,
    mobs: usize,
    inputs: usize,
    declined_inputs: usize,
    expired_effects: usize,
    synced_snapshots: usize,
    sync_bytes: usize,
    repaired_syncs: usize,
    cues: usize,
    converged: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => StunConfig::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config {}: {}", path.display(), e);
            StunConfig::default()
        }),
        None => StunConfig::default(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let system = StunSystem::new(config).unwrap_or_else(|e| {
        tracing::warn!("Invalid config, using defaults: {}", e);
        StunSystem::default()
    });

    let mut authoritative = World::new();
    let mobs: Vec<EntityId> = (0..args.mobs.max(1))
        .map(|i| authoritative.spawn_mob(format!("mob {}", i)))
        .collect();
    let mut predicted = authoritative.clone();

    tracing::info!("Simulating {} mobs for {} ticks (seed {})", mobs.len(), args.ticks, seed);

    let mut result = SimulationResult {
        seed,
        ticks: args.ticks,
        mobs: mobs.len(),
        inputs: 0,
        declined_inputs: 0,
        expired_effects: 0,
        synced_snapshots: 0,
        sync_bytes: 0,
        repaired_syncs: 0,
        cues: 0,
        converged: false,
    };

    for tick in 1..=args.ticks {
        for input in generate_inputs(&mut rng, &mobs) {
            if args.verbose {
                eprintln!("[{}] {:?}", tick, input);
            }
            let allowed = apply_input(&system, &mut authoritative, &input);
            if !input.authority_only() {
                apply_input(&system, &mut predicted, &input);
            }
            if !allowed {
                result.declined_inputs += 1;
            }
            result.inputs += 1;
        }

        result.expired_effects += run_status_tick(&system, &mut authoritative).len();
        run_status_tick(&system, &mut predicted);

        result.cues += authoritative.drain_cues().len();
        predicted.drain_cues();

        if tick % args.sync_interval.max(1) == 0 || tick == args.ticks {
            sync(&system, &mut authoritative, &mut predicted, &mut result);
        }
    }

    result.converged = full_state(&authoritative) == full_state(&predicted);
    if !result.converged {
        tracing::warn!("Replicas diverged after {} ticks", args.ticks);
    }

    if args.format == "text" {
        println!("Seed: {}", result.seed);
        println!("Ticks: {}  Mobs: {}  Inputs: {}", result.ticks, result.mobs, result.inputs);
        println!("Declined inputs: {}", result.declined_inputs);
        println!("Expired effects: {}", result.expired_effects);
        println!(
            "Synced snapshots: {} ({} bytes)",
            result.synced_snapshots, result.sync_bytes
        );
        println!("Syncs that repaired divergence: {}", result.repaired_syncs);
        println!("Feedback cues: {}", result.cues);
        println!("Converged: {}", result.converged);
    } else {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize result: {}", e),
        }
    }
}

/// Ship dirty authoritative state to the predicting copy
fn sync(
    system: &StunSystem,
    authoritative: &mut World,
    predicted: &mut World,
    result: &mut SimulationResult,
) {
    let diverged = full_state(authoritative) != full_state(predicted);
    let snapshots = collect_dirty(authoritative);
    let bytes = match encode(&snapshots) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Failed to encode snapshots: {}", e);
            return;
        }
    };
    result.sync_bytes += bytes.len();
    match decode(&bytes) {
        Ok(decoded) => result.synced_snapshots += system.restore_snapshots(predicted, &decoded),
        Err(e) => tracing::warn!("Failed to decode snapshots: {}", e),
    }
    collect_dirty(predicted);

    if diverged {
        result.repaired_syncs += 1;
    }
}

fn pick(rng: &mut ChaCha8Rng, mobs: &[EntityId]) -> EntityId {
    mobs[rng.gen_range(0..mobs.len())]
}

fn generate_inputs(rng: &mut ChaCha8Rng, mobs: &[EntityId]) -> Vec<Input> {
    let mut inputs = Vec::new();

    if rng.gen_bool(0.02) {
        inputs.push(Input::Paralyze {
            target: pick(rng, mobs),
            millis: rng.gen_range(500..5_000),
        });
    }
    if rng.gen_bool(0.03) {
        inputs.push(Input::Slowdown {
            target: pick(rng, mobs),
            millis: rng.gen_range(500..8_000),
            refresh: rng.gen_bool(0.5),
            walk: rng.gen_range(0.2..1.2),
            sprint: rng.gen_range(0.2..1.2),
        });
    }
    if rng.gen_bool(0.05) {
        inputs.push(Input::Help {
            user: pick(rng, mobs),
            target: pick(rng, mobs),
        });
    }
    if rng.gen_bool(0.005) {
        let state = match rng.gen_range(0..3) {
            0 => MobState::Alive,
            1 => MobState::Critical,
            _ => MobState::Dead,
        };
        inputs.push(Input::MobState {
            target: pick(rng, mobs),
            state,
        });
    }
    if rng.gen_bool(0.1) {
        inputs.push(Input::Throw {
            actor: pick(rng, mobs),
        });
    }
    if rng.gen_bool(0.1) {
        inputs.push(Input::Attack {
            actor: pick(rng, mobs),
            target: pick(rng, mobs),
        });
    }

    inputs
}

/// Apply an input; returns false when it was declined or vetoed
fn apply_input(system: &StunSystem, world: &mut World, input: &Input) -> bool {
    match *input {
        Input::Paralyze { target, millis } => {
            system.try_paralyze(world, target, TimeSpan::from_millis(millis))
        }
        Input::Slowdown {
            target,
            millis,
            refresh,
            walk,
            sprint,
        } => {
            let time = TimeSpan::from_millis(millis);
            system.try_slowdown(world, target, time, refresh, walk, sprint)
        }
        Input::Help { user, target } => system.interact_hand(world, user, target),
        Input::MobState { target, state } => {
            system.set_mob_state(world, target, state);
            true
        }
        Input::Throw { actor } => system.raise(world, actor, &mut ThrowAttempt::default()),
        Input::Attack { actor, target } => system.raise(
            world,
            actor,
            &mut AttackAttempt {
                target: Some(target),
                ..AttackAttempt::default()
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authority_only_inputs_are_repaired_by_sync() {
        let system = StunSystem::default();
        let mut authoritative = World::new();
        let mob = authoritative.spawn_mob("Urist");
        let helper = authoritative.spawn_mob("Helper");
        let mut predicted = authoritative.clone();
        let mut result = SimulationResult::default();

        let inputs = [
            Input::Paralyze { target: mob, millis: 4_000 },
            Input::Help { user: helper, target: mob },
        ];
        for input in &inputs {
            apply_input(&system, &mut authoritative, input);
            if !input.authority_only() {
                apply_input(&system, &mut predicted, input);
            }
        }
        assert_ne!(full_state(&authoritative), full_state(&predicted));

        sync(&system, &mut authoritative, &mut predicted, &mut result);
        assert_eq!(result.repaired_syncs, 1);
        assert_eq!(full_state(&authoritative), full_state(&predicted));

        sync(&system, &mut authoritative, &mut predicted, &mut result);
        assert_eq!(result.repaired_syncs, 1);
    }
}
