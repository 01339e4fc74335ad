//! Per-kind replicated component state (get-state / handle-state)

use serde::{Deserialize, Serialize};

use crate::effects::{EffectData, KnockedDown, SlowedDown, Stunned};

/// Exactly the mutable fields of each effect kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EffectComponentState {
    KnockedDown { help_interval: f32, help_timer: f32 },
    Stunned,
    SlowedDown { walk_speed_modifier: f32, sprint_speed_modifier: f32 },
}

/// A component that can be snapshotted and overwritten from a snapshot
pub trait ReplicatedComponent {
    fn get_state(&self) -> EffectComponentState;

    /// Overwrite from `state`; false if the state belongs to another kind
    fn handle_state(&mut self, state: &EffectComponentState) -> bool;
}

impl ReplicatedComponent for KnockedDown {
    fn get_state(&self) -> EffectComponentState {
        EffectComponentState::KnockedDown {
            help_interval: self.help_interval,
            help_timer: self.help_timer,
        }
    }

    fn handle_state(&mut self, state: &EffectComponentState) -> bool {
        if let EffectComponentState::KnockedDown {
            help_interval,
            help_timer,
        } = *state
        {
            self.help_interval = help_interval;
            self.help_timer = help_timer;
            return true;
        }
        false
    }
}

impl ReplicatedComponent for Stunned {
    fn get_state(&self) -> EffectComponentState {
        EffectComponentState::Stunned
    }

    fn handle_state(&mut self, state: &EffectComponentState) -> bool {
        matches!(state, EffectComponentState::Stunned)
    }
}

impl ReplicatedComponent for SlowedDown {
    fn get_state(&self) -> EffectComponentState {
        EffectComponentState::SlowedDown {
            walk_speed_modifier: self.walk_speed_modifier,
            sprint_speed_modifier: self.sprint_speed_modifier,
        }
    }

    fn handle_state(&mut self, state: &EffectComponentState) -> bool {
        if let EffectComponentState::SlowedDown {
            walk_speed_modifier,
            sprint_speed_modifier,
        } = *state
        {
            self.sprint_speed_modifier = sprint_speed_modifier;
            self.walk_speed_modifier = walk_speed_modifier;
            return true;
        }
        false
    }
}

impl ReplicatedComponent for EffectData {
    fn get_state(&self) -> EffectComponentState {
        match self {
            EffectData::KnockedDown(c) => c.get_state(),
            EffectData::Stunned(c) => c.get_state(),
            EffectData::SlowedDown(c) => c.get_state(),
        }
    }

    fn handle_state(&mut self, state: &EffectComponentState) -> bool {
        match self {
            EffectData::KnockedDown(c) => c.handle_state(state),
            EffectData::Stunned(c) => c.handle_state(state),
            EffectData::SlowedDown(c) => c.handle_state(state),
        }
    }
}
