//! Kind-specific effect state
//!
//! Each component carries only the mutable fields that replicate; lifetime
//! fields (stage, remaining duration) live on the generic `StatusEffect`.

use serde::{Deserialize, Serialize};

use crate::effects::effect::{EffectData, EffectKind};

/// Typed access to the component stored inside an effect
pub trait EffectComponent: Sized + 'static {
    const KIND: EffectKind;

    fn project(data: &EffectData) -> Option<&Self>;

    fn project_mut(data: &mut EffectData) -> Option<&mut Self>;
}

/// Entity is lying on the ground and cannot stand until the effect ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KnockedDown {
    /// Seconds of knockdown removed by one helping hand
    pub help_interval: f32,
    /// Cooldown before another help is accepted (>= 0)
    pub help_timer: f32,
}

impl KnockedDown {
    pub fn new(help_interval: f32) -> Self {
        Self {
            help_interval,
            help_timer: 0.0,
        }
    }

    pub fn can_be_helped(&self) -> bool {
        self.help_timer <= 0.0
    }

    /// Start the helper cooldown and return how many seconds the help removes
    pub fn accept_help(&mut self) -> f32 {
        self.help_timer = self.help_interval / 2.0;
        self.help_interval
    }

    pub fn tick_help(&mut self, frame_time: f32) {
        self.help_timer = (self.help_timer - frame_time).max(0.0);
    }
}

impl EffectComponent for KnockedDown {
    const KIND: EffectKind = EffectKind::KnockedDown;

    fn project(data: &EffectData) -> Option<&Self> {
        match data {
            EffectData::KnockedDown(c) => Some(c),
            _ => None,
        }
    }

    fn project_mut(data: &mut EffectData) -> Option<&mut Self> {
        match data {
            EffectData::KnockedDown(c) => Some(c),
            _ => None,
        }
    }
}

/// Presence alone blocks actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stunned;

impl EffectComponent for Stunned {
    const KIND: EffectKind = EffectKind::Stunned;

    fn project(data: &EffectData) -> Option<&Self> {
        match data {
            EffectData::Stunned(c) => Some(c),
            _ => None,
        }
    }

    fn project_mut(data: &mut EffectData) -> Option<&mut Self> {
        match data {
            EffectData::Stunned(c) => Some(c),
            _ => None,
        }
    }
}

/// Multiplicative walk/sprint speed reduction, both within [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlowedDown {
    pub walk_speed_modifier: f32,
    pub sprint_speed_modifier: f32,
}

impl Default for SlowedDown {
    fn default() -> Self {
        Self {
            walk_speed_modifier: 1.0,
            sprint_speed_modifier: 1.0,
        }
    }
}

impl SlowedDown {
    /// Fold another application into the current modifiers.
    ///
    /// Multipliers are clamped to [0, 1] first, so stacking never speeds up.
    pub fn stack(&mut self, walk_multiplier: f32, sprint_multiplier: f32) {
        self.walk_speed_modifier *= clamp_unit(walk_multiplier);
        self.sprint_speed_modifier *= clamp_unit(sprint_multiplier);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl EffectComponent for SlowedDown {
    const KIND: EffectKind = EffectKind::SlowedDown;

    fn project(data: &EffectData) -> Option<&Self> {
        match data {
            EffectData::SlowedDown(c) => Some(c),
            _ => None,
        }
    }

    fn project_mut(data: &mut EffectData) -> Option<&mut Self> {
        match data {
            EffectData::SlowedDown(c) => Some(c),
            _ => None,
        }
    }
}

/// Clamp to [0, 1]; NaN counts as "no slowdown"
fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        1.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
