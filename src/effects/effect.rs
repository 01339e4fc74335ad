//! Status effect instances and the vocabulary used to apply them

use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, TimeSpan};
use crate::core::StunConfig;
use crate::effects::components::{KnockedDown, SlowedDown, Stunned};

/// The closed set of effect kinds the engine knows how to run
///
/// Ordering is significant: effects on one entity are ticked in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    KnockedDown,
    Stunned,
    SlowedDown,
}

impl EffectKind {
    pub const ALL: [EffectKind; 3] = [
        EffectKind::KnockedDown,
        EffectKind::Stunned,
        EffectKind::SlowedDown,
    ];

    /// Prototype key used in logs
    pub fn key(&self) -> &'static str {
        match self {
            EffectKind::KnockedDown => "KnockedDown",
            EffectKind::Stunned => "Stun",
            EffectKind::SlowedDown => "SlowedDown",
        }
    }
}

/// Life stage of an effect. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LifeStage {
    Added,
    Running,
    Removed,
}

/// How a repeated application combines with an active effect's timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackPolicy {
    /// Remaining duration is reset to the new duration
    Replace,
    /// New duration is added on top of what remains
    AddTime,
}

impl StackPolicy {
    /// `refresh = true` replaces the timer, otherwise time accumulates
    pub fn from_refresh(refresh: bool) -> Self {
        if refresh {
            StackPolicy::Replace
        } else {
            StackPolicy::AddTime
        }
    }
}

/// How `modify` interprets its amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifyMode {
    /// Signed delta added to the remaining duration
    AddTime,
    /// Absolute remaining duration
    Set,
}

/// Stable reference to an effect: the owning entity plus the effect kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectHandle {
    pub entity: EntityId,
    pub kind: EffectKind,
}

/// Kind-specific state carried by an effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectData {
    KnockedDown(KnockedDown),
    Stunned(Stunned),
    SlowedDown(SlowedDown),
}

impl EffectData {
    /// Fresh component state for a newly created effect
    pub fn new(kind: EffectKind, config: &StunConfig) -> Self {
        match kind {
            EffectKind::KnockedDown => {
                EffectData::KnockedDown(KnockedDown::new(config.help_interval))
            }
            EffectKind::Stunned => EffectData::Stunned(Stunned),
            EffectKind::SlowedDown => EffectData::SlowedDown(SlowedDown::default()),
        }
    }

    pub fn kind(&self) -> EffectKind {
        match self {
            EffectData::KnockedDown(_) => EffectKind::KnockedDown,
            EffectData::Stunned(_) => EffectKind::Stunned,
            EffectData::SlowedDown(_) => EffectKind::SlowedDown,
        }
    }
}

/// A time-bounded modifier attached to one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    /// Owning entity. Lookup only; the entity's container owns the effect.
    owner: EntityId,
    kind: EffectKind,
    pub(crate) stage: LifeStage,
    pub(crate) remaining: TimeSpan,
    pub(crate) data: EffectData,
    /// Set when replicated fields changed since the last sync
    pub(crate) dirty: bool,
}

impl StatusEffect {
    pub(crate) fn new(owner: EntityId, duration: TimeSpan, data: EffectData) -> Self {
        Self {
            owner,
            kind: data.kind(),
            stage: LifeStage::Added,
            remaining: duration,
            data,
            dirty: true,
        }
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    pub fn stage(&self) -> LifeStage {
        self.stage
    }

    pub fn remaining(&self) -> TimeSpan {
        self.remaining
    }

    pub fn data(&self) -> &EffectData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut EffectData {
        &mut self.data
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Move to a later stage; requests to go backwards are ignored
    pub(crate) fn advance_stage(&mut self, stage: LifeStage) -> bool {
        if stage <= self.stage {
            return false;
        }
        self.stage = stage;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_life_stage_ordering() {
        assert!(LifeStage::Added < LifeStage::Running);
        assert!(LifeStage::Running < LifeStage::Removed);
    }

    #[test]
    fn test_stage_never_moves_backwards() {
        let data = EffectData::new(EffectKind::Stunned, &StunConfig::default());
        let mut effect = StatusEffect::new(EntityId::new(), TimeSpan::from_secs(1), data);

        assert!(effect.advance_stage(LifeStage::Running));
        assert!(!effect.advance_stage(LifeStage::Added));
        assert_eq!(effect.stage(), LifeStage::Running);
        assert!(effect.advance_stage(LifeStage::Removed));
        assert!(!effect.advance_stage(LifeStage::Running));
    }

    #[test]
    fn test_new_data_matches_kind() {
        let config = StunConfig::default();
        for kind in EffectKind::ALL {
            assert_eq!(EffectData::new(kind, &config).kind(), kind);
        }
    }

    #[test]
    fn test_stack_policy_from_refresh() {
        assert_eq!(StackPolicy::from_refresh(true), StackPolicy::Replace);
        assert_eq!(StackPolicy::from_refresh(false), StackPolicy::AddTime);
    }
}
