//! Per-entity effect container
//!
//! The store is the only place that creates, times and detaches effects.
//! Lifecycle callbacks are not fired here: the store reports transitions and
//! `StunSystem` relays them to the effect handlers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, StatusError};
use crate::core::types::{EntityId, TimeSpan};
use crate::core::StunConfig;
use crate::effects::effect::{
    EffectData, EffectHandle, EffectKind, LifeStage, ModifyMode, StackPolicy, StatusEffect,
};

/// Outcome of a successful `try_apply`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectApplied {
    pub handle: EffectHandle,
    /// True when a new instance was created (it still needs its start callback)
    pub created: bool,
}

/// The set of active effects on one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffects {
    owner: EntityId,
    allowed: Vec<EffectKind>,
    effects: BTreeMap<EffectKind, StatusEffect>,
}

impl StatusEffects {
    /// Container accepting every effect kind
    pub fn new(owner: EntityId) -> Self {
        Self::with_allowed(owner, EffectKind::ALL)
    }

    /// Container accepting only the listed kinds
    pub fn with_allowed(owner: EntityId, allowed: impl IntoIterator<Item = EffectKind>) -> Self {
        let mut allowed: Vec<EffectKind> = allowed.into_iter().collect();
        allowed.sort();
        allowed.dedup();
        Self {
            owner,
            allowed,
            effects: BTreeMap::new(),
        }
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn allows(&self, kind: EffectKind) -> bool {
        self.allowed.contains(&kind)
    }

    /// Apply an effect, or stack onto the active instance of the same kind
    pub fn try_apply(
        &mut self,
        kind: EffectKind,
        duration: TimeSpan,
        policy: StackPolicy,
        config: &StunConfig,
    ) -> Result<EffectApplied> {
        if !duration.is_positive() {
            return Err(StatusError::NonPositiveDuration(duration));
        }
        if !self.allows(kind) {
            return Err(StatusError::EffectNotAllowed {
                entity: self.owner,
                kind,
            });
        }

        let handle = EffectHandle {
            entity: self.owner,
            kind,
        };

        if let Some(effect) = self.effects.get_mut(&kind) {
            effect.remaining = match policy {
                StackPolicy::Replace => duration,
                StackPolicy::AddTime => effect.remaining + duration,
            };
            effect.mark_dirty();
            return Ok(EffectApplied {
                handle,
                created: false,
            });
        }

        let effect = StatusEffect::new(self.owner, duration, EffectData::new(kind, config));
        self.effects.insert(kind, effect);
        Ok(EffectApplied {
            handle,
            created: true,
        })
    }

    /// Promote a freshly added effect to Running
    pub(crate) fn start(&mut self, kind: EffectKind) {
        if let Some(effect) = self.effects.get_mut(&kind) {
            effect.advance_stage(LifeStage::Running);
        }
    }

    /// Adjust the remaining duration of an active effect.
    ///
    /// Returns false (and changes nothing) if the effect is absent.
    pub fn modify(&mut self, kind: EffectKind, amount: TimeSpan, mode: ModifyMode) -> bool {
        let Some(effect) = self.effects.get_mut(&kind) else {
            return false;
        };

        let next = match mode {
            ModifyMode::AddTime => effect.remaining + amount,
            ModifyMode::Set => amount,
        };
        effect.remaining = next.max_zero();
        effect.mark_dirty();
        true
    }

    /// Count down every Running effect.
    ///
    /// Effects whose time ran out move to Removed and are returned in kind
    /// order; they stay attached until `detach` so shutdown callbacks can
    /// still see them.
    pub(crate) fn advance(&mut self, frame_time: TimeSpan) -> Vec<EffectKind> {
        let mut expired = Vec::new();
        for (kind, effect) in self.effects.iter_mut() {
            if effect.stage != LifeStage::Running {
                continue;
            }
            let next = effect.remaining - frame_time;
            effect.remaining = next.max_zero();
            if !next.is_positive() {
                effect.advance_stage(LifeStage::Removed);
                expired.push(*kind);
            }
        }
        expired
    }

    /// Flag an effect for removal ahead of its timer
    pub(crate) fn begin_removal(&mut self, kind: EffectKind) -> bool {
        match self.effects.get_mut(&kind) {
            Some(effect) => effect.advance_stage(LifeStage::Removed),
            None => false,
        }
    }

    pub(crate) fn detach(&mut self, kind: EffectKind) -> Option<StatusEffect> {
        self.effects.remove(&kind)
    }

    pub fn has(&self, kind: EffectKind) -> bool {
        self.effects.contains_key(&kind)
    }

    pub fn get(&self, kind: EffectKind) -> Option<&StatusEffect> {
        self.effects.get(&kind)
    }

    pub fn get_mut(&mut self, kind: EffectKind) -> Option<&mut StatusEffect> {
        self.effects.get_mut(&kind)
    }

    pub fn remaining(&self, kind: EffectKind) -> Option<TimeSpan> {
        self.effects.get(&kind).map(|e| e.remaining)
    }

    pub fn kinds(&self) -> impl Iterator<Item = EffectKind> + '_ {
        self.effects.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut StatusEffect> {
        self.effects.values_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }
}
