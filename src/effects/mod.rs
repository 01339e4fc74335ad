//! Status effects: kinds, life stages, kind-specific components and the
//! per-entity store that owns them

pub mod components;
pub mod effect;
pub mod store;

pub use components::{EffectComponent, KnockedDown, SlowedDown, Stunned};
pub use effect::{
    EffectData, EffectHandle, EffectKind, LifeStage, ModifyMode, StackPolicy, StatusEffect,
};
pub use store::{EffectApplied, StatusEffects};
