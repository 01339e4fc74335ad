use thiserror::Error;

use crate::core::types::{EntityId, TimeSpan};
use crate::effects::EffectKind;

#[derive(Error, Debug)]
pub enum StatusError {
    #[error("Entity not found: {0:?}")]
    EntityNotFound(EntityId),

    #[error("Entity has no status effect container: {0:?}")]
    NoEffectContainer(EntityId),

    #[error("Effect duration must be positive, got {0}")]
    NonPositiveDuration(TimeSpan),

    #[error("Effect {kind:?} is not allowed on entity {entity:?}")]
    EffectNotAllowed { entity: EntityId, kind: EffectKind },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StatusError>;
