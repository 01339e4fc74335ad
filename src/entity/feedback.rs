//! Feedback cues handed to the audio layer

use serde::{Deserialize, Serialize};

use crate::core::types::EntityId;

/// A sound to play at `source`.
///
/// When `predicted_by` is set, that entity's client already played it
/// locally and the authoritative copy must not echo it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackCue {
    pub sound: String,
    pub source: EntityId,
    pub predicted_by: Option<EntityId>,
}
