//! Deferred side effects requested by effect handlers
//!
//! Handlers only see their own effect. Anything touching the rest of the
//! entity (posture, movement, other effects' timers, cues) is queued here and
//! flushed synchronously, in FIFO order, before the dispatch call returns.

use std::collections::VecDeque;

use crate::core::types::{EntityId, TimeSpan};
use crate::effects::{EffectKind, ModifyMode};
use crate::entity::feedback::FeedbackCue;
use crate::entity::posture::Posture;

#[derive(Debug, Clone, PartialEq)]
pub enum EffectCommand {
    /// Adjust an effect's remaining duration through the store
    ModifyEffect {
        entity: EntityId,
        kind: EffectKind,
        amount: TimeSpan,
        mode: ModifyMode,
    },
    /// Ask the posture collaborator to lay down or stand up the entity
    SetPosture { entity: EntityId, posture: Posture },
    /// Ask the movement collaborator to recompute whether the entity can move
    UpdateCanMove { entity: EntityId },
    /// Ask the movement collaborator to recompute walk/sprint speed
    RefreshMovementSpeed { entity: EntityId },
    /// Play a feedback cue
    PlayCue(FeedbackCue),
}

#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    commands: VecDeque<EffectCommand>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: EffectCommand) {
        self.commands.push_back(command);
    }

    pub fn pop(&mut self) -> Option<EffectCommand> {
        self.commands.pop_front()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectCommand> {
        self.commands.iter()
    }
}
