//! ECS World - owns every entity, its collaborator components and its
//! status effect container

use std::collections::BTreeMap;

use crate::core::types::{EntityId, Tick};
use crate::effects::{EffectKind, StatusEffects};
use crate::entity::{FeedbackCue, MobState, MovementSpeed, Posture};

/// Components attached to one entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    pub name: String,
    /// None for entities that cannot receive status effects at all
    pub status: Option<StatusEffects>,
    pub posture: Posture,
    pub mob_state: MobState,
    pub movement: MovementSpeed,
}

/// The simulation world.
///
/// Entities are kept in id order so every pass over them is reproducible on
/// both the authoritative and the predicting copy.
#[derive(Debug, Clone, Default)]
pub struct World {
    pub current_tick: Tick,
    entities: BTreeMap<EntityId, EntityRecord>,
    cues: Vec<FeedbackCue>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a mob that accepts every status effect
    pub fn spawn_mob(&mut self, name: impl Into<String>) -> EntityId {
        self.spawn_with_allowed(name, EffectKind::ALL)
    }

    /// Spawn a mob whose container only accepts the listed effects
    pub fn spawn_with_allowed(
        &mut self,
        name: impl Into<String>,
        allowed: impl IntoIterator<Item = EffectKind>,
    ) -> EntityId {
        let entity_id = EntityId::new();
        self.insert(entity_id, name.into(), Some(StatusEffects::with_allowed(entity_id, allowed)));
        entity_id
    }

    /// Spawn an entity without a status effect container (walls, items...)
    pub fn spawn_without_status(&mut self, name: impl Into<String>) -> EntityId {
        let entity_id = EntityId::new();
        self.insert(entity_id, name.into(), None);
        entity_id
    }

    fn insert(&mut self, entity_id: EntityId, name: String, status: Option<StatusEffects>) {
        self.entities.insert(
            entity_id,
            EntityRecord {
                name,
                status,
                posture: Posture::default(),
                mob_state: MobState::default(),
                movement: MovementSpeed::default(),
            },
        );
    }

    pub fn despawn(&mut self, entity_id: EntityId) -> Option<EntityRecord> {
        self.entities.remove(&entity_id)
    }

    pub fn contains(&self, entity_id: EntityId) -> bool {
        self.entities.contains_key(&entity_id)
    }

    pub fn get(&self, entity_id: EntityId) -> Option<&EntityRecord> {
        self.entities.get(&entity_id)
    }

    pub fn get_mut(&mut self, entity_id: EntityId) -> Option<&mut EntityRecord> {
        self.entities.get_mut(&entity_id)
    }

    pub fn status(&self, entity_id: EntityId) -> Option<&StatusEffects> {
        self.entities.get(&entity_id)?.status.as_ref()
    }

    pub fn status_mut(&mut self, entity_id: EntityId) -> Option<&mut StatusEffects> {
        self.entities.get_mut(&entity_id)?.status.as_mut()
    }

    pub fn has_effect(&self, entity_id: EntityId, kind: EffectKind) -> bool {
        self.status(entity_id).is_some_and(|s| s.has(kind))
    }

    pub fn posture(&self, entity_id: EntityId) -> Option<Posture> {
        self.entities.get(&entity_id).map(|e| e.posture)
    }

    pub fn mob_state(&self, entity_id: EntityId) -> Option<MobState> {
        self.entities.get(&entity_id).map(|e| e.mob_state)
    }

    pub fn movement(&self, entity_id: EntityId) -> Option<&MovementSpeed> {
        self.entities.get(&entity_id).map(|e| &e.movement)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Entity ids in ascending order
    pub fn entity_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &EntityRecord)> {
        self.entities.iter().map(|(id, record)| (*id, record))
    }

    pub fn entities_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut EntityRecord)> {
        self.entities.iter_mut().map(|(id, record)| (*id, record))
    }

    pub fn tick(&mut self) {
        self.current_tick += 1;
    }

    pub fn push_cue(&mut self, cue: FeedbackCue) {
        self.cues.push(cue);
    }

    pub fn cues(&self) -> &[FeedbackCue] {
        &self.cues
    }

    /// Hand queued cues to the audio layer
    pub fn drain_cues(&mut self) -> Vec<FeedbackCue> {
        std::mem::take(&mut self.cues)
    }
}
