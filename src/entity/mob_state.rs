//! Health state of a mob as reported by the damage subsystem

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MobState {
    Invalid,
    #[default]
    Alive,
    Critical,
    Dead,
}

impl MobState {
    /// Critical or dead mobs are past caring about stuns
    pub fn is_incapacitated(&self) -> bool {
        matches!(self, MobState::Critical | MobState::Dead)
    }
}
