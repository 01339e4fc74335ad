//! Movement collaborator state: whether an entity may move and how fast

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementSpeed {
    pub base_walk_speed: f32,
    pub base_sprint_speed: f32,
    /// Product of every walk contributor from the last refresh
    pub walk_speed_modifier: f32,
    /// Product of every sprint contributor from the last refresh
    pub sprint_speed_modifier: f32,
    pub can_move: bool,
}

impl Default for MovementSpeed {
    fn default() -> Self {
        Self {
            base_walk_speed: 2.5,
            base_sprint_speed: 4.5,
            walk_speed_modifier: 1.0,
            sprint_speed_modifier: 1.0,
            can_move: true,
        }
    }
}

impl MovementSpeed {
    pub fn current_walk_speed(&self) -> f32 {
        self.base_walk_speed * self.walk_speed_modifier
    }

    pub fn current_sprint_speed(&self) -> f32 {
        self.base_sprint_speed * self.sprint_speed_modifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_speed_uses_modifiers() {
        let movement = MovementSpeed {
            walk_speed_modifier: 0.5,
            sprint_speed_modifier: 0.25,
            ..MovementSpeed::default()
        };
        assert_eq!(movement.current_walk_speed(), 1.25);
        assert_eq!(movement.current_sprint_speed(), 1.125);
    }
}
