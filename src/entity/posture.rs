//! Standing / lying posture of a mob

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Posture {
    #[default]
    Standing,
    Down,
}

impl Posture {
    pub fn is_down(&self) -> bool {
        matches!(self, Posture::Down)
    }
}
