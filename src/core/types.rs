//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// Signed span of simulation time, stored as whole microseconds
///
/// Integer storage keeps timer arithmetic bit-identical between the
/// authoritative simulation and a predicting client.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TimeSpan(pub i64);

impl TimeSpan {
    pub const ZERO: TimeSpan = TimeSpan(0);

    const MICROS_PER_SEC: f64 = 1_000_000.0;

    pub fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    pub fn from_millis(millis: i64) -> Self {
        Self(millis * 1_000)
    }

    pub fn from_secs(secs: i64) -> Self {
        Self(secs * 1_000_000)
    }

    /// Convert fractional seconds, rounding to the nearest microsecond
    pub fn from_secs_f32(secs: f32) -> Self {
        Self((secs as f64 * Self::MICROS_PER_SEC).round() as i64)
    }

    pub fn as_micros(&self) -> i64 {
        self.0
    }

    pub fn as_secs_f32(&self) -> f32 {
        (self.0 as f64 / Self::MICROS_PER_SEC) as f32
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Clamp negative spans to zero
    pub fn max_zero(self) -> Self {
        Self(self.0.max(0))
    }
}

impl std::ops::Add for TimeSpan {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl std::ops::Sub for TimeSpan {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl std::ops::Neg for TimeSpan {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}s", self.0 as f64 / Self::MICROS_PER_SEC)
    }
}
