pub mod config;
pub mod error;
pub mod types;

pub use config::{StunConfig, KNOCKDOWN_FRICTION_MODIFIER, MAX_TICK_RATE};
pub use error::{Result, StatusError};
pub use types::{EntityId, Tick, TimeSpan};
