//! Generic interception layer between attempt signals and status effects

pub mod commands;
pub mod envelope;
pub mod registry;
pub mod signal;
pub mod signals;

pub use commands::{CommandQueue, EffectCommand};
pub use envelope::{RelayEnvelope, RelayOutcome};
pub use registry::{EffectContext, RelayRegistry};
pub use signal::{Signal, SignalFlags};
