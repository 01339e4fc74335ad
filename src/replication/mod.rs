//! Keeps authoritative and predicted effect state in step through explicit
//! snapshot / restore

pub mod state;
pub mod sync;

pub use state::{EffectComponentState, ReplicatedComponent};
pub use sync::{apply_snapshots, collect_dirty, decode, encode, full_state, EffectSnapshot};
