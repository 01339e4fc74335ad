//! Knockdown, stun and slowdown effects and the system that drives them

mod knockdown;
mod slowdown;
mod stunned;
pub mod system;

pub use system::StunSystem;
