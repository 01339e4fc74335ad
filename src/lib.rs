//! Status Relay - tick-based status effects that intercept gameplay attempts

pub mod core;
pub mod ecs;
pub mod effects;
pub mod entity;
pub mod relay;
pub mod replication;
pub mod simulation;
pub mod stun;
