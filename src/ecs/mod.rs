pub mod world;

pub use world::{EntityRecord, World};
