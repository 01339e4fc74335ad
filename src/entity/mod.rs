//! Host-side components the status effects talk to through commands

pub mod feedback;
pub mod mob_state;
pub mod movement;
pub mod posture;

pub use feedback::FeedbackCue;
pub use mob_state::MobState;
pub use movement::MovementSpeed;
pub use posture::Posture;
