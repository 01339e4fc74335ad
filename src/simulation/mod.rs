pub mod tick;

pub use tick::{run_status_tick, run_until_clear, StatusEvent};
