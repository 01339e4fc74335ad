//! The signal abstraction shared by every attempt and query kind

use std::any::Any;

use serde::{Deserialize, Serialize};

/// Cancellation and consumption state carried by every signal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalFlags {
    pub cancelled: bool,
    pub handled: bool,
}

/// Anything that can be relayed through active status effects.
///
/// The signal type itself is the registration key, so new kinds can be
/// added anywhere without touching effect code.
pub trait Signal: Any {
    fn flags(&self) -> &SignalFlags;

    fn flags_mut(&mut self) -> &mut SignalFlags;

    fn cancel(&mut self) {
        self.flags_mut().cancelled = true;
    }

    fn is_cancelled(&self) -> bool {
        self.flags().cancelled
    }

    fn is_handled(&self) -> bool {
        self.flags().handled
    }
}

/// Implement [`Signal`] for structs with a `flags: SignalFlags` field
macro_rules! impl_signal {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::relay::signal::Signal for $ty {
                fn flags(&self) -> &$crate::relay::signal::SignalFlags {
                    &self.flags
                }

                fn flags_mut(&mut self) -> &mut $crate::relay::signal::SignalFlags {
                    &mut self.flags
                }
            }
        )*
    };
}

pub(crate) use impl_signal;
