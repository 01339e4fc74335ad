//! Relay envelope: the only thing an effect handler sees of an attempt

use crate::core::types::EntityId;
use crate::relay::signal::Signal;

/// What a handler wants done with the relayed signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Leave the signal untouched
    Pass,
    /// Veto the attempt; the raising subsystem aborts the action
    Cancel,
    /// Consume the signal so later generic handling treats it as done
    Handled,
}

/// Ties the original signal to the entity carrying the effect
pub struct RelayEnvelope<'a, S: Signal> {
    afflicted: EntityId,
    args: &'a mut S,
}

impl<'a, S: Signal> RelayEnvelope<'a, S> {
    pub fn new(afflicted: EntityId, args: &'a mut S) -> Self {
        Self { afflicted, args }
    }

    /// Entity the status effect is attached to
    pub fn afflicted(&self) -> EntityId {
        self.afflicted
    }

    pub fn args(&self) -> &S {
        self.args
    }

    /// Query-style signals are mutated in place (friction, speed)
    pub fn args_mut(&mut self) -> &mut S {
        self.args
    }

    pub fn cancel(&mut self) {
        self.args.cancel();
    }

    pub fn handled(&self) -> bool {
        self.args.is_handled()
    }

    pub fn mark_handled(&mut self) {
        self.args.flags_mut().handled = true;
    }

    /// Propagate a handler outcome back onto the wrapped signal
    pub fn apply(&mut self, outcome: RelayOutcome) {
        match outcome {
            RelayOutcome::Pass => {}
            RelayOutcome::Cancel => self.cancel(),
            RelayOutcome::Handled => self.mark_handled(),
        }
    }
}
