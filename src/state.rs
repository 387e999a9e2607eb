//! Animation state machine.
//!
//! ```text
//!            speak                 neutral reached
//!   Idle ───────────► Returning ───────────────────► Speaking
//!    ▲ │                  │                             │
//!    │ │ react            │ stop / error                │ queue done + grace,
//!    │ ▼                  ▼                             │ stop / error
//!  Reacting ─────────►  Idle  ◄─────────────────────────┘
//!          elapsed
//! ```
//!
//! The state also decides which subsystem owns the mouth channels this tick.

use tracing::{debug, warn};

use crate::weights::Subsystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationState {
    Idle,
    /// Relaxing to a neutral pose before the first segment starts.
    Returning,
    Speaking,
    /// A short reaction to user input, overriding idle motion.
    Reacting,
}

impl AnimationState {
    pub fn as_str(self) -> &'static str {
        match self {
            AnimationState::Idle => "idle",
            AnimationState::Returning => "returning",
            AnimationState::Speaking => "speaking",
            AnimationState::Reacting => "reacting",
        }
    }

    /// Subsystem allowed to write the mouth channels in this state.
    pub fn channel_owner(self) -> Subsystem {
        match self {
            AnimationState::Idle => Subsystem::Idle,
            AnimationState::Returning | AnimationState::Speaking => Subsystem::Speech,
            AnimationState::Reacting => Subsystem::Reaction,
        }
    }

    fn can_enter(self, to: AnimationState) -> bool {
        use AnimationState::*;
        matches!(
            (self, to),
            (Idle, Returning)
                | (Reacting, Returning)
                | (Returning, Speaking)
                | (Idle, Reacting)
                | (_, Idle)
        )
    }
}

#[derive(Debug, Clone)]
pub struct StateMachine {
    state: AnimationState,
    entered_ms: f64,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self { state: AnimationState::Idle, entered_ms: 0.0 }
    }
}

impl StateMachine {
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Milliseconds spent in the current state.
    pub fn time_in_state(&self, now_ms: f64) -> f64 {
        (now_ms - self.entered_ms).max(0.0)
    }

    /// Move to `to`.  Illegal transitions are refused and logged.
    pub fn transition(&mut self, to: AnimationState, now_ms: f64) -> bool {
        if self.state == to {
            return true;
        }
        if !self.state.can_enter(to) {
            warn!(from = self.state.as_str(), to = to.as_str(), "illegal animation state transition");
            return false;
        }
        debug!(from = self.state.as_str(), to = to.as_str(), "animation state");
        self.state = to;
        self.entered_ms = now_ms;
        true
    }
}
