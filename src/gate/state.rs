use serde::Serialize;
use std::fmt;

use crate::gate::window::Evaluation;

/// Observable gate state, as shown by the dashboard page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GateState {
    /// Waiting view visible, countdown running
    Waiting,
    /// Main dashboard visible
    Open,
}

impl From<&Evaluation> for GateState {
    fn from(evaluation: &Evaluation) -> Self {
        if evaluation.is_open() {
            GateState::Open
        } else {
            GateState::Waiting
        }
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateState::Waiting => write!(f, "waiting"),
            GateState::Open => write!(f, "open"),
        }
    }
}

/// A change of gate state. `from` is `None` for the first observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: Option<GateState>,
    pub to: GateState,
}

/// Two-state machine fed one evaluation per poll.
///
/// Has no terminal state; it keeps observing for the life of the session.
#[derive(Debug, Clone, Default)]
pub struct GateMachine {
    current: Option<GateState>,
}

impl GateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an evaluation, returning a transition if the state changed
    pub fn observe(&mut self, evaluation: &Evaluation) -> Option<Transition> {
        let next = GateState::from(evaluation);
        if self.current == Some(next) {
            return None;
        }

        let transition = Transition {
            from: self.current,
            to: next,
        };
        self.current = Some(next);
        Some(transition)
    }
}
