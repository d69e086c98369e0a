use serde::Serialize;
use std::fmt;

use crate::error::{Result, RuntimeError};

/// Lifecycle of one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionState {
    Received,
    Decoded,
    Ready,
    Invoking,
    Normalizing,
    Completed,
    Errored,
}

impl ExecutionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Decoded => "decoded",
            Self::Ready => "ready",
            Self::Invoking => "invoking",
            Self::Normalizing => "normalizing",
            Self::Completed => "completed",
            Self::Errored => "errored",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Errored)
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct ExecutionStateMachine;

impl ExecutionStateMachine {
    pub fn validate_transition(from: &ExecutionState, to: &ExecutionState) -> Result<()> {
        let allowed = Self::allowed_transitions(from);

        if allowed.contains(to) {
            Ok(())
        } else {
            Err(RuntimeError::InvalidTransition {
                from: *from,
                to: *to,
            })
        }
    }

    fn allowed_transitions(from: &ExecutionState) -> Vec<ExecutionState> {
        match from {
            ExecutionState::Received => vec![ExecutionState::Decoded, ExecutionState::Errored],
            ExecutionState::Decoded => vec![ExecutionState::Ready, ExecutionState::Errored],
            ExecutionState::Ready => vec![ExecutionState::Invoking, ExecutionState::Errored],
            ExecutionState::Invoking => vec![ExecutionState::Normalizing, ExecutionState::Errored],
            ExecutionState::Normalizing => vec![ExecutionState::Completed, ExecutionState::Errored],
            ExecutionState::Completed | ExecutionState::Errored => vec![],
        }
    }

    pub fn can_transition(from: &ExecutionState, to: &ExecutionState) -> bool {
        Self::validate_transition(from, to).is_ok()
    }

    pub fn next_state(current: &ExecutionState) -> Option<ExecutionState> {
        match current {
            ExecutionState::Received => Some(ExecutionState::Decoded),
            ExecutionState::Decoded => Some(ExecutionState::Ready),
            ExecutionState::Ready => Some(ExecutionState::Invoking),
            ExecutionState::Invoking => Some(ExecutionState::Normalizing),
            ExecutionState::Normalizing => Some(ExecutionState::Completed),
            ExecutionState::Completed | ExecutionState::Errored => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_path() {
        let mut state = ExecutionState::Received;
        let mut visited = vec![state];

        while let Some(next) = ExecutionStateMachine::next_state(&state) {
            assert!(ExecutionStateMachine::can_transition(&state, &next));
            state = next;
            visited.push(state);
        }

        assert_eq!(
            visited,
            vec![
                ExecutionState::Received,
                ExecutionState::Decoded,
                ExecutionState::Ready,
                ExecutionState::Invoking,
                ExecutionState::Normalizing,
                ExecutionState::Completed,
            ]
        );
    }

    #[test]
    fn test_errored_reachable_from_every_active_state() {
        for state in [
            ExecutionState::Received,
            ExecutionState::Decoded,
            ExecutionState::Ready,
            ExecutionState::Invoking,
            ExecutionState::Normalizing,
        ] {
            assert!(ExecutionStateMachine::can_transition(&state, &ExecutionState::Errored));
        }
    }

    #[test]
    fn test_terminal_states_are_absorbing() {
        for state in [ExecutionState::Completed, ExecutionState::Errored] {
            assert!(state.is_terminal());
            assert!(!ExecutionStateMachine::can_transition(&state, &ExecutionState::Received));
            assert!(!ExecutionStateMachine::can_transition(&state, &ExecutionState::Errored));
        }
    }

    #[test]
    fn test_skipping_steps_is_rejected() {
        let err = ExecutionStateMachine::validate_transition(
            &ExecutionState::Decoded,
            &ExecutionState::Invoking,
        )
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Invalid execution state transition from decoded to invoking"
        );
    }
}
