//! Orchestrator run state machine.
//!
//! ```text
//! Pending → Running(i) → AwaitingHuman(i) → Running(i | next) → … → Completed
//!                    ↘                  ↘
//!                     Failed             Failed
//! ```
//!
//! Under the hierarchical model `next` is whatever stage the manager picks, so
//! `Running(i) → Running(j)` is legal for any `j`.

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// State of one investigation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunState {
    /// Plan built, nothing executed yet
    Pending,
    /// A stage is executing
    Running { stage_index: usize },
    /// A stage output awaits operator confirmation
    AwaitingHuman { stage_index: usize },
    /// Every stage accounted for
    Completed,
    /// Operator abort or cancellation
    Failed { reason: String },
}

impl Default for RunState {
    fn default() -> Self {
        Self::Pending
    }
}

impl RunState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running { .. } => "running",
            Self::AwaitingHuman { .. } => "awaiting_human",
            Self::Completed => "completed",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed { .. })
    }

    pub fn stage_index(&self) -> Option<usize> {
        match self {
            Self::Running { stage_index } | Self::AwaitingHuman { stage_index } => {
                Some(*stage_index)
            }
            _ => None,
        }
    }

    /// Check if this state can transition to another state.
    pub fn can_transition_to(&self, next: &Self) -> bool {
        match (self, next) {
            (Self::Pending, Self::Running { .. } | Self::Completed | Self::Failed { .. }) => true,
            (Self::Running { .. }, Self::Running { .. } | Self::Completed | Self::Failed { .. }) => {
                true
            }
            (Self::Running { stage_index: a }, Self::AwaitingHuman { stage_index: b }) => a == b,
            (Self::AwaitingHuman { .. }, Self::Running { .. } | Self::Failed { .. }) => true,
            (Self::AwaitingHuman { .. }, Self::Completed) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running { stage_index } | Self::AwaitingHuman { stage_index } => {
                write!(f, "{}({})", self.name(), stage_index)
            }
            Self::Failed { reason } => write!(f, "failed({reason})"),
            _ => f.write_str(self.name()),
        }
    }
}

/// Tracks the current state and the path taken through the machine.
#[derive(Debug, Clone, Default)]
pub struct RunStateMachine {
    current: RunState,
    history: Vec<RunState>,
}

impl RunStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &RunState {
        &self.current
    }

    /// Every state entered, in order, starting with `Pending`.
    pub fn history(&self) -> impl Iterator<Item = &RunState> {
        std::iter::once(&RunState::Pending).chain(self.history.iter())
    }

    pub fn transition(&mut self, next: RunState) -> DomainResult<()> {
        if !self.current.can_transition_to(&next) {
            return Err(DomainError::InvalidStateTransition {
                from: self.current.to_string(),
                to: next.to_string(),
            });
        }
        tracing::trace!(from = %self.current, to = %next, "run state transition");
        self.history.push(next.clone());
        self.current = next;
        Ok(())
    }

    /// Move to `Failed`. Always legal from a non-terminal state.
    pub fn fail(&mut self, reason: impl Into<String>) -> DomainResult<()> {
        self.transition(RunState::Failed {
            reason: reason.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_with_checkpoint() {
        let mut sm = RunStateMachine::new();
        sm.transition(RunState::Running { stage_index: 0 }).unwrap();
        sm.transition(RunState::AwaitingHuman { stage_index: 0 }).unwrap();
        sm.transition(RunState::Running { stage_index: 0 }).unwrap();
        sm.transition(RunState::AwaitingHuman { stage_index: 0 }).unwrap();
        sm.transition(RunState::Running { stage_index: 1 }).unwrap();
        sm.transition(RunState::Completed).unwrap();
        assert!(sm.current().is_terminal());
        assert_eq!(sm.history().count(), 7);
    }

    #[test]
    fn test_awaiting_human_must_match_running_stage() {
        let mut sm = RunStateMachine::new();
        sm.transition(RunState::Running { stage_index: 1 }).unwrap();
        let err = sm
            .transition(RunState::AwaitingHuman { stage_index: 2 })
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidStateTransition { .. }));
    }

    #[test]
    fn test_terminal_states_are_final() {
        let mut sm = RunStateMachine::new();
        sm.transition(RunState::Running { stage_index: 0 }).unwrap();
        sm.fail("operator abort").unwrap();
        assert!(sm.transition(RunState::Running { stage_index: 1 }).is_err());
        assert!(sm.transition(RunState::Completed).is_err());
        assert_eq!(sm.current().name(), "failed");
    }

    #[test]
    fn test_pending_cannot_await_human() {
        assert!(!RunState::Pending.can_transition_to(&RunState::AwaitingHuman { stage_index: 0 }));
    }

    #[test]
    fn test_run_state_serde() {
        let state = RunState::AwaitingHuman { stage_index: 3 };
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"state":"awaiting_human","stage_index":3}"#);
        let back: RunState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
