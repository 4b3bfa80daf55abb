#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of asking the world to perform an agent action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ActionStatus {
    Ok,
    /// The target cell is occupied by something that blocks movement.
    Blocked,
    /// The world's action policy forbids this move or turn.
    Disallowed,
    UnknownAgent,
}

/// The three single-step actions an agent can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AgentAction {
    MoveForward,
    TurnLeft,
    TurnRight,
}
