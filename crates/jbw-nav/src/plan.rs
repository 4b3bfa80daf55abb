use jbw_core::{AgentAction, Direction, Position};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("plan has no steps")]
    Empty,
    #[error("plan step {index} is not one action away from step {}", .index + 1)]
    InvalidTransition { index: usize },
    #[error("plan cursor {cursor} out of range for a plan of {len} steps")]
    CursorOutOfRange { cursor: usize, len: usize },
}

/// One state along a plan, in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlanStep {
    pub cost: u32,
    pub position: Position,
    pub facing: Direction,
}

/// The single action that takes `from` to `to`, if there is one.
pub fn infer_action(from: &PlanStep, to: &PlanStep) -> Option<AgentAction> {
    if to.facing == from.facing && to.position == from.position + from.facing.offset() {
        Some(AgentAction::MoveForward)
    } else if to.position != from.position {
        None
    } else if to.facing == from.facing.turn_left() {
        Some(AgentAction::TurnLeft)
    } else if to.facing == from.facing.turn_right() {
        Some(AgentAction::TurnRight)
    } else {
        None
    }
}

/// A state chain from the root (cost 0) to a goal.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Plan {
    steps: Vec<PlanStep>,
}

impl Plan {
    /// Wrap a chain. Only emptiness is checked here; transitions are checked
    /// lazily by [`Plan::action_at`].
    pub fn from_steps(steps: Vec<PlanStep>) -> Result<Self, PlanError> {
        if steps.is_empty() {
            return Err(PlanError::Empty);
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn goal(&self) -> Option<&PlanStep> {
        self.steps.last()
    }

    /// Total number of actions.
    pub fn cost(&self) -> u32 {
        self.steps.last().map_or(0, |s| s.cost)
    }

    /// Actions left once the agent stands on step `cursor`.
    pub fn remaining_cost(&self, cursor: usize) -> u32 {
        self.cost().saturating_sub(cursor as u32)
    }

    /// The action from step `index` to step `index + 1`.
    pub fn action_at(&self, index: usize) -> Result<AgentAction, PlanError> {
        let (Some(from), Some(to)) = (self.steps.get(index), self.steps.get(index + 1)) else {
            return Err(PlanError::CursorOutOfRange {
                cursor: index,
                len: self.steps.len(),
            });
        };
        infer_action(from, to).ok_or(PlanError::InvalidTransition { index })
    }

    pub fn actions(&self) -> Result<Vec<AgentAction>, PlanError> {
        (0..self.steps.len().saturating_sub(1))
            .map(|i| self.action_at(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(cost: u32, x: i64, y: i64, facing: Direction) -> PlanStep {
        PlanStep {
            cost,
            position: Position::new(x, y),
            facing,
        }
    }

    #[test]
    fn infers_each_action() {
        let root = step(0, 0, 0, Direction::Up);
        assert_eq!(
            infer_action(&root, &step(1, 0, 1, Direction::Up)),
            Some(AgentAction::MoveForward)
        );
        assert_eq!(
            infer_action(&root, &step(1, 0, 0, Direction::Left)),
            Some(AgentAction::TurnLeft)
        );
        assert_eq!(
            infer_action(&root, &step(1, 0, 0, Direction::Right)),
            Some(AgentAction::TurnRight)
        );
        assert_eq!(infer_action(&root, &step(1, 0, 0, Direction::Down)), None);
        assert_eq!(infer_action(&root, &step(1, 1, 0, Direction::Up)), None);
        assert_eq!(infer_action(&root, &step(1, 0, 1, Direction::Left)), None);
    }

    #[test]
    fn action_at_reports_faults() {
        let plan = Plan::from_steps(vec![
            step(0, 0, 0, Direction::Up),
            step(1, 0, 1, Direction::Up),
            step(2, 0, 3, Direction::Up),
        ])
        .unwrap();
        assert_eq!(plan.cost(), 2);
        assert_eq!(plan.remaining_cost(1), 1);
        assert_eq!(plan.action_at(0), Ok(AgentAction::MoveForward));
        assert_eq!(plan.action_at(1), Err(PlanError::InvalidTransition { index: 1 }));
        assert_eq!(
            plan.action_at(2),
            Err(PlanError::CursorOutOfRange { cursor: 2, len: 3 })
        );
        assert!(plan.actions().is_err());
        assert_eq!(Plan::from_steps(Vec::new()), Err(PlanError::Empty));
    }
}
