use jbw_core::{
    ActionStatus, AgentAction, AgentId, DeterministicRng, Direction, Position, TickContext,
};
use jbw_nav::{NavError, Plan, PlanError, ShortestPathPlanner, VisionWindow};
use thiserror::Error;
use tracing::{debug, error, trace};

use crate::{AgentActions, VisionSource};

/// RNG stream for the fallback turn choice.
const FALLBACK_STREAM: u64 = 0x7475_726e;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error("agent {0} has no vision")]
    MissingVision(u64),
    #[error(transparent)]
    Nav(#[from] NavError),
    #[error("held plan is inconsistent: {0}")]
    Plan(#[from] PlanError),
}

/// What one controller tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub action: AgentAction,
    pub status: ActionStatus,
    /// A newly found plan was adopted this tick.
    pub replaced: bool,
    /// No plan was held; the action came from the fallback policy.
    pub fallback: bool,
    /// Actions left on the held plan after this tick, `None` once it is done.
    pub remaining_cost: Option<u32>,
}

#[derive(Debug)]
pub struct AgentController<A: AgentId> {
    agent: A,
    goal: Vec<f32>,
    wall: Vec<f32>,
    planner: ShortestPathPlanner,
    plan: Option<Plan>,
    cursor: usize,
}

impl<A: AgentId> AgentController<A> {
    pub fn new(agent: A, goal: Vec<f32>, wall: Vec<f32>) -> Self {
        Self {
            agent,
            goal,
            wall,
            planner: ShortestPathPlanner::new(),
            plan: None,
            cursor: 0,
        }
    }

    pub fn agent(&self) -> A {
        self.agent
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn planner(&self) -> &ShortestPathPlanner {
        &self.planner
    }

    /// Hold `plan` from its first step. Plans with no actions are ignored.
    pub fn adopt_plan(&mut self, plan: Plan) {
        self.plan = (plan.len() > 1).then_some(plan);
        self.cursor = 0;
    }

    pub fn tick<W>(&mut self, ctx: &TickContext, world: &mut W) -> Result<TickReport, ControllerError>
    where
        W: VisionSource<Agent = A> + AgentActions,
    {
        let (found, wall_ahead) = {
            let buffer = world
                .vision(self.agent)
                .ok_or(ControllerError::MissingVision(self.agent.stable_id()))?;
            let vision = VisionWindow::new(buffer, world.vision_radius(), world.color_dimension())?;
            let found = self.planner.find_path(&vision, &self.goal, &self.wall)?;
            (found, vision.matches(Position::new(0, 1), &self.wall))
        };

        let replace = match (&self.plan, &found) {
            (None, _) => true,
            (Some(held), Some(new)) => new.cost() < held.remaining_cost(self.cursor),
            (Some(_), None) => false,
        };
        let mut replaced = false;
        if replace {
            if let Some(new) = &found {
                debug!(
                    agent = self.agent.stable_id(),
                    cost = new.cost(),
                    previous = self.plan.as_ref().map(|p| p.remaining_cost(self.cursor)),
                    "adopting new plan"
                );
                replaced = true;
            }
            self.plan = found;
            self.cursor = 0;
        }

        let (action, fallback) = match &self.plan {
            Some(plan) => match plan.action_at(self.cursor) {
                Ok(action) => (action, false),
                Err(err) => {
                    error!(agent = self.agent.stable_id(), cursor = self.cursor, %err, "invalid plan");
                    self.plan = None;
                    self.cursor = 0;
                    return Err(err.into());
                }
            },
            None => {
                let action = if !wall_ahead {
                    AgentAction::MoveForward
                } else if ctx.rng_for_agent(self.agent, FALLBACK_STREAM).next_bool() {
                    AgentAction::TurnLeft
                } else {
                    AgentAction::TurnRight
                };
                (action, true)
            }
        };

        let status = match action {
            AgentAction::MoveForward => world.move_agent(self.agent, Direction::Up, 1),
            AgentAction::TurnLeft => world.turn_agent(self.agent, Direction::Left),
            AgentAction::TurnRight => world.turn_agent(self.agent, Direction::Right),
        };

        let mut remaining_cost = None;
        if let Some(plan) = &self.plan {
            self.cursor += 1;
            if self.cursor + 1 >= plan.len() {
                self.plan = None;
                self.cursor = 0;
            } else {
                remaining_cost = Some(plan.remaining_cost(self.cursor));
            }
        }

        trace!(
            tick = ctx.tick,
            agent = self.agent.stable_id(),
            ?action,
            ?status,
            fallback,
            "agent acted"
        );
        Ok(TickReport {
            action,
            status,
            replaced,
            fallback,
            remaining_cost,
        })
    }
}

/// Tick every controller once, in ascending agent-id order. Stops at the
/// first fault.
pub fn tick_controllers<W>(
    ctx: &TickContext,
    world: &mut W,
    controllers: &mut [AgentController<W::Agent>],
) -> Result<Vec<TickReport>, ControllerError>
where
    W: VisionSource + AgentActions,
{
    controllers.sort_by_key(|c| c.agent.stable_id());
    controllers
        .iter_mut()
        .map(|controller| controller.tick(ctx, world))
        .collect()
}
