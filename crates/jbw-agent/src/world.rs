use jbw_core::{ActionStatus, Direction, WorldMut, WorldView};

/// Worlds that render an egocentric color window per agent.
pub trait VisionSource: WorldView {
    /// Flat window buffer, see [`jbw_nav::VisionWindow`] for the layout.
    fn vision(&self, agent: Self::Agent) -> Option<&[f32]>;
    fn vision_radius(&self) -> i32;
    fn color_dimension(&self) -> usize;
}

/// Agent movement. Directions are relative to the agent's facing; `Up` is
/// forward.
pub trait AgentActions: WorldMut {
    fn move_agent(&mut self, agent: Self::Agent, direction: Direction, steps: u32)
        -> ActionStatus;
    fn turn_agent(&mut self, agent: Self::Agent, direction: Direction) -> ActionStatus;
}
