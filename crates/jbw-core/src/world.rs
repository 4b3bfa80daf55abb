use crate::AgentId;

/// A grid world that hosts agents.
///
/// Perception and movement live in `jbw-agent` as extension traits over this
/// pair. Generated terrain is held separately by the patch store.
pub trait WorldView {
    type Agent: AgentId;
}

/// A world that accepts agent actions.
pub trait WorldMut: WorldView {}
