use core::fmt::Debug;

/// Identifies an agent inside a simulator.
///
/// Controllers are stepped in ascending `stable_id` order, and the id seeds
/// each agent's RNG stream through [`crate::TickContext::rng_for_agent`].
pub trait AgentId: Copy + Ord + Eq + Debug {
    fn stable_id(self) -> u64;
}

impl AgentId for u64 {
    fn stable_id(self) -> u64 {
        self
    }
}
