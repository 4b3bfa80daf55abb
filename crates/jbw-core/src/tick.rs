use crate::{rng, AgentId, SplitMix64};

/// Per-tick context handed to controllers and the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickContext {
    pub tick: u64,
    pub seed: u64,
}

impl TickContext {
    pub fn new(tick: u64, seed: u64) -> Self {
        Self { tick, seed }
    }

    /// Fresh RNG for `agent` on `stream`, independent of every other agent and stream.
    pub fn rng_for_agent<A: AgentId>(&self, agent: A, stream: u64) -> SplitMix64 {
        let seed = rng::derive_seed(self.seed, agent.stable_id(), stream);
        SplitMix64::new(seed ^ rng::mix64(self.tick))
    }
}
