//! Deterministic grid-world kernel primitives.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod agent;
pub mod direction;
pub mod position;
pub mod rng;
pub mod tick;
pub mod world;

pub use action::{ActionStatus, AgentAction};
pub use agent::AgentId;
pub use direction::Direction;
pub use position::Position;
pub use rng::{DeterministicRng, SplitMix64};
pub use tick::TickContext;
pub use world::{WorldMut, WorldView};
