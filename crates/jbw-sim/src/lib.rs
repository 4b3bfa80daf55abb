//! Reference world for jbw agents.
//!
//! [`Simulator`] grows an infinite grid on demand with a Gibbs-sampled item
//! field, renders an egocentric color window for each agent and applies
//! their moves and turns.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod config;
pub mod render;
pub mod simulator;

pub use config::{ConfigError, SimConfig, Signatures, DEFAULT_CONFIG_YAML};
pub use render::ascii_map;
pub use simulator::{AgentState, SimError, Simulator};
