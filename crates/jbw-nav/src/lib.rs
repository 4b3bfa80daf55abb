//! Egocentric local navigation.
//!
//! [`ShortestPathPlanner`] runs a uniform-cost search over `(position, facing)`
//! states inside an agent's vision window, looking for the nearest cell that
//! shows a goal color. Search states live in a [`SearchNodePool`]; the winning
//! chain is copied out as a [`Plan`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod error;
pub mod plan;
pub mod planner;
pub mod pool;
pub mod vision;

pub use error::NavError;
pub use plan::{infer_action, Plan, PlanError, PlanStep};
pub use planner::{SearchStats, ShortestPathPlanner};
pub use pool::{NodeId, PoolStats, SearchNode, SearchNodePool};
pub use vision::VisionWindow;
