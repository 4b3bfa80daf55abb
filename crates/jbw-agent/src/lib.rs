//! A greedy agent that walks toward the nearest visible goal item.
//!
//! Every tick the [`AgentController`] re-plans from the agent's current
//! vision, keeps its held plan unless the new one is strictly cheaper, and
//! issues exactly one action.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod controller;
pub mod world;

pub use controller::{tick_controllers, AgentController, ControllerError, TickReport};
pub use world::{AgentActions, VisionSource};
