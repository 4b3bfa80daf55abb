//! Markov-random-field world generation.
//!
//! An [`ItemCatalog`] assigns every item type an intensity and every ordered
//! pair of types an interaction energy. [`GibbsField`] resamples the occupant of
//! each cell of a set of patches from its conditional distribution given the
//! items around it; [`PatchMap`] is an in-memory [`PatchStore`] that uses the
//! sampler to grow the world around an agent.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod categorical;
pub mod energy;
pub mod gibbs;
pub mod map;
pub mod patch;

pub use catalog::{
    CatalogConfig, CatalogError, IntensityConfig, InteractionConfig, ItemCatalog, ItemType,
    ItemTypeConfig,
};
pub use energy::{EnergyModel, IntensityFn, InteractionFn};
pub use gibbs::{CellConditional, CellUpdate, GibbsField, SweepStats};
pub use map::{GenerationReport, PatchMap};
pub use patch::{Neighborhood, Patch, PatchStore};
