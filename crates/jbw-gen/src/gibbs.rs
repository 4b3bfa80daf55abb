//! Sequential-scan Gibbs sampling of item occupancy.
//!
//! Cells are visited in patch-list order, then raster order within a patch
//! (x outer, y inner). Each update is visible to every later cell in the same
//! sweep, so the visiting order is part of the sampled distribution.

use jbw_core::{DeterministicRng, Position};
use tracing::warn;

use crate::categorical::{normalize_exp, sample_categorical};
use crate::{EnergyModel, PatchStore};

/// What a single cell update did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellUpdate {
    Unchanged,
    Changed {
        from: Option<usize>,
        to: Option<usize>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub cells: usize,
    pub changed: usize,
}

impl SweepStats {
    fn record(&mut self, update: CellUpdate) {
        self.cells += 1;
        if matches!(update, CellUpdate::Changed { .. }) {
            self.changed += 1;
        }
    }
}

/// Context of a cell's conditional distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellConditional {
    /// Patch that owns the cell.
    pub containing: Position,
    /// Current occupant, `None` if empty.
    pub occupant: Option<usize>,
}

/// Fill `probabilities` with the conditional distribution of the occupant of
/// `world_position`: one entry per item type, then one for "empty".
///
/// Returns `None` (and leaves `probabilities` empty) if the store holds no
/// patch containing the cell.
pub fn conditional_distribution<S, M>(
    store: &S,
    model: &M,
    world_position: Position,
    probabilities: &mut Vec<f64>,
) -> Option<CellConditional>
where
    S: PatchStore + ?Sized,
    M: EnergyModel + ?Sized,
{
    probabilities.clear();
    let neighborhood = store.neighborhood(world_position);
    let containing = neighborhood.containing()?;

    let item_type_count = model.item_type_count();
    probabilities.extend((0..item_type_count).map(|i| model.intensity(world_position, i)));

    let mut occupant = None;
    for patch_position in neighborhood.patch_positions() {
        let Some(patch) = store.patch(*patch_position) else {
            continue;
        };
        for (item_type, item_position) in patch.iter() {
            if item_position == world_position {
                occupant = Some(item_type);
                continue;
            }
            for (i, weight) in probabilities.iter_mut().enumerate() {
                *weight += model.interaction(world_position, item_position, i, item_type);
            }
        }
    }

    probabilities.push(0.0);
    normalize_exp(probabilities);
    Some(CellConditional {
        containing,
        occupant,
    })
}

/// Resample the occupant of one cell.
///
/// `scratch` is reused between calls to avoid allocating per cell.
pub fn sample_cell<S, M, R>(
    store: &mut S,
    model: &M,
    rng: &mut R,
    world_position: Position,
    scratch: &mut Vec<f64>,
) -> CellUpdate
where
    S: PatchStore + ?Sized,
    M: EnergyModel + ?Sized,
    R: DeterministicRng + ?Sized,
{
    let Some(cell) = conditional_distribution(&*store, model, world_position, scratch) else {
        return CellUpdate::Unchanged;
    };

    let sampled = sample_categorical(scratch.as_slice(), rng);
    let sampled = (sampled < model.item_type_count()).then_some(sampled);
    if sampled == cell.occupant {
        return CellUpdate::Unchanged;
    }

    let Some(patch) = store.patch_mut(cell.containing) else {
        return CellUpdate::Unchanged;
    };
    if let Some(old) = cell.occupant {
        let removed = patch.remove_item(old, world_position);
        debug_assert!(removed, "occupant of {world_position} missing from its patch");
    }
    if let Some(new) = sampled {
        patch.add_item(new, world_position);
    }

    CellUpdate::Changed {
        from: cell.occupant,
        to: sampled,
    }
}

/// A Gibbs sampler over a fixed, ordered list of patches.
pub struct GibbsField<'a, S: ?Sized, M: ?Sized> {
    store: &'a mut S,
    model: &'a M,
    patch_positions: &'a [Position],
    scratch: Vec<f64>,
}

impl<'a, S, M> GibbsField<'a, S, M>
where
    S: PatchStore + ?Sized,
    M: EnergyModel + ?Sized,
{
    pub fn new(store: &'a mut S, model: &'a M, patch_positions: &'a [Position]) -> Self {
        let scratch = Vec::with_capacity(model.item_type_count() + 1);
        Self {
            store,
            model,
            patch_positions,
            scratch,
        }
    }

    /// One full sweep over every cell of every patch.
    pub fn sample<R: DeterministicRng + ?Sized>(&mut self, rng: &mut R) -> SweepStats {
        let mut stats = SweepStats::default();
        let patch_positions = self.patch_positions;
        for &patch_position in patch_positions {
            self.sample_patch(patch_position, &mut *rng, &mut stats);
        }
        stats
    }

    fn sample_patch<R: DeterministicRng + ?Sized>(
        &mut self,
        patch_position: Position,
        rng: &mut R,
        stats: &mut SweepStats,
    ) {
        if self.store.patch(patch_position).is_none() {
            warn!(patch = %patch_position, "skipping unknown patch");
            return;
        }

        let n = i64::from(self.store.patch_size());
        let origin = patch_position * n;
        for x in 0..n {
            for y in 0..n {
                let update = sample_cell(
                    &mut *self.store,
                    self.model,
                    &mut *rng,
                    origin + Position::new(x, y),
                    &mut self.scratch,
                );
                stats.record(update);
            }
        }
    }
}
