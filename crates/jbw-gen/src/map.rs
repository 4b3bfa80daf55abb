use std::collections::BTreeMap;

use jbw_core::{DeterministicRng, Position};
use tracing::debug;

use crate::{EnergyModel, GibbsField, Neighborhood, Patch, PatchStore};

/// Outcome of growing the world around a point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub new_patches: usize,
    pub sampled_patches: usize,
    pub changed_cells: usize,
}

/// In-memory patch storage keyed by patch position.
#[derive(Debug, Clone)]
pub struct PatchMap {
    patch_size: u32,
    item_type_count: usize,
    patches: BTreeMap<Position, Patch>,
}

impl PatchMap {
    pub fn new(patch_size: u32, item_type_count: usize) -> Self {
        assert!(patch_size > 0, "patch_size must be > 0");
        Self {
            patch_size,
            item_type_count,
            patches: BTreeMap::new(),
        }
    }

    pub fn item_type_count(&self) -> usize {
        self.item_type_count
    }

    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }

    pub fn contains_patch(&self, patch_position: Position) -> bool {
        self.patches.contains_key(&patch_position)
    }

    /// Patches in ascending patch-position order.
    pub fn patches(&self) -> impl Iterator<Item = (Position, &Patch)> {
        self.patches.iter().map(|(p, patch)| (*p, patch))
    }

    pub fn get_or_create(&mut self, patch_position: Position) -> &mut Patch {
        let item_type_count = self.item_type_count;
        self.patches
            .entry(patch_position)
            .or_insert_with(|| Patch::new(item_type_count))
    }

    /// `(item_type, position)` for every item in the map.
    pub fn items(&self) -> impl Iterator<Item = (usize, Position)> + '_ {
        self.patches.values().flat_map(Patch::iter)
    }

    pub fn item_at(&self, world_position: Position) -> Option<usize> {
        let (patch, _) = world_position.to_patch(self.patch_size);
        self.patches.get(&patch)?.occupant(world_position)
    }

    /// Place an item, creating its patch if needed. Fails if the cell is occupied.
    pub fn insert_item(&mut self, world_position: Position, item_type: usize) -> bool {
        if item_type >= self.item_type_count || self.item_at(world_position).is_some() {
            return false;
        }
        let (patch, _) = world_position.to_patch(self.patch_size);
        self.get_or_create(patch).add_item(item_type, world_position);
        true
    }

    /// Take the item out of a cell, returning its type.
    pub fn remove_item(&mut self, world_position: Position) -> Option<usize> {
        let (patch_position, _) = world_position.to_patch(self.patch_size);
        let patch = self.patches.get_mut(&patch_position)?;
        let item_type = patch.occupant(world_position)?;
        patch.remove_item(item_type, world_position);
        Some(item_type)
    }

    /// Make sure every patch within `radius + patch_size` cells of `center`
    /// exists and is fixed.
    ///
    /// Missing patches are created empty; every unfixed patch in the region is
    /// then sampled `mcmc_iterations` times as one field (ascending patch
    /// order) and marked fixed.
    pub fn generate_around<M, R>(
        &mut self,
        center: Position,
        radius: u32,
        model: &M,
        rng: &mut R,
        mcmc_iterations: u32,
    ) -> GenerationReport
    where
        M: EnergyModel + ?Sized,
        R: DeterministicRng + ?Sized,
    {
        debug_assert_eq!(model.item_type_count(), self.item_type_count);

        let reach = i64::from(radius) + i64::from(self.patch_size);
        let (low, _) = (center - Position::new(reach, reach)).to_patch(self.patch_size);
        let (high, _) = (center + Position::new(reach, reach)).to_patch(self.patch_size);

        let mut report = GenerationReport::default();
        let mut pending = Vec::new();
        for x in low.x..=high.x {
            for y in low.y..=high.y {
                let key = Position::new(x, y);
                if !self.patches.contains_key(&key) {
                    report.new_patches += 1;
                }
                if !self.get_or_create(key).is_fixed() {
                    pending.push(key);
                }
            }
        }

        if pending.is_empty() {
            return report;
        }

        {
            let mut field = GibbsField::new(&mut *self, model, &pending);
            for _ in 0..mcmc_iterations {
                report.changed_cells += field.sample(&mut *rng).changed;
            }
        }
        for key in &pending {
            if let Some(patch) = self.patches.get_mut(key) {
                patch.set_fixed(true);
            }
        }
        report.sampled_patches = pending.len();

        debug!(
            center = %center,
            new_patches = report.new_patches,
            sampled_patches = report.sampled_patches,
            changed_cells = report.changed_cells,
            "generated world region"
        );
        report
    }
}

impl PatchStore for PatchMap {
    fn patch_size(&self) -> u32 {
        self.patch_size
    }

    fn neighborhood(&self, world_position: Position) -> Neighborhood {
        let (patch, within) = world_position.to_patch(self.patch_size);
        let half = i64::from(self.patch_size / 2);
        // The 2×2 block of patches whose shared corner is nearest the cell.
        let x0 = if within.x < half { patch.x - 1 } else { patch.x };
        let y0 = if within.y < half { patch.y - 1 } else { patch.y };

        let mut neighborhood = Neighborhood::default();
        for x in [x0, x0 + 1] {
            for y in [y0, y0 + 1] {
                let key = Position::new(x, y);
                if self.patches.contains_key(&key) {
                    neighborhood.push(key, key == patch);
                }
            }
        }
        neighborhood
    }

    fn patch(&self, patch_position: Position) -> Option<&Patch> {
        self.patches.get(&patch_position)
    }

    fn patch_mut(&mut self, patch_position: Position) -> Option<&mut Patch> {
        self.patches.get_mut(&patch_position)
    }
}
