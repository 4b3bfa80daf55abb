use jbw_core::Position;

/// An n×n block of world cells and the items inside it, grouped by type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    item_positions: Vec<Vec<Position>>,
    fixed: bool,
}

impl Patch {
    pub fn new(item_type_count: usize) -> Self {
        Self {
            item_positions: vec![Vec::new(); item_type_count],
            fixed: false,
        }
    }

    pub fn item_type_count(&self) -> usize {
        self.item_positions.len()
    }

    /// Absolute positions of every `item_type` item in this patch, in no particular order.
    pub fn items(&self, item_type: usize) -> &[Position] {
        self.item_positions
            .get(item_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `(item_type, position)` for every item in the patch.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Position)> + '_ {
        self.item_positions
            .iter()
            .enumerate()
            .flat_map(|(t, positions)| positions.iter().map(move |p| (t, *p)))
    }

    pub fn item_count(&self) -> usize {
        self.item_positions.iter().map(Vec::len).sum()
    }

    pub fn add_item(&mut self, item_type: usize, position: Position) {
        debug_assert!(
            !self.items(item_type).contains(&position),
            "duplicate item at {position}"
        );
        self.item_positions[item_type].push(position);
    }

    /// Remove `position` from `item_type`'s collection. Returns whether it was present.
    pub fn remove_item(&mut self, item_type: usize, position: Position) -> bool {
        let Some(positions) = self.item_positions.get_mut(item_type) else {
            return false;
        };
        match positions.iter().position(|p| *p == position) {
            Some(i) => {
                positions.swap_remove(i);
                true
            }
            None => false,
        }
    }

    pub fn occupant(&self, position: Position) -> Option<usize> {
        self.item_positions
            .iter()
            .position(|positions| positions.contains(&position))
    }

    /// Fixed patches are final: frontier generation never resamples them.
    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn set_fixed(&mut self, fixed: bool) {
        self.fixed = fixed;
    }
}

/// The (up to four) patches whose items can influence a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighborhood {
    positions: [Position; 4],
    len: usize,
    containing: Option<usize>,
}

impl Default for Neighborhood {
    fn default() -> Self {
        Self {
            positions: [Position::ORIGIN; 4],
            len: 0,
            containing: None,
        }
    }
}

impl Neighborhood {
    /// Append a patch position; `contains_cell` marks the patch holding the queried cell.
    ///
    /// # Panics
    /// If more than four patches are pushed.
    pub fn push(&mut self, patch_position: Position, contains_cell: bool) {
        assert!(self.len < 4, "a neighborhood holds at most 4 patches");
        if contains_cell {
            self.containing = Some(self.len);
        }
        self.positions[self.len] = patch_position;
        self.len += 1;
    }

    pub fn patch_positions(&self) -> &[Position] {
        &self.positions[..self.len]
    }

    pub fn containing_index(&self) -> Option<usize> {
        self.containing
    }

    pub fn containing(&self) -> Option<Position> {
        self.containing.map(|i| self.positions[i])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Patch storage as seen by the sampler.
pub trait PatchStore {
    fn patch_size(&self) -> u32;

    /// Existing patches around `world_position` whose items interact with it.
    fn neighborhood(&self, world_position: Position) -> Neighborhood;

    fn patch(&self, patch_position: Position) -> Option<&Patch>;

    fn patch_mut(&mut self, patch_position: Position) -> Option<&mut Patch>;
}
