use std::collections::BTreeMap;

use cellworld_common::{CellRange, GridCell};
use glam::Vec2;

use crate::random::DeterministicCellRandom;

/// A category of content generated one-per-cell.
///
/// Existence and position are decided by the store from the draws at `key`,
/// `key * 2` and `key * 3`. `generate` fills the category-specific fields and
/// must draw from other multiples of `key` only.
pub trait CellEntity: Clone + std::fmt::Debug {
    /// Name used in logs and stats.
    const CATEGORY: &'static str;
    /// Probability that a cell holds an entity of this category.
    const DEFAULT_SPAWN_CHANCE: f32;
    /// Mixed into the cell hash so categories sharing a seed are independent.
    const KEY_SALT: i64 = 0;

    fn generate(
        cell: GridCell,
        position: Vec2,
        key: i64,
        random: &DeterministicCellRandom,
    ) -> Self;

    fn position(&self) -> Vec2;
}

/// Generation key for `cell` in category `T`.
pub fn category_key<T: CellEntity>(cell: GridCell) -> i64 {
    cell.stable_hash() ^ T::KEY_SALT
}

/// Object-safe surface the world streamer drives.
pub trait StreamedStore {
    fn category(&self) -> &'static str;

    /// Populate empty cells of `range` that pass their spawn check. Returns the number spawned.
    fn spawn_in_range(&mut self, range: CellRange, random: &DeterministicCellRandom) -> usize;

    /// Drop every entity whose cell lies outside `range`. Returns the number removed.
    fn despawn_outside_range(&mut self, range: CellRange) -> usize;

    /// Number of populated cells.
    fn populated(&self) -> usize;
}

/// The in-memory set of streamed entities of one category, keyed by cell.
///
/// Uses BTreeMap so iteration and snapshots come out in the same order on
/// every run.
#[derive(Debug, Clone)]
pub struct EntityStreamStore<T: CellEntity> {
    entities: BTreeMap<GridCell, T>,
    spawn_chance: f32,
}

impl<T: CellEntity> Default for EntityStreamStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CellEntity> EntityStreamStore<T> {
    pub fn new() -> Self {
        Self::with_spawn_chance(T::DEFAULT_SPAWN_CHANCE)
    }

    pub fn with_spawn_chance(spawn_chance: f32) -> Self {
        Self {
            entities: BTreeMap::new(),
            spawn_chance,
        }
    }

    pub fn spawn_chance(&self) -> f32 {
        self.spawn_chance
    }

    /// Run the deterministic spawn check for one cell, ignoring current contents.
    pub fn roll(&self, cell: GridCell, random: &DeterministicCellRandom) -> Option<T> {
        let key = category_key::<T>(cell);
        if random.float_from(key) >= self.spawn_chance {
            return None;
        }
        let fx = random.float_from(key.wrapping_mul(2));
        let fy = random.float_from(key.wrapping_mul(3));
        let position = cell.to_world_rectangle().point_at(fx, fy);
        Some(T::generate(cell, position, key, random))
    }

    /// Generate every missing entity in `range`. Populated cells are left as they are.
    pub fn spawn_in_range(&mut self, range: CellRange, random: &DeterministicCellRandom) -> usize {
        let mut spawned = 0;
        for cell in range.cells() {
            if self.entities.contains_key(&cell) {
                continue;
            }
            if let Some(entity) = self.roll(cell, random) {
                self.entities.insert(cell, entity);
                spawned += 1;
            }
        }
        spawned
    }

    /// Remove every entity whose cell is outside `range`.
    pub fn despawn_outside_range(&mut self, range: CellRange) -> usize {
        let before = self.entities.len();
        self.entities.retain(|cell, _| range.contains(*cell));
        before - self.entities.len()
    }

    pub fn get(&self, cell: GridCell) -> Option<&T> {
        self.entities.get(&cell)
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        self.entities.contains_key(&cell)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GridCell, &T)> {
        self.entities.iter()
    }

    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        self.entities.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Snapshot of every entity position, in cell order.
    pub fn positions(&self) -> Vec<(GridCell, Vec2)> {
        self.entities
            .iter()
            .map(|(cell, e)| (*cell, e.position()))
            .collect()
    }

    /// Drop everything (new game).
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

impl<T: CellEntity> StreamedStore for EntityStreamStore<T> {
    fn category(&self) -> &'static str {
        T::CATEGORY
    }

    fn spawn_in_range(&mut self, range: CellRange, random: &DeterministicCellRandom) -> usize {
        EntityStreamStore::spawn_in_range(self, range, random)
    }

    fn despawn_outside_range(&mut self, range: CellRange) -> usize {
        EntityStreamStore::despawn_outside_range(self, range)
    }

    fn populated(&self) -> usize {
        self.len()
    }
}
