use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Edge length of one grid cell in world units.
///
/// Must stay at least as large as the biggest on-screen view extent, otherwise
/// streamed entities visibly pop in at the screen edge.
pub const CELL_LENGTH: f32 = 1600.0;

/// A square region of the 2D world identified by integer row/column indices.
///
/// `row` runs along the world X axis and `col` along the world Y axis.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct GridCell {
    pub row: i32,
    pub col: i32,
}

impl GridCell {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The cell containing world point `(x, y)`.
    ///
    /// Non-finite coordinates saturate to the extreme cells (NaN lands in 0).
    pub fn from_world_coords(x: f32, y: f32) -> Self {
        Self {
            row: (x / CELL_LENGTH).floor() as i32,
            col: (y / CELL_LENGTH).floor() as i32,
        }
    }

    pub fn from_world(pos: Vec2) -> Self {
        Self::from_world_coords(pos.x, pos.y)
    }

    /// The 3x3 neighbourhood around this cell, self included, in row-major order.
    pub fn adjacent_cells(&self) -> [GridCell; 9] {
        let mut out = [*self; 9];
        let mut i = 0;
        for dr in -1..=1 {
            for dc in -1..=1 {
                out[i] = GridCell::new(self.row.wrapping_add(dr), self.col.wrapping_add(dc));
                i += 1;
            }
        }
        out
    }

    /// Axis-aligned world-space bounds of this cell.
    pub fn to_world_rectangle(&self) -> WorldRect {
        WorldRect {
            x: self.row as f32 * CELL_LENGTH,
            y: self.col as f32 * CELL_LENGTH,
            width: CELL_LENGTH,
            height: CELL_LENGTH,
        }
    }

    /// Platform-independent identity key for deterministic generation.
    ///
    /// Row in the high 32 bits, column in the low 32 bits, so every cell maps to
    /// a distinct key. `std::hash::Hash` is randomized per process and must never
    /// be used for this.
    pub fn stable_hash(&self) -> i64 {
        ((self.row as i64) << 32) | (self.col as u32 as i64)
    }
}

impl std::fmt::Display for GridCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Axis-aligned rectangle in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl WorldRect {
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    /// Half-open containment: the min edges are inside, the max edges are not.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    /// Map unit fractions `(fx, fy)` in `[0, 1)` onto a point of the rectangle.
    ///
    /// The result always satisfies `contains`, even where f32 spacing is coarse.
    pub fn point_at(&self, fx: f32, fy: f32) -> Vec2 {
        Vec2::new(
            lerp_below(self.x, self.width, fx),
            lerp_below(self.y, self.height, fy),
        )
    }
}

/// `origin + t * extent` computed in f64, kept strictly below `origin + extent`.
fn lerp_below(origin: f32, extent: f32, t: f32) -> f32 {
    let v = (origin as f64 + t as f64 * extent as f64) as f32;
    let max = origin + extent;
    if v >= max { next_down(max).max(origin) } else { v }
}

/// Largest f32 strictly less than `x` (finite `x`).
fn next_down(x: f32) -> f32 {
    if x == 0.0 {
        -f32::from_bits(1)
    } else if x > 0.0 {
        f32::from_bits(x.to_bits() - 1)
    } else {
        f32::from_bits(x.to_bits() + 1)
    }
}

/// Half-open rectangular range of cells: `[row_min, row_max) x [col_min, col_max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRange {
    pub row_min: i32,
    pub col_min: i32,
    pub row_max: i32,
    pub col_max: i32,
}

impl CellRange {
    /// A range containing no cells.
    pub const EMPTY: CellRange = CellRange::new(0, 0, 0, 0);

    pub const fn new(row_min: i32, col_min: i32, row_max: i32, col_max: i32) -> Self {
        Self {
            row_min,
            col_min,
            row_max,
            col_max,
        }
    }

    /// `[center - radius, center + radius)` on both axes.
    pub fn around(center: GridCell, radius: i32) -> Self {
        Self {
            row_min: center.row.saturating_sub(radius),
            col_min: center.col.saturating_sub(radius),
            row_max: center.row.saturating_add(radius),
            col_max: center.col.saturating_add(radius),
        }
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        cell.row >= self.row_min
            && cell.row < self.row_max
            && cell.col >= self.col_min
            && cell.col < self.col_max
    }

    pub fn is_empty(&self) -> bool {
        self.row_min >= self.row_max || self.col_min >= self.col_max
    }

    /// Number of cells covered.
    pub fn area(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        let rows = (self.row_max as i64 - self.row_min as i64) as u64;
        let cols = (self.col_max as i64 - self.col_min as i64) as u64;
        rows * cols
    }

    /// Iterate covered cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + use<> {
        let (cols_lo, cols_hi) = (self.col_min, self.col_max);
        (self.row_min..self.row_max)
            .flat_map(move |row| (cols_lo..cols_hi).map(move |col| GridCell::new(row, col)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn from_world_coords_floors() {
        assert_eq!(GridCell::from_world_coords(10.0, 10.0), GridCell::new(0, 0));
        assert_eq!(
            GridCell::from_world_coords(1600.0, -0.5),
            GridCell::new(1, -1)
        );
        assert_eq!(
            GridCell::from_world_coords(-1600.0, -1600.1),
            GridCell::new(-1, -2)
        );
    }

    #[test]
    fn from_world_coords_is_total() {
        assert_eq!(GridCell::from_world_coords(f32::NAN, 0.0).row, 0);
        assert_eq!(GridCell::from_world_coords(f32::INFINITY, 0.0).row, i32::MAX);
        assert_eq!(
            GridCell::from_world_coords(0.0, f32::NEG_INFINITY).col,
            i32::MIN
        );
    }

    #[test]
    fn equal_cells_hash_equal() {
        let mut set = HashSet::new();
        set.insert(GridCell::new(3, -4));
        assert!(set.contains(&GridCell::new(3, -4)));
        assert!(!set.contains(&GridCell::new(-4, 3)));
    }

    #[test]
    fn adjacent_cells_is_3x3_with_self() {
        let c = GridCell::new(5, -2);
        let adj = c.adjacent_cells();
        assert_eq!(adj.len(), 9);
        assert!(adj.contains(&c));
        assert!(adj.contains(&GridCell::new(4, -3)));
        assert!(adj.contains(&GridCell::new(6, -1)));
        let unique: HashSet<_> = adj.iter().collect();
        assert_eq!(unique.len(), 9);
    }

    #[test]
    fn world_rectangle_origin_follows_row_col() {
        let rect = GridCell::new(2, -1).to_world_rectangle();
        assert_eq!(rect.x, 3200.0);
        assert_eq!(rect.y, -1600.0);
        assert_eq!(rect.width, CELL_LENGTH);
        assert_eq!(rect.height, CELL_LENGTH);
        assert!(rect.contains(Vec2::new(3200.0, -1600.0)));
        assert!(!rect.contains(Vec2::new(4800.0, -1000.0)));
    }

    #[test]
    fn rectangle_roundtrips_through_from_world() {
        let cell = GridCell::new(-7, 12);
        let p = cell.to_world_rectangle().point_at(0.5, 0.5);
        assert_eq!(GridCell::from_world(p), cell);
    }

    #[test]
    fn point_at_stays_inside_far_cells() {
        let below_one = f32::from_bits(1.0f32.to_bits() - 1);
        for cell in [
            GridCell::new(10_028, 10_016),
            GridCell::new(-10_029, -10_017),
            GridCell::new(20_000, -20_001),
        ] {
            let rect = cell.to_world_rectangle();
            for (fx, fy) in [(below_one, below_one), (0.0, below_one), (0.9999, 0.5)] {
                let p = rect.point_at(fx, fy);
                assert!(rect.contains(p), "{cell}: {p} outside {rect:?}");
                assert_eq!(GridCell::from_world(p), cell, "{cell}: {p}");
            }
        }
    }

    #[test]
    fn next_down_steps_one_ulp() {
        assert!(next_down(1600.0) < 1600.0);
        assert_eq!(next_down(16_046_400.0), 16_046_399.0);
        assert!(next_down(-14_400.0) < -14_400.0);
        assert!(next_down(0.0) < 0.0);
    }

    #[test]
    fn stable_hash_is_distinct_per_cell() {
        assert_eq!(GridCell::new(0, 0).stable_hash(), 0);
        assert_eq!(GridCell::new(0, 1).stable_hash(), 1);
        assert_eq!(GridCell::new(1, 0).stable_hash(), 1 << 32);
        assert_eq!(GridCell::new(0, -1).stable_hash(), 0xffff_ffff);
        assert_eq!(GridCell::new(-1, 0).stable_hash(), -(1i64 << 32));

        let keys: HashSet<i64> = CellRange::new(-20, -20, 20, 20)
            .cells()
            .map(|c| c.stable_hash())
            .collect();
        assert_eq!(keys.len(), 1600);
    }

    #[test]
    fn range_is_half_open() {
        let r = CellRange::new(-2, -2, 2, 2);
        assert!(r.contains(GridCell::new(-2, -2)));
        assert!(r.contains(GridCell::new(1, 1)));
        assert!(!r.contains(GridCell::new(2, 0)));
        assert!(!r.contains(GridCell::new(0, 2)));
        assert_eq!(r.area(), 16);
        assert_eq!(r.cells().count(), 16);
    }

    #[test]
    fn empty_range_has_no_cells() {
        assert!(CellRange::EMPTY.is_empty());
        assert_eq!(CellRange::EMPTY.cells().count(), 0);
        assert!(!CellRange::EMPTY.contains(GridCell::new(0, 0)));
        let inverted = CellRange::new(3, 3, 1, 5);
        assert!(inverted.is_empty());
        assert_eq!(inverted.area(), 0);
        assert_eq!(inverted.cells().count(), 0);
    }

    #[test]
    fn around_saturates_at_extremes() {
        let r = CellRange::around(GridCell::new(i32::MAX, i32::MIN), 4);
        assert_eq!(r.row_max, i32::MAX);
        assert_eq!(r.col_min, i32::MIN);
        assert_eq!(r.row_min, i32::MAX - 4);
    }
}
