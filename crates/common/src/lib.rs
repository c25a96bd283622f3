//! Shared types for the cellworld streaming core: grid cells, cell ranges, errors.
//!
//! # Invariants
//! - `GridCell` equality, `Hash` and `Ord` all agree on `(row, col)`.
//! - `GridCell::stable_hash` never changes between builds or platforms.
//! - `CellRange` is half-open on both axes.

mod cell;
mod error;

pub use cell::{CELL_LENGTH, CellRange, GridCell, WorldRect};
pub use error::{ConfigError, check_chance};
