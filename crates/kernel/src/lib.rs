//! World Kernel: the streamed world of one game session.
//!
//! # Invariants
//! - Content is regenerated from the session seed, never saved.
//! - Only `CellWorld::tick` and `CellWorld::reset` mutate the entity stores.

pub mod config;
pub mod entities;
pub mod query;
pub mod world;

pub use config::WorldConfig;
pub use entities::{Glucose, Zone, ZoneKind};
pub use world::{CellWorld, WorldSummary};
