//! Streaming: deterministic per-cell generation and window-based spawn/despawn.
//!
//! # Invariants
//! - Whether a cell holds an entity, and where, depends only on the cell and the
//!   session seed.
//! - After every `WorldStreamer::update`, populated cells lie inside the despawn
//!   window and every spawn-window cell that passes its check is populated.
//! - No rendering or asset dependency.

mod random;
mod store;
mod streamer;

pub use random::{DeterministicCellRandom, SessionSeed};
pub use store::{CellEntity, EntityStreamStore, StreamedStore, category_key};
pub use streamer::{FrameTimer, StreamConfig, StreamStats, StreamWindow, WorldStreamer};

pub fn crate_info() -> &'static str {
    "cellworld-stream v0.1.0"
}
