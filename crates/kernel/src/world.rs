use cellworld_common::ConfigError;
use cellworld_stream::{
    DeterministicCellRandom, EntityStreamStore, StreamStats, StreamWindow, WorldStreamer,
};
use glam::Vec2;

use crate::config::WorldConfig;
use crate::entities::{Glucose, Zone};

/// The streamed world of one game session.
///
/// Owns the world streamer and both entity stores. Collaborators read the
/// stores through `zones()` / `glucose()` between ticks and never mutate them.
pub struct CellWorld {
    streamer: WorldStreamer,
    zones: EntityStreamStore<Zone>,
    glucose: EntityStreamStore<Glucose>,
    tick: u64,
}

impl CellWorld {
    /// Create a session with an explicit seed. `config.seed` is ignored here.
    pub fn new(config: &WorldConfig, seed: i64) -> Result<Self, ConfigError> {
        config.validate()?;
        let streamer = WorldStreamer::new(config.stream, DeterministicCellRandom::new(seed))?;
        tracing::info!(
            seed,
            spawn_radius = config.stream.spawn_radius,
            despawn_radius = config.stream.despawn_radius,
            "world session created"
        );
        Ok(Self {
            streamer,
            zones: EntityStreamStore::with_spawn_chance(config.zone_spawn_chance),
            glucose: EntityStreamStore::with_spawn_chance(config.glucose_spawn_chance),
            tick: 0,
        })
    }

    /// Stream content around the player's current world position. Call once per game tick.
    pub fn tick(&mut self, player: Vec2) -> StreamWindow {
        self.tick += 1;
        self.streamer
            .update(player, &mut [&mut self.zones, &mut self.glucose])
    }

    /// Acid and glucose zones currently in memory.
    pub fn zones(&self) -> &EntityStreamStore<Zone> {
        &self.zones
    }

    /// Glucose collectibles currently in memory.
    pub fn glucose(&self) -> &EntityStreamStore<Glucose> {
        &self.glucose
    }

    pub fn seed(&self) -> i64 {
        self.streamer.random().seed()
    }

    /// Number of ticks since creation or the last reset.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn stats(&self) -> &StreamStats {
        self.streamer.stats()
    }

    pub fn last_window(&self) -> Option<StreamWindow> {
        self.streamer.last_window()
    }

    /// New game with the same seed. Content regenerates on the next tick.
    pub fn reset(&mut self) {
        tracing::debug!(
            zones = self.zones.len(),
            glucose = self.glucose.len(),
            "resetting world session"
        );
        self.zones.clear();
        self.glucose.clear();
        self.tick = 0;
    }

    pub fn summary(&self) -> WorldSummary {
        WorldSummary {
            tick: self.tick,
            seed: self.seed(),
            zones: self.zones.len(),
            acid_zones: self.zones.iter().filter(|(_, z)| z.is_hazard()).count(),
            glucose: self.glucose.len(),
        }
    }
}

/// Summary of the streamed world for logs and tooling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldSummary {
    pub tick: u64,
    pub seed: i64,
    pub zones: usize,
    pub acid_zones: usize,
    pub glucose: usize,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: tick={} seed={} zones={} (acid={}) glucose={}",
            self.tick, self.seed, self.zones, self.acid_zones, self.glucose
        )
    }
}
