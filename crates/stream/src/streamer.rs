use std::collections::VecDeque;
use std::time::{Duration, Instant};

use cellworld_common::{CellRange, ConfigError, GridCell};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::random::DeterministicCellRandom;
use crate::store::StreamedStore;

/// Streaming configuration: spawn and despawn radii around the tracked cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Radius (in cells) inside which missing entities are generated.
    pub spawn_radius: i32,
    /// Radius (in cells) outside which entities are dropped. Must exceed `spawn_radius`.
    pub despawn_radius: i32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            spawn_radius: 3,
            despawn_radius: 5,
        }
    }
}

impl StreamConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spawn_radius < 0 || self.despawn_radius <= self.spawn_radius {
            return Err(ConfigError::InvalidRadii {
                spawn: self.spawn_radius,
                despawn: self.despawn_radius,
            });
        }
        Ok(())
    }
}

/// The two concentric cell ranges requested by one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamWindow {
    pub center: GridCell,
    pub spawn: CellRange,
    pub despawn: CellRange,
}

impl StreamWindow {
    pub fn around(center: GridCell, config: &StreamConfig) -> Self {
        Self {
            center,
            spawn: CellRange::around(center, config.spawn_radius),
            despawn: CellRange::around(center, config.despawn_radius),
        }
    }
}

/// Per-update streaming statistics for instrumentation.
#[derive(Debug, Clone, Default)]
pub struct StreamStats {
    pub cells_spawned_this_frame: usize,
    pub cells_despawned_this_frame: usize,
    pub total_populated: usize,
    pub frame_time: Duration,
}

/// Drives entity stores toward a window centred on the tracked position.
pub struct WorldStreamer {
    config: StreamConfig,
    random: DeterministicCellRandom,
    last_window: Option<StreamWindow>,
    stats: StreamStats,
}

impl WorldStreamer {
    pub fn new(config: StreamConfig, random: DeterministicCellRandom) -> Result<Self, ConfigError> {
        config.validate()?;
        if random.seed() == 0 {
            tracing::warn!("session seed is 0; every cell will draw the same value");
        }
        Ok(Self {
            config,
            random,
            last_window: None,
            stats: StreamStats::default(),
        })
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn random(&self) -> &DeterministicCellRandom {
        &self.random
    }

    /// Window requested by the most recent update, if any.
    pub fn last_window(&self) -> Option<StreamWindow> {
        self.last_window
    }

    /// Statistics from the last update.
    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    /// Converge every store to the window around `player`.
    ///
    /// Each store spawns first and despawns second, so a boundary cell is never
    /// absent for a tick.
    pub fn update(&mut self, player: Vec2, stores: &mut [&mut dyn StreamedStore]) -> StreamWindow {
        let _span = tracing::info_span!("stream_update").entered();
        let frame_start = Instant::now();

        let window = StreamWindow::around(GridCell::from_world(player), &self.config);

        let mut spawned = 0;
        let mut despawned = 0;
        let mut populated = 0;
        for store in stores.iter_mut() {
            let s = store.spawn_in_range(window.spawn, &self.random);
            let d = store.despawn_outside_range(window.despawn);
            tracing::debug!(
                category = store.category(),
                spawned = s,
                despawned = d,
                "streamed category"
            );
            spawned += s;
            despawned += d;
            populated += store.populated();
        }

        if self.last_window.map(|w| w.center) != Some(window.center) {
            tracing::debug!(center = %window.center, "tracked cell changed");
        }
        self.last_window = Some(window);
        self.stats = StreamStats {
            cells_spawned_this_frame: spawned,
            cells_despawned_this_frame: despawned,
            total_populated: populated,
            frame_time: frame_start.elapsed(),
        };

        tracing::trace!(spawned, despawned, total = populated, "stream update complete");

        window
    }
}

/// Rolling window of the most recent update times.
#[derive(Debug)]
pub struct FrameTimer {
    samples: VecDeque<Duration>,
    window: usize,
}

impl FrameTimer {
    /// Keep at most `window` samples (at least one).
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            samples: VecDeque::with_capacity(window),
            window,
        }
    }

    /// Record one sample, evicting the oldest once the window is full.
    pub fn record(&mut self, dt: Duration) {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(dt);
    }

    pub fn average(&self) -> Duration {
        match self.samples.len() {
            0 => Duration::ZERO,
            n => self.samples.iter().sum::<Duration>() / n as u32,
        }
    }

    pub fn max(&self) -> Duration {
        self.samples.iter().copied().max().unwrap_or_default()
    }

    pub fn min(&self) -> Duration {
        self.samples.iter().copied().min().unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.samples.len()
    }
}
