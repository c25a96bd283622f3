use cellworld_common::GridCell;
use cellworld_stream::{CellEntity, DeterministicCellRandom};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Smallest zone radius in world units.
pub const ZONE_MIN_RADIUS: f32 = 200.0;
/// Largest zone radius in world units. Kept below half a cell.
pub const ZONE_MAX_RADIUS: f32 = 400.0;
/// Share of zones that are acid rather than glucose-rich.
pub const HAZARD_SHARE: f32 = 0.5;
/// Pickup radius of a glucose collectible.
pub const GLUCOSE_RADIUS: f32 = 40.0;
/// Largest amount a single glucose collectible carries.
pub const GLUCOSE_MAX_AMOUNT: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneKind {
    /// Damages the player while inside.
    Acid,
    /// Raises glucose yield while inside.
    Glucose,
}

/// A circular hazard or resource zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub cell: GridCell,
    pub position: Vec2,
    pub kind: ZoneKind,
    pub radius: f32,
}

impl Zone {
    pub fn is_hazard(&self) -> bool {
        self.kind == ZoneKind::Acid
    }
}

impl CellEntity for Zone {
    const CATEGORY: &'static str = "zone";
    const DEFAULT_SPAWN_CHANCE: f32 = 0.33;

    fn generate(cell: GridCell, position: Vec2, key: i64, random: &DeterministicCellRandom) -> Self {
        let kind = if random.float_from(key.wrapping_mul(5)) < HAZARD_SHARE {
            ZoneKind::Acid
        } else {
            ZoneKind::Glucose
        };
        let t = random.float_from(key.wrapping_mul(7));
        Self {
            cell,
            position,
            kind,
            radius: ZONE_MIN_RADIUS + t * (ZONE_MAX_RADIUS - ZONE_MIN_RADIUS),
        }
    }

    fn position(&self) -> Vec2 {
        self.position
    }
}

/// A glucose collectible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glucose {
    pub cell: GridCell,
    pub position: Vec2,
    pub amount: u32,
}

impl CellEntity for Glucose {
    const CATEGORY: &'static str = "glucose";
    const DEFAULT_SPAWN_CHANCE: f32 = 0.5;
    const KEY_SALT: i64 = 0x6c75_636f_7365;

    fn generate(cell: GridCell, position: Vec2, key: i64, random: &DeterministicCellRandom) -> Self {
        let t = random.float_from(key.wrapping_mul(5));
        let amount = 1 + (t * GLUCOSE_MAX_AMOUNT as f32) as u32;
        Self {
            cell,
            position,
            amount: amount.min(GLUCOSE_MAX_AMOUNT),
        }
    }

    fn position(&self) -> Vec2 {
        self.position
    }
}
