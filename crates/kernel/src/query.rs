//! Read-only queries for collaborators (collision, pickups, minimap).
//!
//! Nothing here mutates a store.

use cellworld_common::{CELL_LENGTH, GridCell};
use cellworld_stream::EntityStreamStore;
use glam::Vec2;

use crate::entities::{GLUCOSE_RADIUS, Glucose, ZONE_MAX_RADIUS, Zone, ZoneKind};

fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}

/// Zones of `kind` overlapping the circle at `point`.
///
/// Looks only at the 3x3 neighbourhood when the reach fits inside one cell,
/// otherwise scans the whole store.
fn zones_touching(
    zones: &EntityStreamStore<Zone>,
    kind: ZoneKind,
    point: Vec2,
    radius: f32,
) -> Option<&Zone> {
    let hit = |z: &&Zone| z.kind == kind && circles_overlap(point, radius, z.position, z.radius);
    if radius + ZONE_MAX_RADIUS <= CELL_LENGTH {
        GridCell::from_world(point)
            .adjacent_cells()
            .iter()
            .filter_map(|c| zones.get(*c))
            .find(hit)
    } else {
        zones.iter().map(|(_, z)| z).find(hit)
    }
}

/// An acid zone touching a circle of `radius` around `point`, if any.
pub fn hazard_touching(zones: &EntityStreamStore<Zone>, point: Vec2, radius: f32) -> Option<&Zone> {
    zones_touching(zones, ZoneKind::Acid, point, radius)
}

/// A glucose-rich zone touching a circle of `radius` around `point`, if any.
pub fn glucose_zone_touching(
    zones: &EntityStreamStore<Zone>,
    point: Vec2,
    radius: f32,
) -> Option<&Zone> {
    zones_touching(zones, ZoneKind::Glucose, point, radius)
}

/// Cells whose glucose collectible overlaps the circle at `point`, in cell order.
pub fn glucose_overlapping(
    glucose: &EntityStreamStore<Glucose>,
    point: Vec2,
    radius: f32,
) -> Vec<GridCell> {
    let hit = |g: &Glucose| circles_overlap(point, radius, g.position, GLUCOSE_RADIUS);
    if radius + GLUCOSE_RADIUS <= CELL_LENGTH {
        let mut cells: Vec<GridCell> = GridCell::from_world(point)
            .adjacent_cells()
            .into_iter()
            .filter(|c| glucose.get(*c).is_some_and(|g| hit(g)))
            .collect();
        cells.sort();
        cells
    } else {
        glucose
            .iter()
            .filter(|&(_, g)| hit(g))
            .map(|(c, _)| *c)
            .collect()
    }
}

/// Square overview map centred on the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimap {
    /// Side length of the minimap on screen, in pixels.
    pub size: f32,
    /// Side length of the world square the minimap shows, in world units.
    pub world_span: f32,
}

impl Minimap {
    pub fn new(size: f32, world_span: f32) -> Self {
        Self { size, world_span }
    }

    /// Minimap pixel for `entity`, or `None` when it lies outside the shown square.
    pub fn project(&self, player: Vec2, entity: Vec2) -> Option<Vec2> {
        let offset = entity - player;
        let half = self.world_span / 2.0;
        if offset.x.abs() > half || offset.y.abs() > half {
            return None;
        }
        Some((offset / self.world_span + Vec2::splat(0.5)) * self.size)
    }

    /// Project every entity of a store, dropping the ones off the map.
    pub fn project_all<T: cellworld_stream::CellEntity>(
        &self,
        player: Vec2,
        store: &EntityStreamStore<T>,
    ) -> Vec<Vec2> {
        store
            .iter()
            .filter_map(|(_, e)| self.project(player, e.position()))
            .collect()
    }
}
