//! Build-site search
//!
//! Scans outward from an origin in expanding rings for a cell where a
//! building can legally go. Candidates inside each ring are shuffled so
//! repeated placements do not crawl along one axis.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::types::{ActorTypeId, CellPos, PlayerId};
use crate::world::WorldView;

/// Every cell at exact Chebyshev distance `radius` from `origin`
fn ring_cells(origin: CellPos, radius: i32) -> Vec<CellPos> {
    if radius == 0 {
        return vec![origin];
    }
    let mut cells = Vec::with_capacity((radius as usize) * 8);
    for dx in -radius..=radius {
        cells.push(CellPos::new(origin.x + dx, origin.y - radius));
        cells.push(CellPos::new(origin.x + dx, origin.y + radius));
    }
    for dy in (-radius + 1)..radius {
        cells.push(CellPos::new(origin.x - radius, origin.y + dy));
        cells.push(CellPos::new(origin.x + radius, origin.y + dy));
    }
    cells
}

/// Find a legal site for `building` near `origin`
///
/// Rings are tried closest-first; inside a ring the order is randomized.
/// A candidate must pass, in order: the simulation's placement-legality
/// check, the base-proximity rule, and a footprint sweep confirming no
/// existing building underneath. `None` means placement is deferred this
/// cycle, not that anything went wrong.
pub fn find_build_site<R: Rng>(
    world: &dyn WorldView,
    rng: &mut R,
    owner: PlayerId,
    building: &ActorTypeId,
    origin: CellPos,
    max_radius: i32,
) -> Option<CellPos> {
    let bounds = world.map_bounds();
    for radius in 0..=max_radius {
        let mut candidates = ring_cells(origin, radius);
        candidates.retain(|c| bounds.contains(*c));
        candidates.shuffle(rng);

        for cell in candidates {
            if !world.can_place_building(building, cell) {
                continue;
            }
            if !world.is_close_to_base(owner, building, cell) {
                continue;
            }
            let footprint_clear = world
                .building_footprint(building, cell)
                .iter()
                .all(|c| world.building_at(*c).is_none());
            if footprint_clear {
                return Some(cell);
            }
        }
    }

    tracing::debug!(building = building.as_str(), ?origin, "no build site found");
    None
}
