use bevy::prelude::*;
use smallvec::SmallVec;

use crate::game::grid::TileGrid;

/// Widest ring searched around a blocked destination tile.
pub const MAX_RING_RADIUS: i32 = 5;

/// Resolve a requested destination tile to a walkable one.
///
/// Scans square rings of growing radius around `requested` (radius 0 is the
/// tile itself). The first ring holding any unoccupied tile wins, and within
/// that ring the candidate closest to `agent` is picked; on equal distance
/// the first one in scan order sticks. Returns `None` when every tile out to
/// `MAX_RING_RADIUS` is occupied, in which case no route should be requested.
pub fn nearest_walkable_tile(requested: IVec2, agent: IVec2, grid: &TileGrid) -> Option<IVec2> {
    for radius in 0..=MAX_RING_RADIUS {
        // A radius-5 ring has 40 tiles, so candidates never spill to the heap.
        let mut candidates: SmallVec<[IVec2; 40]> = SmallVec::new();
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                if dx.abs() == radius || dy.abs() == radius {
                    let tile = requested + IVec2::new(dx, dy);
                    if !grid.is_occupied(tile) {
                        candidates.push(tile);
                    }
                }
            }
        }

        let mut best: Option<(IVec2, i32)> = None;
        for tile in candidates {
            let d = (tile - agent).length_squared();
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((tile, d));
            }
        }
        if let Some((tile, _)) = best {
            return Some(tile);
        }
    }

    None
}
