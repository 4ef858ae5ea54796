/// Tile grid the navigation core plans over.
///
/// The grid is read-only while routes are planned and followed; nothing in
/// this module mutates occupancy as a side effect of movement.

use bevy::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Convert a continuous world position to the tile it stands on.
/// Tile y maps to world z; the vertical axis carries no occupancy.
pub fn tile_of(point: Vec3) -> IVec2 {
    IVec2::new(point.x.floor() as i32, point.z.floor() as i32)
}

/// Center of a tile in world space, on the ground plane.
pub fn tile_center(tile: IVec2) -> Vec3 {
    Vec3::new(tile.x as f32 + 0.5, 0.0, tile.y as f32 + 0.5)
}

/// How an occupant interacts with route planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OccupantKind {
    /// Hard blocker, never traversed.
    Solid,
    /// Can be cleared with a jump when the tile beyond it is free.
    Hoppable,
}

/// Something standing on a tile (a tree, a rock, ...).
#[derive(Debug, Clone)]
pub struct Occupant {
    pub name: String,
    pub kind: OccupantKind,
}

impl Occupant {
    pub fn solid(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: OccupantKind::Solid }
    }

    pub fn hoppable(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: OccupantKind::Hoppable }
    }
}

/// Occupancy map for the world, keyed by integer tile coordinate.
#[derive(Resource, Debug, Clone, Default)]
pub struct TileGrid {
    pub width: i32,
    pub height: i32,
    occupants: FxHashMap<IVec2, Occupant>,
}

impl TileGrid {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height, occupants: FxHashMap::default() }
    }

    pub fn in_bounds(&self, tile: IVec2) -> bool {
        tile.x >= 0 && tile.x < self.width && tile.y >= 0 && tile.y < self.height
    }

    /// Dense index for bitset bookkeeping. Callers must pass an in-bounds tile.
    pub fn index(&self, tile: IVec2) -> usize {
        debug_assert!(self.in_bounds(tile));
        (tile.y * self.width + tile.x) as usize
    }

    pub fn get(&self, tile: IVec2) -> Option<&Occupant> {
        self.occupants.get(&tile)
    }

    /// Occupancy is a pure map lookup: tiles outside the grid hold nothing
    /// and therefore read as unoccupied.
    pub fn is_occupied(&self, tile: IVec2) -> bool {
        self.occupants.contains_key(&tile)
    }

    pub fn is_hoppable(&self, tile: IVec2) -> bool {
        matches!(self.get(tile), Some(occ) if occ.kind == OccupantKind::Hoppable)
    }

    pub fn place(&mut self, tile: IVec2, occupant: Occupant) {
        self.occupants.insert(tile, occupant);
    }

    pub fn remove(&mut self, tile: IVec2) -> Option<Occupant> {
        self.occupants.remove(&tile)
    }
}
