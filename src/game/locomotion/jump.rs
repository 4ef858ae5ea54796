/// Jump arc sub-behavior: parabolic vertical offset plus linear horizontal
/// interpolation between the take-off point and the landing tile.

use bevy::prelude::*;

use crate::game::pathfinding::RouteStep;

/// An in-flight jump. Created when the cursor reaches a jump-flagged step,
/// destroyed on landing or when the route is replaced mid-air.
#[derive(Debug, Clone, Copy)]
pub struct JumpArc {
    /// Elapsed fraction of the jump, 0..1.
    pub progress: f32,
    pub start: Vec3,
    pub end: Vec3,
}

/// Index of the step the jump lands on: the first non-jump step at or past
/// `cursor`. A route that ends in jump steps lands on its final step, so one
/// arc can clear several obstacle tiles in a row.
pub(super) fn landing_index(route: &[RouteStep], cursor: usize) -> usize {
    let mut idx = cursor;
    while idx < route.len() && route[idx].jump {
        idx += 1;
    }
    if idx < route.len() {
        idx
    } else {
        route.len() - 1
    }
}

/// Parabola peaking at `height` when t = 0.5, exactly zero at t = 0 and t = 1.
pub(super) fn vertical_offset(t: f32, height: f32) -> f32 {
    height * 4.0 * t * (1.0 - t)
}
