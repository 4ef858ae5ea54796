use bevy::prelude::*;

use crate::game::grid::{tile_center, tile_of, TileGrid};
use crate::game::pathfinding::{Route, RouteStep};
use super::jump::{self, JumpArc};

// ============================================================================
// Tuning
// ============================================================================

/// Jump arc tuning shared by every agent. Kept in sync with the
/// hot-reloadable runtime config while the app runs.
#[derive(Resource, Debug, Clone)]
pub struct MotionTuning {
    pub jump_height: f32,
    pub jump_duration: f32,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self { jump_height: 1.0, jump_duration: 0.5 }
    }
}

// ============================================================================
// Locomotion state machine
// ============================================================================

/// Emitted by [`Locomotion::advance`] / [`Locomotion::set_route`] when the
/// route's final step has been consumed. Fired once per route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocomotionEvent {
    ReachedEnd,
}

/// Per-agent locomotion state: the route being walked, a cursor into it, and
/// the continuous pose (position, facing, jump arc) produced from it.
///
/// All transitions happen inside [`advance`](Self::advance), called once per
/// rendered frame. Nothing here is shared between agents.
#[derive(Component, Debug, Clone)]
pub struct Locomotion {
    route: Route,
    cursor: usize,
    /// World position; y carries the vertical jump offset and is 0 on the ground.
    position: Vec3,
    target: Vec3,
    is_moving: bool,
    facing: f32,
    target_facing: f32,
    is_rotating: bool,
    jump: Option<JumpArc>,
    pub move_speed: f32,
    pub rotation_speed: f32,
}

impl Locomotion {
    pub fn new(position: Vec3, move_speed: f32, rotation_speed: f32) -> Self {
        Self {
            route: Route::new(),
            cursor: 0,
            position,
            target: position,
            is_moving: false,
            facing: 0.0,
            target_facing: 0.0,
            is_rotating: false,
            jump: None,
            move_speed,
            rotation_speed,
        }
    }

    /// Spawn standing on the center of a tile.
    pub fn at_tile(tile: IVec2, move_speed: f32, rotation_speed: f32) -> Self {
        Self::new(tile_center(tile), move_speed, rotation_speed)
    }

    // ------------------------------------------------------------------
    // Read-only pose accessors (consumed by rendering / external layers)
    // ------------------------------------------------------------------

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn vertical_offset(&self) -> f32 {
        self.position.y
    }

    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    pub fn is_jumping(&self) -> bool {
        self.jump.is_some()
    }

    pub fn is_rotating(&self) -> bool {
        self.is_rotating
    }

    pub fn route(&self) -> &[RouteStep] {
        &self.route
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    // ------------------------------------------------------------------
    // Route control
    // ------------------------------------------------------------------

    /// Replace the current route wholesale and start on it immediately.
    ///
    /// Any in-flight jump is abandoned where it stood and the agent is
    /// re-grounded; the horizontal position is left untouched, so the new
    /// route begins from exactly here. An empty route completes on the spot.
    pub fn set_route(&mut self, route: Route) -> Option<LocomotionEvent> {
        self.jump = None;
        self.position.y = 0.0;
        self.route = route;
        self.cursor = 0;
        self.retarget()
    }

    /// Point the cursor's step at the movement target, start a jump when the
    /// step calls for one, or finish the route when the cursor is past it.
    fn retarget(&mut self) -> Option<LocomotionEvent> {
        if self.cursor >= self.route.len() {
            self.is_moving = false;
            // Settle facing along the final segment of the walk.
            if self.route.len() >= 2 {
                let last = self.route[self.route.len() - 1].pos;
                let prev = self.route[self.route.len() - 2].pos;
                let dir = last - prev;
                self.face_towards(self.position + Vec3::new(dir.x as f32, 0.0, dir.y as f32));
            }
            return Some(LocomotionEvent::ReachedEnd);
        }

        let step = self.route[self.cursor];
        if step.jump {
            self.begin_jump();
        } else {
            self.target = tile_center(step.pos);
            self.is_moving = true;
        }
        None
    }

    fn begin_jump(&mut self) {
        let landing = jump::landing_index(&self.route, self.cursor);
        let end = tile_center(self.route[landing].pos);
        self.jump = Some(JumpArc { progress: 0.0, start: self.position, end });
        self.target = end;
        self.is_moving = true;
    }

    // ------------------------------------------------------------------
    // Frame advance
    // ------------------------------------------------------------------

    /// Advance one frame. A non-positive or non-finite delta is treated as a
    /// skipped frame rather than corrupting interpolation state.
    pub fn advance(&mut self, dt: f32, tuning: &MotionTuning) -> Option<LocomotionEvent> {
        if !dt.is_finite() || dt <= 0.0 {
            return None;
        }

        let event = if self.jump.is_some() {
            self.advance_jump(dt, tuning)
        } else if self.is_moving {
            self.advance_move(dt)
        } else {
            None
        };

        // Rotation runs alongside movement, not as a separate phase.
        if self.is_rotating {
            self.settle_facing(dt);
        }

        event
    }

    fn advance_move(&mut self, dt: f32) -> Option<LocomotionEvent> {
        let step = self.move_speed * dt;
        let distance = self.position.distance(self.target);

        if distance > step {
            self.position = self.position.lerp(self.target, step / distance);
            self.steer_facing(dt);
            None
        } else {
            self.position = self.target;
            self.cursor += 1;
            self.retarget()
        }
    }

    fn advance_jump(&mut self, dt: f32, tuning: &MotionTuning) -> Option<LocomotionEvent> {
        let Some(arc) = self.jump.as_mut() else {
            return None;
        };

        arc.progress += dt / tuning.jump_duration;
        if arc.progress >= 1.0 {
            // Land exactly on the target tile center, grounded.
            self.position = arc.end;
            self.jump = None;
            while self.cursor < self.route.len() && self.route[self.cursor].jump {
                self.cursor += 1;
            }
            return self.retarget();
        }

        let t = arc.progress;
        let mut p = arc.start.lerp(arc.end, t);
        p.y = jump::vertical_offset(t, tuning.jump_height);
        self.position = p;
        None
    }

    // ------------------------------------------------------------------
    // Facing
    // ------------------------------------------------------------------

    /// Turn toward the current movement direction, bounded by the angular
    /// speed and always along the shorter signed arc.
    fn steer_facing(&mut self, dt: f32) {
        let dir = self.target - self.position;
        if Vec2::new(dir.x, dir.z).length_squared() <= 1e-6 {
            return;
        }
        let desired = dir.x.atan2(dir.z);
        let diff = wrap_angle(desired - self.facing);
        let max_step = self.rotation_speed * dt;
        self.facing = wrap_angle(self.facing + diff.signum() * diff.abs().min(max_step));
    }

    /// Smoothly rotate toward `target_facing`, snapping once within a single
    /// frame's step.
    fn settle_facing(&mut self, dt: f32) {
        let diff = wrap_angle(self.target_facing - self.facing);
        let max_step = self.rotation_speed * dt;
        if diff.abs() < max_step {
            self.facing = self.target_facing;
            self.is_rotating = false;
        } else {
            self.facing = wrap_angle(self.facing + diff.signum() * max_step);
        }
    }

    /// Start smoothly turning toward a world-space point. Ignored when the
    /// horizontal direction is degenerate.
    pub fn face_towards(&mut self, point: Vec3) {
        let dir = point - self.position;
        let flat = Vec2::new(dir.x, dir.z);
        if flat.length_squared() > 1e-3 {
            self.target_facing = flat.x.atan2(flat.y);
            self.is_rotating = true;
        }
    }

    // ------------------------------------------------------------------
    // Direct movement
    // ------------------------------------------------------------------

    /// Take one instantaneous step, bypassing planning. Allowed only when the
    /// destination tile is unoccupied; position and facing snap, nothing
    /// interpolates. Returns whether the step happened.
    pub fn step_direction(&mut self, direction: Vec3, grid: &TileGrid) -> bool {
        let next = self.position + direction;
        if grid.is_occupied(tile_of(next)) {
            return false;
        }
        self.position = next;
        self.target = next;
        let flat = Vec2::new(direction.x, direction.z);
        if flat.length_squared() > 1e-6 {
            self.facing = wrap_angle(flat.x.atan2(flat.y));
            self.target_facing = self.facing;
        }
        true
    }
}

/// Normalize an angle into [-PI, PI).
pub(crate) fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    (angle + PI).rem_euclid(TAU) - PI
}
