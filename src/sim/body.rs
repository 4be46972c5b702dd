//! Kinematic bodies: gravity integration and collision resolution
//!
//! Shared by the player and every enemy. Vertical resolution order is fixed:
//! integrate, clamp to the floor line, then land on the first obstacle (in
//! insertion order) the foot crossed from above. Horizontal moves are swept
//! separately by the owner before integrating.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::obstacle::ObstacleSet;
use super::rect::Rect;
use crate::consts::FLOOR_Y;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Direction from `from_x` toward `to_x` (ties face left)
    pub fn toward(from_x: f32, to_x: f32) -> Self {
        if from_x < to_x {
            Facing::Right
        } else {
            Facing::Left
        }
    }
}

/// What held the body up at the end of a vertical step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Support {
    Airborne,
    Floor,
    Obstacle(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KinematicBody {
    /// Horizontal world position (center)
    pub world_x: f32,
    /// Vertical position (center); screen-space, never scrolled
    pub y: f32,
    /// Vertical velocity (positive = down)
    pub dy: f32,
    pub gravity: f32,
    /// Half extents of the visual bounds (sprite or fallback box)
    pub half_extents: Vec2,
    /// Supported this tick; recomputed every vertical step
    pub grounded: bool,
    pub facing: Facing,
}

impl KinematicBody {
    pub fn new(world_x: f32, y: f32, gravity: f32, half_extents: Vec2) -> Self {
        Self {
            world_x,
            y,
            dy: 0.0,
            gravity,
            half_extents,
            grounded: false,
            facing: Facing::Right,
        }
    }

    #[inline]
    pub fn half_height(&self) -> f32 {
        self.half_extents.y
    }

    #[inline]
    pub fn foot(&self) -> f32 {
        self.y + self.half_extents.y
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y - self.half_extents.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.world_x, self.y)
    }

    /// Visual bounds in world space
    pub fn visual_box(&self) -> Rect {
        Rect::from_center(self.center(), self.half_extents)
    }

    /// Visual bounds shrunk by `inset` on every side
    pub fn damage_box(&self, inset: f32) -> Rect {
        self.visual_box().inset(inset)
    }

    /// Jump if supported; returns whether the jump happened
    pub fn jump(&mut self, power: f32) -> bool {
        if !self.grounded {
            return false;
        }
        self.dy = power;
        self.grounded = false;
        true
    }

    /// One vertical step: gravity, floor clamp, one-way landing
    pub fn integrate(&mut self, obstacles: &ObstacleSet, tuning: &Tuning) -> Support {
        let prev_foot = self.foot();
        self.dy += self.gravity;
        self.y += self.dy;
        self.grounded = false;
        let foot = self.foot();

        if foot >= FLOOR_Y {
            self.y = FLOOR_Y - self.half_extents.y;
            self.dy = 0.0;
            self.grounded = true;
            return Support::Floor;
        }

        if self.dy >= 0.0 {
            let left = self.world_x - tuning.body_half_width;
            let right = self.world_x + tuning.body_half_width;
            for obstacle in obstacles.iter() {
                let top = obstacle.rect.y1;
                if obstacle.rect.spans_x(left, right)
                    && prev_foot <= top + tuning.landing_tolerance
                    && foot >= top
                {
                    self.y = top - self.half_extents.y;
                    self.dy = 0.0;
                    self.grounded = true;
                    return Support::Obstacle(obstacle.id);
                }
            }
        }

        Support::Airborne
    }

    /// Move horizontally by `dx`, stopping at world bounds and blocking obstacles
    pub fn step_horizontal(
        &mut self,
        dx: f32,
        map_width: f32,
        obstacles: &ObstacleSet,
        tuning: &Tuning,
    ) -> f32 {
        let next = sweep_horizontal(
            self.world_x,
            dx,
            (self.top(), self.foot()),
            map_width,
            obstacles,
            tuning.body_half_width,
        );
        let moved = next - self.world_x;
        self.world_x = next;
        moved
    }
}

/// Resolve a proposed horizontal move. The result is clamped to
/// `[half_width, map_width - half_width]` and stops one unit short of the
/// nearest Wall/Glass edge crossed in the direction of travel. Only
/// obstacles overlapping the body's vertical span `(top, bottom)` count.
pub fn sweep_horizontal(
    x: f32,
    dx: f32,
    (top, bottom): (f32, f32),
    map_width: f32,
    obstacles: &ObstacleSet,
    half_width: f32,
) -> f32 {
    let mut next = (x + dx).clamp(half_width, (map_width - half_width).max(half_width));
    if dx == 0.0 {
        return next;
    }

    for obstacle in obstacles.iter() {
        if !obstacle.kind.blocks_horizontal() || !obstacle.rect.spans_y(top, bottom) {
            continue;
        }
        let r = obstacle.rect;
        if dx > 0.0 {
            if x + half_width <= r.x1 && next + half_width > r.x1 {
                next = next.min(r.x1 - half_width - 1.0);
            }
        } else if x - half_width >= r.x2 && next - half_width < r.x2 {
            next = next.max(r.x2 + half_width + 1.0);
        }
    }
    next
}

/// Frame counter for sprite animation driven by simulation time
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationClock {
    pub frame: usize,
    last_change: f32,
}

impl AnimationClock {
    /// Advance to the next frame once `interval` has passed
    pub fn tick(&mut self, now: f32, interval: f32, frame_count: usize) -> usize {
        if frame_count <= 1 {
            self.frame = 0;
        } else if now - self.last_change > interval {
            self.frame = (self.frame + 1) % frame_count;
            self.last_change = now;
        }
        self.frame
    }
}
