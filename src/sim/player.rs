//! The player character

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{AnimationClock, Facing, KinematicBody};
use crate::consts::FLOOR_Y;
use crate::tuning::Tuning;

/// Spawn point of every level
pub const PLAYER_START_X: f32 = 200.0;

/// Collision box when the sprite is missing
pub const PLAYER_FALLBACK_HALF_EXTENTS: Vec2 = Vec2::new(20.0, 40.0);

/// Walk animation frame interval in seconds
pub const PLAYER_ANIM_INTERVAL: f32 = 0.05;

/// Shot height as a fraction of body height, measured from the top
const SHOOT_HEIGHT_RATIO: f32 = 0.69;

/// Sprite paths (walk strips have 8 frames, idle is a single frame)
pub const WALK_RIGHT: &str = "image/char/player/walk_R.gif";
pub const WALK_LEFT: &str = "image/char/player/walk_L.gif";
pub const IDLE_RIGHT: &str = "image/char/player/idle_0.png";
pub const IDLE_LEFT: &str = "image/char/player/idle_0_L.png";
pub const WALK_FRAMES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerState {
    #[default]
    Idle,
    Walk,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub body: KinematicBody,
    pub speed: f32,
    pub jump_power: f32,
    pub state: PlayerState,
    /// Time of the last accepted shot
    pub last_shot: Option<f32>,
    pub anim: AnimationClock,
}

impl Player {
    /// Spawn on the floor at the level start
    pub fn new(half_extents: Vec2, tuning: &Tuning) -> Self {
        Self {
            body: KinematicBody::new(
                PLAYER_START_X,
                FLOOR_Y - half_extents.y,
                tuning.player_gravity,
                half_extents,
            ),
            speed: tuning.player_speed,
            jump_power: tuning.player_jump_power,
            state: PlayerState::Idle,
            last_shot: None,
            anim: AnimationClock::default(),
        }
    }

    /// Apply held direction keys; returns the horizontal move for this tick.
    /// Right wins when both are held.
    pub fn steer(&mut self, left: bool, right: bool) -> f32 {
        let dir = if right {
            self.body.facing = Facing::Right;
            1.0
        } else if left {
            self.body.facing = Facing::Left;
            -1.0
        } else {
            0.0
        };
        self.state = if dir == 0.0 { PlayerState::Idle } else { PlayerState::Walk };
        dir * self.speed
    }

    pub fn jump(&mut self) -> bool {
        self.body.jump(self.jump_power)
    }

    /// Muzzle position: 69% down the body from its top
    pub fn shoot_origin(&self) -> Vec2 {
        let full_height = self.body.half_height() * 2.0;
        Vec2::new(self.body.world_x, self.body.top() + full_height * SHOOT_HEIGHT_RATIO)
    }

    /// Accept a shot if the fire cooldown has elapsed
    pub fn try_fire(&mut self, now: f32, tuning: &Tuning) -> bool {
        if matches!(self.last_shot, Some(last) if now - last < tuning.player_fire_cooldown) {
            return false;
        }
        self.last_shot = Some(now);
        true
    }

    /// Sprite strip for the current state and facing
    pub fn sprite(&self) -> (&'static str, usize) {
        match (self.state, self.body.facing) {
            (PlayerState::Walk, Facing::Right) => (WALK_RIGHT, WALK_FRAMES),
            (PlayerState::Walk, Facing::Left) => (WALK_LEFT, WALK_FRAMES),
            (PlayerState::Idle, Facing::Right) => (IDLE_RIGHT, 1),
            (PlayerState::Idle, Facing::Left) => (IDLE_LEFT, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawns_on_floor() {
        let player = Player::new(PLAYER_FALLBACK_HALF_EXTENTS, &Tuning::default());
        assert_eq!(player.body.foot(), FLOOR_Y);
        assert_eq!(player.body.world_x, PLAYER_START_X);
    }

    #[test]
    fn test_steer_right_overrides_left() {
        let mut player = Player::new(PLAYER_FALLBACK_HALF_EXTENTS, &Tuning::default());
        assert_eq!(player.steer(true, true), 15.0);
        assert_eq!(player.body.facing, Facing::Right);
        assert_eq!(player.steer(true, false), -15.0);
        assert_eq!(player.body.facing, Facing::Left);
        assert_eq!(player.state, PlayerState::Walk);
        assert_eq!(player.steer(false, false), 0.0);
        assert_eq!(player.state, PlayerState::Idle);
        // Facing is kept while idle
        assert_eq!(player.sprite().0, IDLE_LEFT);
    }

    #[test]
    fn test_fire_cooldown() {
        let tuning = Tuning::default();
        let mut player = Player::new(PLAYER_FALLBACK_HALF_EXTENTS, &tuning);
        assert!(player.try_fire(0.0, &tuning));
        assert!(!player.try_fire(0.1, &tuning));
        assert!(player.try_fire(0.25, &tuning));
    }

    #[test]
    fn test_shoot_origin() {
        let player = Player::new(PLAYER_FALLBACK_HALF_EXTENTS, &Tuning::default());
        let origin = player.shoot_origin();
        // Top at 635, height 80
        assert!((origin.y - (635.0 + 80.0 * 0.69)).abs() < 1e-3);
        assert_eq!(origin.x, PLAYER_START_X);
    }
}
