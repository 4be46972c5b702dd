//! Projectile simulation
//!
//! Bullets advance in fixed sub-steps so fast shots cannot tunnel through thin
//! walls. Player bullets wrap around the visible screen and expire after a
//! set number of laps; enemy bullets die past an off-screen margin. Entity
//! hits are resolved later, once per tick, by the combat pass.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Facing;
use super::obstacle::ObstacleSet;
use super::rect::Rect;
use crate::consts::SCREEN_WIDTH;
use crate::to_screen_x;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BulletMotion {
    /// Horizontal flight; stopped by non-glass obstacles
    Straight { facing: Facing, speed: f32 },
    /// Fixed velocity set at fire time; ignores terrain
    Aimed { velocity: Vec2 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    /// World-space position (`x` is world_x)
    pub pos: Vec2,
    pub owner: BulletOwner,
    pub motion: BulletMotion,
    /// Completed screen wraps (player bullets only)
    pub laps: u32,
}

/// Outcome of moving a bullet for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletFate {
    /// Still flying; eligible for entity hit tests
    Flying,
    /// Player bullet used up its laps
    Spent,
    /// Stopped by an obstacle
    Blocked(u32),
    /// Enemy bullet left the play area
    OutOfBounds,
}

impl BulletFate {
    pub fn is_alive(self) -> bool {
        matches!(self, BulletFate::Flying)
    }
}

impl Bullet {
    pub fn straight(id: u32, pos: Vec2, owner: BulletOwner, facing: Facing, speed: f32) -> Self {
        Self {
            id,
            pos,
            owner,
            motion: BulletMotion::Straight { facing, speed },
            laps: 0,
        }
    }

    pub fn aimed(id: u32, pos: Vec2, velocity: Vec2) -> Self {
        Self {
            id,
            pos,
            owner: BulletOwner::Enemy,
            motion: BulletMotion::Aimed { velocity },
            laps: 0,
        }
    }

    pub fn is_aimed(&self) -> bool {
        matches!(self.motion, BulletMotion::Aimed { .. })
    }

    /// Displacement per tick
    pub fn velocity(&self) -> Vec2 {
        match self.motion {
            BulletMotion::Straight { facing, speed } => Vec2::new(facing.sign() * speed, 0.0),
            BulletMotion::Aimed { velocity } => velocity,
        }
    }

    /// Box used for entity hit tests
    pub fn hit_box(&self, half_size: f32) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(half_size))
    }

    /// Advance one tick in `tuning.bullet_substeps` sub-steps
    pub fn advance(&mut self, obstacles: &ObstacleSet, scroll_x: f32, tuning: &Tuning) -> BulletFate {
        let steps = tuning.bullet_substeps.max(1);
        let step = self.velocity() / steps as f32;
        let wrap_dir = match self.motion {
            BulletMotion::Straight { facing, .. } => facing,
            BulletMotion::Aimed { velocity } => Facing::toward(0.0, velocity.x),
        };

        for _ in 0..steps {
            self.pos += step;
            let screen_x = to_screen_x(self.pos.x, scroll_x);

            match self.owner {
                BulletOwner::Player => match wrap_dir {
                    Facing::Right if screen_x > SCREEN_WIDTH => {
                        self.pos.x = scroll_x;
                        self.laps += 1;
                    }
                    Facing::Left if screen_x < 0.0 => {
                        self.pos.x = scroll_x + SCREEN_WIDTH;
                        self.laps += 1;
                    }
                    _ => {}
                },
                BulletOwner::Enemy => {
                    let margin = tuning.offscreen_margin;
                    if screen_x > SCREEN_WIDTH + margin
                        || screen_x < -margin
                        || self.pos.y > tuning.bullet_max_y
                        || self.pos.y < tuning.bullet_min_y
                    {
                        return BulletFate::OutOfBounds;
                    }
                }
            }

            if !self.is_aimed() {
                let hit = obstacles
                    .iter()
                    .find(|o| o.kind.blocks_projectiles() && o.rect.contains(self.pos));
                if let Some(obstacle) = hit {
                    return BulletFate::Blocked(obstacle.id);
                }
            }
        }

        if self.laps >= tuning.player_bullet_laps {
            BulletFate::Spent
        } else {
            BulletFate::Flying
        }
    }
}

/// Velocities for a volley aimed from `origin` at `target`. The angle is
/// fixed now; shots fan out symmetrically by `spread` radians.
pub fn aimed_volley(origin: Vec2, target: Vec2, speed: f32, count: u32, spread: f32) -> Vec<Vec2> {
    let delta = target - origin;
    let angle = delta.y.atan2(delta.x);
    let center = (count.max(1) - 1) as f32 / 2.0;
    (0..count.max(1))
        .map(|i| {
            let a = angle + (i as f32 - center) * spread;
            Vec2::new(a.cos(), a.sin()) * speed
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::ObstacleKind;
    use proptest::prelude::*;

    #[test]
    fn test_player_bullet_wraps_and_expires_after_two_laps() {
        let tuning = Tuning::default();
        let obstacles = ObstacleSet::new();
        let mut bullet = Bullet::straight(1, Vec2::new(640.0, 300.0), BulletOwner::Player, Facing::Right, 50.0);

        let mut fate = BulletFate::Flying;
        let mut ticks = 0;
        while fate.is_alive() {
            fate = bullet.advance(&obstacles, 0.0, &tuning);
            ticks += 1;
            assert!(ticks < 200, "bullet never expired");
        }
        assert_eq!(fate, BulletFate::Spent);
        assert_eq!(bullet.laps, 2);
        // 640 to the edge, then one full screen
        assert!(ticks >= 38);
    }

    #[test]
    fn test_wrap_uses_screen_not_world() {
        let tuning = Tuning::default();
        let obstacles = ObstacleSet::new();
        let scroll = 2000.0;
        let mut bullet =
            Bullet::straight(1, Vec2::new(scroll + 20.0, 300.0), BulletOwner::Player, Facing::Left, 50.0);
        bullet.advance(&obstacles, scroll, &tuning);
        assert_eq!(bullet.laps, 1);
        assert!(bullet.pos.x > scroll + 1200.0 && bullet.pos.x <= scroll + SCREEN_WIDTH);
    }

    #[test]
    fn test_enemy_bullet_dies_offscreen_without_wrapping() {
        let tuning = Tuning::default();
        let obstacles = ObstacleSet::new();
        let mut bullet = Bullet::straight(1, Vec2::new(1370.0, 300.0), BulletOwner::Enemy, Facing::Right, 20.0);
        assert_eq!(bullet.advance(&obstacles, 0.0, &tuning), BulletFate::OutOfBounds);
        assert_eq!(bullet.laps, 0);
    }

    #[test]
    fn test_thin_wall_blocks_fast_bullet() {
        let tuning = Tuning::default();
        let mut obstacles = ObstacleSet::new();
        let wall = obstacles.insert(ObstacleKind::Wall, Rect::new(120.0, 0.0, 4.0, 600.0));
        let mut bullet = Bullet::straight(1, Vec2::new(100.0, 300.0), BulletOwner::Player, Facing::Right, 50.0);
        assert_eq!(bullet.advance(&obstacles, 0.0, &tuning), BulletFate::Blocked(wall));
    }

    #[test]
    fn test_glass_lets_bullets_through() {
        let tuning = Tuning::default();
        let mut obstacles = ObstacleSet::new();
        obstacles.insert(ObstacleKind::Glass, Rect::new(120.0, 0.0, 10.0, 600.0));
        let mut bullet = Bullet::straight(1, Vec2::new(100.0, 300.0), BulletOwner::Player, Facing::Right, 50.0);
        assert_eq!(bullet.advance(&obstacles, 0.0, &tuning), BulletFate::Flying);
        assert_eq!(bullet.pos.x, 150.0);
    }

    #[test]
    fn test_aimed_bullets_ignore_terrain() {
        let tuning = Tuning::default();
        let mut obstacles = ObstacleSet::new();
        obstacles.insert(ObstacleKind::Wall, Rect::new(105.0, 0.0, 10.0, 600.0));
        let mut bullet = Bullet::aimed(1, Vec2::new(100.0, 300.0), Vec2::new(15.0, 0.0));
        assert_eq!(bullet.advance(&obstacles, 0.0, &tuning), BulletFate::Flying);
    }

    #[test]
    fn test_volley_is_symmetric() {
        let shots = aimed_volley(Vec2::ZERO, Vec2::new(100.0, 0.0), 15.0, 3, 0.2);
        assert_eq!(shots.len(), 3);
        assert!((shots[1] - Vec2::new(15.0, 0.0)).length() < 1e-4);
        assert!((shots[0].y + shots[2].y).abs() < 1e-4);
        assert!((shots[0].y.atan2(shots[0].x) + 0.2).abs() < 1e-4);

        let single = aimed_volley(Vec2::ZERO, Vec2::new(0.0, 10.0), 15.0, 1, 0.2);
        assert!((single[0] - Vec2::new(0.0, 15.0)).length() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_enemy_bullets_never_wrap(
            x in 0.0f32..1280.0,
            y in 0.0f32..700.0,
            left in any::<bool>(),
        ) {
            let tuning = Tuning::default();
            let obstacles = ObstacleSet::new();
            let facing = if left { Facing::Left } else { Facing::Right };
            let mut bullet = Bullet::straight(1, Vec2::new(x, y), BulletOwner::Enemy, facing, 20.0);
            let mut fate = BulletFate::Flying;
            for _ in 0..200 {
                fate = bullet.advance(&obstacles, 0.0, &tuning);
                prop_assert_eq!(bullet.laps, 0);
                if !fate.is_alive() {
                    break;
                }
            }
            prop_assert_eq!(fate, BulletFate::OutOfBounds);
        }

        #[test]
        fn prop_player_bullet_survives_until_second_lap(
            x in 0.0f32..1280.0,
            left in any::<bool>(),
        ) {
            let tuning = Tuning::default();
            let obstacles = ObstacleSet::new();
            let facing = if left { Facing::Left } else { Facing::Right };
            let mut bullet = Bullet::straight(1, Vec2::new(x, 300.0), BulletOwner::Player, facing, 50.0);
            loop {
                let fate = bullet.advance(&obstacles, 0.0, &tuning);
                if fate.is_alive() {
                    prop_assert!(bullet.laps < 2);
                } else {
                    prop_assert_eq!(fate, BulletFate::Spent);
                    prop_assert_eq!(bullet.laps, 2);
                    break;
                }
            }
        }
    }
}
