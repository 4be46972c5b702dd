//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (time is a tick counter)
//! - Seeded RNG only
//! - Stable iteration order (insertion order for obstacles and rosters)
//! - No rendering or platform dependencies beyond the host traits

pub mod body;
pub mod combat;
pub mod enemy;
pub mod events;
pub mod level;
pub mod obstacle;
pub mod player;
pub mod projectile;
pub mod rect;
pub mod stages;

pub use body::{AnimationClock, Facing, KinematicBody, Support, sweep_horizontal};
pub use enemy::{Enemy, EnemyAction, EnemyKind, EnemySpawn};
pub use events::GameEvent;
pub use level::{BossBar, Hud, LevelPhase, LevelScene, TeleportSpots};
pub use obstacle::{Obstacle, ObstacleKind, ObstacleSet};
pub use player::Player;
pub use projectile::{Bullet, BulletFate, BulletOwner};
pub use rect::Rect;
pub use stages::{StageId, StageLayout};
