//! Per-tick events emitted by a level
//!
//! The level pushes events while it simulates; the scene manager drains
//! them after each tick to drive audio and logging.

use crate::audio::{Music, SoundEffect};

use super::enemy::EnemyKind;
use super::obstacle::ObstacleKind;
use super::rect::Rect;

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(SoundEffect),
    Music(Music),
    ObstacleSpawned { id: u32, kind: ObstacleKind, rect: Rect },
    ObstacleRemoved { id: u32 },
    EnemyRemoved { id: u32 },
    BulletRemoved { id: u32 },
    /// A shielded data enemy ate a bullet
    ShieldAbsorbed { enemy_id: u32 },
    EnemyKilled { id: u32, kind: EnemyKind },
    PlayerHit,
    StageCleared,
    SirenStarted,
    /// System boss moved to teleport spot `spot`
    Teleported { spot: usize },
}
