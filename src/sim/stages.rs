//! Level layouts
//!
//! Geometry and rosters for the five playable levels. Obstacle order is
//! significant: landing checks take the first match.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::{EnemyKind, EnemySpawn};
use super::obstacle::ObstacleKind::{self, Glass, Platform, Wall};
use super::rect::Rect;
use crate::consts::{DEFAULT_MAP_WIDTH, SCREEN_WIDTH};

/// Single-frame sprite used by data enemies
pub const DATA_SPRITE: &str = "image/data.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageId {
    Stage1,
    Stage2,
    MidBoss,
    Stage3,
    SystemBoss,
}

/// Walk animation strips for the stage's mobs and bosses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemySprites {
    pub right: &'static str,
    pub left: &'static str,
    pub frames: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StageLayout {
    pub stage: StageId,
    pub map_width: f32,
    pub obstacles: Vec<(ObstacleKind, Rect)>,
    pub enemies: Vec<EnemySpawn>,
    /// System boss warp targets; the first is the spawn point
    pub teleport_spots: Vec<Vec2>,
    pub siren: bool,
    pub sprites: EnemySprites,
    pub background: &'static str,
}

fn ob(kind: ObstacleKind, x: f32, y: f32, w: f32, h: f32) -> (ObstacleKind, Rect) {
    (kind, Rect::new(x, y, w, h))
}

const WALKER: EnemySprites = EnemySprites {
    right: "image/char/enemy/e_walk_R.gif",
    left: "image/char/enemy/e_walk_L.gif",
    frames: 8,
};

impl StageId {
    /// Banner shown once the roster is empty
    pub fn clear_banner(self) -> &'static str {
        match self {
            StageId::SystemBoss => "SYSTEM SILENCED...",
            _ => "STAGE CLEAR",
        }
    }

    pub fn layout(self) -> StageLayout {
        match self {
            StageId::Stage1 => stage1(),
            StageId::Stage2 => stage2(),
            StageId::MidBoss => mid_boss(),
            StageId::Stage3 => stage3(),
            StageId::SystemBoss => system_boss(),
        }
    }
}

fn stage1() -> StageLayout {
    let obstacles = vec![
        ob(Glass, 950.0, 200.0, 50.0, 300.0),
        ob(Glass, 1250.0, 200.0, 50.0, 300.0),
        ob(Platform, 800.0, 500.0, 500.0, 20.0),
        ob(Wall, 1600.0, 0.0, 50.0, 300.0),
        ob(Wall, 1800.0, 500.0, 50.0, 215.0),
        ob(Platform, 2200.0, 500.0, 500.0, 20.0),
        ob(Platform, 2200.0, 300.0, 500.0, 20.0),
        ob(Wall, 2200.0, 0.0, 50.0, 500.0),
        ob(Glass, 2450.0, 0.0, 50.0, 500.0),
        ob(Platform, 2700.0, 200.0, 400.0, 20.0),
        ob(Wall, 3000.0, 500.0, 50.0, 215.0),
        ob(Wall, 3250.0, 500.0, 50.0, 215.0),
        ob(Platform, 3000.0, 500.0, 300.0, 20.0),
        ob(Wall, 3200.0, 0.0, 50.0, 200.0),
        ob(Platform, 3200.0, 200.0, 300.0, 20.0),
        ob(Glass, 3450.0, 0.0, 50.0, 200.0),
        ob(Platform, 3600.0, 680.0, 200.0, 20.0),
        ob(Platform, 3800.0, 600.0, 200.0, 20.0),
        ob(Platform, 4000.0, 520.0, 200.0, 20.0),
        ob(Platform, 4200.0, 440.0, 200.0, 20.0),
        ob(Platform, 4400.0, 360.0, 900.0, 20.0),
        ob(Wall, 4800.0, 0.0, 50.0, 360.0),
    ];

    let mut enemies: Vec<EnemySpawn> = [
        (900.0, 650.0),
        (1200.0, 380.0),
        (2300.0, 380.0),
        (2300.0, 650.0),
        (2300.0, 200.0),
        (3150.0, 650.0),
        (3350.0, 100.0),
    ]
    .into_iter()
    .map(|(x, y)| EnemySpawn::mob(x, y))
    .collect();
    enemies.push(EnemySpawn::data(5000.0, 200.0));

    StageLayout {
        stage: StageId::Stage1,
        map_width: DEFAULT_MAP_WIDTH,
        obstacles,
        enemies,
        teleport_spots: Vec::new(),
        siren: true,
        sprites: WALKER,
        background: "image/stg1.png",
    }
}

fn stage2() -> StageLayout {
    let obstacles = vec![
        ob(Wall, 500.0, 500.0, 50.0, 215.0),
        ob(Wall, 800.0, 500.0, 50.0, 215.0),
        ob(Wall, 1100.0, 500.0, 50.0, 215.0),
        ob(Platform, 500.0, 500.0, 1800.0, 20.0),
        ob(Wall, 1100.0, 300.0, 50.0, 200.0),
        ob(Wall, 1400.0, 300.0, 50.0, 200.0),
        ob(Wall, 1700.0, 300.0, 50.0, 200.0),
        ob(Platform, 1100.0, 300.0, 650.0, 20.0),
        ob(Wall, 3000.0, 300.0, 50.0, 200.0),
        ob(Wall, 3300.0, 300.0, 50.0, 200.0),
        ob(Wall, 3600.0, 300.0, 50.0, 200.0),
        ob(Platform, 3000.0, 300.0, 650.0, 20.0),
        ob(Wall, 3600.0, 500.0, 50.0, 215.0),
        ob(Wall, 3900.0, 500.0, 50.0, 215.0),
        ob(Wall, 4200.0, 0.0, 50.0, 715.0),
        ob(Platform, 2400.0, 500.0, 1850.0, 20.0),
    ];

    let mut enemies: Vec<EnemySpawn> = [
        (650.0, 680.0),
        (950.0, 680.0),
        (1250.0, 450.0),
        (1550.0, 450.0),
        (3150.0, 450.0),
        (3450.0, 450.0),
        (3750.0, 680.0),
        (4050.0, 680.0),
    ]
    .into_iter()
    .map(|(x, y)| EnemySpawn::mob(x, y))
    .collect();
    // Fast runners, then slow shooters
    enemies.extend([
        EnemySpawn::mob(700.0, 450.0).with(8.0, 1, false),
        EnemySpawn::mob(1350.0, 150.0).with(8.0, 1, false),
        EnemySpawn::mob(3200.0, 150.0).with(8.0, 1, false),
        EnemySpawn::mob(1600.0, 680.0).with(1.0, 3, true),
        EnemySpawn::mob(3000.0, 680.0).with(1.0, 3, true),
        EnemySpawn::data(2350.0, 680.0),
    ]);

    StageLayout {
        stage: StageId::Stage2,
        map_width: DEFAULT_MAP_WIDTH,
        obstacles,
        enemies,
        teleport_spots: Vec::new(),
        siren: true,
        sprites: WALKER,
        background: "image/stg2.png",
    }
}

fn mid_boss() -> StageLayout {
    StageLayout {
        stage: StageId::MidBoss,
        map_width: SCREEN_WIDTH,
        obstacles: vec![ob(Platform, 400.0, 500.0, 480.0, 20.0)],
        enemies: vec![EnemySpawn::boss(EnemyKind::BossMid, 1000.0, 680.0, 8.0, 50)],
        teleport_spots: Vec::new(),
        siren: false,
        sprites: EnemySprites {
            right: "image/char/antagonist/b_walk_R.gif",
            left: "image/char/antagonist/b_walk_L.gif",
            frames: 8,
        },
        background: "image/stg_mid.png",
    }
}

fn stage3() -> StageLayout {
    let obstacles = vec![
        ob(Platform, 600.0, 500.0, 500.0, 20.0),
        ob(Wall, 1200.0, 300.0, 50.0, 200.0),
        ob(Glass, 1200.0, 500.0, 50.0, 215.0),
        ob(Wall, 1500.0, 300.0, 50.0, 415.0),
        ob(Platform, 1200.0, 300.0, 300.0, 20.0),
        ob(Platform, 1200.0, 500.0, 300.0, 20.0),
        ob(Platform, 2000.0, 300.0, 400.0, 20.0),
        ob(Platform, 2000.0, 500.0, 400.0, 20.0),
        ob(Platform, 2500.0, 300.0, 500.0, 20.0),
        ob(Platform, 2500.0, 500.0, 500.0, 20.0),
        ob(Wall, 2500.0, 300.0, 50.0, 200.0),
        ob(Glass, 2700.0, 0.0, 50.0, 715.0),
        ob(Wall, 2950.0, 0.0, 50.0, 715.0),
        ob(Glass, 4500.0, 0.0, 50.0, 715.0),
    ];

    let enemies = vec![
        EnemySpawn::mob(1300.0, 600.0).with(8.0, 3, true),
        EnemySpawn::mob(1300.0, 400.0).with(8.0, 3, true),
        EnemySpawn::mob(2200.0, 500.0).with(3.0, 3, true),
        EnemySpawn::mob(2200.0, 200.0).with(3.0, 3, true),
        EnemySpawn::mob(2900.0, 250.0).with(8.0, 3, true),
        EnemySpawn::mob(2900.0, 400.0).with(8.0, 3, true),
        EnemySpawn::mob(2900.0, 600.0).with(8.0, 3, true),
        EnemySpawn::data(2600.0, 250.0),
        EnemySpawn::data(2600.0, 600.0),
        EnemySpawn::data(1100.0, 600.0),
    ];

    StageLayout {
        stage: StageId::Stage3,
        map_width: DEFAULT_MAP_WIDTH,
        obstacles,
        enemies,
        teleport_spots: Vec::new(),
        siren: true,
        sprites: EnemySprites {
            right: "image/char/enemy/es_walk_R.gif",
            left: "image/char/enemy/es_walk_L.gif",
            frames: 8,
        },
        background: "image/stg3.png",
    }
}

fn system_boss() -> StageLayout {
    let obstacles = vec![
        // Upper tier
        ob(Platform, 0.0, 200.0, 500.0, 20.0),
        ob(Platform, 780.0, 200.0, 500.0, 20.0),
        // Middle tier
        ob(Platform, 0.0, 450.0, 500.0, 20.0),
        ob(Platform, 780.0, 450.0, 500.0, 20.0),
        // Cover walls
        ob(Wall, 900.0, 450.0, 30.0, 270.0),
        ob(Wall, 350.0, 200.0, 30.0, 250.0),
        ob(Wall, 900.0, 0.0, 30.0, 200.0),
    ];

    let spots = vec![Vec2::new(1100.0, 600.0), Vec2::new(150.0, 350.0), Vec2::new(1100.0, 100.0)];
    let start = spots[0];

    StageLayout {
        stage: StageId::SystemBoss,
        map_width: SCREEN_WIDTH,
        obstacles,
        enemies: vec![EnemySpawn::boss(EnemyKind::BossSystem, start.x, start.y, 0.0, 30)],
        teleport_spots: spots,
        siren: false,
        sprites: EnemySprites {
            right: "image/char/hidden/fly_R.gif",
            left: "image/char/hidden/fly_L.gif",
            frames: 6,
        },
        background: "image/stg_system.png",
    }
}
