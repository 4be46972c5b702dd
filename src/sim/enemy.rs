//! Enemies and their behavior
//!
//! Each enemy kind has an implicit state machine:
//! - Mob: tracks the player, optionally shoots on a cooldown
//! - Data: static shielded objective, never attacks
//! - BossMid: Mob plus HP-gated enrage and a timed wall summon
//! - BossSystem: floats in place, fires aimed volleys, teleports
//!
//! `think` only decides; the owning level applies the returned actions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{AnimationClock, Facing, KinematicBody};
use super::obstacle::ObstacleSet;
use super::rect::Rect;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Mob,
    Data,
    BossMid,
    BossSystem,
}

impl EnemyKind {
    pub fn is_boss(self) -> bool {
        matches!(self, EnemyKind::BossMid | EnemyKind::BossSystem)
    }

    /// Mobs and bosses keep data enemies shielded while alive
    pub fn is_hostile(self) -> bool {
        !matches!(self, EnemyKind::Data)
    }

    /// Fallback half extents when no sprite is available
    pub fn fallback_half_extents(self) -> Vec2 {
        match self {
            EnemyKind::Data => Vec2::new(30.0, 30.0),
            EnemyKind::Mob | EnemyKind::BossMid | EnemyKind::BossSystem => Vec2::new(20.0, 20.0),
        }
    }
}

/// Boss wall-summon skill
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WallSkill {
    /// No wall up; cooldown counts from `since`
    Idle { since: f32 },
    /// Wall `wall_id` raised at `since`
    Active { wall_id: u32, since: f32 },
}

/// Something an enemy wants the level to do
#[derive(Debug, Clone, PartialEq)]
pub enum EnemyAction {
    FireStraight { origin: Vec2, facing: Facing },
    FireAimed { origin: Vec2, target: Vec2, count: u32 },
    SummonWall { rect: Rect },
    DismissWall { wall_id: u32 },
    Teleport,
}

/// Where the player is, as seen by the AI this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perception {
    pub player: Vec2,
}

/// Spawn description for an enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub speed: f32,
    pub hp: i32,
    pub can_shoot: bool,
}

impl EnemySpawn {
    /// Plain walker: speed 3, one hit, no gun
    pub fn mob(x: f32, y: f32) -> Self {
        Self {
            kind: EnemyKind::Mob,
            pos: Vec2::new(x, y),
            speed: 3.0,
            hp: 1,
            can_shoot: false,
        }
    }

    pub fn with(mut self, speed: f32, hp: i32, can_shoot: bool) -> Self {
        self.speed = speed;
        self.hp = hp;
        self.can_shoot = can_shoot;
        self
    }

    pub fn data(x: f32, y: f32) -> Self {
        Self {
            kind: EnemyKind::Data,
            pos: Vec2::new(x, y),
            speed: 0.0,
            hp: 5,
            can_shoot: false,
        }
    }

    pub fn boss(kind: EnemyKind, x: f32, y: f32, speed: f32, hp: i32) -> Self {
        Self {
            kind,
            pos: Vec2::new(x, y),
            speed,
            hp,
            can_shoot: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub body: KinematicBody,
    pub hp: i32,
    pub max_hp: i32,
    pub can_shoot: bool,
    pub speed: f32,
    pub base_speed: f32,
    pub last_shot: f32,
    pub wall_skill: WallSkill,
    pub last_teleport: f32,
    pub anim: AnimationClock,
}

impl Enemy {
    pub fn spawn(id: u32, spawn: &EnemySpawn, half_extents: Vec2, now: f32, tuning: &Tuning) -> Self {
        let gravity = match spawn.kind {
            EnemyKind::BossSystem => 0.0,
            _ => tuning.enemy_gravity,
        };
        Self {
            id,
            kind: spawn.kind,
            body: KinematicBody::new(spawn.pos.x, spawn.pos.y, gravity, half_extents),
            hp: spawn.hp,
            max_hp: spawn.hp,
            can_shoot: spawn.can_shoot,
            speed: spawn.speed,
            base_speed: spawn.speed,
            last_shot: now,
            wall_skill: WallSkill::Idle { since: now },
            last_teleport: now,
            anim: AnimationClock::default(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Take one point of damage; hp never drops below zero
    pub fn take_hit(&mut self) -> bool {
        self.hp = (self.hp - 1).max(0);
        !self.is_alive()
    }

    /// Mid boss below its enrage threshold
    pub fn is_enraged(&self, tuning: &Tuning) -> bool {
        self.kind == EnemyKind::BossMid && self.hp <= tuning.enrage_hp
    }

    /// System boss at or below half health
    pub fn in_phase_two(&self) -> bool {
        self.kind == EnemyKind::BossSystem && self.hp * 2 <= self.max_hp
    }

    /// Current seconds between shots
    pub fn shot_cooldown(&self, tuning: &Tuning) -> f32 {
        match self.kind {
            EnemyKind::BossSystem if self.in_phase_two() => tuning.system_phase_two_cooldown,
            EnemyKind::BossSystem => tuning.system_shot_cooldown,
            EnemyKind::BossMid if self.is_enraged(tuning) => tuning.enrage_shot_cooldown,
            _ => tuning.shot_cooldown,
        }
    }

    /// Shots per attack
    pub fn volley_size(&self, tuning: &Tuning) -> u32 {
        if self.in_phase_two() {
            tuning.system_phase_two_volley
        } else {
            1
        }
    }

    /// Visual bounds inset by the damage margin
    pub fn damage_box(&self, tuning: &Tuning) -> Rect {
        self.body.damage_box(tuning.damage_box_inset)
    }

    /// Record that the level raised the summoned wall
    pub fn bind_wall(&mut self, wall_id: u32, now: f32) {
        self.wall_skill = WallSkill::Active { wall_id, since: now };
    }

    /// Move the enemy to a new spot (system boss teleport)
    pub fn warp_to(&mut self, spot: Vec2) {
        self.body.world_x = spot.x;
        self.body.y = spot.y;
        self.body.dy = 0.0;
    }

    /// Wall id currently raised by this enemy
    pub fn active_wall(&self) -> Option<u32> {
        match self.wall_skill {
            WallSkill::Active { wall_id, .. } => Some(wall_id),
            WallSkill::Idle { .. } => None,
        }
    }

    /// Run movement, physics and attack decisions for one active tick
    pub fn think(
        &mut self,
        seen: Perception,
        obstacles: &ObstacleSet,
        map_width: f32,
        now: f32,
        tuning: &Tuning,
    ) -> Vec<EnemyAction> {
        let mut actions = Vec::new();

        match self.kind {
            EnemyKind::BossSystem => {
                // Floats: no gravity, no tracking
                self.body.facing = Facing::toward(self.body.world_x, seen.player.x);
            }
            EnemyKind::Data => {
                self.body.integrate(obstacles, tuning);
            }
            EnemyKind::Mob | EnemyKind::BossMid => {
                self.speed = if self.is_enraged(tuning) {
                    self.base_speed * tuning.enrage_speed_factor
                } else {
                    self.base_speed
                };
                self.track(seen.player.x, obstacles, map_width, tuning);
                self.body.integrate(obstacles, tuning);
            }
        }

        if self.can_shoot && self.kind != EnemyKind::Data {
            self.attack(seen, now, tuning, &mut actions);
        }

        if self.kind == EnemyKind::BossMid {
            self.wall_summon(now, tuning, &mut actions);
        }

        actions
    }

    fn track(&mut self, player_x: f32, obstacles: &ObstacleSet, map_width: f32, tuning: &Tuning) {
        let gap = player_x - self.body.world_x;
        if gap.abs() <= tuning.tracking_dead_zone {
            return;
        }
        self.body.facing = Facing::toward(self.body.world_x, player_x);
        let dx = self.body.facing.sign() * self.speed;
        self.body.step_horizontal(dx, map_width, obstacles, tuning);
    }

    fn attack(&mut self, seen: Perception, now: f32, tuning: &Tuning, actions: &mut Vec<EnemyAction>) {
        if self.kind == EnemyKind::BossSystem
            && self.in_phase_two()
            && now - self.last_teleport > tuning.system_teleport_interval
        {
            self.last_teleport = now;
            actions.push(EnemyAction::Teleport);
        }

        if now - self.last_shot <= self.shot_cooldown(tuning) {
            return;
        }
        self.last_shot = now;

        let origin = self.body.center();
        match self.kind {
            EnemyKind::BossSystem => actions.push(EnemyAction::FireAimed {
                origin,
                target: seen.player,
                count: self.volley_size(tuning),
            }),
            _ => actions.push(EnemyAction::FireStraight {
                origin,
                facing: Facing::toward(self.body.world_x, seen.player.x),
            }),
        }
    }

    fn wall_summon(&mut self, now: f32, tuning: &Tuning, actions: &mut Vec<EnemyAction>) {
        match self.wall_skill {
            WallSkill::Idle { since } if now - since > tuning.wall_skill_cooldown => {
                let x = self.body.world_x + tuning.wall_offset * self.body.facing.sign();
                actions.push(EnemyAction::SummonWall {
                    rect: Rect::new(x, tuning.wall_top, tuning.wall_width, tuning.wall_height),
                });
            }
            WallSkill::Active { wall_id, since } if now - since > tuning.wall_skill_duration => {
                self.wall_skill = WallSkill::Idle { since: now };
                actions.push(EnemyAction::DismissWall { wall_id });
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::ObstacleKind;

    fn tuning() -> Tuning {
        // Half-second ticks keep the cooldown arithmetic exact
        Tuning {
            tick_seconds: 0.5,
            ..Default::default()
        }
    }

    fn enemy(spawn: EnemySpawn) -> Enemy {
        Enemy::spawn(1, &spawn, spawn.kind.fallback_half_extents(), 0.0, &tuning())
    }

    fn seen(x: f32) -> Perception {
        Perception {
            player: Vec2::new(x, 675.0),
        }
    }

    #[test]
    fn test_mob_tracks_player() {
        let t = tuning();
        let obstacles = ObstacleSet::new();
        let mut mob = enemy(EnemySpawn::mob(500.0, 695.0));
        mob.think(seen(100.0), &obstacles, 5351.0, 0.5, &t);
        assert_eq!(mob.body.world_x, 497.0);
        assert_eq!(mob.body.facing, Facing::Left);

        // Inside the dead zone nothing moves
        let mut near = enemy(EnemySpawn::mob(500.0, 695.0));
        near.think(seen(504.0), &obstacles, 5351.0, 0.5, &t);
        assert_eq!(near.body.world_x, 500.0);
    }

    #[test]
    fn test_mob_blocked_by_glass() {
        let t = tuning();
        let mut obstacles = ObstacleSet::new();
        obstacles.insert(ObstacleKind::Glass, Rect::new(522.0, 500.0, 50.0, 215.0));
        let mut mob = enemy(EnemySpawn::mob(500.0, 695.0).with(8.0, 1, false));
        for i in 0..10 {
            mob.think(seen(1000.0), &obstacles, 5351.0, i as f32 * 0.5, &t);
        }
        assert!(mob.body.world_x + t.body_half_width < 522.0);
    }

    #[test]
    fn test_data_never_moves_or_attacks() {
        let t = tuning();
        let obstacles = ObstacleSet::new();
        let mut data = enemy(EnemySpawn::data(800.0, 200.0));
        data.can_shoot = true;
        let mut all = Vec::new();
        for i in 1..40 {
            all.extend(data.think(seen(100.0), &obstacles, 5351.0, i as f32 * 0.5, &t));
        }
        assert_eq!(data.body.world_x, 800.0);
        assert!(all.is_empty());
        // Gravity still pulled it to the floor
        assert_eq!(data.body.foot(), crate::consts::FLOOR_Y);
    }

    #[test]
    fn test_shooter_cooldown() {
        let t = tuning();
        let obstacles = ObstacleSet::new();
        let mut mob = enemy(EnemySpawn::mob(500.0, 695.0).with(1.0, 3, true));
        assert!(mob.think(seen(100.0), &obstacles, 5351.0, 4.0, &t).is_empty());
        let actions = mob.think(seen(100.0), &obstacles, 5351.0, 4.5, &t);
        assert!(matches!(
            actions.as_slice(),
            [EnemyAction::FireStraight { facing: Facing::Left, .. }]
        ));
        assert!(mob.think(seen(100.0), &obstacles, 5351.0, 8.5, &t).is_empty());
        assert_eq!(mob.think(seen(100.0), &obstacles, 5351.0, 9.0, &t).len(), 1);
    }

    #[test]
    fn test_mid_boss_enrage_at_25() {
        let t = tuning();
        let obstacles = ObstacleSet::new();
        let mut boss = enemy(EnemySpawn::boss(EnemyKind::BossMid, 1000.0, 695.0, 8.0, 50));
        boss.hp = 30;
        for _ in 0..5 {
            boss.take_hit();
        }
        assert_eq!(boss.hp, 25);
        assert!(boss.is_enraged(&t));
        assert_eq!(boss.shot_cooldown(&t), 1.5);

        boss.think(seen(100.0), &obstacles, 1280.0, 0.5, &t);
        assert_eq!(boss.speed, 12.0);
        assert_eq!(boss.body.world_x, 988.0);
    }

    #[test]
    fn test_mid_boss_wall_cycle() {
        let t = tuning();
        let obstacles = ObstacleSet::new();
        let mut boss = enemy(EnemySpawn::boss(EnemyKind::BossMid, 1000.0, 695.0, 8.0, 50));
        boss.can_shoot = false;

        // Cooldown 8s from spawn
        let actions = boss.think(seen(1000.0), &obstacles, 1280.0, 8.0, &t);
        assert!(actions.is_empty());
        let actions = boss.think(seen(1000.0), &obstacles, 1280.0, 8.5, &t);
        let [EnemyAction::SummonWall { rect }] = actions.as_slice() else {
            panic!("expected wall summon, got {actions:?}");
        };
        // Facing right by default: wall at x + 80
        assert_eq!(rect.x1, 1080.0);
        assert_eq!(rect.y1, 500.0);
        boss.bind_wall(7, 8.5);

        // Up for 3s
        assert!(boss.think(seen(1000.0), &obstacles, 1280.0, 11.5, &t).is_empty());
        let actions = boss.think(seen(1000.0), &obstacles, 1280.0, 12.0, &t);
        assert_eq!(actions, vec![EnemyAction::DismissWall { wall_id: 7 }]);
        assert_eq!(boss.active_wall(), None);

        // Cooldown restarts from despawn
        assert!(boss.think(seen(1000.0), &obstacles, 1280.0, 20.0, &t).is_empty());
        assert_eq!(boss.think(seen(1000.0), &obstacles, 1280.0, 20.5, &t).len(), 1);
    }

    #[test]
    fn test_system_boss_phases() {
        let t = tuning();
        let obstacles = ObstacleSet::new();
        let mut boss = enemy(EnemySpawn::boss(EnemyKind::BossSystem, 1100.0, 600.0, 0.0, 30));

        // Phase one: single aimed shot every 4s, no gravity, no tracking
        let actions = boss.think(seen(200.0), &obstacles, 1280.0, 4.5, &t);
        assert!(matches!(actions.as_slice(), [EnemyAction::FireAimed { count: 1, .. }]));
        assert_eq!(boss.body.world_x, 1100.0);
        assert_eq!(boss.body.y, 600.0);
        assert_eq!(boss.body.facing, Facing::Left);

        boss.hp = 14;
        assert!(boss.in_phase_two());
        assert_eq!(boss.shot_cooldown(&t), 3.0);
        assert_eq!(boss.volley_size(&t), 3);
        let actions = boss.think(seen(200.0), &obstacles, 1280.0, 8.0, &t);
        assert!(matches!(actions.as_slice(), [EnemyAction::FireAimed { count: 3, .. }]));
    }

    #[test]
    fn test_system_boss_auto_teleport_every_ten_seconds() {
        let t = tuning();
        let obstacles = ObstacleSet::new();
        let mut boss = enemy(EnemySpawn::boss(EnemyKind::BossSystem, 1100.0, 600.0, 0.0, 30));
        boss.can_shoot = true;
        boss.hp = 15;
        boss.last_shot = 1000.0;

        let teleports = |actions: &[EnemyAction]| {
            actions.iter().filter(|a| **a == EnemyAction::Teleport).count()
        };
        assert_eq!(teleports(&boss.think(seen(0.0), &obstacles, 1280.0, 10.0, &t)), 0);
        assert_eq!(teleports(&boss.think(seen(0.0), &obstacles, 1280.0, 10.5, &t)), 1);
        assert_eq!(teleports(&boss.think(seen(0.0), &obstacles, 1280.0, 20.5, &t)), 0);
        assert_eq!(teleports(&boss.think(seen(0.0), &obstacles, 1280.0, 21.0, &t)), 1);
    }

    #[test]
    fn test_hp_never_negative() {
        let mut mob = enemy(EnemySpawn::mob(0.0, 0.0));
        assert!(mob.take_hit());
        assert!(mob.take_hit());
        assert_eq!(mob.hp, 0);
    }
}
