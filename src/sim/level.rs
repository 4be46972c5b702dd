//! A playable level
//!
//! Owns the player, roster, bullets and obstacles of one stage and advances
//! them in a fixed order each tick:
//! 1. queued jump/fire input
//! 2. player movement and physics, then camera scroll
//! 3. enemy AI inside the activity window, then contact damage
//! 4. bullets (obstacles, then entity hits)
//! 5. siren
//!
//! Time is the level's own tick counter; nothing reads a wall clock.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::body::Facing;
use super::combat::{self, Impact};
use super::enemy::{Enemy, EnemyAction, EnemyKind, Perception};
use super::events::GameEvent;
use super::obstacle::{ObstacleKind, ObstacleSet};
use super::player::{self, Player, PlayerState};
use super::projectile::{Bullet, BulletOwner, aimed_volley};
use super::stages::{DATA_SPRITE, EnemySprites, StageId, StageLayout};
use crate::audio::{Music, SoundEffect};
use crate::consts::SCREEN_WIDTH;
use crate::error::GameError;
use crate::platform::{AssetSource, BodyRef, Key, RenderSink};
use crate::scene::TransitionSignal;
use crate::tuning::Tuning;
use crate::{camera_scroll, to_screen_x};

/// Enemy walk animation frame interval in seconds
pub const ENEMY_ANIM_INTERVAL: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelPhase {
    Playing,
    /// Lost a life; waiting for the manager to rebuild this level
    PendingRetry,
    GameOver,
    /// Roster empty; waiting for Enter
    Cleared,
}

/// Predefined warp targets for the system boss
#[derive(Debug, Clone)]
pub struct TeleportSpots {
    spots: Vec<Vec2>,
    current: usize,
}

impl TeleportSpots {
    /// At least two spots are needed so a warp always has somewhere to go
    pub fn new(spots: Vec<Vec2>) -> Result<Self, GameError> {
        if spots.len() < 2 {
            return Err(GameError::TeleportSpots { count: spots.len() });
        }
        Ok(Self { spots, current: 0 })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Pick uniformly among the spots other than the current one
    pub fn pick<R: Rng>(&mut self, rng: &mut R) -> (usize, Vec2) {
        let mut idx = rng.random_range(0..self.spots.len() - 1);
        if idx >= self.current {
            idx += 1;
        }
        self.current = idx;
        (idx, self.spots[idx])
    }
}

/// Periodic facility alarm
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Siren {
    enabled: bool,
    active_since: Option<f32>,
    last_check: f32,
}

impl Siren {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            active_since: None,
            last_check: 0.0,
        }
    }

    /// Returns true on the tick the alarm starts
    pub fn update(&mut self, now: f32, tuning: &Tuning) -> bool {
        if !self.enabled {
            return false;
        }
        match self.active_since {
            None if now - self.last_check > tuning.siren_interval => {
                self.active_since = Some(now);
                true
            }
            Some(since) if now - since > tuning.siren_duration => {
                self.active_since = None;
                self.last_check = now;
                false
            }
            _ => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active_since.is_some()
    }

    /// Red overlay blinks: shown on even whole seconds of the alarm
    pub fn overlay_visible(&self, now: f32) -> bool {
        match self.active_since {
            Some(since) => ((now - since).floor() as i64) % 2 == 0,
            None => false,
        }
    }
}

/// Boss health bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BossBar {
    pub name: &'static str,
    pub hp: i32,
    pub max_hp: i32,
}

/// Read-only HUD snapshot for the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    /// Non-data enemies left; hidden during boss fights and after clear
    pub remaining_enemies: Option<usize>,
    pub boss: Option<BossBar>,
    pub lives: u8,
    pub score: u64,
    pub banner: Option<&'static str>,
    pub siren_overlay: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct HeldKeys {
    left: bool,
    right: bool,
}

pub struct LevelScene {
    stage: StageId,
    background: &'static str,
    map_width: f32,
    tuning: Tuning,
    rng: Pcg32,

    player: Player,
    player_walk_frames: usize,
    enemies: Vec<Enemy>,
    enemy_walk_frames: usize,
    bullets: Vec<Bullet>,
    obstacles: ObstacleSet,
    spots: Option<TeleportSpots>,
    siren: Siren,

    next_bullet_id: u32,
    scroll_x: f32,
    ticks: u64,
    phase: LevelPhase,
    score: u64,

    held: HeldKeys,
    queued_jump: bool,
    queued_fire: bool,
    events: Vec<GameEvent>,
}

impl LevelScene {
    pub fn build(
        stage: StageId,
        assets: &mut dyn AssetSource,
        tuning: &Tuning,
        seed: u64,
    ) -> Result<Self, GameError> {
        Self::from_layout(stage.layout(), assets, tuning, seed)
    }

    pub fn from_layout(
        layout: StageLayout,
        assets: &mut dyn AssetSource,
        tuning: &Tuning,
        seed: u64,
    ) -> Result<Self, GameError> {
        let has_system_boss = layout.enemies.iter().any(|e| e.kind == EnemyKind::BossSystem);
        let spots = if has_system_boss || !layout.teleport_spots.is_empty() {
            Some(TeleportSpots::new(layout.teleport_spots.clone())?)
        } else {
            None
        };

        let player_half = sprite_half_extents(assets, player::IDLE_RIGHT, 1)
            .unwrap_or(player::PLAYER_FALLBACK_HALF_EXTENTS);
        assets.load_animation_frames(player::IDLE_LEFT, 1);
        let player_walk_frames = assets
            .load_animation_frames(player::WALK_RIGHT, player::WALK_FRAMES)
            .len();
        assets.load_animation_frames(player::WALK_LEFT, player::WALK_FRAMES);

        let EnemySprites { right, left, frames } = layout.sprites;
        let walker_half = sprite_half_extents(assets, right, frames);
        let enemy_walk_frames = assets.load_animation_frames(left, frames).len();
        let data_half = sprite_half_extents(assets, DATA_SPRITE, 1);

        let enemies = layout
            .enemies
            .iter()
            .enumerate()
            .map(|(i, spawn)| {
                let loaded = match spawn.kind {
                    EnemyKind::Data => data_half,
                    _ => walker_half,
                };
                let half = loaded.unwrap_or_else(|| spawn.kind.fallback_half_extents());
                Enemy::spawn(i as u32 + 1, spawn, half, 0.0, tuning)
            })
            .collect();

        log::info!(
            "Built {:?}: {} obstacles, {} enemies",
            layout.stage,
            layout.obstacles.len(),
            layout.enemies.len()
        );

        Ok(Self {
            stage: layout.stage,
            background: layout.background,
            map_width: layout.map_width,
            tuning: tuning.clone(),
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(player_half, tuning),
            player_walk_frames,
            enemies,
            enemy_walk_frames,
            bullets: Vec::new(),
            obstacles: layout.obstacles.into_iter().collect(),
            spots,
            siren: Siren::new(layout.siren),
            next_bullet_id: 0,
            scroll_x: 0.0,
            ticks: 0,
            phase: LevelPhase::Playing,
            score: 0,
            held: HeldKeys::default(),
            queued_jump: false,
            queued_fire: false,
            events: Vec::new(),
        })
    }

    pub fn stage(&self) -> StageId {
        self.stage
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    /// Game over is final for this instance
    pub fn is_terminal(&self) -> bool {
        self.phase == LevelPhase::GameOver
    }

    pub fn background(&self) -> &'static str {
        self.background
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }

    pub fn scroll_x(&self) -> f32 {
        self.scroll_x
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulation time in seconds
    pub fn now(&self) -> f32 {
        self.ticks as f32 * self.tuning.tick_seconds
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn handle_key_down(&mut self, key: Key) {
        if self.phase != LevelPhase::Playing {
            return;
        }
        match key {
            Key::Left => self.held.left = true,
            Key::Right => self.held.right = true,
            Key::Space => self.queued_jump = true,
            Key::A => self.queued_fire = true,
            _ => {}
        }
    }

    pub fn handle_key_up(&mut self, key: Key) -> TransitionSignal {
        match key {
            Key::Left => self.held.left = false,
            Key::Right => self.held.right = false,
            _ => {}
        }
        if self.phase == LevelPhase::Cleared && key == Key::Enter {
            return match self.stage {
                StageId::SystemBoss => TransitionSignal::SystemCleared,
                _ => TransitionSignal::Cleared,
            };
        }
        TransitionSignal::None
    }

    /// Advance one tick. `lives` is the run-wide counter owned by the manager.
    pub fn advance(&mut self, lives: &mut u8) -> TransitionSignal {
        match self.phase {
            LevelPhase::GameOver => return TransitionSignal::GameOver,
            LevelPhase::PendingRetry => return TransitionSignal::Retry,
            LevelPhase::Cleared => return TransitionSignal::None,
            LevelPhase::Playing => {}
        }

        self.ticks += 1;
        let now = self.now();

        self.handle_queued_input(now);
        self.move_player(now);

        let signal = self.update_enemies(now, lives);
        if signal != TransitionSignal::None {
            return signal;
        }

        let signal = self.update_bullets(lives);
        if signal != TransitionSignal::None {
            return signal;
        }

        if self.phase == LevelPhase::Playing && self.siren.update(now, &self.tuning) {
            log::info!("Facility alarm: intruder detected");
            self.events.push(GameEvent::SirenStarted);
            self.events.push(GameEvent::Sound(SoundEffect::Siren));
        }

        TransitionSignal::None
    }

    fn handle_queued_input(&mut self, now: f32) {
        if std::mem::take(&mut self.queued_jump) {
            self.player.jump();
        }
        if std::mem::take(&mut self.queued_fire) && self.player.try_fire(now, &self.tuning) {
            let origin = self.player.shoot_origin();
            let facing = self.player.body.facing;
            let speed = self.tuning.player_bullet_speed;
            self.spawn_bullet(|id| Bullet::straight(id, origin, BulletOwner::Player, facing, speed));
            self.events.push(GameEvent::Sound(SoundEffect::Shoot));
        }
    }

    fn move_player(&mut self, now: f32) {
        let dx = self.player.steer(self.held.left, self.held.right);
        if dx != 0.0 {
            self.player
                .body
                .step_horizontal(dx, self.map_width, &self.obstacles, &self.tuning);
        }
        self.player.body.integrate(&self.obstacles, &self.tuning);
        self.scroll_x = camera_scroll(self.player.body.world_x, self.map_width);

        match self.player.state {
            PlayerState::Walk => {
                self.player
                    .anim
                    .tick(now, player::PLAYER_ANIM_INTERVAL, self.player_walk_frames);
            }
            PlayerState::Idle => self.player.anim.frame = 0,
        }
    }

    fn in_activity_window(&self, world_x: f32) -> bool {
        let margin = self.tuning.activity_margin;
        let min = self.scroll_x - margin;
        let max = self.scroll_x + SCREEN_WIDTH + margin;
        (min..=max).contains(&world_x)
    }

    fn update_enemies(&mut self, now: f32, lives: &mut u8) -> TransitionSignal {
        let seen = Perception {
            player: self.player.body.center(),
        };

        for i in 0..self.enemies.len() {
            if !self.in_activity_window(self.enemies[i].body.world_x) {
                continue;
            }
            let actions = self.enemies[i].think(seen, &self.obstacles, self.map_width, now, &self.tuning);
            if self.enemies[i].kind != EnemyKind::Data {
                let frames = self.enemy_walk_frames;
                self.enemies[i].anim.tick(now, ENEMY_ANIM_INTERVAL, frames);
            }
            for action in actions {
                self.apply_action(i, action, now);
            }
        }

        let player_box = self.player.body.damage_box(self.tuning.damage_box_inset);
        if let Some(id) = combat::contact_hit(&player_box, &self.enemies, &self.tuning) {
            log::debug!("Player touched enemy {id}");
            return self.hit_player(lives);
        }
        TransitionSignal::None
    }

    fn apply_action(&mut self, idx: usize, action: EnemyAction, now: f32) {
        match action {
            EnemyAction::FireStraight { origin, facing } => {
                let speed = self.tuning.enemy_bullet_speed;
                self.spawn_bullet(|id| Bullet::straight(id, origin, BulletOwner::Enemy, facing, speed));
                self.events.push(GameEvent::Sound(SoundEffect::EnemyShoot));
            }
            EnemyAction::FireAimed { origin, target, count } => {
                let velocities = aimed_volley(
                    origin,
                    target,
                    self.tuning.aimed_bullet_speed,
                    count,
                    self.tuning.volley_spread,
                );
                for velocity in velocities {
                    self.spawn_bullet(|id| Bullet::aimed(id, origin, velocity));
                }
                self.events.push(GameEvent::Sound(SoundEffect::EnemyShoot));
            }
            EnemyAction::SummonWall { rect } => {
                let id = self.obstacles.insert(ObstacleKind::Wall, rect);
                self.enemies[idx].bind_wall(id, now);
                self.events.push(GameEvent::ObstacleSpawned {
                    id,
                    kind: ObstacleKind::Wall,
                    rect,
                });
            }
            EnemyAction::DismissWall { wall_id } => {
                if self.obstacles.remove(wall_id).is_some() {
                    self.events.push(GameEvent::ObstacleRemoved { id: wall_id });
                }
            }
            EnemyAction::Teleport => self.teleport(idx),
        }
    }

    fn spawn_bullet(&mut self, make: impl FnOnce(u32) -> Bullet) {
        self.next_bullet_id += 1;
        self.bullets.push(make(self.next_bullet_id));
    }

    fn teleport(&mut self, idx: usize) {
        let Some(spots) = self.spots.as_mut() else {
            log::warn!("Teleport requested on a stage without spots");
            return;
        };
        let (spot, pos) = spots.pick(&mut self.rng);
        self.enemies[idx].warp_to(pos);
        log::debug!("Enemy {} warped to spot {spot}", self.enemies[idx].id);
        self.events.push(GameEvent::Sound(SoundEffect::Warp));
        self.events.push(GameEvent::Teleported { spot });
    }

    fn update_bullets(&mut self, lives: &mut u8) -> TransitionSignal {
        let half = self.tuning.bullet_half_size;
        let mut i = 0;
        while i < self.bullets.len() {
            let fate = self.bullets[i].advance(&self.obstacles, self.scroll_x, &self.tuning);
            if !fate.is_alive() {
                self.remove_bullet(i);
                continue;
            }

            let hit_box = self.bullets[i].hit_box(half);
            match self.bullets[i].owner {
                BulletOwner::Player => {
                    let impact = combat::strike_enemies(&hit_box, &mut self.enemies, &self.tuning);
                    if impact.consumed() {
                        self.remove_bullet(i);
                        self.resolve_impact(impact);
                        continue;
                    }
                }
                BulletOwner::Enemy => {
                    let player_box = self.player.body.damage_box(self.tuning.damage_box_inset);
                    if hit_box.overlaps(&player_box) {
                        self.remove_bullet(i);
                        let signal = self.hit_player(lives);
                        if signal != TransitionSignal::None {
                            return signal;
                        }
                        continue;
                    }
                }
            }
            i += 1;
        }
        TransitionSignal::None
    }

    fn remove_bullet(&mut self, idx: usize) {
        let bullet = self.bullets.remove(idx);
        self.events.push(GameEvent::BulletRemoved { id: bullet.id });
    }

    fn resolve_impact(&mut self, impact: Impact) {
        match impact {
            Impact::Miss => {}
            Impact::Absorbed { enemy_id } => {
                self.events.push(GameEvent::ShieldAbsorbed { enemy_id });
            }
            Impact::Damaged { enemy_id, kind, killed } => {
                self.events.push(GameEvent::Sound(SoundEffect::EnemyHit));
                let Some(idx) = self.enemies.iter().position(|e| e.id == enemy_id) else {
                    return;
                };
                if kind == EnemyKind::BossSystem {
                    self.teleport(idx);
                }
                if killed {
                    self.kill_enemy(idx);
                }
            }
        }
    }

    fn kill_enemy(&mut self, idx: usize) {
        let enemy = self.enemies.remove(idx);
        if let Some(wall_id) = enemy.active_wall() {
            if self.obstacles.remove(wall_id).is_some() {
                self.events.push(GameEvent::ObstacleRemoved { id: wall_id });
            }
        }
        self.score += self.tuning.kill_score;
        self.events.push(GameEvent::EnemyKilled {
            id: enemy.id,
            kind: enemy.kind,
        });
        self.events.push(GameEvent::EnemyRemoved { id: enemy.id });

        if self.enemies.is_empty() {
            self.phase = LevelPhase::Cleared;
            self.held = HeldKeys::default();
            log::info!("{:?} cleared with score {}", self.stage, self.score);
            self.events.push(GameEvent::StageCleared);
            if self.stage != StageId::SystemBoss {
                self.events.push(GameEvent::Music(Music::Clear));
            }
        }
    }

    /// Take a hit; no-op unless the level is still in play
    fn hit_player(&mut self, lives: &mut u8) -> TransitionSignal {
        if self.phase != LevelPhase::Playing {
            return TransitionSignal::None;
        }
        let cue = combat::player_hit_sound(&mut self.rng);
        self.events.push(GameEvent::Sound(cue));
        self.events.push(GameEvent::PlayerHit);

        let signal = combat::settle_player_hit(lives);
        match signal {
            TransitionSignal::Retry => {
                log::info!("Player hit on {:?}, {} lives left", self.stage, lives);
                self.phase = LevelPhase::PendingRetry;
            }
            _ => {
                log::info!("Player out of lives on {:?}", self.stage);
                self.phase = LevelPhase::GameOver;
                self.events.push(GameEvent::Music(Music::GameOver));
            }
        }
        signal
    }

    /// HUD snapshot
    pub fn hud(&self, lives: u8) -> Hud {
        let boss = self.enemies.iter().find(|e| e.kind.is_boss()).map(|e| BossBar {
            name: match e.kind {
                EnemyKind::BossSystem => "FINAL BOSS: SYSTEM",
                _ => "MID BOSS: GUARD CAPTAIN",
            },
            hp: e.hp,
            max_hp: e.max_hp,
        });
        let cleared = self.phase == LevelPhase::Cleared;
        let remaining_enemies = if cleared || boss.is_some() {
            None
        } else {
            Some(self.enemies.iter().filter(|e| e.kind != EnemyKind::Data).count())
        };

        Hud {
            remaining_enemies,
            boss,
            lives,
            score: self.score,
            banner: cleared.then(|| self.stage.clear_banner()),
            siren_overlay: self.siren.overlay_visible(self.now()),
        }
    }

    /// Push screen positions of everything in the level to the renderer
    pub fn sync_render(&self, sink: &mut dyn RenderSink) {
        let screen = |world: Vec2| Vec2::new(to_screen_x(world.x, self.scroll_x), world.y);

        sink.set_body_screen_position(BodyRef::Player, screen(self.player.body.center()));
        for obstacle in self.obstacles.iter() {
            let corner = Vec2::new(obstacle.rect.x1, obstacle.rect.y1);
            sink.set_body_screen_position(BodyRef::Obstacle(obstacle.id), screen(corner));
        }
        for enemy in &self.enemies {
            sink.set_body_screen_position(BodyRef::Enemy(enemy.id), screen(enemy.body.center()));
        }
        for bullet in &self.bullets {
            sink.set_body_screen_position(BodyRef::Bullet(bullet.id), screen(bullet.pos));
        }
    }

    /// Facing of the player, exposed for sprite selection
    pub fn player_facing(&self) -> Facing {
        self.player.body.facing
    }

    #[cfg(test)]
    pub(crate) fn mark_cleared(&mut self) {
        self.phase = LevelPhase::Cleared;
    }

    #[cfg(test)]
    pub(crate) fn force_hit(&mut self, lives: &mut u8) -> TransitionSignal {
        self.hit_player(lives)
    }
}

fn sprite_half_extents(assets: &mut dyn AssetSource, path: &str, frames: usize) -> Option<Vec2> {
    let loaded = assets.load_animation_frames(path, frames);
    match loaded.first() {
        Some(frame) => Some(frame.half_extents()),
        None => {
            log::warn!("Sprite {path} unavailable, using fallback box");
            None
        }
    }
}
