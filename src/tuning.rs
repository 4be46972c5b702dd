//! Data-driven game balance
//!
//! Every gameplay constant lives here so a JSON file can override it. Missing
//! fields fall back to the shipped values.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{SIM_DT, STARTING_LIVES};
use crate::error::GameError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Seconds represented by one simulation tick (cooldowns are measured in this)
    pub tick_seconds: f32,
    /// Lives at the start of a run
    pub starting_lives: u8,

    // === Bodies ===
    /// How far above a surface a falling foot may have been last tick and still land
    pub landing_tolerance: f32,
    /// Half-width of the collision footprint around a body's x (not the sprite)
    pub body_half_width: f32,
    /// Inset applied to visual bounds to get a damage box
    pub damage_box_inset: f32,
    /// Extra world units on each side of the screen where enemies stay active
    pub activity_margin: f32,

    // === Player ===
    pub player_speed: f32,
    pub player_gravity: f32,
    /// Negative = upward impulse
    pub player_jump_power: f32,
    pub player_fire_cooldown: f32,

    // === Projectiles ===
    pub bullet_substeps: u32,
    /// Half-size of the box around a bullet used for entity hits
    pub bullet_half_size: f32,
    pub player_bullet_speed: f32,
    /// Screen laps a player bullet survives without hitting anything
    pub player_bullet_laps: u32,
    pub enemy_bullet_speed: f32,
    pub aimed_bullet_speed: f32,
    /// Angle between neighbouring shots of a volley (radians)
    pub volley_spread: f32,
    /// Horizontal off-screen margin before an enemy bullet is dropped
    pub offscreen_margin: f32,
    /// Enemy bullets are dropped outside `bullet_min_y..=bullet_max_y`
    pub bullet_min_y: f32,
    pub bullet_max_y: f32,

    // === Enemies ===
    pub enemy_gravity: f32,
    /// Horizontal gap under which enemies stop tracking
    pub tracking_dead_zone: f32,
    pub shot_cooldown: f32,
    pub kill_score: u64,

    // === Mid boss ===
    pub enrage_hp: i32,
    pub enrage_speed_factor: f32,
    pub enrage_shot_cooldown: f32,
    pub wall_skill_cooldown: f32,
    pub wall_skill_duration: f32,
    pub wall_offset: f32,
    pub wall_top: f32,
    pub wall_width: f32,
    pub wall_height: f32,

    // === System boss ===
    pub system_shot_cooldown: f32,
    pub system_phase_two_cooldown: f32,
    pub system_phase_two_volley: u32,
    pub system_teleport_interval: f32,

    // === Siren event ===
    pub siren_interval: f32,
    pub siren_duration: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_seconds: SIM_DT,
            starting_lives: STARTING_LIVES,

            landing_tolerance: 15.0,
            body_half_width: 20.0,
            damage_box_inset: 15.0,
            activity_margin: 300.0,

            player_speed: 15.0,
            player_gravity: 2.5,
            player_jump_power: -38.0,
            player_fire_cooldown: 0.2,

            bullet_substeps: 20,
            bullet_half_size: 5.0,
            player_bullet_speed: 50.0,
            player_bullet_laps: 2,
            enemy_bullet_speed: 20.0,
            aimed_bullet_speed: 15.0,
            volley_spread: 0.2,
            offscreen_margin: 100.0,
            bullet_min_y: -100.0,
            bullet_max_y: 800.0,

            enemy_gravity: 0.9,
            tracking_dead_zone: 5.0,
            shot_cooldown: 4.0,
            kill_score: 500,

            enrage_hp: 25,
            enrage_speed_factor: 1.5,
            enrage_shot_cooldown: 1.5,
            wall_skill_cooldown: 8.0,
            wall_skill_duration: 3.0,
            wall_offset: 80.0,
            wall_top: 500.0,
            wall_width: 20.0,
            wall_height: 315.0,

            system_shot_cooldown: 4.0,
            system_phase_two_cooldown: 3.0,
            system_phase_two_volley: 3,
            system_teleport_interval: 10.0,

            siren_interval: 15.0,
            siren_duration: 5.0,
        }
    }
}

impl Tuning {
    /// Load tuning overrides from a JSON file
    pub fn load(path: &Path) -> Result<Self, GameError> {
        let raw = fs::read_to_string(path).map_err(|e| GameError::io(path, e))?;
        let tuning: Tuning = serde_json::from_str(&raw).map_err(|e| GameError::parse(path, e))?;
        tuning.validate()?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.tick_seconds <= 0.0 {
            return Err(GameError::Tuning("tick_seconds must be > 0".into()));
        }
        if self.bullet_substeps == 0 {
            return Err(GameError::Tuning("bullet_substeps must be >= 1".into()));
        }
        if self.starting_lives == 0 {
            return Err(GameError::Tuning("starting_lives must be >= 1".into()));
        }
        if self.landing_tolerance < 0.0 || self.activity_margin < 0.0 {
            return Err(GameError::Tuning(
                "landing_tolerance and activity_margin must be >= 0".into(),
            ));
        }
        if self.player_jump_power >= 0.0 {
            return Err(GameError::Tuning("player_jump_power must be negative".into()));
        }
        Ok(())
    }

    /// Number of ticks a duration in seconds spans (rounded up)
    pub fn ticks_for(&self, seconds: f32) -> u64 {
        (seconds / self.tick_seconds).ceil() as u64
    }
}
