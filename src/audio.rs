//! Sound cues and the music/sfx manager
//!
//! The simulation only names cues; a host `AudioBackend` does the playing.

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player fires
    Shoot,
    /// Enemy fires
    EnemyShoot,
    /// Player bullet damages an enemy
    EnemyHit,
    /// Player takes a hit
    PlayerHit,
    /// Rare alternate player-hit cue
    PlayerHitRare,
    /// System boss warps
    Warp,
    /// Facility alarm starts
    Siren,
    /// Dialogue page turned
    Dialogue,
}

impl SoundEffect {
    pub fn file_name(&self) -> &'static str {
        match self {
            SoundEffect::Shoot => "sfx_shoot.wav",
            SoundEffect::EnemyShoot => "sfx_shoot_enemy.wav",
            SoundEffect::EnemyHit => "sfx_enemy_die.wav",
            SoundEffect::PlayerHit => "sfx_player_hit.wav",
            SoundEffect::PlayerHitRare => "sfx_player_hit_maybe.wav",
            SoundEffect::Warp => "sfx_warp.wav",
            SoundEffect::Siren => "sfx_siren.wav",
            SoundEffect::Dialogue => "sfx_dialogue.wav",
        }
    }
}

/// Looping music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Music {
    Main,
    Stage1,
    Stage2,
    MidBoss,
    Stage3,
    Boss,
    Clear,
    GameOver,
    Ending1,
    Ending2,
    SystemIntro,
    SystemBoss,
    SystemOutro,
    TrueEnding,
}

impl Music {
    pub fn file_name(&self) -> &'static str {
        match self {
            Music::Main => "bgm_main.mp3",
            Music::Stage1 => "bgm_stage1.mp3",
            Music::Stage2 => "bgm_stage2.mp3",
            Music::MidBoss => "bgm_midboss.mp3",
            Music::Stage3 => "bgm_stage3.mp3",
            Music::Boss => "bgm_boss.mp3",
            Music::Clear => "bgm_clear.mp3",
            Music::GameOver => "bgm_gameover.mp3",
            Music::Ending1 => "bgm_ending1.mp3",
            Music::Ending2 => "bgm_ending2.mp3",
            Music::SystemIntro => "bgm_system_intro.mp3",
            Music::SystemBoss => "bgm_system_boss.mp3",
            Music::SystemOutro => "bgm_system_outro.mp3",
            Music::TrueEnding => "bgm_true_ending.mp3",
        }
    }
}

/// Host-side audio playback
pub trait AudioBackend {
    /// Fire-and-forget effect; overlapping playback is allowed
    fn play_one_shot(&mut self, file: &str, volume: f32);
    /// Replace the current looping track
    fn play_looping(&mut self, file: &str, volume: f32);
}

/// Audio manager for the game
#[derive(Debug, Default)]
pub struct AudioManager {
    current_track: Option<Music>,
}

impl AudioManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently looping track, if any
    pub fn current_track(&self) -> Option<Music> {
        self.current_track
    }

    /// Play a sound effect
    pub fn play_sfx(&self, backend: &mut dyn AudioBackend, settings: &Settings, effect: SoundEffect) {
        let vol = settings.effective_sfx_volume();
        if vol <= 0.0 {
            return;
        }
        backend.play_one_shot(effect.file_name(), vol);
    }

    /// Start a looping track; requesting the track already playing is a no-op
    pub fn play_music(&mut self, backend: &mut dyn AudioBackend, settings: &Settings, track: Music) {
        if self.current_track == Some(track) {
            return;
        }
        self.current_track = Some(track);
        log::debug!("Music -> {}", track.file_name());
        backend.play_looping(track.file_name(), settings.effective_music_volume());
    }
}
