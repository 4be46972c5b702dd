//! Earth Is Round - a side-scrolling action game core
//!
//! Core modules:
//! - `sim`: Deterministic level simulation (physics, projectiles, enemy AI, combat)
//! - `scene`: Scene graph, transitions, retry and game-over recovery
//! - `platform`: Host abstraction (assets, render sync, input keys)
//! - `audio`: Sound cues and the music/sfx manager
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `replay`: Scripted key input for the headless runner

pub mod audio;
pub mod error;
pub mod platform;
pub mod replay;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::GameError;
pub use scene::{Game, SceneId, TransitionSignal};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Visible screen size in pixels
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// World floor line (foot positions never end a tick below this)
    pub const FLOOR_Y: f32 = 715.0;

    /// Target cadence of the game loop
    pub const TICK_MS: u64 = 33;
    /// Duration of one simulation tick in seconds
    pub const SIM_DT: f32 = TICK_MS as f32 / 1000.0;

    /// Default level length in world units
    pub const DEFAULT_MAP_WIDTH: f32 = 5351.0;

    /// Lives at the start of a run (and after a game-over reset)
    pub const STARTING_LIVES: u8 = 3;
}

/// Convert a world-space x to screen space for the given camera scroll
#[inline]
pub fn to_screen_x(world_x: f32, scroll_x: f32) -> f32 {
    world_x - scroll_x
}

/// Camera scroll that centers `focus_x`, clamped to the level bounds
pub fn camera_scroll(focus_x: f32, map_width: f32) -> f32 {
    let ideal = focus_x - (consts::SCREEN_WIDTH / 2.0).floor();
    let max_scroll = (map_width - consts::SCREEN_WIDTH).max(0.0);
    ideal.clamp(0.0, max_scroll)
}
