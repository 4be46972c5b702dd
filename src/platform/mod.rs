//! Platform abstraction layer
//!
//! The core never touches windows, files or speakers directly. A host
//! implements these traits:
//! - `AssetSource`: animation frames (cached by the host)
//! - `RenderSink`: body positions, removals, scene visibility, fades
//! - `AudioBackend`: one-shot and looping playback

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::AudioBackend;
use crate::scene::SceneId;

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Left,
    Right,
    /// Jump
    Space,
    /// Fire
    A,
    /// Confirm / advance dialogue
    Enter,
    Escape,
    /// Start from the menu
    S,
    /// Re-roll the menu background
    R,
    Digit1,
    Digit2,
    Digit3,
    Other(u32),
}

impl Key {
    /// Map a raw keycode (Tk/Win32 virtual key numbering) to a key
    pub fn from_code(code: u32) -> Self {
        match code {
            37 => Key::Left,
            39 => Key::Right,
            32 => Key::Space,
            65 => Key::A,
            13 => Key::Enter,
            27 => Key::Escape,
            83 => Key::S,
            82 => Key::R,
            49 => Key::Digit1,
            50 => Key::Digit2,
            51 => Key::Digit3,
            other => Key::Other(other),
        }
    }
}

/// Handle to a loaded animation frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameHandle {
    pub id: u32,
    pub width: f32,
    pub height: f32,
}

impl FrameHandle {
    /// Half extents of the frame, used as a body's visual bounds
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new((self.width / 2.0).floor(), (self.height / 2.0).floor())
    }
}

/// Something the renderer draws for the active level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyRef {
    Player,
    Enemy(u32),
    Bullet(u32),
    Obstacle(u32),
}

pub trait AssetSource {
    /// Load `frame_count` frames of an animation; an empty result means the
    /// asset is missing and the caller must fall back
    fn load_animation_frames(&mut self, path: &str, frame_count: usize) -> Vec<FrameHandle>;
}

pub trait RenderSink {
    fn set_body_screen_position(&mut self, body: BodyRef, screen: Vec2);
    fn remove_body(&mut self, body: BodyRef);
    fn show_scene(&mut self, scene: SceneId);
    fn hide_scene(&mut self, scene: SceneId);
    /// Short fixed fade played on every transition
    fn fade_in(&mut self, scene: SceneId);
}

/// Everything the game manager needs from its host
pub trait Host: AssetSource + RenderSink + AudioBackend {}

impl<T: AssetSource + RenderSink + AudioBackend> Host for T {}

/// Host without a window: caches frame lookups, logs audio and drops draws
#[derive(Debug, Default)]
pub struct HeadlessHost {
    sprites: HashMap<String, (f32, f32)>,
    cache: HashMap<(String, usize), Vec<FrameHandle>>,
    next_frame_id: u32,
    positions: HashMap<BodyRef, Vec2>,
    visible: Option<SceneId>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sprite so loads of `path` succeed with the given frame size
    pub fn with_sprite(mut self, path: &str, width: f32, height: f32) -> Self {
        self.sprites.insert(path.to_string(), (width, height));
        self
    }

    /// Last screen position reported for a body
    pub fn position_of(&self, body: BodyRef) -> Option<Vec2> {
        self.positions.get(&body).copied()
    }

    /// Scene currently shown
    pub fn visible_scene(&self) -> Option<SceneId> {
        self.visible
    }
}

impl AssetSource for HeadlessHost {
    fn load_animation_frames(&mut self, path: &str, frame_count: usize) -> Vec<FrameHandle> {
        let key = (path.to_string(), frame_count);
        if let Some(frames) = self.cache.get(&key) {
            return frames.clone();
        }
        let frames = match self.sprites.get(path) {
            Some(&(width, height)) => (0..frame_count)
                .map(|_| {
                    self.next_frame_id += 1;
                    FrameHandle {
                        id: self.next_frame_id,
                        width,
                        height,
                    }
                })
                .collect(),
            None => {
                log::warn!("Asset load failed: {path}");
                Vec::new()
            }
        };
        self.cache.insert(key, frames.clone());
        frames
    }
}

impl RenderSink for HeadlessHost {
    fn set_body_screen_position(&mut self, body: BodyRef, screen: Vec2) {
        self.positions.insert(body, screen);
    }

    fn remove_body(&mut self, body: BodyRef) {
        self.positions.remove(&body);
    }

    fn show_scene(&mut self, scene: SceneId) {
        self.positions.clear();
        self.visible = Some(scene);
    }

    fn hide_scene(&mut self, scene: SceneId) {
        if self.visible == Some(scene) {
            self.visible = None;
        }
    }

    fn fade_in(&mut self, scene: SceneId) {
        log::trace!("Fade in {scene:?}");
    }
}

impl AudioBackend for HeadlessHost {
    fn play_one_shot(&mut self, file: &str, volume: f32) {
        log::debug!("sfx {file} @ {volume:.2}");
    }

    fn play_looping(&mut self, file: &str, volume: f32) {
        log::info!("bgm {file} @ {volume:.2}");
    }
}
