//! Dialogue scenes: image sequences advanced with Enter
//!
//! The boss choice is a dialogue followed by a three-way choice screen.

use super::{KeyResponse, TransitionSignal};
use crate::audio::SoundEffect;
use crate::platform::Key;

pub struct DialogueScene {
    images: Vec<String>,
    background: &'static str,
    index: usize,
}

impl DialogueScene {
    pub fn new(images: Vec<String>, background: &'static str) -> Self {
        Self {
            images,
            background,
            index: 0,
        }
    }

    /// `image/{prefix}1.png` .. `image/{prefix}{count}.png`
    pub fn numbered(prefix: &str, count: usize, background: &'static str) -> Self {
        let images = (1..=count).map(|i| format!("image/{prefix}{i}.png")).collect();
        Self::new(images, background)
    }

    pub fn intro() -> Self {
        Self::numbered("text", 3, "image/story1.png")
    }

    pub fn mid() -> Self {
        Self::numbered("mid_text", 8, "image/story_mid.png")
    }

    pub fn system_intro() -> Self {
        Self::numbered("sys_in_text", 7, "image/story_hidden.png")
    }

    pub fn system_outro() -> Self {
        Self::numbered("sys_out_text", 11, "image/story_hidden.png")
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn background(&self) -> &'static str {
        self.background
    }

    /// Page on screen; `None` once the sequence is exhausted
    pub fn current_image(&self) -> Option<&str> {
        self.images.get(self.index).map(String::as_str)
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Turn the page; returns true when the sequence is exhausted
    fn turn_page(&mut self) -> bool {
        self.index = (self.index + 1).min(self.images.len());
        self.index >= self.images.len()
    }

    pub fn handle_key_up(&mut self, key: Key) -> KeyResponse {
        if key != Key::Enter {
            return KeyResponse::default();
        }
        let signal = if self.turn_page() {
            TransitionSignal::Next
        } else {
            TransitionSignal::None
        };
        KeyResponse {
            signal,
            cue: Some(SoundEffect::Dialogue),
            quit: false,
        }
    }
}

/// Pages shown before the choice
pub const BOSS_DIALOGUE_PAGES: usize = 35;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceState {
    Dialogue,
    Choice,
}

pub struct BossChoiceScene {
    dialogue: DialogueScene,
    state: ChoiceState,
}

impl Default for BossChoiceScene {
    fn default() -> Self {
        Self::new()
    }
}

impl BossChoiceScene {
    pub fn new() -> Self {
        Self {
            dialogue: DialogueScene::numbered("boss_text", BOSS_DIALOGUE_PAGES, "image/story2.png"),
            state: ChoiceState::Dialogue,
        }
    }

    pub fn state(&self) -> ChoiceState {
        self.state
    }

    pub fn index(&self) -> usize {
        self.dialogue.index()
    }

    /// The first two pages sit on one backdrop, the rest on another
    pub fn background(&self) -> &'static str {
        if self.dialogue.index() < 2 {
            "image/story2.png"
        } else {
            "image/story3.png"
        }
    }

    pub fn current_image(&self) -> Option<&str> {
        match self.state {
            ChoiceState::Dialogue => self.dialogue.current_image(),
            ChoiceState::Choice => None,
        }
    }

    pub fn reset(&mut self) {
        self.dialogue.reset();
        self.state = ChoiceState::Dialogue;
    }

    pub fn handle_key_up(&mut self, key: Key) -> KeyResponse {
        match self.state {
            ChoiceState::Dialogue => {
                let mut response = self.dialogue.handle_key_up(key);
                if response.signal == TransitionSignal::Next {
                    self.state = ChoiceState::Choice;
                    response.signal = TransitionSignal::None;
                }
                response
            }
            ChoiceState::Choice => {
                let signal = match key {
                    Key::Digit1 => TransitionSignal::Ending1,
                    Key::Digit2 => TransitionSignal::Ending2,
                    // Not listed on screen
                    Key::Digit3 => TransitionSignal::HiddenBoss,
                    _ => TransitionSignal::None,
                };
                KeyResponse::signal(signal)
            }
        }
    }
}
