//! Static end screens

use super::{KeyResponse, TransitionSignal};
use crate::platform::Key;

pub struct EndingScene {
    ending: u8,
}

impl EndingScene {
    pub fn new(ending: u8) -> Self {
        Self { ending }
    }

    pub fn ending(&self) -> u8 {
        self.ending
    }

    pub fn image(&self) -> String {
        format!("image/ending{}.png", self.ending)
    }

    /// ESC asks the host to close
    pub fn handle_key_up(&mut self, key: Key) -> KeyResponse {
        KeyResponse {
            quit: key == Key::Escape,
            ..Default::default()
        }
    }
}

#[derive(Default)]
pub struct GameOverScene;

impl GameOverScene {
    /// Enter returns to the menu with a full reset
    pub fn handle_key_up(&mut self, key: Key) -> KeyResponse {
        match key {
            Key::Enter => KeyResponse::signal(TransitionSignal::GoToMenu),
            _ => KeyResponse::default(),
        }
    }
}
