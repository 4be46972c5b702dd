//! Title menu

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{KeyResponse, TransitionSignal};
use crate::platform::Key;

/// Number of menu background images (`image/bga1.png` ..)
pub const MENU_BACKGROUNDS: u8 = 38;

pub struct MenuScene {
    background: u8,
    rng: Pcg32,
}

impl MenuScene {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let background = rng.random_range(1..=MENU_BACKGROUNDS);
        Self { background, rng }
    }

    /// Index of the current background
    pub fn background(&self) -> u8 {
        self.background
    }

    pub fn background_image(&self) -> String {
        format!("image/bga{}.png", self.background)
    }

    /// Pick a new background at random (may repeat)
    pub fn reroll(&mut self) {
        self.background = self.rng.random_range(1..=MENU_BACKGROUNDS);
        log::debug!("Menu background -> {}", self.background);
    }

    pub fn handle_key_up(&mut self, key: Key) -> KeyResponse {
        match key {
            Key::S => KeyResponse::signal(TransitionSignal::Start),
            Key::R => {
                self.reroll();
                KeyResponse::default()
            }
            _ => KeyResponse::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_and_reroll() {
        let mut menu = MenuScene::new(42);
        assert_eq!(menu.handle_key_up(Key::S).signal, TransitionSignal::Start);
        for _ in 0..50 {
            assert_eq!(menu.handle_key_up(Key::R).signal, TransitionSignal::None);
            assert!((1..=MENU_BACKGROUNDS).contains(&menu.background()));
        }
        assert_eq!(menu.handle_key_up(Key::Enter), KeyResponse::default());
    }

    #[test]
    fn test_same_seed_same_backgrounds() {
        let mut a = MenuScene::new(7);
        let mut b = MenuScene::new(7);
        for _ in 0..10 {
            assert_eq!(a.background_image(), b.background_image());
            a.reroll();
            b.reroll();
        }
    }
}
