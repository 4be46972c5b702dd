//! Scene graph
//!
//! Scenes never call back into the manager. They report a `TransitionSignal`
//! from `advance` or `handle_key_up`, and the manager looks the edge up in
//! `route`.

pub mod dialogue;
pub mod manager;
pub mod menu;
pub mod screens;

use serde::{Deserialize, Serialize};

use crate::audio::{Music, SoundEffect};
use crate::platform::Key;
use crate::sim::LevelScene;

pub use dialogue::{BossChoiceScene, DialogueScene};
pub use manager::Game;
pub use menu::MenuScene;
pub use screens::{EndingScene, GameOverScene};

/// Stable address of a scene slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneId {
    Menu,
    Intro,
    Stage1,
    Stage2,
    MidDialogue,
    MidBoss,
    Stage3,
    BossChoice,
    GameOver,
    SystemIntro,
    SystemBoss,
    SystemOutro,
    /// Appended the first time ending `n` is reached
    Ending(u8),
}

impl SceneId {
    /// Slots created up front, in slot order
    pub const FIXED: [SceneId; 12] = [
        SceneId::Menu,
        SceneId::Intro,
        SceneId::Stage1,
        SceneId::Stage2,
        SceneId::MidDialogue,
        SceneId::MidBoss,
        SceneId::Stage3,
        SceneId::BossChoice,
        SceneId::GameOver,
        SceneId::SystemIntro,
        SceneId::SystemBoss,
        SceneId::SystemOutro,
    ];
}

/// What a scene asks the manager to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransitionSignal {
    #[default]
    None,
    Start,
    Retry,
    Cleared,
    GameOver,
    Next,
    Ending1,
    Ending2,
    HiddenBoss,
    SystemCleared,
    GoToMenu,
}

/// A resolved edge of the scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub to: SceneId,
    /// Track to start on arrival; `None` keeps the current one
    pub music: Option<Music>,
}

/// Look up the edge for `signal` leaving `from`
pub fn route(from: SceneId, signal: TransitionSignal) -> Option<Route> {
    use SceneId as S;
    use TransitionSignal as T;

    let (to, music) = match (from, signal) {
        (S::Menu, T::Start) => (S::Intro, None),
        (S::Intro, T::Next) => (S::Stage1, Some(Music::Stage1)),
        (S::Stage1, T::Cleared) => (S::Stage2, Some(Music::Stage2)),
        (S::Stage2, T::Cleared) => (S::MidDialogue, Some(Music::MidBoss)),
        (S::MidDialogue, T::Next) => (S::MidBoss, None),
        (S::MidBoss, T::Cleared) => (S::Stage3, Some(Music::Stage3)),
        (S::Stage3, T::Cleared) => (S::BossChoice, Some(Music::Boss)),
        (S::BossChoice, T::Ending1) => (S::Ending(1), Some(Music::Ending1)),
        (S::BossChoice, T::Ending2) => (S::Ending(2), Some(Music::Ending2)),
        (S::BossChoice, T::HiddenBoss) => (S::SystemIntro, Some(Music::SystemIntro)),
        (S::SystemIntro, T::Next) => (S::SystemBoss, Some(Music::SystemBoss)),
        (S::SystemBoss, T::SystemCleared) => (S::SystemOutro, Some(Music::SystemOutro)),
        (S::SystemOutro, T::Next) => (S::Ending(3), Some(Music::TrueEnding)),
        (S::Stage1 | S::Stage2 | S::MidBoss | S::Stage3 | S::SystemBoss, T::GameOver) => {
            (S::GameOver, None)
        }
        (S::GameOver, T::GoToMenu) => (S::Menu, Some(Music::Main)),
        _ => return None,
    };
    Some(Route { to, music })
}

/// Result of a key release on a non-level scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyResponse {
    pub signal: TransitionSignal,
    pub cue: Option<SoundEffect>,
    pub quit: bool,
}

impl KeyResponse {
    pub fn signal(signal: TransitionSignal) -> Self {
        Self {
            signal,
            ..Default::default()
        }
    }
}

/// One scene instance in the arena
pub enum Scene {
    Menu(MenuScene),
    Dialogue(DialogueScene),
    Level(Box<LevelScene>),
    BossChoice(BossChoiceScene),
    Ending(EndingScene),
    GameOver(GameOverScene),
}

impl Scene {
    pub fn as_level(&self) -> Option<&LevelScene> {
        match self {
            Scene::Level(level) => Some(level),
            _ => None,
        }
    }

    pub fn as_level_mut(&mut self) -> Option<&mut LevelScene> {
        match self {
            Scene::Level(level) => Some(level),
            _ => None,
        }
    }

    /// Only a level can be terminal (out of lives)
    pub fn is_terminal(&self) -> bool {
        self.as_level().is_some_and(LevelScene::is_terminal)
    }

    pub fn handle_key_down(&mut self, key: Key) {
        if let Scene::Level(level) = self {
            level.handle_key_down(key);
        }
    }

    pub fn handle_key_up(&mut self, key: Key) -> KeyResponse {
        match self {
            Scene::Menu(menu) => menu.handle_key_up(key),
            Scene::Dialogue(dialogue) => dialogue.handle_key_up(key),
            Scene::Level(level) => KeyResponse::signal(level.handle_key_up(key)),
            Scene::BossChoice(choice) => choice.handle_key_up(key),
            Scene::Ending(ending) => ending.handle_key_up(key),
            Scene::GameOver(over) => over.handle_key_up(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_path_is_linear() {
        let path = [
            (SceneId::Menu, TransitionSignal::Start, SceneId::Intro),
            (SceneId::Intro, TransitionSignal::Next, SceneId::Stage1),
            (SceneId::Stage1, TransitionSignal::Cleared, SceneId::Stage2),
            (SceneId::Stage2, TransitionSignal::Cleared, SceneId::MidDialogue),
            (SceneId::MidDialogue, TransitionSignal::Next, SceneId::MidBoss),
            (SceneId::MidBoss, TransitionSignal::Cleared, SceneId::Stage3),
            (SceneId::Stage3, TransitionSignal::Cleared, SceneId::BossChoice),
        ];
        for (from, signal, to) in path {
            assert_eq!(route(from, signal).map(|r| r.to), Some(to), "{from:?} {signal:?}");
        }
    }

    #[test]
    fn test_branches() {
        assert_eq!(
            route(SceneId::BossChoice, TransitionSignal::HiddenBoss).map(|r| r.to),
            Some(SceneId::SystemIntro)
        );
        assert_eq!(
            route(SceneId::SystemOutro, TransitionSignal::Next),
            Some(Route {
                to: SceneId::Ending(3),
                music: Some(Music::TrueEnding)
            })
        );
        assert_eq!(
            route(SceneId::MidBoss, TransitionSignal::GameOver).map(|r| r.to),
            Some(SceneId::GameOver)
        );
    }

    #[test]
    fn test_unknown_edges_are_rejected() {
        assert_eq!(route(SceneId::Stage1, TransitionSignal::Next), None);
        assert_eq!(route(SceneId::Menu, TransitionSignal::Cleared), None);
        assert_eq!(route(SceneId::Intro, TransitionSignal::GameOver), None);
        // Retry never changes the active scene
        assert_eq!(route(SceneId::Stage2, TransitionSignal::Retry), None);
    }
}
