//! Scene manager
//!
//! Owns the scene arena, the run-wide lives counter and the audio manager.
//! Each tick it advances the active level, forwards its events to the host
//! and applies whatever signal came back.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{
    BossChoiceScene, DialogueScene, EndingScene, GameOverScene, MenuScene, Scene, SceneId,
    TransitionSignal, route,
};
use crate::audio::{AudioManager, Music};
use crate::error::GameError;
use crate::platform::{AssetSource, BodyRef, Host, Key};
use crate::settings::Settings;
use crate::sim::{GameEvent, Hud, LevelScene, StageId};
use crate::tuning::Tuning;

struct Slot {
    id: SceneId,
    scene: Scene,
}

pub struct Game {
    slots: Vec<Slot>,
    active: usize,
    lives: u8,
    tuning: Tuning,
    settings: Settings,
    audio: AudioManager,
    rng: Pcg32,
    quit: bool,
}

/// Level played in a slot, if the slot holds one
fn stage_for(id: SceneId) -> Option<StageId> {
    match id {
        SceneId::Stage1 => Some(StageId::Stage1),
        SceneId::Stage2 => Some(StageId::Stage2),
        SceneId::MidBoss => Some(StageId::MidBoss),
        SceneId::Stage3 => Some(StageId::Stage3),
        SceneId::SystemBoss => Some(StageId::SystemBoss),
        _ => None,
    }
}

fn build_scene(
    id: SceneId,
    assets: &mut dyn AssetSource,
    tuning: &Tuning,
    seed: u64,
) -> Result<Scene, GameError> {
    let scene = match id {
        SceneId::Menu => Scene::Menu(MenuScene::new(seed)),
        SceneId::Intro => Scene::Dialogue(DialogueScene::intro()),
        SceneId::MidDialogue => Scene::Dialogue(DialogueScene::mid()),
        SceneId::SystemIntro => Scene::Dialogue(DialogueScene::system_intro()),
        SceneId::SystemOutro => Scene::Dialogue(DialogueScene::system_outro()),
        SceneId::BossChoice => Scene::BossChoice(BossChoiceScene::new()),
        SceneId::GameOver => Scene::GameOver(GameOverScene),
        SceneId::Ending(n) => Scene::Ending(EndingScene::new(n)),
        SceneId::Stage1 => level_scene(StageId::Stage1, assets, tuning, seed)?,
        SceneId::Stage2 => level_scene(StageId::Stage2, assets, tuning, seed)?,
        SceneId::MidBoss => level_scene(StageId::MidBoss, assets, tuning, seed)?,
        SceneId::Stage3 => level_scene(StageId::Stage3, assets, tuning, seed)?,
        SceneId::SystemBoss => level_scene(StageId::SystemBoss, assets, tuning, seed)?,
    };
    Ok(scene)
}

fn level_scene(
    stage: StageId,
    assets: &mut dyn AssetSource,
    tuning: &Tuning,
    seed: u64,
) -> Result<Scene, GameError> {
    LevelScene::build(stage, assets, tuning, seed).map(|level| Scene::Level(Box::new(level)))
}

/// Forward one tick's level events to audio and the renderer
fn dispatch_events<H: Host>(
    events: Vec<GameEvent>,
    audio: &mut AudioManager,
    settings: &Settings,
    host: &mut H,
) {
    for event in events {
        match event {
            GameEvent::Sound(effect) => audio.play_sfx(host, settings, effect),
            GameEvent::Music(track) => audio.play_music(host, settings, track),
            GameEvent::ObstacleRemoved { id } => host.remove_body(BodyRef::Obstacle(id)),
            GameEvent::EnemyRemoved { id } => host.remove_body(BodyRef::Enemy(id)),
            GameEvent::BulletRemoved { id } => host.remove_body(BodyRef::Bullet(id)),
            GameEvent::EnemyKilled { id, kind } => log::debug!("Enemy {id} ({kind:?}) killed"),
            GameEvent::ShieldAbsorbed { enemy_id } => {
                log::debug!("Shot absorbed by data enemy {enemy_id}")
            }
            GameEvent::Teleported { spot } => log::debug!("System boss warped to spot {spot}"),
            GameEvent::ObstacleSpawned { .. }
            | GameEvent::PlayerHit
            | GameEvent::StageCleared
            | GameEvent::SirenStarted => {}
        }
    }
}

impl Game {
    /// Build every fixed slot and show the menu
    pub fn new<H: Host>(
        tuning: Tuning,
        settings: Settings,
        seed: u64,
        host: &mut H,
    ) -> Result<Self, GameError> {
        tuning.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);

        let mut slots = Vec::with_capacity(SceneId::FIXED.len() + 3);
        for id in SceneId::FIXED {
            let scene = build_scene(id, host, &tuning, rng.random::<u64>())?;
            slots.push(Slot { id, scene });
        }

        let mut game = Self {
            slots,
            active: 0,
            lives: tuning.starting_lives,
            tuning,
            settings,
            audio: AudioManager::new(),
            rng,
            quit: false,
        };
        host.show_scene(SceneId::Menu);
        game.audio.play_music(host, &game.settings, Music::Main);
        log::info!("Game ready with {} scenes (seed {seed})", game.slots.len());
        Ok(game)
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn active_id(&self) -> SceneId {
        self.slots[self.active].id
    }

    pub fn active_scene(&self) -> &Scene {
        &self.slots[self.active].scene
    }

    /// Scene stored under `id`, if that slot exists yet
    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.slots.iter().find(|s| s.id == id).map(|s| &s.scene)
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    /// An ending asked the host to close
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Nothing more will happen without outside help
    pub fn is_terminal(&self) -> bool {
        self.quit || self.active_scene().is_terminal()
    }

    /// HUD for the active level
    pub fn hud(&self) -> Option<Hud> {
        self.active_scene().as_level().map(|level| level.hud(self.lives))
    }

    /// Advance the active scene one tick
    pub fn advance<H: Host>(&mut self, host: &mut H) -> Result<TransitionSignal, GameError> {
        let active = self.active;
        let Some(level) = self.slots[active].scene.as_level_mut() else {
            return Ok(TransitionSignal::None);
        };

        let signal = level.advance(&mut self.lives);
        dispatch_events(level.drain_events(), &mut self.audio, &self.settings, host);
        level.sync_render(host);

        self.apply_signal(signal, host)?;
        Ok(signal)
    }

    pub fn handle_key_down(&mut self, key: Key) {
        self.slots[self.active].scene.handle_key_down(key);
    }

    pub fn handle_key_up<H: Host>(
        &mut self,
        key: Key,
        host: &mut H,
    ) -> Result<TransitionSignal, GameError> {
        let response = self.slots[self.active].scene.handle_key_up(key);
        if let Some(cue) = response.cue {
            self.audio.play_sfx(host, &self.settings, cue);
        }
        if response.quit {
            log::info!("Quit requested from {:?}", self.active_id());
            self.quit = true;
        }
        self.apply_signal(response.signal, host)?;
        Ok(response.signal)
    }

    fn apply_signal<H: Host>(
        &mut self,
        signal: TransitionSignal,
        host: &mut H,
    ) -> Result<(), GameError> {
        match signal {
            TransitionSignal::None => return Ok(()),
            TransitionSignal::Retry => return self.retry(host),
            _ => {}
        }

        let from = self.active_id();
        let Some(edge) = route(from, signal) else {
            log::warn!("No transition from {from:?} on {signal:?}");
            return Ok(());
        };

        if signal == TransitionSignal::GoToMenu {
            self.reset_run(host)?;
        }
        let index = self.ensure_slot(edge.to, host)?;
        self.switch_to(index, host);
        if let Some(track) = edge.music {
            self.audio.play_music(host, &self.settings, track);
        }
        Ok(())
    }

    /// Rebuild the active level in place; lives were already taken
    fn retry<H: Host>(&mut self, host: &mut H) -> Result<(), GameError> {
        let id = self.active_id();
        let Some(stage) = stage_for(id) else {
            return Ok(());
        };
        let level = LevelScene::build(stage, host, &self.tuning, self.rng.random::<u64>())?;
        self.slots[self.active].scene = Scene::Level(Box::new(level));
        log::info!("Retrying {id:?} with {} lives", self.lives);

        host.show_scene(id);
        if self.settings.effective_fade() {
            host.fade_in(id);
        }
        Ok(())
    }

    /// Index of the slot for `id`, appending it on first visit
    fn ensure_slot<H: Host>(&mut self, id: SceneId, host: &mut H) -> Result<usize, GameError> {
        if let Some(index) = self.slots.iter().position(|s| s.id == id) {
            return Ok(index);
        }
        let scene = build_scene(id, host, &self.tuning, self.rng.random::<u64>())?;
        self.slots.push(Slot { id, scene });
        log::info!("Added slot {} for {id:?}", self.slots.len() - 1);
        Ok(self.slots.len() - 1)
    }

    fn switch_to<H: Host>(&mut self, index: usize, host: &mut H) {
        let from = self.active_id();
        let to = self.slots[index].id;

        host.hide_scene(from);
        self.active = index;
        host.show_scene(to);
        if self.settings.effective_fade() {
            host.fade_in(to);
        }
        log::info!("Scene {from:?} -> {to:?}");
    }

    /// Fresh run: full lives, rebuilt levels, rewound dialogues
    fn reset_run<H: Host>(&mut self, host: &mut H) -> Result<(), GameError> {
        self.lives = self.tuning.starting_lives;
        for slot in &mut self.slots {
            match &mut slot.scene {
                Scene::Level(level) => {
                    let seed = self.rng.random::<u64>();
                    **level = LevelScene::build(level.stage(), host, &self.tuning, seed)?;
                }
                Scene::Dialogue(dialogue) => dialogue.reset(),
                Scene::BossChoice(choice) => choice.reset(),
                Scene::Menu(menu) => menu.reroll(),
                Scene::Ending(_) | Scene::GameOver(_) => {}
            }
        }
        log::info!("Run reset, {} lives", self.lives);
        Ok(())
    }

    #[cfg(test)]
    fn active_level_mut(&mut self) -> Option<&mut LevelScene> {
        let active = self.active;
        self.slots[active].scene.as_level_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HeadlessHost;
    use crate::scene::dialogue::BOSS_DIALOGUE_PAGES;
    use crate::sim::LevelPhase;

    fn game(host: &mut HeadlessHost) -> Game {
        Game::new(Tuning::default(), Settings::default(), 11, host).unwrap()
    }

    fn press(game: &mut Game, host: &mut HeadlessHost, key: Key) -> TransitionSignal {
        game.handle_key_down(key);
        game.handle_key_up(key, host).unwrap()
    }

    /// Menu -> Stage1 through the intro dialogue
    fn into_stage1(game: &mut Game, host: &mut HeadlessHost) {
        assert_eq!(press(game, host, Key::S), TransitionSignal::Start);
        for _ in 0..3 {
            press(game, host, Key::Enter);
        }
        assert_eq!(game.active_id(), SceneId::Stage1);
    }

    fn clear_active(game: &mut Game, host: &mut HeadlessHost) -> TransitionSignal {
        game.active_level_mut().unwrap().mark_cleared();
        press(game, host, Key::Enter)
    }

    #[test]
    fn test_starts_on_menu() {
        let mut host = HeadlessHost::new();
        let game = game(&mut host);
        assert_eq!(game.active_id(), SceneId::Menu);
        assert_eq!(game.slot_count(), 12);
        assert_eq!(game.lives(), 3);
        assert_eq!(game.audio().current_track(), Some(Music::Main));
        assert_eq!(host.visible_scene(), Some(SceneId::Menu));
        assert!(game.hud().is_none());
    }

    #[test]
    fn test_menu_to_stage2_ordering() {
        let mut host = HeadlessHost::new();
        let mut game = game(&mut host);

        into_stage1(&mut game, &mut host);
        assert_eq!(game.audio().current_track(), Some(Music::Stage1));
        assert_eq!(host.visible_scene(), Some(SceneId::Stage1));

        // Enter does nothing while enemies remain
        assert_eq!(press(&mut game, &mut host, Key::Enter), TransitionSignal::None);
        assert_eq!(game.active_id(), SceneId::Stage1);

        assert_eq!(clear_active(&mut game, &mut host), TransitionSignal::Cleared);
        assert_eq!(game.active_id(), SceneId::Stage2);
        assert_eq!(game.audio().current_track(), Some(Music::Stage2));
    }

    #[test]
    fn test_advance_ticks_active_level_only() {
        let mut host = HeadlessHost::new();
        let mut game = game(&mut host);
        assert_eq!(game.advance(&mut host).unwrap(), TransitionSignal::None);

        into_stage1(&mut game, &mut host);
        for _ in 0..5 {
            game.advance(&mut host).unwrap();
        }
        let Some(Scene::Level(stage1)) = game.scene(SceneId::Stage1) else {
            panic!("stage1 slot is not a level");
        };
        assert_eq!(stage1.ticks(), 5);
        let Some(Scene::Level(stage2)) = game.scene(SceneId::Stage2) else {
            panic!("stage2 slot is not a level");
        };
        assert_eq!(stage2.ticks(), 0);
        assert!(host.position_of(BodyRef::Player).is_some());
    }

    #[test]
    fn test_retry_rebuilds_in_place() {
        let mut host = HeadlessHost::new();
        let mut game = game(&mut host);
        into_stage1(&mut game, &mut host);
        for _ in 0..10 {
            game.advance(&mut host).unwrap();
        }

        let mut lives = game.lives;
        assert_eq!(
            game.active_level_mut().unwrap().force_hit(&mut lives),
            TransitionSignal::Retry
        );
        game.lives = lives;

        assert_eq!(game.advance(&mut host).unwrap(), TransitionSignal::Retry);
        assert_eq!(game.active_id(), SceneId::Stage1);
        assert_eq!(game.lives(), 2);
        let level = game.active_scene().as_level().unwrap();
        assert_eq!(level.ticks(), 0);
        assert_eq!(level.phase(), LevelPhase::Playing);
    }

    #[test]
    fn test_game_over_then_menu_resets_run() {
        let mut host = HeadlessHost::new();
        let mut game = game(&mut host);
        into_stage1(&mut game, &mut host);
        game.advance(&mut host).unwrap();

        let mut lives = 1;
        assert_eq!(
            game.active_level_mut().unwrap().force_hit(&mut lives),
            TransitionSignal::GameOver
        );
        game.lives = lives;

        assert_eq!(game.advance(&mut host).unwrap(), TransitionSignal::GameOver);
        assert_eq!(game.active_id(), SceneId::GameOver);
        assert_eq!(game.audio().current_track(), Some(Music::GameOver));
        assert_eq!(game.lives(), 0);

        assert_eq!(press(&mut game, &mut host, Key::Enter), TransitionSignal::GoToMenu);
        assert_eq!(game.active_id(), SceneId::Menu);
        assert_eq!(game.lives(), 3);
        assert_eq!(game.audio().current_track(), Some(Music::Main));

        let Some(Scene::Level(stage1)) = game.scene(SceneId::Stage1) else {
            panic!("stage1 slot is not a level");
        };
        assert_eq!(stage1.phase(), LevelPhase::Playing);
        assert_eq!(stage1.ticks(), 0);
        let Some(Scene::Dialogue(intro)) = game.scene(SceneId::Intro) else {
            panic!("intro slot is not a dialogue");
        };
        assert_eq!(intro.index(), 0);
    }

    /// Walk the whole main path up to the boss choice
    fn into_boss_choice(game: &mut Game, host: &mut HeadlessHost) {
        into_stage1(game, host);
        clear_active(game, host);
        clear_active(game, host);
        assert_eq!(game.active_id(), SceneId::MidDialogue);
        for _ in 0..8 {
            press(game, host, Key::Enter);
        }
        assert_eq!(game.active_id(), SceneId::MidBoss);
        clear_active(game, host);
        clear_active(game, host);
        assert_eq!(game.active_id(), SceneId::BossChoice);
        for _ in 0..BOSS_DIALOGUE_PAGES {
            press(game, host, Key::Enter);
        }
    }

    #[test]
    fn test_ending_slots_appended_once() {
        let mut host = HeadlessHost::new();
        let mut game = game(&mut host);
        into_boss_choice(&mut game, &mut host);

        assert_eq!(press(&mut game, &mut host, Key::Digit2), TransitionSignal::Ending2);
        assert_eq!(game.active_id(), SceneId::Ending(2));
        assert_eq!(game.slot_count(), 13);
        assert_eq!(game.audio().current_track(), Some(Music::Ending2));

        assert!(!game.should_quit());
        press(&mut game, &mut host, Key::Escape);
        assert!(game.should_quit());
        assert!(game.is_terminal());
    }

    #[test]
    fn test_hidden_boss_path() {
        let mut host = HeadlessHost::new();
        let mut game = game(&mut host);
        into_boss_choice(&mut game, &mut host);

        press(&mut game, &mut host, Key::Digit3);
        assert_eq!(game.active_id(), SceneId::SystemIntro);
        for _ in 0..7 {
            press(&mut game, &mut host, Key::Enter);
        }
        assert_eq!(game.active_id(), SceneId::SystemBoss);
        assert_eq!(game.audio().current_track(), Some(Music::SystemBoss));
        let hud = game.hud().unwrap();
        assert_eq!(hud.boss.map(|b| b.name), Some("FINAL BOSS: SYSTEM"));

        assert_eq!(clear_active(&mut game, &mut host), TransitionSignal::SystemCleared);
        assert_eq!(game.active_id(), SceneId::SystemOutro);
        for _ in 0..11 {
            press(&mut game, &mut host, Key::Enter);
        }
        assert_eq!(game.active_id(), SceneId::Ending(3));
        assert_eq!(game.audio().current_track(), Some(Music::TrueEnding));
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let mut host = HeadlessHost::new();
        let tuning = Tuning {
            starting_lives: 0,
            ..Default::default()
        };
        assert!(matches!(
            Game::new(tuning, Settings::default(), 1, &mut host),
            Err(GameError::Tuning(_))
        ));
    }
}
