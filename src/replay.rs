//! Scripted key input
//!
//! A replay is a JSON list of key events stamped with the game tick they
//! fire on. Feeding the same replay to two games built from the same seed
//! yields the same run.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::platform::{Host, Key};
use crate::scene::{Game, SceneId, TransitionSignal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    Press,
    Release,
    /// Press and release on the same tick
    Tap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayEvent {
    pub tick: u64,
    pub key: Key,
    pub action: KeyAction,
}

impl ReplayEvent {
    fn apply<H: Host>(&self, game: &mut Game, host: &mut H) -> Result<TransitionSignal, GameError> {
        match self.action {
            KeyAction::Press => {
                game.handle_key_down(self.key);
                Ok(TransitionSignal::None)
            }
            KeyAction::Release => game.handle_key_up(self.key, host),
            KeyAction::Tap => {
                game.handle_key_down(self.key);
                game.handle_key_up(self.key, host)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Replay {
    pub events: Vec<ReplayEvent>,
}

/// Signals and final state of a replayed run
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    /// Every non-empty signal with the tick it was raised on
    pub signals: Vec<(u64, TransitionSignal)>,
    pub ticks_run: u64,
    pub final_scene: SceneId,
    pub lives: u8,
}

impl Replay {
    /// Load and validate a replay from a JSON file
    pub fn load(path: &Path) -> Result<Self, GameError> {
        let raw = fs::read_to_string(path).map_err(|e| GameError::io(path, e))?;
        let replay: Replay = serde_json::from_str(&raw).map_err(|e| GameError::parse(path, e))?;
        replay.validate()?;
        log::info!("Loaded {} replay events from {}", replay.events.len(), path.display());
        Ok(replay)
    }

    /// Ticks must never go backwards
    pub fn validate(&self) -> Result<(), GameError> {
        for (i, pair) in self.events.windows(2).enumerate() {
            if pair[1].tick < pair[0].tick {
                return Err(GameError::Replay(format!(
                    "event {} at tick {} comes after tick {}",
                    i + 1,
                    pair[1].tick,
                    pair[0].tick
                )));
            }
        }
        Ok(())
    }

    /// Events scheduled for `tick`
    pub fn events_at(&self, tick: u64) -> impl Iterator<Item = &ReplayEvent> {
        self.events.iter().filter(move |e| e.tick == tick)
    }

    /// Last tick with an event
    pub fn last_tick(&self) -> Option<u64> {
        self.events.last().map(|e| e.tick)
    }

    /// Feed events for one tick into the game, then advance it
    pub fn step<H: Host>(
        &self,
        tick: u64,
        game: &mut Game,
        host: &mut H,
    ) -> Result<Vec<TransitionSignal>, GameError> {
        let mut raised = Vec::new();
        for event in self.events_at(tick) {
            let signal = event.apply(game, host)?;
            if signal != TransitionSignal::None {
                raised.push(signal);
            }
        }
        let signal = game.advance(host)?;
        if signal != TransitionSignal::None {
            raised.push(signal);
        }
        Ok(raised)
    }

    /// Run `ticks` ticks without pacing, stopping early on quit
    pub fn run<H: Host>(
        &self,
        game: &mut Game,
        host: &mut H,
        ticks: u64,
    ) -> Result<ReplayOutcome, GameError> {
        let mut signals = Vec::new();
        let mut ticks_run = 0;
        for tick in 0..ticks {
            if game.should_quit() {
                break;
            }
            signals.extend(self.step(tick, game, host)?.into_iter().map(|s| (tick, s)));
            ticks_run += 1;
        }
        Ok(ReplayOutcome {
            signals,
            ticks_run,
            final_scene: game.active_id(),
            lives: game.lives(),
        })
    }
}
