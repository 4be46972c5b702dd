//! Earth Is Round headless runner
//!
//! Runs the fixed-tick loop against a logging host, optionally driven by a
//! replay file. Set `RUST_LOG=info` (or `debug`) to watch the run.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use earth_is_round::consts::TICK_MS;
use earth_is_round::platform::HeadlessHost;
use earth_is_round::replay::Replay;
use earth_is_round::{Game, GameError, Settings, Tuning};

/// One minute at the default cadence
const DEFAULT_TICKS: u64 = 1800;

struct Args {
    tuning: Option<PathBuf>,
    settings: Option<PathBuf>,
    replay: Option<PathBuf>,
    seed: u64,
    ticks: u64,
    sleep: bool,
}

fn usage() -> &'static str {
    "usage: earth-is-round [--tuning <json>] [--settings <json>] [--replay <json>] \
     [--seed <n>] [--ticks <n>] [--no-sleep]"
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        tuning: None,
        settings: None,
        replay: None,
        seed: 0x5eed,
        ticks: DEFAULT_TICKS,
        sleep: true,
    };

    let mut it = std::env::args().skip(1);
    while let Some(flag) = it.next() {
        let mut value = || it.next().ok_or_else(|| format!("{flag} needs a value"));
        match flag.as_str() {
            "--tuning" => args.tuning = Some(PathBuf::from(value()?)),
            "--settings" => args.settings = Some(PathBuf::from(value()?)),
            "--replay" => args.replay = Some(PathBuf::from(value()?)),
            "--seed" => {
                let raw = value()?;
                args.seed = raw.parse().map_err(|_| format!("bad seed: {raw}"))?;
            }
            "--ticks" => {
                let raw = value()?;
                args.ticks = raw.parse().map_err(|_| format!("bad tick count: {raw}"))?;
            }
            "--no-sleep" => args.sleep = false,
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(args)
}

fn run(args: Args) -> Result<(), GameError> {
    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let replay = match &args.replay {
        Some(path) => Replay::load(path)?,
        None => Replay::default(),
    };

    let mut host = HeadlessHost::new();
    let mut game = Game::new(tuning, settings, args.seed, &mut host)?;
    let cadence = Duration::from_millis(TICK_MS);

    for tick in 0..args.ticks {
        let started = Instant::now();

        for signal in replay.step(tick, &mut game, &mut host)? {
            log::debug!("tick {tick}: {signal:?}");
        }
        if game.should_quit() {
            log::info!("Quit at tick {tick}");
            break;
        }

        if args.sleep {
            if let Some(rest) = cadence.checked_sub(started.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }

    match game.hud() {
        Some(hud) => log::info!(
            "Finished on {:?}: lives {}, score {}",
            game.active_id(),
            hud.lives,
            hud.score
        ),
        None => log::info!("Finished on {:?}: lives {}", game.active_id(), game.lives()),
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}\n{}", usage());
            return ExitCode::from(2);
        }
    };

    log::info!("Earth Is Round (headless) starting, seed {}", args.seed);
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Run aborted: {e}");
            ExitCode::FAILURE
        }
    }
}
