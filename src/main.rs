//! TETRS engine - headless runner
//!
//! Plays a seeded random autoplayer against the engine and prints every
//! event as one JSON line on stdout.
//!
//! Usage: `tetrs-engine [config.toml] [--ticks N]`

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tetrs_engine::{Action, ConfigError, Game, GameConfig, GameEvent};
use tracing_subscriber::EnvFilter;

/// Simulated frame length
const FRAME_MS: u32 = 16;
const DEFAULT_TICKS: u64 = 10_000;
/// Chance per frame that the autoplayer presses something
const PRESS_CHANCE: f64 = 0.2;

const ACTIONS: [Action; 7] = [
    Action::MoveLeft,
    Action::MoveRight,
    Action::SoftDrop,
    Action::HardDrop,
    Action::RotateCW,
    Action::RotateCCW,
    Action::Hold,
];

/// Command line options
struct Args {
    config: Option<PathBuf>,
    ticks: u64,
}

impl Args {
    fn parse() -> Result<Self, String> {
        let mut args = Args {
            config: None,
            ticks: DEFAULT_TICKS,
        };
        let mut iter = std::env::args().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--ticks" => {
                    let value = iter.next().ok_or("--ticks needs a value")?;
                    args.ticks = value
                        .parse()
                        .map_err(|e| format!("invalid --ticks {}: {}", value, e))?;
                }
                _ if args.config.is_none() && !arg.starts_with("--") => {
                    args.config = Some(PathBuf::from(&arg));
                }
                _ => return Err(format!("unexpected argument: {}", arg)),
            }
        }
        Ok(args)
    }
}

/// Presses one random key now and then, releasing it on the next frame
struct Autoplayer {
    rng: ChaCha8Rng,
    held: Option<Action>,
}

impl Autoplayer {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            held: None,
        }
    }

    fn step(&mut self, game: &mut Game) {
        if let Some(action) = self.held.take() {
            game.release(action);
        }
        if self.rng.gen_bool(PRESS_CHANCE) {
            let action = ACTIONS[self.rng.gen_range(0..ACTIONS.len())];
            game.press(action);
            self.held = Some(action);
        }
    }
}

#[derive(Serialize)]
struct EventLine<'a> {
    tick: u64,
    #[serde(flatten)]
    event: &'a GameEvent,
}

#[derive(Serialize, Default)]
struct Summary {
    ticks: u64,
    pieces: u64,
    lines: u64,
    game_over: bool,
}

/// Get the log directory, creating it if needed
fn log_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("tetrs-engine");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig, ConfigError> {
    match path {
        Some(path) => GameConfig::load(path),
        None => GameConfig::load_or_default(),
    }
}

fn run(game: &mut Game, player: &mut Autoplayer, ticks: u64) -> io::Result<Summary> {
    let mut out = io::stdout().lock();
    let mut summary = Summary::default();

    for tick in 0..ticks {
        player.step(game);
        for event in game.tick(FRAME_MS) {
            match event {
                GameEvent::Lock { .. } => summary.pieces += 1,
                GameEvent::Clear { lines } => summary.lines += lines as u64,
                GameEvent::GameOver => summary.game_over = true,
                GameEvent::Hold { .. } => {}
            }
            serde_json::to_writer(&mut out, &EventLine { tick, event: &event })?;
            writeln!(out)?;
        }
        summary.ticks = tick + 1;
        if game.is_game_over() {
            break;
        }
    }

    serde_json::to_writer(&mut out, &serde_json::json!({ "summary": &summary }))?;
    writeln!(out)?;
    out.flush()?;
    Ok(summary)
}

fn main() -> ExitCode {
    let session_id: u32 = rand::random();
    let log_file = format!("{:08x}.log", session_id);

    // Stdout carries the event stream; logs go to a file
    let file_appender = tracing_appender::rolling::never(log_dir(), &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tetrs_engine=info")),
        )
        .with_ansi(false)
        .init();

    let args = match Args::parse() {
        Ok(args) => args,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}\nusage: tetrs-engine [config.toml] [--ticks N]", e);
            return ExitCode::FAILURE;
        }
    };

    let config = match load_config(args.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut game = match Game::new(config) {
        Ok(game) => game,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        session = %format!("{:08x}", session_id),
        seed = game.seed(),
        ticks = args.ticks,
        "tetrs-engine starting"
    );

    let mut player = Autoplayer::new(game.seed());
    match run(&mut game, &mut player, args.ticks) {
        Ok(summary) => {
            tracing::info!(
                ticks = summary.ticks,
                pieces = summary.pieces,
                lines = summary.lines,
                game_over = summary.game_over,
                "run finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("failed to write events: {}", e);
            ExitCode::FAILURE
        }
    }
}
