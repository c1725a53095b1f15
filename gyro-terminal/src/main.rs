/// Gyro - an animated, lit gyroscope in the terminal
///
/// Controls (defaults, see `--bindings` to change them):
///   - SPACE: start / stop the rings
///   - < / >: slower / faster
///   - l / L: toggle light 0 / light 1
///   - t: toggle wireframe
///   - WASDRF, arrows: move and turn the whole gyroscope
///   - z x c v b n (and shifted): turn the outer, middle, inner ring
///   - g h y u i o (and shifted): slide the outer, middle, inner ring
///   - 1-6, 7-0 - =: move light 0, light 1
///   - ESC / Ctrl+C: quit
///
/// `--list-bindings` prints the active table in the same form `--bindings` reads.
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use gyro_core::config::MAX_FPS;
use gyro_core::{Config, KeyMap, Speed};
use gyro_terminal::TerminalApp;

#[derive(Parser, Debug)]
#[command(name = "gyro", version, about = "Animated gyroscope rendered in the terminal")]
pub struct Args {
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=MAX_FPS as i64))]
    /// Animation ticks and frames per second
    fps: u32,

    #[arg(long, default_value_t = Speed::DEFAULT, value_parser = clap::value_parser!(u32).range(Speed::MIN as i64..=Speed::MAX as i64))]
    /// Ticks per revolution of the outer ring
    speed: u32,

    #[arg(long, default_value_t = 0.05)]
    /// Half-width of the outer ring's random wobble, 0 turns it off
    jitter: f32,

    #[arg(long)]
    /// Seed for the wobble, for reproducible runs
    seed: Option<u64>,

    #[arg(short, long)]
    /// Key bindings file merged over the defaults
    bindings: Option<PathBuf>,

    #[arg(long)]
    /// Write logs to this file (filter with GYRO_LOG)
    log_file: Option<PathBuf>,

    #[arg(short, long)]
    /// Start in wireframe mode
    wireframe: bool,

    #[arg(short, long)]
    /// Start with the rings turning
    animate: bool,

    #[arg(long)]
    /// Print the active key bindings in bindings-file form and exit
    list_bindings: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            fps: self.fps,
            speed: self.speed,
            jitter: self.jitter,
            seed: self.seed,
            wireframe: self.wireframe,
            animate: self.animate,
        }
    }
}

/// The terminal is taken over while running, so logs only go to a file
/// unless GYRO_LOG asks for them explicitly.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let env = env_logger::Env::default().filter("GYRO_LOG");
    let mut builder = env_logger::Builder::new();

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            builder
                .filter_level(log::LevelFilter::Info)
                .parse_env(env)
                .target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder.filter_level(log::LevelFilter::Off).parse_env(env);
        }
    }

    builder.init();
    Ok(())
}

fn load_keymap(path: Option<&Path>) -> Result<KeyMap> {
    let mut keymap = KeyMap::standard();
    if let Some(path) = path {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read bindings file {}", path.display()))?;
        let count = keymap
            .merge(&text)
            .with_context(|| format!("bad bindings file {}", path.display()))?;
        log::info!("{} bindings loaded from {}", count, path.display());
    }
    Ok(keymap)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let keymap = load_keymap(args.bindings.as_deref())?;
    if args.list_bindings {
        print!("{}", keymap.to_bindings());
        return Ok(());
    }

    let mut app = TerminalApp::new(&args.config(), keymap)?;
    app.run()?;

    log::info!("bye");
    Ok(())
}
