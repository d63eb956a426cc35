mod app;
mod buffer;
mod clock;
mod command;
mod config;
mod consts;
mod direction;
mod game;
mod grid;
mod simulation;
mod util;
use crate::app::App;
use crate::config::{Config, ConfigError};
use crate::game::Game;
use crate::simulation::SnakeSimulation;
use anyhow::Context;
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
};
use lexopt::{Arg, Parser};
use ratatui::{layout::Size, DefaultTerminal};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const USAGE: &str = "\
Usage: wrapsnake [-c|--config <file>] [--log-file <file>]

Play snake on a grid whose edges wrap around.

Options:
  -c, --config <file>   Read configuration from <file>
      --log-file <file> Write log messages to <file>
  -h, --help            Display this help message and exit
  -V, --version         Show the program version and exit
";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Cli {
    Run(Arguments),
    Help,
    Version,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Arguments {
    config: Option<PathBuf>,
    log_file: Option<PathBuf>,
}

impl Cli {
    fn from_parser(mut parser: Parser) -> Result<Cli, lexopt::Error> {
        let mut args = Arguments::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('c') | Arg::Long("config") => {
                    args.config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("log-file") => {
                    args.log_file = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('h') | Arg::Long("help") => return Ok(Cli::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Cli::Version),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Cli::Run(args))
    }
}

fn main() -> ExitCode {
    let args = match Cli::from_parser(Parser::from_env()) {
        Ok(Cli::Run(args)) => args,
        Ok(Cli::Help) => {
            print!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Ok(Cli::Version) => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("wrapsnake: {e}");
            eprintln!("Run `wrapsnake --help` for usage");
            return ExitCode::from(1);
        }
    };
    if let Some(path) = args.log_file.as_deref() {
        if let Err(e) = init_logging(path) {
            eprintln!("wrapsnake: {e:#}");
            return ExitCode::from(2);
        }
    }
    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("wrapsnake: {e:#}");
            return ExitCode::from(2);
        }
    };
    let terminal = ratatui::init();
    let r = run(terminal, config);
    if let Err(e) = execute!(io::stdout(), DisableMouseCapture, DisableFocusChange) {
        log::warn!("Failed to disable mouse capture: {e}");
    }
    ratatui::restore();
    exit_status(r)
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = fs_err::File::create(path).context("failed to open log file")?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("failed to initialize logging")?;
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let r = match path {
        Some(p) => Config::load(p, false),
        None => match Config::default_path() {
            Ok(p) => Config::load(&p, true),
            Err(ConfigError::NoPath) => {
                log::warn!("Could not determine configuration directory; using default configuration");
                Ok(Config::default())
            }
            Err(e) => Err(e),
        },
    };
    r.context("failed to load configuration")
}

fn run(terminal: DefaultTerminal, config: Config) -> anyhow::Result<()> {
    execute!(io::stdout(), EnableMouseCapture, EnableFocusChange)
        .context("failed to enable mouse capture")?;
    let size = terminal.size().context("failed to get terminal size")?;
    let available = Size {
        width: size.width.saturating_sub(consts::CHROME_SIZE.width),
        height: size.height.saturating_sub(consts::CHROME_SIZE.height),
    };
    let grid = config
        .grid
        .to_grid(available)
        .context("failed to set up playfield")?;
    log::info!(
        "Starting on a {}x{} grid ({}x{} units)",
        grid.columns(),
        grid.rows(),
        grid.width(),
        grid.height()
    );
    let game = Game::new(SnakeSimulation::new(grid), config.timing.tick_period());
    App::new(game, config.timing.frame_period()).run(terminal)?;
    Ok(())
}

fn exit_status(r: anyhow::Result<()>) -> ExitCode {
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if is_broken_pipe(&e) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("wrapsnake: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn is_broken_pipe(e: &anyhow::Error) -> bool {
    e.downcast_ref::<io::Error>()
        .is_some_and(|ioe| ioe.kind() == ErrorKind::BrokenPipe)
}
