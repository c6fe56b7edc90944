mod app;
mod config;
mod error;
mod host;
mod terminal;
mod theme;
mod ui;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use clap::Parser;
use fern::Dispatch;
use log::LevelFilter;
use ratatui::crossterm::event::Event;
use ratatui::DefaultTerminal;
use stopwatch_core::{Stopwatch, TimeSource, Timing};

use crate::app::StopwatchApp;
use crate::config::Config;
use crate::error::AppError;
use crate::host::{MonotonicTime, PumpTicker, UuidIds};
use crate::theme::Theme;

/// Messages posted to the main loop by the helper threads.
#[derive(Debug)]
pub enum AppOp {
    Terminal(Event),
    /// Periodic trigger fired; carries the trigger's generation.
    Pump(u64),
    Quit,
}

type App = StopwatchApp<
    ratatui::backend::CrosstermBackend<std::io::Stdout>,
    MonotonicTime,
    PumpTicker,
    UuidIds,
>;

#[derive(Parser, Debug)]
#[command(name = "stopwatch", version, about)]
struct Opt {
    /// Config file [default: ./stopwatch.toml when present]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start with the dark theme
    #[arg(long)]
    dark: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Write the log here instead of the configured file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(level: LevelFilter, path: &Path) -> Result<(), AppError> {
    let file = fern::log_file(path).map_err(|source| AppError::LogFile {
        path: path.to_path_buf(),
        source,
    })?;
    Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{:<5}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(file)
        .apply()?;
    Ok(())
}

fn run_loop(app: &mut App, rx: &Receiver<AppOp>) -> Result<(), AppError> {
    app.redraw()?;

    loop {
        // Sleep until the next message, or until the next glow needs clearing
        let op = match app.next_glow_deadline() {
            Some(deadline) => {
                let now = app.stopwatch.time().now_ms();
                let wait = Duration::from_millis(deadline.saturating_sub(now));
                match rx.recv_timeout(wait) {
                    Ok(op) => Some(op),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match rx.recv() {
                Ok(op) => Some(op),
                Err(_) => break,
            },
        };

        match op {
            Some(AppOp::Terminal(event)) => app.handle_event(event)?,
            Some(AppOp::Pump(generation)) => {
                if app.stopwatch.ticker().is_current(generation) {
                    app.handle_pump()?;
                } else {
                    log::trace!("dropping pump from generation {}", generation);
                }
            }
            Some(AppOp::Quit) => break,
            None => {}
        }
        if app.should_quit() {
            break;
        }
        app.handle_glow()?;
    }
    Ok(())
}

fn run(opt: Opt) -> Result<(), AppError> {
    let config = Config::load(opt.config.as_deref())?;

    let level = if opt.verbose {
        LevelFilter::Debug
    } else {
        config.log.level.into()
    };
    let log_path = opt.log_file.unwrap_or_else(|| config.log.file_path());
    init_logging(level, &log_path)?;
    log::info!("Stopwatch PID is {}", std::process::id());

    let theme = if opt.dark { Theme::Dark } else { config.ui.theme };

    let (tx, rx) = mpsc::channel();
    let (ticker, pump) = PumpTicker::spawn(tx.clone())?;
    let stopwatch = Stopwatch::with_timing(
        MonotonicTime::new(),
        ticker,
        UuidIds,
        Timing::from(&config.timing),
    );

    let terminal: DefaultTerminal = terminal::init()?;
    let mut app = StopwatchApp::new(terminal, stopwatch, theme, &config.gesture);
    let result = terminal::spawn_event_reader(tx)
        .map_err(AppError::from)
        .and_then(|_| run_loop(&mut app, &rx));

    // Clean up
    terminal::restore();
    app.stopwatch.ticker().shutdown();
    if pump.join().is_err() {
        log::error!("pump thread panicked");
    }
    log::info!("Stopwatch exiting");
    result
}

fn main() -> ExitCode {
    let opt = Opt::parse();
    match run(opt) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("stopwatch: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli() {
        Opt::command().debug_assert();
        let opt = Opt::parse_from(["stopwatch", "--dark", "-c", "sw.toml"]);
        assert!(opt.dark);
        assert_eq!(opt.config, Some(PathBuf::from("sw.toml")));
        assert!(!opt.verbose);
    }
}
