// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;
mod capability;
mod config;
mod data;
mod events;
mod headless;
mod pages;
mod scheduler;
mod ui;

use app::App;
use config::{Settings, ThemeChoice};
use data::Route;

#[derive(Parser, Debug)]
#[command(name = "das-tool")]
#[command(about = "Terminal dashboard with a module health simulator and a self-advancing planning board")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Route to open at startup (e.g. "/planning" or "/feedback?task=...")
    #[arg(short, long)]
    route: Option<String>,

    /// Seed for the simulator's random source
    #[arg(long)]
    seed: Option<u64>,

    /// Simulation tick period in milliseconds (100-2000)
    #[arg(long)]
    speed: Option<u64>,

    /// Log file used while the dashboard is on screen
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Color theme
    #[arg(long, value_enum)]
    theme: Option<ThemeChoice>,

    /// Export one simulation step and the seed board to JSON and exit
    #[arg(short, long, conflicts_with_all = ["simulate", "board"])]
    export: Option<PathBuf>,

    /// Run N simulation ticks headless, printing NDJSON to stdout
    #[arg(long, value_name = "N", conflicts_with_all = ["export", "board"])]
    simulate: Option<u64>,

    /// Run the planning board headless for a duration (e.g. "15s"),
    /// printing the board as NDJSON each time a task moves
    #[arg(long, value_name = "DURATION", conflicts_with_all = ["export", "simulate"])]
    board: Option<String>,
}

impl Args {
    fn is_headless(&self) -> bool {
        self.export.is_some() || self.simulate.is_some() || self.board.is_some()
    }

    /// Apply flag overrides on top of the loaded settings.
    fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(seed) = self.seed {
            settings.simulation.seed = Some(seed);
        }
        if let Some(speed) = self.speed {
            settings.simulation.speed_ms = speed;
        }
        if let Some(ref path) = self.log_file {
            settings.log.file = path.clone();
        }
        if let Some(theme) = self.theme {
            settings.ui.theme = theme;
        }
        settings.validated()
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = args.apply(Settings::load(args.config.as_deref())?);

    init_tracing(&settings, args.is_headless())?;

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        return headless::export_to_file(&settings, export_path);
    }

    if let Some(ticks) = args.simulate {
        let rt = tokio::runtime::Runtime::new()?;
        return rt.block_on(async {
            let mut stdout = tokio::io::stdout();
            headless::simulate(&settings, ticks, &mut stdout).await
        });
    }

    if let Some(ref board) = args.board {
        let duration = data::format::parse_duration(board)?;
        let rt = tokio::runtime::Runtime::new()?;
        return rt.block_on(async {
            let mut stdout = tokio::io::stdout();
            headless::run_board(&settings, duration, &mut stdout).await
        });
    }

    let start = args.route.as_deref().map(Route::parse);
    run_tui(settings, start)
}

/// Install the tracing subscriber.
///
/// The dashboard owns the terminal, so interactive runs log to a file;
/// headless runs log to stderr and keep stdout for data.
fn init_tracing(settings: &Settings, headless: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if headless {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(io::stderr))
            .init();
    } else {
        let file = File::create(&settings.log.file).with_context(|| {
            format!("Failed to create log file {}", settings.log.file.display())
        })?;
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .init();
    }
    Ok(())
}

/// Run the interactive dashboard
fn run_tui(settings: Settings, start: Option<Route>) -> Result<()> {
    let speech = capability::detect(&settings.speech);
    let poll = settings.poll_timeout();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let mut app = App::new(settings, speech);
    if let Some(route) = start {
        app.navigate(route);
    }
    info!(route = %app.route, "dashboard started");

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, poll);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("dashboard stopped");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    poll: std::time::Duration,
) -> Result<()> {
    while app.running {
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(poll)? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Deliver page timers that came due
        app.tick();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_settings() {
        let args = Args::parse_from([
            "das-tool", "--seed", "9", "--speed", "5000", "--theme", "light",
        ]);
        let settings = args.apply(Settings::default());
        assert_eq!(settings.simulation.seed, Some(9));
        assert_eq!(settings.simulation.speed_ms, 2000);
        assert_eq!(settings.ui.theme, ThemeChoice::Light);
        assert!(!args.is_headless());
    }

    #[test]
    fn test_headless_modes_conflict() {
        assert!(Args::try_parse_from(["das-tool", "--simulate", "3", "--board", "5s"]).is_err());
        let args = Args::parse_from(["das-tool", "--simulate", "3"]);
        assert!(args.is_headless());
    }
}
