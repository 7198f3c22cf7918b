//! Gbloxs Entry Point
//!
//! Launches the interactive block terminal.
//!
//! Usage:
//!   gbloxs
//!
//! Environment:
//!   GBLOXS_SHELL          Shell used for /cmd and !cmd (default: sh)
//!   GBLOXS_TICK_MS        Progress tick interval in milliseconds (default: 100)
//!   GBLOXS_PROGRESS_STEP  Progress added per tick (default: 0.01)
//!   GBLOXS_NO_SEED        Start without the demo blocks (1 or true)
//!   GBLOXS_VIEWPORT_HEIGHT  Visible lines per block (default: 15)
//!   GBLOXS_INPUT_LIMIT    Maximum input length in characters (default: 500)
//!   GBLOXS_LOG_FILE       Write logs to this file instead of stderr
//!   RUST_LOG              Log filter

use std::fs::File;
use std::io;
use std::panic;
use std::sync::Arc;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gbloxs_tui::{App, SystemClipboard};
use session_core::SessionConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    // Check if we have a TTY before attempting initialization
    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: gbloxs requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means:");
        eprintln!("  • Running in a non-interactive environment (CI, container)");
        eprintln!("  • SSH without -t flag");
        eprintln!("  • Piped stdin/stdout");
        std::process::exit(1);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let result = run_app(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Propagate any errors
    result
}

/// Log to `GBLOXS_LOG_FILE` when set, otherwise stderr
fn init_logging() -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::from_default_env());

    match std::env::var("GBLOXS_LOG_FILE") {
        Ok(path) if !path.trim().is_empty() => {
            let file = File::create(&path)?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Arc::new(file)),
                )
                .init();
        }
        _ => {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(io::stderr),
                )
                .init();
        }
    }
    Ok(())
}

async fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> anyhow::Result<()> {
    let config = SessionConfig::from_env();
    let mut app = App::new(config, Box::new(SystemClipboard::new()));
    app.run(terminal).await
}
