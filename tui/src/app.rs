//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, resize, engine results, animation frames)
//! - SessionRuntime for everything the session does
//! - Rendering from the runtime's current snapshot
//!
//! The App never touches blocks directly. Terminal input is translated to
//! [`Key`]s and dispatched; background results from the runtime are
//! dispatched the same way; every loop iteration ends with a redraw.

use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use session_core::{
    Clipboard, Controller, HostShell, Key, SessionConfig, SessionEvent, SessionRuntime,
    SessionState, ShellRunner,
};

use crate::keys;
use crate::ui;
use crate::widgets::Spinner;

/// Animation frame interval
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Main application state
pub struct App<R: ShellRunner + 'static = HostShell> {
    /// Session engine
    runtime: SessionRuntime<R>,
    /// Loading spinner
    spinner: Spinner,
}

impl App<HostShell> {
    /// Create an App running commands in the configured host shell
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: SessionConfig, clipboard: Box<dyn Clipboard>) -> Self {
        let shell = HostShell::new(config.shell.clone());
        Self::with_shell(config, shell, clipboard)
    }
}

impl<R: ShellRunner + 'static> App<R> {
    /// Create an App with a custom shell runner
    pub fn with_shell(config: SessionConfig, shell: R, clipboard: Box<dyn Clipboard>) -> Self {
        tracing::info!(shell = %config.shell, seed = config.seed, "Starting gbloxs");
        Self {
            runtime: SessionRuntime::new(Controller::new(config), shell, clipboard),
            spinner: Spinner::default(),
        }
    }

    /// Current session snapshot
    pub fn state(&self) -> &SessionState {
        self.runtime.state()
    }

    /// Is the app still running?
    pub fn is_running(&self) -> bool {
        self.runtime.is_running()
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let size = terminal.size()?;
        self.handle_resize(size.width, size.height);

        // Async event stream for non-blocking terminal events
        let mut event_stream = EventStream::new();
        let mut frames = tokio::time::interval(FRAME_INTERVAL);

        // Render initial frame immediately so user sees UI
        self.render(terminal)?;

        while self.is_running() {
            tokio::select! {
                biased;

                // Terminal events - highest priority
                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_terminal_event(event),
                    Some(Err(e)) => tracing::warn!("Terminal event error: {}", e),
                    None => {
                        tracing::info!("Terminal event stream closed");
                        break;
                    }
                },

                // Timer ticks and command completions
                Some(event) = self.runtime.next_event() => {
                    self.runtime.dispatch(event);
                }

                // Animation frame
                _ = frames.tick() => self.spinner.advance(),
            }

            self.render(terminal)?;
        }

        Ok(())
    }

    /// Handle one crossterm event
    pub fn handle_terminal_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if let Some(key) = keys::translate(key) {
                    self.handle_key(key);
                }
            }
            Event::Resize(width, height) => self.handle_resize(width, height),
            _ => {}
        }
    }

    /// Dispatch a key to the session
    pub fn handle_key(&mut self, key: Key) {
        tracing::trace!(key = %key.name(), "Key pressed");
        self.runtime.dispatch(SessionEvent::Key(key));
    }

    /// Dispatch engine events that are already waiting
    pub fn pump(&mut self) -> usize {
        self.runtime.pump()
    }

    /// Handle terminal resize
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        self.runtime.dispatch(SessionEvent::Resize { width, height });
    }

    fn render(&self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> anyhow::Result<()> {
        terminal.draw(|frame| ui::draw(frame, self.runtime.state(), &self.spinner))?;
        Ok(())
    }
}
