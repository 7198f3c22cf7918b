//! Session Runtime
//!
//! Owns the current [`SessionState`] and executes the [`Effect`]s the
//! controller asks for. Timers and shell commands run on tokio tasks and
//! report back through a channel; surfaces pull those events with
//! [`SessionRuntime::next_event`] or [`SessionRuntime::recv_all`] and hand
//! them to [`SessionRuntime::dispatch`] together with their own input.
//!
//! ```text
//! Surface ──Key/Resize──▶ dispatch ──▶ Controller::reduce ──▶ effects
//!    ▲                                                          │
//!    └──────── next_event ◀── mpsc ◀── tick / command tasks ◀───┘
//! ```
//!
//! The clipboard is written synchronously; its result is reduced within
//! the same `dispatch` call, after the transition that requested it.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::controller::{Controller, Effect, SessionState};
use crate::error::ClipboardError;
use crate::events::{ClipboardResult, SessionEvent};
use crate::execution::ShellRunner;

/// Capacity of the channel carrying task results back to the runtime
const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Write access to a clipboard
pub trait Clipboard {
    /// Replace the clipboard contents with `text`
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Drives a session: state, effects and asynchronous results
pub struct SessionRuntime<R: ShellRunner + 'static> {
    controller: Controller,
    state: SessionState,
    shell: Arc<R>,
    clipboard: Box<dyn Clipboard>,
    tx: mpsc::Sender<SessionEvent>,
    rx: mpsc::Receiver<SessionEvent>,
}

impl<R: ShellRunner + 'static> SessionRuntime<R> {
    /// Create the runtime and start the initial effects
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(controller: Controller, shell: R, clipboard: Box<dyn Clipboard>) -> Self {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let init = controller.init();

        let mut runtime = Self {
            controller,
            state: init.state,
            shell: Arc::new(shell),
            clipboard,
            tx,
            rx,
        };
        tracing::info!(
            blocks = runtime.state.session.len(),
            "Session started"
        );
        runtime.execute(init.effects);
        runtime
    }

    /// Current snapshot
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Whether the session is still running
    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Reduce an event and execute the resulting effects
    pub fn dispatch(&mut self, event: SessionEvent) {
        let mut pending = VecDeque::from([event]);

        while let Some(event) = pending.pop_front() {
            let state = std::mem::replace(&mut self.state, SessionState::vacant());
            let transition = self.controller.reduce(state, event);
            self.state = transition.state;

            for effect in transition.effects {
                if let Some(follow_up) = self.run_effect(effect) {
                    pending.push_back(follow_up);
                }
            }
        }
    }

    /// Wait for the next event produced by a background task
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.rx.recv().await
    }

    /// Try to receive an event from a background task (non-blocking)
    pub fn try_recv(&mut self) -> Option<SessionEvent> {
        self.rx.try_recv().ok()
    }

    /// Receive all pending events from background tasks (non-blocking)
    pub fn recv_all(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Dispatch every event already waiting; returns how many were handled
    pub fn pump(&mut self) -> usize {
        let events = self.recv_all();
        let count = events.len();
        for event in events {
            self.dispatch(event);
        }
        count
    }

    fn execute(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            if let Some(event) = self.run_effect(effect) {
                self.dispatch(event);
            }
        }
    }

    /// Start one effect; returns an event to reduce immediately, if any
    fn run_effect(&mut self, effect: Effect) -> Option<SessionEvent> {
        match effect {
            Effect::ScheduleTick { tick, after } => {
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    // Receiver gone means the session ended
                    let _ = tx.send(SessionEvent::Tick(tick)).await;
                });
                None
            }
            Effect::RunCommand { block_id, command } => {
                let tx = self.tx.clone();
                let shell = Arc::clone(&self.shell);
                tokio::spawn(async move {
                    let outcome = shell.run(&command).await;
                    let _ = tx
                        .send(SessionEvent::CommandCompleted { block_id, outcome })
                        .await;
                });
                None
            }
            Effect::CopyToClipboard { block_id, text } => {
                let result = match self.clipboard.copy(&text) {
                    Ok(()) => ClipboardResult::Copied,
                    Err(e) => ClipboardResult::Failed(e.to_string()),
                };
                Some(SessionEvent::ClipboardWritten { block_id, result })
            }
            Effect::Quit => {
                tracing::info!("Session ending");
                None
            }
        }
    }
}
