//! Session Controller
//!
//! The single entry point for everything that happens to a session:
//! `reduce(state, event) -> Transition { state, effects }`.
//!
//! # Design Philosophy
//!
//! The reducer is synchronous, deterministic and never blocks. It takes
//! the current snapshot by value and returns the next one together with
//! the side effects that should follow (timers, shell commands, clipboard
//! writes). The runtime executes effects and feeds their results back as
//! ordinary events, so the whole state machine can be tested without a
//! terminal, a clock or a shell.

use std::time::Duration;

use crate::block::{Block, BlockId, BlockType, META_COPIED};
use crate::config::SessionConfig;
use crate::events::{ClipboardResult, Key, SessionEvent};
use crate::execution::{self, CommandOutcome, ExecutionState};
use crate::input::InputField;
use crate::overlay::TableOverlay;
use crate::progress::{ProgressScheduler, ProgressTick, TickOutcome};
use crate::seed;
use crate::session::Session;

/// Notice appended after a successful copy
pub const COPIED_NOTICE: &str = "Content copied to clipboard!";

/// Side effects requested by the controller
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Deliver `tick` back as an event after `after`
    ScheduleTick {
        /// Tick to deliver
        tick: ProgressTick,
        /// Delay before delivery
        after: Duration,
    },
    /// Run `command` in the host shell for `block_id`
    RunCommand {
        /// Block that receives the outcome
        block_id: BlockId,
        /// Command line passed to `<shell> -c`
        command: String,
    },
    /// Write `text` to the clipboard on behalf of `block_id`
    CopyToClipboard {
        /// Block the text came from
        block_id: BlockId,
        /// Text to copy
        text: String,
    },
    /// End the session
    Quit,
}

/// Complete session snapshot
#[derive(Clone, Debug)]
pub struct SessionState {
    /// Blocks and selection
    pub session: Session,
    /// Text field used in input mode
    pub input: InputField,
    /// Whether keys go to the input field
    pub input_mode: bool,
    /// Whether the help overlay is shown
    pub show_help: bool,
    /// Whether the table overlay is shown
    pub show_table: bool,
    /// Table overlay model
    pub table: TableOverlay,
    /// Cleared by quit
    pub running: bool,
}

impl SessionState {
    /// Empty state for `config`
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            session: Session::with_viewport_height(config.viewport_height),
            input: InputField::new(config.input_limit),
            input_mode: false,
            show_help: false,
            show_table: false,
            table: TableOverlay::default(),
            running: true,
        }
    }

    /// Allocation-free stand-in, held only while a real state is being reduced
    pub(crate) fn vacant() -> Self {
        Self {
            session: Session::default(),
            input: InputField::new(0),
            input_mode: false,
            show_help: false,
            show_table: false,
            table: TableOverlay::empty(),
            running: true,
        }
    }
}

/// Result of reducing one event
#[derive(Debug)]
pub struct Transition {
    /// Next snapshot
    pub state: SessionState,
    /// Effects to execute, in order
    pub effects: Vec<Effect>,
}

/// The event reducer
#[derive(Clone, Debug)]
pub struct Controller {
    config: SessionConfig,
    scheduler: ProgressScheduler,
}

impl Controller {
    /// Create a controller
    pub fn new(config: SessionConfig) -> Self {
        let scheduler = ProgressScheduler::new(config.tick_interval, config.progress_step);
        Self { config, scheduler }
    }

    /// Configuration in use
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Initial snapshot, seeded when configured, with tick chains started
    /// for every loading Progress block
    pub fn init(&self) -> Transition {
        let mut state = SessionState::new(&self.config);
        if self.config.seed {
            seed::seed(&mut state.session);
        }

        let effects = state
            .session
            .blocks()
            .iter()
            .filter(|b| b.block_type == BlockType::Progress && b.is_loading)
            .map(|b| self.schedule(self.scheduler.first_tick(b)))
            .collect();

        Transition { state, effects }
    }

    /// Reduce one event
    pub fn reduce(&self, state: SessionState, event: SessionEvent) -> Transition {
        tracing::trace!(event = event.kind(), "Reducing event");
        let mut state = state;
        let mut effects = Vec::new();

        match event {
            SessionEvent::Key(key) => {
                if state.input_mode {
                    self.handle_input_key(&mut state, key, &mut effects);
                } else {
                    self.handle_key(&mut state, key, &mut effects);
                }
            }
            SessionEvent::Resize { width, height } => {
                state.session.resize(width, height);
            }
            SessionEvent::Tick(tick) => match self.scheduler.handle(&mut state.session, tick) {
                TickOutcome::Advanced { next } => effects.push(self.schedule(next)),
                TickOutcome::Completed => {
                    tracing::debug!(block = %tick.block_id, "Progress complete");
                }
                TickOutcome::Discarded(reason) => {
                    tracing::trace!(block = %tick.block_id, ?reason, "Discarded progress tick");
                }
            },
            SessionEvent::CommandCompleted { block_id, outcome } => {
                Self::handle_completion(&mut state, block_id, outcome);
            }
            SessionEvent::ClipboardWritten { block_id, result } => {
                Self::handle_clipboard(&mut state, block_id, result);
            }
        }

        debug_assert!(state.session.is_consistent());
        Transition { state, effects }
    }

    fn schedule(&self, tick: ProgressTick) -> Effect {
        Effect::ScheduleTick {
            tick,
            after: self.scheduler.interval(),
        }
    }

    /// Keys while the input field has focus
    fn handle_input_key(&self, state: &mut SessionState, key: Key, effects: &mut Vec<Effect>) {
        match key {
            Key::Esc => {
                state.input.clear();
                state.input_mode = false;
            }
            Key::Enter => {
                let input = state.input.take();
                if !input.is_empty() {
                    self.submit(state, input, effects);
                }
                state.input_mode = false;
            }
            other => state.input.handle_key(other),
        }
    }

    /// Keys in navigation mode
    fn handle_key(&self, state: &mut SessionState, key: Key, effects: &mut Vec<Effect>) {
        let key = match key {
            Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
            other => other,
        };

        match key {
            Key::Char('q') | Key::Ctrl('c') => {
                tracing::info!("Quit requested");
                state.running = false;
                effects.push(Effect::Quit);
            }
            Key::Char('i') => {
                state.input_mode = !state.input_mode;
            }
            Key::Char('j') | Key::Down => {
                state.session.move_selection(1);
                if state.show_table {
                    state.table.move_cursor(1);
                }
            }
            Key::Char('k') | Key::Up => {
                state.session.move_selection(-1);
                if state.show_table {
                    state.table.move_cursor(-1);
                }
            }
            Key::Char('e') | Key::Char(' ') | Key::Enter => {
                if let Some(index) = state.session.selected_index() {
                    state.session.toggle_expand(index);
                }
            }
            Key::Char('c') => {
                if let Some(block) = state.session.selected() {
                    if let Some(text) = block.copy_text() {
                        effects.push(Effect::CopyToClipboard {
                            block_id: block.id,
                            text: text.to_string(),
                        });
                    }
                }
            }
            Key::Char('r') => {
                if let Some(block) = state.session.selected_mut() {
                    if let Some(tick) = self.scheduler.restart(block) {
                        effects.push(self.schedule(tick));
                    }
                }
            }
            Key::Char('d') => {
                if let Some(index) = state.session.selected_index() {
                    if let Some(removed) = state.session.remove(index) {
                        tracing::debug!(block = %removed.id, "Deleted block");
                    }
                }
            }
            Key::Char('x') => {
                if let Some(block) = state.session.selected_mut() {
                    if !block.command.is_empty() && ExecutionState::of(block).can_start() {
                        execution::begin(block);
                        effects.push(Effect::RunCommand {
                            block_id: block.id,
                            command: block.command.clone(),
                        });
                    }
                }
            }
            Key::Char('h') => state.show_help = !state.show_help,
            Key::Char('t') => state.show_table = !state.show_table,
            Key::Ctrl('l') => state.session.clear(),
            Key::PageDown | Key::PageUp => {
                if let Some(index) = state.session.selected_index() {
                    let page = state.session.viewport_size().1.max(1) as isize;
                    let delta = if key == Key::PageDown { page } else { -page };
                    state.session.scroll(index, delta);
                }
            }
            _ => {}
        }
    }

    /// Turn submitted input into a block
    fn submit(&self, state: &mut SessionState, input: String, effects: &mut Vec<Effect>) {
        let id = state.session.allocate_id();
        let mut block = Block::new(id, BlockType::Command, "User Input")
            .with_content(input.clone())
            .with_command(input.clone());

        match execution::command_from_input(&input) {
            Some(command) => {
                block.command = command.to_string();
                execution::begin(&mut block);
                effects.push(Effect::RunCommand {
                    block_id: id,
                    command: command.to_string(),
                });
            }
            None => execution::apply_demo_reply(&mut block, &input),
        }

        state.session.append(block);
    }

    fn handle_completion(state: &mut SessionState, block_id: BlockId, outcome: CommandOutcome) {
        match state.session.find_mut(block_id) {
            Some(block) if block.is_executing() => {
                tracing::debug!(block = %block_id, success = outcome.is_success(), "Command completed");
                execution::complete(block, outcome);
            }
            _ => {
                tracing::debug!(block = %block_id, "Discarded completion for missing or idle block");
            }
        }
    }

    fn handle_clipboard(state: &mut SessionState, block_id: BlockId, result: ClipboardResult) {
        match result {
            ClipboardResult::Copied => {
                if let Some(index) = state.session.index_of(block_id) {
                    state.session.set_metadata(index, META_COPIED, "true");
                }
                let id = state.session.allocate_id();
                state
                    .session
                    .append(Block::new(id, BlockType::Info, "Info").with_content(COPIED_NOTICE));
            }
            ClipboardResult::Failed(reason) => {
                tracing::warn!(block = %block_id, "Clipboard write failed: {}", reason);
                let id = state.session.allocate_id();
                state.session.append(
                    Block::new(id, BlockType::Error, "Clipboard")
                        .with_content("Clipboard unavailable")
                        .with_error(reason),
                );
            }
        }
    }
}
