//! Session Core - Headless Block Session Engine for gbloxs
//!
//! This crate holds everything a gbloxs session does, independent of any
//! terminal library. A surface turns its native input into [`SessionEvent`]s,
//! hands them to the [`SessionRuntime`] and renders the resulting
//! [`SessionState`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Surfaces                               │
//! │   ┌───────────────────┐          ┌────────────────────────┐   │
//! │   │   TUI (ratatui)   │          │  Headless / tests      │   │
//! │   └─────────┬─────────┘          └───────────┬────────────┘   │
//! │             └────────── SessionEvent ────────┘                │
//! └─────────────────────────────┬────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────┼────────────────────────────────┐
//! │                       SESSION CORE                            │
//! │  ┌──────────────────────────┴──────────────────────────────┐  │
//! │  │                    SessionRuntime                        │  │
//! │  │  ┌────────────┐  ┌───────────┐  ┌──────────┐  ┌───────┐  │  │
//! │  │  │ Controller │  │  Session  │  │ Progress │  │ Shell │  │  │
//! │  │  │  (reduce)  │  │  (store)  │  │  ticks   │  │ runner│  │  │
//! │  │  └────────────┘  └───────────┘  └──────────┘  └───────┘  │  │
//! │  └─────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Block`]: A titled, typed unit of content
//! - [`Session`]: Ordered blocks with exactly one selected
//! - [`Controller`]: Pure reducer from `(state, event)` to `(state, effects)`
//! - [`SessionRuntime`]: Executes effects on tokio tasks
//! - [`ShellRunner`]: Seam for running shell commands
//!
//! # Quick Start
//!
//! ```ignore
//! use session_core::{Controller, HostShell, SessionConfig, SessionEvent, SessionRuntime, Key};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = SessionConfig::from_env();
//!     let shell = HostShell::new(config.shell.clone());
//!     let mut runtime = SessionRuntime::new(Controller::new(config), shell, clipboard);
//!
//!     runtime.dispatch(SessionEvent::Key(Key::Char('j')));
//!     while let Some(event) = runtime.next_event().await {
//!         runtime.dispatch(event);
//!     }
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`block`]: Block model and scroll viewport
//! - [`config`]: Environment-driven configuration
//! - [`controller`]: Keystroke protocol and event reducer
//! - [`error`]: Execution and clipboard errors
//! - [`events`]: Keys and session events
//! - [`execution`]: Shell command lifecycle
//! - [`highlight`]: Output line classification
//! - [`input`]: Single-line input field
//! - [`overlay`]: Table overlay model
//! - [`progress`]: Self-rescheduling progress ticks
//! - [`runtime`]: Effect execution
//! - [`seed`]: Demo blocks for a fresh session
//! - [`session`]: Block store and selection
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod block;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod execution;
pub mod highlight;
pub mod input;
pub mod overlay;
pub mod progress;
pub mod runtime;
pub mod seed;
pub mod session;

// Re-exports for convenience
pub use block::{Block, BlockId, BlockType, Viewport, META_COPIED, META_EXECUTING};
pub use config::SessionConfig;
pub use controller::{Controller, Effect, SessionState, Transition};
pub use error::{ClipboardError, ExecutionError};
pub use events::{ClipboardResult, Key, SessionEvent};
pub use execution::{CommandOutcome, CommandStatus, ExecutionState, HostShell, ShellRunner};
pub use highlight::{highlight, highlight_line, Emphasis, HighlightedLine, LineTag, Token, TokenKind};
pub use input::InputField;
pub use overlay::TableOverlay;
pub use progress::{ProgressScheduler, ProgressTick, TickOutcome};
pub use runtime::{Clipboard, SessionRuntime};
pub use session::Session;
