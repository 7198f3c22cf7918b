//! Gbloxs TUI - Terminal interface for gbloxs
//!
//! A full-screen block session: every command, result, table and progress
//! indicator is a card you can navigate, expand, copy, re-run or delete.
//!
//! # Architecture
//!
//! - **App**: Event loop feeding terminal input into the session engine
//! - **Keys**: crossterm to engine key translation
//! - **UI**: Stateless rendering of a session snapshot
//! - **Widgets**: Block cards, highlighted text views, spinner
//! - **Clipboard**: arboard-backed clipboard for the copy action

pub mod app;
pub mod clipboard;
pub mod keys;
pub mod theme;
pub mod ui;
pub mod widgets;

pub use app::App;
pub use clipboard::SystemClipboard;
