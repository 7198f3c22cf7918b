//! Theme and Colors
//!
//! The gbloxs palette, expressed as xterm-256 indices so it renders the
//! same on every terminal that supports 256 colours.

use ratatui::style::{Color, Modifier, Style};

use session_core::{BlockType, Emphasis, LineTag, TokenKind};

// ============================================================================
// Chrome
// ============================================================================

/// Titles and the header text
pub const TITLE_PINK: Color = Color::Indexed(205);

/// Header border and unselected plain blocks
pub const FRAME_PURPLE: Color = Color::Indexed(62);

/// Selected block border, help overlay, info blocks
pub const SELECT_BLUE: Color = Color::Indexed(39);

/// Command blocks and the input box
pub const COMMAND_YELLOW: Color = Color::Indexed(220);

/// Output and success blocks
pub const OUTPUT_GREEN: Color = Color::Indexed(34);

/// Error blocks
pub const ERROR_RED: Color = Color::Indexed(196);

/// Bright green for success marks and executables
pub const SUCCESS_GREEN: Color = Color::Indexed(46);

/// Body text
pub const TEXT: Color = Color::Indexed(252);

/// Timestamps, metadata, footer
pub const DIM_GRAY: Color = Color::Indexed(240);

/// Help overlay background
pub const OVERLAY_BG: Color = Color::Indexed(235);

// ============================================================================
// Block styles
// ============================================================================

/// Border colour of a block card
pub fn border_color(block_type: BlockType, selected: bool) -> Color {
    if selected {
        return SELECT_BLUE;
    }
    match block_type {
        BlockType::Command => COMMAND_YELLOW,
        BlockType::Output | BlockType::Success => OUTPUT_GREEN,
        BlockType::Error => ERROR_RED,
        BlockType::Info => SELECT_BLUE,
        BlockType::Table | BlockType::Progress => FRAME_PURPLE,
    }
}

/// Title style of a block card
pub fn title_style() -> Style {
    Style::default().fg(TITLE_PINK).add_modifier(Modifier::BOLD)
}

/// Dim secondary text
pub fn dim() -> Style {
    Style::default().fg(DIM_GRAY)
}

// ============================================================================
// Highlighter styles
// ============================================================================

/// Base style of a highlighted output line
pub fn line_style(tag: LineTag, emphasis: Emphasis) -> Style {
    let base = match tag {
        LineTag::Directory => Style::default().fg(SELECT_BLUE),
        LineTag::Executable => Style::default().fg(SUCCESS_GREEN),
        LineTag::File | LineTag::Plain => Style::default().fg(TEXT),
    };
    match emphasis {
        Emphasis::Normal => base,
        Emphasis::Success => base.fg(SUCCESS_GREEN),
        Emphasis::Error => base.fg(ERROR_RED).add_modifier(Modifier::BOLD),
    }
}

/// Style of a token on top of its line style
pub fn token_style(kind: TokenKind, line: Style) -> Style {
    match kind {
        TokenKind::Text => line,
        TokenKind::Path => line
            .fg(COMMAND_YELLOW)
            .add_modifier(Modifier::UNDERLINED),
        TokenKind::Number => line.fg(TITLE_PINK),
    }
}
