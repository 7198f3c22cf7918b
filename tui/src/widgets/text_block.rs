//! TextBlock
//!
//! Highlighted, scrollable view over a block's body text.

use ratatui::text::{Line, Span};

use session_core::{highlight, Viewport};

use crate::theme;

/// Left margin of body text inside a card
pub const INDENT: &str = "  ";

/// The visible window of `body`, highlighted
///
/// `viewport.offset` selects the first line; at most `viewport.height`
/// lines are returned. A trailing newline does not produce an empty line.
pub fn viewport_lines(body: &str, viewport: &Viewport) -> Vec<Line<'static>> {
    let body = body.strip_suffix('\n').unwrap_or(body);
    if body.is_empty() {
        return Vec::new();
    }

    highlight(body)
        .into_iter()
        .skip(viewport.offset)
        .take(viewport.height as usize)
        .map(|line| {
            let base = theme::line_style(line.tag, line.emphasis);
            let mut spans = vec![Span::styled(INDENT, base)];
            spans.extend(
                line.tokens
                    .into_iter()
                    .map(|token| Span::styled(token.text, theme::token_style(token.kind, base))),
            );
            Line::from(spans)
        })
        .collect()
}

/// Scroll hint shown under a body that does not fit its viewport
pub fn scroll_hint(viewport: &Viewport) -> Option<Line<'static>> {
    if viewport.content_lines <= viewport.height as usize {
        return None;
    }
    let first = viewport.offset + 1;
    let last = (viewport.offset + viewport.height as usize).min(viewport.content_lines);
    let more = if viewport.has_more_below() {
        "  pgdn for more"
    } else {
        ""
    };
    Some(Line::styled(
        format!("{INDENT}lines {first}-{last} of {}{more}", viewport.content_lines),
        theme::dim(),
    ))
}
