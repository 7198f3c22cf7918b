//! Screen Rendering
//!
//! Draws a [`SessionState`] top to bottom: header, table overlay, block
//! list, input box and footer. The help overlay floats above the block list.

use ratatui::layout::{Alignment, Constraint, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Row, Table};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use session_core::input::INPUT_PLACEHOLDER;
use session_core::{Session, SessionState, TableOverlay};

use crate::theme;
use crate::widgets::{BlockCard, Spinner};

/// Header text
pub const HEADER: &str = "╔═══ Gbloxs - Interactive Terminal Blocks ═══╗";

/// Shortcut summary shown in the footer
pub const SHORTCUTS: &str = "i: input | h: help | j/k: navigate | e: expand | c: copy | r: refresh | d: delete | x: execute | t: table | q: quit";

const INPUT_TITLE: &str = "Input Mode (ESC to cancel, Enter to submit, /cmd or !cmd to execute):";

/// Help overlay sections
const HELP: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("j / ↓", "Navigate down to next block"),
            ("k / ↑", "Navigate up to previous block"),
            ("PgUp / PgDn", "Scroll the selected block"),
        ],
    ),
    (
        "Block Actions",
        &[
            ("e / Space / Enter", "Expand/collapse selected block"),
            ("c", "Copy block content to clipboard"),
            ("r", "Restart progress block"),
            ("d", "Delete selected block"),
            ("x", "Execute command in selected block"),
        ],
    ),
    (
        "Modes",
        &[
            ("i", "Toggle input mode"),
            ("h", "Toggle help (this screen)"),
            ("t", "Toggle table view"),
        ],
    ),
    (
        "Input Mode",
        &[
            ("/cmd", "Execute shell command (e.g., /ls -la)"),
            ("!cmd", "Execute shell command (alternative)"),
            ("Esc", "Cancel input"),
            ("Enter", "Submit input"),
        ],
    ),
    (
        "General",
        &[
            ("q / Ctrl+C", "Quit application"),
            ("Ctrl+L", "Clear all blocks"),
        ],
    ),
];

/// Draw the whole screen
pub fn draw(frame: &mut Frame, state: &SessionState, spinner: &Spinner) {
    let area = frame.area();
    let footer = footer_lines(area.width);

    let table_height = if state.show_table {
        state.table.rows.len() as u16 + 3
    } else {
        0
    };
    let input_height = if state.input_mode { 4 } else { 0 };

    let [header_area, table_area, blocks_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(table_height),
        Constraint::Min(0),
        Constraint::Length(input_height),
        Constraint::Length(footer.len() as u16),
    ])
    .areas(area);

    draw_header(frame, header_area);
    if state.show_table {
        draw_table(frame, table_area, &state.table);
    }
    draw_blocks(frame, blocks_area, state, spinner);
    if state.input_mode {
        draw_input(frame, input_area, state);
    }
    frame.render_widget(
        Paragraph::new(footer).alignment(Alignment::Center),
        footer_area,
    );
    if state.show_help {
        draw_help(frame, blocks_area);
    }
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(Span::styled(HEADER, theme::title_style()))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme::FRAME_PURPLE)),
        );
    frame.render_widget(header, area);
}

fn draw_table(frame: &mut Frame, area: Rect, table: &TableOverlay) {
    let header = Row::new(table.columns.iter().map(|c| c.title.clone())).style(
        Style::default()
            .fg(theme::TITLE_PINK)
            .add_modifier(Modifier::BOLD),
    );
    let rows = table.rows.iter().enumerate().map(|(i, row)| {
        let style = if i == table.cursor() {
            Style::default()
                .fg(theme::TEXT)
                .bg(theme::FRAME_PURPLE)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme::TEXT)
        };
        Row::new(row.iter().cloned()).style(style)
    });
    let widths = table.columns.iter().map(|c| Constraint::Length(c.width));

    let widget = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::OUTPUT_GREEN)),
    );
    frame.render_widget(widget, area);
}

/// Index of the first card to draw so the selected card is on screen
fn first_visible(heights: &[u16], selected: usize, available: u16) -> usize {
    let mut first = 0;
    let mut used: u32 = heights[..=selected].iter().map(|h| u32::from(*h)).sum();
    while used > u32::from(available) && first < selected {
        used -= u32::from(heights[first]);
        first += 1;
    }
    first
}

fn draw_blocks(frame: &mut Frame, area: Rect, state: &SessionState, spinner: &Spinner) {
    let session: &Session = &state.session;
    if session.is_empty() || area.height == 0 {
        frame.render_widget(
            Paragraph::new(Line::styled(
                "No blocks. Press i to add one.",
                theme::dim(),
            ))
            .alignment(Alignment::Center),
            area,
        );
        return;
    }

    let cards: Vec<BlockCard> = session
        .blocks()
        .iter()
        .map(|b| BlockCard::new(b, spinner.glyph(), &state.table))
        .collect();
    let heights: Vec<u16> = cards.iter().map(BlockCard::height).collect();
    let selected = session.selected_index().unwrap_or(0);
    let first = first_visible(&heights, selected, area.height);

    let mut y = area.y;
    let bottom = area.y + area.height;
    for (card, height) in cards.into_iter().zip(heights).skip(first) {
        if y >= bottom {
            break;
        }
        let height = height.min(bottom - y);
        frame.render_widget(card, Rect::new(area.x, y, area.width, height));
        y += height;
    }
}

fn draw_input(frame: &mut Frame, area: Rect, state: &SessionState) {
    let value = state.input.value();
    let text = if value.is_empty() {
        Span::styled(INPUT_PLACEHOLDER, theme::dim())
    } else {
        Span::styled(value.clone(), Style::default().fg(theme::TEXT))
    };
    let lines = vec![
        Line::styled(INPUT_TITLE, theme::title_style()),
        Line::from(vec![Span::raw("> "), text]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::COMMAND_YELLOW));
    frame.render_widget(Paragraph::new(lines).block(block), area);

    let before: String = value.chars().take(state.input.cursor()).collect();
    let x = area.x + 1 + 2 + before.width() as u16;
    if area.height >= 3 && x < area.right() {
        frame.set_cursor_position(Position::new(x, area.y + 2));
    }
}

fn footer_lines(width: u16) -> Vec<Line<'static>> {
    let style = theme::dim().add_modifier(Modifier::ITALIC);
    textwrap::wrap(SHORTCUTS, usize::from(width.max(1)))
        .into_iter()
        .map(|line| Line::styled(line.into_owned(), style))
        .collect()
}

fn help_lines() -> Vec<Line<'static>> {
    let mut lines = vec![Line::styled("KEYBOARD SHORTCUTS", theme::title_style())];
    for (section, entries) in HELP {
        lines.push(Line::default());
        lines.push(Line::styled(
            format!("{section}:"),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        for (keys, description) in *entries {
            lines.push(Line::from(vec![
                Span::styled(format!("  {keys:<18}"), Style::default().fg(theme::COMMAND_YELLOW)),
                Span::raw(*description),
            ]));
        }
    }
    lines
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let lines = help_lines();
    let width = area.width.saturating_sub(4).min(64);
    let height = (lines.len() as u16 + 2).min(area.height);
    let popup = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y,
        width,
        height,
    );

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .style(Style::default().bg(theme::OVERLAY_BG))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(theme::SELECT_BLUE)),
            ),
        popup,
    );
}
