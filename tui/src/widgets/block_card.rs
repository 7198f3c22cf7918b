//! BlockCard Widget
//!
//! One session block drawn as a bordered card: title, timestamp, a body
//! that depends on the block type, and metadata tags.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block as Frame, BorderType, Borders, Paragraph, Widget};
use unicode_width::UnicodeWidthStr;

use session_core::{Block, BlockType, TableOverlay};

use crate::theme;
use crate::widgets::text_block::{self, INDENT};

/// Width of the progress bar, in cells
const GAUGE_WIDTH: usize = 40;

/// A bordered block card
pub struct BlockCard<'a> {
    block: &'a Block,
    spinner: &'a str,
    fallback_table: &'a TableOverlay,
}

impl<'a> BlockCard<'a> {
    /// Card for `block`; `fallback_table` renders table blocks
    pub fn new(block: &'a Block, spinner: &'a str, fallback_table: &'a TableOverlay) -> Self {
        Self {
            block,
            spinner,
            fallback_table,
        }
    }

    /// Rows needed to draw the card, borders included
    pub fn height(&self) -> u16 {
        (self.lines().len() + 2).min(u16::MAX as usize) as u16
    }

    /// Card contents without borders
    pub fn lines(&self) -> Vec<Line<'static>> {
        let block = self.block;
        let mut lines = vec![self.title_line()];
        if !block.expanded {
            return lines;
        }

        lines.push(Line::styled(
            format!("{INDENT}{}", block.timestamp().format("%H:%M:%S")),
            theme::dim(),
        ));
        lines.push(Line::default());

        if !block.command.is_empty() {
            lines.push(Line::styled(
                format!("{INDENT}$ {}", block.command),
                Style::default().fg(theme::COMMAND_YELLOW),
            ));
        }
        if block.is_executing() {
            lines.push(Line::styled(
                format!("{INDENT}{} running...", self.spinner),
                Style::default().fg(theme::COMMAND_YELLOW),
            ));
        }

        match block.block_type {
            BlockType::Progress => lines.extend(self.progress_lines()),
            BlockType::Table => {
                if block.table_data.is_empty() {
                    let mut rows = vec![self
                        .fallback_table
                        .columns
                        .iter()
                        .map(|c| c.title.clone())
                        .collect::<Vec<_>>()];
                    rows.extend(self.fallback_table.rows.iter().cloned());
                    lines.extend(table_lines(&rows));
                } else {
                    lines.extend(table_lines(&block.table_data));
                }
            }
            BlockType::Error => {
                if !block.error.is_empty() {
                    lines.push(Line::styled(
                        format!("{INDENT}✗ {}", block.error),
                        Style::default().fg(theme::ERROR_RED),
                    ));
                }
                lines.extend(self.body_lines());
            }
            _ => lines.extend(self.body_lines()),
        }

        if !block.metadata.is_empty() {
            let mut tags: Vec<_> = block.metadata.iter().collect();
            tags.sort();
            let text: String = tags
                .into_iter()
                .map(|(k, v)| format!("{INDENT}[{k}: {v}]"))
                .collect();
            lines.push(Line::styled(text, theme::dim()));
        }

        lines
    }

    fn title_line(&self) -> Line<'static> {
        let block = self.block;
        let icon = if block.expanded { "▼" } else { "▶" };
        let mut title = format!("{icon} {}", block.title);
        if block.selected {
            title = format!("● {title}");
        }
        let mut spans = vec![Span::styled(title, theme::title_style())];
        spans.push(Span::styled(
            format!("  {}", block.block_type.label()),
            theme::dim(),
        ));
        Line::from(spans)
    }

    fn body_lines(&self) -> Vec<Line<'static>> {
        let block = self.block;
        let mut lines = text_block::viewport_lines(block.body(), &block.viewport);
        if let Some(hint) = text_block::scroll_hint(&block.viewport) {
            lines.push(hint);
        }
        lines
    }

    fn progress_lines(&self) -> Vec<Line<'static>> {
        let block = self.block;
        let filled = ((block.progress * GAUGE_WIDTH as f64).round() as usize).min(GAUGE_WIDTH);
        let mut bar = vec![
            Span::raw(INDENT),
            Span::styled("█".repeat(filled), Style::default().fg(theme::TITLE_PINK)),
            Span::styled("░".repeat(GAUGE_WIDTH - filled), theme::dim()),
        ];
        if block.is_loading {
            bar.push(Span::raw(format!(" {}", self.spinner)));
        }
        vec![
            Line::from(bar),
            Line::raw(format!("{INDENT}{:.0}% complete", block.progress * 100.0)),
        ]
    }
}

/// Rows of cells laid out in padded columns, header first
fn table_lines(rows: &[Vec<String>]) -> Vec<Line<'static>> {
    let Some(header) = rows.first() else {
        return Vec::new();
    };

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.width())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render_row = |row: &Vec<String>, style: Style| -> Line<'static> {
        let mut spans = vec![Span::raw(INDENT)];
        for (col, width) in widths.iter().enumerate() {
            if col > 0 {
                spans.push(Span::styled(" │ ", theme::dim()));
            }
            let cell = row.get(col).map(String::as_str).unwrap_or("");
            let pad = width.saturating_sub(cell.width());
            spans.push(Span::styled(format!("{cell}{}", " ".repeat(pad)), style));
        }
        Line::from(spans)
    };

    let header_style = Style::default()
        .fg(theme::TITLE_PINK)
        .add_modifier(Modifier::BOLD);
    let total: usize = widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1);

    let mut lines = vec![
        render_row(header, header_style),
        Line::styled(format!("{INDENT}{}", "─".repeat(total)), theme::dim()),
    ];
    lines.extend(
        rows.iter()
            .skip(1)
            .map(|row| render_row(row, Style::default().fg(theme::TEXT))),
    );
    lines
}

impl Widget for BlockCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.block.selected {
            BorderType::Double
        } else {
            BorderType::Rounded
        };
        let frame = Frame::default()
            .borders(Borders::ALL)
            .border_type(border)
            .border_style(Style::default().fg(theme::border_color(
                self.block.block_type,
                self.block.selected,
            )));
        Paragraph::new(self.lines()).block(frame).render(area, buf);
    }
}
