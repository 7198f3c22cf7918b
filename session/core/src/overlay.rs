//! Table Overlay
//!
//! The process table shown with `t`. While visible, vertical navigation
//! keys also move its row cursor.

/// A table column
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    /// Header text
    pub title: String,
    /// Display width in cells
    pub width: u16,
}

impl Column {
    fn new(title: &str, width: u16) -> Self {
        Self {
            title: title.to_string(),
            width,
        }
    }
}

/// Navigable table shown above the blocks
#[derive(Clone, Debug)]
pub struct TableOverlay {
    /// Column headers and widths
    pub columns: Vec<Column>,
    /// Cell text, one entry per column
    pub rows: Vec<Vec<String>>,
    cursor: usize,
}

impl Default for TableOverlay {
    fn default() -> Self {
        let rows = [
            ["nginx", "Running", "2.5", "15.3"],
            ["postgres", "Running", "1.2", "45.8"],
            ["redis", "Running", "0.8", "12.1"],
            ["node", "Running", "5.1", "28.4"],
        ];
        Self {
            columns: vec![
                Column::new("Name", 15),
                Column::new("Status", 12),
                Column::new("CPU %", 10),
                Column::new("Memory %", 12),
            ],
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
            cursor: 0,
        }
    }
}

impl TableOverlay {
    /// A table with no columns or rows
    pub(crate) fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            cursor: 0,
        }
    }

    /// Highlighted row
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the row cursor, clamped
    pub fn move_cursor(&mut self, delta: isize) {
        let last = self.rows.len().saturating_sub(1);
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }
}
