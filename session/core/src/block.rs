//! Block Types
//!
//! A block is one displayable unit of the session: a command invocation,
//! captured output, a table, a progress indicator, or a notice.
//!
//! # Design Philosophy
//!
//! Blocks are plain data. The session store owns them and keeps the
//! selection flag consistent; the execution lifecycle and the progress
//! scheduler mutate the fields they own. Renderers only read.

use std::collections::HashMap;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Block identifier
///
/// Allocated from a per-session counter and never reused, so a stale
/// tick or completion can always be matched against the live sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u64);

impl BlockId {
    /// Get the numeric value
    #[must_use]
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "blk-{}", self.0)
    }
}

/// Kind of block
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    /// A command invocation (possibly not yet executed)
    Command,
    /// Captured output
    Output,
    /// Tabular data, first row is the header
    Table,
    /// Animated progress indicator
    Progress,
    /// Informational notice
    Info,
    /// Failure, carries `error`
    Error,
    /// Successful result
    Success,
}

impl BlockType {
    /// Human-readable label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Command => "Command",
            Self::Output => "Output",
            Self::Table => "Table",
            Self::Progress => "Progress",
            Self::Info => "Info",
            Self::Error => "Error",
            Self::Success => "Success",
        }
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Metadata key set while a command runs in the block
pub const META_EXECUTING: &str = "executing";

/// Metadata key set once the block's text reached the clipboard
pub const META_COPIED: &str = "copied";

/// Scroll window over a block's body text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    /// First visible line
    pub offset: usize,
    /// Visible width in cells
    pub width: u16,
    /// Visible height in lines
    pub height: u16,
    /// Total lines of the content the viewport was built from
    pub content_lines: usize,
}

impl Viewport {
    /// Build a viewport over `content`, scrolled to the top
    #[must_use]
    pub fn new(content: &str, width: u16, height: u16) -> Self {
        Self {
            offset: 0,
            width,
            height,
            content_lines: count_lines(content),
        }
    }

    /// Largest valid offset
    #[must_use]
    pub fn max_offset(&self) -> usize {
        self.content_lines.saturating_sub(self.height as usize)
    }

    /// Scroll by `delta` lines, clamped to the content
    pub fn scroll(&mut self, delta: isize) {
        let target = if delta.is_negative() {
            self.offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.offset.saturating_add(delta as usize)
        };
        self.offset = target.min(self.max_offset());
    }

    /// Change the visible size, keeping the offset valid
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Whether there is content below the visible window
    #[must_use]
    pub fn has_more_below(&self) -> bool {
        self.offset < self.max_offset()
    }
}

fn count_lines(content: &str) -> usize {
    if content.is_empty() {
        0
    } else {
        content.lines().count()
    }
}

/// A single displayable unit of the session
#[derive(Clone, Debug)]
pub struct Block {
    /// Unique, stable identifier
    pub id: BlockId,
    /// Kind of block
    pub block_type: BlockType,
    /// Title line
    pub title: String,
    /// Free-form body text
    pub content: String,
    /// Shell command associated with the block
    pub command: String,
    /// Captured command output
    pub output: String,
    /// Failure message
    pub error: String,
    /// Whether the body is rendered
    pub expanded: bool,
    /// Mirrors the session's selection index; maintained by the store
    pub selected: bool,
    /// Completion fraction in [0.0, 1.0]
    pub progress: f64,
    /// True while animating or executing
    pub is_loading: bool,
    /// Transient annotations
    pub metadata: HashMap<String, String>,
    /// Rows of cells, header first
    pub table_data: Vec<Vec<String>>,
    /// Creation time
    timestamp: DateTime<Local>,
    /// Scroll window over the body
    pub viewport: Viewport,
}

impl Block {
    /// Create an expanded, unselected block of the given type
    pub fn new(id: BlockId, block_type: BlockType, title: impl Into<String>) -> Self {
        Self {
            id,
            block_type,
            title: title.into(),
            content: String::new(),
            command: String::new(),
            output: String::new(),
            error: String::new(),
            expanded: true,
            selected: false,
            progress: 0.0,
            is_loading: false,
            metadata: HashMap::new(),
            table_data: Vec::new(),
            timestamp: Local::now(),
            viewport: Viewport::default(),
        }
    }

    /// Set the body text
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Set the stored command
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Set the captured output
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    /// Set the failure message
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = error.into();
        self
    }

    /// Set table rows (header first)
    pub fn with_table(mut self, rows: Vec<Vec<String>>) -> Self {
        self.table_data = rows;
        self
    }

    /// Start as an animating progress block at `progress`
    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = progress.clamp(0.0, 1.0);
        self.is_loading = true;
        self
    }

    /// Creation time
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Text the viewport scrolls over
    ///
    /// Output when present, otherwise the body text.
    #[must_use]
    pub fn body(&self) -> &str {
        if self.output.is_empty() {
            &self.content
        } else {
            &self.output
        }
    }

    /// Text the copy action sends to the clipboard
    ///
    /// Output, falling back to content, then command.
    #[must_use]
    pub fn copy_text(&self) -> Option<&str> {
        [&self.output, &self.content, &self.command]
            .into_iter()
            .find(|s| !s.is_empty())
            .map(String::as_str)
    }

    /// Whether a shell command is currently running in this block
    #[must_use]
    pub fn is_executing(&self) -> bool {
        self.metadata.contains_key(META_EXECUTING)
    }

    /// Rebuild the viewport from the current body, keeping its size
    pub fn rebuild_viewport(&mut self) {
        let (width, height) = (self.viewport.width, self.viewport.height);
        self.viewport = Viewport::new(self.body(), width, height);
    }

    /// Rebuild the viewport from the current body with a new size
    pub fn rebuild_viewport_sized(&mut self, width: u16, height: u16) {
        self.viewport = Viewport::new(self.body(), width, height);
    }
}
