//! Block Session Store
//!
//! The ordered collection of blocks plus the selection cursor.
//!
//! # Invariants
//!
//! - When `blocks` is non-empty, `0 <= selected_index < blocks.len()`.
//! - Exactly `blocks[selected_index]` has `selected = true`; every other
//!   block has it false. When empty, `selected_index` is 0.
//! - Block ids are unique for the life of the session (the id counter only
//!   moves forward, even across `clear`).
//! - Every block's progress is within [0.0, 1.0].
//!
//! Operations that take an index expect a valid one; the controller never
//! builds an out-of-range index. Debug builds assert, release builds leave
//! the session unchanged.

use crate::block::{Block, BlockId, BlockType};

/// Viewport width used before the first resize
pub const INITIAL_VIEWPORT_WIDTH: u16 = 50;

/// Columns reserved around a block body (borders and padding)
pub const VIEWPORT_MARGIN: u16 = 10;

/// The root aggregate: blocks and selection
#[derive(Clone, Debug)]
pub struct Session {
    blocks: Vec<Block>,
    selected_index: usize,
    next_id: u64,
    /// Terminal width, 0 until the first resize
    width: u16,
    /// Terminal height, 0 until the first resize
    height: u16,
    viewport_height: u16,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            blocks: Vec::new(),
            selected_index: 0,
            next_id: 1,
            width: 0,
            height: 0,
            viewport_height: crate::config::DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl Session {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty session whose viewports are `viewport_height` lines tall
    pub fn with_viewport_height(viewport_height: u16) -> Self {
        Self {
            viewport_height,
            ..Self::default()
        }
    }

    /// Reserve a fresh block id
    pub fn allocate_id(&mut self) -> BlockId {
        let id = BlockId(self.next_id);
        self.next_id += 1;
        id
    }

    /// All blocks in display order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether there are no blocks
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Selection index, `None` when empty
    pub fn selected_index(&self) -> Option<usize> {
        if self.blocks.is_empty() {
            None
        } else {
            Some(self.selected_index)
        }
    }

    /// The selected block
    pub fn selected(&self) -> Option<&Block> {
        self.blocks.get(self.selected_index)
    }

    /// The selected block, mutably
    pub fn selected_mut(&mut self) -> Option<&mut Block> {
        self.blocks.get_mut(self.selected_index)
    }

    /// Block at `index`
    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Block with `id`
    pub fn find(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Block with `id`, mutably
    pub fn find_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    /// Position of the block with `id`
    pub fn index_of(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    /// Terminal size as last reported (0x0 before the first resize)
    pub fn terminal_size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Size given to block viewports
    pub fn viewport_size(&self) -> (u16, u16) {
        let width = if self.width == 0 {
            INITIAL_VIEWPORT_WIDTH
        } else {
            self.width.saturating_sub(VIEWPORT_MARGIN)
        };
        (width, self.viewport_height)
    }

    /// Insert at the end and select it
    pub fn append(&mut self, mut block: Block) {
        let (width, height) = self.viewport_size();
        block.progress = block.progress.clamp(0.0, 1.0);
        block.rebuild_viewport_sized(width, height);

        for existing in &mut self.blocks {
            existing.selected = false;
        }
        block.selected = true;
        self.blocks.push(block);
        self.selected_index = self.blocks.len() - 1;
    }

    /// Select the block at `index`
    pub fn select(&mut self, index: usize) {
        debug_assert!(index < self.blocks.len(), "select index out of range");
        if index >= self.blocks.len() {
            return;
        }
        if let Some(old) = self.blocks.get_mut(self.selected_index) {
            old.selected = false;
        }
        self.selected_index = index;
        self.blocks[index].selected = true;
    }

    /// Move the selection by `delta`, clamped, without wraparound
    ///
    /// Returns whether the selection changed.
    pub fn move_selection(&mut self, delta: isize) -> bool {
        if self.blocks.is_empty() {
            return false;
        }
        let last = self.blocks.len() - 1;
        let target = self
            .selected_index
            .saturating_add_signed(delta)
            .min(last);
        if target == self.selected_index {
            return false;
        }
        self.select(target);
        true
    }

    /// Flip `expanded` on the block at `index`
    pub fn toggle_expand(&mut self, index: usize) {
        debug_assert!(index < self.blocks.len(), "toggle_expand index out of range");
        if let Some(block) = self.blocks.get_mut(index) {
            block.expanded = !block.expanded;
        }
    }

    /// Remove the block at `index`
    ///
    /// Refuses to remove the last remaining block. Returns the removed block.
    pub fn remove(&mut self, index: usize) -> Option<Block> {
        if self.blocks.len() <= 1 {
            return None;
        }
        debug_assert!(index < self.blocks.len(), "remove index out of range");
        if index >= self.blocks.len() {
            return None;
        }

        let removed = self.blocks.remove(index);
        if index <= self.selected_index {
            self.selected_index = self.selected_index.min(self.blocks.len() - 1);
            self.sync_selection();
        }
        Some(removed)
    }

    /// Remove every block and reset the selection
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.selected_index = 0;
    }

    /// Set a metadata entry on the block at `index`
    pub fn set_metadata(&mut self, index: usize, key: &str, value: &str) {
        debug_assert!(index < self.blocks.len(), "set_metadata index out of range");
        if let Some(block) = self.blocks.get_mut(index) {
            block.metadata.insert(key.to_string(), value.to_string());
        }
    }

    /// Remove a metadata entry from the block at `index`
    pub fn clear_metadata(&mut self, index: usize, key: &str) {
        debug_assert!(index < self.blocks.len(), "clear_metadata index out of range");
        if let Some(block) = self.blocks.get_mut(index) {
            block.metadata.remove(key);
        }
    }

    /// Scroll the viewport of the block at `index`
    pub fn scroll(&mut self, index: usize, delta: isize) {
        if let Some(block) = self.blocks.get_mut(index) {
            block.viewport.scroll(delta);
        }
    }

    /// Record a new terminal size and resize every viewport
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let (vp_width, vp_height) = self.viewport_size();
        for block in &mut self.blocks {
            block.viewport.resize(vp_width, vp_height);
        }
    }

    /// Number of Progress blocks still animating
    pub fn loading_progress_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| b.block_type == BlockType::Progress && b.is_loading)
            .count()
    }

    /// Whether every invariant in the module docs holds
    pub fn is_consistent(&self) -> bool {
        let selection_ok = if self.blocks.is_empty() {
            self.selected_index == 0
        } else {
            self.selected_index < self.blocks.len()
                && self
                    .blocks
                    .iter()
                    .enumerate()
                    .all(|(i, b)| b.selected == (i == self.selected_index))
        };

        let mut ids: Vec<BlockId> = self.blocks.iter().map(|b| b.id).collect();
        ids.sort();
        ids.dedup();
        let ids_unique = ids.len() == self.blocks.len();

        let progress_ok = self
            .blocks
            .iter()
            .all(|b| (0.0..=1.0).contains(&b.progress));

        selection_ok && ids_unique && progress_ok
    }

    fn sync_selection(&mut self) {
        let selected = self.selected_index;
        for (i, block) in self.blocks.iter_mut().enumerate() {
            block.selected = i == selected;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockType;
    use pretty_assertions::assert_eq;

    fn session_with(n: usize) -> Session {
        let mut session = Session::new();
        for i in 0..n {
            let id = session.allocate_id();
            session.append(Block::new(id, BlockType::Info, format!("block {i}")));
        }
        session
    }

    fn selected_flags(session: &Session) -> Vec<bool> {
        session.blocks().iter().map(|b| b.selected).collect()
    }

    #[test]
    fn test_append_selects_new_last_block() {
        let mut session = session_with(3);
        let id = session.allocate_id();
        session.append(Block::new(id, BlockType::Success, "new"));

        assert_eq!(session.selected_index(), Some(3));
        assert_eq!(session.selected().map(|b| b.id), Some(id));
        assert_eq!(session.blocks().last().map(|b| b.id), Some(id));
        assert_eq!(selected_flags(&session), vec![false, false, false, true]);
        assert!(session.is_consistent());
    }

    #[test]
    fn test_empty_session() {
        let session = Session::new();
        assert!(session.is_empty());
        assert_eq!(session.selected_index(), None);
        assert!(session.selected().is_none());
        assert!(session.is_consistent());
    }

    #[test]
    fn test_move_selection_clamps_at_boundaries() {
        let mut session = session_with(3);
        session.select(0);

        assert!(!session.move_selection(-1));
        assert_eq!(session.selected_index(), Some(0));

        assert!(session.move_selection(1));
        assert!(session.move_selection(1));
        assert!(!session.move_selection(1));
        assert_eq!(session.selected_index(), Some(2));
        assert_eq!(selected_flags(&session), vec![false, false, true]);

        assert!(session.move_selection(-10));
        assert_eq!(session.selected_index(), Some(0));
        assert!(session.is_consistent());
    }

    #[test]
    fn test_move_selection_on_empty_is_noop() {
        let mut session = Session::new();
        assert!(!session.move_selection(1));
        assert!(session.is_consistent());
    }

    #[test]
    fn test_toggle_expand_keeps_selection() {
        let mut session = session_with(2);
        session.toggle_expand(0);
        assert!(!session.blocks()[0].expanded);
        assert_eq!(session.selected_index(), Some(1));
        session.toggle_expand(0);
        assert!(session.blocks()[0].expanded);
    }

    #[test]
    fn test_remove_last_remaining_block_is_noop() {
        let mut session = session_with(1);
        let before = session.blocks()[0].id;
        assert!(session.remove(0).is_none());
        assert_eq!(session.len(), 1);
        assert_eq!(session.blocks()[0].id, before);
        assert!(session.blocks()[0].selected);
    }

    #[test]
    fn test_remove_selected_tail_moves_selection_back() {
        let mut session = session_with(3);
        let removed = session.remove(2).unwrap();
        assert_eq!(removed.title, "block 2");
        assert_eq!(session.selected_index(), Some(1));
        assert_eq!(selected_flags(&session), vec![false, true]);
        assert!(session.is_consistent());
    }

    #[test]
    fn test_remove_selected_middle_keeps_index() {
        let mut session = session_with(3);
        session.select(1);
        session.remove(1);
        assert_eq!(session.selected_index(), Some(1));
        assert_eq!(session.selected().unwrap().title, "block 2");
        assert!(session.is_consistent());
    }

    #[test]
    fn test_remove_after_selection_leaves_it() {
        let mut session = session_with(3);
        session.select(0);
        session.remove(2);
        assert_eq!(session.selected_index(), Some(0));
        assert!(session.is_consistent());
    }

    #[test]
    fn test_remove_before_selection_reasserts_flag() {
        let mut session = session_with(3);
        session.remove(0);
        assert_eq!(session.selected_index(), Some(1));
        assert!(session.is_consistent());
    }

    #[test]
    fn test_clear_resets_selection_but_not_ids() {
        let mut session = session_with(3);
        session.clear();
        assert!(session.is_empty());
        assert_eq!(session.selected_index(), None);
        assert!(session.is_consistent());

        let id = session.allocate_id();
        assert_eq!(id, BlockId(4));
    }

    #[test]
    fn test_metadata_roundtrip() {
        let mut session = session_with(1);
        session.set_metadata(0, "copied", "true");
        assert_eq!(
            session.blocks()[0].metadata.get("copied").map(String::as_str),
            Some("true")
        );
        session.clear_metadata(0, "copied");
        assert!(session.blocks()[0].metadata.is_empty());
    }

    #[test]
    fn test_find_and_index_of() {
        let session = session_with(3);
        let id = session.blocks()[1].id;
        assert_eq!(session.index_of(id), Some(1));
        assert_eq!(session.find(id).map(|b| b.title.as_str()), Some("block 1"));
        assert!(session.find(BlockId(999)).is_none());
    }

    #[test]
    fn test_resize_updates_viewports() {
        let mut session = session_with(2);
        assert_eq!(session.blocks()[0].viewport.width, INITIAL_VIEWPORT_WIDTH);

        session.resize(120, 40);
        assert_eq!(session.terminal_size(), (120, 40));
        for block in session.blocks() {
            assert_eq!(block.viewport.width, 110);
            assert_eq!(block.viewport.height, 15);
        }

        let id = session.allocate_id();
        session.append(Block::new(id, BlockType::Info, "late"));
        assert_eq!(session.blocks()[2].viewport.width, 110);
    }

    #[test]
    fn test_tiny_terminal_saturates_viewport_width() {
        let mut session = session_with(1);
        session.resize(4, 4);
        assert_eq!(session.blocks()[0].viewport.width, 0);
    }

    #[test]
    fn test_append_clamps_progress() {
        let mut session = Session::new();
        let id = session.allocate_id();
        let mut block = Block::new(id, BlockType::Progress, "p");
        block.progress = 4.0;
        session.append(block);
        assert_eq!(session.blocks()[0].progress, 1.0);
        assert!(session.is_consistent());
    }
}
