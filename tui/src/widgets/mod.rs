//! Widgets
//!
//! Building blocks for the gbloxs screen.

pub mod block_card;
pub mod spinner;
pub mod text_block;

pub use block_card::BlockCard;
pub use spinner::Spinner;
