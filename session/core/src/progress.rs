//! Progress Animation Scheduler
//!
//! Animates Progress blocks through self-resubmitting ticks. A tick names
//! the block and the progress value it was scheduled with; handling one
//! either produces the next tick or ends the chain. There is no free-running
//! timer: if a tick is dropped, the chain stops.
//!
//! Stale ticks are discarded without effect:
//! - the block was deleted (or the session cleared)
//! - the block is no longer loading
//! - the block was refreshed and a newer chain owns it (the carried value no
//!   longer matches the block's progress)

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::block::{Block, BlockId, BlockType};
use crate::config::{DEFAULT_PROGRESS_STEP, DEFAULT_TICK_INTERVAL};
use crate::session::Session;

/// Values this close to 1.0 count as complete
const COMPLETION_EPSILON: f64 = 1e-9;

/// A scheduled progress tick
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressTick {
    /// Block being animated
    pub block_id: BlockId,
    /// Block progress when this tick was scheduled
    pub value: f64,
}

/// Why a tick was dropped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiscardReason {
    /// No block with that id
    Missing,
    /// Block is not loading (finished, or never animated)
    NotLoading,
    /// Block was restarted by a newer chain
    Superseded,
}

/// What handling a tick did
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// Progress advanced; schedule `next`
    Advanced {
        /// Follow-up tick
        next: ProgressTick,
    },
    /// Progress reached 1.0 and loading stopped
    Completed,
    /// Tick had no effect
    Discarded(DiscardReason),
}

/// Advance `current` by `step`, clamped to [0, 1]
#[must_use]
pub fn advance(current: f64, step: f64) -> f64 {
    let next = (current + step).clamp(0.0, 1.0);
    if next >= 1.0 - COMPLETION_EPSILON {
        1.0
    } else {
        next
    }
}

/// Tick timing and step size
#[derive(Clone, Copy, Debug)]
pub struct ProgressScheduler {
    interval: Duration,
    step: f64,
}

impl Default for ProgressScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL, DEFAULT_PROGRESS_STEP)
    }
}

impl ProgressScheduler {
    /// Create a scheduler
    #[must_use]
    pub fn new(interval: Duration, step: f64) -> Self {
        Self { interval, step }
    }

    /// Delay before a scheduled tick fires
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Progress added per tick
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// First tick of a chain for `block`
    #[must_use]
    pub fn first_tick(&self, block: &Block) -> ProgressTick {
        ProgressTick {
            block_id: block.id,
            value: block.progress,
        }
    }

    /// Reset a Progress block to zero and start a new chain
    ///
    /// Returns `None` for any other block type.
    pub fn restart(&self, block: &mut Block) -> Option<ProgressTick> {
        if block.block_type != BlockType::Progress {
            return None;
        }
        block.progress = 0.0;
        block.is_loading = true;
        Some(self.first_tick(block))
    }

    /// Apply a delivered tick to the session
    pub fn handle(&self, session: &mut Session, tick: ProgressTick) -> TickOutcome {
        let Some(block) = session.find_mut(tick.block_id) else {
            return TickOutcome::Discarded(DiscardReason::Missing);
        };
        self.apply(block, tick)
    }

    fn apply(&self, block: &mut Block, tick: ProgressTick) -> TickOutcome {
        if !block.is_loading {
            return TickOutcome::Discarded(DiscardReason::NotLoading);
        }
        if block.progress != tick.value {
            return TickOutcome::Discarded(DiscardReason::Superseded);
        }

        block.progress = advance(block.progress, self.step);
        if block.progress >= 1.0 {
            block.is_loading = false;
            TickOutcome::Completed
        } else {
            TickOutcome::Advanced {
                next: ProgressTick {
                    block_id: block.id,
                    value: block.progress,
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn progress_block(id: u64, value: f64) -> Block {
        Block::new(BlockId(id), BlockType::Progress, "Progress").with_progress(value)
    }

    #[test]
    fn test_advance_clamps_and_snaps() {
        assert!((advance(0.5, 0.01) - 0.51).abs() < 1e-12);
        assert_eq!(advance(0.995, 0.01), 1.0);
        assert_eq!(advance(1.0, 0.01), 1.0);
        assert_eq!(advance(1.0 - 1e-12, 0.0), 1.0);
        assert_eq!(advance(0.0, -0.5), 0.0);
    }

    #[test]
    fn test_tick_runs_chain_to_completion() {
        let scheduler = ProgressScheduler::default();
        let mut block = progress_block(3, 0.65);
        let mut tick = scheduler.first_tick(&block);
        let mut ticks = 0;
        let mut last = block.progress;

        loop {
            ticks += 1;
            match scheduler.apply(&mut block, tick) {
                TickOutcome::Advanced { next } => {
                    assert!(block.progress > last);
                    assert!((block.progress - last - 0.01).abs() < 1e-9);
                    last = block.progress;
                    tick = next;
                }
                TickOutcome::Completed => break,
                TickOutcome::Discarded(reason) => panic!("unexpected discard: {reason:?}"),
            }
            assert!(ticks < 100, "chain never completed");
        }

        assert_eq!(ticks, 35);
        assert_eq!(block.progress, 1.0);
        assert!(!block.is_loading);
        assert_eq!(
            scheduler.apply(&mut block, tick),
            TickOutcome::Discarded(DiscardReason::NotLoading)
        );
    }

    #[test]
    fn test_superseded_tick_is_discarded() {
        let scheduler = ProgressScheduler::default();
        let mut block = progress_block(1, 0.4);
        let old = scheduler.first_tick(&block);

        let fresh = scheduler.restart(&mut block).unwrap();
        assert_eq!(block.progress, 0.0);
        assert_eq!(fresh.value, 0.0);

        assert_eq!(
            scheduler.apply(&mut block, old),
            TickOutcome::Discarded(DiscardReason::Superseded)
        );
        assert_eq!(block.progress, 0.0);
        assert!(matches!(
            scheduler.apply(&mut block, fresh),
            TickOutcome::Advanced { .. }
        ));
    }

    #[test]
    fn test_restart_ignores_other_types() {
        let scheduler = ProgressScheduler::default();
        let mut block = Block::new(BlockId(1), BlockType::Info, "i");
        assert!(scheduler.restart(&mut block).is_none());
        assert!(!block.is_loading);
    }

    #[test]
    fn test_restart_completed_block() {
        let scheduler = ProgressScheduler::default();
        let mut block = progress_block(1, 1.0);
        block.is_loading = false;
        let tick = scheduler.restart(&mut block).unwrap();
        assert!(block.is_loading);
        assert_eq!(tick.block_id, BlockId(1));
    }

    #[test]
    fn test_tick_for_missing_block() {
        let scheduler = ProgressScheduler::default();
        let mut session = Session::new();
        let tick = ProgressTick {
            block_id: BlockId(42),
            value: 0.1,
        };
        assert_eq!(
            scheduler.handle(&mut session, tick),
            TickOutcome::Discarded(DiscardReason::Missing)
        );
    }
}
