//! Collaborator contracts consumed by the state machine and the director.
//!
//! Every operation reports through its return value; none of them fail by
//! panicking or returning an error. The reference implementations live in
//! [`crate::board`], [`crate::player`] and [`crate::rng`]; tests substitute
//! scripted doubles.

use crate::types::{LogicalKey, PuyoPair};

/// Board physics and match detection.
pub trait BoardEngine {
    /// True while unsupported puyos remain.
    fn check_fall(&mut self) -> bool;

    /// Advance settling by one step. True while more settling remains.
    fn fall(&mut self) -> bool;

    /// Look for groups to erase at `chain_index` and record them for [`erase`](Self::erase).
    /// True when a match exists.
    fn check_erase(&mut self, chain_index: i32) -> bool;

    /// Advance the erase by one step. True while cells remain to erase.
    fn erase(&mut self) -> bool;

    /// Return and clear the score accumulated since the last call.
    fn pop_score(&mut self) -> u32;
}

/// Control of the active pair.
///
/// The board is passed in explicitly: the controller needs it for collision
/// checks and to write the pair into it on lock.
pub trait PieceController {
    type Board: ?Sized;

    /// Place `pair` at the spawn position. False when spawning is blocked.
    fn spawn(&mut self, board: &mut Self::Board, pair: PuyoPair) -> bool;

    /// True while the pair is live; false once it has locked.
    fn is_active(&self) -> bool;

    /// Apply one tick of held input and gravity to the active pair.
    fn update(&mut self, board: &mut Self::Board, input: LogicalKey);

    /// Return and clear the score accumulated since the last call.
    fn pop_score(&mut self) -> u32;
}

/// Source of upcoming pairs.
pub trait PieceQueue {
    /// Fill the queue for a new session.
    fn initialize(&mut self);

    /// Consume the head pair and refill the tail.
    fn next_pair(&mut self) -> PuyoPair;

    /// Visit the preview contents in order.
    fn for_each(&self, visitor: &mut dyn FnMut(usize, PuyoPair));
}

/// Physical-device sampling into a level bitmask of logical keys.
pub trait InputMapper {
    /// Held keys for this tick.
    fn sample(&mut self) -> LogicalKey;
}

/// Fixed input source, mostly for headless runs.
impl InputMapper for LogicalKey {
    fn sample(&mut self) -> LogicalKey {
        *self
    }
}
