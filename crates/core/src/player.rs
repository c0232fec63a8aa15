//! Active pair control.
//!
//! [`PuyoPlayer`] owns the pair the player is steering. It never settles the
//! board itself: on lock it writes both puyos where they stand and goes
//! inactive, leaving any split drop to the Falling state.

use tracing::debug;

use crate::board::Board;
use crate::collab::PieceController;
use crate::input::LogicalInput;
use crate::types::{LogicalKey, PuyoPair, FALL_TICKS, LOCK_TICKS, SPAWN_X, SPAWN_Y};

/// Points per row for a held soft drop
const SOFT_DROP_POINTS: u32 = 1;

/// Points per row for a quick drop
const QUICK_DROP_POINTS: u32 = 2;

/// Where the child sits relative to the axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub fn offset(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    pub fn rotate_cw(self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    pub fn rotate_ccw(self) -> Self {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
        }
    }
}

/// The pair under player control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePair {
    pub pair: PuyoPair,
    pub x: i8,
    pub y: i8,
    pub direction: Direction,
}

impl ActivePair {
    /// Spawn position: axis at the spawn cell, child above it
    pub fn new(pair: PuyoPair) -> Self {
        Self {
            pair,
            x: SPAWN_X,
            y: SPAWN_Y,
            direction: Direction::Up,
        }
    }

    pub fn child_pos(&self) -> (i8, i8) {
        let (dx, dy) = self.direction.offset();
        (self.x + dx, self.y + dy)
    }

    /// Both cells in bounds and empty after shifting by (dx, dy)
    pub fn fits(&self, board: &Board, dx: i8, dy: i8) -> bool {
        let (cx, cy) = self.child_pos();
        board.is_valid(self.x + dx, self.y + dy) && board.is_valid(cx + dx, cy + dy)
    }

    fn shifted(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PuyoPlayer {
    active: Option<ActivePair>,
    input: LogicalInput,
    fall_timer: u32,
    lock_timer: u32,
    score: u32,
}

impl PuyoPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<ActivePair> {
        self.active
    }

    pub fn input(&self) -> &LogicalInput {
        &self.input
    }

    fn try_shift(&mut self, board: &Board, dx: i8) {
        if let Some(piece) = self.active {
            if piece.fits(board, dx, 0) {
                self.active = Some(piece.shifted(dx, 0));
            }
        }
    }

    /// Rotate, kicking the axis one cell away from an obstruction if needed.
    fn try_rotate(&mut self, board: &Board, clockwise: bool) {
        let Some(piece) = self.active else {
            return;
        };
        let direction = if clockwise {
            piece.direction.rotate_cw()
        } else {
            piece.direction.rotate_ccw()
        };
        let rotated = ActivePair { direction, ..piece };
        if rotated.fits(board, 0, 0) {
            self.active = Some(rotated);
            return;
        }
        let (dx, dy) = direction.offset();
        if rotated.fits(board, -dx, -dy) {
            self.active = Some(rotated.shifted(-dx, -dy));
        }
    }

    fn quick_drop(&mut self, board: &mut Board) {
        let Some(mut piece) = self.active else {
            return;
        };
        let mut rows = 0;
        while piece.fits(board, 0, 1) {
            piece = piece.shifted(0, 1);
            rows += 1;
        }
        self.score = self.score.saturating_add(rows * QUICK_DROP_POINTS);
        self.lock(board, piece);
    }

    fn lock(&mut self, board: &mut Board, piece: ActivePair) {
        let (cx, cy) = piece.child_pos();
        board.set(piece.x, piece.y, Some(piece.pair.axis));
        board.set(cx, cy, Some(piece.pair.child));
        self.active = None;
        debug!(x = piece.x, y = piece.y, "pair locked");
    }

    fn apply_gravity(&mut self, board: &mut Board, soft_drop: bool) {
        let Some(piece) = self.active else {
            return;
        };
        self.fall_timer += 1;
        let due = soft_drop || self.fall_timer >= FALL_TICKS;

        if piece.fits(board, 0, 1) {
            self.lock_timer = 0;
            if due {
                self.fall_timer = 0;
                self.active = Some(piece.shifted(0, 1));
                if soft_drop {
                    self.score = self.score.saturating_add(SOFT_DROP_POINTS);
                }
            }
            return;
        }

        self.lock_timer += 1;
        if soft_drop || self.lock_timer >= LOCK_TICKS {
            self.lock(board, piece);
        }
    }
}

impl PieceController for PuyoPlayer {
    type Board = Board;

    fn spawn(&mut self, board: &mut Board, pair: PuyoPair) -> bool {
        let piece = ActivePair::new(pair);
        if !piece.fits(board, 0, 0) {
            return false;
        }
        self.active = Some(piece);
        self.fall_timer = 0;
        self.lock_timer = 0;
        true
    }

    fn is_active(&self) -> bool {
        self.active.is_some()
    }

    fn update(&mut self, board: &mut Board, input: LogicalKey) {
        self.input.update(input);
        if self.active.is_none() {
            return;
        }

        let input = &self.input;
        let right = input.is_trigger(LogicalKey::RIGHT) || input.is_repeat(LogicalKey::RIGHT);
        let left = input.is_trigger(LogicalKey::LEFT) || input.is_repeat(LogicalKey::LEFT);
        let rotate_cw = input.is_trigger(LogicalKey::ROTATE_RIGHT);
        let rotate_ccw = input.is_trigger(LogicalKey::ROTATE_LEFT);
        let quick_drop = input.is_trigger(LogicalKey::QUICK_DROP);
        let soft_drop = input.is_raw(LogicalKey::DOWN);

        if right {
            self.try_shift(board, 1);
        } else if left {
            self.try_shift(board, -1);
        }

        if rotate_cw {
            self.try_rotate(board, true);
        } else if rotate_ccw {
            self.try_rotate(board, false);
        }

        if quick_drop {
            self.quick_drop(board);
            return;
        }

        self.apply_gravity(board, soft_drop);
    }

    fn pop_score(&mut self) -> u32 {
        std::mem::take(&mut self.score)
    }
}
