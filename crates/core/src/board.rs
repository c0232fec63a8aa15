//! Board module - grid physics and match detection
//!
//! The board is a 6x14 grid where each cell is empty or holds a puyo.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..5 (left to right), y ranges 0..13
//! (top to bottom). The top [`HIDDEN_ROWS`] rows are above the visible field;
//! puyos there still fall but never take part in a match.
//!
//! Settling and erasing are stepped: [`Board::fall`] drops every unsupported
//! puyo by one row per call, and an erase runs for [`ERASE_TICKS`] calls before
//! the matched cells disappear.

use arrayvec::ArrayVec;
use tracing::debug;

use crate::collab::BoardEngine;
use crate::types::{
    Cell, PuyoType, BOARD_HEIGHT, BOARD_WIDTH, CHAIN_BONUS, COLOR_BONUS, CONNECT_BONUS,
    ERASE_MIN, ERASE_TICKS, HIDDEN_ROWS,
};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Summary of the most recent successful erase check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EraseReport {
    pub chain_index: i32,
    pub erased: u32,
    pub groups: u32,
    pub colors: u32,
    pub score: u32,
}

/// The game board - 6 columns x 14 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
    /// Cells recorded by the last successful erase check
    erasing: ArrayVec<usize, BOARD_SIZE>,
    erase_timer: u32,
    last_erase: Option<EraseReport>,
    score: u32,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
            erasing: ArrayVec::new(),
            erase_timer: 0,
            last_erase: None,
            score: 0,
        }
    }

    /// Build a board from text rows, bottom-aligned.
    ///
    /// Each character is a colour letter (`B`, `G`, `P`, `R`, `Y`); anything
    /// else is empty. The last row lands on the floor.
    ///
    /// ```
    /// use puyo_director_core::Board;
    /// use puyo_director_core::types::PuyoType;
    ///
    /// let board = Board::from_rows(&["R.....", "RRG..."]);
    /// assert_eq!(board.get(0, 13), Some(Some(PuyoType::Red)));
    /// assert_eq!(board.get(0, 12), Some(Some(PuyoType::Red)));
    /// assert_eq!(board.get(1, 12), Some(None));
    /// ```
    pub fn from_rows(rows: &[&str]) -> Self {
        let mut board = Self::new();
        let rows = &rows[rows.len().saturating_sub(BOARD_HEIGHT as usize)..];
        let top = BOARD_HEIGHT as usize - rows.len();
        for (dy, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().take(BOARD_WIDTH as usize).enumerate() {
                let cell = PuyoType::from_str(&ch.to_string());
                board.set(x as i8, (top + dy) as i8, cell);
            }
        }
        board
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    fn coords(index: usize) -> (i8, i8) {
        (
            (index % BOARD_WIDTH as usize) as i8,
            (index / BOARD_WIDTH as usize) as i8,
        )
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is valid (within bounds and empty)
    pub fn is_valid(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Number of occupied cells
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Whether an erase is currently animating
    pub fn is_erasing(&self) -> bool {
        !self.erasing.is_empty()
    }

    pub fn last_erase(&self) -> Option<EraseReport> {
        self.last_erase
    }

    fn is_unsupported(&self, idx: usize) -> bool {
        let (x, y) = Self::coords(idx);
        self.cells[idx].is_some() && self.is_valid(x, y + 1)
    }

    /// Collect the connected same-colour group containing `start`.
    fn flood(
        &self,
        start: usize,
        visited: &mut [bool; BOARD_SIZE],
        group: &mut ArrayVec<usize, BOARD_SIZE>,
    ) {
        group.clear();
        let Some(color) = self.cells[start] else {
            return;
        };
        let mut stack: ArrayVec<usize, BOARD_SIZE> = ArrayVec::new();
        visited[start] = true;
        stack.push(start);

        while let Some(idx) = stack.pop() {
            group.push(idx);
            let (x, y) = Self::coords(idx);
            for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                let (nx, ny) = (x + dx, y + dy);
                if ny < HIDDEN_ROWS as i8 {
                    continue;
                }
                let Some(n) = Self::index(nx, ny) else {
                    continue;
                };
                if !visited[n] && self.cells[n] == Some(color) {
                    visited[n] = true;
                    stack.push(n);
                }
            }
        }
    }
}

/// `10 × erased × max(1, chain + connect + colour)`
fn chain_score(chain_index: i32, erased: u32, connect: u32, colors: u32) -> u32 {
    let chain_idx = (chain_index.max(0) as usize).min(CHAIN_BONUS.len() - 1);
    let color_idx = (colors.max(1) as usize - 1).min(COLOR_BONUS.len() - 1);
    let bonus = CHAIN_BONUS[chain_idx] + connect + COLOR_BONUS[color_idx];
    10 * erased * bonus.max(1)
}

fn connect_bonus(size: usize) -> u32 {
    let i = size.saturating_sub(ERASE_MIN).min(CONNECT_BONUS.len() - 1);
    CONNECT_BONUS[i]
}

impl BoardEngine for Board {
    fn check_fall(&mut self) -> bool {
        (0..BOARD_SIZE).any(|idx| self.is_unsupported(idx))
    }

    fn fall(&mut self) -> bool {
        let width = BOARD_WIDTH as usize;
        // Bottom-up, so a floating column moves down together.
        for idx in (0..BOARD_SIZE - width).rev() {
            if self.is_unsupported(idx) {
                self.cells[idx + width] = self.cells[idx].take();
            }
        }
        self.check_fall()
    }

    fn check_erase(&mut self, chain_index: i32) -> bool {
        let mut visited = [false; BOARD_SIZE];
        let mut group: ArrayVec<usize, BOARD_SIZE> = ArrayVec::new();
        let mut colors: ArrayVec<PuyoType, 5> = ArrayVec::new();
        let mut connect = 0;
        let mut groups = 0;

        self.erasing.clear();
        let first_visible = HIDDEN_ROWS as usize * BOARD_WIDTH as usize;
        for idx in first_visible..BOARD_SIZE {
            if visited[idx] || self.cells[idx].is_none() {
                continue;
            }
            self.flood(idx, &mut visited, &mut group);
            if group.len() < ERASE_MIN {
                continue;
            }
            if let Some(color) = self.cells[idx] {
                if !colors.contains(&color) {
                    colors.push(color);
                }
            }
            connect += connect_bonus(group.len());
            groups += 1;
            self.erasing.extend(group.iter().copied());
        }

        if self.erasing.is_empty() {
            return false;
        }

        let erased = self.erasing.len() as u32;
        let score = chain_score(chain_index, erased, connect, colors.len() as u32);
        self.score = self.score.saturating_add(score);
        self.erase_timer = ERASE_TICKS;
        self.last_erase = Some(EraseReport {
            chain_index,
            erased,
            groups,
            colors: colors.len() as u32,
            score,
        });
        debug!(chain_index, erased, groups, score, "erase matched");
        true
    }

    fn erase(&mut self) -> bool {
        if self.erasing.is_empty() {
            return false;
        }
        self.erase_timer = self.erase_timer.saturating_sub(1);
        if self.erase_timer > 0 {
            return true;
        }
        for idx in self.erasing.drain(..) {
            self.cells[idx] = None;
        }
        false
    }

    fn pop_score(&mut self) -> u32 {
        std::mem::take(&mut self.score)
    }
}
