//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are plain data with no game logic, making them usable from the
//! state machine, the reference collaborators, the input layer and the runner.
//!
//! # Board Dimensions
//!
//! Standard puyo playfield dimensions:
//!
//! - **Width**: 6 columns (indexed 0-5)
//! - **Height**: 14 rows (indexed 0-13, row 0 at the top)
//! - **Hidden rows**: the top 2 rows are above the visible field
//! - **Spawn column**: 2
//!
//! # Timing Constants
//!
//! Timing values are in fixed ticks unless suffixed with `_MS`:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `FALL_TICKS` | 30 | Natural gravity interval for the active pair |
//! | `LOCK_TICKS` | 20 | Grounded ticks before the pair locks |
//! | `ERASE_TICKS` | 24 | Length of the erase animation |
//! | `REPEAT_START_TICKS` | 12 | Hold time before a key starts repeating |
//! | `REPEAT_INTERVAL_TICKS` | 3 | Interval between repeats |
//!
//! # Examples
//!
//! ```
//! use puyo_director_types::{GameState, LogicalKey, PuyoType, Transition};
//!
//! let t = Transition::TransitionTo(GameState::Erasing);
//! assert_eq!(t.target(), Some(GameState::Erasing));
//! assert_eq!(Transition::NoChange.target(), None);
//!
//! assert_eq!(PuyoType::from_str("red"), Some(PuyoType::Red));
//!
//! let keys = LogicalKey::LEFT | LogicalKey::DOWN;
//! assert!(keys.contains(LogicalKey::DOWN));
//! ```

use bitflags::bitflags;
use serde::Serialize;

/// Board width in cells (6 columns)
pub const BOARD_WIDTH: u8 = 6;

/// Board height in cells including the hidden rows (14 rows)
pub const BOARD_HEIGHT: u8 = 14;

/// Rows above the visible field
pub const HIDDEN_ROWS: u8 = 2;

/// Column the axis puyo spawns in
pub const SPAWN_X: i8 = 2;

/// Row the axis puyo spawns in (the child starts one row above)
pub const SPAWN_Y: i8 = 1;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Ticks between natural gravity steps of the active pair
pub const FALL_TICKS: u32 = 30;

/// Grounded ticks before the active pair locks
pub const LOCK_TICKS: u32 = 20;

/// Ticks the erase animation lasts before cells are removed
pub const ERASE_TICKS: u32 = 24;

/// Ticks a key must be held before it starts repeating
pub const REPEAT_START_TICKS: u32 = 12;

/// Ticks between repeats once repeating
pub const REPEAT_INTERVAL_TICKS: u32 = 3;

/// Minimum connected group size that erases
pub const ERASE_MIN: usize = 4;

/// Number of upcoming pairs shown in the preview
pub const NEXT_COUNT: usize = 2;

/// Chain bonus by chain index (index 0 is the first clear of a chain)
pub const CHAIN_BONUS: [u32; 19] = [
    0, 8, 16, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448, 480, 512,
];

/// Group-size bonus, indexed by `size - ERASE_MIN` (11+ uses the last entry)
pub const CONNECT_BONUS: [u32; 8] = [0, 2, 3, 4, 5, 6, 7, 10];

/// Colour bonus by number of distinct colours erased at once (index = colours - 1)
pub const COLOR_BONUS: [u32; 5] = [0, 3, 6, 12, 24];

/// Resting states of the turn cycle.
///
/// There is no "unchanged" member: "stay where you are" is expressed by
/// [`Transition::NoChange`], so a `GameState` value is always a resting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GameState {
    /// The player steers the active pair
    Control,
    /// Terminal: a pair could not spawn
    GameOver,
    /// Unsupported puyos settle one step per tick
    Falling,
    /// Matched groups animate out
    Erasing,
    /// Waiting for the host to grant spawn permission
    Waiting,
}

impl GameState {
    /// Number of resting states
    pub const COUNT: usize = 5;

    pub const ALL: [GameState; Self::COUNT] = [
        GameState::Control,
        GameState::GameOver,
        GameState::Falling,
        GameState::Erasing,
        GameState::Waiting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameState::Control => "control",
            GameState::GameOver => "gameOver",
            GameState::Falling => "falling",
            GameState::Erasing => "erasing",
            GameState::Waiting => "waiting",
        }
    }
}

/// Result of a transition query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Stay in the current state
    NoChange,
    /// Enter the given state (its `initialize` runs in the same tick)
    TransitionTo(GameState),
}

impl Transition {
    /// The target state, if any
    pub fn target(self) -> Option<GameState> {
        match self {
            Transition::NoChange => None,
            Transition::TransitionTo(state) => Some(state),
        }
    }

    /// `NoChange` while `stay` holds, otherwise `TransitionTo(next)`
    pub fn stay_or(stay: bool, next: GameState) -> Self {
        if stay {
            Transition::NoChange
        } else {
            Transition::TransitionTo(next)
        }
    }
}

/// Puyo colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PuyoType {
    Blue,
    Green,
    Purple,
    Red,
    Yellow,
}

impl PuyoType {
    pub const ALL: [PuyoType; 5] = [
        PuyoType::Blue,
        PuyoType::Green,
        PuyoType::Purple,
        PuyoType::Red,
        PuyoType::Yellow,
    ];

    /// Parse colour from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use puyo_director_types::PuyoType;
    ///
    /// assert_eq!(PuyoType::from_str("Blue"), Some(PuyoType::Blue));
    /// assert_eq!(PuyoType::from_str("Y"), Some(PuyoType::Yellow));
    /// assert_eq!(PuyoType::from_str("black"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "blue" | "b" => Some(PuyoType::Blue),
            "green" | "g" => Some(PuyoType::Green),
            "purple" | "p" => Some(PuyoType::Purple),
            "red" | "r" => Some(PuyoType::Red),
            "yellow" | "y" => Some(PuyoType::Yellow),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PuyoType::Blue => "blue",
            PuyoType::Green => "green",
            PuyoType::Purple => "purple",
            PuyoType::Red => "red",
            PuyoType::Yellow => "yellow",
        }
    }

    /// Single-letter tag, used by the status line
    pub fn letter(&self) -> char {
        match self {
            PuyoType::Blue => 'B',
            PuyoType::Green => 'G',
            PuyoType::Purple => 'P',
            PuyoType::Red => 'R',
            PuyoType::Yellow => 'Y',
        }
    }
}

/// A controllable pair: `axis` is the pivot, `child` orbits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PuyoPair {
    pub axis: PuyoType,
    pub child: PuyoType,
}

impl PuyoPair {
    pub fn new(axis: PuyoType, child: PuyoType) -> Self {
        Self { axis, child }
    }
}

/// A cell on the board
///
/// - `None`: Empty cell
/// - `Some(PuyoType)`: Cell holding a puyo of that colour
pub type Cell = Option<PuyoType>;

bitflags! {
    /// Level (held-state) snapshot of logical inputs for one tick.
    ///
    /// Bit `i` corresponds to entry `i` of the physical key table.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LogicalKey: u8 {
        const RIGHT = 1 << 0;
        const LEFT = 1 << 1;
        const ROTATE_RIGHT = 1 << 2;
        const ROTATE_LEFT = 1 << 3;
        const QUICK_DROP = 1 << 4;
        const DOWN = 1 << 5;
    }
}

impl LogicalKey {
    /// Number of logical keys
    pub const COUNT: usize = 6;

    /// Keys in bit order
    pub const ORDER: [LogicalKey; Self::COUNT] = [
        LogicalKey::RIGHT,
        LogicalKey::LEFT,
        LogicalKey::ROTATE_RIGHT,
        LogicalKey::ROTATE_LEFT,
        LogicalKey::QUICK_DROP,
        LogicalKey::DOWN,
    ];
}
