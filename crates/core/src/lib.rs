//! Core game logic module - pure, deterministic, and testable
//!
//! This crate holds the turn cycle of a falling puyo-pair puzzle game: the
//! state machine that decides when a pair spawns, when the board settles,
//! when matches erase and chain, and when the game is over. It has **no
//! dependencies** on terminals, rendering or I/O.
//!
//! # Module Structure
//!
//! - [`state_machine`]: five-state controller with a bounded same-tick cascade
//! - [`director`]: per-tick driver (input, one machine update, score drain)
//! - [`score`]: monotonic score tracker and display sinks
//! - [`collab`]: traits the machine needs from its collaborators
//! - [`board`]: reference 6x14 board with stepped falling and chain scoring
//! - [`player`]: reference pair controller (move, rotate, drop, lock)
//! - [`rng`]: seeded queue of upcoming pairs
//! - [`input`]: trigger/repeat detection over level input
//! - [`config`]: environment-driven session settings
//!
//! # Turn Cycle
//!
//! - **Waiting** → Control once the host grants spawn permission
//! - **Control** → GameOver when the pair cannot spawn, Falling once it locks
//! - **Falling** → Erasing once nothing is left to settle
//! - **Erasing** → Falling after each erase; Control or Waiting once no match
//!   remains (the chain count resets here)
//! - **GameOver** is terminal
//!
//! # Example
//!
//! ```
//! use puyo_director_core::{NullSink, ReferenceDirector, SessionConfig};
//! use puyo_director_core::types::{GameState, LogicalKey};
//!
//! let config = SessionConfig::default();
//! let mut director = ReferenceDirector::from_config(&config, LogicalKey::empty(), NullSink);
//!
//! // Sessions start by waiting for the host.
//! assert_eq!(director.state(), GameState::Waiting);
//!
//! director.enable_spawn(true);
//! director.tick();
//! assert_eq!(director.state(), GameState::Control);
//!
//! // Quick drop: lock, settle and respawn within one tick.
//! *director.input_mut() = LogicalKey::QUICK_DROP;
//! director.tick();
//! assert!(director.score() > 0);
//! ```

pub mod board;
pub mod collab;
pub mod config;
pub mod director;
pub mod input;
pub mod player;
pub mod rng;
pub mod score;
pub mod snapshot;
pub mod state_machine;

pub use puyo_director_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, EraseReport};
pub use collab::{BoardEngine, InputMapper, PieceController, PieceQueue};
pub use config::{ConfigError, SessionConfig};
pub use director::{PlayDirector, ReferenceDirector};
pub use input::LogicalInput;
pub use player::{ActivePair, Direction, PuyoPlayer};
pub use rng::{NextQueue, SimpleRng};
pub use score::{NullSink, RecordingSink, ScoreSink, ScoreTracker};
pub use snapshot::SessionSnapshot;
pub use state_machine::{run_cascade, Preview, Session, StateMachine, CASCADE_LIMIT};
