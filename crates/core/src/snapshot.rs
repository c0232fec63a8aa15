//! Serializable session summary.
//!
//! The runner writes a [`SessionSnapshot`] as JSON when it exits.

use serde::Serialize;

use crate::types::{GameState, PuyoPair};

/// Point-in-time view of a session, for hosts and run summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub state: GameState,
    pub score: u32,
    pub chain_count: i32,
    pub can_spawn: bool,
    pub game_over: bool,
    pub ticks: u64,
    pub preview: Vec<PuyoPair>,
}
