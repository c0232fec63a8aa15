//! Terminal input module (director-facing).
//!
//! This module is intentionally independent of any UI framework. It maps
//! `crossterm` key events onto the fixed logical key table and samples the
//! held keys once per tick as a [`crate::types::LogicalKey`] bitmask, suitable
//! for terminals with or without key-release events.

pub mod map;

pub use puyo_director_core as core;
pub use puyo_director_types as types;

pub use map::{logical_key, should_quit, should_restart, KeyboardSampler, KEY_TABLE};
