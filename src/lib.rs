//! Puyo director (workspace facade crate).
//!
//! This package exposes `puyo_director::{core,input,types}` while the
//! implementation lives in dedicated crates under `crates/`.

pub use puyo_director_core as core;
pub use puyo_director_input as input;
pub use puyo_director_types as types;
