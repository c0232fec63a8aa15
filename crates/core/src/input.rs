//! Edge and repeat detection on top of the per-tick level input.
//!
//! The director only ever delivers held-state snapshots. The pair controller
//! needs presses (rotation) and auto-repeat (horizontal moves), which are
//! derived here from consecutive snapshots.

use crate::types::{LogicalKey, REPEAT_INTERVAL_TICKS, REPEAT_START_TICKS};

#[derive(Debug, Clone, Default)]
pub struct LogicalInput {
    raw: LogicalKey,
    trigger: LogicalKey,
    release: LogicalKey,
    repeat: LogicalKey,
    held_ticks: [u32; LogicalKey::COUNT],
}

impl LogicalInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this tick's held keys.
    pub fn update(&mut self, keys: LogicalKey) {
        self.trigger = keys & !self.raw;
        self.release = self.raw & !keys;
        self.raw = keys;
        self.repeat = LogicalKey::empty();

        for (i, key) in LogicalKey::ORDER.iter().enumerate() {
            if !keys.contains(*key) {
                self.held_ticks[i] = 0;
                continue;
            }
            self.held_ticks[i] = self.held_ticks[i].saturating_add(1);
            let held = self.held_ticks[i];
            if held > REPEAT_START_TICKS && (held - REPEAT_START_TICKS) % REPEAT_INTERVAL_TICKS == 0
            {
                self.repeat |= *key;
            }
        }
    }

    /// Held this tick
    pub fn is_raw(&self, key: LogicalKey) -> bool {
        self.raw.intersects(key)
    }

    /// Pressed this tick
    pub fn is_trigger(&self, key: LogicalKey) -> bool {
        self.trigger.intersects(key)
    }

    /// Released this tick
    pub fn is_release(&self, key: LogicalKey) -> bool {
        self.release.intersects(key)
    }

    /// Auto-repeat fired this tick
    pub fn is_repeat(&self, key: LogicalKey) -> bool {
        self.repeat.intersects(key)
    }
}
