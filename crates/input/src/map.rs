//! Key mapping from terminal events to logical keys.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::InputMapper;
use crate::types::LogicalKey;

/// Physical keys per logical key, in bit order.
pub const KEY_TABLE: [(LogicalKey, &[KeyCode]); LogicalKey::COUNT] = [
    (LogicalKey::RIGHT, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')]),
    (LogicalKey::LEFT, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')]),
    (LogicalKey::ROTATE_RIGHT, &[KeyCode::Char('x'), KeyCode::Char('X')]),
    (LogicalKey::ROTATE_LEFT, &[KeyCode::Char('z'), KeyCode::Char('Z')]),
    (LogicalKey::QUICK_DROP, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')]),
    (LogicalKey::DOWN, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')]),
];

// In terminals without key-release events, a press only counts as held for
// this many ticks unless the terminal keeps sending repeats.
const DEFAULT_RELEASE_TIMEOUT_TICKS: u32 = 10;

/// Map a key code to its logical key.
pub fn logical_key(code: KeyCode) -> Option<LogicalKey> {
    KEY_TABLE
        .iter()
        .find(|(_, codes)| codes.contains(&code))
        .map(|(key, _)| *key)
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Check if key should start a fresh session.
pub fn should_restart(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('r') | KeyCode::Char('R'))
}

/// Tracks which logical keys are held and samples them once per tick.
#[derive(Debug, Clone)]
pub struct KeyboardSampler {
    /// Remaining held ticks per logical key, in bit order
    held: [u32; LogicalKey::COUNT],
    release_timeout_ticks: u32,
    release_events: bool,
}

impl Default for KeyboardSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyboardSampler {
    pub fn new() -> Self {
        Self {
            held: [0; LogicalKey::COUNT],
            release_timeout_ticks: DEFAULT_RELEASE_TIMEOUT_TICKS,
            release_events: false,
        }
    }

    /// Trust release events: keys stay held until released.
    pub fn with_release_events(mut self, enabled: bool) -> Self {
        self.release_events = enabled;
        self
    }

    pub fn with_release_timeout_ticks(mut self, ticks: u32) -> Self {
        self.release_timeout_ticks = ticks.max(1);
        self
    }

    /// Feed one terminal key event. Returns true if it mapped to a logical key.
    pub fn handle_event(&mut self, event: KeyEvent) -> bool {
        let Some(key) = logical_key(event.code) else {
            return false;
        };
        let Some(slot) = LogicalKey::ORDER.iter().position(|k| *k == key) else {
            return false;
        };
        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.held[slot] = if self.release_events {
                    u32::MAX
                } else {
                    self.release_timeout_ticks
                };
            }
            KeyEventKind::Release => self.held[slot] = 0,
        }
        true
    }

    /// Drop every held key; the runner calls this on focus loss.
    pub fn clear(&mut self) {
        self.held = [0; LogicalKey::COUNT];
    }
}

impl InputMapper for KeyboardSampler {
    fn sample(&mut self) -> LogicalKey {
        let mut keys = LogicalKey::empty();
        for (slot, key) in LogicalKey::ORDER.iter().enumerate() {
            if self.held[slot] == 0 {
                continue;
            }
            keys |= *key;
            if !self.release_events {
                self.held[slot] -= 1;
            }
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers};

    fn event(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_table_order_matches_bits() {
        for (i, (key, codes)) in KEY_TABLE.iter().enumerate() {
            assert_eq!(*key, LogicalKey::ORDER[i]);
            assert!(!codes.is_empty());
        }
    }

    #[test]
    fn test_logical_key_mapping() {
        assert_eq!(logical_key(KeyCode::Right), Some(LogicalKey::RIGHT));
        assert_eq!(logical_key(KeyCode::Left), Some(LogicalKey::LEFT));
        assert_eq!(logical_key(KeyCode::Char('x')), Some(LogicalKey::ROTATE_RIGHT));
        assert_eq!(logical_key(KeyCode::Char('Z')), Some(LogicalKey::ROTATE_LEFT));
        assert_eq!(logical_key(KeyCode::Up), Some(LogicalKey::QUICK_DROP));
        assert_eq!(logical_key(KeyCode::Down), Some(LogicalKey::DOWN));
        assert_eq!(logical_key(KeyCode::Char('m')), None);
    }

    #[test]
    fn test_quit_and_restart_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
        assert!(should_restart(KeyEvent::from(KeyCode::Char('r'))));
    }

    #[test]
    fn test_press_times_out_without_release_events() {
        let mut sampler = KeyboardSampler::new().with_release_timeout_ticks(2);
        assert!(sampler.handle_event(event(KeyCode::Left, KeyEventKind::Press)));

        assert_eq!(sampler.sample(), LogicalKey::LEFT);
        assert_eq!(sampler.sample(), LogicalKey::LEFT);
        assert_eq!(sampler.sample(), LogicalKey::empty());
    }

    #[test]
    fn test_release_events_hold_until_released() {
        let mut sampler = KeyboardSampler::new().with_release_events(true);
        sampler.handle_event(event(KeyCode::Down, KeyEventKind::Press));
        sampler.handle_event(event(KeyCode::Char('x'), KeyEventKind::Press));
        for _ in 0..100 {
            assert_eq!(sampler.sample(), LogicalKey::DOWN | LogicalKey::ROTATE_RIGHT);
        }

        sampler.handle_event(event(KeyCode::Down, KeyEventKind::Release));
        assert_eq!(sampler.sample(), LogicalKey::ROTATE_RIGHT);
    }

    #[test]
    fn test_unmapped_keys_are_ignored() {
        let mut sampler = KeyboardSampler::new();
        assert!(!sampler.handle_event(event(KeyCode::Char('m'), KeyEventKind::Press)));
        assert_eq!(sampler.sample(), LogicalKey::empty());
    }

    #[test]
    fn test_clear_drops_keys_held_by_release_events() {
        let mut sampler = KeyboardSampler::new().with_release_events(true);
        sampler.handle_event(event(KeyCode::Right, KeyEventKind::Press));
        assert_eq!(sampler.sample(), LogicalKey::RIGHT);

        // No release arrives for a key let go while unfocused.
        sampler.clear();
        assert_eq!(sampler.sample(), LogicalKey::empty());

        sampler.handle_event(event(KeyCode::Right, KeyEventKind::Press));
        assert_eq!(sampler.sample(), LogicalKey::RIGHT);
    }
}
