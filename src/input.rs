use crate::error::ConfigurationError;
use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers};
use log::{debug, trace};
use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

/// what `consume_key` hands back when nothing has been pressed since the last
/// time it was asked
pub const NO_KEY: u8 = 0x10;

/// the COSMAC hex keypad
pub const KEY_COUNT: usize = 16;

/// left-hand side of a qwerty keyboard, laid out like the hex keypad
pub const CONVENTIONAL_KEYMAP: [(char, u8); KEY_COUNT] = [
    ('x', 0x00), // x
    ('1', 0x01), // 1
    ('2', 0x02), // 2
    ('3', 0x03), // 3
    ('q', 0x04), // q
    ('w', 0x05), // w
    ('e', 0x06), // e
    ('a', 0x07), // a
    ('s', 0x08), // s
    ('d', 0x09), // d
    ('z', 0x0a), // z
    ('c', 0x0b), // c
    ('4', 0x0c), // 4
    ('r', 0x0d), // r
    ('f', 0x0e), // f
    ('v', 0x0f), // v
];

/// Tracks which of the 16 keys are held (level) and the most recent press that
/// nobody has consumed yet (edge).
///
/// The latch knows nothing about where key events come from; something else
/// calls `on_press`/`on_release` with physical keys.
#[derive(Debug, Clone)]
pub struct KeyboardLatch {
    keymap: HashMap<char, u8>,
    held: [bool; KEY_COUNT],
    latched: Option<u8>,
}

impl KeyboardLatch {
    pub fn new(mapping: &[(char, u8)]) -> Result<Self, ConfigurationError> {
        let mut latch = KeyboardLatch {
            keymap: HashMap::new(),
            held: [false; KEY_COUNT],
            latched: None,
        };
        latch.configure(mapping)?;
        Ok(latch)
    }

    /// replace the key bindings; every id 0x0..=0xf must be bound to exactly
    /// one physical key. Any held or latched state is dropped.
    pub fn configure(&mut self, mapping: &[(char, u8)]) -> Result<(), ConfigurationError> {
        if mapping.len() != KEY_COUNT {
            return Err(ConfigurationError::WrongKeyCount(mapping.len()));
        }
        let mut keymap = HashMap::with_capacity(KEY_COUNT);
        let mut seen = [false; KEY_COUNT];
        for &(key, id) in mapping {
            let slot = seen
                .get_mut(id as usize)
                .ok_or(ConfigurationError::KeyIdOutOfRange(id))?;
            if *slot {
                return Err(ConfigurationError::DuplicateId(id));
            }
            *slot = true;
            if keymap.insert(key, id).is_some() {
                return Err(ConfigurationError::DuplicateKey(key));
            }
        }
        self.keymap = keymap;
        self.held = [false; KEY_COUNT];
        self.latched = None;
        Ok(())
    }

    /// logical id for a physical key, if it's bound
    pub fn id(&self, key: char) -> Option<u8> {
        self.keymap.get(&key).copied()
    }

    /// returns false if the key isn't bound, in which case nothing changes
    pub fn on_press(&mut self, key: char) -> bool {
        match self.id(key) {
            Some(id) => {
                self.held[id as usize] = true;
                self.latched = Some(id);
                true
            }
            None => false,
        }
    }

    /// any bound key going up clears the latched press, even if the latched
    /// key itself is still down
    pub fn on_release(&mut self, key: char) -> bool {
        match self.id(key) {
            Some(id) => {
                self.held[id as usize] = false;
                self.latched = None;
                true
            }
            None => false,
        }
    }

    pub fn is_down(&self, id: u8) -> bool {
        self.held.get(id as usize).copied().unwrap_or(false)
    }

    /// hand out the latched press exactly once, or `NO_KEY`
    pub fn consume_key(&mut self) -> u8 {
        self.latched.take().unwrap_or(NO_KEY)
    }

    /// forget everything held or latched; bindings stay
    pub fn reset(&mut self) {
        self.held = [false; KEY_COUNT];
        self.latched = None;
    }
}

/// what the frontend should do after draining the terminal's input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Continue,
    Quit,
}

/// Feeds crossterm key events into a `KeyboardLatch`.
///
/// Terminals only report presses (plus auto-repeat), so a key counts as held
/// until `hold` has passed without another event for it, then it's released.
pub struct TermInput {
    hold: Duration,
    last_seen: HashMap<char, Instant>,
}

impl TermInput {
    pub fn new(hold: Duration) -> Self {
        TermInput {
            hold,
            last_seen: HashMap::new(),
        }
    }

    /// drain every pending terminal event without blocking
    pub fn dispatch(&mut self, latch: &mut KeyboardLatch) -> Result<InputAction, io::Error> {
        let mut action = InputAction::Continue;
        while poll(Duration::from_millis(0))? {
            if let Event::Key(evt) = read()? {
                if self.handle_key(latch, evt, Instant::now()) == InputAction::Quit {
                    action = InputAction::Quit;
                }
            }
        }
        self.release_expired(latch, Instant::now());
        Ok(action)
    }

    /// apply one key event as if it arrived at `now`
    pub fn handle_key(
        &mut self,
        latch: &mut KeyboardLatch,
        evt: KeyEvent,
        now: Instant,
    ) -> InputAction {
        match evt.code {
            KeyCode::Esc => InputAction::Quit,
            KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                InputAction::Quit
            }
            KeyCode::Char(key) => {
                let key = key.to_ascii_lowercase();
                if self.last_seen.insert(key, now).is_none() {
                    // auto-repeat of a held key mustn't re-latch it
                    if !latch.on_press(key) {
                        self.last_seen.remove(&key);
                        debug!("ignoring unmapped key {:?}", key);
                    }
                }
                InputAction::Continue
            }
            other => {
                trace!("ignoring key event {:?}", other);
                InputAction::Continue
            }
        }
    }

    /// release every key that hasn't been seen for the hold time
    pub fn release_expired(&mut self, latch: &mut KeyboardLatch, now: Instant) {
        let hold = self.hold;
        self.last_seen.retain(|&key, &mut seen| {
            if now.saturating_duration_since(seen) >= hold {
                latch.on_release(key);
                false
            } else {
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latch() -> KeyboardLatch {
        KeyboardLatch::new(&CONVENTIONAL_KEYMAP).unwrap()
    }

    #[test]
    fn test_conventional_keymap_accepted() {
        let l = latch();
        assert_eq!(l.id('x'), Some(0x00));
        assert_eq!(l.id('w'), Some(0x05));
        assert_eq!(l.id('v'), Some(0x0f));
        assert_eq!(l.id('p'), None);
    }

    #[test]
    fn test_configure_rejects_duplicate_id() {
        let mut map = CONVENTIONAL_KEYMAP;
        map[1] = ('1', 0x00);
        assert_eq!(
            KeyboardLatch::new(&map).unwrap_err(),
            ConfigurationError::DuplicateId(0x00)
        );
    }

    #[test]
    fn test_configure_rejects_duplicate_key() {
        let mut map = CONVENTIONAL_KEYMAP;
        map[1] = ('x', 0x01);
        assert_eq!(
            KeyboardLatch::new(&map).unwrap_err(),
            ConfigurationError::DuplicateKey('x')
        );
    }

    #[test]
    fn test_configure_rejects_short_or_out_of_range() {
        assert_eq!(
            KeyboardLatch::new(&CONVENTIONAL_KEYMAP[..15]).unwrap_err(),
            ConfigurationError::WrongKeyCount(15)
        );
        let mut map = CONVENTIONAL_KEYMAP;
        map[0] = ('x', 0x10);
        assert_eq!(
            KeyboardLatch::new(&map).unwrap_err(),
            ConfigurationError::KeyIdOutOfRange(0x10)
        );
    }

    #[test]
    fn test_failed_configure_keeps_old_bindings() {
        let mut l = latch();
        let mut map = CONVENTIONAL_KEYMAP;
        map[2] = ('1', 0x02);
        assert!(l.configure(&map).is_err());
        assert_eq!(l.id('2'), Some(0x02));
    }

    #[test]
    fn test_is_down_follows_press_and_release() {
        let mut l = latch();
        assert!(!l.is_down(0x05));
        l.on_press('w');
        assert!(l.is_down(0x05));
        l.on_press('e');
        l.on_release('w');
        assert!(!l.is_down(0x05));
        assert!(l.is_down(0x06));
    }

    #[test]
    fn test_is_down_false_for_unknown_ids() {
        let l = latch();
        assert!(!l.is_down(0x10));
        assert!(!l.is_down(0xff));
    }

    #[test]
    fn test_unmapped_keys_ignored() {
        let mut l = latch();
        assert!(!l.on_press('p'));
        assert!(!l.on_release('p'));
        assert_eq!(l.consume_key(), NO_KEY);
    }

    #[test]
    fn test_consume_once() {
        let mut l = latch();
        assert_eq!(l.consume_key(), NO_KEY);
        l.on_press('w');
        assert_eq!(l.consume_key(), 0x05);
        assert_eq!(l.consume_key(), NO_KEY);
        // still held though
        assert!(l.is_down(0x05));
    }

    #[test]
    fn test_later_press_overwrites_unconsumed() {
        let mut l = latch();
        l.on_press('1');
        l.on_press('2');
        assert_eq!(l.consume_key(), 0x02);
        assert_eq!(l.consume_key(), NO_KEY);
    }

    #[test]
    fn test_release_clears_latch() {
        let mut l = latch();
        l.on_press('w');
        l.on_release('w');
        assert_eq!(l.consume_key(), NO_KEY);
    }

    #[test]
    fn test_release_of_other_key_clears_latch() {
        let mut l = latch();
        l.on_press('q');
        l.on_press('w');
        l.on_release('q');
        assert!(l.is_down(0x05));
        assert_eq!(l.consume_key(), NO_KEY);
    }

    #[test]
    fn test_reset_drops_held_and_latched() {
        let mut l = latch();
        l.on_press('w');
        l.reset();
        assert!(!l.is_down(0x05));
        assert_eq!(l.consume_key(), NO_KEY);
        // bindings survive
        assert_eq!(l.id('w'), Some(0x05));
    }

    #[test]
    fn test_term_input_latches_once_per_hold() {
        let mut l = latch();
        let mut input = TermInput::new(Duration::from_millis(100));
        let t0 = Instant::now();
        let evt = KeyEvent::new(KeyCode::Char('w'), KeyModifiers::NONE);
        input.handle_key(&mut l, evt, t0);
        assert_eq!(l.consume_key(), 0x05);
        // auto-repeat while held
        input.handle_key(&mut l, evt, t0 + Duration::from_millis(30));
        assert_eq!(l.consume_key(), NO_KEY);
        assert!(l.is_down(0x05));
        input.release_expired(&mut l, t0 + Duration::from_millis(200));
        assert!(!l.is_down(0x05));
    }

    #[test]
    fn test_term_input_quit_keys() {
        let mut l = latch();
        let mut input = TermInput::new(Duration::from_millis(100));
        let now = Instant::now();
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(input.handle_key(&mut l, esc, now), InputAction::Quit);
        assert_eq!(input.handle_key(&mut l, ctrl_c, now), InputAction::Quit);
        assert!(!l.is_down(0x0b));
    }
}
