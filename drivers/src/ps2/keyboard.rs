//! Scancode set 1 decoder with edge detection.

use flux_abi::input::{Event, EventSink, KeyEvent, Modifiers};

pub const SCANCODE_RELEASE: u8 = 0x80;
pub const SCANCODE_EXTENDED: u8 = 0xE0;
pub const SCANCODE_PAUSE_PREFIX: u8 = 0xE1;

pub const KEY_ESCAPE: u8 = 0x01;
pub const KEY_ENTER: u8 = 0x1C;
pub const KEY_CTRL: u8 = 0x1D;
pub const KEY_LEFT_SHIFT: u8 = 0x2A;
pub const KEY_RIGHT_SHIFT: u8 = 0x36;
pub const KEY_ALT: u8 = 0x38;
pub const KEY_SPACE: u8 = 0x39;
pub const KEY_CAPS_LOCK: u8 = 0x3A;
pub const KEY_F4: u8 = 0x3E;
pub const KEY_F11: u8 = 0x57;

const KEY_COUNT: usize = 128;

// US layout, indexed by make code.
const KEYMAP: &[u8; 58] =
    b"\0\x1b1234567890-=\x08\tqwertyuiop[]\n\0asdfghjkl;'`\0\\zxcvbnm,./\0*\0 ";
const KEYMAP_SHIFTED: &[u8; 58] =
    b"\0\x1b!@#$%^&*()_+\x08\tQWERTYUIOP{}\n\0ASDFGHJKL:\"~\0|ZXCVBNM<>?\0*\0 ";

#[derive(Debug, Clone)]
pub struct KeyboardState {
    pub last_scancode: u8,
    shift_left: bool,
    shift_right: bool,
    ctrl: bool,
    alt: bool,
    caps_lock: bool,
    pressed: [bool; KEY_COUNT],
}

impl KeyboardState {
    const fn new() -> Self {
        Self {
            last_scancode: 0,
            shift_left: false,
            shift_right: false,
            ctrl: false,
            alt: false,
            caps_lock: false,
            pressed: [false; KEY_COUNT],
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        let mut mods = Modifiers::empty();
        mods.set(Modifiers::SHIFT, self.shift_left || self.shift_right);
        mods.set(Modifiers::CTRL, self.ctrl);
        mods.set(Modifiers::ALT, self.alt);
        mods.set(Modifiers::CAPS_LOCK, self.caps_lock);
        mods
    }

    #[inline]
    pub fn is_pressed(&self, make_code: u8) -> bool {
        self.pressed[(make_code & 0x7F) as usize]
    }
}

#[inline(always)]
fn is_break_code(scancode: u8) -> bool {
    scancode & SCANCODE_RELEASE != 0
}

#[inline(always)]
fn get_make_code(scancode: u8) -> u8 {
    scancode & !SCANCODE_RELEASE
}

/// ASCII for `make_code` under `mods`, or 0.
pub fn translate(make_code: u8, mods: Modifiers) -> u8 {
    let idx = make_code as usize;
    if idx >= KEYMAP.len() {
        return 0;
    }
    let base = KEYMAP[idx];
    let shift = mods.contains(Modifiers::SHIFT);
    if base.is_ascii_lowercase() {
        let upper = shift ^ mods.contains(Modifiers::CAPS_LOCK);
        return if upper { base.to_ascii_uppercase() } else { base };
    }
    if shift { KEYMAP_SHIFTED[idx] } else { base }
}

pub struct KeyboardDecoder {
    state: KeyboardState,
}

impl Default for KeyboardDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyboardDecoder {
    pub const fn new() -> Self {
        Self {
            state: KeyboardState::new(),
        }
    }

    #[inline]
    pub fn state(&self) -> &KeyboardState {
        &self.state
    }

    #[inline]
    pub fn modifiers(&self) -> Modifiers {
        self.state.modifiers()
    }

    /// Feed one scancode. Returns `true` if a key event was posted.
    ///
    /// Modifier flags follow every scancode, repeats included; the
    /// `KeyDown`/`KeyUp` events themselves only fire on a change of the
    /// key's pressed state, so typematic repeats are swallowed here.
    pub fn feed<S: EventSink + ?Sized>(&mut self, scancode: u8, sink: &mut S) -> bool {
        if scancode == SCANCODE_EXTENDED || scancode == SCANCODE_PAUSE_PREFIX {
            return false;
        }

        let released = is_break_code(scancode);
        let code = get_make_code(scancode);
        self.state.last_scancode = scancode;
        self.handle_modifier(code, !released);

        let slot = &mut self.state.pressed[code as usize];
        if *slot != released {
            return false;
        }
        *slot = !released;

        if !released && code == KEY_CAPS_LOCK {
            self.state.caps_lock = !self.state.caps_lock;
        }

        let modifiers = self.state.modifiers();
        let key = KeyEvent {
            scancode: code,
            ascii: translate(code, modifiers),
            modifiers,
        };
        sink.post(if released {
            Event::KeyUp(key)
        } else {
            Event::KeyDown(key)
        });
        true
    }

    fn handle_modifier(&mut self, code: u8, pressed: bool) {
        match code {
            KEY_LEFT_SHIFT => self.state.shift_left = pressed,
            KEY_RIGHT_SHIFT => self.state.shift_right = pressed,
            KEY_CTRL => self.state.ctrl = pressed,
            KEY_ALT => self.state.alt = pressed,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    struct Collect(Vec<Event>);

    impl EventSink for Collect {
        fn post(&mut self, event: Event) {
            self.0.push(event);
        }
    }

    fn feed_all(dec: &mut KeyboardDecoder, codes: &[u8]) -> Vec<Event> {
        let mut sink = Collect(Vec::new());
        for &c in codes {
            dec.feed(c, &mut sink);
        }
        sink.0
    }

    #[test]
    fn test_keymap_lengths_line_up() {
        assert_eq!(KEYMAP[0x1E], b'a');
        assert_eq!(KEYMAP[0x39], b' ');
        assert_eq!(KEYMAP_SHIFTED[0x02], b'!');
        assert_eq!(KEYMAP_SHIFTED[0x35], b'?');
    }

    #[test]
    fn test_press_release_pair() {
        let mut dec = KeyboardDecoder::new();
        let events = feed_all(&mut dec, &[0x1E, 0x9E]);
        let key = KeyEvent {
            scancode: 0x1E,
            ascii: b'a',
            modifiers: Modifiers::empty(),
        };
        assert_eq!(events, [Event::KeyDown(key), Event::KeyUp(key)]);
        assert_eq!(dec.state().last_scancode, 0x9E);
    }

    #[test]
    fn test_repeats_suppressed() {
        let mut dec = KeyboardDecoder::new();
        let events = feed_all(&mut dec, &[0x1E, 0x1E, 0x1E, 0x9E, 0x9E]);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::KeyDown(_)));
        assert!(matches!(events[1], Event::KeyUp(_)));
    }

    #[test]
    fn test_release_without_press_is_silent() {
        let mut dec = KeyboardDecoder::new();
        assert!(feed_all(&mut dec, &[0x9E]).is_empty());
    }

    #[test]
    fn test_shift_applies_before_edge_detection() {
        let mut dec = KeyboardDecoder::new();
        let events = feed_all(&mut dec, &[KEY_LEFT_SHIFT, 0x1E]);
        match events[1] {
            Event::KeyDown(k) => {
                assert_eq!(k.ascii, b'A');
                assert!(k.modifiers.contains(Modifiers::SHIFT));
            }
            other => panic!("unexpected {:?}", other),
        }

        // A repeated shift make code still refreshes the modifier.
        feed_all(&mut dec, &[KEY_LEFT_SHIFT | SCANCODE_RELEASE]);
        assert!(!dec.modifiers().contains(Modifiers::SHIFT));
        feed_all(&mut dec, &[KEY_RIGHT_SHIFT, KEY_RIGHT_SHIFT]);
        assert!(dec.modifiers().contains(Modifiers::SHIFT));
    }

    #[test]
    fn test_two_shift_keys_tracked_independently() {
        let mut dec = KeyboardDecoder::new();
        feed_all(&mut dec, &[KEY_LEFT_SHIFT, KEY_RIGHT_SHIFT, KEY_LEFT_SHIFT | 0x80]);
        assert!(dec.modifiers().contains(Modifiers::SHIFT));
    }

    #[test]
    fn test_caps_lock_affects_letters_only() {
        let mut dec = KeyboardDecoder::new();
        feed_all(&mut dec, &[KEY_CAPS_LOCK, KEY_CAPS_LOCK | 0x80]);
        assert!(dec.modifiers().contains(Modifiers::CAPS_LOCK));
        assert_eq!(translate(0x1E, dec.modifiers()), b'A');
        assert_eq!(translate(0x02, dec.modifiers()), b'1');
        assert_eq!(
            translate(0x1E, dec.modifiers() | Modifiers::SHIFT),
            b'a'
        );
    }

    #[test]
    fn test_alt_and_ctrl() {
        let mut dec = KeyboardDecoder::new();
        let events = feed_all(&mut dec, &[KEY_ALT, KEY_F4]);
        match events[1] {
            Event::KeyDown(k) => {
                assert_eq!(k.scancode, KEY_F4);
                assert_eq!(k.ascii, 0);
                assert!(k.modifiers.contains(Modifiers::ALT));
            }
            other => panic!("unexpected {:?}", other),
        }
        feed_all(&mut dec, &[KEY_CTRL]);
        assert!(dec.modifiers().contains(Modifiers::CTRL | Modifiers::ALT));
    }

    #[test]
    fn test_prefix_bytes_skipped() {
        let mut dec = KeyboardDecoder::new();
        // Right ctrl: E0 1D / E0 9D
        let events = feed_all(&mut dec, &[0xE0, 0x1D, 0xE0, 0x9D]);
        assert_eq!(events.len(), 2);
        assert!(!dec.state().is_pressed(0x60));
        assert!(!dec.modifiers().contains(Modifiers::CTRL));
    }
}
