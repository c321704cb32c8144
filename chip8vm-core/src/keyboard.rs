use std::collections::VecDeque;
use std::io;

pub const KEY_COUNT: usize = 16;

/// Conventional QWERTY layout for the COSMAC hex keypad:
///
/// ```text
/// 1 2 3 4      1 2 3 C
/// q w e r  ->  4 5 6 D
/// a s d f      7 8 9 E
/// z x c v      A 0 B F
/// ```
pub const QWERTY_KEYMAP: [(char, u8); KEY_COUNT] = [
    ('x', 0x0),
    ('1', 0x1),
    ('2', 0x2),
    ('3', 0x3),
    ('q', 0x4),
    ('w', 0x5),
    ('e', 0x6),
    ('a', 0x7),
    ('s', 0x8),
    ('d', 0x9),
    ('z', 0xA),
    ('c', 0xB),
    ('4', 0xC),
    ('r', 0xD),
    ('f', 0xE),
    ('v', 0xF),
];

pub fn key_for_char(c: char) -> Option<u8> {
    let c = c.to_ascii_lowercase();
    QWERTY_KEYMAP
        .iter()
        .find(|(mapped, _)| *mapped == c)
        .map(|&(_, key)| key)
}

/// State of the 16 hex keys. Key indices are taken modulo 16.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn set(&mut self, key: u8, pressed: bool) {
        self.keys[(key & 0x0F) as usize] = pressed;
    }

    pub fn press(&mut self, key: u8) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: u8) {
        self.set(key, false);
    }

    pub fn release_all(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0x0F) as usize]
    }

    /// Lowest-numbered key currently held.
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&pressed| pressed).map(|key| key as u8)
    }
}

/// What the host should do after polling input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Source of key events, polled once per frame.
pub trait Chip8Keyboard {
    fn update(&mut self, keypad: &mut Keypad) -> io::Result<Control>;
}

/// Plays back a fixed list of held-key sets, one per frame, then quits.
#[derive(Debug, Default)]
pub struct ScriptedKeyboard {
    frames: VecDeque<Vec<u8>>,
}

impl ScriptedKeyboard {
    pub fn new<I: IntoIterator<Item = Vec<u8>>>(frames: I) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }
}

impl Chip8Keyboard for ScriptedKeyboard {
    fn update(&mut self, keypad: &mut Keypad) -> io::Result<Control> {
        let Some(held) = self.frames.pop_front() else {
            return Ok(Control::Quit);
        };
        keypad.release_all();
        for key in held {
            keypad.press(key);
        }
        Ok(Control::Continue)
    }
}

/// No input; never asks to stop.
#[derive(Debug, Default)]
pub struct NoKeyboard;

impl Chip8Keyboard for NoKeyboard {
    fn update(&mut self, _keypad: &mut Keypad) -> io::Result<Control> {
        Ok(Control::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_pressed_scans_upwards() {
        let mut keypad = Keypad::default();
        assert_eq!(keypad.first_pressed(), None);
        keypad.press(0xB);
        keypad.press(0x4);
        assert_eq!(keypad.first_pressed(), Some(0x4));
        keypad.release(0x4);
        assert_eq!(keypad.first_pressed(), Some(0xB));
    }

    #[test]
    fn out_of_range_keys_are_masked() {
        let mut keypad = Keypad::default();
        keypad.press(0x13);
        assert!(keypad.is_pressed(0x3));
        assert!(keypad.is_pressed(0xF3));
    }

    #[test]
    fn qwerty_map_covers_every_key_once() {
        let mut seen = [false; KEY_COUNT];
        for (_, key) in QWERTY_KEYMAP {
            assert!(!seen[key as usize], "key {key:X} mapped twice");
            seen[key as usize] = true;
        }
        assert_eq!(key_for_char('V'), Some(0xF));
        assert_eq!(key_for_char('4'), Some(0xC));
        assert_eq!(key_for_char('p'), None);
    }

    #[test]
    fn scripted_keyboard_replays_then_quits() {
        let mut keyboard = ScriptedKeyboard::new([vec![0x1, 0x2], vec![]]);
        let mut keypad = Keypad::default();
        assert_eq!(keyboard.update(&mut keypad).unwrap(), Control::Continue);
        assert!(keypad.is_pressed(0x1) && keypad.is_pressed(0x2));
        assert_eq!(keyboard.update(&mut keypad).unwrap(), Control::Continue);
        assert_eq!(keypad.first_pressed(), None);
        assert_eq!(keyboard.update(&mut keypad).unwrap(), Control::Quit);
    }
}
