use std::fmt;

/// A 16-bit instruction word, split into the nibble fields the handlers use.
///
/// ```text
///  15..12  11..8  7..4  3..0
///  primary   x     y     n
///                 \-- nn --/
///         \------ nnn -----/
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction(u16);

impl Instruction {
    pub const fn new(word: u16) -> Self {
        Self(word)
    }

    /// Big-endian: the high byte sits at the lower address.
    pub const fn from_bytes(high: u8, low: u8) -> Self {
        Self(((high as u16) << 8) | low as u16)
    }

    pub const fn word(self) -> u16 {
        self.0
    }

    pub const fn primary(self) -> usize {
        ((self.0 & 0xF000) >> 12) as usize
    }

    pub const fn x(self) -> usize {
        ((self.0 & 0x0F00) >> 8) as usize
    }

    pub const fn y(self) -> usize {
        ((self.0 & 0x00F0) >> 4) as usize
    }

    pub const fn n(self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    pub const fn nn(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    pub const fn nnn(self) -> u16 {
        self.0 & 0x0FFF
    }
}

impl From<u16> for Instruction {
    fn from(word: u16) -> Self {
        Self(word)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}
