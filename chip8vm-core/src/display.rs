use std::{fmt, io};

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// The 64x32 monochrome screen, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pixels: [bool; DISPLAY_WIDTH * DISPLAY_HEIGHT],
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self {
            pixels: [false; DISPLAY_WIDTH * DISPLAY_HEIGHT],
        }
    }
}

impl Framebuffer {
    pub fn clear(&mut self) {
        self.pixels = [false; DISPLAY_WIDTH * DISPLAY_HEIGHT];
    }

    /// Coordinates wrap around both edges.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[Self::index(x, y)]
    }

    /// XORs one lit sprite pixel onto the screen. Returns true when this turned
    /// a lit pixel off.
    pub fn toggle(&mut self, x: usize, y: usize) -> bool {
        let index = Self::index(x, y);
        let collided = self.pixels[index];
        self.pixels[index] = !collided;
        collided
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.pixels.chunks(DISPLAY_WIDTH)
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|&&lit| lit).count()
    }

    fn index(x: usize, y: usize) -> usize {
        (y % DISPLAY_HEIGHT) * DISPLAY_WIDTH + x % DISPLAY_WIDTH
    }
}

impl fmt::Display for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for &lit in row {
                f.write_str(if lit { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Anything that can show a frame: a terminal, a window, or nothing at all.
pub trait Chip8Display {
    fn present(&mut self, framebuffer: &Framebuffer) -> io::Result<()>;
}

/// Swallows frames. Used headless and in tests.
#[derive(Debug, Default)]
pub struct NullDisplay {
    pub frames_presented: u64,
}

impl Chip8Display for NullDisplay {
    fn present(&mut self, _framebuffer: &Framebuffer) -> io::Result<()> {
        self.frames_presented += 1;
        Ok(())
    }
}
