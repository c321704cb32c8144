//! A CHIP-8 virtual machine.
//!
//! [`Chip8State`] holds the whole machine. [`Chip8State::cycle`] runs one
//! fetch/decode/execute/timer step through the opcode tables in [`dispatch`];
//! the routines themselves live in [`ops`]. Hosts feed keys in through
//! [`Keypad`], read pixels out of [`Framebuffer`], and can hand the frame loop
//! to [`Chip8Interpreter`].

mod cpu;
pub mod dispatch;
mod display;
mod error;
mod instruction;
mod interpreter;
mod keyboard;
pub mod ops;
mod state;

pub use dispatch::Handler;
pub use display::{Chip8Display, Framebuffer, NullDisplay, DISPLAY_HEIGHT, DISPLAY_WIDTH};
pub use error::{Chip8Error, OpResult};
pub use instruction::Instruction;
pub use interpreter::{Chip8Interpreter, InterpreterConfig, RunSummary};
pub use keyboard::{
    key_for_char, Chip8Keyboard, Control, Keypad, NoKeyboard, ScriptedKeyboard, KEY_COUNT,
    QWERTY_KEYMAP,
};
pub use state::{
    Chip8State, FONT, FONT_START, GLYPH_HEIGHT, MEMORY_SIZE, PROGRAM_CAPACITY, PROGRAM_START,
    REGISTER_COUNT, STACK_SIZE,
};
