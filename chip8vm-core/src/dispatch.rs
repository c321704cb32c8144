//! Two-level opcode lookup. The high nibble picks either a routine or a group
//! table; groups 0x0, 0x8 and 0xE are keyed by the low nibble and group 0xF by
//! the low byte.

use crate::{ops, Chip8Error, Chip8State, Instruction, OpResult};

pub type Handler = fn(&mut Chip8State, Instruction) -> OpResult;

enum Entry {
    Routine(Handler),
    ByLowNibble(&'static [Option<Handler>; 16]),
    ByLowByte(&'static [Option<Handler>; 256]),
}

const GROUP_0: [Option<Handler>; 16] = {
    let mut table: [Option<Handler>; 16] = [None; 16];
    table[0x0] = Some(ops::clear_screen as Handler);
    table[0xE] = Some(ops::return_from_subroutine as Handler);
    table
};

const GROUP_8: [Option<Handler>; 16] = {
    let mut table: [Option<Handler>; 16] = [None; 16];
    table[0x0] = Some(ops::copy_register as Handler);
    table[0x1] = Some(ops::or_registers as Handler);
    table[0x2] = Some(ops::and_registers as Handler);
    table[0x3] = Some(ops::xor_registers as Handler);
    table[0x4] = Some(ops::add_with_carry as Handler);
    table[0x5] = Some(ops::subtract_with_borrow as Handler);
    table[0x6] = Some(ops::shift_right as Handler);
    table[0x7] = Some(ops::reverse_subtract as Handler);
    table[0xE] = Some(ops::shift_left as Handler);
    table
};

const GROUP_E: [Option<Handler>; 16] = {
    let mut table: [Option<Handler>; 16] = [None; 16];
    table[0xE] = Some(ops::skip_if_key_pressed as Handler);
    table[0x1] = Some(ops::skip_if_key_not_pressed as Handler);
    table
};

const GROUP_F: [Option<Handler>; 256] = {
    let mut table: [Option<Handler>; 256] = [None; 256];
    table[0x07] = Some(ops::read_delay_timer as Handler);
    table[0x0A] = Some(ops::wait_for_key as Handler);
    table[0x15] = Some(ops::set_delay_timer as Handler);
    table[0x18] = Some(ops::set_sound_timer as Handler);
    table[0x1E] = Some(ops::add_to_index as Handler);
    table[0x29] = Some(ops::load_font_glyph as Handler);
    table[0x33] = Some(ops::store_bcd as Handler);
    table[0x55] = Some(ops::store_registers as Handler);
    table[0x65] = Some(ops::load_registers as Handler);
    table
};

static PRIMARY: [Entry; 16] = [
    Entry::ByLowNibble(&GROUP_0),
    Entry::Routine(ops::jump),
    Entry::Routine(ops::call_subroutine),
    Entry::Routine(ops::skip_if_equal_immediate),
    Entry::Routine(ops::skip_if_not_equal_immediate),
    Entry::Routine(ops::skip_if_registers_equal),
    Entry::Routine(ops::load_immediate),
    Entry::Routine(ops::add_immediate),
    Entry::ByLowNibble(&GROUP_8),
    Entry::Routine(ops::skip_if_registers_differ),
    Entry::Routine(ops::load_index),
    Entry::Routine(ops::jump_with_offset),
    Entry::Routine(ops::random),
    Entry::Routine(ops::draw_sprite),
    Entry::ByLowNibble(&GROUP_E),
    Entry::ByLowByte(&GROUP_F),
];

/// Finds the routine registered for this instruction word, if any.
pub fn decode(instruction: Instruction) -> Option<Handler> {
    match &PRIMARY[instruction.primary()] {
        Entry::Routine(handler) => Some(*handler),
        Entry::ByLowNibble(table) => table[instruction.n() as usize],
        Entry::ByLowByte(table) => table[instruction.nn() as usize],
    }
}

/// Runs one instruction. Unregistered words change nothing and come back as
/// `UnknownOpcode`.
pub fn execute(state: &mut Chip8State, instruction: Instruction) -> OpResult {
    match decode(instruction) {
        Some(handler) => handler(state, instruction),
        None => Err(Chip8Error::UnknownOpcode {
            opcode: instruction.word(),
            address: state.instruction_address(),
        }),
    }
}
