//! The instruction set. Every routine runs after the program counter has been
//! advanced past its own instruction, so a skip adds another 2 and a jump just
//! overwrites it.

use chip8vm_macros::opcode;

use crate::{Chip8Error, Chip8State, FONT_START, GLYPH_HEIGHT, STACK_SIZE};

//00E0
#[opcode]
pub fn clear_screen(state: &mut Chip8State) {
    state.framebuffer.clear();
}

//00EE
#[opcode]
pub fn return_from_subroutine(state: &mut Chip8State) -> Result<(), Chip8Error> {
    if state.stack_pointer == 0 {
        return Err(Chip8Error::StackUnderflow {
            address: state.instruction_address(),
        });
    }
    state.stack_pointer -= 1;
    state.program_counter = state.stack[state.stack_pointer as usize];
    Ok(())
}

//1NNN
#[opcode]
pub fn jump(state: &mut Chip8State, #[nnn] address: u16) {
    state.program_counter = address;
}

//2NNN
#[opcode]
pub fn call_subroutine(state: &mut Chip8State, #[nnn] address: u16) -> Result<(), Chip8Error> {
    if state.stack_pointer as usize >= STACK_SIZE {
        return Err(Chip8Error::StackOverflow {
            address: state.instruction_address(),
        });
    }
    state.stack[state.stack_pointer as usize] = state.program_counter;
    state.stack_pointer += 1;
    state.program_counter = address;
    Ok(())
}

fn skip_if(state: &mut Chip8State, condition: bool) {
    if condition {
        state.program_counter = state.program_counter.wrapping_add(2);
    }
}

//3XNN
#[opcode]
pub fn skip_if_equal_immediate(state: &mut Chip8State, #[x] x: usize, #[nn] value: u8) {
    let condition = state.register(x) == value;
    skip_if(state, condition);
}

//4XNN
#[opcode]
pub fn skip_if_not_equal_immediate(state: &mut Chip8State, #[x] x: usize, #[nn] value: u8) {
    let condition = state.register(x) != value;
    skip_if(state, condition);
}

//5XY0
#[opcode]
pub fn skip_if_registers_equal(state: &mut Chip8State, #[x] x: usize, #[y] y: usize) {
    let condition = state.register(x) == state.register(y);
    skip_if(state, condition);
}

//6XNN
#[opcode]
pub fn load_immediate(state: &mut Chip8State, #[x] x: usize, #[nn] value: u8) {
    *state.register_mut(x) = value;
}

//7XNN, no flag
#[opcode]
pub fn add_immediate(state: &mut Chip8State, #[x] x: usize, #[nn] value: u8) {
    *state.register_mut(x) = state.register(x).wrapping_add(value);
}

//8XY0
#[opcode]
pub fn copy_register(state: &mut Chip8State, #[x] x: usize, #[y] y: usize) {
    *state.register_mut(x) = state.register(y);
}

//8XY1
#[opcode]
pub fn or_registers(state: &mut Chip8State, #[x] x: usize, #[y] y: usize) {
    *state.register_mut(x) |= state.register(y);
}

//8XY2
#[opcode]
pub fn and_registers(state: &mut Chip8State, #[x] x: usize, #[y] y: usize) {
    *state.register_mut(x) &= state.register(y);
}

//8XY3
#[opcode]
pub fn xor_registers(state: &mut Chip8State, #[x] x: usize, #[y] y: usize) {
    *state.register_mut(x) ^= state.register(y);
}

// In 8XY4..8XYE the flag is written before Vx. With X = F the result wins, and
// 8XY5/8XY6/8XY7/8XYE compute it from the registers after the flag landed.

//8XY4
#[opcode]
pub fn add_with_carry(state: &mut Chip8State, #[x] x: usize, #[y] y: usize) {
    let (result, carry) = state.register(x).overflowing_add(state.register(y));
    state.set_flag(carry);
    *state.register_mut(x) = result;
}

//8XY5
#[opcode]
pub fn subtract_with_borrow(state: &mut Chip8State, #[x] x: usize, #[y] y: usize) {
    state.set_flag(state.register(x) > state.register(y));
    *state.register_mut(x) = state.register(x).wrapping_sub(state.register(y));
}

//8XY6
#[opcode]
pub fn shift_right(state: &mut Chip8State, #[x] x: usize) {
    state.set_flag(state.register(x) & 0x01 != 0);
    *state.register_mut(x) = state.register(x) >> 1;
}

//8XY7
#[opcode]
pub fn reverse_subtract(state: &mut Chip8State, #[x] x: usize, #[y] y: usize) {
    state.set_flag(state.register(y) > state.register(x));
    *state.register_mut(x) = state.register(y).wrapping_sub(state.register(x));
}

//8XYE
#[opcode]
pub fn shift_left(state: &mut Chip8State, #[x] x: usize) {
    state.set_flag(state.register(x) & 0x80 != 0);
    *state.register_mut(x) = state.register(x) << 1;
}

//9XY0, any other low nibble is not an instruction
#[opcode]
pub fn skip_if_registers_differ(
    state: &mut Chip8State,
    #[x] x: usize,
    #[y] y: usize,
    #[n] variant: u8,
    #[word] word: u16,
) -> Result<(), Chip8Error> {
    if variant != 0 {
        return Err(Chip8Error::UnknownOpcode {
            opcode: word,
            address: state.instruction_address(),
        });
    }
    let condition = state.register(x) != state.register(y);
    skip_if(state, condition);
    Ok(())
}

//ANNN
#[opcode]
pub fn load_index(state: &mut Chip8State, #[nnn] address: u16) {
    state.index_register = address;
}

//BNNN
#[opcode]
pub fn jump_with_offset(state: &mut Chip8State, #[nnn] address: u16) {
    state.program_counter = address + state.register(0x0) as u16;
}

//CXNN
#[opcode]
pub fn random(state: &mut Chip8State, #[x] x: usize, #[nn] mask: u8) {
    let value = state.random_byte() & mask;
    *state.register_mut(x) = value;
}

//DXYN
/// XOR-draws an N-row sprite from memory at I. Sprites wrap around both screen
/// edges; VF reports whether any lit pixel was turned off.
#[opcode]
pub fn draw_sprite(state: &mut Chip8State, #[x] x: usize, #[y] y: usize, #[n] rows: u8) {
    let origin_x = state.register(x) as usize;
    let origin_y = state.register(y) as usize;
    state.set_flag(false);

    let mut collision = false;
    for row in 0..rows as u16 {
        let sprite_byte = state.read_byte(state.index_register.wrapping_add(row));
        for col in 0..8 {
            if sprite_byte & (0x80 >> col) != 0 {
                collision |= state
                    .framebuffer
                    .toggle(origin_x + col, origin_y + row as usize);
            }
        }
    }
    state.set_flag(collision);
}

//EX9E, key index is the low nibble of Vx
#[opcode]
pub fn skip_if_key_pressed(state: &mut Chip8State, #[x] x: usize) {
    let condition = state.keypad.is_pressed(state.register(x));
    skip_if(state, condition);
}

//EXA1
#[opcode]
pub fn skip_if_key_not_pressed(state: &mut Chip8State, #[x] x: usize) {
    let condition = !state.keypad.is_pressed(state.register(x));
    skip_if(state, condition);
}

//FX07
#[opcode]
pub fn read_delay_timer(state: &mut Chip8State, #[x] x: usize) {
    *state.register_mut(x) = state.delay_timer;
}

//FX0A
/// Stores the lowest held key in Vx. With nothing held the program counter is
/// wound back so this instruction runs again next cycle.
#[opcode]
pub fn wait_for_key(state: &mut Chip8State, #[x] x: usize) {
    match state.keypad.first_pressed() {
        Some(key) => *state.register_mut(x) = key,
        None => state.program_counter = state.program_counter.wrapping_sub(2),
    }
}

//FX15
#[opcode]
pub fn set_delay_timer(state: &mut Chip8State, #[x] x: usize) {
    state.delay_timer = state.register(x);
}

//FX18
#[opcode]
pub fn set_sound_timer(state: &mut Chip8State, #[x] x: usize) {
    state.sound_timer = state.register(x);
}

//FX1E, VF untouched
#[opcode]
pub fn add_to_index(state: &mut Chip8State, #[x] x: usize) {
    state.index_register = state.index_register.wrapping_add(state.register(x) as u16);
}

//FX29
#[opcode]
pub fn load_font_glyph(state: &mut Chip8State, #[x] x: usize) {
    let digit = (state.register(x) & 0x0F) as u16;
    state.index_register = FONT_START + digit * GLYPH_HEIGHT;
}

//FX33
#[opcode]
pub fn store_bcd(state: &mut Chip8State, #[x] x: usize) {
    let value = state.register(x);
    let index = state.index_register;
    state.write_byte(index, value / 100);
    state.write_byte(index.wrapping_add(1), value / 10 % 10);
    state.write_byte(index.wrapping_add(2), value % 10);
}

//FX55
#[opcode]
pub fn store_registers(state: &mut Chip8State, #[x] x: usize) {
    let index = state.index_register;
    for i in 0..=x {
        state.write_byte(index.wrapping_add(i as u16), state.register(i));
    }
}

//FX65
#[opcode]
pub fn load_registers(state: &mut Chip8State, #[x] x: usize) {
    let index = state.index_register;
    for i in 0..=x {
        *state.register_mut(i) = state.read_byte(index.wrapping_add(i as u16));
    }
}
