//! Multi-instruction programs: subroutines, sprites, and whole runs.

use chip8vm_core::{Chip8Error, Chip8State, STACK_SIZE};

fn machine_with(program: &[u8]) -> Chip8State {
    let mut state = Chip8State::with_seed(1);
    state.load_program(program).unwrap();
    state
}

/// Assemble big-endian instruction words into a program image.
fn assemble(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_be_bytes()).collect()
}

#[test]
fn test_end_to_end_matching_skip_passes_over_jump() {
    // 6A02: VA = 2; 3A02: skip if VA == 2; 1204: jump to self
    let mut state = machine_with(&assemble(&[0x6A02, 0x3A02, 0x1204]));
    state.run_cycles(2);
    assert_eq!(state.register(0xA), 2);
    assert_eq!(state.program_counter, 0x206, "the skip steps over 0x204");
}

#[test]
fn test_end_to_end_spin_at_0x204() {
    // 6A02: VA = 2; 4A02: skip if VA != 2 (not taken); 1204: jump to self
    let mut state = machine_with(&assemble(&[0x6A02, 0x4A02, 0x1204]));
    state.delay_timer = 100;
    state.run_cycles(2);
    assert_eq!(state.register(0xA), 2);
    assert_eq!(state.program_counter, 0x204);

    let registers = state.data_registers;
    let memory = state.memory;
    assert!(state.run_cycles(50).is_empty());
    assert_eq!(state.program_counter, 0x204);
    assert_eq!(state.data_registers, registers);
    assert_eq!(state.memory, memory);
    assert_eq!(state.delay_timer, 48, "only the timers move");
}

#[test]
fn test_call_and_return() {
    // 0x200: 2206 call; 0x202: 6101; 0x204: 1204 spin; 0x206: 6007; 0x208: 00EE
    let mut state = machine_with(&assemble(&[0x2206, 0x6101, 0x1204, 0x6007, 0x00EE]));
    state.cycle().unwrap();
    assert_eq!(state.program_counter, 0x206);
    assert_eq!(state.stack_pointer, 1);
    assert_eq!(state.stack[0], 0x202);

    state.run_cycles(2);
    assert_eq!(state.program_counter, 0x202);
    assert_eq!(state.stack_pointer, 0);
    assert_eq!(state.register(0), 7);

    state.run_cycles(2);
    assert_eq!(state.register(1), 1);
    assert_eq!(state.program_counter, 0x204);
}

#[test]
fn test_stack_depth_limit() {
    // 0x200: 2200 calls itself forever
    let mut state = machine_with(&assemble(&[0x2200]));
    for depth in 1..=STACK_SIZE {
        state.cycle().unwrap();
        assert_eq!(state.stack_pointer as usize, depth);
        assert_eq!(state.program_counter, 0x200);
    }

    let stack = state.stack;
    let result = state.cycle();
    assert_eq!(result, Err(Chip8Error::StackOverflow { address: 0x200 }));
    assert_eq!(state.stack_pointer as usize, STACK_SIZE);
    assert_eq!(state.stack, stack);
    assert_eq!(state.program_counter, 0x202, "no jump on overflow");
}

#[test]
fn test_stack_unwinds_then_underflows() {
    let mut state = machine_with(&[]);
    // a full stack of returns into a lone 00EE at 0x300
    for slot in 0..STACK_SIZE {
        state.stack[slot] = 0x300;
    }
    state.stack_pointer = STACK_SIZE as u8;
    state.memory[0x300] = 0x00;
    state.memory[0x301] = 0xEE;
    state.program_counter = 0x300;

    for depth in (0..STACK_SIZE).rev() {
        state.cycle().unwrap();
        assert_eq!(state.stack_pointer as usize, depth);
        assert_eq!(state.program_counter, 0x300);
    }

    let result = state.cycle();
    assert_eq!(result, Err(Chip8Error::StackUnderflow { address: 0x300 }));
    assert_eq!(state.stack_pointer, 0);
    assert_eq!(state.program_counter, 0x302, "only the fetch advance");
}

#[test]
fn test_draw_twice_erases_and_collides() {
    // A050: I = 0x050 (glyph "0"); D015 twice
    let mut state = machine_with(&assemble(&[0xA050, 0xD015, 0xD015]));
    state.data_registers[0] = 10;
    state.data_registers[1] = 5;

    state.run_cycles(2);
    assert_eq!(state.register(0xF), 0);
    // glyph 0 is F0 90 90 90 F0: 4 + 2 + 2 + 2 + 4 pixels
    assert_eq!(state.framebuffer.lit_count(), 14);
    assert!(state.framebuffer.pixel(10, 5));
    assert!(state.framebuffer.pixel(13, 9));
    assert!(!state.framebuffer.pixel(11, 6));

    state.cycle().unwrap();
    assert_eq!(state.register(0xF), 1);
    assert_eq!(state.framebuffer.lit_count(), 0);
}

#[test]
fn test_draw_wraps_at_bottom_right_corner() {
    // I points at a 2-row sprite of solid bytes
    let mut state = machine_with(&assemble(&[0xA300, 0xD012]));
    state.memory[0x300] = 0xFF;
    state.memory[0x301] = 0xFF;
    state.data_registers[0] = 63;
    state.data_registers[1] = 31;
    state.run_cycles(2);

    assert_eq!(state.framebuffer.lit_count(), 16);
    assert!(state.framebuffer.pixel(63, 31));
    assert!(state.framebuffer.pixel(0, 31));
    assert!(state.framebuffer.pixel(6, 31));
    assert!(state.framebuffer.pixel(63, 0));
    assert!(state.framebuffer.pixel(6, 0));
    assert!(!state.framebuffer.pixel(7, 0));
    assert_eq!(state.register(0xF), 0);
}

#[test]
fn test_draw_zero_rows_still_clears_flag() {
    let mut state = machine_with(&assemble(&[0xD010]));
    state.data_registers[0xF] = 1;
    state.cycle().unwrap();
    assert_eq!(state.register(0xF), 0);
    assert_eq!(state.framebuffer.lit_count(), 0);
}

#[test]
fn test_draw_partial_overlap_sets_flag() {
    // draw glyph "1" then glyph "7" at the same spot
    let mut state = machine_with(&assemble(&[0xA055, 0xD015, 0xA073, 0xD015]));
    state.run_cycles(4);
    assert_eq!(state.register(0xF), 1);
}

#[test]
fn test_draw_reads_sprite_through_wrapped_index() {
    let mut state = machine_with(&assemble(&[0xD001]));
    state.index_register = 0x1300;
    state.memory[0x300] = 0x80;
    state.cycle().unwrap();
    assert!(state.framebuffer.pixel(0, 0));
    assert_eq!(state.framebuffer.lit_count(), 1);
}

#[test]
fn test_draw_uses_flag_register_coordinate_before_clearing_it() {
    // DF11: x = VF, y = V1, one row of the byte at 0x300
    let mut state = machine_with(&assemble(&[0xA300, 0xDF11]));
    state.memory[0x300] = 0x80;
    state.data_registers[0xF] = 10;
    state.data_registers[1] = 3;
    state.run_cycles(2);

    assert!(state.framebuffer.pixel(10, 3), "drawn at x = old VF");
    assert!(!state.framebuffer.pixel(0, 3));
    assert_eq!(state.framebuffer.lit_count(), 1);
    assert_eq!(state.register(0xF), 0, "no collision");
}

#[test]
fn test_countdown_program_prints_digits() {
    // Count V0 from 3 down to 1, drawing each digit's glyph in the same place.
    let program = assemble(&[
        0x6003, // 200: V0 = 3
        0x6101, // 202: V1 = 1
        0x00E0, // 204: clear
        0xF029, // 206: I = glyph(V0)
        0x6200, // 208: V2 = 0
        0xD225, // 20A: draw at (0, 0)
        0x8015, // 20C: V0 -= V1
        0x3000, // 20E: skip if V0 == 0
        0x1204, // 210: loop
        0x1212, // 212: spin
    ]);
    let mut state = machine_with(&program);
    let faults = state.run_cycles(100);
    assert!(faults.is_empty(), "{faults:?}");
    assert_eq!(state.program_counter, 0x212);
    assert_eq!(state.register(0), 0);
    // glyph 1: 20 60 20 20 70 => 1 + 2 + 1 + 1 + 3 pixels
    assert_eq!(state.framebuffer.lit_count(), 8);
    assert!(state.framebuffer.pixel(2, 0));
    assert!(!state.framebuffer.pixel(0, 0));
}
