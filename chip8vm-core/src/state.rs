use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{Chip8Error, Framebuffer, Instruction, Keypad};

pub const MEMORY_SIZE: usize = 4096;
pub const REGISTER_COUNT: usize = 16;
pub const STACK_SIZE: usize = 16;

pub const PROGRAM_START: u16 = 0x200;
pub const FONT_START: u16 = 0x050;
pub const GLYPH_HEIGHT: u16 = 5;

/// Largest program image that fits between `PROGRAM_START` and the end of memory.
pub const PROGRAM_CAPACITY: usize = MEMORY_SIZE - PROGRAM_START as usize;

const ADDRESS_MASK: u16 = (MEMORY_SIZE - 1) as u16;

pub const FONT: [u8; 16 * GLYPH_HEIGHT as usize] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Everything a running CHIP-8 program can observe or change.
///
/// Register 0xF doubles as the carry/borrow/collision flag and is clobbered by
/// arithmetic, shifts and draws. `index_register` may hold values above 0xFFF;
/// every memory access through it wraps at 4 KiB.
#[derive(Debug, Clone)]
pub struct Chip8State {
    pub memory: [u8; MEMORY_SIZE],
    pub data_registers: [u8; REGISTER_COUNT],
    pub index_register: u16,
    pub program_counter: u16,
    pub stack: [u16; STACK_SIZE],
    pub stack_pointer: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub framebuffer: Framebuffer,
    pub keypad: Keypad,
    rng: StdRng,
}

impl Default for Chip8State {
    fn default() -> Self {
        Self::new()
    }
}

impl Chip8State {
    /// Fresh machine with the random source seeded from the OS.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Fresh machine whose `CXNN` results are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut state = Self {
            memory: [0; MEMORY_SIZE],
            data_registers: [0; REGISTER_COUNT],
            index_register: 0,
            program_counter: PROGRAM_START,
            stack: [0; STACK_SIZE],
            stack_pointer: 0,
            delay_timer: 0,
            sound_timer: 0,
            framebuffer: Framebuffer::default(),
            keypad: Keypad::default(),
            rng,
        };
        state.load_font_data(&FONT);
        state
    }

    /// Back to power-on state. The random source carries on where it was.
    pub fn reset(&mut self) {
        let rng = self.rng.clone();
        *self = Self::with_rng(rng);
    }

    fn load_font_data(&mut self, font: &[u8]) {
        let start = FONT_START as usize;
        self.memory[start..start + font.len()].copy_from_slice(font);
    }

    /// Copies a program image to 0x200 and points the program counter at it.
    /// An oversized image leaves the machine untouched.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Chip8Error> {
        if program.len() > PROGRAM_CAPACITY {
            return Err(Chip8Error::ProgramTooLarge {
                size: program.len(),
                capacity: PROGRAM_CAPACITY,
            });
        }
        let start = PROGRAM_START as usize;
        self.memory[start..start + program.len()].copy_from_slice(program);
        self.program_counter = PROGRAM_START;
        Ok(())
    }

    pub fn register(&self, register_index: usize) -> u8 {
        self.data_registers[register_index]
    }

    pub fn register_mut(&mut self, register_index: usize) -> &mut u8 {
        &mut self.data_registers[register_index]
    }

    pub fn set_flag(&mut self, flag: bool) {
        *self.register_mut(0xF) = flag as u8;
    }

    pub fn read_byte(&self, address: u16) -> u8 {
        self.memory[(address & ADDRESS_MASK) as usize]
    }

    pub fn write_byte(&mut self, address: u16, value: u8) {
        self.memory[(address & ADDRESS_MASK) as usize] = value;
    }

    /// Reads the instruction word at the program counter without advancing it.
    pub fn fetch(&self) -> Instruction {
        Instruction::from_bytes(
            self.read_byte(self.program_counter),
            self.read_byte(self.program_counter.wrapping_add(1)),
        )
    }

    /// Address of the instruction being executed. Only meaningful inside a
    /// cycle, after the program counter has moved past it.
    pub fn instruction_address(&self) -> u16 {
        self.program_counter.wrapping_sub(2) & ADDRESS_MASK
    }

    pub fn random_byte(&mut self) -> u8 {
        self.rng.gen::<u8>()
    }

    /// The beeper should sound while this holds.
    pub fn sound_active(&self) -> bool {
        self.sound_timer > 0
    }
}
