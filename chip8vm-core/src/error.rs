/// Faults raised while loading or running a program. None of them are fatal:
/// the machine is left in a consistent state and can keep cycling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Chip8Error {
    /// No routine is registered for this instruction word.
    #[error("unknown opcode 0x{opcode:04X} at 0x{address:03X}")]
    UnknownOpcode { opcode: u16, address: u16 },
    /// `00EE` with an empty stack.
    #[error("stack underflow on return (00EE) at 0x{address:03X}")]
    StackUnderflow { address: u16 },
    /// `2NNN` with all 16 stack slots in use.
    #[error("stack overflow on call (2NNN) at 0x{address:03X}")]
    StackOverflow { address: u16 },
    /// The program image does not fit between 0x200 and the end of memory.
    #[error("program too large: {size} bytes (at most {capacity} fit from 0x200)")]
    ProgramTooLarge { size: usize, capacity: usize },
}

/// Return type of every instruction handler.
pub type OpResult = Result<(), Chip8Error>;
