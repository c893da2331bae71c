use super::Opcode;
use crate::u4;

pub const DISPLAY_X: usize = 64;
pub const DISPLAY_Y: usize = 32;
/// A type alias for the CHIP-8 display buffer representation
pub type Display<T> = [[T; DISPLAY_X]; DISPLAY_Y];
/// Point-in-time copy of the framebuffer handed to renderers.
pub type Frame = Display<bool>;

/// What a single call to `step` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// An instruction other than a draw was executed.
    Executed(Opcode),
    /// A sprite was drawn; the framebuffer changed.
    Drew,
    /// The machine is waiting for a key press and did not fetch.
    AwaitingKey,
    /// A key press ended the wait and was stored in the target register.
    KeyResolved { key: u4 },
    /// An unknown opcode was skipped under `UnknownOpcodePolicy::Skip`.
    SkippedUnknown { opcode: u16 },
}

/// Execution state of the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// Suspended by Fx0A until a key press is stored in `target`.
    AwaitingKey { target: u4 },
    /// Stopped by an unknown opcode under `UnknownOpcodePolicy::Halt`.
    Halted { opcode: u16 },
}

/// Error types that can occur during CHIP-8 emulation
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Chip8Error {
    #[error("Program is too large ({size} bytes), max size is {max_size} bytes")]
    ProgramTooLarge { size: usize, max_size: usize },

    #[error("Stack overflow: call at {address:#05X} with a full call stack")]
    StackOverflow { address: u16 },

    #[error("Stack underflow: return at {address:#05X} with an empty call stack")]
    StackUnderflow { address: u16 },

    #[error("Unknown opcode {opcode:#06X} at {address:#05X}")]
    UnknownOpcode { opcode: u16, address: u16 },

    #[error("Machine halted after unknown opcode {opcode:#06X}; reset to continue")]
    Halted { opcode: u16 },

    #[error("Invalid key {key:#04X}, keys are 0x0-0xF")]
    InvalidKey { key: u8 },
}
