mod config;
mod display;
mod execute;
mod font;
mod keypad;
mod machine;
mod memory;
mod opcode;
mod registers;
mod runner;
mod shared;
mod stack;
mod timers;
mod types;

pub use config::*;
pub use display::*;
pub use font::*;
pub use keypad::*;
pub use machine::*;
pub use memory::*;
pub use opcode::*;
pub use registers::*;
pub use runner::*;
pub use shared::*;
pub use stack::*;
pub use timers::*;
pub use types::*;
