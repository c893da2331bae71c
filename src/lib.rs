pub mod cli;
pub mod debugger;
mod nibble;
pub mod vm;

pub use nibble::{NibbleOutOfRange, u4};
