use super::PROGRAM_START_ADDRESS;
use crate::u4;

/// V0-VF, the index register and the program counter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterFile {
    /// General-purpose registers V0-VF (VF is used as a flag register)
    pub(crate) v: [u8; 16],
    /// Index register: used for memory operations
    pub(crate) i: u16,
    /// Program counter: address of the next instruction to execute
    pub(crate) pc: u16,
}

impl RegisterFile {
    pub fn new() -> Self {
        Self {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START_ADDRESS as u16,
        }
    }

    pub fn get(&self, x: u4) -> u8 {
        self.v[x]
    }

    pub fn set(&mut self, x: u4, value: u8) {
        self.v[x] = value;
    }

    pub(crate) fn set_flag(&mut self, flag: bool) {
        self.v[0xF] = flag as u8;
    }

    pub fn v(&self) -> &[u8; 16] {
        &self.v
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Moves PC over the next instruction.
    pub(crate) fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}
