use super::{Chip8Error, FONT, FONT_END_ADDRESS, FONT_START_ADDRESS};

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START_ADDRESS: usize = 0x200;
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START_ADDRESS;

const ADDRESS_MASK: u16 = 0x0FFF;

/// 4KB of byte-addressable memory.
///
/// Every address is masked to 12 bits, so reads and writes wrap around
/// instead of failing.
#[derive(Clone)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    /// Creates zeroed memory with the font installed.
    pub fn new() -> Self {
        let mut memory = Memory {
            bytes: [0; MEMORY_SIZE],
        };
        memory.bytes[FONT_START_ADDRESS..FONT_END_ADDRESS].copy_from_slice(&FONT);
        memory
    }

    pub fn read_byte(&self, addr: u16) -> u8 {
        self.bytes[(addr & ADDRESS_MASK) as usize]
    }

    pub fn write_byte(&mut self, addr: u16, value: u8) {
        self.bytes[(addr & ADDRESS_MASK) as usize] = value;
    }

    /// Reads a big-endian word, the second byte wrapping to 0x000 after 0xFFF.
    pub fn read_word(&self, addr: u16) -> u16 {
        let high = self.read_byte(addr);
        let low = self.read_byte(addr.wrapping_add(1));

        u16::from_be_bytes([high, low])
    }

    /// Copies a program to the program area, leaving memory untouched on failure.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Chip8Error> {
        let program_end = PROGRAM_START_ADDRESS + program.len();
        self.bytes
            .get_mut(PROGRAM_START_ADDRESS..program_end)
            .ok_or(Chip8Error::ProgramTooLarge {
                size: program.len(),
                max_size: MAX_PROGRAM_SIZE,
            })?
            .copy_from_slice(program);

        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_is_installed_on_construction() {
        let memory = Memory::new();
        assert_eq!(
            &memory.as_slice()[FONT_START_ADDRESS..FONT_END_ADDRESS],
            &FONT[..]
        );
    }

    #[test]
    fn addresses_wrap_to_twelve_bits() {
        let mut memory = Memory::new();
        memory.write_byte(0x1234, 0xAB);
        assert_eq!(memory.read_byte(0x234), 0xAB);

        memory.write_byte(0xFFF, 0x12);
        memory.write_byte(0x000, 0x34);
        assert_eq!(memory.read_word(0xFFF), 0x1234);
    }

    #[test]
    fn program_loads_at_0x200() {
        let mut memory = Memory::new();
        memory.load_program(&[0x12, 0x34, 0x56]).unwrap();
        assert_eq!(memory.read_word(0x200), 0x1234);
        assert_eq!(memory.read_byte(0x202), 0x56);
    }

    #[test]
    fn program_filling_memory_exactly_fits() {
        let mut memory = Memory::new();
        let program = vec![0xEE; MAX_PROGRAM_SIZE];
        assert!(memory.load_program(&program).is_ok());
        assert_eq!(memory.read_byte(0xFFF), 0xEE);
    }

    #[test]
    fn oversized_program_is_rejected_without_writing() {
        let mut memory = Memory::new();
        let program = vec![0xEE; MAX_PROGRAM_SIZE + 1];

        let err = memory.load_program(&program).unwrap_err();
        assert!(matches!(
            err,
            Chip8Error::ProgramTooLarge { size, max_size }
                if size == MAX_PROGRAM_SIZE + 1 && max_size == MAX_PROGRAM_SIZE
        ));
        assert_eq!(memory.read_byte(0x200), 0);
    }
}
