use std::fmt;

use crate::u4;

/// CHIP-8 instruction opcodes.
///
/// The fields (x, y, n, nn, nnn) correspond to the operands encoded in the opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    /// 1nnn - Jump to location nnn.
    Jump { nnn: u16 },
    /// Bnnn - Jump to location nnn + V0.
    JumpWithOffset { nnn: u16 },

    /// 2nnn - Call subroutine at nnn.
    Call { nnn: u16 },
    /// 00EE - Return from a subroutine.
    Return,

    /// 3xnn - Skip next instruction if Vx == nn.
    SkipRegEqualImm { x: u4, nn: u8 },
    /// 4xnn - Skip next instruction if Vx != nn.
    SkipRegNotEqualImm { x: u4, nn: u8 },
    /// 5xy0 - Skip next instruction if Vx == Vy.
    SkipRegEqualReg { x: u4, y: u4 },
    /// 9xy0 - Skip next instruction if Vx != Vy.
    SkipRegNotEqualReg { x: u4, y: u4 },

    /// 6xnn - Set Vx = nn.
    SetRegImm { x: u4, nn: u8 },
    /// 7xnn - Set Vx = Vx + nn.
    AddRegImm { x: u4, nn: u8 },
    /// Annn - Set I = nnn.
    SetIndexImm { nnn: u16 },
    /// Fx1E - Set I = I + Vx.
    AddIndexReg { x: u4 },

    /// 8xyN - ALU operations
    ALU { x: u4, y: u4, op: OpcodeALU },
    /// Cxnn - Set Vx = random byte AND nn.
    Random { x: u4, nn: u8 },

    /// 00E0 - Clear the display.
    ClearDisplay,
    /// Dxyn - Display sprite.
    Draw { x: u4, y: u4, n: u4 },

    /// Ex9E - Skip next instruction if key with the value of Vx is pressed.
    SkipIfPressed { x: u4 },
    /// ExA1 - Skip next instruction if key with the value of Vx is not pressed.
    SkipIfNotPressed { x: u4 },
    /// Fx0A - Wait for a key press, store the value of the key in Vx.
    WaitForKey { x: u4 },

    /// Fx07 - Set Vx = delay timer value.
    ReadDelayTimer { x: u4 },
    /// Fx15 - Set delay timer = Vx.
    SetDelayTimer { x: u4 },
    /// Fx18 - Set sound timer = Vx.
    SetSoundTimer { x: u4 },

    /// Fx29 - Set I = location of sprite for digit Vx.
    FontChar { x: u4 },
    /// Fx33 - Store BCD representation of Vx in memory locations I, I+1, and I+2.
    BCD { x: u4 },

    /// Fx55 - Store registers V0 through Vx in memory starting at location I.
    StoreRegs { x: u4 },
    /// Fx65 - Read registers V0 through Vx from memory starting at location I.
    LoadRegs { x: u4 },

    /// Represents an unknown opcode.
    Unknown(u16),
}

/// ALU operations for the 8xyN instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpcodeALU {
    /// 8xy0 - Vx = Vy
    Set,
    /// 8xy1 - Vx = Vx OR Vy
    Or,
    /// 8xy2 - Vx = Vx AND Vy
    And,
    /// 8xy3 - Vx = Vx XOR Vy
    Xor,
    /// 8xy4 - Vx = Vx + Vy
    Add,
    /// 8xy5 - Vx = Vx - Vy
    Sub,
    /// 8xy6 - Vx = Vx SHR 1
    ShiftRight,
    /// 8xy7 - Vx = Vy - Vx
    SubReverse,
    /// 8xyE - Vx = Vx SHL 1
    ShiftLeft,
}

impl OpcodeALU {
    /// Maps the low nibble of an `8xyN` word to its operation.
    fn from_nibble(n: u4) -> Option<Self> {
        Some(match n.get() {
            0x0 => Self::Set,
            0x1 => Self::Or,
            0x2 => Self::And,
            0x3 => Self::Xor,
            0x4 => Self::Add,
            0x5 => Self::Sub,
            0x6 => Self::ShiftRight,
            0x7 => Self::SubReverse,
            0xE => Self::ShiftLeft,
            _ => return None,
        })
    }
}

impl Opcode {
    /// Decode a 16-bit raw opcode into an `Opcode` enum variant.
    ///
    /// The top nibble picks the family. Families 0, E and F are told apart by
    /// their whole low byte, 8 by its low nibble.
    pub fn decode(opcode: u16) -> Self {
        let x = u4::from_low_bits((opcode >> 8) as u8);
        let y = u4::from_low_bits((opcode >> 4) as u8);
        let n = u4::from_low_bits(opcode as u8);
        let nn = (opcode & 0x00FF) as u8;
        let nnn = opcode & 0x0FFF;

        let decoded = match opcode >> 12 {
            0x0 => match opcode {
                0x00E0 => Some(Opcode::ClearDisplay),
                0x00EE => Some(Opcode::Return),
                _ => None,
            },
            0x1 => Some(Opcode::Jump { nnn }),
            0x2 => Some(Opcode::Call { nnn }),
            0x3 => Some(Opcode::SkipRegEqualImm { x, nn }),
            0x4 => Some(Opcode::SkipRegNotEqualImm { x, nn }),
            0x5 if n.get() == 0 => Some(Opcode::SkipRegEqualReg { x, y }),
            0x6 => Some(Opcode::SetRegImm { x, nn }),
            0x7 => Some(Opcode::AddRegImm { x, nn }),
            0x8 => OpcodeALU::from_nibble(n).map(|op| Opcode::ALU { x, y, op }),
            0x9 if n.get() == 0 => Some(Opcode::SkipRegNotEqualReg { x, y }),
            0xA => Some(Opcode::SetIndexImm { nnn }),
            0xB => Some(Opcode::JumpWithOffset { nnn }),
            0xC => Some(Opcode::Random { x, nn }),
            0xD => Some(Opcode::Draw { x, y, n }),
            0xE | 0xF => Self::decode_by_low_byte(opcode >> 12, x, nn),
            _ => None,
        };

        decoded.unwrap_or(Opcode::Unknown(opcode))
    }

    /// `Ex??` and `Fx??`: the register is in x, the operation in the low byte.
    fn decode_by_low_byte(family: u16, x: u4, nn: u8) -> Option<Self> {
        Some(match (family, nn) {
            (0xE, 0x9E) => Opcode::SkipIfPressed { x },
            (0xE, 0xA1) => Opcode::SkipIfNotPressed { x },
            (0xF, 0x07) => Opcode::ReadDelayTimer { x },
            (0xF, 0x0A) => Opcode::WaitForKey { x },
            (0xF, 0x15) => Opcode::SetDelayTimer { x },
            (0xF, 0x18) => Opcode::SetSoundTimer { x },
            (0xF, 0x1E) => Opcode::AddIndexReg { x },
            (0xF, 0x29) => Opcode::FontChar { x },
            (0xF, 0x33) => Opcode::BCD { x },
            (0xF, 0x55) => Opcode::StoreRegs { x },
            (0xF, 0x65) => Opcode::LoadRegs { x },
            _ => return None,
        })
    }
}

/// Assembly-style mnemonic, as shown by the disassembler.
impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Opcode::Jump { nnn } => write!(f, "JP {nnn:#05X}"),
            Opcode::JumpWithOffset { nnn } => write!(f, "JP V0, {nnn:#05X}"),
            Opcode::Call { nnn } => write!(f, "CALL {nnn:#05X}"),
            Opcode::Return => write!(f, "RET"),
            Opcode::SkipRegEqualImm { x, nn } => write!(f, "SE V{x:X}, {nn:#04X}"),
            Opcode::SkipRegNotEqualImm { x, nn } => write!(f, "SNE V{x:X}, {nn:#04X}"),
            Opcode::SkipRegEqualReg { x, y } => write!(f, "SE V{x:X}, V{y:X}"),
            Opcode::SkipRegNotEqualReg { x, y } => write!(f, "SNE V{x:X}, V{y:X}"),
            Opcode::SetRegImm { x, nn } => write!(f, "LD V{x:X}, {nn:#04X}"),
            Opcode::AddRegImm { x, nn } => write!(f, "ADD V{x:X}, {nn:#04X}"),
            Opcode::SetIndexImm { nnn } => write!(f, "LD I, {nnn:#05X}"),
            Opcode::AddIndexReg { x } => write!(f, "ADD I, V{x:X}"),
            Opcode::ALU { x, y, op } => {
                let mnemonic = match op {
                    OpcodeALU::Set => "LD",
                    OpcodeALU::Or => "OR",
                    OpcodeALU::And => "AND",
                    OpcodeALU::Xor => "XOR",
                    OpcodeALU::Add => "ADD",
                    OpcodeALU::Sub => "SUB",
                    OpcodeALU::ShiftRight => "SHR",
                    OpcodeALU::SubReverse => "SUBN",
                    OpcodeALU::ShiftLeft => "SHL",
                };
                write!(f, "{mnemonic} V{x:X}, V{y:X}")
            }
            Opcode::Random { x, nn } => write!(f, "RND V{x:X}, {nn:#04X}"),
            Opcode::ClearDisplay => write!(f, "CLS"),
            Opcode::Draw { x, y, n } => write!(f, "DRW V{x:X}, V{y:X}, {n:X}"),
            Opcode::SkipIfPressed { x } => write!(f, "SKP V{x:X}"),
            Opcode::SkipIfNotPressed { x } => write!(f, "SKNP V{x:X}"),
            Opcode::WaitForKey { x } => write!(f, "LD V{x:X}, K"),
            Opcode::ReadDelayTimer { x } => write!(f, "LD V{x:X}, DT"),
            Opcode::SetDelayTimer { x } => write!(f, "LD DT, V{x:X}"),
            Opcode::SetSoundTimer { x } => write!(f, "LD ST, V{x:X}"),
            Opcode::FontChar { x } => write!(f, "LD F, V{x:X}"),
            Opcode::BCD { x } => write!(f, "LD B, V{x:X}"),
            Opcode::StoreRegs { x } => write!(f, "LD [I], V{x:X}"),
            Opcode::LoadRegs { x } => write!(f, "LD V{x:X}, [I]"),
            Opcode::Unknown(opcode) => write!(f, "DW {opcode:#06X}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_operand_fields() {
        assert_eq!(
            Opcode::decode(0xD12F),
            Opcode::Draw {
                x: u4::new(1),
                y: u4::new(2),
                n: u4::new(0xF)
            }
        );
        assert_eq!(Opcode::decode(0xB3A0), Opcode::JumpWithOffset { nnn: 0x3A0 });
        assert_eq!(
            Opcode::decode(0x7C05),
            Opcode::AddRegImm {
                x: u4::new(0xC),
                nn: 0x05
            }
        );
    }

    #[test]
    fn secondary_dispatch_on_low_nibble_and_byte() {
        assert_eq!(
            Opcode::decode(0x834E),
            Opcode::ALU {
                x: u4::new(3),
                y: u4::new(4),
                op: OpcodeALU::ShiftLeft
            }
        );
        assert_eq!(Opcode::decode(0xF533), Opcode::BCD { x: u4::new(5) });
        assert_eq!(Opcode::decode(0xE1A1), Opcode::SkipIfNotPressed { x: u4::new(1) });
    }

    #[test]
    fn unassigned_words_are_unknown() {
        for word in [0x0000, 0x00E1, 0x0123, 0x5121, 0x8128, 0x912F, 0xE19F, 0xF1FF] {
            assert_eq!(Opcode::decode(word), Opcode::Unknown(word), "{word:#06X}");
        }
    }

    #[test]
    fn low_byte_operations_belong_to_one_family() {
        assert_eq!(Opcode::decode(0xE215), Opcode::Unknown(0xE215));
        assert_eq!(Opcode::decode(0xF29E), Opcode::Unknown(0xF29E));
        assert_eq!(Opcode::decode(0xF215), Opcode::SetDelayTimer { x: u4::new(2) });
        assert_eq!(Opcode::decode(0xE29E), Opcode::SkipIfPressed { x: u4::new(2) });
    }

    #[test]
    fn mnemonics() {
        assert_eq!(Opcode::decode(0x00E0).to_string(), "CLS");
        assert_eq!(Opcode::decode(0x2400).to_string(), "CALL 0x400");
        assert_eq!(Opcode::decode(0x8AB5).to_string(), "SUB VA, VB");
        assert_eq!(Opcode::decode(0xD015).to_string(), "DRW V0, V1, 5");
        assert_eq!(Opcode::decode(0xF30A).to_string(), "LD V3, K");
        assert_eq!(Opcode::decode(0xFFFF).to_string(), "DW 0xFFFF");
    }
}
