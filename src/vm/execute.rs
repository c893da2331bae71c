use super::{
    Chip8, Chip8Error, Opcode, OpcodeALU, RunState, ShiftSource, StepOutcome,
    UnknownOpcodePolicy, glyph_address,
};
use crate::u4;

const ADDRESS_MASK: u16 = 0x0FFF;

impl Chip8 {
    /// Applies one decoded instruction. `address` is where it was fetched
    /// from; PC already points past it.
    pub(crate) fn execute(
        &mut self,
        opcode: Opcode,
        address: u16,
    ) -> Result<StepOutcome, Chip8Error> {
        let regs = &mut self.registers;

        match opcode {
            Opcode::ClearDisplay => {
                self.display.clear();
            }
            Opcode::Jump { nnn } => {
                regs.pc = nnn;
            }
            Opcode::JumpWithOffset { nnn } => {
                regs.pc = nnn.wrapping_add(regs.v[0].into()) & ADDRESS_MASK;
            }
            Opcode::Call { nnn } => {
                self.stack
                    .push(regs.pc)
                    .map_err(|_| Chip8Error::StackOverflow { address })?;
                regs.pc = nnn;
            }
            Opcode::Return => {
                regs.pc = self
                    .stack
                    .pop()
                    .ok_or(Chip8Error::StackUnderflow { address })?;
            }
            Opcode::SkipRegEqualImm { x, nn } => {
                if regs.v[x] == nn {
                    regs.skip();
                }
            }
            Opcode::SkipRegNotEqualImm { x, nn } => {
                if regs.v[x] != nn {
                    regs.skip();
                }
            }
            Opcode::SkipRegEqualReg { x, y } => {
                if regs.v[x] == regs.v[y] {
                    regs.skip();
                }
            }
            Opcode::SkipRegNotEqualReg { x, y } => {
                if regs.v[x] != regs.v[y] {
                    regs.skip();
                }
            }
            Opcode::SetRegImm { x, nn } => {
                regs.v[x] = nn;
            }
            Opcode::AddRegImm { x, nn } => {
                regs.v[x] = regs.v[x].wrapping_add(nn);
            }
            Opcode::ALU { x, y, op } => {
                self.execute_alu(x, y, op);
            }
            Opcode::Random { x, nn } => {
                let rand_byte: u8 = rand::random();
                regs.v[x] = rand_byte & nn;
            }
            Opcode::SetIndexImm { nnn } => {
                regs.i = nnn;
            }
            Opcode::AddIndexReg { x } => {
                regs.i = regs.i.wrapping_add(regs.v[x].into()) & ADDRESS_MASK;
            }
            Opcode::Draw { x, y, n } => {
                self.execute_draw(x, y, n);
                return Ok(StepOutcome::Drew);
            }
            Opcode::SkipIfPressed { x } => {
                if self.keypad.is_pressed(u4::from_low_bits(regs.v[x])) {
                    regs.skip();
                }
            }
            Opcode::SkipIfNotPressed { x } => {
                if !self.keypad.is_pressed(u4::from_low_bits(regs.v[x])) {
                    regs.skip();
                }
            }
            Opcode::WaitForKey { x } => {
                // Only presses that happen from now on can end the wait.
                self.keypad.clear_press();
                self.state = RunState::AwaitingKey { target: x };
                return Ok(StepOutcome::AwaitingKey);
            }
            Opcode::ReadDelayTimer { x } => {
                regs.v[x] = self.timers.delay;
            }
            Opcode::SetDelayTimer { x } => {
                self.timers.delay = regs.v[x];
            }
            Opcode::SetSoundTimer { x } => {
                self.timers.sound = regs.v[x];
            }
            Opcode::FontChar { x } => {
                regs.i = glyph_address(regs.v[x]);
            }
            Opcode::BCD { x } => {
                let value = regs.v[x];
                self.memory.write_byte(regs.i, value / 100);
                self.memory.write_byte(regs.i.wrapping_add(1), (value / 10) % 10);
                self.memory.write_byte(regs.i.wrapping_add(2), value % 10);
            }
            Opcode::StoreRegs { x } => {
                for reg_index in 0..=usize::from(x) {
                    let addr = regs.i.wrapping_add(reg_index as u16);
                    self.memory.write_byte(addr, regs.v[reg_index]);
                }
                self.advance_index_after_transfer(x);
            }
            Opcode::LoadRegs { x } => {
                for reg_index in 0..=usize::from(x) {
                    let addr = regs.i.wrapping_add(reg_index as u16);
                    regs.v[reg_index] = self.memory.read_byte(addr);
                }
                self.advance_index_after_transfer(x);
            }
            Opcode::Unknown(opcode) => {
                return match self.config.on_unknown_opcode {
                    UnknownOpcodePolicy::Halt => {
                        self.state = RunState::Halted { opcode };
                        Err(Chip8Error::UnknownOpcode { opcode, address })
                    }
                    UnknownOpcodePolicy::Skip => Ok(StepOutcome::SkippedUnknown { opcode }),
                };
            }
        };

        Ok(StepOutcome::Executed(opcode))
    }

    fn execute_alu(&mut self, x: u4, y: u4, op: OpcodeALU) {
        let quirks = self.config.quirks;
        let regs = &mut self.registers;

        // VF is written after Vx so the flag survives when x is F.
        match op {
            OpcodeALU::Set => regs.v[x] = regs.v[y],
            OpcodeALU::Or => {
                regs.v[x] |= regs.v[y];
                if quirks.logic_resets_vf {
                    regs.set_flag(false);
                }
            }
            OpcodeALU::And => {
                regs.v[x] &= regs.v[y];
                if quirks.logic_resets_vf {
                    regs.set_flag(false);
                }
            }
            OpcodeALU::Xor => {
                regs.v[x] ^= regs.v[y];
                if quirks.logic_resets_vf {
                    regs.set_flag(false);
                }
            }
            OpcodeALU::Add => {
                let (res, overflow) = regs.v[x].overflowing_add(regs.v[y]);
                regs.v[x] = res;
                regs.set_flag(overflow);
            }
            OpcodeALU::Sub => {
                let (res, borrow) = regs.v[x].overflowing_sub(regs.v[y]);
                regs.v[x] = res;
                regs.set_flag(!borrow); // Notice that borrow is inverted
            }
            OpcodeALU::SubReverse => {
                let (res, borrow) = regs.v[y].overflowing_sub(regs.v[x]);
                regs.v[x] = res;
                regs.set_flag(!borrow);
            }
            OpcodeALU::ShiftRight => {
                let source = Self::shift_source(regs.v[x], regs.v[y], quirks.shift_source);
                regs.v[x] = source >> 1;
                regs.set_flag(source & 1 == 1);
            }
            OpcodeALU::ShiftLeft => {
                let source = Self::shift_source(regs.v[x], regs.v[y], quirks.shift_source);
                regs.v[x] = source << 1;
                regs.set_flag(source & 0x80 != 0);
            }
        }
    }

    fn shift_source(vx: u8, vy: u8, source: ShiftSource) -> u8 {
        match source {
            ShiftSource::Vy => vy,
            ShiftSource::Vx => vx,
        }
    }

    fn execute_draw(&mut self, x: u4, y: u4, n: u4) {
        let x_pos = self.registers.v[x] as usize;
        let y_pos = self.registers.v[y] as usize;

        let mut sprite = [0u8; 15];
        let rows = &mut sprite[..usize::from(n)];
        for (row, byte) in rows.iter_mut().enumerate() {
            *byte = self
                .memory
                .read_byte(self.registers.i.wrapping_add(row as u16));
        }

        let any_erased = self.display.draw_sprite(x_pos, y_pos, rows);
        self.registers.set_flag(any_erased);
    }

    fn advance_index_after_transfer(&mut self, x: u4) {
        if self.config.quirks.load_store_increments_i {
            let count = u16::from(x.get()) + 1;
            self.registers.i = self.registers.i.wrapping_add(count) & ADDRESS_MASK;
        }
    }
}
