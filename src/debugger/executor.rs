use std::collections::HashSet;
use std::time::Instant;

use super::commands::{
    BreakpointAction, Command, CommandError, CommandResult, KeyAction, SetTarget,
};
use crate::u4;
use crate::vm::{Chip8Error, Chip8Runner, Chip8RunnerResult, Display, MEMORY_SIZE, Opcode};

pub struct Executor {
    is_running: bool,
    runner: Chip8Runner,
    breakpoints: HashSet<u16>,
}

impl Executor {
    pub fn new(runner: Chip8Runner) -> Self {
        Self {
            is_running: false,
            runner,
            breakpoints: HashSet::new(),
        }
    }

    /// Advances the machine while in running mode; stops on breakpoints and errors.
    pub fn poll(&mut self, now: Instant) -> Result<Chip8RunnerResult, Chip8Error> {
        if !self.is_running {
            return Ok(Chip8RunnerResult::Ok);
        }

        let result = self
            .runner
            .update_with_breakpoints(now, Some(&self.breakpoints));

        if matches!(result, Err(_) | Ok(Chip8RunnerResult::HitBreakpoint)) {
            self.is_running = false;
        }

        result
    }

    pub fn execute(&mut self, command: Command) -> Result<CommandResult, CommandError> {
        log::debug!("debugger command: {command:?}");

        match command {
            Command::Run => {
                self.execute_run();
                Ok(CommandResult::Ok)
            }
            Command::Pause => {
                self.pause();
                Ok(CommandResult::Ok)
            }
            Command::Step { count } => self.execute_step(count),
            Command::Breakpoint { action } => self.handle_breakpoint(action),
            Command::Set { target, value } => self.handle_set(target, value),
            Command::Mem { start, len } => self.handle_mem(start, len),
            Command::Disasm { start, len } => {
                let start = start.unwrap_or_else(|| self.get_pc());
                self.handle_disasm(start, len)
            }
            Command::Key { key, state } => {
                self.runner.set_key(key, state == KeyAction::Down);
                Ok(CommandResult::Ok)
            }
            Command::Regs => Ok(CommandResult::Registers(self.format_registers())),
            Command::Reset => {
                self.pause();
                self.runner.chip8_mut().reset();
                Ok(CommandResult::Ok)
            }
            Command::Quit => Ok(CommandResult::Quit),
        }
    }

    pub fn execute_run(&mut self) {
        self.runner.restart_clock();
        self.is_running = true;
    }

    pub fn pause(&mut self) {
        self.is_running = false;
    }

    pub fn execute_step(&mut self, count: u32) -> Result<CommandResult, CommandError> {
        for _ in 0..count {
            self.runner.chip8_mut().step()?;
        }
        Ok(CommandResult::Ok)
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn get_display(&self) -> &Display<bool> {
        self.runner.chip8_ref().display().rows()
    }

    pub fn get_pc(&self) -> u16 {
        self.runner.chip8_ref().pc()
    }

    pub fn runner_mut(&mut self) -> &mut Chip8Runner {
        &mut self.runner
    }

    fn handle_breakpoint(
        &mut self,
        action: BreakpointAction,
    ) -> Result<CommandResult, CommandError> {
        match action {
            BreakpointAction::Set { addr } => {
                self.breakpoints.insert(addr);
            }
            BreakpointAction::Clear { addr } => {
                self.breakpoints.remove(&addr);
            }
            BreakpointAction::ClearAll => {
                self.breakpoints.clear();
            }
            BreakpointAction::List => {
                let mut bps: Vec<u16> = self.breakpoints.iter().cloned().collect();
                bps.sort();
                return Ok(CommandResult::Breakpoints(bps));
            }
        };

        Ok(CommandResult::Ok)
    }

    fn handle_set(&mut self, target: SetTarget, value: u16) -> Result<CommandResult, CommandError> {
        let chip8 = self.runner.chip8_mut();

        match target {
            SetTarget::V(reg) => {
                let value = u8::try_from(value).map_err(|_| CommandError::ValueOutOfRange)?;
                chip8.set_v(reg, value);
            }
            SetTarget::I => {
                chip8.set_i(value);
            }
            SetTarget::Pc => {
                if usize::from(value) >= MEMORY_SIZE {
                    return Err(CommandError::ValueOutOfRange);
                }
                chip8.set_pc(value);
            }
        }

        Ok(CommandResult::Ok)
    }

    fn handle_mem(&self, start: u16, len: u16) -> Result<CommandResult, CommandError> {
        let memory = self.runner.chip8_ref().memory();
        let data = (0..len)
            .map(|offset| memory.read_byte(start.wrapping_add(offset)))
            .collect();

        Ok(CommandResult::MemDump {
            data,
            offset: start,
        })
    }

    fn handle_disasm(&self, start: u16, len: u16) -> Result<CommandResult, CommandError> {
        let memory = self.runner.chip8_ref().memory();
        let instructions = (0..len)
            .map(|idx| {
                let word = memory.read_word(start.wrapping_add(idx * 2));
                (word, Opcode::decode(word))
            })
            .collect();

        Ok(CommandResult::Disasm {
            instructions,
            offset: start,
        })
    }

    fn format_registers(&self) -> String {
        let chip8 = self.runner.chip8_ref();
        let mut out = format!(
            "PC: {:03X}  I: {:03X}  DT: {:02X}  ST: {:02X}  {:?}",
            chip8.pc(),
            chip8.i(),
            chip8.delay_timer(),
            chip8.sound_timer(),
            chip8.run_state()
        );

        for (idx, value) in chip8.v().iter().enumerate() {
            let sep = if idx % 8 == 0 { '\n' } else { ' ' };
            out.push_str(&format!("{sep}V{idx:X}: {value:02X}"));
        }

        out.push_str(&format!("\nStack: {:03X?}", chip8.stack()));
        let pressed: Vec<u8> = (0..16u8)
            .filter(|&k| chip8.is_pressed(u4::new(k)))
            .collect();
        out.push_str(&format!("\nKeys: {pressed:?}"));
        out
    }
}
