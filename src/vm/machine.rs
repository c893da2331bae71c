use std::time::Instant;

use super::{
    CallStack, Chip8Error, Config, Frame, Framebuffer, KeyState, Memory, Opcode, RegisterFile,
    RunState, StepOutcome, TimerPair,
};
use crate::u4;

/// CHIP-8 virtual machine state.
///
/// Owns every component for its whole lifetime. A driver calls [`Chip8::step`]
/// at whatever rate it likes; the timers follow wall-clock time regardless.
pub struct Chip8 {
    /// 4KB memory with the font at 0x050 and the program at 0x200
    pub(crate) memory: Memory,
    /// Display buffer: 64x32 monochrome pixels
    pub(crate) display: Framebuffer,
    pub(crate) registers: RegisterFile,
    /// Call stack for subroutine returns
    pub(crate) stack: CallStack,
    pub(crate) timers: TimerPair,
    pub(crate) keypad: KeyState,
    pub(crate) state: RunState,
    pub(crate) config: Config,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Chip8 {
            memory: Memory::new(),
            display: Framebuffer::new(),
            registers: RegisterFile::new(),
            stack: CallStack::new(),
            timers: TimerPair::new(Instant::now()),
            keypad: KeyState::new(),
            state: RunState::Running,
            config,
        }
    }

    /// Restores the power-on state, keeping the configuration.
    pub fn reset(&mut self) {
        self.reset_at(Instant::now());
    }

    /// Like [`Chip8::reset`], measuring the next timer tick from `now`.
    pub fn reset_at(&mut self, now: Instant) {
        *self = Chip8 {
            timers: TimerPair::new(now),
            ..Self::with_config(self.config)
        };
    }

    /// Copies a program into memory at 0x200.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Chip8Error> {
        self.memory.load_program(program)
    }

    /// Executes one fetch-decode-execute cycle, then ticks the timers.
    pub fn step(&mut self) -> Result<StepOutcome, Chip8Error> {
        self.step_at(Instant::now())
    }

    /// Like [`Chip8::step`], with the current time supplied by the caller.
    pub fn step_at(&mut self, now: Instant) -> Result<StepOutcome, Chip8Error> {
        let result = match self.state {
            RunState::Halted { opcode } => return Err(Chip8Error::Halted { opcode }),
            RunState::AwaitingKey { target } => Ok(self.poll_key_wait(target)),
            RunState::Running => self.cycle(),
        };

        self.timers.tick(now);
        result
    }

    fn cycle(&mut self) -> Result<StepOutcome, Chip8Error> {
        let address = self.registers.pc;
        let opcode = self.memory.read_word(address);
        self.registers.pc = address.wrapping_add(2);

        self.execute(Opcode::decode(opcode), address)
    }

    fn poll_key_wait(&mut self, target: u4) -> StepOutcome {
        match self.keypad.take_press() {
            Some(key) => {
                self.registers.set(target, key.get());
                self.state = RunState::Running;
                StepOutcome::KeyResolved { key }
            }
            None => StepOutcome::AwaitingKey,
        }
    }

    pub fn read_framebuffer(&self) -> Frame {
        self.display.snapshot()
    }

    pub fn display(&self) -> &Framebuffer {
        &self.display
    }

    /// Set the state of a key on the keypad.
    pub fn set_key(&mut self, key: u4, pressed: bool) {
        self.keypad.set_key(key, pressed);
    }

    pub fn is_pressed(&self, key: u4) -> bool {
        self.keypad.is_pressed(key)
    }

    pub fn keypad(&self) -> &[bool; 16] {
        self.keypad.keys()
    }

    pub fn delay_timer(&self) -> u8 {
        self.timers.delay()
    }

    pub fn sound_timer(&self) -> u8 {
        self.timers.sound()
    }

    /// Returns true if the sound timer is greater than zero, indicating a beep should be played.
    pub fn should_beep(&self) -> bool {
        self.timers.sound() > 0
    }

    pub fn pc(&self) -> u16 {
        self.registers.pc()
    }

    pub fn i(&self) -> u16 {
        self.registers.i()
    }

    pub fn v(&self) -> &[u8; 16] {
        self.registers.v()
    }

    pub fn stack(&self) -> &[u16] {
        self.stack.entries()
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn run_state(&self) -> RunState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.registers.pc = pc;
    }

    pub fn set_i(&mut self, i: u16) {
        self.registers.i = i;
    }

    pub fn set_v(&mut self, x: u4, value: u8) {
        self.registers.set(x, value);
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
