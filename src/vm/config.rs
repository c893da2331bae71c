/// Which register the 8xy6/8xyE shifts read their operand from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ShiftSource {
    /// COSMAC VIP: Vx := Vy shifted.
    #[default]
    Vy,
    /// CHIP-48 / SUPER-CHIP: Vx is shifted in place and Vy is ignored.
    Vx,
}

/// What `step` does when it fetches a word that decodes to no instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum UnknownOpcodePolicy {
    /// Report the opcode as an error and refuse to step until reset.
    #[default]
    Halt,
    /// Report the opcode in the step outcome and carry on with the next word.
    Skip,
}

/// Behaviour that differs between historical interpreters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Quirks {
    pub shift_source: ShiftSource,
    /// Fx55/Fx65 leave I pointing past the last register transferred.
    pub load_store_increments_i: bool,
    /// 8xy1/8xy2/8xy3 clear VF.
    pub logic_resets_vf: bool,
}

/// Machine configuration, preserved across `reset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Instructions per second used by `Chip8Runner`.
    pub cpu_hz: f32,
    pub on_unknown_opcode: UnknownOpcodePolicy,
    pub quirks: Quirks,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cpu_hz: 700.0,
            on_unknown_opcode: UnknownOpcodePolicy::default(),
            quirks: Quirks::default(),
        }
    }
}
