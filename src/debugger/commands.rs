use clap::{Parser, Subcommand, ValueEnum};
use clap_num::maybe_hex;

use crate::u4;
use crate::vm::Opcode;

#[derive(Parser, Debug)]
#[command(multicall = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Clone, Debug, PartialEq)]
pub enum Command {
    #[command(visible_alias = "r")]
    Run,

    #[command(visible_alias = "p")]
    Pause,

    #[command(visible_alias = "s")]
    Step {
        #[arg(default_value = "1", value_parser = maybe_hex::<u32>)]
        count: u32,
    },

    #[command(visible_alias = "b")]
    Breakpoint {
        #[command(subcommand)]
        action: BreakpointAction,
    },

    Set {
        #[arg(value_parser = parse_set_target)]
        target: SetTarget,
        #[arg(value_parser = maybe_hex::<u16>)]
        value: u16,
    },

    #[command(visible_alias = "m")]
    Mem {
        #[arg(default_value = "0x200", value_parser = maybe_hex::<u16>)]
        start: u16,
        #[arg(default_value = "64", value_parser = maybe_hex::<u16>)]
        len: u16,
    },

    #[command(visible_alias = "d")]
    Disasm {
        /// Defaults to the program counter
        #[arg(value_parser = maybe_hex::<u16>)]
        start: Option<u16>,
        #[arg(default_value = "16", value_parser = maybe_hex::<u16>)]
        len: u16,
    },

    /// Press or release a keypad key
    #[command(visible_alias = "k")]
    Key {
        #[arg(value_parser = parse_key)]
        key: u4,
        state: KeyAction,
    },

    Regs,

    Reset,

    #[command(visible_alias = "q")]
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KeyAction {
    Down,
    Up,
}

#[derive(Debug, PartialEq)]
pub enum CommandResult {
    Ok,
    Breakpoints(Vec<u16>),
    MemDump { data: Vec<u8>, offset: u16 },
    Disasm {
        instructions: Vec<(u16, Opcode)>,
        offset: u16,
    },
    Registers(String),
    Quit,
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Error while executing cpu instruction: {0}")]
    Chip8Error(#[from] crate::vm::Chip8Error),
    #[error("Value out of range")]
    ValueOutOfRange,
}

#[derive(Subcommand, Clone, Debug, PartialEq)]
pub enum BreakpointAction {
    #[command(visible_alias = "s")]
    Set {
        #[arg(value_parser = maybe_hex::<u16>)]
        addr: u16,
    },

    #[command(visible_alias = "c")]
    Clear {
        #[arg(value_parser = maybe_hex::<u16>)]
        addr: u16,
    },

    #[command(visible_alias = "l")]
    List,

    #[command(visible_alias = "ca")]
    ClearAll,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SetTarget {
    V(u4),
    I,
    Pc,
}

fn parse_set_target(s: &str) -> Result<SetTarget, String> {
    let lower = s.to_lowercase();

    match lower.as_str() {
        "index" | "i" => Ok(SetTarget::I),
        "pc" => Ok(SetTarget::Pc),

        _ if lower.starts_with('v') => {
            let hex_str = &lower[1..];
            match u8::from_str_radix(hex_str, 16) {
                Ok(val) if val < 16 => Ok(SetTarget::V(u4::new(val))),
                _ => Err(format!("Invalid register: '{}'", s)),
            }
        }

        _ => Err(format!("Unknown set target: '{}'", s)),
    }
}

fn parse_key(s: &str) -> Result<u4, String> {
    let value = u8::from_str_radix(s.trim_start_matches("0x"), 16)
        .map_err(|_| format!("Invalid key: '{}'", s))?;
    u4::try_from(value).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command, clap::Error> {
        Cli::try_parse_from(line.split_whitespace()).map(|cli| cli.command)
    }

    #[test]
    fn aliases_and_defaults() {
        assert_eq!(parse("r").unwrap(), Command::Run);
        assert_eq!(parse("s").unwrap(), Command::Step { count: 1 });
        assert_eq!(parse("step 0x10").unwrap(), Command::Step { count: 16 });
        assert_eq!(
            parse("m").unwrap(),
            Command::Mem {
                start: 0x200,
                len: 64
            }
        );
        assert_eq!(
            parse("d").unwrap(),
            Command::Disasm {
                start: None,
                len: 16
            }
        );
    }

    #[test]
    fn breakpoint_addresses_accept_hex() {
        assert_eq!(
            parse("b s 0x2A0").unwrap(),
            Command::Breakpoint {
                action: BreakpointAction::Set { addr: 0x2A0 }
            }
        );
        assert_eq!(
            parse("breakpoint clear-all").unwrap(),
            Command::Breakpoint {
                action: BreakpointAction::ClearAll
            }
        );
    }

    #[test]
    fn set_targets() {
        assert_eq!(
            parse("set vA 0x12").unwrap(),
            Command::Set {
                target: SetTarget::V(u4::new(0xA)),
                value: 0x12
            }
        );
        assert_eq!(
            parse("set pc 0x300").unwrap(),
            Command::Set {
                target: SetTarget::Pc,
                value: 0x300
            }
        );
        assert!(parse("set v10 1").is_err());
        assert!(parse("set sp 1").is_err());
    }

    #[test]
    fn key_command() {
        assert_eq!(
            parse("k f down").unwrap(),
            Command::Key {
                key: u4::new(0xF),
                state: KeyAction::Down
            }
        );
        assert!(parse("key 10 up").is_err());
    }
}
