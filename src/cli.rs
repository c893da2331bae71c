//! Command-line options and text rendering shared by the binaries.

use clap::Args;

use crate::vm::{Config, DISPLAY_X, Frame, Quirks, ShiftSource, UnknownOpcodePolicy};

#[derive(Args, Debug, Clone)]
pub struct MachineArgs {
    /// Instructions executed per second
    #[arg(long = "hz", default_value_t = 700.0)]
    pub cpu_hz: f32,

    /// What to do when an unknown opcode is fetched
    #[arg(long = "on-unknown", value_enum, default_value_t = UnknownOpcodePolicy::Halt)]
    pub on_unknown_opcode: UnknownOpcodePolicy,

    /// Register the 8xy6/8xyE shifts read from
    #[arg(long = "shift", value_enum, default_value_t = ShiftSource::Vy)]
    pub shift_source: ShiftSource,

    /// Fx55/Fx65 advance I past the transferred registers
    #[arg(long)]
    pub load_store_increments_i: bool,

    /// 8xy1/8xy2/8xy3 clear VF
    #[arg(long)]
    pub logic_resets_vf: bool,
}

impl MachineArgs {
    pub fn config(&self) -> Config {
        Config {
            cpu_hz: self.cpu_hz,
            on_unknown_opcode: self.on_unknown_opcode,
            quirks: Quirks {
                shift_source: self.shift_source,
                load_store_increments_i: self.load_store_increments_i,
                logic_resets_vf: self.logic_resets_vf,
            },
        }
    }
}

/// Renders a frame as text, one line per row, `#` for lit pixels.
pub fn render_frame(frame: &Frame) -> String {
    let mut out = String::with_capacity((DISPLAY_X + 1) * frame.len());
    for row in frame {
        out.extend(row.iter().map(|&pixel| if pixel { '#' } else { '.' }));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::vm::{DISPLAY_Y, Framebuffer};

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        machine: MachineArgs,
    }

    #[test]
    fn defaults_match_config_default() {
        let cli = TestCli::try_parse_from(["test"]).unwrap();
        assert_eq!(cli.machine.config(), Config::default());
    }

    #[test]
    fn flags_map_to_quirks() {
        let cli = TestCli::try_parse_from([
            "test",
            "--hz",
            "1000",
            "--on-unknown",
            "skip",
            "--shift",
            "vx",
            "--load-store-increments-i",
        ])
        .unwrap();
        let config = cli.machine.config();

        assert_eq!(config.cpu_hz, 1000.0);
        assert_eq!(config.on_unknown_opcode, UnknownOpcodePolicy::Skip);
        assert_eq!(config.quirks.shift_source, ShiftSource::Vx);
        assert!(config.quirks.load_store_increments_i);
        assert!(!config.quirks.logic_resets_vf);
    }

    #[test]
    fn renders_one_line_per_row() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(0, 0, &[0xC0]);

        let text = render_frame(&fb.snapshot());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), DISPLAY_Y);
        assert!(lines[0].starts_with("##.."));
        assert!(lines.iter().all(|l| l.len() == DISPLAY_X));
    }
}
