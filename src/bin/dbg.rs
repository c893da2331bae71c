use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::mpsc::{self, RecvTimeoutError},
    thread,
    time::{Duration, Instant},
};

use anyhow::Context;
use clap::Parser;

use chip8_vm::{
    cli::{MachineArgs, render_frame},
    debugger::{Cli, Command, CommandResult, Executor},
    vm::{Chip8, Chip8Runner, Chip8RunnerResult},
};

const POLL_INTERVAL: Duration = Duration::from_millis(16);

struct App {
    executor: Executor,
    should_quit: bool,
    last_command: Option<Command>,
}

impl App {
    fn new(rom: &[u8], machine: &MachineArgs) -> anyhow::Result<Self> {
        let mut chip8 = Chip8::with_config(machine.config());
        chip8
            .load_program(rom)
            .context("Failed to load ROM into CHIP-8 memory")?;

        Ok(Self {
            executor: Executor::new(Chip8Runner::new(chip8)),
            should_quit: false,
            last_command: None,
        })
    }

    fn run(&mut self, lines: mpsc::Receiver<String>) -> anyhow::Result<()> {
        prompt()?;

        while !self.should_quit {
            // Handles execution when debugger is in running mode
            match self.executor.poll(Instant::now()) {
                Ok(Chip8RunnerResult::HitBreakpoint) => {
                    println!("Hit breakpoint at {:03X}", self.executor.get_pc());
                    self.print_display();
                    prompt()?;
                }
                Err(e) => {
                    println!("{e}");
                    prompt()?;
                }
                Ok(Chip8RunnerResult::Ok) => {}
            }

            match lines.recv_timeout(POLL_INTERVAL) {
                Ok(line) => {
                    self.handle_line(&line);
                    if !self.should_quit {
                        prompt()?;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => self.should_quit = true,
            }
        }

        Ok(())
    }

    fn handle_line(&mut self, input: &str) {
        if input.trim().is_empty() {
            if let Some(command) = self.last_command.clone() {
                self.execute_command(command);
            }
            return;
        }

        match Cli::try_parse_from(input.split_whitespace()) {
            Ok(cli) => {
                self.last_command = Some(cli.command.clone());
                self.execute_command(cli.command);
            }
            Err(e) => {
                println!("{e}");
                self.last_command = None;
            }
        }
    }

    fn execute_command(&mut self, command: Command) {
        let show_display = matches!(command, Command::Step { .. } | Command::Pause);

        match self.executor.execute(command) {
            Ok(result) => match result {
                CommandResult::Ok => {
                    println!("OK");
                }
                CommandResult::Quit => {
                    self.should_quit = true;
                }
                CommandResult::Breakpoints(breakpoints) => {
                    println!("Breakpoints: {:03X?}", breakpoints);
                }
                CommandResult::MemDump { data, offset } => {
                    for (i, byte) in data.iter().enumerate() {
                        if i % 16 == 0 {
                            print!("\n{:03X}: ", offset.wrapping_add(i as u16));
                        }
                        print!("{:02X} ", byte);
                    }
                    println!();
                }
                CommandResult::Disasm {
                    instructions,
                    offset,
                } => {
                    for (i, (word, opcode)) in instructions.iter().enumerate() {
                        println!(
                            "{:03X}: {:04X} - {}",
                            offset.wrapping_add(i as u16 * 2),
                            word,
                            opcode
                        );
                    }
                }
                CommandResult::Registers(text) => {
                    println!("{text}");
                }
            },
            Err(e) => {
                println!("{e}");
            }
        }

        if show_display {
            self.print_display();
        }
    }

    fn print_display(&self) {
        print!("{}", render_frame(self.executor.get_display()));
    }
}

fn prompt() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}

/// Line-oriented CHIP-8 debugger.
///
/// Reads commands (run, pause, step, breakpoint, set, mem, disasm, key, regs,
/// reset, quit) from stdin. An empty line repeats the last command.
#[derive(Parser)]
struct Args {
    /// Path to the ROM file to load
    rom_path: PathBuf,

    #[command(flatten)]
    machine: MachineArgs,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rom = std::fs::read(&args.rom_path).context("Failed to read ROM file")?;
    let mut app = App::new(&rom, &args.machine).context("Failed to initialize application")?;
    log::info!("loaded {} ({} bytes)", args.rom_path.display(), rom.len());

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    app.run(rx)
}
