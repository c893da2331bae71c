use std::{
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use anyhow::Context;
use clap::Parser;
use clap_num::maybe_hex;

use chip8_vm::{
    cli::{MachineArgs, render_frame},
    u4,
    vm::{Chip8, Chip8Runner, TIMER_PERIOD},
};

/// Headless CHIP-8 runner.
///
/// Runs a ROM for a fixed amount of wall-clock time and prints the screen
/// as text when done.
#[derive(Parser, Debug)]
#[command(about)]
struct Args {
    /// Path to the CHIP-8 ROM file
    rom_path: PathBuf,

    #[command(flatten)]
    machine: MachineArgs,

    /// Seconds to run for
    #[arg(long, default_value_t = 5.0)]
    seconds: f32,

    /// Also print the screen every N frames (0 prints only the last one)
    #[arg(long, default_value_t = 0)]
    print_every: u32,

    /// Keys held down for the whole run (0x0-0xF, repeatable)
    #[arg(long = "hold", value_parser = maybe_hex::<u8>)]
    held_keys: Vec<u8>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rom = std::fs::read(&args.rom_path).context("Failed to read ROM file")?;

    let mut chip8 = Chip8::with_config(args.machine.config());
    chip8
        .load_program(&rom)
        .context("Failed to load ROM into CHIP-8 memory")?;
    log::info!("loaded {} ({} bytes)", args.rom_path.display(), rom.len());

    for key in &args.held_keys {
        let key = u4::try_from(*key).context("Invalid --hold key")?;
        chip8.set_key(key, true);
    }

    let mut runner = Chip8Runner::new(chip8);
    let start = Instant::now();
    let run_for = Duration::try_from_secs_f32(args.seconds).context("Invalid --seconds")?;
    let mut frame = 0u32;

    loop {
        let now = Instant::now();
        if now.duration_since(start) >= run_for {
            break;
        }

        runner.update(now).context("Chip8 execution error")?;

        frame += 1;
        if args.print_every > 0 && frame % args.print_every == 0 {
            println!("frame {frame}");
            print!("{}", render_frame(&runner.chip8_ref().read_framebuffer()));
        }
        if runner.should_beep() {
            log::trace!("beep");
        }

        thread::sleep(TIMER_PERIOD);
    }

    let chip8 = runner.chip8_ref();
    print!("{}", render_frame(&chip8.read_framebuffer()));
    println!(
        "PC: {:03X}  DT: {:02X}  ST: {:02X}  {:?}",
        chip8.pc(),
        chip8.delay_timer(),
        chip8.sound_timer(),
        chip8.run_state()
    );

    Ok(())
}
