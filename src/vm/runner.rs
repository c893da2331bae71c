use std::collections::HashSet;
use std::time::{Duration, Instant};

use super::{Chip8, Chip8Error, StepOutcome};
use crate::u4;

/// Longest stretch of wall time a single update will catch up on.
const MAX_UPDATE_DT: Duration = Duration::from_millis(250);

/// High-level emulator runner that paces instructions from wall-clock time.
pub struct Chip8Runner {
    chip8: Chip8,
    cpu_dt_accumulator: f32,
    last_update: Option<Instant>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Chip8RunnerResult {
    HitBreakpoint,
    Ok,
}

impl Chip8Runner {
    pub fn new(chip8: Chip8) -> Self {
        Self {
            chip8,
            cpu_dt_accumulator: 0.0,
            last_update: None,
        }
    }

    /// Runs as many CPU cycles as the time since the previous update allows.
    ///
    /// The first call only records `now`. Returns early after a draw (so the
    /// frame can be rendered) or while the machine waits for a key.
    pub fn update(&mut self, now: Instant) -> Result<Chip8RunnerResult, Chip8Error> {
        self.update_with_breakpoints(now, None)
    }

    /// Like `update` but checks for breakpoints after each CPU cycle.
    pub fn update_with_breakpoints(
        &mut self,
        now: Instant,
        breakpoints: Option<&HashSet<u16>>,
    ) -> Result<Chip8RunnerResult, Chip8Error> {
        let dt = match self.last_update.replace(now) {
            Some(last) => now.saturating_duration_since(last).min(MAX_UPDATE_DT),
            None => Duration::ZERO,
        };
        self.cpu_dt_accumulator += dt.as_secs_f32();

        let cpu_time_step = 1.0 / self.chip8.config().cpu_hz;

        while self.cpu_dt_accumulator >= cpu_time_step {
            self.cpu_dt_accumulator -= cpu_time_step;

            let outcome = self.chip8.step_at(now).inspect_err(|e| {
                self.cpu_dt_accumulator = 0.0;
                log::debug!("stopping at {:#05X}: {e}", self.chip8.pc());
            })?;

            if let Some(breakpoints) = breakpoints
                && breakpoints.contains(&self.chip8.pc())
            {
                log::debug!("hit breakpoint at {:#05X}", self.chip8.pc());
                self.cpu_dt_accumulator = 0.0;
                return Ok(Chip8RunnerResult::HitBreakpoint);
            }

            match outcome {
                StepOutcome::Drew | StepOutcome::AwaitingKey => {
                    // We clear the accumulator to avoid "catching up" in the next frame.
                    self.cpu_dt_accumulator = 0.0;
                    break;
                }
                StepOutcome::SkippedUnknown { opcode } => {
                    log::warn!("skipped unknown opcode {opcode:#06X}");
                }
                StepOutcome::Executed(_) | StepOutcome::KeyResolved { .. } => {}
            }
        }

        Ok(Chip8RunnerResult::Ok)
    }

    /// Forgets the previous update time, so the next update runs nothing
    /// and time spent paused is never caught up on.
    pub fn restart_clock(&mut self) {
        self.last_update = None;
        self.cpu_dt_accumulator = 0.0;
    }

    /// Returns true if the sound timer is active, indicating a beep should be played.
    pub fn should_beep(&self) -> bool {
        self.chip8.should_beep()
    }

    /// Set the state of a key on the keypad.
    pub fn set_key(&mut self, key: u4, pressed: bool) {
        self.chip8.set_key(key, pressed)
    }

    pub fn chip8_ref(&self) -> &Chip8 {
        &self.chip8
    }

    pub fn chip8_mut(&mut self) -> &mut Chip8 {
        &mut self.chip8
    }
}
