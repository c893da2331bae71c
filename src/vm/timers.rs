use std::time::{Duration, Instant};

pub const TIMER_HZ: u32 = 60;
/// Minimum wall-clock time between two timer ticks.
pub const TIMER_PERIOD: Duration =
    Duration::from_nanos(1_000_000_000u64.div_ceil(TIMER_HZ as u64));

/// Delay and sound timers, ticked from wall-clock instants rather than step count.
#[derive(Clone, Debug)]
pub struct TimerPair {
    /// Delay timer: decrements at 60Hz until it reaches 0
    pub(crate) delay: u8,
    /// Sound timer: decrements at 60Hz, a tone should play while non-zero
    pub(crate) sound: u8,
    last_tick: Instant,
}

impl TimerPair {
    pub fn new(now: Instant) -> Self {
        Self {
            delay: 0,
            sound: 0,
            last_tick: now,
        }
    }

    /// Decrements both non-zero timers by one if a full period has passed
    /// since the last tick. Returns whether a tick happened.
    ///
    /// At most one tick happens per call. The tick schedule stays on a fixed
    /// 1/60 s grid, so callers polling close to 60Hz still see 60 ticks a
    /// second; once a whole extra period has been missed the grid restarts
    /// at `now` instead of catching up.
    pub fn tick(&mut self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.last_tick);
        if elapsed < TIMER_PERIOD {
            return false;
        }

        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
        self.last_tick = if elapsed >= TIMER_PERIOD * 2 {
            now
        } else {
            self.last_tick + TIMER_PERIOD
        };
        true
    }

    pub fn delay(&self) -> u8 {
        self.delay
    }

    pub fn sound(&self) -> u8 {
        self.sound
    }
}
