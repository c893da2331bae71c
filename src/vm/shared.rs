use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use super::{Chip8, Chip8Error, Frame, StepOutcome};
use crate::u4;

/// Cloneable handle for driving one machine from several threads.
///
/// The driver thread steps, a renderer reads framebuffer snapshots and an
/// input thread sets keys; each call holds the lock for one operation only.
#[derive(Clone)]
pub struct SharedChip8 {
    inner: Arc<Mutex<Chip8>>,
}

impl SharedChip8 {
    pub fn new(chip8: Chip8) -> Self {
        Self {
            inner: Arc::new(Mutex::new(chip8)),
        }
    }

    // A panic mid-call cannot leave a half-applied instruction behind, so the
    // poisoned state is still consistent.
    fn lock(&self) -> MutexGuard<'_, Chip8> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn step(&self) -> Result<StepOutcome, Chip8Error> {
        self.lock().step()
    }

    pub fn step_at(&self, now: Instant) -> Result<StepOutcome, Chip8Error> {
        self.lock().step_at(now)
    }

    pub fn read_framebuffer(&self) -> Frame {
        self.lock().read_framebuffer()
    }

    /// Sets a key from a raw index, rejecting anything above 0xF.
    pub fn set_key(&self, key: u8, pressed: bool) -> Result<(), Chip8Error> {
        let key = u4::try_from(key).map_err(|e| Chip8Error::InvalidKey { key: e.0 })?;
        self.lock().set_key(key, pressed);
        Ok(())
    }

    pub fn delay_timer(&self) -> u8 {
        self.lock().delay_timer()
    }

    pub fn sound_timer(&self) -> u8 {
        self.lock().sound_timer()
    }

    /// Runs `f` with exclusive access to the machine.
    pub fn with<R>(&self, f: impl FnOnce(&mut Chip8) -> R) -> R {
        f(&mut self.lock())
    }
}
