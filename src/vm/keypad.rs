use crate::u4;

/// State of the 16-key hex keypad.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyState {
    /// true = pressed
    keys: [bool; 16],
    /// Most recent released-to-pressed transition not yet consumed.
    last_press: Option<u4>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the state of a key on the keypad.
    pub fn set_key(&mut self, key: u4, pressed: bool) {
        if pressed && !self.keys[key] {
            self.last_press = Some(key);
        }
        self.keys[key] = pressed;
    }

    pub fn is_pressed(&self, key: u4) -> bool {
        self.keys[key]
    }

    pub fn keys(&self) -> &[bool; 16] {
        &self.keys
    }

    /// Forgets presses seen so far, so only later presses are reported.
    pub(crate) fn clear_press(&mut self) {
        self.last_press = None;
    }

    /// Returns and consumes the latest press.
    pub(crate) fn take_press(&mut self) -> Option<u4> {
        self.last_press.take()
    }
}
