/// Maximum call depth.
pub const STACK_SIZE: usize = 16;

/// Returned by [`CallStack::push`] when the stack already holds `STACK_SIZE` entries.
#[derive(Debug, PartialEq, Eq)]
pub struct StackFull;

/// Return addresses for 2nnn/00EE.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallStack {
    entries: Vec<u16>,
}

impl CallStack {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(STACK_SIZE),
        }
    }

    pub fn push(&mut self, return_address: u16) -> Result<(), StackFull> {
        if self.entries.len() == STACK_SIZE {
            return Err(StackFull);
        }
        self.entries.push(return_address);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<u16> {
        self.entries.pop()
    }

    /// Saved addresses, oldest first.
    pub fn entries(&self) -> &[u16] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
