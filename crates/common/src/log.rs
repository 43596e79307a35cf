//! Warning sink
//!
//! Non-fatal misconfigurations are reported through an injected [`Log`]
//! instead of being printed directly, so callers decide where they end up.

use std::cell::RefCell;

/// Destination for warnings emitted while normalizing events
pub trait Log {
    fn log(&self, message: &str);
}

impl<L: Log + ?Sized> Log for &L {
    fn log(&self, message: &str) {
        (**self).log(message)
    }
}

/// Keeps every message in emission order
#[derive(Debug, Default)]
pub struct MemoryLog {
    messages: RefCell<Vec<String>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }

    /// Remove and return everything logged so far
    pub fn drain(&self) -> Vec<String> {
        self.messages.borrow_mut().drain(..).collect()
    }
}

impl Log for MemoryLog {
    fn log(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
