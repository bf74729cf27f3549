//! In-memory clipboard.

use std::sync::RwLock;

use crate::sync::{read, write};

/// Text clipboard of a window.
pub trait Clipboard: Send + Sync {
    /// Current text.
    fn content(&self) -> String;

    /// Replaces the text.
    fn set_content(&self, content: &str);
}

/// A clipboard that never leaves the process.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    content: RwLock<String>,
}

impl MemoryClipboard {
    /// Creates an empty clipboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for MemoryClipboard {
    fn content(&self) -> String {
        read(&self.content).clone()
    }

    fn set_content(&self, content: &str) {
        content.clone_into(&mut write(&self.content));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_last_content() {
        let clipboard = MemoryClipboard::new();
        assert_eq!(clipboard.content(), "");
        clipboard.set_content("first");
        clipboard.set_content("second");
        assert_eq!(clipboard.content(), "second");
    }
}
