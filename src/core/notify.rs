//! Status messages from nodes to whoever is hosting them.
//!
//! Some nodes report conditions that are not errors (an empty switch, a
//! missing slot). They send a short message through a [`NotificationSink`]
//! handed to them at construction.

use parking_lot::Mutex;
use std::sync::Arc;

/// Receiver for node status messages.
pub trait NotificationSink: Send + Sync + std::fmt::Debug {
    /// Deliver one message from the node `source`.
    fn notify(&self, source: &str, message: &str);
}

/// Forwards every message to the `log` facade at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, source: &str, message: &str) {
        log::info!("[{}] {}", source, message);
    }
}

/// Keeps messages in memory so a host (or a test) can drain them later.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<(String, String)>>,
}

impl MemorySink {
    /// Create an empty sink behind an `Arc`, ready to share with nodes.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Messages received so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().iter().map(|(_, m)| m.clone()).collect()
    }

    /// Remove and return every `(source, message)` pair.
    pub fn drain(&self) -> Vec<(String, String)> {
        std::mem::take(&mut *self.messages.lock())
    }
}

impl NotificationSink for MemorySink {
    fn notify(&self, source: &str, message: &str) {
        self.messages.lock().push((source.to_string(), message.to_string()));
    }
}
