use async_trait::async_trait;

use crate::error::ClipboardError;

/// Destination for copied secrets.
///
/// The TUI wires in a system clipboard; tests use `MemoryClipboard`.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write(&self, text: &str) -> Result<(), ClipboardError>;
}

#[cfg(any(test, feature = "test-helpers"))]
pub use memory::MemoryClipboard;

#[cfg(any(test, feature = "test-helpers"))]
mod memory {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::Clipboard;
    use crate::error::ClipboardError;

    /// Clipboard that records writes in memory and can be told to fail.
    #[derive(Debug, Clone, Default)]
    pub struct MemoryClipboard {
        inner: Arc<Mutex<Inner>>,
    }

    #[derive(Debug, Default)]
    struct Inner {
        writes: Vec<String>,
        fail: bool,
    }

    impl MemoryClipboard {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            let clipboard = Self::default();
            clipboard.set_failing(true);
            clipboard
        }

        pub fn set_failing(&self, fail: bool) {
            if let Ok(mut inner) = self.inner.lock() {
                inner.fail = fail;
            }
        }

        pub fn writes(&self) -> Vec<String> {
            self.inner
                .lock()
                .map(|inner| inner.writes.clone())
                .unwrap_or_default()
        }

        pub fn contents(&self) -> Option<String> {
            self.writes().pop()
        }
    }

    #[async_trait]
    impl Clipboard for MemoryClipboard {
        async fn write(&self, text: &str) -> Result<(), ClipboardError> {
            let mut inner = self
                .inner
                .lock()
                .map_err(|e| ClipboardError::Write(e.to_string()))?;
            if inner.fail {
                return Err(ClipboardError::Write("simulated failure".into()));
            }
            inner.writes.push(text.to_string());
            Ok(())
        }
    }
}
