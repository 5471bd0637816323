//! Capture of server notices.

use std::sync::Arc;

use parking_lot::Mutex;

/// Shared buffer holding the most recent server notice.
///
/// Clones share the same storage, so one clone can live inside the notice
/// handler installed on a session while another stays with the handle that
/// wants to read the notice back.
#[derive(Debug, Clone, Default)]
pub struct NoticeBuffer {
    inner: Arc<Mutex<Option<String>>>,
}

impl NoticeBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the buffer with `message`.
    pub fn record(&self, message: &str) {
        *self.inner.lock() = Some(message.to_owned());
    }

    /// The most recent notice, if any has arrived.
    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.inner.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_until_first_notice() {
        let buffer = NoticeBuffer::new();
        assert_eq!(buffer.last(), None);
    }

    #[test]
    fn keeps_only_the_most_recent_notice() {
        let buffer = NoticeBuffer::new();
        buffer.record("first");
        buffer.record("second");
        assert_eq!(buffer.last().as_deref(), Some("second"));
    }

    #[test]
    fn clones_share_storage() {
        let buffer = NoticeBuffer::new();
        let writer = buffer.clone();
        writer.record("shared");
        assert_eq!(buffer.last().as_deref(), Some("shared"));
    }
}
