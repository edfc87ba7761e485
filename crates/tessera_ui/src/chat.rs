//! Chat log shown by the HUD.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

/// Lines kept before the oldest are dropped.
pub const MAX_HISTORY: usize = 500;

/// One received line, color codes intact.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatLine {
    /// Text with `&x` color codes.
    pub text: String,
    /// Arrival time, used to fade old lines.
    pub received: Instant,
}

/// Shared, bounded chat history.
///
/// Clones share storage, so the HUD and the session can both hold one.
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    lines: Arc<Mutex<VecDeque<ChatLine>>>,
}

impl ChatLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a line.
    pub fn add(&self, text: impl Into<String>) {
        let text = text.into();
        tracing::info!(target: "chat", "{}", crate::style::strip_color_codes(&text));
        let mut lines = self.lines.lock();
        if lines.len() == MAX_HISTORY {
            lines.pop_front();
        }
        lines.push_back(ChatLine {
            text,
            received: Instant::now(),
        });
    }

    /// The newest `count` lines, oldest first.
    #[must_use]
    pub fn recent(&self, count: usize) -> Vec<ChatLine> {
        let lines = self.lines.lock();
        let skip = lines.len().saturating_sub(count);
        lines.iter().skip(skip).cloned().collect()
    }

    /// The most recent line.
    #[must_use]
    pub fn last(&self) -> Option<ChatLine> {
        self.lines.lock().back().cloned()
    }

    /// Number of lines held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    /// True if nothing was received.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    /// Forgets all history.
    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}
