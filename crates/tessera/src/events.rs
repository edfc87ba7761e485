//! # Session Events
//!
//! Cross-thread notifications into the frame loop.
//!
//! ```text
//! ┌─────────────┐                   ┌──────────────┐
//! │  Network    │──┐                │              │
//! │  thread     │  │   bounded      │  Frame loop  │
//! └─────────────┘  ├──channel──────>│  (drains at  │
//! ┌─────────────┐  │                │  frame start)│
//! │  Download   │──┘                │              │
//! │  thread     │                   └──────────────┘
//! └─────────────┘
//! ```
//!
//! Collaborators that do I/O off the frame thread never touch the session
//! directly. They post a [`SessionEvent`] and the frame thread applies it
//! at the start of the next frame, before the clock advances.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tessera_rendering::BlockId;

/// Default number of events in flight.
pub const DEFAULT_CAPACITY: usize = 256;

/// Events posted to the frame loop.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    // =========================================================================
    // Connection
    // =========================================================================
    /// The server dropped the connection or refused it.
    Disconnected {
        /// Error screen title.
        title: String,
        /// Error screen reason.
        reason: String,
    },

    // =========================================================================
    // World
    // =========================================================================
    /// The server changed a block.
    BlockChanged {
        /// X coordinate.
        x: i32,
        /// Y coordinate.
        y: i32,
        /// Z coordinate.
        z: i32,
        /// New block.
        block: BlockId,
    },

    // =========================================================================
    // Client
    // =========================================================================
    /// Capture a screenshot at the end of the next frame.
    ScreenshotRequested,
}

/// Handle for posting events. Clone one per producer.
#[derive(Clone, Debug)]
pub struct EventSender {
    sender: Sender<SessionEvent>,
}

impl EventSender {
    /// Posts an event without blocking.
    ///
    /// Returns `false` if the queue is full or the session is gone.
    pub fn send(&self, event: SessionEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                tracing::warn!("session event queue full, dropping {:?}", event);
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Frame-thread end of the queue.
#[derive(Debug)]
pub struct EventReceiver {
    receiver: Receiver<SessionEvent>,
}

impl EventReceiver {
    /// Takes everything pending without blocking.
    pub fn drain(&self) -> Vec<SessionEvent> {
        self.receiver.try_iter().collect()
    }

    /// Number of events waiting.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}

/// Creates a connected sender and receiver.
#[must_use]
pub fn channel(capacity: usize) -> (EventSender, EventReceiver) {
    let (sender, receiver) = bounded(capacity.max(1));
    (EventSender { sender }, EventReceiver { receiver })
}
