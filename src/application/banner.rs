//! Transient result banner.
//!
//! Holds at most one message and clears it after a fixed delay. Each new
//! message restarts the countdown; a timer started for an older message
//! never clears a newer one.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Outcome shown to the user after an export action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BannerMessage {
    /// The action succeeded.
    Success(String),
    /// The action failed.
    Error(String),
}

impl BannerMessage {
    /// Text of the message.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Error(text) => text,
        }
    }

    /// Whether this reports a success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    message: Option<BannerMessage>,
}

/// Single-slot message with a self-clearing timer.
#[derive(Debug, Clone)]
pub struct ResultBanner {
    slot: Arc<Mutex<Slot>>,
    duration: Duration,
}

impl ResultBanner {
    /// Create a banner whose messages live for `duration`.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            duration,
        }
    }

    /// Show `message`, replacing the current one and restarting the timer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn show(&self, message: BannerMessage) {
        let generation = {
            let mut slot = self.lock();
            slot.generation += 1;
            slot.message = Some(message);
            slot.generation
        };

        let slot = Arc::clone(&self.slot);
        let duration = self.duration;
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let mut slot = slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            if slot.generation == generation {
                slot.message = None;
                tracing::trace!(generation, "Banner expired");
            }
        });
    }

    /// Remove the current message immediately.
    pub fn clear(&self) {
        let mut slot = self.lock();
        slot.generation += 1;
        slot.message = None;
    }

    /// Message currently on display.
    #[must_use]
    pub fn current(&self) -> Option<BannerMessage> {
        self.lock().message.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
