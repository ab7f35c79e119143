//! Asynchronous notifications from the protocol client.
//!
//! The radio stack may report "status updated" from its own callback
//! context.  [`StatusNotifier`] is the lock-free handle it raises; the tick
//! loop consumes the flag when it runs the state poll.
//!
//! ```text
//! ┌────────────────┐  raise()   ┌──────────────┐  take()  ┌──────────────┐
//! │ ProtocolClient │──────────▶│  AtomicBool  │────────▶│  tick loop   │
//! │ event callback │            │  (shared)    │          │  state poll  │
//! └────────────────┘            └──────────────┘          └──────────────┘
//! ```

use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::device::{LockState, OpenerState};

/// Event kinds the protocol client can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolEvent {
    /// The peripheral's status changed; its state should be re-read.
    StatusUpdated,
    /// Any other event; ignored by the sync core.
    Other,
}

/// Cloneable handle to the "status updated" flag.
#[derive(Debug, Clone, Default)]
pub struct StatusNotifier {
    flag: Arc<AtomicBool>,
}

impl StatusNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward a protocol event.  Only [`ProtocolEvent::StatusUpdated`]
    /// raises the flag.
    pub fn notify(&self, event: ProtocolEvent) {
        if event == ProtocolEvent::StatusUpdated {
            self.raise();
        }
    }

    /// Mark the status as updated.  Safe from any thread.
    pub fn raise(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether an update is pending, without consuming it.
    pub fn is_raised(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Consume the pending update, if any.
    pub fn take(&self) -> bool {
        self.flag.swap(false, Ordering::AcqRel)
    }
}

/// How an event-triggered state poll is interpreted.
///
/// The opener reports a doorbell ring as a status event without changing
/// its lock state.  Reading `Locked` both before and after such an event is
/// therefore treated as a ring rather than a state change.  This is a
/// heuristic over observed firmware behaviour, not a protocol guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivityPolicy {
    /// Event + `Locked` → `Locked` is reported as activity.
    #[default]
    RepeatedLockedIsRing,
    /// Every poll publishes state; activity is never inferred.
    StateOnly,
}

impl ActivityPolicy {
    /// Whether an event-triggered poll that read `current` after `previous`
    /// should be reported as activity.
    pub fn is_activity(self, current: &OpenerState, previous: &OpenerState) -> bool {
        match self {
            Self::RepeatedLockedIsRing => {
                current.lock_state == LockState::Locked && previous.lock_state == LockState::Locked
            }
            Self::StateOnly => false,
        }
    }
}
