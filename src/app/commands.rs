//! Inbound user commands.
//!
//! The network layer submits command names; [`CommandSequencer`] holds at
//! most one parsed [`LockAction`] until the next paired tick executes it.
//! A newer submission overwrites an older one that has not run yet.

use log::{debug, warn};

use crate::device::LockAction;

/// Single-slot holder for the next user action.
#[derive(Debug, Default)]
pub struct CommandSequencer {
    pending: Option<LockAction>,
}

impl CommandSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and store a command.
    ///
    /// Unknown names are rejected and leave the pending slot untouched.
    pub fn submit(&mut self, name: &str) -> bool {
        match name.parse::<LockAction>() {
            Ok(action) => {
                if let Some(prev) = self.pending.replace(action) {
                    debug!("Opener: pending action {} replaced by {}", prev, action);
                }
                true
            }
            Err(e) => {
                warn!("Opener: rejected command '{}': {}", name, e);
                false
            }
        }
    }

    /// Remove the pending action for execution.
    pub fn take(&mut self) -> Option<LockAction> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<LockAction> {
        self.pending
    }
}
