//! Typed mirror of the peripheral.
//!
//! Everything the protocol client hands back is modelled here as a plain,
//! default-constructible record.  The synchronization core stores these
//! wholesale; nothing in this module performs I/O.

pub mod action;
pub mod audit;
pub mod settings;
pub mod state;

pub use action::LockAction;
pub use audit::{LogEntry, LogRetrieval, LogTimestamp};
pub use settings::{CapabilityDescriptor, OpenerAdvancedConfig, OpenerConfig};
pub use state::{BatteryReport, DeviceMode, LockState, OpenerState, Trigger};

/// Immutable identity of the mirrored peripheral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub name: String,
    pub id: u32,
}

impl DeviceIdentity {
    pub fn new(name: impl Into<String>, id: u32) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }
}
