//! Port traits: the hexagonal boundary between the sync core and the outside world.
//!
//! ```text
//!   ProtocolClient ──▶ SyncService ──▶ NetworkPublisher
//!                          ▲
//!   network layer ─────────┘ (InboundHandler)
//! ```
//!
//! The radio protocol library and the messaging layer are external
//! collaborators.  [`SyncService`](super::service::SyncService) owns one
//! implementation of each, so tests drive the whole core with recording
//! mocks and a simulated clock.

use crate::device::{
    BatteryReport, CapabilityDescriptor, LockAction, LogEntry, LogRetrieval, OpenerAdvancedConfig,
    OpenerConfig, OpenerState,
};
use crate::error::CmdError;

use super::events::StatusNotifier;

// ───────────────────────────────────────────────────────────────
// Protocol client (driven adapter: domain ↔ peripheral)
// ───────────────────────────────────────────────────────────────

/// Abstract operations of the peripheral protocol library.
///
/// Every call is synchronous and returns promptly with a result code; there
/// is no cancellation.  Fetch operations return the whole record on success.
pub trait ProtocolClient {
    /// One-time protocol stack setup.
    fn initialize(&mut self);

    /// Hook the client into the shared device scanner.
    fn register_scanner(&mut self);

    /// Register the handle the client raises on "status updated" events.
    fn set_event_handler(&mut self, notifier: StatusNotifier);

    /// Run the pairing handshake.
    fn pair(&mut self) -> Result<(), CmdError>;

    /// Drop pairing credentials.
    fn unpair(&mut self);

    /// Link-layer housekeeping; called every paired tick.
    fn refresh_connection(&mut self);

    fn request_state(&mut self) -> Result<OpenerState, CmdError>;

    fn request_battery_report(&mut self) -> Result<BatteryReport, CmdError>;

    fn request_config(&mut self) -> Result<OpenerConfig, CmdError>;

    fn request_advanced_config(&mut self) -> Result<OpenerAdvancedConfig, CmdError>;

    /// Execute a user action with no PIN or option overrides.
    fn send_command(&mut self, action: LockAction) -> Result<(), CmdError>;

    /// Current link signal strength (dBm).
    fn signal_strength(&mut self) -> i32;

    /// Ask the peripheral to prepare up to `count` log entries.
    fn retrieve_log_entries(&mut self, count: u16, mode: LogRetrieval) -> Result<(), CmdError>;

    /// Total entry count, valid after a [`LogRetrieval::TotalCount`] request.
    fn log_entry_count(&mut self) -> u16;

    /// Entries transferred by the last [`LogRetrieval::MostRecent`] request.
    fn log_entries(&mut self) -> Vec<LogEntry>;

    fn enable_button(&mut self, enabled: bool) -> Result<(), CmdError>;

    fn enable_led_flash(&mut self, enabled: bool) -> Result<(), CmdError>;

    fn set_sound_level(&mut self, level: u8) -> Result<(), CmdError>;

    /// Store the security PIN used for privileged commands.
    fn save_security_pin(&mut self, pin: u16);
}

// ───────────────────────────────────────────────────────────────
// Network publisher (driven adapter: domain → messaging network)
// ───────────────────────────────────────────────────────────────

/// Outbound publishing.  Adapters decide the wire format and topics.
pub trait NetworkPublisher {
    /// Publish a fresh state snapshot alongside the previous one so the
    /// adapter can emit only changed fields.
    fn publish_state(&mut self, current: &OpenerState, previous: &OpenerState);

    /// Momentary activity (doorbell ring) on the intercom line.
    fn publish_activity_detected(&mut self);

    fn publish_battery_report(&mut self, report: &BatteryReport);

    fn publish_config(&mut self, config: &OpenerConfig);

    fn publish_advanced_config(&mut self, config: &OpenerAdvancedConfig);

    fn publish_signal_strength(&mut self, rssi: i32);

    fn publish_command_result(&mut self, result: &str);

    fn publish_audit_log(&mut self, entries: &[LogEntry]);

    fn publish_capability_descriptor(&mut self, descriptor: &CapabilityDescriptor);

    fn remove_capability_descriptor(&mut self, unique_id: &str);

    /// Wipe any authorization / audit data previously published.
    fn clear_authorization_data(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Inbound handler (driving adapter: messaging network → domain)
// ───────────────────────────────────────────────────────────────

/// Callbacks the network layer invokes for inbound messages.
///
/// The network layer receives `&mut dyn InboundHandler` bound to the owning
/// service instead of a global instance pointer.  Calls happen on the same
/// execution context as [`tick`](super::service::SyncService::tick).
pub trait InboundHandler {
    /// A command name arrived.  Returns whether it was accepted.
    fn on_command_received(&mut self, name: &str) -> bool;

    /// A configuration topic received a new value.
    fn on_config_change_received(&mut self, topic: &str, value: &str);
}

// ───────────────────────────────────────────────────────────────
// Clock
// ───────────────────────────────────────────────────────────────

/// Monotonic time source.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin; never decreases.
    fn now_ms(&self) -> u64;
}
