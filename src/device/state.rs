//! Operational state and battery snapshots.

use serde::{Deserialize, Serialize};

use super::action::LockAction;

// ---------------------------------------------------------------------------
// Lock state
// ---------------------------------------------------------------------------

/// Discriminated lock state reported by the opener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LockState {
    Uninitialized,
    /// Ring-to-open inactive; the door stays shut when the bell rings.
    Locked,
    /// Ring-to-open armed; the next ring opens the door.
    RtoActive,
    Open,
    Opening,
    #[default]
    Undefined,
}

impl LockState {
    /// Stable label used in logs and published payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Locked => "locked",
            Self::RtoActive => "rtoActive",
            Self::Open => "open",
            Self::Opening => "opening",
            Self::Undefined => "undefined",
        }
    }
}

impl core::fmt::Display for LockState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operating mode of the opener firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeviceMode {
    #[default]
    Uninitialized,
    PairingMode,
    DoorMode,
    ContinuousMode,
    MaintenanceMode,
}

/// What caused the last state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Trigger {
    #[default]
    System,
    Manual,
    Button,
    Automatic,
    AutoLock,
}

// ---------------------------------------------------------------------------
// State snapshot
// ---------------------------------------------------------------------------

/// Full operational state fetched from the opener.
///
/// Stored wholesale: a fetch replaces the whole record, fields are never
/// merged individually.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenerState {
    pub device_mode: DeviceMode,
    pub lock_state: LockState,
    pub trigger: Trigger,
    pub critical_battery: bool,
    /// Minutes left on the ring-to-open timer.
    pub ring_to_open_timer_min: u8,
    pub last_action: Option<LockAction>,
    pub last_action_trigger: Trigger,
    /// Raw completion status code of the last action (0 = success).
    pub last_action_completion: u8,
}

// ---------------------------------------------------------------------------
// Battery
// ---------------------------------------------------------------------------

/// Battery and supply voltage snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryReport {
    pub critical: bool,
    pub voltage_mv: u16,
    /// Energy drained by the last action (mWs).
    pub drain_mws: u16,
    pub lowest_voltage_mv: u16,
}
