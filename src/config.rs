//! Synchronization configuration parameters
//!
//! Polling cadences, feature toggles, and the empirically tuned delays used
//! by the tick loop.  The two poll intervals and the audit-log toggle are
//! user settings; the rest are tunables with defaults matched to the radio
//! stack.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default state poll interval (seconds).
pub const DEFAULT_STATE_INTERVAL_SECS: u32 = 60 * 5;
/// Default battery poll interval (seconds).
pub const DEFAULT_BATTERY_INTERVAL_SECS: u32 = 60 * 30;

/// Core synchronization configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    // --- User settings ---
    /// State poll interval in seconds (0 = use default)
    pub state_interval_secs: u32,
    /// Battery poll interval in seconds (0 = use default)
    pub battery_interval_secs: u32,
    /// Retrieve and publish the audit log after every state poll
    pub publish_audit_log: bool,
    /// Base topic advertised in the capability descriptor
    pub base_topic: String,

    // --- Fixed cadences ---
    /// Configuration poll interval (seconds)
    pub config_interval_secs: u32,
    /// Signal strength sampling interval (milliseconds)
    pub signal_strength_interval_ms: u32,

    // --- Tuned delays ---
    /// Stall after a failed pairing attempt (milliseconds)
    pub pairing_retry_delay_ms: u32,
    /// Settling delay after the log-count refresh (milliseconds)
    pub audit_count_settle_ms: u32,
    /// Settling delay after the bounded log retrieval (milliseconds)
    pub audit_fetch_settle_ms: u32,
    /// State intervals above this get an accelerated poll after a command (seconds)
    pub post_command_threshold_secs: u32,
    /// Delay of the accelerated post-command state poll (seconds)
    pub post_command_poll_delay_secs: u32,
    /// Delay of the confirmation config poll after a config write (milliseconds)
    pub config_confirm_delay_ms: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            state_interval_secs: DEFAULT_STATE_INTERVAL_SECS,
            battery_interval_secs: DEFAULT_BATTERY_INTERVAL_SECS,
            publish_audit_log: false,
            base_topic: "opener".into(),

            config_interval_secs: 60 * 60,
            signal_strength_interval_ms: 3000,

            pairing_retry_delay_ms: 200,
            audit_count_settle_ms: 100,
            audit_fetch_settle_ms: 1000,
            post_command_threshold_secs: 10,
            post_command_poll_delay_secs: 10,
            config_confirm_delay_ms: 300,
        }
    }
}

impl SyncConfig {
    /// Replace unset (zero) user intervals with their defaults.
    ///
    /// Returns `true` if anything was changed.
    pub fn normalize(&mut self) -> bool {
        let mut changed = false;
        if self.state_interval_secs == 0 {
            self.state_interval_secs = DEFAULT_STATE_INTERVAL_SECS;
            changed = true;
        }
        if self.battery_interval_secs == 0 {
            self.battery_interval_secs = DEFAULT_BATTERY_INTERVAL_SECS;
            changed = true;
        }
        changed
    }

    /// Reject tunables that would stall or spin the tick loop.
    pub fn validate(&self) -> Result<()> {
        if self.config_interval_secs == 0 {
            return Err(Error::Config("config_interval_secs must be non-zero"));
        }
        if self.signal_strength_interval_ms == 0 {
            return Err(Error::Config("signal_strength_interval_ms must be non-zero"));
        }
        if self.base_topic.is_empty() {
            return Err(Error::Config("base_topic must not be empty"));
        }
        Ok(())
    }
}
