//! Device configuration snapshots and the capability descriptor.

use serde::{Deserialize, Serialize};

/// Basic opener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenerConfig {
    pub nuki_id: u32,
    pub name: String,
    pub button_enabled: bool,
    pub led_flash_enabled: bool,
    pub pairing_enabled: bool,
}

/// Advanced opener configuration (audio feedback, intercom wiring).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenerAdvancedConfig {
    /// Speaker volume, 0–255.
    pub sound_level: u8,
    pub intercom_id: u16,
    /// Raw action code bound to a single press of the device button.
    pub single_button_press_action: u8,
}

/// Self-description of the device published to the network once paired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityDescriptor {
    pub device_type: &'static str,
    pub base_topic: String,
    pub name: String,
    /// Device id in lowercase hex.
    pub unique_id: String,
    pub lock_action: &'static str,
    pub unlock_action: &'static str,
    pub open_action: &'static str,
    pub locked_state: &'static str,
    pub unlocked_state: &'static str,
}

impl CapabilityDescriptor {
    /// Unique id derived from the device id, as advertised to the network.
    pub fn unique_id_for(id: u32) -> String {
        format!("{id:x}")
    }

    /// Build the opener descriptor from a fetched configuration.
    pub fn opener(base_topic: &str, config: &OpenerConfig) -> Self {
        Self {
            device_type: "Opener",
            base_topic: base_topic.to_owned(),
            name: config.name.clone(),
            unique_id: Self::unique_id_for(config.nuki_id),
            lock_action: "deactivateRTO",
            unlock_action: "activateRTO",
            open_action: "electricStrikeActuation",
            locked_state: "locked",
            unlocked_state: "unlocked",
        }
    }
}
