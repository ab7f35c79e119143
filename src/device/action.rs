//! User-issuable opener actions.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Action sent to the opener through the command sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LockAction {
    #[serde(rename = "activateRTO")]
    ActivateRto = 0x01,
    #[serde(rename = "deactivateRTO")]
    DeactivateRto = 0x02,
    #[serde(rename = "electricStrikeActuation")]
    ElectricStrikeActuation = 0x03,
    #[serde(rename = "activateCM")]
    ActivateContinuousMode = 0x04,
    #[serde(rename = "deactivateCM")]
    DeactivateContinuousMode = 0x05,
    #[serde(rename = "fobAction1")]
    FobAction1 = 0x81,
    #[serde(rename = "fobAction2")]
    FobAction2 = 0x82,
    #[serde(rename = "fobAction3")]
    FobAction3 = 0x83,
}

impl LockAction {
    pub const ALL: [Self; 8] = [
        Self::ActivateRto,
        Self::DeactivateRto,
        Self::ElectricStrikeActuation,
        Self::ActivateContinuousMode,
        Self::DeactivateContinuousMode,
        Self::FobAction1,
        Self::FobAction2,
        Self::FobAction3,
    ];

    /// Command name accepted on the network side.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ActivateRto => "activateRTO",
            Self::DeactivateRto => "deactivateRTO",
            Self::ElectricStrikeActuation => "electricStrikeActuation",
            Self::ActivateContinuousMode => "activateCM",
            Self::DeactivateContinuousMode => "deactivateCM",
            Self::FobAction1 => "fobAction1",
            Self::FobAction2 => "fobAction2",
            Self::FobAction3 => "fobAction3",
        }
    }
}

impl core::fmt::Display for LockAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned for command names that map to no action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownAction;

impl core::fmt::Display for UnknownAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "unknown lock action")
    }
}

impl FromStr for LockAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or(UnknownAction)
    }
}
