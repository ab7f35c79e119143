//! Audit log records.

use serde::{Deserialize, Serialize};

/// How a log retrieval request should be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRetrieval {
    /// Only refresh the total entry count on the peripheral.
    TotalCount,
    /// Transfer the newest entries, most recent first.
    MostRecent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogTimestamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// One audit log entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub index: u32,
    pub timestamp: LogTimestamp,
    pub auth_id: u32,
    pub name: String,
    pub logging_type: u8,
    pub action: u8,
    pub trigger: u8,
    pub completion_status: u8,
}
