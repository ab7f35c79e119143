//! Log-based network publisher.
//!
//! Implements [`NetworkPublisher`] by writing every outbound message to the
//! logger as `topic = payload`, with JSON payloads for structured records.
//! A real MQTT adapter implements the same trait with the same topics.

use log::{info, warn};
use serde::Serialize;

use crate::app::ports::NetworkPublisher;
use crate::device::{
    BatteryReport, CapabilityDescriptor, LogEntry, OpenerAdvancedConfig, OpenerConfig, OpenerState,
};

/// Adapter that logs every publish under a base topic.
pub struct LogPublisher {
    base_topic: String,
    /// Number of messages published so far.
    published: u64,
}

impl LogPublisher {
    pub fn new(base_topic: impl Into<String>) -> Self {
        Self {
            base_topic: base_topic.into(),
            published: 0,
        }
    }

    pub fn published(&self) -> u64 {
        self.published
    }

    fn emit(&mut self, path: &str, payload: &str) {
        self.published += 1;
        info!("PUB | {}/{} = {}", self.base_topic, path, payload);
    }

    fn emit_json<T: Serialize + ?Sized>(&mut self, path: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.emit(path, &json),
            Err(e) => warn!("PUB | {}/{} not serialisable: {}", self.base_topic, path, e),
        }
    }
}

impl NetworkPublisher for LogPublisher {
    fn publish_state(&mut self, current: &OpenerState, previous: &OpenerState) {
        if current.lock_state != previous.lock_state {
            self.emit("state", current.lock_state.as_str());
        }
        self.emit_json("stateJson", current);
    }

    fn publish_activity_detected(&mut self) {
        self.emit("state", "ring");
    }

    fn publish_battery_report(&mut self, report: &BatteryReport) {
        self.emit_json("battery", report);
    }

    fn publish_config(&mut self, config: &OpenerConfig) {
        self.emit_json("configuration/basic", config);
    }

    fn publish_advanced_config(&mut self, config: &OpenerAdvancedConfig) {
        self.emit_json("configuration/advanced", config);
    }

    fn publish_signal_strength(&mut self, rssi: i32) {
        self.emit("rssi", &rssi.to_string());
    }

    fn publish_command_result(&mut self, result: &str) {
        self.emit("commandResult", result);
    }

    fn publish_audit_log(&mut self, entries: &[LogEntry]) {
        self.emit_json("log", entries);
    }

    fn publish_capability_descriptor(&mut self, descriptor: &CapabilityDescriptor) {
        self.emit_json("discovery", descriptor);
    }

    fn remove_capability_descriptor(&mut self, unique_id: &str) {
        self.emit("discovery/remove", unique_id);
    }

    fn clear_authorization_data(&mut self) {
        self.emit("log", "--");
    }
}
