//! Simulated opener.
//!
//! An in-memory [`ProtocolClient`] for running the core on a host without a
//! radio.  Commands change the simulated lock state, each one appends an
//! audit entry, and [`ring`](SimulatedOpener::ring) mimics a doorbell event.

use log::debug;

use crate::app::events::{ProtocolEvent, StatusNotifier};
use crate::app::ports::ProtocolClient;
use crate::app::service::PIN_CLEARED;
use crate::device::{
    BatteryReport, DeviceMode, LockAction, LockState, LogEntry, LogRetrieval, OpenerAdvancedConfig,
    OpenerConfig, OpenerState, Trigger,
};
use crate::error::CmdError;

/// In-memory opener.
pub struct SimulatedOpener {
    /// Pairing attempts that fail before one succeeds.
    pairing_failures: u32,
    paired: bool,
    notifier: Option<StatusNotifier>,
    state: OpenerState,
    config: OpenerConfig,
    advanced: OpenerAdvancedConfig,
    voltage_mv: u16,
    pin: Option<u16>,
    log: Vec<LogEntry>,
    prepared: Vec<LogEntry>,
    rssi_step: u32,
}

impl SimulatedOpener {
    pub fn new(name: &str, id: u32) -> Self {
        Self {
            pairing_failures: 0,
            paired: false,
            notifier: None,
            state: OpenerState {
                device_mode: DeviceMode::DoorMode,
                lock_state: LockState::Locked,
                ..Default::default()
            },
            config: OpenerConfig {
                nuki_id: id,
                name: name.to_owned(),
                button_enabled: true,
                led_flash_enabled: true,
                pairing_enabled: true,
            },
            advanced: OpenerAdvancedConfig {
                sound_level: 128,
                ..Default::default()
            },
            voltage_mv: 5_200,
            pin: None,
            log: Vec::new(),
            prepared: Vec::new(),
            rssi_step: 0,
        }
    }

    /// Make the first `n` pairing attempts fail.
    pub fn with_pairing_failures(mut self, n: u32) -> Self {
        self.pairing_failures = n;
        self
    }

    /// Simulate a doorbell ring: raise "status updated" without a state change.
    pub fn ring(&self) {
        if let Some(n) = &self.notifier {
            n.notify(ProtocolEvent::StatusUpdated);
        }
    }

    pub fn pin(&self) -> Option<u16> {
        self.pin
    }

    fn record(&mut self, action: LockAction) {
        let index = self.log.len() as u32 + 1;
        self.log.push(LogEntry {
            index,
            auth_id: 1,
            name: "gateway".into(),
            logging_type: 1,
            action: action as u8,
            trigger: 0,
            completion_status: 0,
            ..Default::default()
        });
    }
}

impl ProtocolClient for SimulatedOpener {
    fn initialize(&mut self) {
        debug!("SIM | initialize");
    }

    fn register_scanner(&mut self) {}

    fn set_event_handler(&mut self, notifier: StatusNotifier) {
        self.notifier = Some(notifier);
    }

    fn pair(&mut self) -> Result<(), CmdError> {
        if self.pairing_failures > 0 {
            self.pairing_failures -= 1;
            return Err(CmdError::TimeOut);
        }
        self.paired = true;
        Ok(())
    }

    fn unpair(&mut self) {
        self.paired = false;
    }

    fn refresh_connection(&mut self) {}

    fn request_state(&mut self) -> Result<OpenerState, CmdError> {
        if !self.paired {
            return Err(CmdError::NotPaired);
        }
        Ok(self.state.clone())
    }

    fn request_battery_report(&mut self) -> Result<BatteryReport, CmdError> {
        if !self.paired {
            return Err(CmdError::NotPaired);
        }
        self.voltage_mv = self.voltage_mv.saturating_sub(1);
        Ok(BatteryReport {
            critical: self.voltage_mv < 4_000,
            voltage_mv: self.voltage_mv,
            drain_mws: 12,
            lowest_voltage_mv: self.voltage_mv.saturating_sub(150),
        })
    }

    fn request_config(&mut self) -> Result<OpenerConfig, CmdError> {
        if !self.paired {
            return Err(CmdError::NotPaired);
        }
        Ok(self.config.clone())
    }

    fn request_advanced_config(&mut self) -> Result<OpenerAdvancedConfig, CmdError> {
        if !self.paired {
            return Err(CmdError::NotPaired);
        }
        Ok(self.advanced.clone())
    }

    fn send_command(&mut self, action: LockAction) -> Result<(), CmdError> {
        if !self.paired {
            return Err(CmdError::NotPaired);
        }
        self.state.lock_state = match action {
            LockAction::ActivateRto => LockState::RtoActive,
            LockAction::DeactivateRto => LockState::Locked,
            LockAction::ElectricStrikeActuation => LockState::Open,
            LockAction::ActivateContinuousMode => {
                self.state.device_mode = DeviceMode::ContinuousMode;
                LockState::RtoActive
            }
            LockAction::DeactivateContinuousMode => {
                self.state.device_mode = DeviceMode::DoorMode;
                LockState::Locked
            }
            LockAction::FobAction1 | LockAction::FobAction2 | LockAction::FobAction3 => {
                self.state.lock_state
            }
        };
        self.state.trigger = Trigger::System;
        self.state.last_action = Some(action);
        self.record(action);
        Ok(())
    }

    fn signal_strength(&mut self) -> i32 {
        // Changes every fourth sample.
        self.rssi_step = self.rssi_step.wrapping_add(1);
        -60 - ((self.rssi_step / 4) % 3) as i32
    }

    fn retrieve_log_entries(&mut self, count: u16, mode: LogRetrieval) -> Result<(), CmdError> {
        if !self.paired {
            return Err(CmdError::NotPaired);
        }
        if mode == LogRetrieval::MostRecent {
            self.prepared = self.log.iter().rev().take(count as usize).cloned().collect();
        }
        Ok(())
    }

    fn log_entry_count(&mut self) -> u16 {
        self.log.len() as u16
    }

    fn log_entries(&mut self) -> Vec<LogEntry> {
        core::mem::take(&mut self.prepared)
    }

    fn enable_button(&mut self, enabled: bool) -> Result<(), CmdError> {
        if !self.paired {
            return Err(CmdError::NotPaired);
        }
        self.config.button_enabled = enabled;
        Ok(())
    }

    fn enable_led_flash(&mut self, enabled: bool) -> Result<(), CmdError> {
        if !self.paired {
            return Err(CmdError::NotPaired);
        }
        self.config.led_flash_enabled = enabled;
        Ok(())
    }

    fn set_sound_level(&mut self, level: u8) -> Result<(), CmdError> {
        if !self.paired {
            return Err(CmdError::NotPaired);
        }
        self.advanced.sound_level = level;
        Ok(())
    }

    fn save_security_pin(&mut self, pin: u16) {
        self.pin = (pin != PIN_CLEARED).then_some(pin);
    }
}
