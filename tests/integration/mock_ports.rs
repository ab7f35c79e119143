//! Mock ports for integration tests.
//!
//! The protocol client and publisher record every call so tests can assert
//! on the full history.  Clock and delay share one simulated timeline:
//! tests move time forward explicitly, and blocking delays inside the core
//! advance it too.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use openersync::app::events::StatusNotifier;
use openersync::app::ports::{Clock, NetworkPublisher, ProtocolClient};
use openersync::app::service::SyncService;
use openersync::config::SyncConfig;
use openersync::device::{
    BatteryReport, CapabilityDescriptor, DeviceIdentity, LockAction, LockState, LogEntry,
    LogRetrieval, OpenerAdvancedConfig, OpenerConfig, OpenerState,
};
use openersync::error::CmdError;

pub const DEVICE_ID: u32 = 0x1a2b;

// ── Simulated time ────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct SimTime(Rc<Cell<u64>>);

#[allow(dead_code)]
impl SimTime {
    pub fn now(&self) -> u64 {
        self.0.get()
    }

    pub fn set(&self, ms: u64) {
        self.0.set(ms);
    }

    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

pub struct MockClock(pub SimTime);

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.0.now()
    }
}

/// Records every `delay_ms` and advances simulated time by it.
pub struct MockDelay {
    pub time: SimTime,
    pub delays: Rc<RefCell<Vec<u32>>>,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.time.advance(u64::from(ns) / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays.borrow_mut().push(ms);
        self.time.advance(u64::from(ms));
    }
}

// ── Protocol client ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ClientCall {
    Initialize,
    RegisterScanner,
    SetEventHandler,
    Pair,
    Unpair,
    RefreshConnection,
    RequestState,
    RequestBattery,
    RequestConfig,
    RequestAdvancedConfig,
    SendCommand(LockAction),
    SignalStrength,
    RetrieveLog(u16, LogRetrieval),
    LogEntryCount,
    LogEntries,
    EnableButton(bool),
    EnableLedFlash(bool),
    SetSoundLevel(u8),
    SavePin(u16),
}

impl ClientCall {
    pub fn is_config_write(&self) -> bool {
        matches!(
            self,
            Self::EnableButton(_) | Self::EnableLedFlash(_) | Self::SetSoundLevel(_)
        )
    }
}

pub struct MockClient {
    pub calls: Vec<ClientCall>,
    pub notifier: Option<StatusNotifier>,
    /// Consumed front to back; empty means success.
    pub pair_results: VecDeque<Result<(), CmdError>>,
    pub state: OpenerState,
    pub state_error: Option<CmdError>,
    pub battery: BatteryReport,
    pub battery_error: Option<CmdError>,
    pub config: OpenerConfig,
    pub config_error: Option<CmdError>,
    pub advanced: OpenerAdvancedConfig,
    pub advanced_error: Option<CmdError>,
    pub command_result: Result<(), CmdError>,
    /// Consumed front to back; falls back to `default_rssi`.
    pub rssi: VecDeque<i32>,
    pub default_rssi: i32,
    pub log_count_error: Option<CmdError>,
    pub log_fetch_error: Option<CmdError>,
    pub log: Vec<LogEntry>,
}

#[allow(dead_code)]
impl MockClient {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            notifier: None,
            pair_results: VecDeque::new(),
            state: OpenerState {
                lock_state: LockState::Locked,
                ..Default::default()
            },
            state_error: None,
            battery: BatteryReport {
                voltage_mv: 5_100,
                ..Default::default()
            },
            battery_error: None,
            config: OpenerConfig {
                nuki_id: DEVICE_ID,
                name: "Front door".into(),
                button_enabled: true,
                led_flash_enabled: false,
                pairing_enabled: true,
            },
            config_error: None,
            advanced: OpenerAdvancedConfig {
                sound_level: 100,
                ..Default::default()
            },
            advanced_error: None,
            command_result: Ok(()),
            rssi: VecDeque::new(),
            default_rssi: -70,
            log_count_error: None,
            log_fetch_error: None,
            log: Vec::new(),
        }
    }

    pub fn count(&self, call: &ClientCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn config_writes(&self) -> Vec<ClientCall> {
        self.calls
            .iter()
            .filter(|c| c.is_config_write())
            .cloned()
            .collect()
    }

    pub fn commands_sent(&self) -> Vec<LockAction> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ClientCall::SendCommand(a) => Some(*a),
                _ => None,
            })
            .collect()
    }

    fn fetch<T: Clone>(&self, value: &T, error: Option<CmdError>) -> Result<T, CmdError> {
        match error {
            Some(e) => Err(e),
            None => Ok(value.clone()),
        }
    }
}

impl ProtocolClient for MockClient {
    fn initialize(&mut self) {
        self.calls.push(ClientCall::Initialize);
    }

    fn register_scanner(&mut self) {
        self.calls.push(ClientCall::RegisterScanner);
    }

    fn set_event_handler(&mut self, notifier: StatusNotifier) {
        self.calls.push(ClientCall::SetEventHandler);
        self.notifier = Some(notifier);
    }

    fn pair(&mut self) -> Result<(), CmdError> {
        self.calls.push(ClientCall::Pair);
        self.pair_results.pop_front().unwrap_or(Ok(()))
    }

    fn unpair(&mut self) {
        self.calls.push(ClientCall::Unpair);
    }

    fn refresh_connection(&mut self) {
        self.calls.push(ClientCall::RefreshConnection);
    }

    fn request_state(&mut self) -> Result<OpenerState, CmdError> {
        self.calls.push(ClientCall::RequestState);
        self.fetch(&self.state, self.state_error)
    }

    fn request_battery_report(&mut self) -> Result<BatteryReport, CmdError> {
        self.calls.push(ClientCall::RequestBattery);
        self.fetch(&self.battery, self.battery_error)
    }

    fn request_config(&mut self) -> Result<OpenerConfig, CmdError> {
        self.calls.push(ClientCall::RequestConfig);
        self.fetch(&self.config, self.config_error)
    }

    fn request_advanced_config(&mut self) -> Result<OpenerAdvancedConfig, CmdError> {
        self.calls.push(ClientCall::RequestAdvancedConfig);
        self.fetch(&self.advanced, self.advanced_error)
    }

    fn send_command(&mut self, action: LockAction) -> Result<(), CmdError> {
        self.calls.push(ClientCall::SendCommand(action));
        self.command_result
    }

    fn signal_strength(&mut self) -> i32 {
        self.calls.push(ClientCall::SignalStrength);
        self.rssi.pop_front().unwrap_or(self.default_rssi)
    }

    fn retrieve_log_entries(&mut self, count: u16, mode: LogRetrieval) -> Result<(), CmdError> {
        self.calls.push(ClientCall::RetrieveLog(count, mode));
        let error = match mode {
            LogRetrieval::TotalCount => self.log_count_error,
            LogRetrieval::MostRecent => self.log_fetch_error,
        };
        error.map_or(Ok(()), Err)
    }

    fn log_entry_count(&mut self) -> u16 {
        self.calls.push(ClientCall::LogEntryCount);
        self.log.len() as u16
    }

    fn log_entries(&mut self) -> Vec<LogEntry> {
        self.calls.push(ClientCall::LogEntries);
        self.log.clone()
    }

    fn enable_button(&mut self, enabled: bool) -> Result<(), CmdError> {
        self.calls.push(ClientCall::EnableButton(enabled));
        Ok(())
    }

    fn enable_led_flash(&mut self, enabled: bool) -> Result<(), CmdError> {
        self.calls.push(ClientCall::EnableLedFlash(enabled));
        Ok(())
    }

    fn set_sound_level(&mut self, level: u8) -> Result<(), CmdError> {
        self.calls.push(ClientCall::SetSoundLevel(level));
        Ok(())
    }

    fn save_security_pin(&mut self, pin: u16) {
        self.calls.push(ClientCall::SavePin(pin));
    }
}

// ── Publisher ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Published {
    State {
        current: OpenerState,
        previous: OpenerState,
    },
    Activity,
    Battery(BatteryReport),
    Config(OpenerConfig),
    AdvancedConfig(OpenerAdvancedConfig),
    Rssi(i32),
    CommandResult(String),
    AuditLog(Vec<LogEntry>),
    Descriptor(CapabilityDescriptor),
    RemoveDescriptor(String),
    ClearAuth,
}

#[derive(Default)]
pub struct RecordingPublisher {
    pub messages: Vec<Published>,
}

#[allow(dead_code)]
impl RecordingPublisher {
    pub fn count(&self, pred: impl Fn(&Published) -> bool) -> usize {
        self.messages.iter().filter(|m| pred(m)).count()
    }

    pub fn states(&self) -> Vec<(OpenerState, OpenerState)> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Published::State { current, previous } => Some((current.clone(), previous.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn rssi_values(&self) -> Vec<i32> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Published::Rssi(v) => Some(*v),
                _ => None,
            })
            .collect()
    }

    pub fn command_results(&self) -> Vec<String> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Published::CommandResult(r) => Some(r.clone()),
                _ => None,
            })
            .collect()
    }
}

impl NetworkPublisher for RecordingPublisher {
    fn publish_state(&mut self, current: &OpenerState, previous: &OpenerState) {
        self.messages.push(Published::State {
            current: current.clone(),
            previous: previous.clone(),
        });
    }

    fn publish_activity_detected(&mut self) {
        self.messages.push(Published::Activity);
    }

    fn publish_battery_report(&mut self, report: &BatteryReport) {
        self.messages.push(Published::Battery(*report));
    }

    fn publish_config(&mut self, config: &OpenerConfig) {
        self.messages.push(Published::Config(config.clone()));
    }

    fn publish_advanced_config(&mut self, config: &OpenerAdvancedConfig) {
        self.messages.push(Published::AdvancedConfig(config.clone()));
    }

    fn publish_signal_strength(&mut self, rssi: i32) {
        self.messages.push(Published::Rssi(rssi));
    }

    fn publish_command_result(&mut self, result: &str) {
        self.messages.push(Published::CommandResult(result.to_owned()));
    }

    fn publish_audit_log(&mut self, entries: &[LogEntry]) {
        self.messages.push(Published::AuditLog(entries.to_vec()));
    }

    fn publish_capability_descriptor(&mut self, descriptor: &CapabilityDescriptor) {
        self.messages.push(Published::Descriptor(descriptor.clone()));
    }

    fn remove_capability_descriptor(&mut self, unique_id: &str) {
        self.messages
            .push(Published::RemoveDescriptor(unique_id.to_owned()));
    }

    fn clear_authorization_data(&mut self) {
        self.messages.push(Published::ClearAuth);
    }
}

// ── Harness ───────────────────────────────────────────────────

pub type TestService = SyncService<MockClient, RecordingPublisher, MockClock, MockDelay>;

pub struct Harness {
    pub service: TestService,
    pub time: SimTime,
    pub delays: Rc<RefCell<Vec<u32>>>,
}

#[allow(dead_code)]
impl Harness {
    /// Build and initialize a service around `client`.
    pub fn with_client(config: SyncConfig, client: MockClient) -> Self {
        let time = SimTime::default();
        let delays = Rc::new(RefCell::new(Vec::new()));
        let mut service = SyncService::new(
            DeviceIdentity::new("Front door", DEVICE_ID),
            config,
            client,
            RecordingPublisher::default(),
            MockClock(time.clone()),
            MockDelay {
                time: time.clone(),
                delays: Rc::clone(&delays),
            },
        )
        .expect("valid config");
        service.initialize();
        Self {
            service,
            time,
            delays,
        }
    }

    pub fn new(config: SyncConfig) -> Self {
        Self::with_client(config, MockClient::new())
    }

    /// Initialized and paired by one tick at t = 0.
    pub fn paired(config: SyncConfig) -> Self {
        let mut h = Self::new(config);
        h.service.tick();
        assert!(h.service.is_paired());
        h
    }

    /// Default config, custom client, paired by one tick at t = 0.
    pub fn paired_with(client: MockClient) -> Self {
        let mut h = Self::with_client(SyncConfig::default(), client);
        h.service.tick();
        assert!(h.service.is_paired());
        h
    }

    pub fn client(&self) -> &MockClient {
        self.service.client()
    }

    pub fn client_mut(&mut self) -> &mut MockClient {
        self.service.client_mut()
    }

    pub fn published(&self) -> &[Published] {
        &self.service.publisher().messages
    }

    pub fn publisher(&self) -> &RecordingPublisher {
        self.service.publisher()
    }

    /// Set simulated time to `ms`, then tick.
    pub fn tick_at(&mut self, ms: u64) {
        self.time.set(ms);
        self.service.tick();
    }

    /// Tick every `step` ms from the current time up to and including `until`.
    pub fn tick_until(&mut self, until: u64, step: u64) {
        let mut t = self.time.now();
        while t + step <= until {
            t += step;
            self.tick_at(t);
        }
    }

    pub fn state_polls(&self) -> usize {
        self.client().count(&ClientCall::RequestState)
    }

    pub fn clear_history(&mut self) {
        self.client_mut().calls.clear();
        self.service.publisher_mut().messages.clear();
        self.delays.borrow_mut().clear();
    }
}
