//! Synchronization service, the hexagonal core.
//!
//! [`SyncService`] owns the pairing state, the deadline table, the mirrored
//! snapshots, and the single pending command.  One call to [`tick`] advances
//! everything; all I/O flows through the ports it owns, so the entire
//! service runs against mocks in tests.
//!
//! ```text
//!  ProtocolClient ◀──▶ ┌──────────────────────────────┐ ──▶ NetworkPublisher
//!                      │         SyncService          │
//!  Clock, DelayNs ───▶ │ TimerTable · Commands · Cfg  │ ◀── InboundHandler
//!                      └──────────────────────────────┘
//! ```
//!
//! Per tick, in order: pairing / connection refresh → due timed tasks →
//! pending command → one-shot directives → snapshot baseline copy.
//!
//! [`tick`]: SyncService::tick

use embedded_hal::delay::DelayNs;
use heapless::Vec as BoundedVec;
use log::{debug, info, warn};

use crate::config::SyncConfig;
use crate::device::{
    BatteryReport, CapabilityDescriptor, DeviceIdentity, LockAction, LogEntry, LogRetrieval,
    OpenerAdvancedConfig, OpenerConfig, OpenerState,
};
use crate::error::{CmdError, Result, outcome_label};
use crate::scheduler::{TaskId, TimerTable};

use super::commands::CommandSequencer;
use super::events::{ActivityPolicy, StatusNotifier};
use super::ports::{Clock, InboundHandler, NetworkPublisher, ProtocolClient};
use super::reconciler::{self, ConfigWrite, KnownConfig};

/// Most recent audit entries fetched per state poll.
pub const MAX_AUDIT_ENTRIES: usize = 5;

/// PIN value the protocol client treats as "no PIN".
pub const PIN_CLEARED: u16 = 0xffff;

/// Bounded batch of audit entries.
pub type AuditBatch = BoundedVec<LogEntry, MAX_AUDIT_ENTRIES>;

// ───────────────────────────────────────────────────────────────
// SyncService
// ───────────────────────────────────────────────────────────────

pub struct SyncService<P, N, C, D> {
    identity: DeviceIdentity,
    config: SyncConfig,

    client: P,
    publisher: N,
    clock: C,
    delay: D,

    timers: TimerTable,
    notifier: StatusNotifier,
    activity_policy: ActivityPolicy,
    commands: CommandSequencer,

    paired: bool,
    state: OpenerState,
    previous_state: OpenerState,
    battery: BatteryReport,
    device_config: OpenerConfig,
    device_config_valid: bool,
    advanced_config: OpenerAdvancedConfig,
    advanced_config_valid: bool,
    last_rssi: Option<i32>,

    /// One-shot: clear published authorization data downstream.
    clear_auth_pending: bool,
    tick_count: u64,
}

impl<P, N, C, D> SyncService<P, N, C, D>
where
    P: ProtocolClient,
    N: NetworkPublisher,
    C: Clock,
    D: DelayNs,
{
    /// Construct the service.  Zero user intervals fall back to defaults.
    ///
    /// Does **not** touch the protocol client; call [`initialize`] next.
    ///
    /// [`initialize`]: Self::initialize
    pub fn new(
        identity: DeviceIdentity,
        mut config: SyncConfig,
        client: P,
        publisher: N,
        clock: C,
        delay: D,
    ) -> Result<Self> {
        config.normalize();
        config.validate()?;

        Ok(Self {
            identity,
            timers: TimerTable::new(&config),
            config,
            client,
            publisher,
            clock,
            delay,
            notifier: StatusNotifier::new(),
            activity_policy: ActivityPolicy::default(),
            commands: CommandSequencer::new(),
            paired: false,
            state: OpenerState::default(),
            previous_state: OpenerState::default(),
            battery: BatteryReport::default(),
            device_config: OpenerConfig::default(),
            device_config_valid: false,
            advanced_config: OpenerAdvancedConfig::default(),
            advanced_config_valid: false,
            last_rssi: None,
            clear_auth_pending: false,
            tick_count: 0,
        })
    }

    /// Replace the interpretation of event-triggered state polls.
    pub fn set_activity_policy(&mut self, policy: ActivityPolicy) {
        self.activity_policy = policy;
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Bring up the protocol client and arm the one-shot directives.
    pub fn initialize(&mut self) {
        self.client.initialize();
        self.client.register_scanner();
        self.client.set_event_handler(self.notifier.clone());

        info!(
            "Opener '{}': state interval {}s | battery interval {}s | publish audit log: {}",
            self.identity.name,
            self.config.state_interval_secs,
            self.config.battery_interval_secs,
            if self.config.publish_audit_log { "yes" } else { "no" },
        );

        if !self.config.publish_audit_log {
            self.clear_auth_pending = true;
        }
    }

    /// Store a security PIN on the client; `None` clears it.
    pub fn set_security_pin(&mut self, pin: Option<u16>) {
        self.client.save_security_pin(pin.unwrap_or(PIN_CLEARED));
        info!(
            "Opener: security PIN {}",
            if pin.is_some() { "saved" } else { "cleared" }
        );
    }

    /// Drop pairing.  The next tick starts pairing again.
    ///
    /// Both config snapshots become unknown, and the config poll runs on
    /// the first paired tick so the reconciler has them back right away.
    pub fn unpair(&mut self) {
        self.client.unpair();
        self.paired = false;
        self.device_config_valid = false;
        self.advanced_config_valid = false;
        self.timers.reset(TaskId::ConfigPoll);
        info!("Opener: unpaired");
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Advance the core by one step.  Never blocks except for the bounded
    /// pairing back-off and audit-log settling delays.
    pub fn tick(&mut self) {
        self.tick_count += 1;

        if !self.paired && !self.try_pair() {
            return;
        }

        self.client.refresh_connection();

        let now = self.clock.now_ms();
        for task in TaskId::ALL {
            let forced = task == TaskId::StatePoll && self.notifier.is_raised();
            if forced || self.timers.is_due(task, now) {
                self.timers.mark_run(task, now);
                self.run_task(task);
            }
        }

        self.execute_pending_command(now);
        self.flush_directives();

        self.previous_state.clone_from(&self.state);
    }

    fn try_pair(&mut self) -> bool {
        debug!("Opener: start pairing");
        match self.client.pair() {
            Ok(()) => {
                info!("Opener: paired");
                self.paired = true;
                self.publish_capability_descriptor();
                true
            }
            Err(e) => {
                debug!("Opener: pairing attempt failed: {}", e);
                self.delay.delay_ms(self.config.pairing_retry_delay_ms);
                false
            }
        }
    }

    fn run_task(&mut self, task: TaskId) {
        match task {
            TaskId::StatePoll => self.poll_state(),
            TaskId::BatteryPoll => self.poll_battery(),
            TaskId::ConfigPoll => self.poll_config(),
            TaskId::SignalStrength => self.poll_signal_strength(),
        }
    }

    // ── Timed tasks ───────────────────────────────────────────

    fn poll_state(&mut self) {
        let status_updated = self.notifier.take();

        match self.client.request_state() {
            Ok(state) => {
                self.state = state;
                if status_updated
                    && self
                        .activity_policy
                        .is_activity(&self.state, &self.previous_state)
                {
                    info!("Opener: ring detected");
                    self.publisher.publish_activity_detected();
                } else {
                    self.publisher
                        .publish_state(&self.state, &self.previous_state);
                    if self.state.lock_state != self.previous_state.lock_state {
                        info!(
                            "Opener: state {} -> {}",
                            self.previous_state.lock_state, self.state.lock_state
                        );
                    }
                }
            }
            Err(e) => warn!("Opener: state request failed: {}", e),
        }

        if self.config.publish_audit_log {
            if let Err(e) = self.retrieve_audit_log() {
                debug!("Opener: audit log retrieval aborted: {}", e);
            }
        }
    }

    /// Count refresh → settle → bounded fetch → settle → publish.
    fn retrieve_audit_log(&mut self) -> core::result::Result<(), CmdError> {
        self.client.retrieve_log_entries(0, LogRetrieval::TotalCount)?;
        self.delay.delay_ms(self.config.audit_count_settle_ms);

        let count = self
            .client
            .log_entry_count()
            .min(MAX_AUDIT_ENTRIES as u16);
        self.client
            .retrieve_log_entries(count, LogRetrieval::MostRecent)?;
        self.delay.delay_ms(self.config.audit_fetch_settle_ms);

        let batch: AuditBatch = self
            .client
            .log_entries()
            .into_iter()
            .take(MAX_AUDIT_ENTRIES)
            .collect();
        if !batch.is_empty() {
            self.publisher.publish_audit_log(&batch);
        }
        Ok(())
    }

    fn poll_battery(&mut self) {
        match self.client.request_battery_report() {
            Ok(report) => {
                self.battery = report;
                self.publisher.publish_battery_report(&self.battery);
            }
            Err(e) => warn!("Opener: battery request failed: {}", e),
        }
    }

    fn poll_config(&mut self) {
        let result = self.client.request_config();
        info!("Opener: reading config, result: {}", outcome_label(&result));
        self.device_config_valid = store(result, &mut self.device_config);

        let result = self.client.request_advanced_config();
        info!("Opener: reading advanced config, result: {}", outcome_label(&result));
        self.advanced_config_valid = store(result, &mut self.advanced_config);

        self.publisher.publish_config(&self.device_config);
        self.publisher.publish_advanced_config(&self.advanced_config);
    }

    fn poll_signal_strength(&mut self) {
        let rssi = self.client.signal_strength();
        if self.last_rssi != Some(rssi) {
            self.publisher.publish_signal_strength(rssi);
            self.last_rssi = Some(rssi);
        }
    }

    // ── Commands & directives ─────────────────────────────────

    fn execute_pending_command(&mut self, now: u64) {
        let Some(action) = self.commands.take() else {
            return;
        };

        let result = self.client.send_command(action);
        let label = outcome_label(&result);
        self.publisher.publish_command_result(label);
        info!("Opener: action {} result: {}", action, label);

        if self.config.state_interval_secs > self.config.post_command_threshold_secs {
            let delay_ms = u64::from(self.config.post_command_poll_delay_secs) * 1000;
            self.timers
                .override_deadline(TaskId::StatePoll, now.saturating_add(delay_ms));
        }
    }

    fn flush_directives(&mut self) {
        if self.clear_auth_pending {
            self.publisher.clear_authorization_data();
            self.clear_auth_pending = false;
        }
    }

    // ── Capability descriptor ─────────────────────────────────

    /// Fetch the config once if it is not yet known.
    fn ensure_device_config(&mut self) -> bool {
        if !self.device_config_valid {
            match self.client.request_config() {
                Ok(cfg) => {
                    self.device_config = cfg;
                    self.device_config_valid = true;
                }
                Err(e) => warn!("Opener: config request failed: {}", e),
            }
        }
        self.device_config_valid
    }

    fn publish_capability_descriptor(&mut self) {
        if !self.ensure_device_config() {
            warn!("Opener: unable to publish capability descriptor, invalid config");
            return;
        }
        let descriptor = CapabilityDescriptor::opener(&self.config.base_topic, &self.device_config);
        self.publisher.publish_capability_descriptor(&descriptor);
    }

    /// Withdraw the capability descriptor from the network.
    pub fn remove_capability_descriptor(&mut self) {
        if !self.ensure_device_config() {
            warn!("Opener: unable to remove capability descriptor, invalid config");
            return;
        }
        let unique_id = CapabilityDescriptor::unique_id_for(self.device_config.nuki_id);
        self.publisher.remove_capability_descriptor(&unique_id);
    }

    // ── Config writes ─────────────────────────────────────────

    fn apply_config_write(&mut self, write: ConfigWrite) {
        let result = match write {
            ConfigWrite::ButtonEnabled(on) => self.client.enable_button(on),
            ConfigWrite::LedFlashEnabled(on) => self.client.enable_led_flash(on),
            ConfigWrite::SoundLevel(level) => self.client.set_sound_level(level),
        };
        match result {
            Ok(()) => info!("Opener: config write {:?} sent", write),
            Err(e) => warn!("Opener: config write {:?} failed: {}", write, e),
        }

        let confirm_at = self
            .clock
            .now_ms()
            .saturating_add(u64::from(self.config.config_confirm_delay_ms));
        self.timers.override_deadline(TaskId::ConfigPoll, confirm_at);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    pub fn sync_config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn is_paired(&self) -> bool {
        self.paired
    }

    /// Last fetched state.
    pub fn state(&self) -> &OpenerState {
        &self.state
    }

    /// Baseline the last state poll compared against.
    pub fn previous_state(&self) -> &OpenerState {
        &self.previous_state
    }

    pub fn battery_report(&self) -> &BatteryReport {
        &self.battery
    }

    /// Device config, if the last fetch succeeded.
    pub fn config(&self) -> Option<&OpenerConfig> {
        self.device_config_valid.then_some(&self.device_config)
    }

    /// Advanced device config, if the last fetch succeeded.
    pub fn advanced_config(&self) -> Option<&OpenerAdvancedConfig> {
        self.advanced_config_valid
            .then_some(&self.advanced_config)
    }

    pub fn pending_command(&self) -> Option<LockAction> {
        self.commands.pending()
    }

    pub fn timers(&self) -> &TimerTable {
        &self.timers
    }

    /// Handle the protocol client raises status events on.
    pub fn notifier(&self) -> &StatusNotifier {
        &self.notifier
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn client(&self) -> &P {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut P {
        &mut self.client
    }

    pub fn publisher(&self) -> &N {
        &self.publisher
    }

    pub fn publisher_mut(&mut self) -> &mut N {
        &mut self.publisher
    }
}

// ───────────────────────────────────────────────────────────────
// Inbound callbacks
// ───────────────────────────────────────────────────────────────

impl<P, N, C, D> InboundHandler for SyncService<P, N, C, D>
where
    P: ProtocolClient,
    N: NetworkPublisher,
    C: Clock,
    D: DelayNs,
{
    fn on_command_received(&mut self, name: &str) -> bool {
        self.commands.submit(name)
    }

    fn on_config_change_received(&mut self, topic: &str, value: &str) {
        if !self.paired {
            debug!("Opener: ignoring '{}' while unpaired", topic);
            return;
        }
        let known = KnownConfig {
            config: self.device_config_valid.then_some(&self.device_config),
            advanced: self
                .advanced_config_valid
                .then_some(&self.advanced_config),
        };
        if let Some(write) = reconciler::plan(topic, value, known) {
            self.apply_config_write(write);
        }
    }
}

// ── Internal ──────────────────────────────────────────────────

/// Overwrite `slot` on success; report whether the fetch succeeded.
fn store<T>(result: core::result::Result<T, CmdError>, slot: &mut T) -> bool {
    match result {
        Ok(value) => {
            *slot = value;
            true
        }
        Err(_) => false,
    }
}
