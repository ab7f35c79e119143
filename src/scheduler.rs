//! Deadline table for the timed synchronization tasks.
//!
//! Four independent cadences share one radio link.  Each is a row in a
//! small fixed table compared against a monotonic millisecond clock; the
//! service walks the table in order every tick and runs whatever is due.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  TimerTable                                                  │
//! │  ┌────────────────┬──────────────┬────────────────────────┐  │
//! │  │ TaskId         │ interval_ms  │ next_due_ms            │  │
//! │  ├────────────────┼──────────────┼────────────────────────┤  │
//! │  │ StatePoll      │ user (300 s) │ None → fire first tick │  │
//! │  │ BatteryPoll    │ user (1800 s)│ None → fire first tick │  │
//! │  │ ConfigPoll     │ 3600 s       │ None → fire first tick │  │
//! │  │ SignalStrength │ 3 s          │ None → fire first tick │  │
//! │  └────────────────┴──────────────┴────────────────────────┘  │
//! │                                                              │
//! │  override_deadline(): post-command / post-config-write polls │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! A late tick fires an overdue task once and reschedules from "now";
//! missed periods are never caught up.

use log::debug;

use crate::config::SyncConfig;

// ═══════════════════════════════════════════════════════════════
//  Task identity
// ═══════════════════════════════════════════════════════════════

/// Timed tasks, in the order they are checked each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TaskId {
    StatePoll = 0,
    BatteryPoll = 1,
    ConfigPoll = 2,
    SignalStrength = 3,
}

impl TaskId {
    /// Sizes the table array.
    pub const COUNT: usize = 4;

    /// All tasks in check order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::StatePoll,
        Self::BatteryPoll,
        Self::ConfigPoll,
        Self::SignalStrength,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::StatePoll => "state",
            Self::BatteryPoll => "battery",
            Self::ConfigPoll => "config",
            Self::SignalStrength => "rssi",
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Timer table
// ═══════════════════════════════════════════════════════════════

/// One row of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerEntry {
    pub task: TaskId,
    pub interval_ms: u64,
    /// `None` until the task first runs; an unset deadline is always due.
    pub next_due_ms: Option<u64>,
}

impl TimerEntry {
    const fn new(task: TaskId, interval_ms: u64) -> Self {
        Self {
            task,
            interval_ms,
            next_due_ms: None,
        }
    }

    /// Whether the deadline has been reached at `now_ms`.
    pub fn is_due(&self, now_ms: u64) -> bool {
        self.next_due_ms.is_none_or(|due| now_ms >= due)
    }
}

/// Fixed table of deadlines indexed by `TaskId as usize`.
#[derive(Debug, Clone)]
pub struct TimerTable {
    entries: [TimerEntry; TaskId::COUNT],
}

impl TimerTable {
    /// Build the table from configuration.  All deadlines start unset.
    pub fn new(config: &SyncConfig) -> Self {
        let secs = |s: u32| u64::from(s) * 1000;
        Self {
            entries: [
                TimerEntry::new(TaskId::StatePoll, secs(config.state_interval_secs)),
                TimerEntry::new(TaskId::BatteryPoll, secs(config.battery_interval_secs)),
                TimerEntry::new(TaskId::ConfigPoll, secs(config.config_interval_secs)),
                TimerEntry::new(
                    TaskId::SignalStrength,
                    u64::from(config.signal_strength_interval_ms),
                ),
            ],
        }
    }

    pub fn entry(&self, task: TaskId) -> &TimerEntry {
        &self.entries[task as usize]
    }

    /// Whether `task` should run at `now_ms`.
    pub fn is_due(&self, task: TaskId, now_ms: u64) -> bool {
        self.entry(task).is_due(now_ms)
    }

    /// Record that `task` runs now: the next deadline is one interval out.
    pub fn mark_run(&mut self, task: TaskId, now_ms: u64) {
        let entry = &mut self.entries[task as usize];
        entry.next_due_ms = Some(now_ms.saturating_add(entry.interval_ms));
    }

    /// Replace the deadline of `task`, e.g. to confirm a command's effect
    /// sooner than the regular interval.
    pub fn override_deadline(&mut self, task: TaskId, due_ms: u64) {
        debug!("Scheduler: '{}' deadline moved to {} ms", task.label(), due_ms);
        self.entries[task as usize].next_due_ms = Some(due_ms);
    }

    /// Clear the deadline of `task` so it runs on the next tick.
    pub fn reset(&mut self, task: TaskId) {
        self.entries[task as usize].next_due_ms = None;
    }

    pub fn next_due(&self, task: TaskId) -> Option<u64> {
        self.entry(task).next_due_ms
    }

    pub fn interval_ms(&self, task: TaskId) -> u64 {
        self.entry(task).interval_ms
    }

    /// Tasks due at `now_ms`, in check order.
    pub fn due_tasks(&self, now_ms: u64) -> impl Iterator<Item = TaskId> + '_ {
        self.entries
            .iter()
            .filter(move |e| e.is_due(now_ms))
            .map(|e| e.task)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
