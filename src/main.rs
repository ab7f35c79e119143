//! OpenerSync host simulation entry point.
//!
//! Drives the synchronization core against a simulated opener and a
//! log-backed publisher.  Lines on stdin play the role of the messaging
//! network:
//!
//! ```text
//! cmd <name>             submit a lock action (e.g. `cmd activateRTO`)
//! cfg <topic> <value>    config change (e.g. `cfg configuration/soundLevel 40`)
//! ring                   simulate a doorbell event
//! pin <n> | pin clear    store / clear the security PIN
//! unpair                 drop pairing (re-pairs on the next tick)
//! undiscover             withdraw the capability descriptor
//! quit
//! ```
//!
//! Usage: `openersync-sim [config.json]`

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use openersync::adapters::log_sink::LogPublisher;
use openersync::adapters::sim::SimulatedOpener;
use openersync::adapters::time::{MonotonicClock, StdDelay};
use openersync::app::ports::InboundHandler;
use openersync::app::service::SyncService;
use openersync::config::SyncConfig;
use openersync::device::DeviceIdentity;

/// Tick period of the main loop (20 Hz).
const TICK_PERIOD: Duration = Duration::from_millis(50);

const DEVICE_NAME: &str = "Sim Opener";
const DEVICE_ID: u32 = 0x1a2b_3c4d;

type Service = SyncService<SimulatedOpener, LogPublisher, MonotonicClock, StdDelay>;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    let opener = SimulatedOpener::new(DEVICE_NAME, DEVICE_ID).with_pairing_failures(2);
    let publisher = LogPublisher::new(config.base_topic.clone());

    let mut service = SyncService::new(
        DeviceIdentity::new(DEVICE_NAME, DEVICE_ID),
        config,
        opener,
        publisher,
        MonotonicClock::new(),
        StdDelay,
    )
    .context("invalid configuration")?;
    service.initialize();

    let lines = spawn_stdin_reader();
    info!("OpenerSync simulation running; type `quit` to stop");

    loop {
        match lines.try_recv() {
            Ok(line) => {
                if !dispatch(&mut service, line.trim()) {
                    break;
                }
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => break,
        }

        service.tick();
        std::thread::sleep(TICK_PERIOD);
    }

    info!(
        "Stopped after {} ticks, {} messages published",
        service.tick_count(),
        service.publisher().published()
    );
    Ok(())
}

fn load_config() -> Result<SyncConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config file {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing config file {path}"))
        }
        None => Ok(SyncConfig::default()),
    }
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Apply one input line.  Returns `false` to stop.
fn dispatch(service: &mut Service, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("quit"), ..) => return false,
        (Some("cmd"), Some(name), _) => {
            let inbound: &mut dyn InboundHandler = service;
            if !inbound.on_command_received(name) {
                warn!("Unknown command '{}'", name);
            }
        }
        (Some("cfg"), Some(topic), Some(value)) => {
            let inbound: &mut dyn InboundHandler = service;
            inbound.on_config_change_received(topic, value);
        }
        (Some("ring"), ..) => service.client().ring(),
        (Some("pin"), Some("clear"), _) => service.set_security_pin(None),
        (Some("pin"), Some(pin), _) => match pin.parse() {
            Ok(pin) => service.set_security_pin(Some(pin)),
            Err(e) => warn!("Invalid PIN '{}': {}", pin, e),
        },
        (Some("unpair"), ..) => service.unpair(),
        (Some("undiscover"), ..) => service.remove_capability_descriptor(),
        (None, ..) => {}
        _ => warn!("Unrecognised input '{}'", line),
    }
    true
}
