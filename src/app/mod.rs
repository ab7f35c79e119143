//! Application core: synchronization logic with no direct I/O.
//!
//! This module contains the rules that keep the mirrored opener state in
//! step with the device: the tick orchestration, command sequencing, and
//! configuration reconciliation.  All interaction with the radio and the
//! messaging network happens through **port traits** defined in [`ports`].

pub mod commands;
pub mod events;
pub mod ports;
pub mod reconciler;
pub mod service;
