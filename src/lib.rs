//! OpenerSync library.
//!
//! Synchronization and command-dispatch core for a gateway that mirrors a
//! battery-powered wireless door opener onto a messaging network.  The
//! radio protocol and the network layer are external; they plug in through
//! the traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod device;
pub mod error;
pub mod scheduler;
