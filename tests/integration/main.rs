//! Integration test driver for the `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that drives [`SyncService`] through one
//! concern against the recording mocks in `mock_ports`.  Simulated time is
//! set explicitly, so nothing here sleeps.
//!
//! [`SyncService`]: openersync::app::service::SyncService

mod mock_ports;
