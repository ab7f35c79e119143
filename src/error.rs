//! Unified error types for the opener synchronization core.
//!
//! Every protocol call funnels its failure into [`CmdError`]; the crate-wide
//! [`Error`] wraps those plus pairing and configuration problems so callers
//! outside the tick loop get one type to match on.  All variants are `Copy`
//! so they can be logged and compared without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A protocol command returned a non-success result code.
    Command(CmdError),
    /// The pairing handshake did not complete.
    Pairing,
    /// Configuration is inconsistent.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(e) => write!(f, "command: {e}"),
            Self::Pairing => write!(f, "pairing failed"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Protocol result codes
// ---------------------------------------------------------------------------

/// Non-success result codes reported by the peripheral protocol client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmdError {
    /// The peripheral rejected the request.
    Failed,
    /// No response within the protocol timeout.
    TimeOut,
    /// A previous request is still being processed.
    Working,
    /// The client has no pairing credentials for the peripheral.
    NotPaired,
    /// Link-layer or framing error.
    Error,
}

impl CmdError {
    /// Stable short label, as published in command results.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Failed => "failed",
            Self::TimeOut => "timeOut",
            Self::Working => "working",
            Self::NotPaired => "notPaired",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for CmdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<CmdError> for Error {
    fn from(e: CmdError) -> Self {
        Self::Command(e)
    }
}

/// Label for a protocol call outcome: `"success"` or the error label.
pub fn outcome_label<T>(result: &core::result::Result<T, CmdError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(e) => e.as_str(),
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
