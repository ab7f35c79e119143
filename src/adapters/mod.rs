//! Concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements        | Connects to                 |
//! |------------|-------------------|-----------------------------|
//! | `log_sink` | NetworkPublisher  | Log output (JSON payloads)  |
//! | `sim`      | ProtocolClient    | In-memory simulated opener  |
//! | `time`     | Clock, DelayNs    | Host monotonic clock, sleep |

pub mod log_sink;
pub mod sim;
pub mod time;
