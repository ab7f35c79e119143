//! Inbound configuration changes.
//!
//! Each request is compared against the last fetched snapshot before
//! anything goes over the air.  Unknown state or an unchanged value yields
//! no write; otherwise the caller performs the returned [`ConfigWrite`] and
//! schedules a confirmation poll.

use crate::device::{OpenerAdvancedConfig, OpenerConfig};

/// Configuration topics, relative to the device base topic.
pub const TOPIC_BUTTON_ENABLED: &str = "configuration/buttonEnabled";
pub const TOPIC_LED_FLASH_ENABLED: &str = "configuration/ledFlashEnabled";
pub const TOPIC_SOUND_LEVEL: &str = "configuration/soundLevel";

/// Writable settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigTopic {
    ButtonEnabled,
    LedFlashEnabled,
    SoundLevel,
}

impl ConfigTopic {
    pub fn from_topic(topic: &str) -> Option<Self> {
        match topic {
            TOPIC_BUTTON_ENABLED => Some(Self::ButtonEnabled),
            TOPIC_LED_FLASH_ENABLED => Some(Self::LedFlashEnabled),
            TOPIC_SOUND_LEVEL => Some(Self::SoundLevel),
            _ => None,
        }
    }
}

/// A write the device needs in order to match a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigWrite {
    ButtonEnabled(bool),
    LedFlashEnabled(bool),
    SoundLevel(u8),
}

/// Snapshot pair the reconciler compares against.  `None` = not yet valid.
#[derive(Debug, Clone, Copy)]
pub struct KnownConfig<'a> {
    pub config: Option<&'a OpenerConfig>,
    pub advanced: Option<&'a OpenerAdvancedConfig>,
}

/// Decide whether `value` on `topic` requires a device write.
pub fn plan(topic: &str, value: &str, known: KnownConfig<'_>) -> Option<ConfigWrite> {
    match ConfigTopic::from_topic(topic)? {
        ConfigTopic::ButtonEnabled => {
            let wanted = parse_flag(value);
            let cfg = known.config?;
            (cfg.button_enabled != wanted).then_some(ConfigWrite::ButtonEnabled(wanted))
        }
        ConfigTopic::LedFlashEnabled => {
            let wanted = parse_flag(value);
            let cfg = known.config?;
            (cfg.led_flash_enabled != wanted).then_some(ConfigWrite::LedFlashEnabled(wanted))
        }
        ConfigTopic::SoundLevel => {
            let wanted = parse_level(value);
            let adv = known.advanced?;
            (adv.sound_level != wanted).then_some(ConfigWrite::SoundLevel(wanted))
        }
    }
}

/// Integer text greater than zero means enabled; anything else disables.
fn parse_flag(value: &str) -> bool {
    parse_leading_int(value) > 0
}

/// Level as `u8`; out-of-range or non-numeric text wraps like a C `atoi`
/// narrowed to a byte.
fn parse_level(value: &str) -> u8 {
    parse_leading_int(value) as u8
}

/// Leading (optionally signed) decimal integer, 0 when none.
fn parse_leading_int(value: &str) -> i64 {
    let s = value.trim_start();
    let (neg, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let n = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
        });
    if neg { -n } else { n }
}
