//! Application Configuration
//!
//! Defaults match the original hardware constants: 500 ms per analyzed
//! digit, 200 ms blink sub-period, 128-byte receive queue, 115200 baud.
//! Values can be overridden by an optional `sequencer.toml` next to the
//! binary or by `SEQUENCER__*` environment variables.

use byte_queue::DEFAULT_CAPACITY;
use hardware_io::SerialSettings;
use serde::Deserialize;

/// Timer periods for the two analysis-phase timers
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Period of the digit-analysis timer (ms)
    pub analysis_period_ms: u64,
    /// Sub-period of the blink timer (ms)
    pub blink_period_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            analysis_period_ms: 500,
            blink_period_ms: 200,
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Serial link settings
    pub serial: SerialSettings,
    /// Timer periods
    pub timing: TimingSettings,
    /// Receive queue slots
    pub queue_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            serial: SerialSettings::default(),
            timing: TimingSettings::default(),
            queue_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl AppConfig {
    /// Load configuration from the optional file and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("sequencer").required(false))
            .add_source(config::Environment::with_prefix("SEQUENCER").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_hardware_constants() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.timing.analysis_period_ms, 500);
        assert_eq!(cfg.timing.blink_period_ms, 200);
        assert_eq!(cfg.queue_capacity, 128);
        assert_eq!(cfg.serial.baud, 115_200);
    }
}
