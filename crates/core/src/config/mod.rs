use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Top-level configuration structure for the simulator.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PanelConfig {
    #[serde(default)]
    pub audio: AudioSettings,
    #[serde(default)]
    pub marquee: MarqueeSettings,
    #[serde(default)]
    pub metrics: MetricsSettings,
}

impl PanelConfig {
    /// Loads a configuration from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Configuration for the audio feedback channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Asset paths handed to the backend at load time, keyed by channel.
    pub hum_source: String,
    pub fan_source: String,
    pub click_source: String,
    pub alarm_source: String,
    /// Fixed loop volume used while the inverter hum is on.
    pub hum_volume: f32,
    pub click_volume: f32,
    pub alarm_volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            hum_source: "assets/audio/hum.ogg".to_string(),
            fan_source: "assets/audio/fan.ogg".to_string(),
            click_source: "assets/audio/click.ogg".to_string(),
            alarm_source: "assets/audio/alarm.ogg".to_string(),
            hum_volume: 0.4,
            click_volume: 1.0,
            alarm_volume: 0.8,
        }
    }
}

/// Configuration for the scrolling status readout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarqueeSettings {
    /// Status strings cycled through the readout.
    pub messages: Vec<String>,
    /// Text placed between consecutive messages (and at the loop seam).
    pub separator: String,
    /// Horizontal distance travelled per frame, in layout units.
    pub step: f32,
    /// Estimated glyph width used until the renderer reports a measured
    /// content width.
    pub char_width: f32,
}

impl Default for MarqueeSettings {
    fn default() -> Self {
        Self {
            messages: vec![
                "SOLAR INPUT NOMINAL".to_string(),
                "GRID SYNC LOCKED".to_string(),
                "BATTERY 98%".to_string(),
            ],
            separator: " +++ ".to_string(),
            step: 1.2,
            char_width: 9.0,
        }
    }
}

/// Configuration for the savings metrics cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSettings {
    /// Interval between accumulator ticks while the device is active.
    pub tick_interval_ms: u64,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1_000,
        }
    }
}
