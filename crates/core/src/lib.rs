//! Core library for the energy panel simulator.
//!
//! A small interactive "energy device" panel: an inverter, a switch, a
//! bulb, a status word, a scrolling status readout and audio feedback, all
//! driven from one authoritative state store. The store owns the snapshot
//! and enforces the cross-field invariants; audio, readout and metrics are
//! pure consumers driven once per frame by the owning [`PanelSession`].

pub mod audio;
pub mod config;
pub mod error;
pub mod marquee;
pub mod metrics;
pub mod session;
pub mod state;

pub use audio::{AudioBackend, AudioFeedback, ChannelId, ChannelStatus, SilentBackend};
pub use config::{AudioSettings, MarqueeSettings, MetricsSettings, PanelConfig};
pub use error::{PanelError, Result};
pub use marquee::Marquee;
pub use metrics::MetricsTicker;
pub use session::{FrameUpdate, PanelSession};
pub use state::{DeviceState, DeviceStore, CO2_REDUCED_PER_TICK, ENERGY_SAVED_PER_TICK};
