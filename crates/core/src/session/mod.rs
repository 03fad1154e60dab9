use std::time::Duration;

use crate::{
    audio::{AudioBackend, AudioFeedback},
    config::PanelConfig,
    marquee::Marquee,
    metrics::MetricsTicker,
    state::{DeviceState, DeviceStore},
};

/// Per-frame output handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameUpdate {
    pub state: DeviceState,
    pub marquee_position: f32,
}

/// Explicitly constructed context owning one panel's entire lifecycle:
/// the state store, the audio feedback channels, the scrolling readout and
/// the metrics ticker.
///
/// There is exactly one logical owner per session, so mutation needs no
/// locking: intents come in through the forwarding setters, and
/// [`advance_frame`](Self::advance_frame) drives the observers from the
/// latest snapshot. Teardown is guaranteed: [`shutdown`](Self::shutdown)
/// also runs from `Drop`, cancelling the scroll loop, disarming the ticker
/// and pausing and rewinding every audio channel.
pub struct PanelSession<B: AudioBackend> {
    store: DeviceStore,
    audio: AudioFeedback<B>,
    marquee: Marquee,
    ticker: MetricsTicker,
    fan_speed: f32,
    fault: bool,
    marquee_separator: String,
    shut_down: bool,
}

impl<B: AudioBackend> PanelSession<B> {
    pub fn new(config: &PanelConfig, backend: B) -> Self {
        let mut ticker =
            MetricsTicker::new(Duration::from_millis(config.metrics.tick_interval_ms));
        ticker.start();
        Self {
            store: DeviceStore::new(),
            audio: AudioFeedback::new(backend, config.audio.clone()),
            marquee: Marquee::new(&config.marquee),
            ticker,
            fan_speed: 0.0,
            fault: false,
            marquee_separator: config.marquee.separator.clone(),
            shut_down: false,
        }
    }

    pub fn snapshot(&self) -> DeviceState {
        self.store.snapshot()
    }

    // Intent forwarding. The store stays side-effect free; audio and the
    // readout catch up on the next frame.

    pub fn set_inverter_active(&mut self, active: bool) {
        self.store.set_inverter_active(active);
    }

    pub fn set_switch_active(&mut self, active: bool) {
        self.store.set_switch_active(active);
    }

    pub fn set_bulb_active(&mut self, active: bool) {
        self.store.set_bulb_active(active);
    }

    pub fn set_word_active(&mut self, active: bool) {
        self.store.set_word_active(active);
    }

    pub fn set_animation_phase(&mut self, phase: u32) {
        self.store.set_animation_phase(phase);
    }

    pub fn activate_full_system(&mut self) {
        self.store.activate_full_system();
    }

    pub fn deactivate_full_system(&mut self) {
        self.store.deactivate_full_system();
    }

    /// Fan input, clamped to 0–100.
    pub fn set_fan_speed(&mut self, speed: f32) {
        self.fan_speed = speed.clamp(0.0, 100.0);
    }

    /// Fault flag observed by the alarm channel.
    pub fn set_fault(&mut self, fault: bool) {
        self.fault = fault;
    }

    /// Fires the UI click sound.
    pub fn click(&mut self) {
        self.audio.click();
    }

    /// Swaps the readout's message set; the scroll restarts from the seam.
    pub fn set_messages(&mut self, messages: &[String]) {
        let separator = self.marquee_separator.clone();
        self.marquee.set_messages(messages, &separator);
    }

    /// Forwards the renderer's measured readout width.
    pub fn set_marquee_width(&mut self, width: f32) {
        self.marquee.set_content_width(width);
    }

    pub fn marquee_text(&self) -> &str {
        self.marquee.text()
    }

    /// Advances every cooperative loop by one frame of wall time and
    /// returns what the presentation layer needs to draw.
    pub fn advance_frame(&mut self, dt: Duration) -> FrameUpdate {
        if self.shut_down {
            return FrameUpdate {
                state: self.store.snapshot(),
                marquee_position: self.marquee.position(),
            };
        }
        let marquee_position = self.marquee.frame();
        self.ticker.tick(dt, &mut self.store);
        let state = self.store.snapshot();
        self.audio.sync(&state, self.fan_speed, self.fault);
        FrameUpdate {
            state,
            marquee_position,
        }
    }

    /// Tears the session down: scroll loop cancelled, ticker disarmed,
    /// every audio channel paused and rewound. Idempotent.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        tracing::debug!("panel session shutting down");
        self.marquee.stop();
        self.ticker.stop();
        self.audio.teardown();
    }
}

impl<B: AudioBackend> Drop for PanelSession<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentBackend;
    use crate::state::ENERGY_SAVED_PER_TICK;

    fn session() -> PanelSession<SilentBackend> {
        PanelSession::new(&PanelConfig::default(), SilentBackend)
    }

    #[test]
    fn scripted_walkthrough_reaches_rest_with_bulb_edge_recorded() {
        let mut panel = session();

        panel.set_inverter_active(true);
        panel.set_switch_active(true);
        panel.set_bulb_active(true);
        panel.advance_frame(Duration::from_millis(16));

        panel.set_inverter_active(false);
        let update = panel.advance_frame(Duration::from_millis(16));

        assert!(!update.state.inverter_active);
        assert!(!update.state.bulb_active);
        assert!(update.state.prev_bulb_active);
        assert_eq!(update.state.animation_phase, 0);
    }

    #[test]
    fn metrics_flow_only_while_active() {
        let mut panel = session();
        panel.activate_full_system();

        for _ in 0..5 {
            panel.advance_frame(Duration::from_millis(500));
        }
        let active = panel.snapshot().energy_saved;
        assert!((active - 2.0 * ENERGY_SAVED_PER_TICK).abs() < 1e-9);

        panel.deactivate_full_system();
        for _ in 0..5 {
            panel.advance_frame(Duration::from_millis(500));
        }
        assert_eq!(panel.snapshot().energy_saved, active);
    }

    #[test]
    fn fan_speed_is_clamped() {
        let mut panel = session();
        panel.set_fan_speed(250.0);
        assert_eq!(panel.fan_speed, 100.0);
        panel.set_fan_speed(-10.0);
        assert_eq!(panel.fan_speed, 0.0);
    }

    #[test]
    fn marquee_advances_each_frame() {
        let mut panel = session();
        panel.set_marquee_width(200.0);

        let first = panel.advance_frame(Duration::from_millis(16));
        let second = panel.advance_frame(Duration::from_millis(16));

        assert!(second.marquee_position < first.marquee_position);
    }

    #[test]
    fn shutdown_cancels_every_loop() {
        let mut panel = session();
        panel.activate_full_system();
        panel.advance_frame(Duration::from_millis(16));

        panel.shutdown();

        let before = panel.snapshot().energy_saved;
        let update = panel.advance_frame(Duration::from_secs(10));
        assert_eq!(update.state.energy_saved, before);
        assert_eq!(update.marquee_position, panel.marquee.position());
        assert!(!panel.marquee.is_running());
        assert!(!panel.ticker.is_running());
    }

    #[test]
    fn shutdown_is_idempotent() {
        let mut panel = session();
        panel.shutdown();
        panel.shutdown();
        assert!(!panel.ticker.is_running());
    }

    #[test]
    fn swapping_messages_restarts_the_readout() {
        let mut panel = session();
        panel.advance_frame(Duration::from_millis(16));

        panel.set_messages(&["FAULT CLEARED".to_string()]);

        assert!(panel.marquee_text().starts_with("FAULT CLEARED"));
        assert_eq!(panel.marquee.position(), 0.0);
    }
}
