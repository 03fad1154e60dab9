use std::time::Duration;

use crate::state::DeviceStore;

/// Fixed-cadence driver for the savings accumulators.
///
/// Not a subsystem of its own: just a periodic consumer of the store. While
/// the inverter is on, every full interval of accumulated frame time
/// invokes both increment operations. The moment the device deactivates the
/// partial interval is discarded, so reactivation always starts a fresh
/// interval and repeated activations cannot double-schedule ticks.
#[derive(Debug)]
pub struct MetricsTicker {
    interval: Duration,
    elapsed: Duration,
    running: bool,
}

impl MetricsTicker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            elapsed: Duration::ZERO,
            running: false,
        }
    }

    /// Arms the ticker. Idempotent: arming a running ticker keeps its
    /// partial interval instead of resetting it.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Disarms the ticker and discards any partial interval.
    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed = Duration::ZERO;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Feeds one frame of wall time. Increments fire only while the ticker
    /// is armed and the inverter is on.
    pub fn tick(&mut self, dt: Duration, store: &mut DeviceStore) {
        if !self.running {
            return;
        }
        if !store.peek().inverter_active {
            self.elapsed = Duration::ZERO;
            return;
        }
        self.elapsed += dt;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            store.increment_energy_saved();
            store.increment_co2_reduced();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CO2_REDUCED_PER_TICK, ENERGY_SAVED_PER_TICK};

    fn active_store() -> DeviceStore {
        let mut store = DeviceStore::new();
        store.set_inverter_active(true);
        store
    }

    #[test]
    fn accumulates_while_active() {
        let mut store = active_store();
        let mut ticker = MetricsTicker::new(Duration::from_millis(100));
        ticker.start();

        for _ in 0..10 {
            ticker.tick(Duration::from_millis(50), &mut store);
        }

        let state = store.snapshot();
        assert!((state.energy_saved - 5.0 * ENERGY_SAVED_PER_TICK).abs() < 1e-9);
        assert!((state.co2_reduced - 5.0 * CO2_REDUCED_PER_TICK).abs() < 1e-9);
    }

    #[test]
    fn large_frame_catches_up_multiple_intervals() {
        let mut store = active_store();
        let mut ticker = MetricsTicker::new(Duration::from_millis(100));
        ticker.start();

        ticker.tick(Duration::from_millis(350), &mut store);

        assert!((store.peek().energy_saved - 3.0 * ENERGY_SAVED_PER_TICK).abs() < 1e-9);
    }

    #[test]
    fn stops_the_instant_the_device_deactivates() {
        let mut store = active_store();
        let mut ticker = MetricsTicker::new(Duration::from_millis(100));
        ticker.start();

        ticker.tick(Duration::from_millis(90), &mut store);
        store.set_inverter_active(false);
        // The pending 90ms must not carry over into the next activation.
        ticker.tick(Duration::from_millis(90), &mut store);
        store.set_inverter_active(true);
        ticker.tick(Duration::from_millis(90), &mut store);

        assert_eq!(store.peek().energy_saved, 0.0);
    }

    #[test]
    fn repeated_start_does_not_double_schedule() {
        let mut store = active_store();
        let mut ticker = MetricsTicker::new(Duration::from_millis(100));
        ticker.start();
        ticker.tick(Duration::from_millis(60), &mut store);
        ticker.start();
        ticker.tick(Duration::from_millis(60), &mut store);

        // 120ms armed once: exactly one tick.
        assert!((store.peek().energy_saved - ENERGY_SAVED_PER_TICK).abs() < 1e-9);
    }

    #[test]
    fn disarmed_ticker_is_inert() {
        let mut store = active_store();
        let mut ticker = MetricsTicker::new(Duration::from_millis(10));

        ticker.tick(Duration::from_secs(5), &mut store);
        assert_eq!(store.peek().energy_saved, 0.0);

        ticker.start();
        ticker.stop();
        ticker.tick(Duration::from_secs(5), &mut store);
        assert_eq!(store.peek().energy_saved, 0.0);
    }
}
