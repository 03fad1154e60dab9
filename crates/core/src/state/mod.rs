use serde::{Deserialize, Serialize};

/// Energy added to the savings accumulator on each metrics tick, in kWh.
pub const ENERGY_SAVED_PER_TICK: f64 = 0.05;
/// CO2 added to the reduction accumulator on each metrics tick, in kg.
pub const CO2_REDUCED_PER_TICK: f64 = 0.02;

/// Full description of the simulated device at a point in time.
///
/// Snapshots are plain values: the [`DeviceStore`] replaces the whole
/// snapshot on every transition, so observers never see a half-updated
/// state. `Default` is the rest state (everything off, phase 0, empty
/// accumulators).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeviceState {
    /// Master power gate.
    pub inverter_active: bool,
    /// Downstream gate; meaningful only while the inverter is on.
    pub switch_active: bool,
    /// Visual output; meaningful only while the switch is on.
    pub bulb_active: bool,
    /// Secondary visual output; meaningful only while the switch is on.
    pub word_active: bool,
    /// Bulb value prior to the current transition, used for edge detection
    /// (for example a one-shot effect when the bulb goes dark).
    pub prev_bulb_active: bool,
    /// Staged visual sequencing marker. 0 is idle, 1 starts the active
    /// sequence; consumers treat out-of-range phases as final/steady.
    pub animation_phase: u32,
    /// Accumulated simulated savings, in kWh. Never decreases.
    pub energy_saved: f64,
    /// Accumulated simulated CO2 reduction, in kg. Never decreases.
    pub co2_reduced: f64,
}

/// Authoritative holder of the device snapshot.
///
/// Every public operation builds the next snapshot and swaps it in as one
/// unit; each leaves the cross-field invariants intact:
///
/// - inverter off implies switch, bulb and word off and phase 0;
/// - the switch can only be set active while the inverter is on (the
///   setter is a silent no-op otherwise);
/// - the savings accumulators never decrease.
///
/// The generation counter bumps only when a transition actually changed
/// the snapshot, so observers can cheaply skip unchanged states.
#[derive(Debug, Default)]
pub struct DeviceStore {
    current: DeviceState,
    generation: u64,
}

impl DeviceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current snapshot.
    pub fn snapshot(&self) -> DeviceState {
        self.current.clone()
    }

    /// Borrows the current snapshot without cloning.
    pub fn peek(&self) -> &DeviceState {
        &self.current
    }

    /// Monotonic counter, bumped on every effective transition.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Turns the master gate on or off.
    ///
    /// Turning it off forces the full shutdown projection: switch, bulb and
    /// word all go dark and the animation phase resets, with the outgoing
    /// bulb value preserved in `prev_bulb_active`. Turning it on starts the
    /// active sequence (phase 1) and leaves the downstream fields at their
    /// prior values until explicitly toggled.
    pub fn set_inverter_active(&mut self, active: bool) {
        let mut next = self.current.clone();
        if active {
            next.inverter_active = true;
            next.animation_phase = 1;
        } else {
            next.prev_bulb_active = next.bulb_active;
            next.inverter_active = false;
            next.switch_active = false;
            next.bulb_active = false;
            next.word_active = false;
            next.animation_phase = 0;
        }
        self.replace(next);
    }

    /// Toggles the downstream switch.
    ///
    /// Silently leaves the state untouched while the inverter is off.
    /// Opening the switch forces the bulb dark but deliberately leaves the
    /// word at its current value; downstream rendering gates on the switch
    /// so the word merely becomes inert.
    pub fn set_switch_active(&mut self, active: bool) {
        if !self.current.inverter_active {
            return;
        }
        let mut next = self.current.clone();
        next.prev_bulb_active = next.bulb_active;
        next.switch_active = active;
        if !active {
            next.bulb_active = false;
        }
        self.replace(next);
    }

    /// Sets the bulb, capturing the outgoing value first. No dependency
    /// check against the switch; callers are responsible for gating.
    pub fn set_bulb_active(&mut self, active: bool) {
        let mut next = self.current.clone();
        next.prev_bulb_active = next.bulb_active;
        next.bulb_active = active;
        self.replace(next);
    }

    /// Sets the secondary word output. No other field is touched.
    pub fn set_word_active(&mut self, active: bool) {
        let mut next = self.current.clone();
        next.word_active = active;
        self.replace(next);
    }

    /// Sets the visual sequencing phase. No upper bound is enforced.
    pub fn set_animation_phase(&mut self, phase: u32) {
        let mut next = self.current.clone();
        next.animation_phase = phase;
        self.replace(next);
    }

    /// Adds one tick worth of simulated energy savings.
    pub fn increment_energy_saved(&mut self) {
        let mut next = self.current.clone();
        next.energy_saved += ENERGY_SAVED_PER_TICK;
        self.replace(next);
    }

    /// Adds one tick worth of simulated CO2 reduction.
    pub fn increment_co2_reduced(&mut self) {
        let mut next = self.current.clone();
        next.co2_reduced += CO2_REDUCED_PER_TICK;
        self.replace(next);
    }

    /// Forces every stage on and starts the active sequence in a single
    /// transition, bypassing the individual setters' guards.
    pub fn activate_full_system(&mut self) {
        let mut next = self.current.clone();
        next.prev_bulb_active = next.bulb_active;
        next.inverter_active = true;
        next.switch_active = true;
        next.bulb_active = true;
        next.word_active = true;
        next.animation_phase = 1;
        self.replace(next);
    }

    /// Forces every field back to its rest value in a single transition.
    /// Unlike [`set_inverter_active`](Self::set_inverter_active), this also
    /// clears `prev_bulb_active`, restoring the exact initial snapshot
    /// (accumulators excepted, which never decrease).
    pub fn deactivate_full_system(&mut self) {
        let next = DeviceState {
            energy_saved: self.current.energy_saved,
            co2_reduced: self.current.co2_reduced,
            ..DeviceState::default()
        };
        self.replace(next);
    }

    fn replace(&mut self, next: DeviceState) {
        if next != self.current {
            self.current = next;
            self.generation += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invariants(state: &DeviceState) {
        if !state.inverter_active {
            assert!(!state.switch_active);
            assert!(!state.bulb_active);
            assert!(!state.word_active);
            assert_eq!(state.animation_phase, 0);
        }
        if state.switch_active {
            assert!(state.inverter_active);
        }
    }

    #[test]
    fn starts_at_rest() {
        let store = DeviceStore::new();
        assert_eq!(store.snapshot(), DeviceState::default());
        assert_eq!(store.generation(), 0);
    }

    #[test]
    fn switch_is_noop_while_inverter_off() {
        let mut store = DeviceStore::new();
        let before = store.snapshot();

        store.set_switch_active(true);

        assert_eq!(store.snapshot(), before);
        assert_eq!(store.generation(), 0);
    }

    #[test]
    fn switch_off_forces_bulb_dark_but_preserves_word() {
        let mut store = DeviceStore::new();
        store.set_inverter_active(true);
        store.set_switch_active(true);
        store.set_bulb_active(true);
        store.set_word_active(true);

        store.set_switch_active(false);

        let state = store.snapshot();
        assert!(!state.switch_active);
        assert!(!state.bulb_active);
        assert!(state.word_active, "word must survive a switch-off");
        assert!(state.prev_bulb_active);
    }

    #[test]
    fn inverter_shutdown_projects_everything_off() {
        let mut store = DeviceStore::new();
        store.activate_full_system();

        store.set_inverter_active(false);

        let state = store.snapshot();
        assert!(!state.inverter_active);
        assert!(!state.switch_active);
        assert!(!state.bulb_active);
        assert!(!state.word_active);
        assert_eq!(state.animation_phase, 0);
        assert!(state.prev_bulb_active, "outgoing bulb value is captured");
    }

    #[test]
    fn inverter_on_leaves_downstream_untouched() {
        let mut store = DeviceStore::new();
        store.set_inverter_active(true);

        let state = store.snapshot();
        assert!(state.inverter_active);
        assert_eq!(state.animation_phase, 1);
        assert!(!state.switch_active);
        assert!(!state.bulb_active);
        assert!(!state.word_active);
    }

    #[test]
    fn full_activation_then_deactivation_restores_rest() {
        let mut store = DeviceStore::new();
        store.activate_full_system();
        store.deactivate_full_system();

        assert_eq!(store.snapshot(), DeviceState::default());
    }

    #[test]
    fn accumulators_grow_by_fixed_deltas() {
        let mut store = DeviceStore::new();
        for _ in 0..10 {
            store.increment_energy_saved();
            store.increment_co2_reduced();
        }

        let state = store.snapshot();
        assert!((state.energy_saved - 10.0 * ENERGY_SAVED_PER_TICK).abs() < 1e-9);
        assert!((state.co2_reduced - 10.0 * CO2_REDUCED_PER_TICK).abs() < 1e-9);
    }

    #[test]
    fn deactivation_preserves_accumulators() {
        let mut store = DeviceStore::new();
        store.activate_full_system();
        store.increment_energy_saved();
        store.increment_co2_reduced();

        store.deactivate_full_system();

        let state = store.snapshot();
        assert!(state.energy_saved > 0.0);
        assert!(state.co2_reduced > 0.0);
    }

    #[test]
    fn invariants_hold_across_arbitrary_sequences() {
        // Fixed pseudo-random walk. The bulb/word/phase setters are
        // caller-gated, so the walk gates them on the snapshot the same way
        // the owning session does.
        let mut store = DeviceStore::new();
        let mut seed: u64 = 0x9e37_79b9_7f4a_7c15;
        let mut prev_energy = 0.0_f64;
        for _ in 0..500 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            let op = (seed >> 33) % 9;
            let flag = (seed >> 17) & 1 == 1;
            match op {
                0 => store.set_inverter_active(flag),
                1 => store.set_switch_active(flag),
                2 if store.peek().switch_active => store.set_bulb_active(flag),
                3 if store.peek().switch_active => store.set_word_active(flag),
                4 if store.peek().inverter_active => {
                    store.set_animation_phase((seed % 5) as u32)
                }
                5 => store.increment_energy_saved(),
                6 => store.increment_co2_reduced(),
                7 => store.activate_full_system(),
                8 => store.deactivate_full_system(),
                _ => {}
            }
            assert_invariants(store.peek());
            assert!(store.peek().energy_saved >= prev_energy);
            prev_energy = store.peek().energy_saved;
        }
    }

    #[test]
    fn generation_only_bumps_on_effective_change() {
        let mut store = DeviceStore::new();
        store.set_inverter_active(true);
        let gen = store.generation();

        store.set_inverter_active(true);
        store.set_animation_phase(1);

        assert_eq!(store.generation(), gen);
    }

    #[test]
    fn walkthrough_scenario_matches_expected_states() {
        let mut store = DeviceStore::new();

        store.set_inverter_active(true);
        assert!(store.peek().inverter_active);
        assert_eq!(store.peek().animation_phase, 1);
        assert!(!store.peek().switch_active);

        store.set_switch_active(true);
        assert!(store.peek().switch_active);

        store.set_bulb_active(true);
        assert!(store.peek().bulb_active);
        assert!(!store.peek().prev_bulb_active);

        store.set_inverter_active(false);
        let state = store.snapshot();
        assert_eq!(
            state,
            DeviceState {
                prev_bulb_active: true,
                ..DeviceState::default()
            }
        );
    }
}
