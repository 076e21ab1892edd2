//! Bounded, time-regenerating energy resource gating taps.
//!
//! Energy is clamped to `[0, max]` at every mutation. Passive regeneration
//! restores +1 unit every three minutes of ambient ticks; the mini-game
//! reward path calls `regenerate` directly. Depletion raises a one-shot
//! "empty" signal: it fires when energy crosses from positive to empty and is
//! re-armed only once energy rises above zero again, so a dismissed prompt
//! stays dismissed for the rest of the depletion episode.

use crate::time::AMBIENT_TPS;

/// Default resource ceiling.
pub const ENERGY_MAX: u32 = 100;

/// Passive regeneration: +1 unit per 3 minutes.
pub const REGEN_INTERVAL_TICKS: u64 = 3 * 60 * AMBIENT_TPS as u64;

pub struct EnergyMeter {
    current: f64,
    max: u32,
    /// Ambient ticks accumulated toward the next passive +1.
    regen_progress: u64,
    /// Armed while energy is positive; disarmed once the empty signal fires.
    empty_armed: bool,
    /// Set on the depletion edge, consumed by `take_empty_signal`.
    empty_pending: bool,
}

impl EnergyMeter {
    pub fn new(max: u32) -> Self {
        Self::with_current(max, max as f64)
    }

    /// Restore from a persisted snapshot value.
    pub fn with_current(max: u32, current: f64) -> Self {
        let current = current.clamp(0.0, max as f64);
        Self {
            current,
            max,
            regen_progress: 0,
            empty_armed: current.round() > 0.0,
            empty_pending: false,
        }
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Energy as the player sees it. Gating uses this rounded value.
    pub fn rounded(&self) -> i64 {
        self.current.round() as i64
    }

    pub fn is_empty(&self) -> bool {
        self.rounded() <= 0
    }

    /// Spend `amount` units. A no-op returning `false` when already empty.
    pub fn consume(&mut self, amount: f64) -> bool {
        if self.is_empty() {
            return false;
        }
        self.current = (self.current - amount).max(0.0);
        if self.is_empty() && self.empty_armed {
            self.empty_armed = false;
            self.empty_pending = true;
        }
        true
    }

    /// Add `amount` units, clamped to the ceiling. Refilling above zero
    /// re-arms the empty signal for the next depletion episode.
    pub fn regenerate(&mut self, amount: f64) {
        if amount <= 0.0 {
            return;
        }
        self.current = (self.current + amount).min(self.max as f64);
        if !self.is_empty() {
            self.empty_armed = true;
            self.empty_pending = false;
        }
    }

    /// Advance passive regeneration by `ticks` ambient ticks.
    pub fn advance(&mut self, ticks: u32) {
        self.regen_progress += ticks as u64;
        let units = self.regen_progress / REGEN_INTERVAL_TICKS;
        if units > 0 {
            self.regen_progress %= REGEN_INTERVAL_TICKS;
            self.regenerate(units as f64);
        }
    }

    /// One-shot depletion edge. Returns `true` exactly once per episode.
    pub fn take_empty_signal(&mut self) -> bool {
        std::mem::take(&mut self.empty_pending)
    }
}
