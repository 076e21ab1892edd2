//! Tap/combo session for the pet view.
//!
//! Holds the per-view character state: level, tap progress, the decaying
//! combo multiplier, the one-shot evolution transition, and the transient
//! visual artifacts (floating `+N` labels, speech phrases, tap bounce). All
//! timing is wall-clock milliseconds fed in by the caller, so every rule here
//! is testable without a browser.

use crate::energy::EnergyMeter;
use crate::rng::SimpleRng;

/// Two taps within this window grow the combo; a wider gap decays it.
pub const COMBO_WINDOW_MS: f64 = 500.0;
/// Combo growth per rapid tap.
pub const COMBO_STEP: f64 = 0.1;
/// Combo decay on a slow tap. Deliberately steeper than growth.
pub const COMBO_DECAY: f64 = 0.2;
pub const COMBO_MIN: f64 = 1.0;
pub const COMBO_MAX: f64 = 3.0;

/// Coins per tap before the combo multiplier.
pub const BASE_POINTS: f64 = 1.0;
/// Energy cost per accepted tap.
pub const TAP_ENERGY_COST: f64 = 1.0;

/// Taps required to evolve from level 1.
pub const FIRST_LEVEL_TAPS: u32 = 100;
/// Progress is displayed modulo this band.
pub const PROGRESS_BAND: u32 = 100;

/// Length of the evolution animation.
pub const EVOLVE_MS: f64 = 2000.0;
/// Lifetime of a floating `+N` label.
pub const FLOAT_MS: f64 = 1000.0;
/// Length of the tap bounce on the character sprite.
pub const BOUNCE_MS: f64 = 150.0;
/// Lifetime of a speech phrase.
pub const PHRASE_MS: f64 = 2000.0;
/// Chance to show a phrase on an accepted tap.
pub const PHRASE_CHANCE: f64 = 0.4;

/// Speech bubble lines shown above the character on tap.
pub const PHRASES: &[&str] = &[
    "Ням-ням!",
    "Ещё! Ещё!",
    "Щекотно!",
    "Я расту!",
    "Мур-р-р!",
    "Как дела?",
    "Обожаю тапы!",
    "Вкусная энергия!",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PetState {
    Sleeping,
    Active,
    Transitioning,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapRejection {
    NoEnergy,
    NotActive,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TapOutcome {
    Rejected(TapRejection),
    Accepted {
        points: u32,
        /// True when this tap started the evolution transition.
        evolving: bool,
    },
}

/// A transient `+N` label anchored at the tap cell.
#[derive(Clone, Copy, Debug)]
pub struct FloatingPoints {
    pub points: u32,
    pub col: u16,
    pub row: u16,
    pub spawned_ms: f64,
}

pub struct PetSession {
    level: u32,
    current_taps: u32,
    required_taps: u32,
    state: PetState,
    combo: f64,
    last_tap_ms: Option<f64>,
    transition_ends_ms: f64,
    floats: Vec<FloatingPoints>,
    phrase: Option<(usize, f64)>,
    bounce_until_ms: f64,
}

impl PetSession {
    pub fn new(level: u32, current_taps: u32, required_taps: u32) -> Self {
        Self {
            level: level.max(1),
            current_taps,
            required_taps: required_taps.max(1),
            state: PetState::Sleeping,
            combo: COMBO_MIN,
            last_tap_ms: None,
            transition_ends_ms: 0.0,
            floats: Vec::new(),
            phrase: None,
            bounce_until_ms: 0.0,
        }
    }

    /// Session start: the character wakes once the view is live.
    pub fn wake(&mut self) {
        if self.state == PetState::Sleeping {
            self.state = PetState::Active;
        }
    }

    pub fn state(&self) -> PetState {
        self.state
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn current_taps(&self) -> u32 {
        self.current_taps
    }

    pub fn required_taps(&self) -> u32 {
        self.required_taps
    }

    pub fn combo(&self) -> f64 {
        self.combo
    }

    pub fn floats(&self) -> &[FloatingPoints] {
        &self.floats
    }

    pub fn phrase(&self) -> Option<&'static str> {
        self.phrase.map(|(i, _)| PHRASES[i % PHRASES.len()])
    }

    pub fn bouncing(&self, now_ms: f64) -> bool {
        now_ms < self.bounce_until_ms
    }

    /// Progress toward the displayed band: `(current % 100, 100)`.
    pub fn progress_in_band(&self) -> (u32, u32) {
        (self.current_taps % PROGRESS_BAND, PROGRESS_BAND)
    }

    /// Handle one pointer tap at cell `(col, row)`.
    ///
    /// A rejected tap mutates nothing: no combo change, no tap count, no
    /// energy spend, no artifacts.
    pub fn tap(
        &mut self,
        col: u16,
        row: u16,
        now_ms: f64,
        energy: &mut EnergyMeter,
        rng: &mut SimpleRng,
    ) -> TapOutcome {
        if energy.is_empty() {
            return TapOutcome::Rejected(TapRejection::NoEnergy);
        }
        if self.state != PetState::Active {
            return TapOutcome::Rejected(TapRejection::NotActive);
        }

        // Combo: grows slowly inside the window, decays faster outside it.
        let within_window = self
            .last_tap_ms
            .is_some_and(|prev| now_ms - prev < COMBO_WINDOW_MS);
        self.combo = if within_window {
            (self.combo + COMBO_STEP).min(COMBO_MAX)
        } else {
            (self.combo - COMBO_DECAY).max(COMBO_MIN)
        };
        self.last_tap_ms = Some(now_ms);

        let points = (BASE_POINTS * self.combo).ceil() as u32;

        self.floats.push(FloatingPoints {
            points,
            col,
            row,
            spawned_ms: now_ms,
        });

        self.current_taps += 1;
        energy.consume(TAP_ENERGY_COST);

        // Only the first-level threshold evolves via taps; higher levels are
        // awarded by the remote collaborator.
        let evolving = self.current_taps >= self.required_taps && self.level == 1;
        if evolving {
            self.state = PetState::Transitioning;
            self.transition_ends_ms = now_ms + EVOLVE_MS;
        }

        self.bounce_until_ms = now_ms + BOUNCE_MS;

        if rng.roll(PHRASE_CHANCE) {
            self.phrase = Some((rng.below(PHRASES.len()), now_ms + PHRASE_MS));
        }

        TapOutcome::Accepted { points, evolving }
    }

    /// Per-frame upkeep: expire artifacts and finish a pending evolution.
    /// Returns `true` exactly once when the level-up completes.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        self.floats
            .retain(|f| now_ms - f.spawned_ms < FLOAT_MS);
        if let Some((_, until)) = self.phrase {
            if now_ms >= until {
                self.phrase = None;
            }
        }

        if self.state == PetState::Transitioning && now_ms >= self.transition_ends_ms {
            self.level += 1;
            self.state = PetState::Active;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn session() -> (PetSession, EnergyMeter, SimpleRng) {
        let mut pet = PetSession::new(1, 0, FIRST_LEVEL_TAPS);
        pet.wake();
        (pet, EnergyMeter::new(100), SimpleRng::new(42))
    }

    #[test]
    fn sleeping_pet_rejects_taps() {
        let mut pet = PetSession::new(1, 0, 100);
        let mut energy = EnergyMeter::new(100);
        let mut rng = SimpleRng::new(1);
        assert_eq!(
            pet.tap(5, 5, 0.0, &mut energy, &mut rng),
            TapOutcome::Rejected(TapRejection::NotActive)
        );
        pet.wake();
        assert!(matches!(
            pet.tap(5, 5, 0.0, &mut energy, &mut rng),
            TapOutcome::Accepted { .. }
        ));
    }

    #[test]
    fn first_tap_awards_base_points() {
        let (mut pet, mut energy, mut rng) = session();
        // No previous tap → decay branch, clamped at the floor of 1.0
        match pet.tap(5, 5, 1000.0, &mut energy, &mut rng) {
            TapOutcome::Accepted { points, .. } => assert_eq!(points, 1),
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(pet.combo(), COMBO_MIN);
    }

    #[test]
    fn rapid_taps_grow_combo_to_cap() {
        let (mut pet, mut energy, mut rng) = session();
        let mut now = 0.0;
        // Primer tap: the very first tap has no window to land in
        pet.tap(5, 5, now, &mut energy, &mut rng);
        let mut prev = pet.combo();
        let mut saturated = false;
        for _ in 0..40 {
            now += 100.0; // well inside the 500ms window
            pet.tap(5, 5, now, &mut energy, &mut rng);
            if !saturated {
                assert!(
                    pet.combo() > prev || (pet.combo() - COMBO_MAX).abs() < 1e-9,
                    "combo must strictly increase until saturation"
                );
            }
            if (pet.combo() - COMBO_MAX).abs() < 1e-9 {
                saturated = true;
            }
            prev = pet.combo();
        }
        assert!(saturated);
        assert_eq!(pet.combo(), COMBO_MAX);
    }

    #[test]
    fn slow_tap_decays_combo() {
        let (mut pet, mut energy, mut rng) = session();
        let mut now = 0.0;
        for _ in 0..5 {
            now += 100.0;
            pet.tap(5, 5, now, &mut energy, &mut rng);
        }
        let grown = pet.combo();
        now += 500.0; // exactly at the window boundary counts as slow
        pet.tap(5, 5, now, &mut energy, &mut rng);
        assert!((pet.combo() - (grown - COMBO_DECAY)).abs() < 1e-9);
    }

    #[test]
    fn combo_floor_is_one() {
        let (mut pet, mut energy, mut rng) = session();
        let mut now = 0.0;
        for _ in 0..10 {
            now += 10_000.0;
            pet.tap(5, 5, now, &mut energy, &mut rng);
            assert_eq!(pet.combo(), COMBO_MIN);
        }
    }

    #[test]
    fn points_are_ceiling_of_combo() {
        let (mut pet, mut energy, mut rng) = session();
        let mut now = 0.0;
        // Two rapid taps: second one has combo 1.1 → ceil = 2
        pet.tap(5, 5, now, &mut energy, &mut rng);
        now += 100.0;
        match pet.tap(5, 5, now, &mut energy, &mut rng) {
            TapOutcome::Accepted { points, .. } => assert_eq!(points, 2),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn tap_consumes_one_energy() {
        let (mut pet, mut energy, mut rng) = session();
        pet.tap(5, 5, 0.0, &mut energy, &mut rng);
        assert_eq!(energy.rounded(), 99);
    }

    #[test]
    fn empty_energy_tap_mutates_nothing() {
        let mut pet = PetSession::new(1, 0, 100);
        pet.wake();
        let mut energy = EnergyMeter::with_current(100, 0.0);
        let mut rng = SimpleRng::new(42);

        let combo_before = pet.combo();
        let taps_before = pet.current_taps();
        assert_eq!(
            pet.tap(5, 5, 100.0, &mut energy, &mut rng),
            TapOutcome::Rejected(TapRejection::NoEnergy)
        );
        assert_eq!(pet.combo(), combo_before);
        assert_eq!(pet.current_taps(), taps_before);
        assert!(pet.floats().is_empty());
    }

    #[test]
    fn evolution_fires_exactly_once() {
        let mut pet = PetSession::new(1, 98, 100);
        pet.wake();
        let mut energy = EnergyMeter::new(100);
        let mut rng = SimpleRng::new(42);
        let mut now = 0.0;

        now += 1000.0;
        pet.tap(5, 5, now, &mut energy, &mut rng); // 99
        assert_eq!(pet.state(), PetState::Active);

        now += 1000.0;
        let out = pet.tap(5, 5, now, &mut energy, &mut rng); // 100 → threshold
        assert!(matches!(out, TapOutcome::Accepted { evolving: true, .. }));
        assert_eq!(pet.state(), PetState::Transitioning);

        // Taps during the transition are rejected
        assert_eq!(
            pet.tap(5, 5, now + 100.0, &mut energy, &mut rng),
            TapOutcome::Rejected(TapRejection::NotActive)
        );

        // Transition completes after EVOLVE_MS, exactly once
        assert!(!pet.frame(now + EVOLVE_MS - 1.0));
        assert!(pet.frame(now + EVOLVE_MS));
        assert_eq!(pet.level(), 2);
        assert_eq!(pet.state(), PetState::Active);
        assert!(!pet.frame(now + EVOLVE_MS + 100.0));

        // Level 2: crossing further thresholds no longer evolves via taps
        let mut now2 = now + 10_000.0;
        for _ in 0..200 {
            now2 += 1000.0;
            let out = pet.tap(5, 5, now2, &mut energy, &mut rng);
            if let TapOutcome::Accepted { evolving, .. } = out {
                assert!(!evolving);
            }
        }
        assert_eq!(pet.level(), 2);
    }

    #[test]
    fn floats_expire_after_lifetime() {
        let (mut pet, mut energy, mut rng) = session();
        pet.tap(3, 4, 0.0, &mut energy, &mut rng);
        assert_eq!(pet.floats().len(), 1);
        assert_eq!(pet.floats()[0].col, 3);
        assert_eq!(pet.floats()[0].row, 4);

        pet.frame(FLOAT_MS - 1.0);
        assert_eq!(pet.floats().len(), 1);
        pet.frame(FLOAT_MS);
        assert!(pet.floats().is_empty());
    }

    #[test]
    fn progress_wraps_at_band() {
        let mut pet = PetSession::new(2, 247, 100);
        pet.wake();
        assert_eq!(pet.progress_in_band(), (47, PROGRESS_BAND));
    }

    proptest! {
        /// spec: combo stays within [1, 3] regardless of input timing.
        #[test]
        fn combo_bounds_hold(gaps in prop::collection::vec(0.0f64..2000.0, 0..150)) {
            let (mut pet, mut energy, mut rng) = session();
            let mut now = 0.0;
            for gap in gaps {
                now += gap;
                pet.tap(1, 1, now, &mut energy, &mut rng);
                prop_assert!(pet.combo() >= COMBO_MIN - 1e-9);
                prop_assert!(pet.combo() <= COMBO_MAX + 1e-9);
            }
        }

        /// Awarded points always equal ceil(combo) for a unit base.
        #[test]
        fn points_match_combo(gaps in prop::collection::vec(1.0f64..900.0, 1..100)) {
            let (mut pet, mut energy, mut rng) = session();
            let mut now = 0.0;
            for gap in gaps {
                now += gap;
                if let TapOutcome::Accepted { points, .. } =
                    pet.tap(1, 1, now, &mut energy, &mut rng)
                {
                    prop_assert_eq!(points, pet.combo().ceil() as u32);
                }
            }
        }
    }
}
