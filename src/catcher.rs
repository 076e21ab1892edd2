//! Nut-catcher mini-game: a fixed-duration falling-object catch session.
//!
//! The play field is normalized percent space: x and y both run 0..100, with
//! y growing downward. A thrower wanders along the top edge dropping nuts of
//! three reward tiers; the basket tracks the pointer along the bottom. Each
//! physics tick advances every nut by its speed, tests the catch band against
//! the basket span, and prunes caught/missed nuts. The session owns its own
//! physics clock, so dropping the session tears down the whole loop.
//!
//! Energy earned is accumulated per catch as an integer award and reported
//! once, at termination, by the owner.

use crate::rng::SimpleRng;
use crate::time::{GameTime, PHYSICS_TPS};

/// Fixed session length.
pub const GAME_DURATION_SECS: u32 = 60;
const DURATION_TICKS: u64 = (GAME_DURATION_SECS * PHYSICS_TPS) as u64;

/// Combo decays back to 1.0 this long after the last catch.
pub const COMBO_DURATION_SECS: u32 = 3;
const COMBO_TICKS: u32 = COMBO_DURATION_SECS * PHYSICS_TPS;
pub const COMBO_STEP: f64 = 0.1;
pub const COMBO_MAX: f64 = 3.0;

/// Basket half-width as a share of field width.
pub const BASKET_HALF_WIDTH: f64 = 12.5;
pub const BASKET_MIN_X: f64 = 10.0;
pub const BASKET_MAX_X: f64 = 90.0;

/// Vertical band just above the field bottom where a nut can land in the
/// basket. Below the band the nut is gone.
pub const CATCH_BAND_TOP: f64 = 83.0;
pub const CATCH_BAND_BOTTOM: f64 = 97.0;
const FIELD_BOTTOM: f64 = 100.0;

/// Spawn interval starts here and shrinks with score, with a floor.
const BASE_SPAWN_MS: f64 = 800.0;
const SPAWN_SHRINK_PER_POINT_MS: f64 = 10.0;
const SPAWN_SHRINK_CAP_MS: f64 = 400.0;

/// Base fall speed range, percent of field height per physics tick.
const SPEED_BASE_MIN: f64 = 0.66;
const SPEED_BASE_SPREAD: f64 = 1.0;
/// Extra speed earned through score, capped.
const SPEED_SCORE_DIV: f64 = 60.0;
const SPEED_SCORE_CAP: f64 = 1.0;
/// Linear ramp over the session: ×1.0 at start, ×1.5 at the end.
const SPEED_RAMP: f64 = 0.5;

/// Cosmetic spin, degrees per tick.
const SPIN_PER_TICK: f64 = 5.0;

/// Thrower movement along the top edge.
const THROWER_MIN_X: f64 = 10.0;
const THROWER_MAX_X: f64 = 90.0;
const THROWER_SPEED: f64 = 0.33;
const THROWER_FLIP_CHANCE: f64 = 0.013;
/// Pose/sprite-frame cadence: every half second of physics ticks.
const THROWER_POSE_TICKS: u64 = (PHYSICS_TPS / 2) as u64;
const THROWER_THROW_CHANCE: f64 = 0.3;

/// Reward tiers. Acorns are the common small tier: hardest to catch and
/// worth double when caught.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NutKind {
    Acorn,
    Walnut,
    Hazelnut,
}

impl NutKind {
    pub fn base_points(self) -> u32 {
        match self {
            NutKind::Acorn => 1,
            NutKind::Walnut => 2,
            NutKind::Hazelnut => 3,
        }
    }

    /// Catch bonus: the common tier pays out double.
    fn catch_multiplier(self) -> f64 {
        match self {
            NutKind::Acorn => 2.0,
            _ => 1.0,
        }
    }

    fn from_roll(roll: f64) -> Self {
        if roll < 0.7 {
            NutKind::Acorn
        } else if roll < 0.85 {
            NutKind::Walnut
        } else {
            NutKind::Hazelnut
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Nut {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    /// Cosmetic spin; no gameplay effect.
    pub rotation: f64,
    pub kind: NutKind,
}

#[derive(Clone, Copy, Debug)]
pub struct Thrower {
    pub x: f64,
    pub direction: f64,
    pub throwing: bool,
    pub frame: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatcherPhase {
    Idle,
    Running,
    Paused,
    GameOver,
}

#[derive(Clone, Copy, Debug)]
pub struct CaughtNut {
    pub kind: NutKind,
    pub points: u32,
}

/// What happened during one frame's worth of physics ticks.
#[derive(Default)]
pub struct TickReport {
    pub catches: Vec<CaughtNut>,
    pub misses: u32,
    /// Set once, on the tick the session duration elapses.
    pub finished: bool,
}

/// Short-lived catch animation anchor above the basket.
#[derive(Clone, Copy, Debug)]
pub struct CatchFlash {
    pub x: f64,
    pub ticks_left: u32,
}

pub struct CatcherSession {
    phase: CatcherPhase,
    clock: GameTime,
    elapsed_ticks: u64,
    score: u32,
    energy_earned: u32,
    combo: f64,
    combo_ticks_left: u32,
    basket_x: f64,
    nuts: Vec<Nut>,
    nut_seq: u32,
    ticks_since_spawn: u64,
    thrower: Thrower,
    catch_flash: Option<CatchFlash>,
}

impl CatcherSession {
    pub fn new() -> Self {
        Self {
            phase: CatcherPhase::Idle,
            clock: GameTime::new(PHYSICS_TPS),
            elapsed_ticks: 0,
            score: 0,
            energy_earned: 0,
            combo: 1.0,
            combo_ticks_left: 0,
            basket_x: 50.0,
            nuts: Vec::new(),
            nut_seq: 0,
            ticks_since_spawn: 0,
            thrower: Thrower {
                x: 50.0,
                direction: 1.0,
                throwing: false,
                frame: 0,
            },
            catch_flash: None,
        }
    }

    pub fn phase(&self) -> CatcherPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Accumulated reward, reported to the energy model at termination.
    pub fn energy_earned(&self) -> u32 {
        self.energy_earned
    }

    pub fn combo(&self) -> f64 {
        self.combo
    }

    pub fn basket_x(&self) -> f64 {
        self.basket_x
    }

    pub fn nuts(&self) -> &[Nut] {
        &self.nuts
    }

    pub fn thrower(&self) -> &Thrower {
        &self.thrower
    }

    pub fn catch_flash(&self) -> Option<&CatchFlash> {
        self.catch_flash.as_ref()
    }

    pub fn elapsed_secs(&self) -> u32 {
        (self.elapsed_ticks / PHYSICS_TPS as u64) as u32
    }

    pub fn remaining_secs(&self) -> u32 {
        GAME_DURATION_SECS.saturating_sub(self.elapsed_secs())
    }

    /// Begin (or restart) a session. Quota gating is the caller's job.
    pub fn start(&mut self, now_ms: f64) {
        debug_assert!(self.phase != CatcherPhase::Running);
        *self = CatcherSession::new();
        self.phase = CatcherPhase::Running;
        self.clock.resync(now_ms);
    }

    pub fn toggle_pause(&mut self, now_ms: f64) {
        match self.phase {
            CatcherPhase::Running => self.phase = CatcherPhase::Paused,
            CatcherPhase::Paused => {
                // Swallow the time spent paused, then continue.
                self.clock.resync(now_ms);
                self.phase = CatcherPhase::Running;
            }
            _ => {}
        }
    }

    /// Move the basket toward a pointer position (percent of field width).
    pub fn move_basket_to(&mut self, x_pct: f64) {
        self.basket_x = x_pct.clamp(BASKET_MIN_X, BASKET_MAX_X);
    }

    /// Keyboard nudge.
    pub fn nudge_basket(&mut self, delta: f64) {
        self.move_basket_to(self.basket_x + delta);
    }

    /// Convert frame time into physics ticks and run them.
    pub fn frame(&mut self, now_ms: f64, rng: &mut SimpleRng) -> TickReport {
        let mut report = TickReport::default();
        if self.phase != CatcherPhase::Running {
            return report;
        }
        let ticks = self.clock.update(now_ms);
        for _ in 0..ticks {
            self.step(rng, &mut report);
            if self.phase != CatcherPhase::Running {
                break;
            }
        }
        report
    }

    /// One physics tick.
    fn step(&mut self, rng: &mut SimpleRng, report: &mut TickReport) {
        self.elapsed_ticks += 1;
        if self.elapsed_ticks >= DURATION_TICKS {
            // Terminal: stop spawning and advancing; freeze the field.
            self.phase = CatcherPhase::GameOver;
            report.finished = true;
            return;
        }

        self.step_thrower(rng);
        self.maybe_spawn(rng);
        self.advance_nuts(report);

        if self.combo_ticks_left > 0 {
            self.combo_ticks_left -= 1;
            if self.combo_ticks_left == 0 {
                self.combo = 1.0;
            }
        }

        if let Some(flash) = &mut self.catch_flash {
            flash.ticks_left = flash.ticks_left.saturating_sub(1);
            if flash.ticks_left == 0 {
                self.catch_flash = None;
            }
        }
    }

    fn step_thrower(&mut self, rng: &mut SimpleRng) {
        if self.elapsed_ticks % THROWER_POSE_TICKS == 0 {
            self.thrower.frame = (self.thrower.frame + 1) % 4;
            self.thrower.throwing = rng.roll(THROWER_THROW_CHANCE);
        }

        if rng.roll(THROWER_FLIP_CHANCE) {
            self.thrower.direction = -self.thrower.direction;
        }
        let next = self.thrower.x + self.thrower.direction * THROWER_SPEED;
        if next < THROWER_MIN_X {
            self.thrower.x = THROWER_MIN_X;
            self.thrower.direction = 1.0;
        } else if next > THROWER_MAX_X {
            self.thrower.x = THROWER_MAX_X;
            self.thrower.direction = -1.0;
        } else {
            self.thrower.x = next;
        }
    }

    /// Spawn interval shrinks as score grows (floor applied); nuts drop from
    /// the thrower while it is in the throwing pose, otherwise occasionally
    /// from anywhere along the canopy.
    fn maybe_spawn(&mut self, rng: &mut SimpleRng) {
        self.ticks_since_spawn += 1;

        let interval_ms = BASE_SPAWN_MS
            - (self.score as f64 * SPAWN_SHRINK_PER_POINT_MS).min(SPAWN_SHRINK_CAP_MS);
        let interval_ticks = interval_ms * PHYSICS_TPS as f64 / 1000.0;
        if (self.ticks_since_spawn as f64) <= interval_ticks {
            return;
        }
        self.ticks_since_spawn = 0;

        let x = if self.thrower.throwing {
            (self.thrower.x + rng.range_f64(-5.0, 5.0)).clamp(0.0, 100.0)
        } else if rng.roll(0.5) {
            rng.range_f64(10.0, 90.0)
        } else {
            return; // canopy stayed quiet this round
        };

        let ramp = 1.0 + (self.elapsed_ticks as f64 / DURATION_TICKS as f64) * SPEED_RAMP;
        let speed = (SPEED_BASE_MIN
            + rng.next_f64() * SPEED_BASE_SPREAD
            + (self.score as f64 / SPEED_SCORE_DIV).min(SPEED_SCORE_CAP))
            * ramp;

        self.nut_seq = self.nut_seq.wrapping_add(1);
        self.nuts.push(Nut {
            id: self.nut_seq,
            x,
            y: 10.0,
            speed,
            rotation: rng.range_f64(0.0, 360.0),
            kind: NutKind::from_roll(rng.next_f64()),
        });
    }

    fn advance_nuts(&mut self, report: &mut TickReport) {
        let basket_left = self.basket_x - BASKET_HALF_WIDTH;
        let basket_right = self.basket_x + BASKET_HALF_WIDTH;
        let mut caught: Vec<CaughtNut> = Vec::new();
        let mut missed = 0u32;
        let mut combo = self.combo;
        let mut combo_ticks = self.combo_ticks_left;

        self.nuts.retain_mut(|nut| {
            nut.y += nut.speed;
            nut.rotation = (nut.rotation + SPIN_PER_TICK) % 360.0;

            // Catch: inside the bottom band and within the basket span.
            if nut.y > CATCH_BAND_TOP
                && nut.y < CATCH_BAND_BOTTOM
                && nut.x > basket_left
                && nut.x < basket_right
            {
                let points =
                    (nut.kind.base_points() as f64 * combo * nut.kind.catch_multiplier())
                        .floor() as u32;
                caught.push(CaughtNut {
                    kind: nut.kind,
                    points,
                });
                combo = (combo + COMBO_STEP).min(COMBO_MAX);
                combo_ticks = COMBO_TICKS;
                return false;
            }

            // Miss: fell past the field. Harsher than the tap session's
            // gradual decay: the combo resets outright.
            if nut.y > FIELD_BOTTOM {
                combo = 1.0;
                combo_ticks = 0;
                missed += 1;
                return false;
            }

            true
        });

        self.combo = combo;
        self.combo_ticks_left = combo_ticks;
        if !caught.is_empty() {
            self.catch_flash = Some(CatchFlash {
                x: self.basket_x,
                ticks_left: PHYSICS_TPS / 2,
            });
        }
        for c in &caught {
            self.score += c.points;
            self.energy_earned += c.points;
        }
        report.misses += missed;
        report.catches.append(&mut caught);
    }

    #[cfg(test)]
    pub(crate) fn inject_nut(&mut self, x: f64, y: f64, speed: f64, kind: NutKind) {
        self.nut_seq = self.nut_seq.wrapping_add(1);
        self.nuts.push(Nut {
            id: self.nut_seq,
            x,
            y,
            speed,
            rotation: 0.0,
            kind,
        });
    }
}
