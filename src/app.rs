//! Top-level app state and event dispatch.
//!
//! Owns the energy meter, the pet tap session, the optional mini-game session
//! and the daily quota, and routes normalized input events to them. All
//! browser specifics (DOM, localStorage, wall clock, haptic bridge) are
//! injected or fed in per frame, so the whole state machine runs in host
//! tests.
//!
//! Persistence is request-based: the app raises save flags at explicit
//! reconciliation points and `main.rs` flushes them to localStorage.

use crate::catcher::{CatcherPhase, CatcherSession};
use crate::energy::{EnergyMeter, ENERGY_MAX};
use crate::feedback::{Haptics, Intensity, SoundCue};
use crate::input::{col_to_percent, KeyInput};
use crate::pet::{PetSession, TapOutcome, TapRejection};
use crate::quota::{DailyQuota, QuotaRecord};
use crate::rng::SimpleRng;
use crate::storage::Snapshot;
use crate::time::{GameTime, AMBIENT_TPS};

/// Keyboard nudge of the mini-game basket, percent of field width.
const BASKET_NUDGE_PCT: f64 = 4.0;

/// Autosave cadence while the tap counter is dirty: every 30 s.
const AUTOSAVE_TICKS: u64 = 30 * AMBIENT_TPS as u64;

/// Semantic click-action IDs, registered by the render pass.
pub mod actions {
    /// Swallows clicks on inert overlay chrome.
    pub const NONE: u16 = 0;
    /// The character tap area.
    pub const TAP_PET: u16 = 1;
    pub const TOGGLE_SOUND: u16 = 2;
    pub const OPEN_CATCHER: u16 = 3;

    /// Energy-empty prompt.
    pub const EMPTY_PLAY: u16 = 10;
    pub const EMPTY_CLOSE: u16 = 11;

    /// Mini-game.
    pub const CATCHER_START: u16 = 20;
    pub const CATCHER_FIELD: u16 = 21;
    pub const CATCHER_PAUSE: u16 = 22;
    pub const CATCHER_CLOSE: u16 = 23;
    pub const CATCHER_RESTART: u16 = 24;
    pub const CATCHER_EXIT: u16 = 25;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Pet,
    Catcher,
}

/// One-shot visual triggers consumed by the render pass (tachyonfx).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisualEvent {
    Evolved,
    GameOver,
}

pub struct App {
    pub energy: EnergyMeter,
    pub pet: PetSession,
    pub catcher: Option<CatcherSession>,
    pub quota: DailyQuota,
    pub coins: u64,
    pub high_score: u32,
    pub sound_enabled: bool,
    pub screen: Screen,
    /// The blocking "energy over" prompt.
    pub energy_prompt_open: bool,
    /// Where keyboard taps land; the render pass keeps it at the character
    /// sprite's center.
    pub tap_anchor: (u16, u16),
    /// Mini-game field geometry in cells, kept current by the render pass so
    /// pointer columns can be mapped into percent space.
    pub field_cols: u16,
    pub field_origin_col: u16,
    /// Countdown to quota reset, refreshed by the host each frame.
    pub secs_to_reset: u32,

    rng: SimpleRng,
    ambient: GameTime,
    haptics: Box<dyn Haptics>,
    sound: Box<dyn SoundCue>,
    today: String,
    visual_events: Vec<VisualEvent>,
    save_requested: bool,
    quota_save_requested: bool,
    autosave_dirty: bool,
    ticks_since_autosave: u64,
}

impl App {
    pub fn new(
        snapshot: Snapshot,
        quota_record: Option<QuotaRecord>,
        today: String,
        seed: u64,
        haptics: Box<dyn Haptics>,
        sound: Box<dyn SoundCue>,
    ) -> Self {
        let mut pet = PetSession::new(
            snapshot.level,
            snapshot.current_taps,
            snapshot.required_taps,
        );
        pet.wake();
        Self {
            energy: EnergyMeter::with_current(ENERGY_MAX, snapshot.energy),
            pet,
            catcher: None,
            quota: DailyQuota::new(quota_record, &today),
            coins: snapshot.coins,
            high_score: snapshot.high_score,
            sound_enabled: snapshot.sound_enabled,
            screen: Screen::Pet,
            energy_prompt_open: false,
            tap_anchor: (0, 0),
            field_cols: 0,
            field_origin_col: 0,
            secs_to_reset: 0,
            rng: SimpleRng::new(seed),
            ambient: GameTime::new(AMBIENT_TPS),
            haptics,
            sound,
            today,
            visual_events: Vec::new(),
            save_requested: false,
            quota_save_requested: false,
            autosave_dirty: false,
            ticks_since_autosave: 0,
        }
    }

    /// Refresh environment facts the host owns: local day and reset countdown.
    pub fn env_update(&mut self, today: String, secs_to_reset: u32) {
        if self.today != today {
            self.quota.sync(&today);
            self.today = today;
        }
        self.secs_to_reset = secs_to_reset;
    }

    /// Advance all clocks by one render frame.
    pub fn frame(&mut self, now_ms: f64) {
        let ambient_ticks = self.ambient.update(now_ms);
        if ambient_ticks > 0 {
            self.energy.advance(ambient_ticks);
            self.ticks_since_autosave += ambient_ticks as u64;
            if self.autosave_dirty && self.ticks_since_autosave >= AUTOSAVE_TICKS {
                self.request_save();
            }
        }

        // The depletion edge surfaces the prompt exactly once per episode.
        if self.energy.take_empty_signal() {
            self.energy_prompt_open = true;
        }

        if self.pet.frame(now_ms) {
            // Level-up completion: one callback's worth of effects.
            self.visual_events.push(VisualEvent::Evolved);
            self.haptics.impact(Intensity::Medium);
            self.request_save();
        }

        if self.screen == Screen::Catcher {
            if let Some(session) = self.catcher.as_mut() {
                let report = session.frame(now_ms, &mut self.rng);
                for _ in &report.catches {
                    self.haptics.impact(Intensity::Light);
                    if self.sound_enabled {
                        self.sound.play_click();
                    }
                }
                if report.finished {
                    self.finish_catcher_game();
                }
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyInput, now_ms: f64) {
        match self.screen {
            Screen::Pet => {
                if self.energy_prompt_open {
                    match key {
                        KeyInput::Esc => self.dispatch(actions::EMPTY_CLOSE, 0, 0, now_ms),
                        KeyInput::Char('m') => self.dispatch(actions::EMPTY_PLAY, 0, 0, now_ms),
                        _ => {}
                    }
                    return;
                }
                match key {
                    KeyInput::Char(' ') => {
                        let (col, row) = self.tap_anchor;
                        self.dispatch(actions::TAP_PET, col, row, now_ms);
                    }
                    KeyInput::Char('m') => self.dispatch(actions::OPEN_CATCHER, 0, 0, now_ms),
                    KeyInput::Char('s') => self.dispatch(actions::TOGGLE_SOUND, 0, 0, now_ms),
                    _ => {}
                }
            }
            Screen::Catcher => {
                let phase = self.catcher.as_ref().map(|c| c.phase());
                match key {
                    KeyInput::Esc => match phase {
                        Some(CatcherPhase::GameOver) => {
                            self.dispatch(actions::CATCHER_EXIT, 0, 0, now_ms)
                        }
                        _ => self.dispatch(actions::CATCHER_CLOSE, 0, 0, now_ms),
                    },
                    KeyInput::Char(' ') => match phase {
                        Some(CatcherPhase::Idle) => {
                            self.dispatch(actions::CATCHER_START, 0, 0, now_ms)
                        }
                        Some(CatcherPhase::GameOver) => {
                            self.dispatch(actions::CATCHER_RESTART, 0, 0, now_ms)
                        }
                        _ => self.dispatch(actions::CATCHER_PAUSE, 0, 0, now_ms),
                    },
                    KeyInput::Char('p') => self.dispatch(actions::CATCHER_PAUSE, 0, 0, now_ms),
                    KeyInput::Left => {
                        if let Some(c) = self.catcher.as_mut() {
                            c.nudge_basket(-BASKET_NUDGE_PCT);
                        }
                    }
                    KeyInput::Right => {
                        if let Some(c) = self.catcher.as_mut() {
                            c.nudge_basket(BASKET_NUDGE_PCT);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    /// Handle a hit-tested click action at cell `(col, row)`.
    pub fn dispatch(&mut self, action: u16, col: u16, row: u16, now_ms: f64) {
        use actions::*;
        match action {
            TAP_PET => self.tap_pet(col, row, now_ms),
            TOGGLE_SOUND => {
                self.sound_enabled = !self.sound_enabled;
                self.haptics.selection();
                self.request_save();
            }
            OPEN_CATCHER | EMPTY_PLAY => {
                self.energy_prompt_open = false;
                self.screen = Screen::Catcher;
                self.catcher = Some(CatcherSession::new());
                self.haptics.selection();
            }
            EMPTY_CLOSE => {
                // Dismissal sticks for the rest of the depletion episode; the
                // meter re-arms the prompt once energy rises above zero.
                self.energy_prompt_open = false;
                self.haptics.selection();
            }
            CATCHER_START | CATCHER_RESTART => self.start_catcher_game(now_ms),
            CATCHER_FIELD => {
                let _ = row; // the basket only tracks the pointer horizontally
                let rel = col.saturating_sub(self.field_origin_col);
                if let Some(c) = self.catcher.as_mut() {
                    c.move_basket_to(col_to_percent(rel, self.field_cols));
                }
            }
            CATCHER_PAUSE => {
                if let Some(c) = self.catcher.as_mut() {
                    c.toggle_pause(now_ms);
                    self.haptics.selection();
                }
            }
            CATCHER_CLOSE => self.close_catcher(),
            CATCHER_EXIT => {
                // Reward was applied when the game finished.
                self.catcher = None;
                self.screen = Screen::Pet;
                self.haptics.impact(Intensity::Light);
            }
            _ => {}
        }
    }

    fn tap_pet(&mut self, col: u16, row: u16, now_ms: f64) {
        match self
            .pet
            .tap(col, row, now_ms, &mut self.energy, &mut self.rng)
        {
            TapOutcome::Accepted { points, .. } => {
                self.coins += points as u64;
                self.autosave_dirty = true;
                self.haptics.impact(Intensity::Medium);
                if self.sound_enabled {
                    self.sound.play_click();
                }
            }
            TapOutcome::Rejected(TapRejection::NoEnergy) => {
                // Tapping a drained pet re-opens the prompt even after it was
                // dismissed; the player asked for it this time.
                self.energy_prompt_open = true;
            }
            TapOutcome::Rejected(TapRejection::NotActive) => {}
        }
    }

    fn start_catcher_game(&mut self, now_ms: f64) {
        let Some(session) = self.catcher.as_mut() else {
            return;
        };
        if session.phase() == CatcherPhase::Running {
            return;
        }
        if !self.quota.record_game(&self.today) {
            // Refused, not an error: the start screen shows the countdown.
            return;
        }
        self.quota_save_requested = true;
        session.start(now_ms);
        self.haptics.impact(Intensity::Medium);
    }

    /// Natural termination: apply the reward exactly once.
    fn finish_catcher_game(&mut self) {
        let Some(session) = self.catcher.as_ref() else {
            return;
        };
        let earned = session.energy_earned();
        if earned > 0 {
            self.energy.regenerate(earned as f64);
        }
        if session.score() > self.high_score {
            self.high_score = session.score();
        }
        self.visual_events.push(VisualEvent::GameOver);
        self.request_save();
    }

    /// Close mid-game (header ✕): energy accrued so far still counts; the
    /// session was already charged against the quota at start.
    fn close_catcher(&mut self) {
        if let Some(session) = self.catcher.take() {
            match session.phase() {
                CatcherPhase::Running | CatcherPhase::Paused => {
                    let earned = session.energy_earned();
                    if earned > 0 {
                        self.energy.regenerate(earned as f64);
                        self.request_save();
                    }
                }
                _ => {}
            }
        }
        self.screen = Screen::Pet;
        self.haptics.impact(Intensity::Light);
    }

    fn request_save(&mut self) {
        self.save_requested = true;
        self.autosave_dirty = false;
        self.ticks_since_autosave = 0;
    }

    /// Durable slice of the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            coins: self.coins,
            level: self.pet.level(),
            current_taps: self.pet.current_taps(),
            required_taps: self.pet.required_taps(),
            energy: self.energy.current(),
            high_score: self.high_score,
            sound_enabled: self.sound_enabled,
        }
    }

    pub fn take_save_request(&mut self) -> bool {
        std::mem::take(&mut self.save_requested)
    }

    pub fn take_quota_save_request(&mut self) -> bool {
        std::mem::take(&mut self.quota_save_requested)
    }

    /// Drain the one-shot visual triggers for the render pass.
    pub fn take_visual_events(&mut self) -> Vec<VisualEvent> {
        std::mem::take(&mut self.visual_events)
    }
}
