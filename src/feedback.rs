//! Optional haptic/sound capabilities behind no-op-able seams.
//!
//! The embedding chat platform may expose a haptic bridge on the global
//! object, and the browser may or may not allow audio playback. Both are
//! modeled as traits with a no-op implementation selected at construction, so
//! call sites never branch on presence and a missing or failing capability
//! can never interrupt gameplay.
//!
//! Bridge access goes through `js_sys::Reflect` rather than typed bindings:
//! the haptic object is an injected platform global, not a web standard.

use js_sys::Reflect;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intensity {
    Light,
    Medium,
}

impl Intensity {
    /// Style label understood by the platform bridge.
    pub fn label(self) -> &'static str {
        match self {
            Intensity::Light => "light",
            Intensity::Medium => "medium",
        }
    }
}

pub trait Haptics {
    fn impact(&self, intensity: Intensity);
    fn selection(&self);
}

pub trait SoundCue {
    fn play_click(&self);
}

/// Selected when no bridge capability is present. Never fails, does nothing.
pub struct NoopHaptics;

impl Haptics for NoopHaptics {
    fn impact(&self, _intensity: Intensity) {}
    fn selection(&self) {}
}

pub struct NoopSound;

impl SoundCue for NoopSound {
    fn play_click(&self) {}
}

/// Haptic feedback through the chat platform's injected `HapticFeedback`
/// object (`Telegram.WebApp.HapticFeedback`).
pub struct BridgeHaptics {
    target: js_sys::Object,
    impact_fn: js_sys::Function,
    selection_fn: js_sys::Function,
}

impl BridgeHaptics {
    /// Probe the global object for the bridge. `None` when the app runs
    /// outside the platform webview.
    pub fn detect() -> Option<Self> {
        let tg = Reflect::get(&js_sys::global(), &"Telegram".into()).ok()?;
        let webapp = Reflect::get(&tg, &"WebApp".into()).ok()?;
        let haptic = Reflect::get(&webapp, &"HapticFeedback".into()).ok()?;
        if !haptic.is_object() {
            return None;
        }
        let impact_fn = Reflect::get(&haptic, &"impactOccurred".into()).ok()?;
        let selection_fn = Reflect::get(&haptic, &"selectionChanged".into()).ok()?;
        if !impact_fn.is_function() || !selection_fn.is_function() {
            return None;
        }
        Some(Self {
            target: haptic.into(),
            impact_fn: impact_fn.into(),
            selection_fn: selection_fn.into(),
        })
    }
}

impl Haptics for BridgeHaptics {
    fn impact(&self, intensity: Intensity) {
        // A rejected bridge call degrades to silence.
        let _ = self.impact_fn.call1(&self.target, &intensity.label().into());
    }

    fn selection(&self) {
        let _ = self.selection_fn.call0(&self.target);
    }
}

/// Click sound through a DOM `Audio` element, constructed reflectively.
/// Construction failure (no `Audio` in scope, bad source) selects the no-op
/// path instead; playback rejections are dropped.
pub struct BridgeSound {
    element: js_sys::Object,
    play_fn: js_sys::Function,
}

impl BridgeSound {
    pub fn detect(src: &str) -> Option<Self> {
        let ctor = Reflect::get(&js_sys::global(), &"Audio".into()).ok()?;
        if !ctor.is_function() {
            return None;
        }
        let ctor: js_sys::Function = ctor.into();
        let args = js_sys::Array::of1(&src.into());
        let element = Reflect::construct(&ctor, &args).ok()?;
        let play_fn = Reflect::get(&element, &"play".into()).ok()?;
        if !play_fn.is_function() {
            return None;
        }
        Some(Self {
            element: element.into(),
            play_fn: play_fn.into(),
        })
    }
}

impl SoundCue for BridgeSound {
    fn play_click(&self) {
        // Rewind so rapid taps retrigger from the start; ignore the returned
        // promise; autoplay policy rejections must not surface.
        let _ = Reflect::set(&self.element, &"currentTime".into(), &0.0.into());
        let _ = self.play_fn.call0(&self.element);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_haptics_never_fail() {
        let h = NoopHaptics;
        h.impact(Intensity::Light);
        h.impact(Intensity::Medium);
        h.selection();
    }

    #[test]
    fn noop_sound_never_fails() {
        NoopSound.play_click();
    }

    #[test]
    fn intensity_labels_match_bridge_api() {
        assert_eq!(Intensity::Light.label(), "light");
        assert_eq!(Intensity::Medium.label(), "medium");
    }
}
