//! localStorage persistence and browser environment helpers.
//!
//! The remote backend is authoritative for long-term progress; within this
//! slice localStorage is the only durable copy. A `Snapshot` is loaded once
//! at startup and written back at explicit reconciliation points (level-up,
//! mini-game end, depletion edge, coarse autosave). Every read failure falls
//! back to defaults, every write failure is logged to the console and
//! dropped; no retries in this slice.

use serde::{Deserialize, Serialize};

use crate::energy::ENERGY_MAX;
use crate::pet::FIRST_LEVEL_TAPS;
use crate::quota::QuotaRecord;

const SNAPSHOT_KEY: &str = "critter-tap/save";
const QUOTA_KEY: &str = "critter-tap/quota";

/// Durable slice of app state.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub coins: u64,
    pub level: u32,
    pub current_taps: u32,
    pub required_taps: u32,
    pub energy: f64,
    pub high_score: u32,
    pub sound_enabled: bool,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            coins: 0,
            level: 1,
            current_taps: 0,
            required_taps: FIRST_LEVEL_TAPS,
            energy: ENERGY_MAX as f64,
            high_score: 0,
            sound_enabled: true,
        }
    }
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

fn warn(context: &str) {
    web_sys::console::warn_1(&format!("storage: {context}").into());
}

fn load_json<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let raw = local_storage()?.get_item(key).ok()??;
    match serde_json::from_str(&raw) {
        Ok(v) => Some(v),
        Err(_) => {
            warn("discarding unreadable record");
            None
        }
    }
}

fn save_json<T: Serialize>(key: &str, value: &T) {
    let Some(store) = local_storage() else {
        warn("localStorage unavailable, progress will not survive reload");
        return;
    };
    match serde_json::to_string(value) {
        Ok(json) => {
            if store.set_item(key, &json).is_err() {
                warn("write rejected");
            }
        }
        Err(_) => warn("serialize failed"),
    }
}

pub fn load_snapshot() -> Snapshot {
    load_json(SNAPSHOT_KEY).unwrap_or_default()
}

pub fn save_snapshot(snapshot: &Snapshot) {
    save_json(SNAPSHOT_KEY, snapshot);
}

pub fn load_quota() -> Option<QuotaRecord> {
    load_json(QUOTA_KEY)
}

pub fn save_quota(record: &QuotaRecord) {
    save_json(QUOTA_KEY, record);
}

/// Local calendar day, `YYYY-MM-DD`, used as the quota reset key.
pub fn local_day_key() -> String {
    let date = js_sys::Date::new_0();
    format!(
        "{:04}-{:02}-{:02}",
        date.get_full_year(),
        date.get_month() + 1,
        date.get_date()
    )
}

/// Seconds remaining until the next local midnight (quota reset).
pub fn seconds_until_local_midnight() -> u32 {
    let date = js_sys::Date::new_0();
    let elapsed = date.get_hours() * 3600 + date.get_minutes() * 60 + date.get_seconds();
    24 * 3600 - elapsed
}
