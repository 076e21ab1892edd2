//! Daily play quota for the mini-game.
//!
//! A persisted counter of games played on the current local day. The record
//! is keyed by a `YYYY-MM-DD` day string supplied by the caller (see
//! `storage::local_day_key`); when the key changes the counter resets. While
//! the limit is exhausted, starting a session is refused and the UI shows a
//! countdown to the next local midnight.

use serde::{Deserialize, Serialize};

/// Mini-game sessions allowed per local day.
pub const DAILY_LIMIT: u32 = 3;

/// The persisted shape, stored as JSON in localStorage.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuotaRecord {
    pub day_key: String,
    pub games_played: u32,
}

pub struct DailyQuota {
    record: QuotaRecord,
    limit: u32,
}

impl DailyQuota {
    /// Build from a persisted record (if any), synced to today.
    pub fn new(record: Option<QuotaRecord>, today: &str) -> Self {
        let mut quota = Self {
            record: record.unwrap_or_else(|| QuotaRecord {
                day_key: today.to_string(),
                games_played: 0,
            }),
            limit: DAILY_LIMIT,
        };
        quota.sync(today);
        quota
    }

    /// Reset the counter when the local day has rolled over.
    pub fn sync(&mut self, today: &str) {
        if self.record.day_key != today {
            self.record.day_key = today.to_string();
            self.record.games_played = 0;
        }
    }

    pub fn can_play(&self) -> bool {
        self.record.games_played < self.limit
    }

    pub fn games_played(&self) -> u32 {
        self.record.games_played
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.record.games_played)
    }

    /// Count one session against today's quota. Returns `false` (and counts
    /// nothing) when the limit is already reached.
    pub fn record_game(&mut self, today: &str) -> bool {
        self.sync(today);
        if !self.can_play() {
            return false;
        }
        self.record.games_played += 1;
        true
    }

    /// The record to persist.
    pub fn record(&self) -> &QuotaRecord {
        &self.record
    }
}

/// Format a countdown to quota reset as `ЧЧ:ММ:СС`.
pub fn format_countdown(secs: u32) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_quota_allows_limit_games() {
        let mut q = DailyQuota::new(None, "2025-06-01");
        for _ in 0..DAILY_LIMIT {
            assert!(q.can_play());
            assert!(q.record_game("2025-06-01"));
        }
        assert!(!q.can_play());
        assert!(!q.record_game("2025-06-01"));
        assert_eq!(q.games_played(), DAILY_LIMIT);
        assert_eq!(q.remaining(), 0);
    }

    #[test]
    fn day_rollover_resets_counter() {
        let mut q = DailyQuota::new(None, "2025-06-01");
        while q.record_game("2025-06-01") {}
        assert!(!q.can_play());

        q.sync("2025-06-02");
        assert!(q.can_play());
        assert_eq!(q.games_played(), 0);
    }

    #[test]
    fn record_game_syncs_day_itself() {
        let mut q = DailyQuota::new(None, "2025-06-01");
        while q.record_game("2025-06-01") {}

        // A start attempt on the next day succeeds without an explicit sync
        assert!(q.record_game("2025-06-02"));
        assert_eq!(q.games_played(), 1);
    }

    #[test]
    fn stale_persisted_record_is_reset() {
        let stale = QuotaRecord {
            day_key: "2025-05-31".into(),
            games_played: 3,
        };
        let q = DailyQuota::new(Some(stale), "2025-06-01");
        assert!(q.can_play());
        assert_eq!(q.games_played(), 0);
    }

    #[test]
    fn persisted_record_from_today_is_kept() {
        let rec = QuotaRecord {
            day_key: "2025-06-01".into(),
            games_played: 2,
        };
        let q = DailyQuota::new(Some(rec), "2025-06-01");
        assert_eq!(q.games_played(), 2);
        assert_eq!(q.remaining(), 1);
    }

    #[test]
    fn countdown_formatting() {
        assert_eq!(format_countdown(0), "00:00:00");
        assert_eq!(format_countdown(59), "00:00:59");
        assert_eq!(format_countdown(61), "00:01:01");
        assert_eq!(format_countdown(3 * 3600 + 25 * 60 + 7), "03:25:07");
        assert_eq!(format_countdown(24 * 3600 - 1), "23:59:59");
    }

    #[test]
    fn record_round_trips_through_json() {
        let mut q = DailyQuota::new(None, "2025-06-01");
        q.record_game("2025-06-01");
        let json = serde_json::to_string(q.record()).unwrap();
        let back: QuotaRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, q.record());
    }
}
