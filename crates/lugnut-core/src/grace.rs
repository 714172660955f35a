//! Per-record strict-validation grace windows ("beast mode").
//!
//! When the strict commit gate rejects a record, the record enters a 30 s
//! grace window during which its incomplete fields stay highlighted. Only the
//! trigger instant is stored; the remaining time is derived on every read, so
//! closing and reopening an edit surface cannot reset the deadline. Any
//! number of records may hold live windows at once.

use std::collections::HashMap;

/// Grace window length in seconds.
pub const GRACE_SECS: i64 = 30;

/// Map from record id to trigger instant (epoch millis).
#[derive(Debug, Default)]
pub struct GraceWindows {
    triggers: HashMap<String, i64>,
}

impl GraceWindows {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the window for `id`.
    pub fn trigger(&mut self, id: &str, now_millis: i64) {
        self.triggers.insert(id.to_string(), now_millis);
    }

    /// Seconds of grace left for `id`; 0 when expired or never triggered.
    #[must_use]
    pub fn remaining_secs(&self, id: &str, now_millis: i64) -> i64 {
        self.triggers
            .get(id)
            .map_or(0, |&at| (GRACE_SECS - (now_millis - at) / 1_000).max(0))
    }

    /// True while the window for `id` is still running.
    #[must_use]
    pub fn is_active(&self, id: &str, now_millis: i64) -> bool {
        self.remaining_secs(id, now_millis) > 0
    }

    /// Drop the window for `id` (successful resubmission).
    pub fn clear(&mut self, id: &str) {
        self.triggers.remove(id);
    }

    /// Drop every fully elapsed window.
    pub fn sweep(&mut self, now_millis: i64) {
        self.triggers
            .retain(|_, &mut at| now_millis - at < GRACE_SECS * 1_000);
    }

    /// Ids with a live window.
    #[must_use]
    pub fn active_ids(&self, now_millis: i64) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .triggers
            .iter()
            .filter(|&(_, &at)| now_millis - at < GRACE_SECS * 1_000)
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}
