use chrono::{NaiveTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Optional due-date reminder attached to a record.
///
/// The reminder itself carries no notification state; the notification
/// reconciler derives due notifications from it on every scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub date: NaiveDate,
    /// Missing time means midnight.
    #[serde(default)]
    pub time: Option<NaiveTime>,
    pub subject: String,
}

impl Reminder {
    /// Epoch milliseconds (UTC) at which this reminder becomes due.
    #[must_use]
    pub fn due_millis(&self) -> i64 {
        let time = self.time.unwrap_or(NaiveTime::MIN);
        self.date.and_time(time).and_utc().timestamp_millis()
    }
}

/// All fields of a part order record (the store-level aggregate).
///
/// `status` is a plain string because the vocabularies are user-editable
/// reference data, not a closed enum. `action_note` is an additive audit
/// trail: transitions append `"<text> #<tag>"` lines and never overwrite
/// prior content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartRecord {
    pub id: String,
    /// Stable identity the stage-prefixed tracking id is derived from.
    pub base_id: String,
    pub tracking_id: String,
    pub customer: String,
    pub phone: String,
    pub vehicle: String,
    pub registration: String,
    pub part_name: String,
    pub part_number: String,
    pub status: String,
    pub booking_date: Option<NaiveDate>,
    pub booking_note: Option<String>,
    pub booking_status: Option<String>,
    pub archive_reason: Option<String>,
    /// Epoch millis of the archive transition.
    pub archived_at: Option<i64>,
    pub action_note: String,
    pub reminder: Option<Reminder>,
}

impl Default for PartRecord {
    fn default() -> Self {
        Self {
            id: String::new(),
            base_id: String::new(),
            tracking_id: String::new(),
            customer: String::new(),
            phone: String::new(),
            vehicle: String::new(),
            registration: String::new(),
            part_name: String::new(),
            part_number: String::new(),
            status: String::new(),
            booking_date: None,
            booking_note: None,
            booking_status: None,
            archive_reason: None,
            archived_at: None,
            action_note: String::new(),
            reminder: None,
        }
    }
}

impl PartRecord {
    /// Append one `"<text> #<tag>"` audit line to `action_note`.
    ///
    /// Whitespace-only text is a no-op. Lines are joined by `\n`; existing
    /// content is never overwritten. Collaborators substring-match on the
    /// `#<tag>` suffix, so the format must stay exactly as written.
    pub fn append_action_note(&mut self, text: &str, tag: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        if !self.action_note.is_empty() {
            self.action_note.push('\n');
        }
        self.action_note.push_str(trimmed);
        self.action_note.push_str(" #");
        self.action_note.push_str(tag);
    }
}
