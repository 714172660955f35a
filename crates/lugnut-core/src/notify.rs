//! Notification list and the reminder-due reconciler.
//!
//! Reminder notifications are derived, never authored: each reconciliation
//! pass scans the stage board for due reminders and rebuilds the
//! reminder-kind subset of the list to exactly match. A rescheduled or
//! deleted reminder must drop out of the list, which an append-only strategy
//! cannot do — the rebuild is what guarantees removal. Notifications of
//! other kinds pass through untouched.
//!
//! Identity for deduplication is the `(reference_id, description)` pair, not
//! the notification's own id: a matched pair keeps its existing entry, so
//! `is_read` state and the original timestamp survive re-reconciliation.

use crate::model::record::{PartRecord, Reminder};
use crate::model::stage::Stage;
use crate::store::StageBoard;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Kinds of notification held by the center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Derived from a record's reminder becoming due.
    Reminder,
    /// Authored directly through the pass-through mutators.
    System,
}

/// One entry in the notification list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    /// Id of the record this notification refers to.
    pub reference_id: String,
    /// Stage holding the source record at derivation time.
    pub stage: Option<Stage>,
    pub description: String,
    pub at_millis: i64,
    pub is_read: bool,
}

/// A reminder that is currently due, derived from a board scan.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DueReminder {
    reference_id: String,
    stage: Stage,
    description: String,
}

/// The notification list plus the reconciler.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    items: Vec<Notification>,
    next_id: u64,
}

impl NotificationCenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.is_read).count()
    }

    /// Pass-through: append a notification as-is.
    pub fn add(&mut self, notification: Notification) {
        self.items.push(notification);
    }

    /// Pass-through: mark one notification read. Returns false for unknown ids.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.is_read = true;
                true
            }
            None => false,
        }
    }

    /// Pass-through: remove one notification. Returns false for unknown ids.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// Pass-through: drop everything.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn mint_id(&mut self) -> String {
        self.next_id += 1;
        format!("ntf-{}", self.next_id)
    }

    /// Rebuild the reminder subset to exactly match what is currently due.
    ///
    /// Returns true when the list changed; an unchanged membership skips the
    /// write entirely so downstream consumers see no spurious update.
    pub fn check_notifications(&mut self, board: &StageBoard, now_millis: i64) -> bool {
        let due = due_reminders(board, now_millis);

        let mut rebuilt = Vec::with_capacity(due.len());
        for descriptor in &due {
            let existing = self.items.iter().position(|n| {
                n.kind == NotificationKind::Reminder
                    && n.reference_id == descriptor.reference_id
                    && n.description == descriptor.description
            });
            if let Some(index) = existing {
                rebuilt.push(self.items[index].clone());
            } else {
                let id = self.mint_id();
                rebuilt.push(Notification {
                    id,
                    kind: NotificationKind::Reminder,
                    reference_id: descriptor.reference_id.clone(),
                    stage: Some(descriptor.stage),
                    description: descriptor.description.clone(),
                    at_millis: now_millis,
                    is_read: false,
                });
            }
        }

        let current: Vec<&Notification> = self
            .items
            .iter()
            .filter(|n| n.kind == NotificationKind::Reminder)
            .collect();
        let unchanged = current.len() == rebuilt.len()
            && rebuilt.iter().all(|n| {
                current
                    .iter()
                    .any(|c| c.reference_id == n.reference_id && c.description == n.description)
            });
        if unchanged {
            return false;
        }

        tracing::debug!(due = rebuilt.len(), "reminder notifications reconciled");
        self.items.retain(|n| n.kind != NotificationKind::Reminder);
        self.items.extend(rebuilt);
        true
    }
}

fn due_reminders(board: &StageBoard, now_millis: i64) -> Vec<DueReminder> {
    board
        .all_records()
        .filter_map(|(stage, record)| {
            let reminder = record.reminder.as_ref()?;
            (now_millis >= reminder.due_millis()).then(|| DueReminder {
                reference_id: record.id.clone(),
                stage,
                description: describe(record, reminder),
            })
        })
        .collect()
}

/// Human-facing reminder line embedding date, time, customer, and subject.
fn describe(record: &PartRecord, reminder: &Reminder) -> String {
    let time = reminder.time.unwrap_or(NaiveTime::MIN);
    format!(
        "Reminder {} {} for {}: {}",
        reminder.date,
        time.format("%H:%M"),
        record.customer,
        reminder.subject
    )
}
