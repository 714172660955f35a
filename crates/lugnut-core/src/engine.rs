//! Stage-transition operations.
//!
//! Every move follows one contract: collect candidates from the legal source
//! stages (unknown ids are silently ignored), push a pre-image undo snapshot
//! before mutating, transform each record (canonical status, rewritten
//! tracking id, audit-note line where applicable), splice the records into
//! the destination, issue the optimistic remote writes, and record a ledger
//! commit. Coarse moves commit immediately; field-level edits go through the
//! debounced path because they fire at UI-interaction frequency.
//!
//! Remote ordering: local state mutates first and a remote rejection only
//! logs a warning. Rapid sequential edits to one record issue independent
//! remote writes with no ordering or cancellation — last-write-wins at the
//! store. Open correctness gap, kept as-is.

use crate::error::WorkflowError;
use crate::model::record::{PartRecord, Reminder};
use crate::model::stage::Stage;
use crate::remote::RemoteStore;
use crate::validate::{self, RowIssues, Ruleset};
use crate::workshop::Workshop;
use chrono::NaiveDate;

/// Source stages per move operation, mirroring the workflow diagram:
/// Orders -> Main -> Booking / Call -> Archive, reorder flowing back.
const COMMIT_SOURCES: [Stage; 1] = [Stage::Orders];
const CALL_SOURCES: [Stage; 2] = [Stage::Main, Stage::Booking];
const ARCHIVE_SOURCES: [Stage; 3] = [Stage::Main, Stage::Booking, Stage::Call];
const REORDER_SOURCES: [Stage; 4] = [Stage::Main, Stage::Booking, Stage::Call, Stage::Archive];
const BOOKING_SOURCES: [Stage; 2] = [Stage::Main, Stage::Call];

impl<R: RemoteStore> Workshop<R> {
    /// Shared move step. Returns the ids actually moved; an empty result
    /// means every id was absent from the sources (silent no-op: no undo
    /// capture, no commit, no remote traffic).
    fn move_records<F>(
        &mut self,
        sources: &[Stage],
        dest: Stage,
        ids: &[String],
        action: &str,
        mut decorate: F,
    ) -> Vec<String>
    where
        F: FnMut(&mut PartRecord),
    {
        let present: Vec<String> = ids
            .iter()
            .filter(|id| {
                sources
                    .iter()
                    .any(|&s| self.board.collection(s).iter().any(|r| r.id == **id))
            })
            .cloned()
            .collect();
        if present.is_empty() {
            tracing::debug!(action, "transition matched no records");
            return Vec::new();
        }

        self.undo.push(self.board.clone());

        let mut moved = self.board.take_from(sources, &present);
        for record in &mut moved {
            record.status = dest.canonical_status().to_string();
            record.tracking_id = dest.tracking_id(&record.base_id);
            decorate(record);
        }
        let moved_ids: Vec<String> = moved.iter().map(|r| r.id.clone()).collect();
        // the transformed record is pushed whole so the remote copy carries
        // the rewritten tracking id and stage fields, not just the move
        for record in &moved {
            if let Err(err) = self.remote.save_record(record, dest) {
                tracing::warn!(error = %err, id = %record.id, stage = %dest, "optimistic stage write failed");
            }
        }
        self.board.collection_mut(dest).extend(moved);

        self.add_commit(action);
        tracing::debug!(action, count = moved_ids.len(), stage = %dest, "transition applied");
        moved_ids
    }

    /// Commit orders onto the main sheet.
    ///
    /// The strict ruleset gates this transition: when any candidate is
    /// incomplete, nothing moves, every failing row gets a 30 s grace
    /// window, and the error lists the incomplete fields per row. A
    /// successful commit clears any live window for the moved rows.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::Validation`] with one [`RowIssues`] per failing row.
    pub fn commit_to_main_sheet(&mut self, ids: &[String]) -> Result<Vec<String>, WorkflowError> {
        let now = self.now_millis();
        let mut rows = Vec::new();
        for id in ids {
            if let Some((Stage::Orders, record)) = self.board.find(id) {
                let missing = validate::missing_fields(record, Ruleset::Strict);
                if !missing.is_empty() {
                    rows.push(RowIssues {
                        record_id: id.clone(),
                        missing,
                    });
                }
            }
        }
        if !rows.is_empty() {
            for row in &rows {
                self.grace.trigger(&row.record_id, now);
            }
            return Err(WorkflowError::Validation { rows });
        }

        let moved = self.move_records(
            &COMMIT_SOURCES,
            Stage::Main,
            ids,
            "Committed to main sheet",
            |_| {},
        );
        for id in &moved {
            self.grace.clear(id);
        }
        Ok(moved)
    }

    /// Move records onto the call list.
    pub fn send_to_call_list(&mut self, ids: &[String]) -> Vec<String> {
        self.move_records(&CALL_SOURCES, Stage::Call, ids, "Sent to call list", |_| {})
    }

    /// Archive records, optionally appending a `"<reason> #archive"` audit
    /// line. An empty or whitespace-only reason leaves the note untouched.
    pub fn send_to_archive(&mut self, ids: &[String], reason: Option<&str>) -> Vec<String> {
        let now = self.now_millis();
        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(String::from);
        self.move_records(
            &ARCHIVE_SOURCES,
            Stage::Archive,
            ids,
            "Sent to archive",
            move |record| {
                record.archived_at = Some(now);
                if let Some(text) = &reason {
                    record.archive_reason = Some(text.clone());
                    record.append_action_note(text, Stage::Archive.tag());
                }
            },
        )
    }

    /// Send records back to Orders for reordering.
    ///
    /// Reorder resets booking context: `booking_date` and `booking_note`
    /// are cleared on the moved records.
    pub fn send_to_reorder(&mut self, ids: &[String], reason: &str) -> Vec<String> {
        self.move_records(
            &REORDER_SOURCES,
            Stage::Orders,
            ids,
            "Sent to reorder",
            |record| {
                record.booking_date = None;
                record.booking_note = None;
                record.append_action_note(reason, "reorder");
            },
        )
    }

    /// Book records in for fitting on `date`.
    pub fn send_to_booking(
        &mut self,
        ids: &[String],
        date: NaiveDate,
        note: Option<&str>,
        status: Option<&str>,
    ) -> Vec<String> {
        let booking_status = status
            .unwrap_or(Stage::Booking.canonical_status())
            .to_string();
        let note = note.map(String::from);
        self.move_records(
            &BOOKING_SOURCES,
            Stage::Booking,
            ids,
            "Sent to booking",
            move |record| {
                record.booking_date = Some(date);
                record.booking_note = note.clone();
                record.booking_status = Some(booking_status.clone());
            },
        )
    }

    /// Set a record's part status wherever it lives. Debounced commit path.
    pub fn update_part_status(&mut self, id: &str, status: &str) -> bool {
        if !self.board.contains(id) {
            return false;
        }
        self.undo.push(self.board.clone());
        let Some((stage, record)) = self.board.find_mut(id) else {
            return false;
        };
        record.status = status.to_string();
        let updated = record.clone();
        if let Err(err) = self.remote.save_record(&updated, stage) {
            tracing::warn!(error = %err, id, "optimistic record save failed");
        }
        self.debounced_commit("Updated part status");
        true
    }

    /// Set the booking status of a record currently in Booking. Records in
    /// other stages are a silent no-op. Debounced commit path.
    pub fn update_booking_status(&mut self, id: &str, status: &str) -> bool {
        if self.board.stage_of(id) != Some(Stage::Booking) {
            return false;
        }
        self.undo.push(self.board.clone());
        let Some((stage, record)) = self.board.find_mut(id) else {
            return false;
        };
        record.booking_status = Some(status.to_string());
        let updated = record.clone();
        if let Err(err) = self.remote.save_record(&updated, stage) {
            tracing::warn!(error = %err, id, "optimistic record save failed");
        }
        self.debounced_commit("Updated booking status");
        true
    }

    /// Set or clear a record's reminder, then reconcile notifications
    /// immediately.
    pub fn set_reminder(&mut self, id: &str, reminder: Option<Reminder>) -> bool {
        if !self.board.contains(id) {
            return false;
        }
        self.undo.push(self.board.clone());
        let Some((stage, record)) = self.board.find_mut(id) else {
            return false;
        };
        record.reminder = reminder;
        let updated = record.clone();
        if let Err(err) = self.remote.save_record(&updated, stage) {
            tracing::warn!(error = %err, id, "optimistic record save failed");
        }
        self.debounced_commit("Updated reminder");
        self.check_notifications();
        true
    }

    /// Create a new order. Relaxed validation; duplicate ids are rejected.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::Validation`] when required fields are empty;
    /// [`WorkflowError::DuplicateRecord`] when the id is already on the
    /// board.
    pub fn add_order(&mut self, mut record: PartRecord) -> Result<String, WorkflowError> {
        let missing = validate::missing_fields(&record, Ruleset::Relaxed);
        if !missing.is_empty() {
            return Err(WorkflowError::Validation {
                rows: vec![RowIssues {
                    record_id: record.id.clone(),
                    missing,
                }],
            });
        }
        if self.board.contains(&record.id) {
            return Err(WorkflowError::DuplicateRecord(record.id));
        }

        self.undo.push(self.board.clone());
        record.tracking_id = Stage::Orders.tracking_id(&record.base_id);
        if record.status.trim().is_empty() {
            record.status = Stage::Orders.canonical_status().to_string();
        }
        if let Err(err) = self.remote.save_record(&record, Stage::Orders) {
            tracing::warn!(error = %err, id = %record.id, "optimistic record save failed");
        }
        let id = record.id.clone();
        self.board.orders.push(record);
        self.add_commit("Added order");
        Ok(id)
    }

    /// Delete records from any stage. Unknown ids are silently ignored; the
    /// reconciler runs immediately so a deleted record's due reminder drops
    /// out of the notification list.
    pub fn delete_records(&mut self, ids: &[String]) -> Vec<String> {
        let present: Vec<String> = ids
            .iter()
            .filter(|id| self.board.contains(id.as_str()))
            .cloned()
            .collect();
        if present.is_empty() {
            return Vec::new();
        }

        self.undo.push(self.board.clone());
        let removed = self.board.take_from(&Stage::ALL, &present);
        for record in &removed {
            if let Err(err) = self.remote.delete_record(&record.id) {
                tracing::warn!(error = %err, id = %record.id, "optimistic record delete failed");
            }
        }
        self.add_commit("Deleted records");
        self.check_notifications();
        removed.into_iter().map(|r| r.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::clock::{Clock, ManualClock};
    use crate::error::WorkflowError;
    use crate::model::record::{PartRecord, Reminder};
    use crate::model::stage::Stage;
    use crate::refdata::RefData;
    use crate::remote::MemoryRemote;
    use crate::workshop::Workshop;
    use chrono::NaiveDate;
    use std::sync::Arc;

    const T0: i64 = 1_717_243_200_000;

    fn complete(id: &str, base_id: &str) -> PartRecord {
        PartRecord {
            id: id.into(),
            base_id: base_id.into(),
            customer: "D. Okafor".into(),
            phone: "07700 900123".into(),
            vehicle: "Astra J".into(),
            registration: "AB12 CDE".into(),
            part_name: "Front brake discs".into(),
            status: "Ordered".into(),
            ..PartRecord::default()
        }
    }

    fn workshop() -> (Workshop<MemoryRemote>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(T0));
        let ws = Workshop::with_clock(MemoryRemote::new(), RefData::default(), clock.clone());
        (ws, clock)
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn commit_moves_order_with_canonical_status_and_tracking_id() {
        let (mut ws, _clock) = workshop();
        ws.add_order(complete("o1", "123")).unwrap();

        let moved = ws.commit_to_main_sheet(&ids(&["o1"])).unwrap();
        assert_eq!(moved, ["o1"]);
        assert!(ws.board.orders.is_empty());

        let record = &ws.board.main[0];
        assert_eq!(record.tracking_id, "MAIN-123");
        assert_eq!(record.status, "Pending");
        assert_eq!(ws.remote().board().stage_of("o1"), Some(Stage::Main));
    }

    #[test]
    fn unknown_ids_are_a_silent_noop() {
        let (mut ws, _clock) = workshop();
        ws.add_order(complete("o1", "123")).unwrap();
        let undo_before = ws.undo.undo_len();
        let commits_before = ws.ledger.commits().len();

        let moved = ws.send_to_call_list(&ids(&["ghost"]));
        assert!(moved.is_empty());
        assert_eq!(ws.undo.undo_len(), undo_before);
        assert_eq!(ws.ledger.commits().len(), commits_before);
        assert_eq!(ws.board.len(), 1);
    }

    #[test]
    fn archive_appends_reason_line_and_stamps_archived_at() {
        let (mut ws, _clock) = workshop();
        ws.add_order(complete("o1", "123")).unwrap();
        ws.commit_to_main_sheet(&ids(&["o1"])).unwrap();
        ws.board.main[0].action_note = "foo".into();

        ws.send_to_archive(&ids(&["o1"]), Some("Completed"));
        let record = &ws.board.archive[0];
        assert_eq!(record.action_note, "foo\nCompleted #archive");
        assert_eq!(record.archive_reason.as_deref(), Some("Completed"));
        assert_eq!(record.archived_at, Some(T0));
        assert_eq!(record.tracking_id, "ARCH-123");
        assert_eq!(record.status, "Archived");
    }

    #[test]
    fn archive_with_empty_reason_leaves_note_untouched() {
        let (mut ws, _clock) = workshop();
        ws.add_order(complete("o1", "123")).unwrap();
        ws.commit_to_main_sheet(&ids(&["o1"])).unwrap();
        ws.board.main[0].action_note = "foo".into();

        ws.send_to_archive(&ids(&["o1"]), Some("   "));
        let record = &ws.board.archive[0];
        assert_eq!(record.action_note, "foo");
        assert!(record.archive_reason.is_none());

        ws.send_to_reorder(&ids(&["o1"]), "supplier sent wrong part");
        assert_eq!(
            ws.board.orders[0].action_note,
            "foo\nsupplier sent wrong part #reorder"
        );
    }

    #[test]
    fn reorder_clears_booking_context() {
        let (mut ws, _clock) = workshop();
        ws.add_order(complete("o1", "123")).unwrap();
        ws.commit_to_main_sheet(&ids(&["o1"])).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        ws.send_to_booking(&ids(&["o1"]), date, Some("am slot"), None);

        let booked = &ws.board.booking[0];
        assert_eq!(booked.booking_date, Some(date));
        assert_eq!(booked.booking_note.as_deref(), Some("am slot"));
        assert_eq!(booked.booking_status.as_deref(), Some("Booked"));
        assert_eq!(booked.tracking_id, "BOOK-123");

        ws.send_to_reorder(&ids(&["o1"]), "damaged in transit");
        let reordered = &ws.board.orders[0];
        assert!(reordered.booking_date.is_none());
        assert!(reordered.booking_note.is_none());
        assert_eq!(reordered.tracking_id, "ORD-123");
        assert_eq!(reordered.status, "Ordered");
    }

    #[test]
    fn call_list_pulls_from_main_and_booking() {
        let (mut ws, _clock) = workshop();
        ws.add_order(complete("o1", "1")).unwrap();
        ws.add_order(complete("o2", "2")).unwrap();
        ws.commit_to_main_sheet(&ids(&["o1", "o2"])).unwrap();
        ws.send_to_booking(
            &ids(&["o2"]),
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            None,
            None,
        );

        let moved = ws.send_to_call_list(&ids(&["o1", "o2"]));
        assert_eq!(moved.len(), 2);
        assert_eq!(ws.board.call.len(), 2);
        assert!(ws.board.main.is_empty());
        assert!(ws.board.booking.is_empty());
        assert!(ws.board.call.iter().all(|r| r.status == "Awaiting Call"));
    }

    #[test]
    fn strict_gate_blocks_commit_and_opens_grace_windows() {
        let (mut ws, clock) = workshop();
        let mut incomplete = complete("o1", "123");
        incomplete.customer.clear();
        incomplete.phone.clear();
        ws.add_order(incomplete).unwrap();
        ws.add_order(complete("o2", "456")).unwrap();

        let err = ws.commit_to_main_sheet(&ids(&["o1", "o2"])).unwrap_err();
        let WorkflowError::Validation { rows } = err else {
            panic!("expected validation error");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record_id, "o1");
        assert_eq!(rows[0].missing, ["customer", "phone"]);

        // nothing moved, and the failing row has a live grace window
        assert_eq!(ws.board.orders.len(), 2);
        assert!(ws.board.main.is_empty());
        assert_eq!(ws.grace.remaining_secs("o1", clock.now_millis()), 30);
        assert!(!ws.grace.is_active("o2", clock.now_millis()));

        // completing the fields and resubmitting clears the window
        clock.advance(10_000);
        if let Some((_, record)) = ws.board.find_mut("o1") {
            record.customer = "D. Okafor".into();
            record.phone = "07700 900123".into();
        }
        ws.commit_to_main_sheet(&ids(&["o1", "o2"])).unwrap();
        assert!(!ws.grace.is_active("o1", clock.now_millis()));
        assert_eq!(ws.board.main.len(), 2);
    }

    #[test]
    fn field_updates_use_the_debounced_commit_path() {
        let (mut ws, clock) = workshop();
        ws.add_order(complete("o1", "123")).unwrap();
        let commits_before = ws.ledger.commits().len();

        assert!(ws.update_part_status("o1", "Arrived"));
        assert_eq!(ws.board.orders[0].status, "Arrived");
        assert_eq!(ws.ledger.commits().len(), commits_before);
        assert_eq!(ws.ledger.pending_action(), Some("Updated part status"));

        clock.advance(1_000);
        ws.tick();
        assert_eq!(ws.ledger.commits().len(), commits_before + 1);
    }

    #[test]
    fn booking_status_update_requires_booking_stage() {
        let (mut ws, _clock) = workshop();
        ws.add_order(complete("o1", "123")).unwrap();
        assert!(!ws.update_booking_status("o1", "Confirmed"));

        ws.commit_to_main_sheet(&ids(&["o1"])).unwrap();
        ws.send_to_booking(
            &ids(&["o1"]),
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            None,
            None,
        );
        assert!(ws.update_booking_status("o1", "Confirmed"));
        assert_eq!(
            ws.board.booking[0].booking_status.as_deref(),
            Some("Confirmed")
        );
    }

    #[test]
    fn set_reminder_reconciles_immediately() {
        let (mut ws, _clock) = workshop();
        ws.add_order(complete("o1", "123")).unwrap();

        assert!(ws.set_reminder(
            "o1",
            Some(Reminder {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                time: None,
                subject: "call customer".into(),
            }),
        ));
        assert_eq!(ws.notifications.items().len(), 1);

        assert!(ws.set_reminder("o1", None));
        assert!(ws.notifications.items().is_empty());
    }

    #[test]
    fn delete_drops_records_and_their_notifications() {
        let (mut ws, _clock) = workshop();
        ws.add_order(complete("o1", "123")).unwrap();
        ws.set_reminder(
            "o1",
            Some(Reminder {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                time: None,
                subject: "call".into(),
            }),
        );
        assert_eq!(ws.notifications.items().len(), 1);

        let removed = ws.delete_records(&ids(&["o1", "ghost"]));
        assert_eq!(removed, ["o1"]);
        assert!(ws.board.is_empty());
        assert!(ws.notifications.items().is_empty());
        assert!(ws.remote().board().is_empty());
    }

    #[test]
    fn add_order_rejects_duplicates_and_incomplete_records() {
        let (mut ws, _clock) = workshop();
        ws.add_order(complete("o1", "123")).unwrap();
        assert!(matches!(
            ws.add_order(complete("o1", "456")),
            Err(WorkflowError::DuplicateRecord(_))
        ));

        let blank = PartRecord::default();
        assert!(matches!(
            ws.add_order(blank),
            Err(WorkflowError::Validation { .. })
        ));
        assert_eq!(ws.board.len(), 1);
    }

    #[test]
    fn every_mutation_is_undoable_in_sequence() {
        let (mut ws, _clock) = workshop();
        ws.add_order(complete("o1", "123")).unwrap();
        ws.commit_to_main_sheet(&ids(&["o1"])).unwrap();
        ws.send_to_archive(&ids(&["o1"]), Some("done"));
        assert_eq!(ws.undo.undo_len(), 3);

        ws.undo();
        assert_eq!(ws.board.stage_of("o1"), Some(Stage::Main));
        ws.undo();
        assert_eq!(ws.board.stage_of("o1"), Some(Stage::Orders));
        ws.undo();
        assert_eq!(ws.board.stage_of("o1"), None);
        ws.redo();
        assert_eq!(ws.board.stage_of("o1"), Some(Stage::Orders));
    }
}
