//! The single owned state container for a workshop session.
//!
//! Ownership is split into two regions with different lifetimes:
//!
//! - **durable**: [`RefData`] (vocabularies, templates, lock flag, notes) —
//!   the only field with a persistence path;
//! - **ephemeral**: the stage board, history ledger, undo stack, grace
//!   windows, and notification list — session-only, never serialized.
//!
//! All scheduled behavior funnels through [`Workshop::tick`]: an elapsed
//! debounce deadline fires its ledger commit, expired grace windows are
//! swept, and the periodic reminder scan runs on its cadence. Dropping the
//! workshop drops any pending deadline with it.

use crate::clock::{Clock, SystemClock};
use crate::error::WorkflowError;
use crate::grace::GraceWindows;
use crate::ledger::{Ledger, Snapshot};
use crate::model::stage::Stage;
use crate::notify::NotificationCenter;
use crate::refdata::RefData;
use crate::remote::RemoteStore;
use crate::store::StageBoard;
use crate::undo::UndoStack;
use std::sync::Arc;

/// Cadence of the periodic notification scan.
pub const SCAN_INTERVAL_MILLIS: i64 = 10_000;

/// A workshop session: board, histories, reminders, and the remote link.
#[derive(Debug)]
pub struct Workshop<R: RemoteStore> {
    pub board: StageBoard,
    pub refdata: RefData,
    pub ledger: Ledger,
    pub undo: UndoStack,
    pub notifications: NotificationCenter,
    pub grace: GraceWindows,
    pub(crate) remote: R,
    clock: Arc<dyn Clock>,
    last_scan_millis: Option<i64>,
}

impl<R: RemoteStore> Workshop<R> {
    /// Build a session on the system clock.
    pub fn new(remote: R, refdata: RefData) -> Self {
        Self::with_clock(remote, refdata, Arc::new(SystemClock))
    }

    /// Build a session with an injected clock (tests drive time manually).
    pub fn with_clock(remote: R, refdata: RefData, clock: Arc<dyn Clock>) -> Self {
        Self {
            board: StageBoard::new(),
            refdata,
            ledger: Ledger::new(),
            undo: UndoStack::new(),
            notifications: NotificationCenter::new(),
            grace: GraceWindows::new(),
            remote,
            clock,
            last_scan_millis: None,
        }
    }

    #[must_use]
    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    #[must_use]
    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn remote_mut(&mut self) -> &mut R {
        &mut self.remote
    }

    /// Pull every stage collection from the remote store.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::Hydrate`] when any fetch fails; collections fetched
    /// before the failure keep their new contents.
    pub fn hydrate(&mut self) -> Result<(), WorkflowError> {
        for stage in Stage::ALL {
            let records = self
                .remote
                .get_records(Some(stage))
                .map_err(WorkflowError::Hydrate)?;
            *self.board.collection_mut(stage) = records;
        }
        tracing::debug!(records = self.board.len(), "hydrated stage collections");
        Ok(())
    }

    /// Deep copy of the board plus the booking-status vocabulary.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            booking_statuses: self.refdata.booking_statuses.clone(),
        }
    }

    /// Record an immediate ledger commit of the current state.
    pub fn add_commit(&mut self, action: &str) {
        let now = self.now_millis();
        let snapshot = self.snapshot();
        self.ledger.add_commit(action, snapshot, now);
    }

    /// Route a noisy mutation through the debounce path.
    pub fn debounced_commit(&mut self, action: &str) {
        let now = self.now_millis();
        self.ledger.debounced_commit(action, now);
    }

    /// Drive deadline-based work; call this from the owning event loop.
    pub fn tick(&mut self) {
        let now = self.now_millis();
        if let Some(action) = self.ledger.take_due(now) {
            let snapshot = self.snapshot();
            self.ledger.add_commit(&action, snapshot, now);
        }
        self.grace.sweep(now);
        if self
            .last_scan_millis
            .is_none_or(|at| now - at >= SCAN_INTERVAL_MILLIS)
        {
            self.check_notifications();
        }
    }

    /// Reconcile reminder notifications against the board right now.
    ///
    /// Runs on the scan cadence via [`Workshop::tick`] and on demand after
    /// any reminder edit or record deletion.
    pub fn check_notifications(&mut self) -> bool {
        let now = self.now_millis();
        self.last_scan_millis = Some(now);
        self.notifications.check_notifications(&self.board, now)
    }

    /// Revert the board to the most recent undo snapshot. No-op when the
    /// undo stack is empty.
    pub fn undo(&mut self) -> bool {
        match self.undo.undo(&self.board) {
            Some(previous) => {
                self.board = previous;
                true
            }
            None => false,
        }
    }

    /// Reapply the most recently undone change. No-op when the redo stack
    /// is empty.
    pub fn redo(&mut self) -> bool {
        match self.undo.redo(&self.board) {
            Some(next) => {
                self.board = next;
                true
            }
            None => false,
        }
    }

    /// Manual checkpoint: a named ledger commit, then both session stacks
    /// are cleared. Past this point recovery goes through the ledger.
    pub fn commit_save(&mut self, action: &str) {
        self.add_commit(action);
        self.undo.clear();
    }

    /// Restore local state to a ledger commit.
    ///
    /// Remote-first: the local board and vocabulary are replaced only after
    /// the remote snapshot-restore succeeds, so local state can never
    /// desynchronize from the authoritative store. The restore itself is
    /// auditable — it records a new `"Restored to: <action>"` commit.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::CommitNotFound`] for unknown ids;
    /// [`WorkflowError::RemoteSync`] when the remote call rejects, in which
    /// case local state is untouched.
    pub fn restore_to_commit(&mut self, commit_id: &str) -> Result<(), WorkflowError> {
        let Some(commit) = self.ledger.get(commit_id) else {
            return Err(WorkflowError::CommitNotFound(commit_id.to_string()));
        };
        let action = commit.action.clone();
        let snapshot = commit.snapshot.clone();

        self.ledger.set_restoring(true);
        if let Err(err) = self.remote.restore_snapshot(&snapshot) {
            self.ledger.set_restoring(false);
            tracing::warn!(error = %err, commit = commit_id, "remote snapshot restore failed");
            return Err(WorkflowError::RemoteSync(err));
        }

        self.board = snapshot.board;
        self.refdata.booking_statuses = snapshot.booking_statuses;
        self.add_commit(&format!("Restored to: {action}"));
        self.ledger.set_restoring(false);
        tracing::info!(commit = commit_id, "restored board from ledger commit");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{SCAN_INTERVAL_MILLIS, Workshop};
    use crate::clock::ManualClock;
    use crate::error::WorkflowError;
    use crate::ledger::DEBOUNCE_MILLIS;
    use crate::model::record::{PartRecord, Reminder};
    use crate::refdata::RefData;
    use crate::remote::{MemoryRemote, RemoteError, RemoteStore};
    use crate::store::StageBoard;
    use chrono::NaiveDate;
    use std::sync::Arc;

    const T0: i64 = 1_717_243_200_000;

    fn workshop() -> (Workshop<MemoryRemote>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(T0));
        let ws = Workshop::with_clock(MemoryRemote::new(), RefData::default(), clock.clone());
        (ws, clock)
    }

    fn rec(id: &str) -> PartRecord {
        PartRecord {
            id: id.into(),
            base_id: id.trim_start_matches('p').into(),
            ..PartRecord::default()
        }
    }

    #[test]
    fn hydrate_fills_every_stage_from_remote() {
        let mut remote = MemoryRemote::new();
        remote
            .save_record(&rec("p1"), crate::model::stage::Stage::Orders)
            .unwrap();
        remote
            .save_record(&rec("p2"), crate::model::stage::Stage::Archive)
            .unwrap();

        let (mut ws, _clock) = workshop();
        ws.remote = remote;
        ws.hydrate().unwrap();

        assert_eq!(ws.board.orders.len(), 1);
        assert_eq!(ws.board.archive.len(), 1);
    }

    #[test]
    fn tick_fires_elapsed_debounce_once() {
        let (mut ws, clock) = workshop();
        ws.debounced_commit("Updated part status");

        // quiet period not yet over
        clock.advance(DEBOUNCE_MILLIS - 1);
        ws.tick();
        assert!(ws.ledger.commits().is_empty());

        clock.advance(1);
        ws.tick();
        assert_eq!(ws.ledger.commits().len(), 1);
        assert_eq!(ws.ledger.latest().unwrap().action, "Updated part status");

        ws.tick();
        assert_eq!(ws.ledger.commits().len(), 1);
    }

    #[test]
    fn tick_runs_the_scan_on_cadence() {
        let (mut ws, clock) = workshop();
        ws.board.main.push(PartRecord {
            reminder: Some(Reminder {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                time: None,
                subject: "call".into(),
            }),
            ..rec("p1")
        });

        ws.tick();
        assert_eq!(ws.notifications.items().len(), 1);

        // within the interval nothing re-scans; drop the reminder and check
        ws.board.main[0].reminder = None;
        clock.advance(SCAN_INTERVAL_MILLIS - 1);
        ws.tick();
        assert_eq!(ws.notifications.items().len(), 1);

        clock.advance(1);
        ws.tick();
        assert!(ws.notifications.items().is_empty());
    }

    #[test]
    fn undo_redo_round_trip_restores_board_exactly() {
        let (mut ws, _clock) = workshop();
        ws.board.orders.push(rec("p1"));
        let before = ws.board.clone();

        ws.undo.push(ws.board.clone());
        ws.board.orders.push(rec("p2"));
        let after = ws.board.clone();

        assert!(ws.undo());
        assert_eq!(ws.board, before);
        assert!(ws.redo());
        assert_eq!(ws.board, after);
    }

    #[test]
    fn undo_on_empty_stack_is_a_no_op() {
        let (mut ws, _clock) = workshop();
        ws.board.orders.push(rec("p1"));
        let before = ws.board.clone();
        assert!(!ws.undo());
        assert!(!ws.redo());
        assert_eq!(ws.board, before);
    }

    #[test]
    fn commit_save_clears_both_stacks_and_records_a_commit() {
        let (mut ws, _clock) = workshop();
        ws.undo.push(StageBoard::new());
        ws.undo.push(StageBoard::new());
        ws.undo();

        ws.commit_save("Manual save");
        assert_eq!(ws.undo.undo_len(), 0);
        assert_eq!(ws.undo.redo_len(), 0);
        assert_eq!(ws.ledger.latest().unwrap().action, "Manual save");
    }

    #[test]
    fn restore_is_remote_first_and_auditable() {
        let (mut ws, _clock) = workshop();
        ws.board.main.push(rec("pA"));
        ws.add_commit("X");
        let commit_id = ws.ledger.latest().unwrap().id.clone();

        ws.board.main.push(rec("pB"));
        ws.restore_to_commit(&commit_id).unwrap();

        assert_eq!(ws.board.main.len(), 1);
        assert_eq!(ws.board.main[0].id, "pA");
        assert_eq!(ws.ledger.latest().unwrap().action, "Restored to: X");
        assert_eq!(ws.remote().restore_count(), 1);
        assert!(!ws.ledger.is_restoring());
    }

    #[test]
    fn failed_remote_restore_leaves_local_state_untouched() {
        let (mut ws, _clock) = workshop();
        ws.board.main.push(rec("pA"));
        ws.add_commit("X");
        let commit_id = ws.ledger.latest().unwrap().id.clone();
        ws.board.main.push(rec("pB"));

        ws.remote_mut()
            .fail_next(RemoteError::Unavailable("store offline".into()));
        let err = ws.restore_to_commit(&commit_id).unwrap_err();

        assert!(matches!(err, WorkflowError::RemoteSync(_)));
        assert_eq!(ws.board.main.len(), 2);
        assert_eq!(ws.ledger.latest().unwrap().action, "X");
        assert!(!ws.ledger.is_restoring());
    }

    #[test]
    fn restore_of_unknown_commit_is_an_error() {
        let (mut ws, _clock) = workshop();
        assert!(matches!(
            ws.restore_to_commit("c999"),
            Err(WorkflowError::CommitNotFound(_))
        ));
    }

    #[test]
    fn snapshot_carries_the_booking_vocabulary() {
        let (mut ws, _clock) = workshop();
        ws.refdata.booking_statuses.push("Courtesy Car".into());
        let snapshot = ws.snapshot();
        assert!(
            snapshot
                .booking_statuses
                .iter()
                .any(|s| s == "Courtesy Car")
        );
    }
}
