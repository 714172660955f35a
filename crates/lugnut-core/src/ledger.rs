//! The history ledger: an append-only, time-windowed commit log.
//!
//! Every named mutation records a [`Commit`] holding a deep snapshot of all
//! stage collections plus the booking-status vocabulary. Commits are never
//! mutated after creation and are consumed only by restore. Noisy mutations
//! (field-level status edits) go through the debounced path: rapid repeated
//! calls coalesce into one commit carrying the last action name supplied.
//!
//! The ledger is independent of the undo stack and session-only: it is never
//! serialized anywhere.

use crate::store::StageBoard;
use serde::{Deserialize, Serialize};

/// Commits older than this are pruned on every append.
pub const RETENTION_MILLIS: i64 = 48 * 60 * 60 * 1000;

/// At most this many commits are retained.
pub const MAX_COMMITS: usize = 50;

/// Quiet period for the debounced commit path.
pub const DEBOUNCE_MILLIS: i64 = 1_000;

/// Deep copy of everything a restore needs.
///
/// Snapshots carry no schema-version field: restoring a snapshot created
/// before a record-shape change is unguarded and may resurrect stale shapes.
/// Open question, deliberately not papered over here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub board: StageBoard,
    pub booking_statuses: Vec<String>,
}

/// A named, timestamped, full-state snapshot in the audit ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub id: String,
    pub action: String,
    pub at_millis: i64,
    pub snapshot: Snapshot,
}

/// A debounced commit waiting for its quiet period to elapse.
///
/// There is never more than one: re-triggering replaces the whole value,
/// which is the cancel-before-reschedule contract.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingCommit {
    action: String,
    deadline_millis: i64,
}

/// The commit log plus the single-owner debounce deadline.
#[derive(Debug, Default)]
pub struct Ledger {
    commits: Vec<Commit>,
    pending: Option<PendingCommit>,
    restoring: bool,
    seq: u64,
}

impl Ledger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Retained commits, oldest first.
    #[must_use]
    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Commit> {
        self.commits.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn latest(&self) -> Option<&Commit> {
        self.commits.last()
    }

    /// True while a remote-first restore is in flight.
    #[must_use]
    pub fn is_restoring(&self) -> bool {
        self.restoring
    }

    pub(crate) fn set_restoring(&mut self, restoring: bool) {
        self.restoring = restoring;
    }

    /// Record an immediate commit.
    ///
    /// Cancels any pending debounce, prunes entries older than the 48 h
    /// window, appends, and keeps at most the [`MAX_COMMITS`] most recent.
    pub fn add_commit(&mut self, action: &str, snapshot: Snapshot, now_millis: i64) -> &Commit {
        self.pending = None;
        self.commits
            .retain(|c| now_millis - c.at_millis < RETENTION_MILLIS);
        if self.commits.len() >= MAX_COMMITS {
            let excess = self.commits.len() - (MAX_COMMITS - 1);
            self.commits.drain(..excess);
        }
        self.seq += 1;
        let commit = Commit {
            id: format!("c{}", self.seq),
            action: action.to_string(),
            at_millis: now_millis,
            snapshot,
        };
        tracing::debug!(id = %commit.id, action, "ledger commit");
        self.commits.push(commit);
        self.commits.last().unwrap_or_else(|| unreachable!())
    }

    /// Schedule (or reschedule) a debounced commit.
    ///
    /// Replacing the option drops any pending deadline, so repeated calls
    /// coalesce and the last action name wins.
    pub fn debounced_commit(&mut self, action: &str, now_millis: i64) {
        self.pending = Some(PendingCommit {
            action: action.to_string(),
            deadline_millis: now_millis + DEBOUNCE_MILLIS,
        });
    }

    /// The action name of the pending debounced commit, if any.
    #[must_use]
    pub fn pending_action(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.action.as_str())
    }

    /// Take the pending commit if its quiet period has elapsed.
    pub fn take_due(&mut self, now_millis: i64) -> Option<String> {
        if self
            .pending
            .as_ref()
            .is_some_and(|p| now_millis >= p.deadline_millis)
        {
            return self.pending.take().map(|p| p.action);
        }
        None
    }

    /// Drop the pending debounced commit without firing it.
    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{DEBOUNCE_MILLIS, Ledger, MAX_COMMITS, RETENTION_MILLIS, Snapshot};
    use crate::store::StageBoard;

    fn snapshot() -> Snapshot {
        Snapshot {
            board: StageBoard::new(),
            booking_statuses: vec!["Booked".into()],
        }
    }

    #[test]
    fn add_commit_appends_and_names() {
        let mut ledger = Ledger::new();
        ledger.add_commit("Added order", snapshot(), 1_000);
        ledger.add_commit("Sent to archive", snapshot(), 2_000);

        assert_eq!(ledger.commits().len(), 2);
        assert_eq!(ledger.latest().unwrap().action, "Sent to archive");
        assert_eq!(ledger.latest().unwrap().at_millis, 2_000);
    }

    #[test]
    fn commit_ids_are_unique_and_resolvable() {
        let mut ledger = Ledger::new();
        let id1 = ledger.add_commit("a", snapshot(), 1).id.clone();
        let id2 = ledger.add_commit("b", snapshot(), 2).id.clone();
        assert_ne!(id1, id2);
        assert_eq!(ledger.get(&id1).unwrap().action, "a");
        assert_eq!(ledger.get(&id2).unwrap().action, "b");
    }

    #[test]
    fn cap_keeps_only_most_recent_fifty() {
        let mut ledger = Ledger::new();
        for i in 0..60 {
            ledger.add_commit(&format!("commit {i}"), snapshot(), i);
        }
        assert_eq!(ledger.commits().len(), MAX_COMMITS);
        assert_eq!(ledger.commits()[0].action, "commit 10");
        assert_eq!(ledger.latest().unwrap().action, "commit 59");
    }

    #[test]
    fn prune_drops_commits_older_than_window() {
        let mut ledger = Ledger::new();
        ledger.add_commit("old", snapshot(), 0);
        ledger.add_commit("fresh", snapshot(), RETENTION_MILLIS - 1);
        ledger.add_commit("new", snapshot(), RETENTION_MILLIS + 10);

        let actions: Vec<&str> = ledger.commits().iter().map(|c| c.action.as_str()).collect();
        assert_eq!(actions, ["fresh", "new"]);
    }

    #[test]
    fn debounce_coalesces_and_keeps_last_action_name() {
        let mut ledger = Ledger::new();
        ledger.debounced_commit("Updated part status", 1_000);
        ledger.debounced_commit("Updated booking status", 1_400);

        // first deadline was cancelled by the second call
        assert_eq!(ledger.take_due(1_000 + DEBOUNCE_MILLIS), None);
        let fired = ledger.take_due(1_400 + DEBOUNCE_MILLIS);
        assert_eq!(fired.as_deref(), Some("Updated booking status"));
        // one-shot: nothing left after firing
        assert_eq!(ledger.take_due(10_000), None);
    }

    #[test]
    fn immediate_commit_cancels_pending_debounce() {
        let mut ledger = Ledger::new();
        ledger.debounced_commit("noisy", 1_000);
        ledger.add_commit("coarse", snapshot(), 1_100);
        assert_eq!(ledger.pending_action(), None);
        assert_eq!(ledger.take_due(5_000), None);
        assert_eq!(ledger.commits().len(), 1);
    }

    #[test]
    fn snapshot_is_immutable_once_committed() {
        let mut ledger = Ledger::new();
        let mut board = StageBoard::new();
        board.orders.push(crate::model::record::PartRecord {
            id: "p1".into(),
            ..Default::default()
        });
        ledger.add_commit(
            "with record",
            Snapshot {
                board: board.clone(),
                booking_statuses: vec![],
            },
            1,
        );
        board.orders.clear();
        assert_eq!(ledger.latest().unwrap().snapshot.board.orders.len(), 1);
    }
}
