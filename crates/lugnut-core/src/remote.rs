//! The opaque remote persistent store behind the workflow core.
//!
//! The core never inspects the store's wire or storage format; it depends
//! only on the five operations of [`RemoteStore`] succeeding or rejecting.
//! Stage-transition writes are optimistic (local state mutates first, a
//! remote rejection is logged and ignored); snapshot restore is the one
//! remote-first path.

use crate::ledger::Snapshot;
use crate::model::record::PartRecord;
use crate::model::stage::Stage;
use crate::store::StageBoard;
use thiserror::Error;

/// Error from a remote store call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("remote store unavailable: {0}")]
    Unavailable(String),
    #[error("remote store rejected the request: {0}")]
    Rejected(String),
    #[error("record '{0}' not found in remote store")]
    NotFound(String),
}

/// The five operations the core relies on.
pub trait RemoteStore {
    /// Fetch records, optionally restricted to one stage.
    ///
    /// # Errors
    ///
    /// Any [`RemoteError`] the backing service reports.
    fn get_records(&self, stage: Option<Stage>) -> Result<Vec<PartRecord>, RemoteError>;

    /// Create or update a record in the given stage.
    ///
    /// # Errors
    ///
    /// Any [`RemoteError`] the backing service reports.
    fn save_record(&mut self, record: &PartRecord, stage: Stage) -> Result<PartRecord, RemoteError>;

    /// Move an existing record to a new stage.
    ///
    /// # Errors
    ///
    /// [`RemoteError::NotFound`] when the id is unknown remotely.
    fn update_record_stage(&mut self, id: &str, stage: Stage) -> Result<PartRecord, RemoteError>;

    /// Delete a record wherever it lives.
    ///
    /// # Errors
    ///
    /// [`RemoteError::NotFound`] when the id is unknown remotely.
    fn delete_record(&mut self, id: &str) -> Result<(), RemoteError>;

    /// Replace the entire remote state with a ledger snapshot.
    ///
    /// # Errors
    ///
    /// Any [`RemoteError`] the backing service reports.
    fn restore_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), RemoteError>;
}

/// In-memory remote store for tests and demos.
///
/// `fail_next` injects one failure into the next call, which is how the
/// restore error path is exercised.
#[derive(Debug, Default)]
pub struct MemoryRemote {
    board: StageBoard,
    fail_next: Option<RemoteError>,
    restores: usize,
}

impl MemoryRemote {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the remote with existing records.
    #[must_use]
    pub fn with_board(board: StageBoard) -> Self {
        Self {
            board,
            ..Self::default()
        }
    }

    /// Make the next store call fail with `err`.
    pub fn fail_next(&mut self, err: RemoteError) {
        self.fail_next = Some(err);
    }

    /// Remote-side state, for assertions.
    #[must_use]
    pub fn board(&self) -> &StageBoard {
        &self.board
    }

    /// Number of snapshot restores that reached the remote.
    #[must_use]
    pub fn restore_count(&self) -> usize {
        self.restores
    }

    fn take_injected_failure(&mut self) -> Result<(), RemoteError> {
        match self.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl RemoteStore for MemoryRemote {
    fn get_records(&self, stage: Option<Stage>) -> Result<Vec<PartRecord>, RemoteError> {
        if let Some(err) = &self.fail_next {
            return Err(err.clone());
        }
        let records = match stage {
            Some(stage) => self.board.collection(stage).to_vec(),
            None => self.board.all_records().map(|(_, r)| r.clone()).collect(),
        };
        Ok(records)
    }

    fn save_record(&mut self, record: &PartRecord, stage: Stage) -> Result<PartRecord, RemoteError> {
        self.take_injected_failure()?;
        // upsert: a record lives in exactly one stage remotely as well
        self.board.take_from(&Stage::ALL, &[record.id.clone()]);
        self.board.collection_mut(stage).push(record.clone());
        Ok(record.clone())
    }

    fn update_record_stage(&mut self, id: &str, stage: Stage) -> Result<PartRecord, RemoteError> {
        self.take_injected_failure()?;
        let mut taken = self.board.take_from(&Stage::ALL, &[id.to_string()]);
        let record = taken.pop().ok_or_else(|| RemoteError::NotFound(id.to_string()))?;
        self.board.collection_mut(stage).push(record.clone());
        Ok(record)
    }

    fn delete_record(&mut self, id: &str) -> Result<(), RemoteError> {
        self.take_injected_failure()?;
        let taken = self.board.take_from(&Stage::ALL, &[id.to_string()]);
        if taken.is_empty() {
            return Err(RemoteError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn restore_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), RemoteError> {
        self.take_injected_failure()?;
        self.board = snapshot.board.clone();
        self.restores += 1;
        Ok(())
    }
}
