//! JSON-file-backed implementation of the core's remote store trait.
//!
//! The workflow core treats the store as an opaque collaborator; this
//! implementation keeps the whole board in one JSON document and rewrites
//! it after every mutating call. IO failures surface as
//! [`RemoteError::Unavailable`], which the engine's optimistic paths log
//! and ignore and the restore path converts into a recoverable error.

use anyhow::{Context, Result};
use lugnut_core::{PartRecord, RemoteError, RemoteStore, Snapshot, Stage, StageBoard};
use std::fs;
use std::path::PathBuf;

#[derive(Debug)]
pub struct JsonFileRemote {
    path: PathBuf,
    board: StageBoard,
}

impl JsonFileRemote {
    /// Open (or initialize) the store file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when an existing file cannot be read or parsed.
    pub fn open(path: PathBuf) -> Result<Self> {
        let board = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading board from {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("parsing board in {}", path.display()))?
        } else {
            StageBoard::new()
        };
        Ok(Self { path, board })
    }

    fn persist(&self) -> Result<(), RemoteError> {
        let write = || -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(&self.board)
                .map_err(|err| std::io::Error::other(err.to_string()))?;
            fs::write(&self.path, content)
        };
        write().map_err(|err| RemoteError::Unavailable(err.to_string()))
    }
}

impl RemoteStore for JsonFileRemote {
    fn get_records(&self, stage: Option<Stage>) -> Result<Vec<PartRecord>, RemoteError> {
        let records = match stage {
            Some(stage) => self.board.collection(stage).to_vec(),
            None => self.board.all_records().map(|(_, r)| r.clone()).collect(),
        };
        Ok(records)
    }

    fn save_record(&mut self, record: &PartRecord, stage: Stage) -> Result<PartRecord, RemoteError> {
        self.board.take_from(&Stage::ALL, &[record.id.clone()]);
        self.board.collection_mut(stage).push(record.clone());
        self.persist()?;
        Ok(record.clone())
    }

    fn update_record_stage(&mut self, id: &str, stage: Stage) -> Result<PartRecord, RemoteError> {
        let mut taken = self.board.take_from(&Stage::ALL, &[id.to_string()]);
        let record = taken
            .pop()
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))?;
        self.board.collection_mut(stage).push(record.clone());
        self.persist()?;
        Ok(record)
    }

    fn delete_record(&mut self, id: &str) -> Result<(), RemoteError> {
        let taken = self.board.take_from(&Stage::ALL, &[id.to_string()]);
        if taken.is_empty() {
            return Err(RemoteError::NotFound(id.to_string()));
        }
        self.persist()
    }

    fn restore_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), RemoteError> {
        self.board = snapshot.board.clone();
        self.persist()
    }
}
