//! The stage board: one collection per workflow stage.
//!
//! Everything here is session-only (the ephemeral region). The board is
//! hydrated from the remote store and must never be serialized to the local
//! reference-data file. `Clone` on [`StageBoard`] is a deep copy — every
//! field is owned — and is the snapshot primitive used by both the history
//! ledger and the undo stack.

use crate::model::record::PartRecord;
use crate::model::stage::Stage;
use serde::{Deserialize, Serialize};

/// The five in-memory stage collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageBoard {
    pub orders: Vec<PartRecord>,
    pub main: Vec<PartRecord>,
    pub booking: Vec<PartRecord>,
    pub call: Vec<PartRecord>,
    pub archive: Vec<PartRecord>,
}

impl StageBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The records currently in `stage`.
    #[must_use]
    pub fn collection(&self, stage: Stage) -> &[PartRecord] {
        match stage {
            Stage::Orders => &self.orders,
            Stage::Main => &self.main,
            Stage::Booking => &self.booking,
            Stage::Call => &self.call,
            Stage::Archive => &self.archive,
        }
    }

    pub fn collection_mut(&mut self, stage: Stage) -> &mut Vec<PartRecord> {
        match stage {
            Stage::Orders => &mut self.orders,
            Stage::Main => &mut self.main,
            Stage::Booking => &mut self.booking,
            Stage::Call => &mut self.call,
            Stage::Archive => &mut self.archive,
        }
    }

    /// The stage currently holding `id`, if any.
    #[must_use]
    pub fn stage_of(&self, id: &str) -> Option<Stage> {
        Stage::ALL
            .into_iter()
            .find(|&stage| self.collection(stage).iter().any(|r| r.id == id))
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.stage_of(id).is_some()
    }

    /// Find a record anywhere on the board.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<(Stage, &PartRecord)> {
        Stage::ALL.into_iter().find_map(|stage| {
            self.collection(stage)
                .iter()
                .find(|r| r.id == id)
                .map(|r| (stage, r))
        })
    }

    pub fn find_mut(&mut self, id: &str) -> Option<(Stage, &mut PartRecord)> {
        let stage = self.stage_of(id)?;
        self.collection_mut(stage)
            .iter_mut()
            .find(|r| r.id == id)
            .map(|r| (stage, r))
    }

    /// Remove every record in `ids` from any of `sources`, preserving
    /// per-stage order, and return the removed records.
    pub fn take_from(&mut self, sources: &[Stage], ids: &[String]) -> Vec<PartRecord> {
        let mut taken = Vec::new();
        for &stage in sources {
            let collection = self.collection_mut(stage);
            let mut kept = Vec::with_capacity(collection.len());
            for record in collection.drain(..) {
                if ids.iter().any(|id| *id == record.id) {
                    taken.push(record);
                } else {
                    kept.push(record);
                }
            }
            *collection = kept;
        }
        taken
    }

    /// Iterate every record on the board with its stage.
    pub fn all_records(&self) -> impl Iterator<Item = (Stage, &PartRecord)> {
        Stage::ALL
            .into_iter()
            .flat_map(|stage| self.collection(stage).iter().map(move |r| (stage, r)))
    }

    /// Total records across all stages.
    #[must_use]
    pub fn len(&self) -> usize {
        Stage::ALL
            .into_iter()
            .map(|stage| self.collection(stage).len())
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
