//! Durable reference data.
//!
//! The only region of workshop state with a persistence path: status
//! vocabularies, note/reminder templates, the board lock flag, and free-form
//! user notes, stored as a TOML blob. The stage collections, the history
//! ledger, and the undo stack are session-only and must never be written
//! here.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefData {
    pub booking_statuses: Vec<String>,
    pub part_statuses: Vec<String>,
    pub note_templates: Vec<String>,
    pub reminder_templates: Vec<String>,
    /// When set, the board is read-only in consuming UIs.
    pub locked: bool,
    pub notes: Vec<String>,
}

impl Default for RefData {
    fn default() -> Self {
        Self {
            booking_statuses: default_booking_statuses(),
            part_statuses: default_part_statuses(),
            note_templates: default_note_templates(),
            reminder_templates: default_reminder_templates(),
            locked: false,
            notes: Vec::new(),
        }
    }
}

fn default_booking_statuses() -> Vec<String> {
    ["Booked", "Confirmed", "Arrived", "No Show", "Rescheduled"]
        .map(String::from)
        .to_vec()
}

fn default_part_statuses() -> Vec<String> {
    [
        "Ordered",
        "Pending",
        "Arrived",
        "Booked",
        "Awaiting Call",
        "Archived",
    ]
    .map(String::from)
    .to_vec()
}

fn default_note_templates() -> Vec<String> {
    [
        "Customer notified",
        "Left voicemail",
        "Part arrived, awaiting booking",
    ]
    .map(String::from)
    .to_vec()
}

fn default_reminder_templates() -> Vec<String> {
    ["Call customer", "Chase supplier", "Confirm booking"]
        .map(String::from)
        .to_vec()
}

impl RefData {
    /// Load reference data from `path`, falling back to defaults when the
    /// file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading reference data from {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("parsing reference data in {}", path.display()))
    }

    /// Write reference data to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("serializing reference data")?;
        fs::write(path, content)
            .with_context(|| format!("writing reference data to {}", path.display()))
    }
}
