//! Session bootstrap: locate the workshop directory, load reference data,
//! open the board store, and hydrate a [`Workshop`].

use crate::store_file::JsonFileRemote;
use anyhow::{Context, Result};
use lugnut_core::{RefData, Workshop};
use std::env;
use std::path::{Path, PathBuf};

const DATA_DIR: &str = ".lugnut";
const BOARD_FILE: &str = "board.json";
const REFDATA_FILE: &str = "refdata.toml";

pub struct Session {
    pub workshop: Workshop<JsonFileRemote>,
    pub dir: PathBuf,
}

impl Session {
    /// Open a session rooted at `dir`, or at the nearest `.lugnut`
    /// directory above the working directory (created on first use).
    pub fn open(dir: Option<PathBuf>) -> Result<Self> {
        let dir = match dir {
            Some(dir) => dir,
            None => {
                let cwd = env::current_dir().context("resolving working directory")?;
                find_data_dir(&cwd).unwrap_or_else(|| cwd.join(DATA_DIR))
            }
        };

        let refdata = RefData::load(&dir.join(REFDATA_FILE))?;
        let remote = JsonFileRemote::open(dir.join(BOARD_FILE))?;
        let mut workshop = Workshop::new(remote, refdata);
        workshop.hydrate().context("hydrating stage collections")?;
        Ok(Self { workshop, dir })
    }

    /// Persist the durable region (reference data only).
    pub fn save_refdata(&self) -> Result<()> {
        self.workshop.refdata.save(&self.dir.join(REFDATA_FILE))
    }
}

fn find_data_dir(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(DATA_DIR);
        if candidate.is_dir() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}
