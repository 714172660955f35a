//! `lug archive` — archive records with an optional reason.
//!
//! A non-empty reason is appended to the record's action note as
//! `"<reason> #archive"`, the convention downstream search and printing
//! match on.

use crate::output::{OutputMode, render};
use crate::session::Session;
use anyhow::Result;
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ArchiveArgs {
    /// Record ids to archive.
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Reason appended to the audit note.
    #[arg(long)]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
struct ArchiveOutput {
    moved: Vec<String>,
    reason: Option<String>,
}

pub fn run(session: &mut Session, args: &ArchiveArgs, mode: OutputMode) -> Result<()> {
    let moved = session
        .workshop
        .send_to_archive(&args.ids, args.reason.as_deref());
    let out = ArchiveOutput {
        moved,
        reason: args.reason.clone(),
    };
    render(mode, &out, |v, w| {
        writeln!(w, "archived {} record(s)", v.moved.len())
    })
}
