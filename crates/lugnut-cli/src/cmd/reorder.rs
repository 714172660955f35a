//! `lug reorder` — send records back to orders for reordering.

use crate::output::{OutputMode, render};
use crate::session::Session;
use anyhow::Result;
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ReorderArgs {
    /// Record ids to reorder.
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Reason appended to the audit note as `"<reason> #reorder"`.
    #[arg(long)]
    pub reason: String,
}

#[derive(Debug, Serialize)]
struct ReorderOutput {
    moved: Vec<String>,
}

pub fn run(session: &mut Session, args: &ReorderArgs, mode: OutputMode) -> Result<()> {
    let moved = session.workshop.send_to_reorder(&args.ids, &args.reason);
    let out = ReorderOutput { moved };
    render(mode, &out, |v, w| {
        writeln!(w, "sent {} record(s) back to orders", v.moved.len())
    })
}
