//! `lug commit` — commit orders onto the main sheet.
//!
//! This is the strict-validation gate: incomplete rows block the whole
//! commit, each failing row gets a 30 s grace window, and the output lists
//! the missing fields with the seconds remaining.

use crate::output::{OutputMode, render};
use crate::session::Session;
use anyhow::Result;
use clap::Args;
use lugnut_core::WorkflowError;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct CommitArgs {
    /// Record ids to commit.
    #[arg(required = true)]
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CommitOutput {
    moved: Vec<String>,
}

#[derive(Debug, Serialize)]
struct IncompleteRow {
    record_id: String,
    missing: Vec<&'static str>,
    grace_secs: i64,
}

#[derive(Debug, Serialize)]
struct RejectedOutput {
    rejected: Vec<IncompleteRow>,
}

pub fn run(session: &mut Session, args: &CommitArgs, mode: OutputMode) -> Result<()> {
    match session.workshop.commit_to_main_sheet(&args.ids) {
        Ok(moved) => {
            let out = CommitOutput { moved };
            render(mode, &out, |v, w| {
                writeln!(w, "committed {} record(s) to the main sheet", v.moved.len())
            })
        }
        Err(WorkflowError::Validation { rows }) => {
            let now = session.workshop.now_millis();
            let out = RejectedOutput {
                rejected: rows
                    .into_iter()
                    .map(|row| IncompleteRow {
                        grace_secs: session.workshop.grace.remaining_secs(&row.record_id, now),
                        record_id: row.record_id,
                        missing: row.missing,
                    })
                    .collect(),
            };
            render(mode, &out, |v, w| {
                for row in &v.rejected {
                    writeln!(
                        w,
                        "{}: missing {} ({}s grace remaining)",
                        row.record_id,
                        row.missing.join(", "),
                        row.grace_secs
                    )?;
                }
                Ok(())
            })?;
            anyhow::bail!("strict validation failed; nothing was committed")
        }
        Err(other) => Err(other.into()),
    }
}
