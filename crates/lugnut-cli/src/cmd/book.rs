//! `lug book` — book records in for fitting.

use crate::output::{OutputMode, render};
use crate::session::Session;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct BookArgs {
    /// Record ids to book.
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Booking date (YYYY-MM-DD).
    #[arg(long)]
    pub date: String,

    /// Free-text booking note.
    #[arg(long)]
    pub note: Option<String>,

    /// Booking status from the vocabulary; defaults to "Booked".
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
struct BookOutput {
    moved: Vec<String>,
    date: NaiveDate,
}

pub fn run(session: &mut Session, args: &BookArgs, mode: OutputMode) -> Result<()> {
    let date = NaiveDate::parse_from_str(&args.date, "%Y-%m-%d")
        .with_context(|| format!("parsing booking date '{}'", args.date))?;

    let moved = session.workshop.send_to_booking(
        &args.ids,
        date,
        args.note.as_deref(),
        args.status.as_deref(),
    );

    let out = BookOutput { moved, date };
    render(mode, &out, |v, w| {
        writeln!(w, "booked {} record(s) for {}", v.moved.len(), v.date)
    })
}
