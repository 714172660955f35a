//! `lug vocab` — show or edit the durable reference data.

use crate::output::{OutputMode, render};
use crate::session::Session;
use anyhow::Result;
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct VocabArgs {
    /// Add a booking-status value.
    #[arg(long)]
    pub add_booking_status: Option<String>,

    /// Add a part-status value.
    #[arg(long)]
    pub add_part_status: Option<String>,

    /// Add a note template.
    #[arg(long)]
    pub add_note_template: Option<String>,

    /// Lock the board against edits in consuming UIs.
    #[arg(long, conflicts_with = "unlock")]
    pub lock: bool,

    /// Unlock the board.
    #[arg(long)]
    pub unlock: bool,
}

#[derive(Debug, Serialize)]
struct VocabOutput {
    booking_statuses: Vec<String>,
    part_statuses: Vec<String>,
    note_templates: Vec<String>,
    reminder_templates: Vec<String>,
    locked: bool,
}

pub fn run(session: &mut Session, args: &VocabArgs, mode: OutputMode) -> Result<()> {
    let refdata = &mut session.workshop.refdata;
    let mut changed = false;

    if let Some(value) = &args.add_booking_status {
        refdata.booking_statuses.push(value.clone());
        changed = true;
    }
    if let Some(value) = &args.add_part_status {
        refdata.part_statuses.push(value.clone());
        changed = true;
    }
    if let Some(value) = &args.add_note_template {
        refdata.note_templates.push(value.clone());
        changed = true;
    }
    if args.lock {
        refdata.locked = true;
        changed = true;
    }
    if args.unlock {
        refdata.locked = false;
        changed = true;
    }

    if changed {
        session.save_refdata()?;
    }

    let refdata = &session.workshop.refdata;
    let out = VocabOutput {
        booking_statuses: refdata.booking_statuses.clone(),
        part_statuses: refdata.part_statuses.clone(),
        note_templates: refdata.note_templates.clone(),
        reminder_templates: refdata.reminder_templates.clone(),
        locked: refdata.locked,
    };
    render(mode, &out, |v, w| {
        writeln!(w, "booking statuses: {}", v.booking_statuses.join(", "))?;
        writeln!(w, "part statuses:    {}", v.part_statuses.join(", "))?;
        writeln!(w, "note templates:   {}", v.note_templates.join(" | "))?;
        writeln!(w, "reminder templates: {}", v.reminder_templates.join(" | "))?;
        writeln!(w, "locked: {}", v.locked)
    })
}
