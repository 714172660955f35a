//! `lug status` — update a part status or a booking status.
//!
//! Field-level edits route through the debounced commit path in the core;
//! in a one-shot invocation the remote write has already happened by the
//! time the process exits, so nothing is lost when the pending ledger
//! entry dies with the session.

use crate::output::{OutputMode, render};
use crate::session::Session;
use anyhow::Result;
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Record id.
    pub id: String,

    /// New status value.
    pub status: String,

    /// Update the booking status instead of the part status.
    #[arg(long)]
    pub booking: bool,
}

#[derive(Debug, Serialize)]
struct StatusOutput {
    id: String,
    status: String,
    booking: bool,
}

pub fn run(session: &mut Session, args: &StatusArgs, mode: OutputMode) -> Result<()> {
    let updated = if args.booking {
        session
            .workshop
            .update_booking_status(&args.id, &args.status)
    } else {
        session.workshop.update_part_status(&args.id, &args.status)
    };

    if !updated {
        if args.booking {
            anyhow::bail!("record '{}' is not on the booking sheet", args.id);
        }
        anyhow::bail!("record '{}' not found", args.id);
    }

    let out = StatusOutput {
        id: args.id.clone(),
        status: args.status.clone(),
        booking: args.booking,
    };
    render(mode, &out, |v, w| {
        let kind = if v.booking { "booking status" } else { "status" };
        writeln!(w, "set {} of {} to {}", kind, v.id, v.status)
    })
}
