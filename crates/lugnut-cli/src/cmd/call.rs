//! `lug call` — move records onto the call list.

use crate::output::{OutputMode, render};
use crate::session::Session;
use anyhow::Result;
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Record ids to move.
    #[arg(required = true)]
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CallOutput {
    moved: Vec<String>,
}

pub fn run(session: &mut Session, args: &CallArgs, mode: OutputMode) -> Result<()> {
    let moved = session.workshop.send_to_call_list(&args.ids);
    let out = CallOutput { moved };
    render(mode, &out, |v, w| {
        writeln!(w, "moved {} record(s) to the call list", v.moved.len())
    })
}
