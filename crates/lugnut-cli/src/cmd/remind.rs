//! `lug remind` — set or clear a record's reminder.
//!
//! Editing a reminder reconciles notifications immediately, so the output
//! reports how many reminder notifications are live afterwards.

use crate::output::{OutputMode, render};
use crate::session::Session;
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::Args;
use lugnut_core::Reminder;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct RemindArgs {
    /// Record id.
    pub id: String,

    /// Due date (YYYY-MM-DD). Required unless --clear.
    #[arg(long)]
    pub date: Option<String>,

    /// Due time (HH:MM); midnight when omitted.
    #[arg(long)]
    pub time: Option<String>,

    /// Reminder subject. Required unless --clear.
    #[arg(long)]
    pub subject: Option<String>,

    /// Remove the reminder instead of setting one.
    #[arg(long)]
    pub clear: bool,
}

#[derive(Debug, Serialize)]
struct RemindOutput {
    id: String,
    cleared: bool,
    due_notifications: usize,
}

pub fn run(session: &mut Session, args: &RemindArgs, mode: OutputMode) -> Result<()> {
    let reminder = if args.clear {
        None
    } else {
        let date_str = args
            .date
            .as_deref()
            .context("--date is required unless --clear is given")?;
        let subject = args
            .subject
            .clone()
            .context("--subject is required unless --clear is given")?;
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .with_context(|| format!("parsing reminder date '{date_str}'"))?;
        let time = match args.time.as_deref() {
            Some(raw) => Some(
                NaiveTime::parse_from_str(raw, "%H:%M")
                    .with_context(|| format!("parsing reminder time '{raw}'"))?,
            ),
            None => None,
        };
        Some(Reminder {
            date,
            time,
            subject,
        })
    };

    if !session.workshop.set_reminder(&args.id, reminder) {
        anyhow::bail!("record '{}' not found", args.id);
    }

    let out = RemindOutput {
        id: args.id.clone(),
        cleared: args.clear,
        due_notifications: session.workshop.notifications.items().len(),
    };
    render(mode, &out, |v, w| {
        if v.cleared {
            writeln!(w, "cleared reminder on {}", v.id)?;
        } else {
            writeln!(w, "set reminder on {}", v.id)?;
        }
        writeln!(w, "{} notification(s) currently due", v.due_notifications)
    })
}
