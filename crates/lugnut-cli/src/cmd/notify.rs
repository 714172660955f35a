//! `lug notify` — reconcile and manage reminder notifications.

use crate::output::{OutputMode, render};
use crate::session::Session;
use anyhow::Result;
use clap::Args;
use lugnut_core::Notification;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct NotifyArgs {
    /// Mark one notification as read.
    #[arg(long)]
    pub read: Option<String>,

    /// Remove one notification.
    #[arg(long)]
    pub remove: Option<String>,

    /// Clear the whole notification list.
    #[arg(long)]
    pub clear: bool,
}

#[derive(Debug, Serialize)]
struct NotifyOutput {
    notifications: Vec<Notification>,
    unread: usize,
}

pub fn run(session: &mut Session, args: &NotifyArgs, mode: OutputMode) -> Result<()> {
    // reconcile first so the listing reflects the board as it is now
    session.workshop.check_notifications();

    if args.clear {
        session.workshop.notifications.clear();
    }
    if let Some(id) = &args.read {
        if !session.workshop.notifications.mark_read(id) {
            anyhow::bail!("notification '{id}' not found");
        }
    }
    if let Some(id) = &args.remove {
        if !session.workshop.notifications.remove(id) {
            anyhow::bail!("notification '{id}' not found");
        }
    }

    let out = NotifyOutput {
        notifications: session.workshop.notifications.items().to_vec(),
        unread: session.workshop.notifications.unread_count(),
    };
    render(mode, &out, |v, w| {
        if v.notifications.is_empty() {
            return writeln!(w, "no notifications");
        }
        for n in &v.notifications {
            let marker = if n.is_read { " " } else { "*" };
            writeln!(w, "{marker} {:<8} {}", n.id, n.description)?;
        }
        writeln!(w, "{} unread", v.unread)
    })
}
