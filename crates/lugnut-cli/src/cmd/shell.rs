//! `lug shell` — an interactive session over one hydrated workshop.
//!
//! Undo/redo, the history ledger, and grace windows are session-scoped
//! state, so one-shot commands cannot observe them; the shell keeps a
//! single [`Workshop`] alive across commands instead. It ticks the
//! workshop before every prompt, which is what fires elapsed debounce
//! deadlines, sweeps expired grace windows, and runs the periodic
//! notification scan under an interactive cadence.
//!
//! [`Workshop`]: lugnut_core::Workshop

use crate::session::Session;
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use lugnut_core::{PartRecord, Reminder, WorkflowError};
use std::io::{self, BufRead, Write};

enum Flow {
    Continue,
    Quit,
}

pub fn run(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "lugnut shell; 'help' lists commands, 'quit' leaves")?;
    loop {
        session.workshop.tick();
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, rest)) = tokens.split_first() else {
            continue;
        };

        match execute(session, command, rest, &mut out) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(err) => writeln!(out, "error: {err:#}")?,
        }
    }
    Ok(())
}

fn execute(
    session: &mut Session,
    command: &str,
    rest: &[&str],
    out: &mut dyn Write,
) -> Result<Flow> {
    let ws = &mut session.workshop;
    match command {
        "help" => print_help(out)?,

        "list" => {
            for (stage, record) in ws.board.all_records() {
                writeln!(
                    out,
                    "{:<8} {:<12} {:<8} {:<20} {}",
                    stage.to_string(),
                    record.tracking_id,
                    record.id,
                    record.part_name,
                    record.status
                )?;
            }
        }

        "add" => {
            let [base_id, part @ ..] = rest else {
                bail!("usage: add <base_id> <part description>");
            };
            if part.is_empty() {
                bail!("usage: add <base_id> <part description>");
            }
            let record = PartRecord {
                id: format!("p{base_id}"),
                base_id: (*base_id).to_string(),
                part_name: part.join(" "),
                ..PartRecord::default()
            };
            let id = ws.add_order(record)?;
            writeln!(out, "added {id}")?;
        }

        "set" => {
            let [id, field, value @ ..] = rest else {
                bail!("usage: set <id> <field> <value>");
            };
            if value.is_empty() {
                bail!("usage: set <id> <field> <value>");
            }
            set_field(session, id, field, &value.join(" "))?;
            writeln!(out, "set {field} on {id}")?;
        }

        "commit" => match ws.commit_to_main_sheet(&owned(rest)) {
            Ok(moved) => writeln!(out, "committed {} record(s)", moved.len())?,
            Err(WorkflowError::Validation { rows }) => {
                let now = ws.now_millis();
                for row in rows {
                    writeln!(
                        out,
                        "{}: missing {} ({}s grace remaining)",
                        row.record_id,
                        row.missing.join(", "),
                        ws.grace.remaining_secs(&row.record_id, now)
                    )?;
                }
            }
            Err(other) => return Err(other.into()),
        },

        "call" => {
            let moved = ws.send_to_call_list(&owned(rest));
            writeln!(out, "moved {} record(s) to the call list", moved.len())?;
        }

        "book" => {
            let [id, date] = rest else {
                bail!("usage: book <id> <YYYY-MM-DD>");
            };
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .with_context(|| format!("parsing booking date '{date}'"))?;
            let moved = ws.send_to_booking(&owned(&[*id]), date, None, None);
            writeln!(out, "booked {} record(s)", moved.len())?;
        }

        "archive" => {
            let [id, reason @ ..] = rest else {
                bail!("usage: archive <id> [reason]");
            };
            let reason = (!reason.is_empty()).then(|| reason.join(" "));
            let moved = ws.send_to_archive(&owned(&[*id]), reason.as_deref());
            writeln!(out, "archived {} record(s)", moved.len())?;
        }

        "reorder" => {
            let [id, reason @ ..] = rest else {
                bail!("usage: reorder <id> <reason>");
            };
            if reason.is_empty() {
                bail!("usage: reorder <id> <reason>");
            }
            let moved = ws.send_to_reorder(&owned(&[*id]), &reason.join(" "));
            writeln!(out, "sent {} record(s) back to orders", moved.len())?;
        }

        "status" => {
            let [id, status @ ..] = rest else {
                bail!("usage: status <id> <status>");
            };
            if !ws.update_part_status(id, &status.join(" ")) {
                bail!("record '{id}' not found");
            }
            writeln!(out, "status updated (commit follows after the quiet period)")?;
        }

        "bstatus" => {
            let [id, status @ ..] = rest else {
                bail!("usage: bstatus <id> <status>");
            };
            if !ws.update_booking_status(id, &status.join(" ")) {
                bail!("record '{id}' is not on the booking sheet");
            }
            writeln!(out, "booking status updated")?;
        }

        "remind" => {
            let [id, detail @ ..] = rest else {
                bail!("usage: remind <id> <YYYY-MM-DD> <subject> | remind <id> clear");
            };
            if detail == ["clear"] {
                if !ws.set_reminder(id, None) {
                    bail!("record '{id}' not found");
                }
                writeln!(out, "reminder cleared")?;
            } else {
                let [date, subject @ ..] = detail else {
                    bail!("usage: remind <id> <YYYY-MM-DD> <subject>");
                };
                if subject.is_empty() {
                    bail!("usage: remind <id> <YYYY-MM-DD> <subject>");
                }
                let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .with_context(|| format!("parsing reminder date '{date}'"))?;
                let reminder = Reminder {
                    date,
                    time: None,
                    subject: subject.join(" "),
                };
                if !ws.set_reminder(id, Some(reminder)) {
                    bail!("record '{id}' not found");
                }
                writeln!(out, "reminder set")?;
            }
        }

        "notify" => {
            ws.check_notifications();
            if ws.notifications.items().is_empty() {
                writeln!(out, "no notifications")?;
            }
            for n in ws.notifications.items() {
                let marker = if n.is_read { " " } else { "*" };
                writeln!(out, "{marker} {:<8} {}", n.id, n.description)?;
            }
        }

        "undo" => {
            let applied = ws.undo();
            writeln!(out, "{}", if applied { "undone" } else { "nothing to undo" })?;
        }

        "redo" => {
            let applied = ws.redo();
            writeln!(out, "{}", if applied { "redone" } else { "nothing to redo" })?;
        }

        "save" => {
            let name = if rest.is_empty() {
                "Manual save".to_string()
            } else {
                rest.join(" ")
            };
            ws.commit_save(&name);
            writeln!(out, "checkpoint recorded; undo history cleared")?;
        }

        "history" => {
            for commit in ws.ledger.commits() {
                writeln!(
                    out,
                    "{:<6} {:<28} {} record(s)",
                    commit.id,
                    commit.action,
                    commit.snapshot.board.len()
                )?;
            }
        }

        "restore" => {
            let [commit_id] = rest else {
                bail!("usage: restore <commit-id>");
            };
            ws.restore_to_commit(commit_id)?;
            writeln!(out, "restored; see 'history' for the audit entry")?;
        }

        "grace" => {
            let [id] = rest else {
                bail!("usage: grace <id>");
            };
            let remaining = ws.grace.remaining_secs(id, ws.now_millis());
            writeln!(out, "{remaining}s grace remaining for {id}")?;
        }

        "quit" | "exit" => return Ok(Flow::Quit),

        unknown => bail!("unknown command '{unknown}'; try 'help'"),
    }
    Ok(Flow::Continue)
}

/// Edit one record field directly. The caller contract for board edits
/// applies: push the pre-image, mutate, then commit (debounced here since
/// field edits arrive at typing frequency).
fn set_field(session: &mut Session, id: &str, field: &str, value: &str) -> Result<()> {
    let ws = &mut session.workshop;
    if !ws.board.contains(id) {
        bail!("record '{id}' not found");
    }
    ws.undo.push(ws.board.clone());
    let Some((_, record)) = ws.board.find_mut(id) else {
        bail!("record '{id}' not found");
    };
    match field {
        "customer" => record.customer = value.to_string(),
        "phone" => record.phone = value.to_string(),
        "vehicle" => record.vehicle = value.to_string(),
        "reg" => record.registration = value.to_string(),
        "part" => record.part_name = value.to_string(),
        "part_number" => record.part_number = value.to_string(),
        other => bail!("unknown field '{other}'"),
    }
    ws.debounced_commit("Edited record");
    Ok(())
}

fn owned(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| (*s).to_string()).collect()
}

fn print_help(out: &mut dyn Write) -> io::Result<()> {
    writeln!(
        out,
        "commands:\n  \
         list                            show every record with its stage\n  \
         add <base_id> <part>            create a minimal order\n  \
         set <id> <field> <value>        fill a record field (customer, phone, reg, ...)\n  \
         commit <id...>                  strict-commit orders to the main sheet\n  \
         call <id...>                    move records to the call list\n  \
         book <id> <date>                book a record in\n  \
         archive <id> [reason]           archive with an optional reason\n  \
         reorder <id> <reason>           send back to orders\n  \
         status <id> <status>            set part status (debounced commit)\n  \
         bstatus <id> <status>           set booking status\n  \
         remind <id> <date> <subject>    set a reminder ('remind <id> clear' removes)\n  \
         notify                          reconcile and list notifications\n  \
         undo / redo                     session undo history\n  \
         save [name]                     checkpoint; clears undo history\n  \
         history                         list ledger commits\n  \
         restore <commit-id>             remote-first restore to a commit\n  \
         grace <id>                      remaining strict-validation grace\n  \
         quit"
    )
}
