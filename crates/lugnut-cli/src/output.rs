//! Shared output layer for human/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its output
//! accordingly: readable text for humans, stable JSON for scripts and
//! agents. Command output structs derive `Serialize` so the JSON shape is
//! the struct shape.

use serde::Serialize;
use std::io::{self, Write};

/// The two output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Render `value` to stdout in the requested mode.
///
/// # Errors
///
/// Propagates serialization and write failures.
pub fn render<T, F>(mode: OutputMode, value: &T, human: F) -> anyhow::Result<()>
where
    T: Serialize,
    F: FnOnce(&T, &mut dyn Write) -> io::Result<()>,
{
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut writer, value)?;
            writeln!(writer)?;
        }
        OutputMode::Human => human(value, &mut writer)?,
    }
    Ok(())
}

/// Render a failure to stderr in the requested mode.
pub fn render_error(err: &anyhow::Error, mode: OutputMode) {
    match mode {
        OutputMode::Json => {
            let payload = serde_json::json!({ "error": format!("{err:#}") });
            eprintln!("{payload}");
        }
        OutputMode::Human => eprintln!("error: {err:#}"),
    }
}
