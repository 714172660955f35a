//! `lug list` — list records across stages.

use crate::output::{OutputMode, render};
use crate::session::Session;
use anyhow::Result;
use clap::Args;
use lugnut_core::{PartRecord, Stage};
use serde::Serialize;
use std::str::FromStr;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Limit output to one stage (orders, main, booking, call, archive).
    #[arg(long)]
    pub stage: Option<String>,
}

#[derive(Debug, Serialize)]
struct StageOutput {
    stage: Stage,
    records: Vec<PartRecord>,
}

#[derive(Debug, Serialize)]
struct ListOutput {
    stages: Vec<StageOutput>,
}

pub fn run(session: &Session, args: &ListArgs, mode: OutputMode) -> Result<()> {
    let stages: Vec<Stage> = match &args.stage {
        Some(name) => vec![Stage::from_str(name)?],
        None => Stage::ALL.to_vec(),
    };

    let out = ListOutput {
        stages: stages
            .into_iter()
            .map(|stage| StageOutput {
                stage,
                records: session.workshop.board.collection(stage).to_vec(),
            })
            .collect(),
    };

    render(mode, &out, |v, w| {
        for section in &v.stages {
            writeln!(w, "{} ({})", section.stage, section.records.len())?;
            for record in &section.records {
                writeln!(
                    w,
                    "  {:<12} {:<8} {:<20} {:<24} {}",
                    record.tracking_id,
                    record.id,
                    record.customer,
                    record.part_name,
                    record.status
                )?;
            }
        }
        Ok(())
    })
}
