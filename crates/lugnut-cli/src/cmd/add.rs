//! `lug add` — create a new part order.

use crate::output::{OutputMode, render};
use crate::session::Session;
use anyhow::Result;
use clap::Args;
use lugnut_core::PartRecord;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Part description.
    #[arg(long)]
    pub part: String,

    /// Supplier part number.
    #[arg(long)]
    pub part_number: Option<String>,

    /// Customer name.
    #[arg(long)]
    pub customer: Option<String>,

    /// Customer phone number.
    #[arg(long)]
    pub phone: Option<String>,

    /// Vehicle make/model.
    #[arg(long)]
    pub vehicle: Option<String>,

    /// Vehicle registration.
    #[arg(long)]
    pub reg: Option<String>,

    /// Stable base id; derived from the current time when omitted.
    #[arg(long)]
    pub base_id: Option<String>,

    /// Record id; derived from the base id when omitted.
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
struct AddOutput {
    id: String,
    tracking_id: String,
    status: String,
}

pub fn run(session: &mut Session, args: &AddArgs, mode: OutputMode) -> Result<()> {
    let base_id = args
        .base_id
        .clone()
        .unwrap_or_else(|| session.workshop.now_millis().to_string());
    let id = args.id.clone().unwrap_or_else(|| format!("p{base_id}"));

    let record = PartRecord {
        id,
        base_id,
        part_name: args.part.clone(),
        part_number: args.part_number.clone().unwrap_or_default(),
        customer: args.customer.clone().unwrap_or_default(),
        phone: args.phone.clone().unwrap_or_default(),
        vehicle: args.vehicle.clone().unwrap_or_default(),
        registration: args.reg.clone().unwrap_or_default(),
        ..PartRecord::default()
    };

    let id = session.workshop.add_order(record)?;
    let (tracking_id, status) = session
        .workshop
        .board
        .find(&id)
        .map(|(_, r)| (r.tracking_id.clone(), r.status.clone()))
        .unwrap_or_default();

    let out = AddOutput {
        id,
        tracking_id,
        status,
    };
    render(mode, &out, |v, w| {
        writeln!(w, "added {} ({}) status {}", v.id, v.tracking_id, v.status)
    })
}
