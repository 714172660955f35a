//! Field-completeness validation.
//!
//! Two rulesets: `Relaxed` gates record creation and ordinary edits, `Strict`
//! gates the commit of an order onto the main sheet. Validation never mutates
//! state; it only reports the offending field names.

use crate::model::record::PartRecord;

/// Which ruleset to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ruleset {
    /// Create / ordinary edit: identity and part name.
    Relaxed,
    /// Commit gate: additionally requires the customer contact fields.
    Strict,
}

/// Strict-gate failure detail for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIssues {
    pub record_id: String,
    pub missing: Vec<&'static str>,
}

/// Names of the fields that are empty under `ruleset`.
#[must_use]
pub fn missing_fields(record: &PartRecord, ruleset: Ruleset) -> Vec<&'static str> {
    let mut missing = Vec::new();
    let mut require = |name, value: &str| {
        if value.trim().is_empty() {
            missing.push(name);
        }
    };

    require("id", &record.id);
    require("base_id", &record.base_id);
    require("part_name", &record.part_name);

    if ruleset == Ruleset::Strict {
        require("customer", &record.customer);
        require("phone", &record.phone);
        require("registration", &record.registration);
        require("status", &record.status);
    }

    missing
}

/// Convenience wrapper returning `Err` with the missing field names.
///
/// # Errors
///
/// Returns the offending field names when any required field is empty.
pub fn validate(record: &PartRecord, ruleset: Ruleset) -> Result<(), Vec<&'static str>> {
    let missing = missing_fields(record, ruleset);
    if missing.is_empty() { Ok(()) } else { Err(missing) }
}
