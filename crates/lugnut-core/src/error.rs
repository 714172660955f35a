use crate::remote::RemoteError;
use crate::validate::RowIssues;
use std::fmt;
use thiserror::Error;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    StrictValidationFailed,
    DuplicateRecord,
    CommitNotFound,
    RemoteRestoreFailed,
    RemoteHydrateFailed,
    RefDataParseError,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::StrictValidationFailed => "E2001",
            Self::DuplicateRecord => "E2002",
            Self::CommitNotFound => "E3001",
            Self::RemoteRestoreFailed => "E5001",
            Self::RemoteHydrateFailed => "E5002",
            Self::RefDataParseError => "E1001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::StrictValidationFailed => "Strict validation failed",
            Self::DuplicateRecord => "Record id already exists",
            Self::CommitNotFound => "Ledger commit not found",
            Self::RemoteRestoreFailed => "Remote snapshot restore failed",
            Self::RemoteHydrateFailed => "Remote hydrate failed",
            Self::RefDataParseError => "Reference data parse error",
        }
    }

    /// Optional remediation hint for operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::StrictValidationFailed => {
                Some("Complete the listed fields within the grace window and resubmit.")
            }
            Self::DuplicateRecord => Some("Use a fresh record id or edit the existing record."),
            Self::CommitNotFound => {
                Some("List ledger commits; entries expire after 48 hours or 50 commits.")
            }
            Self::RemoteRestoreFailed => {
                Some("Local state is unchanged. Retry once the store is reachable.")
            }
            Self::RemoteHydrateFailed => Some("Check the store connection and retry."),
            Self::RefDataParseError => Some("Fix syntax in refdata.toml and retry."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors surfaced by workflow operations.
///
/// Synchronous mutation paths either complete or return `Validation` /
/// `DuplicateRecord` before touching any state; `RemoteSync` is only
/// produced by the remote-first restore path, after which local state is
/// guaranteed untouched.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("strict validation failed for {} record(s)", rows.len())]
    Validation { rows: Vec<RowIssues> },

    #[error("record '{0}' already exists on the board")]
    DuplicateRecord(String),

    #[error("commit '{0}' not found in the ledger")]
    CommitNotFound(String),

    #[error("remote snapshot restore failed: {0}")]
    RemoteSync(#[source] RemoteError),

    #[error("failed to hydrate stage collections: {0}")]
    Hydrate(#[source] RemoteError),
}

impl WorkflowError {
    /// The machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::StrictValidationFailed,
            Self::DuplicateRecord(_) => ErrorCode::DuplicateRecord,
            Self::CommitNotFound(_) => ErrorCode::CommitNotFound,
            Self::RemoteSync(_) => ErrorCode::RemoteRestoreFailed,
            Self::Hydrate(_) => ErrorCode::RemoteHydrateFailed,
        }
    }
}
