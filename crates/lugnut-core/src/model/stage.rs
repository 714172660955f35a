use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The five stage collections a part order can live in.
///
/// A record exists in exactly one stage at any instant; the transition
/// engine is the only code allowed to move records between stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Orders,
    Main,
    Booking,
    Call,
    Archive,
}

impl Stage {
    /// All stages in workflow order.
    pub const ALL: [Self; 5] = [
        Self::Orders,
        Self::Main,
        Self::Booking,
        Self::Call,
        Self::Archive,
    ];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Orders => "orders",
            Self::Main => "main",
            Self::Booking => "booking",
            Self::Call => "call",
            Self::Archive => "archive",
        }
    }

    /// Tracking-id prefix for records in this stage.
    ///
    /// The mapping is fixed; downstream collaborators parse tracking ids by
    /// prefix, so these strings must not change.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Orders => "ORD",
            Self::Main => "MAIN",
            Self::Booking => "BOOK",
            Self::Call => "CALL",
            Self::Archive => "ARCH",
        }
    }

    /// Status applied to a record when it arrives in this stage.
    #[must_use]
    pub const fn canonical_status(self) -> &'static str {
        match self {
            Self::Orders => "Ordered",
            Self::Main => "Pending",
            Self::Booking => "Booked",
            Self::Call => "Awaiting Call",
            Self::Archive => "Archived",
        }
    }

    /// Hash-tag written into audit notes for transitions into this stage.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        self.as_str()
    }

    /// Build the stage-prefixed tracking id for a base id.
    #[must_use]
    pub fn tracking_id(self, base_id: &str) -> String {
        format!("{}-{base_id}", self.prefix())
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a stage name from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStageError {
    pub got: String,
}

impl fmt::Display for ParseStageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid stage '{}': expected one of orders, main, booking, call, archive",
            self.got
        )
    }
}

impl std::error::Error for ParseStageError {}

impl FromStr for Stage {
    type Err = ParseStageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "orders" => Ok(Self::Orders),
            "main" => Ok(Self::Main),
            "booking" => Ok(Self::Booking),
            "call" => Ok(Self::Call),
            "archive" => Ok(Self::Archive),
            _ => Err(ParseStageError { got: s.to_string() }),
        }
    }
}
