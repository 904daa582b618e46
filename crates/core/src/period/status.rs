//! Period lifecycle status.

use serde::{Deserialize, Serialize};

/// Status of a monthly or annual period.
///
/// A closed period is frozen: its counters and balances never change again,
/// except by a rollover re-opening the current month of a new year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    /// Period accepts movements.
    Open,
    /// Period is frozen.
    Closed,
}

impl PeriodStatus {
    /// Returns true if movements can be posted to this period.
    #[must_use]
    pub const fn allows_posting(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Storage tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl std::fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_posting() {
        assert!(PeriodStatus::Open.allows_posting());
        assert!(!PeriodStatus::Closed.allows_posting());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&PeriodStatus::Closed).unwrap();
        assert_eq!(json, "\"closed\"");
    }
}
