use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity label attached to the outgoing event, derived from the alert's
/// numeric rule level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a numeric rule level onto a severity label.
///
/// The arm order is load-bearing: `>= 10` shadows `>= 13`, so this function
/// never yields `Severity::Error`. Levels 10 and up all page as `critical`,
/// and downstream routing depends on exactly that bucketing, so the chain is
/// kept as deployed rather than re-ordered. Negative levels are accepted and
/// classify as `info`.
pub fn classify_severity(level: i64) -> Severity {
    if level >= 10 {
        Severity::Critical
    } else if level >= 13 {
        Severity::Error
    } else if level >= 7 {
        Severity::Warning
    } else {
        Severity::Info
    }
}
