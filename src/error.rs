// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Single error type for every report mode (configuration, input validation, upstream failures, output IO)
// role: errors/types
// outputs: ReportError enum and crate-wide Result alias
// invariants: Validation errors echo the offending input; upstream errors carry the HTTP status when one exists
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

/// Which upstream API a request was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
  Github,
  Zenhub,
}

impl fmt::Display for Service {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Service::Github => f.write_str("GitHub"),
      Service::Zenhub => f.write_str("ZenHub"),
    }
  }
}

#[derive(Debug, Error)]
pub enum ReportError {
  /// Missing token or unusable environment/flag combination.
  #[error("configuration error: {0}")]
  Configuration(String),

  #[error("malformed date '{input}': {reason}")]
  MalformedDate { input: String, reason: String },

  #[error("malformed query: {0}")]
  MalformedQuery(String),

  #[error("'{team}' is not a team I know about (known teams: {})", .known.join(", "))]
  UnknownTeam { team: String, known: Vec<String> },

  #[error("{service} request failed{}: {message}", .status.map(|s| format!(" with status {s}")).unwrap_or_default())]
  Upstream {
    service: Service,
    status: Option<u16>,
    message: String,
  },

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}

impl ReportError {
  pub fn malformed_date(input: &str, reason: impl Into<String>) -> Self {
    ReportError::MalformedDate {
      input: input.to_string(),
      reason: reason.into(),
    }
  }

  pub fn upstream(service: Service, status: Option<u16>, message: impl Into<String>) -> Self {
    ReportError::Upstream {
      service,
      status,
      message: message.into(),
    }
  }
}
