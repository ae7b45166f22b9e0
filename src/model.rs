// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the typed records shared by sources, normalization, aggregation and rendering
// role: model/types
// outputs: Issue, Milestone, EstimateRecord, SprintMilestone, SprintSummary and small value types
// invariants:
// - Optional upstream fields are resolved once at the source boundary; these types carry explicit Option semantics
// - An absent estimate counts as zero points and never propagates as a missing total
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::window::EventType;

/// `owner/name` repository identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoId {
  pub owner: String,
  pub name: String,
}

impl FromStr for RepoId {
  type Err = ReportError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let trimmed = s.trim();
    let mut parts = trimmed.split('/');

    match (parts.next(), parts.next(), parts.next()) {
      (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() && !owner.contains(' ') && !name.contains(' ') => {
        Ok(RepoId {
          owner: owner.to_string(),
          name: name.to_string(),
        })
      }
      _ => Err(ReportError::MalformedQuery(format!(
        "repository must look like 'owner/name', got '{}'",
        s
      ))),
    }
  }
}

impl fmt::Display for RepoId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.owner, self.name)
  }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum StateFilter {
  Open,
  Closed,
  All,
}

impl StateFilter {
  pub fn as_str(&self) -> &'static str {
    match self {
      StateFilter::Open => "open",
      StateFilter::Closed => "closed",
      StateFilter::All => "all",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
  pub number: u64,
  pub title: String,
  pub url: String,
  pub labels: BTreeSet<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub closed_at: Option<DateTime<Utc>>,
  pub milestone: Option<String>,
}

impl Issue {
  /// Timestamp selected by `event`; `None` only for unclosed issues.
  pub fn event_time(&self, event: EventType) -> Option<DateTime<Utc>> {
    match event {
      EventType::Created => Some(self.created_at),
      EventType::Updated => Some(self.updated_at),
      EventType::Closed => self.closed_at,
    }
  }

  pub fn has_label(&self, name: &str) -> bool {
    self.labels.contains(name)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Milestone {
  pub number: u64,
  pub title: String,
  pub due_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
  pub total_count: u64,
  pub items: Vec<Issue>,
}

/// Planning data for one issue. `Default` is the "no record" value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EstimateRecord {
  pub estimate: Option<f64>,
  pub is_epic: Option<bool>,
  pub pipeline: Option<String>,
}

impl EstimateRecord {
  pub fn points(&self) -> f64 {
    self.estimate.unwrap_or(0.0)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimatedIssue {
  pub issue: Issue,
  pub estimate: EstimateRecord,
}

/// A milestone with its member issues already joined to estimates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SprintMilestone {
  pub milestone: Milestone,
  pub issues: Vec<EstimatedIssue>,
}

/// Per-milestone point totals.
///
/// `velocity == bug_points + task_points + qa_points + feature_points`; the
/// remaining four are overlay tags and may overlap with anything.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SprintSummary {
  pub number: u64,
  pub title: String,
  pub due_on: Option<DateTime<Utc>>,
  pub velocity: f64,
  pub bug_points: f64,
  pub task_points: f64,
  pub qa_points: f64,
  pub feature_points: f64,
  pub carryover: f64,
  pub post_planning: f64,
  pub frontend: f64,
  pub backend: f64,
}

impl SprintSummary {
  pub fn empty(milestone: &Milestone) -> Self {
    Self {
      number: milestone.number,
      title: milestone.title.clone(),
      due_on: milestone.due_on,
      velocity: 0.0,
      bug_points: 0.0,
      task_points: 0.0,
      qa_points: 0.0,
      feature_points: 0.0,
      carryover: 0.0,
      post_planning: 0.0,
      frontend: 0.0,
      backend: 0.0,
    }
  }
}

/// One rolling-week count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyCount {
  pub start: chrono::NaiveDate,
  pub end: chrono::NaiveDate,
  pub count: usize,
}
