// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Apply label and date filters to fetched issues and order them by the chosen event timestamp
// role: processing/filters
// inputs: Issues from an IssueSource; IssueFilter built from CLI flags
// outputs: Filtered, sorted Vec<Issue>
// invariants:
// - Required labels: keep only supersets of the required set
// - Date window: calendar date of the event timestamp (UTC), inclusive; unclosed issues never match a `closed` window
// - Exclusion runs last, after inclusion and date filtering
// - Sort ascending by event timestamp; missing timestamps first; stable for ties
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeSet;

use crate::model::Issue;
use crate::window::{DateWindow, EventType};

#[derive(Debug, Clone)]
pub struct IssueFilter {
  pub required_labels: BTreeSet<String>,
  pub excluded_labels: BTreeSet<String>,
  pub event: EventType,
  pub window: Option<DateWindow>,
}

impl IssueFilter {
  pub fn new(event: EventType) -> Self {
    Self {
      required_labels: BTreeSet::new(),
      excluded_labels: BTreeSet::new(),
      event,
      window: None,
    }
  }

  pub fn require<I, S>(mut self, labels: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.required_labels.extend(labels.into_iter().map(Into::into));
    self
  }

  pub fn exclude<I, S>(mut self, labels: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.excluded_labels.extend(labels.into_iter().map(Into::into));
    self
  }

  pub fn within(mut self, window: DateWindow) -> Self {
    self.window = Some(window);
    self
  }

  fn has_required(&self, issue: &Issue) -> bool {
    self.required_labels.is_subset(&issue.labels)
  }

  fn in_window(&self, issue: &Issue) -> bool {
    let Some(window) = self.window else { return true };

    match issue.event_time(self.event) {
      Some(ts) => window.contains(ts.date_naive()),
      None => false,
    }
  }

  fn is_excluded(&self, issue: &Issue) -> bool {
    !self.excluded_labels.is_disjoint(&issue.labels)
  }

  /// Run all filters and sort the survivors.
  pub fn apply(&self, issues: Vec<Issue>) -> Vec<Issue> {
    let mut kept: Vec<Issue> = issues
      .into_iter()
      .filter(|i| self.has_required(i))
      .filter(|i| self.in_window(i))
      .filter(|i| !self.is_excluded(i))
      .collect();

    let event = self.event;
    kept.sort_by_key(|i| i.event_time(event));
    kept
  }
}

/// Split a comma-separated label list, dropping blanks.
pub fn split_labels(raw: &str) -> Vec<String> {
  raw
    .split(',')
    .map(|s| s.trim())
    .filter(|s| !s.is_empty())
    .map(|s| s.to_string())
    .collect()
}
