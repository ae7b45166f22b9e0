// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Build issue-search expressions from structured clauses instead of string concatenation
// role: query/builder
// inputs: Repository, labels, milestone title, event type and raw date bounds
// outputs: SearchQuery rendered in the issue search grammar
// invariants:
// - Each label is its own clause, so multiple labels are a conjunction
// - No label clause at all when no labels are requested
// - Quoted values escape embedded double quotes
// - Dates are normalized to YYYY-MM-DD; invalid dates abort the build
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;

use crate::error::{ReportError, Result};
use crate::model::RepoId;
use crate::window::{DateWindow, EventType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
  Repo(RepoId),
  IsIssue,
  Label(String),
  Milestone(String),
  Event { event: EventType, window: DateWindow },
}

impl fmt::Display for Clause {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Clause::Repo(repo) => write!(f, "repo:{}", repo),
      Clause::IsIssue => f.write_str("is:issue"),
      Clause::Label(name) => write!(f, "label:{}", quote(name)),
      Clause::Milestone(title) => write!(f, "milestone:{}", quote(title)),
      Clause::Event { event, window } => write!(f, "{}:{}", event, window),
    }
  }
}

fn quote(value: &str) -> String {
  format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Ordered list of clauses joined by a single space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
  clauses: Vec<Clause>,
}

impl SearchQuery {
  pub fn clauses(&self) -> &[Clause] {
    &self.clauses
  }

  pub fn milestone(&self) -> Option<&str> {
    self.clauses.iter().find_map(|c| match c {
      Clause::Milestone(title) => Some(title.as_str()),
      _ => None,
    })
  }

  pub fn window(&self) -> Option<(EventType, DateWindow)> {
    self.clauses.iter().find_map(|c| match c {
      Clause::Event { event, window } => Some((*event, *window)),
      _ => None,
    })
  }
}

impl fmt::Display for SearchQuery {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let rendered: Vec<String> = self.clauses.iter().map(|c| c.to_string()).collect();
    f.write_str(&rendered.join(" "))
  }
}

#[derive(Debug, Clone)]
pub struct QueryBuilder {
  repo: RepoId,
  labels: Vec<String>,
  milestone: Option<String>,
  window: Option<(EventType, String, String)>,
}

impl QueryBuilder {
  pub fn new(repo: RepoId) -> Self {
    Self {
      repo,
      labels: Vec::new(),
      milestone: None,
      window: None,
    }
  }

  pub fn label(mut self, name: impl Into<String>) -> Self {
    self.labels.push(name.into());
    self
  }

  pub fn labels<I, S>(mut self, names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.labels.extend(names.into_iter().map(Into::into));
    self
  }

  pub fn milestone(mut self, title: impl Into<String>) -> Self {
    self.milestone = Some(title.into());
    self
  }

  /// Restrict to issues whose `event` date falls in `start..=end` (raw user input).
  pub fn window(mut self, event: EventType, start: impl Into<String>, end: impl Into<String>) -> Self {
    self.window = Some((event, start.into(), end.into()));
    self
  }

  pub fn build(self) -> Result<SearchQuery> {
    let mut clauses = vec![Clause::Repo(self.repo), Clause::IsIssue];

    for label in self.labels {
      let label = label.trim().to_string();
      if label.is_empty() {
        return Err(ReportError::MalformedQuery("label names cannot be blank".into()));
      }
      if !clauses.contains(&Clause::Label(label.clone())) {
        clauses.push(Clause::Label(label));
      }
    }

    if let Some(title) = self.milestone {
      if title.trim().is_empty() {
        return Err(ReportError::MalformedQuery("milestone title cannot be blank".into()));
      }
      clauses.push(Clause::Milestone(title));
    }

    if let Some((event, start, end)) = self.window {
      let window = DateWindow::parse(&start, &end)?;
      clauses.push(Clause::Event { event, window });
    }

    Ok(SearchQuery { clauses })
  }
}
