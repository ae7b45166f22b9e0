// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Trait seams for the two upstream APIs plus backend selection and request pacing
// role: source/namespace
// inputs: ApiConfig (tokens, base URLs); SPRINT_REPORT_TEST_* env fixtures
// outputs: Boxed IssueSource / EstimateSource implementations; Pacer
// invariants:
// - Callers receive sources explicitly; there is no process-wide client
// - Env fixtures take precedence over HTTP when any SPRINT_REPORT_TEST_* variable is set
// - Pacer spaces request starts by at least the configured delay, across threads
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod fixture;
pub mod github;
pub mod http;
pub mod zenhub;

use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::config::ApiConfig;
use crate::error::Result;
use crate::model::{EstimateRecord, Issue, Milestone, RepoId, SearchResults, StateFilter};
use crate::query::SearchQuery;

pub const FIXTURE_ENV_PREFIX: &str = "SPRINT_REPORT_TEST_";

/// Repository listing parameters.
#[derive(Debug, Clone)]
pub struct ListFilter {
  pub state: StateFilter,
  /// All of these labels must be present.
  pub labels: Vec<String>,
  /// Only issues updated at or after this instant.
  pub since: Option<DateTime<Utc>>,
}

/// Issue-tracker access. Implementations own pagination.
pub trait IssueSource {
  fn search_issues(&self, query: &SearchQuery) -> Result<SearchResults>;
  fn list_repo_issues(&self, repo: &RepoId, filter: &ListFilter) -> Result<Vec<Issue>>;
  fn list_milestones(&self, repo: &RepoId, state: StateFilter) -> Result<Vec<Milestone>>;
  fn repository_id(&self, repo: &RepoId) -> Result<u64>;
}

/// Planning-tool access. `Ok(None)` means "no record", which is not an error.
pub trait EstimateSource: Sync {
  fn issue_estimate(&self, issue_number: u64) -> Result<Option<EstimateRecord>>;
}

/// Minimum spacing between successive upstream requests.
#[derive(Debug)]
pub struct Pacer {
  delay: Duration,
  last: Mutex<Option<Instant>>,
}

impl Pacer {
  pub fn new(delay: Duration) -> Self {
    Self {
      delay,
      last: Mutex::new(None),
    }
  }

  pub fn unpaced() -> Self {
    Self::new(Duration::ZERO)
  }

  pub fn delay(&self) -> Duration {
    self.delay
  }

  /// Block until at least `delay` has passed since the previous `wait` returned.
  pub fn wait(&self) {
    if self.delay.is_zero() {
      return;
    }

    let mut last = match self.last.lock() {
      Ok(guard) => guard,
      Err(poisoned) => poisoned.into_inner(),
    };

    if let Some(prev) = *last {
      let elapsed = prev.elapsed();
      if elapsed < self.delay {
        std::thread::sleep(self.delay - elapsed);
      }
    }

    *last = Some(Instant::now());
  }
}

/// True when any SPRINT_REPORT_TEST_* fixture variable is present.
pub fn fixtures_requested() -> bool {
  std::env::vars().any(|(k, _)| k.starts_with(FIXTURE_ENV_PREFIX))
}

pub fn issue_source(api: &ApiConfig) -> Box<dyn IssueSource> {
  if fixtures_requested() {
    Box::new(fixture::EnvIssueSource)
  } else {
    Box::new(github::GithubHttpSource::new(&api.github_api_url, &api.github_token))
  }
}

pub fn estimate_source(api: &ApiConfig, repo_id: u64) -> Box<dyn EstimateSource> {
  if fixtures_requested() {
    Box::new(fixture::EnvEstimateSource)
  } else {
    Box::new(zenhub::ZenhubHttpSource::new(&api.zenhub_api_url, &api.zenhub_token, repo_id))
  }
}
