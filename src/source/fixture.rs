// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Env-backed IssueSource / EstimateSource so the binary can run end-to-end without network access
// role: source/fixtures
// inputs: SPRINT_REPORT_TEST_{SEARCH_JSON,MILESTONES_JSON,MILESTONE_ISSUES_JSON,ESTIMATES_JSON,REPO_ID}
// outputs: Same model types as the HTTP sources
// invariants:
// - Payloads use the upstream wire shapes and go through the same raw→model mapping
// - Unset variables behave like empty upstream responses; malformed JSON is an error
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::error::{ReportError, Result};
use crate::model::{EstimateRecord, Issue, Milestone, RepoId, SearchResults, StateFilter};
use crate::query::SearchQuery;
use crate::source::github::{issues_from_raw, RawIssue, RawMilestone};
use crate::source::zenhub::RawIssueData;
use crate::source::{EstimateSource, IssueSource, ListFilter};

pub const SEARCH_JSON: &str = "SPRINT_REPORT_TEST_SEARCH_JSON";
pub const MILESTONES_JSON: &str = "SPRINT_REPORT_TEST_MILESTONES_JSON";
pub const MILESTONE_ISSUES_JSON: &str = "SPRINT_REPORT_TEST_MILESTONE_ISSUES_JSON";
pub const ESTIMATES_JSON: &str = "SPRINT_REPORT_TEST_ESTIMATES_JSON";
pub const REPO_ID: &str = "SPRINT_REPORT_TEST_REPO_ID";

fn read_env_json<T: DeserializeOwned>(key: &str) -> Result<Option<T>> {
  match std::env::var(key) {
    Ok(s) => Ok(Some(serde_json::from_str::<T>(&s)?)),
    Err(_) => Ok(None),
  }
}

pub struct EnvIssueSource;

impl EnvIssueSource {
  fn all_issues(&self) -> Result<Vec<Issue>> {
    let raw = read_env_json::<Vec<RawIssue>>(SEARCH_JSON)?.unwrap_or_default();
    Ok(issues_from_raw(raw))
  }
}

impl IssueSource for EnvIssueSource {
  fn search_issues(&self, query: &SearchQuery) -> Result<SearchResults> {
    let items = match query.milestone() {
      Some(title) => {
        let mut by_title = read_env_json::<HashMap<String, Vec<RawIssue>>>(MILESTONE_ISSUES_JSON)?.unwrap_or_default();
        issues_from_raw(by_title.remove(title).unwrap_or_default())
      }
      None => self.all_issues()?,
    };

    Ok(SearchResults {
      total_count: items.len() as u64,
      items,
    })
  }

  fn list_repo_issues(&self, _repo: &RepoId, filter: &ListFilter) -> Result<Vec<Issue>> {
    let since = filter.since;
    Ok(
      self
        .all_issues()?
        .into_iter()
        .filter(|i| since.map(|s| i.updated_at >= s).unwrap_or(true))
        .collect(),
    )
  }

  fn list_milestones(&self, _repo: &RepoId, _state: StateFilter) -> Result<Vec<Milestone>> {
    let raw = read_env_json::<Vec<RawMilestone>>(MILESTONES_JSON)?.unwrap_or_default();
    Ok(raw.into_iter().map(Milestone::from).collect())
  }

  fn repository_id(&self, _repo: &RepoId) -> Result<u64> {
    match std::env::var(REPO_ID) {
      Ok(s) => s
        .trim()
        .parse::<u64>()
        .map_err(|e| ReportError::Configuration(format!("{REPO_ID} must be a number: {e}"))),
      Err(_) => Ok(1),
    }
  }
}

pub struct EnvEstimateSource;

impl EstimateSource for EnvEstimateSource {
  fn issue_estimate(&self, issue_number: u64) -> Result<Option<EstimateRecord>> {
    let mut by_number = read_env_json::<HashMap<String, Option<RawIssueData>>>(ESTIMATES_JSON)?.unwrap_or_default();
    Ok(
      by_number
        .remove(&issue_number.to_string())
        .flatten()
        .map(EstimateRecord::from),
    )
  }
}
