// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: GitHub REST implementation of IssueSource (search, repository listing, milestones, repository id)
// role: source/github
// inputs: Bearer token, API base URL, typed queries
// outputs: Issues and milestones mapped from raw API records
// side_effects: Network calls to the GitHub API
// invariants:
// - Pagination follows Link rel="next" until exhausted; callers never see page cursors
// - Pull requests returned by listings are dropped
// - Raw optional fields are resolved here, once, into model types
// errors: Non-2xx and transport failures surface as ReportError::Upstream { service: GitHub }
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, Service};
use crate::model::{Issue, Milestone, RepoId, SearchResults, StateFilter};
use crate::query::SearchQuery;
use crate::source::http::HttpClient;
use crate::source::{IssueSource, ListFilter};

const PER_PAGE: &str = "100";
// Hard stop for runaway pagination; the search API itself caps at 1000 results.
const MAX_PAGES: usize = 100;

#[derive(Debug, Deserialize)]
pub(crate) struct RawLabel {
  pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMilestoneRef {
  pub title: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawIssue {
  pub number: u64,
  pub title: String,
  pub html_url: String,
  #[serde(default)]
  pub labels: Vec<RawLabel>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  #[serde(default)]
  pub closed_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub milestone: Option<RawMilestoneRef>,
  #[serde(default)]
  pub pull_request: Option<serde_json::Value>,
}

impl RawIssue {
  pub fn is_pull_request(&self) -> bool {
    self.pull_request.is_some()
  }
}

impl From<RawIssue> for Issue {
  fn from(raw: RawIssue) -> Self {
    Issue {
      number: raw.number,
      title: raw.title,
      url: raw.html_url,
      labels: raw.labels.into_iter().map(|l| l.name).collect(),
      created_at: raw.created_at,
      updated_at: raw.updated_at,
      closed_at: raw.closed_at,
      milestone: raw.milestone.map(|m| m.title),
    }
  }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMilestone {
  pub number: u64,
  pub title: String,
  #[serde(default)]
  pub due_on: Option<DateTime<Utc>>,
}

impl From<RawMilestone> for Milestone {
  fn from(raw: RawMilestone) -> Self {
    Milestone {
      number: raw.number,
      title: raw.title,
      due_on: raw.due_on,
    }
  }
}

#[derive(Debug, Deserialize)]
struct RawSearch {
  total_count: u64,
  #[serde(default)]
  items: Vec<RawIssue>,
}

#[derive(Debug, Deserialize)]
struct RawRepository {
  id: u64,
}

/// Keep issues, drop pull requests, map to the model.
pub(crate) fn issues_from_raw(raw: Vec<RawIssue>) -> Vec<Issue> {
  raw
    .into_iter()
    .filter(|r| !r.is_pull_request())
    .map(Issue::from)
    .collect()
}

pub struct GithubHttpSource {
  http: HttpClient,
}

impl GithubHttpSource {
  pub fn new(base_url: &str, token: &str) -> Self {
    Self {
      http: HttpClient::new(Service::Github, base_url, "Authorization", format!("Bearer {}", token)),
    }
  }

  /// Collect every element of a paginated array endpoint.
  fn collect_pages<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<T>> {
    let mut out: Vec<T> = Vec::new();
    let mut page = self.http.get_json::<Vec<T>>(&self.http.url(path), query)?;
    let mut fetched = 1;

    loop {
      out.extend(page.body);

      match page.next {
        Some(next) if fetched < MAX_PAGES => {
          page = self.http.get_json::<Vec<T>>(&next, &[])?;
          fetched += 1;
        }
        _ => break,
      }
    }

    debug!(path, pages = fetched, items = out.len(), "collected pages");
    Ok(out)
  }
}

impl IssueSource for GithubHttpSource {
  fn search_issues(&self, query: &SearchQuery) -> Result<SearchResults> {
    let params = [("q", query.to_string()), ("per_page", PER_PAGE.to_string())];
    let first = self.http.get_json::<RawSearch>(&self.http.url("/search/issues"), &params)?;

    let total_count = first.body.total_count;
    let mut raw = first.body.items;
    let mut next = first.next;
    let mut fetched = 1;

    while let Some(url) = next.take() {
      if fetched >= MAX_PAGES {
        break;
      }
      let page = self.http.get_json::<RawSearch>(&url, &[])?;
      raw.extend(page.body.items);
      next = page.next;
      fetched += 1;
    }

    Ok(SearchResults {
      total_count,
      items: issues_from_raw(raw),
    })
  }

  fn list_repo_issues(&self, repo: &RepoId, filter: &ListFilter) -> Result<Vec<Issue>> {
    let mut params = vec![
      ("state", filter.state.as_str().to_string()),
      ("per_page", PER_PAGE.to_string()),
    ];

    if !filter.labels.is_empty() {
      params.push(("labels", filter.labels.join(",")));
    }
    if let Some(since) = filter.since {
      params.push(("since", since.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)));
    }

    let path = format!("/repos/{}/{}/issues", repo.owner, repo.name);
    let raw = self.collect_pages::<RawIssue>(&path, &params)?;
    Ok(issues_from_raw(raw))
  }

  fn list_milestones(&self, repo: &RepoId, state: StateFilter) -> Result<Vec<Milestone>> {
    let params = [
      ("state", state.as_str().to_string()),
      ("sort", "due_on".to_string()),
      ("direction", "desc".to_string()),
      ("per_page", PER_PAGE.to_string()),
    ];
    let path = format!("/repos/{}/{}/milestones", repo.owner, repo.name);
    let raw = self.collect_pages::<RawMilestone>(&path, &params)?;
    Ok(raw.into_iter().map(Milestone::from).collect())
  }

  fn repository_id(&self, repo: &RepoId) -> Result<u64> {
    let path = format!("/repos/{}/{}", repo.owner, repo.name);
    let page = self.http.get_json::<RawRepository>(&self.http.url(&path), &[])?;
    Ok(page.body.id)
  }
}
