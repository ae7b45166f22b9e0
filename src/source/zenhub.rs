// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: ZenHub REST implementation of EstimateSource (estimate, epic flag, pipeline per issue)
// role: source/zenhub
// inputs: ZenHub token, API base URL, GitHub numeric repository id, issue number
// outputs: Option<EstimateRecord>
// side_effects: Network calls to the ZenHub API
// invariants: A missing record (404 or null body) is Ok(None), never an error
// errors: Other non-2xx and transport failures surface as ReportError::Upstream { service: ZenHub }
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::Deserialize;

use crate::error::{Result, Service};
use crate::model::EstimateRecord;
use crate::source::http::HttpClient;
use crate::source::EstimateSource;

#[derive(Debug, Deserialize)]
pub(crate) struct RawEstimate {
  pub value: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPipeline {
  pub name: Option<String>,
}

/// Subset of `GET /p1/repositories/:repo_id/issues/:issue_number`.
#[derive(Debug, Deserialize)]
pub(crate) struct RawIssueData {
  #[serde(default)]
  pub estimate: Option<RawEstimate>,
  #[serde(default)]
  pub is_epic: Option<bool>,
  #[serde(default)]
  pub pipeline: Option<RawPipeline>,
}

impl From<RawIssueData> for EstimateRecord {
  fn from(raw: RawIssueData) -> Self {
    EstimateRecord {
      estimate: raw.estimate.and_then(|e| e.value),
      is_epic: raw.is_epic,
      pipeline: raw.pipeline.and_then(|p| p.name),
    }
  }
}

pub struct ZenhubHttpSource {
  http: HttpClient,
  repo_id: u64,
}

impl ZenhubHttpSource {
  pub fn new(base_url: &str, token: &str, repo_id: u64) -> Self {
    Self {
      http: HttpClient::new(Service::Zenhub, base_url, "X-Authentication-Token", token.to_string()),
      repo_id,
    }
  }
}

impl EstimateSource for ZenhubHttpSource {
  fn issue_estimate(&self, issue_number: u64) -> Result<Option<EstimateRecord>> {
    let url = self
      .http
      .url(&format!("/p1/repositories/{}/issues/{}", self.repo_id, issue_number));
    let raw = self.http.get_optional_json::<RawIssueData>(&url)?;
    Ok(raw.map(EstimateRecord::from))
  }
}
