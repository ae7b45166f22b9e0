// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Blocking JSON-over-HTTP plumbing shared by the GitHub and ZenHub sources
// role: source/http
// inputs: Base URL, auth header, request path and query pairs
// outputs: Decoded bodies plus the next-page URL from the Link header
// side_effects: Network calls
// invariants:
// - Non-2xx responses become ReportError::Upstream with the status and the body's `message` when present
// - 404 is surfaced as None only through get_optional_json
// - No retries here; one request per call
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ReportError, Result, Service};

const USER_AGENT: &str = "sprint-report";

/// A decoded response body and the `rel="next"` URL, if the server sent one.
#[derive(Debug)]
pub struct Page<T> {
  pub body: T,
  pub next: Option<String>,
}

pub struct HttpClient {
  agent: ureq::Agent,
  service: Service,
  base_url: String,
  auth_header: &'static str,
  auth_value: String,
}

impl HttpClient {
  pub fn new(service: Service, base_url: &str, auth_header: &'static str, auth_value: String) -> Self {
    let agent = ureq::AgentBuilder::new()
      .timeout_connect(Duration::from_secs(10))
      .timeout_read(Duration::from_secs(60))
      .build();

    Self {
      agent,
      service,
      base_url: base_url.trim_end_matches('/').to_string(),
      auth_header,
      auth_value,
    }
  }

  /// Absolute URL for an API path such as `/repos/o/r/issues`.
  pub fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }

  fn call(&self, url: &str, query: &[(&str, String)]) -> std::result::Result<ureq::Response, ureq::Error> {
    debug!(service = %self.service, url, "GET");

    let mut req = self
      .agent
      .get(url)
      .set("Accept", "application/json")
      .set("User-Agent", USER_AGENT)
      .set(self.auth_header, &self.auth_value);

    for (k, v) in query {
      req = req.query(k, v);
    }

    req.call()
  }

  /// GET `url` and decode JSON. `url` may be a next-page link (query already embedded).
  pub fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<Page<T>> {
    match self.call(url, query) {
      Ok(resp) => self.decode(resp),
      Err(err) => Err(self.to_report_error(err)),
    }
  }

  /// Like `get_json`, but a 404 is `Ok(None)`.
  pub fn get_optional_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
    match self.call(url, &[]) {
      Ok(resp) => self.decode::<Option<T>>(resp).map(|page| page.body),
      Err(ureq::Error::Status(404, _)) => Ok(None),
      Err(err) => Err(self.to_report_error(err)),
    }
  }

  fn decode<T: DeserializeOwned>(&self, resp: ureq::Response) -> Result<Page<T>> {
    let next = next_link(resp.header("link"));
    let status = resp.status();
    let body = resp
      .into_json::<T>()
      .map_err(|e| ReportError::upstream(self.service, Some(status), format!("invalid JSON body: {e}")))?;

    Ok(Page { body, next })
  }

  fn to_report_error(&self, err: ureq::Error) -> ReportError {
    match err {
      ureq::Error::Status(code, resp) => {
        let text = resp.into_string().unwrap_or_default();
        ReportError::upstream(self.service, Some(code), error_message(&text))
      }
      ureq::Error::Transport(t) => ReportError::upstream(self.service, None, t.to_string()),
    }
  }
}

/// Prefer the API's `{"message": ...}` field; fall back to the raw body.
fn error_message(body: &str) -> String {
  let from_json = serde_json::from_str::<serde_json::Value>(body)
    .ok()
    .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(|s| s.to_string()));

  match from_json {
    Some(msg) => msg,
    None if body.trim().is_empty() => "empty response body".to_string(),
    None => body.trim().to_string(),
  }
}

/// Extract the `rel="next"` target from an RFC 5988 Link header.
pub fn next_link(header: Option<&str>) -> Option<String> {
  static RE_NEXT: Lazy<regex::Regex> =
    Lazy::new(|| regex::Regex::new(r#"<([^>]+)>\s*;\s*rel="next""#).unwrap());

  let header = header?;
  header
    .split(',')
    .find_map(|part| RE_NEXT.captures(part.trim()))
    .and_then(|c| c.get(1))
    .map(|m| m.as_str().to_string())
}
