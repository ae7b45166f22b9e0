// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Load API credentials and endpoints from the environment
// role: config/env
// inputs: GITHUB_PAT (or GITHUB_TOKEN), ZENHUB_PAT, optional GITHUB_API_URL / ZENHUB_API_URL
// outputs: ApiConfig
// invariants:
// - Both tokens are required; empty or whitespace-only values count as missing
// - Loading performs no network access
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::error::{ReportError, Result};

pub const GITHUB_TOKEN_VARS: [&str; 2] = ["GITHUB_PAT", "GITHUB_TOKEN"];
pub const ZENHUB_TOKEN_VAR: &str = "ZENHUB_PAT";
pub const GITHUB_API_URL_VAR: &str = "GITHUB_API_URL";
pub const ZENHUB_API_URL_VAR: &str = "ZENHUB_API_URL";

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_ZENHUB_API_URL: &str = "https://api.zenhub.com";

#[derive(Clone)]
pub struct ApiConfig {
  pub github_token: String,
  pub zenhub_token: String,
  pub github_api_url: String,
  pub zenhub_api_url: String,
}

impl std::fmt::Debug for ApiConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ApiConfig")
      .field("github_token", &"<redacted>")
      .field("zenhub_token", &"<redacted>")
      .field("github_api_url", &self.github_api_url)
      .field("zenhub_api_url", &self.zenhub_api_url)
      .finish()
  }
}

fn non_blank_var(key: &str) -> Option<String> {
  std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl ApiConfig {
  pub fn from_env() -> Result<Self> {
    let github_token = GITHUB_TOKEN_VARS.iter().find_map(|k| non_blank_var(k));
    let zenhub_token = non_blank_var(ZENHUB_TOKEN_VAR);

    let (github_token, zenhub_token) = match (github_token, zenhub_token) {
      (Some(g), Some(z)) => (g, z),
      (g, z) => {
        let mut missing = Vec::new();
        if g.is_none() {
          missing.push("GITHUB_PAT");
        }
        if z.is_none() {
          missing.push(ZENHUB_TOKEN_VAR);
        }
        return Err(ReportError::Configuration(format!(
          "please configure your GitHub and ZenHub personal access tokens; missing: {}",
          missing.join(", ")
        )));
      }
    };

    Ok(Self {
      github_token,
      zenhub_token,
      github_api_url: non_blank_var(GITHUB_API_URL_VAR).unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
      zenhub_api_url: non_blank_var(ZENHUB_API_URL_VAR).unwrap_or_else(|| DEFAULT_ZENHUB_API_URL.to_string()),
    })
  }
}
