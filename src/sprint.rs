// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Sprint pipeline: pick a team's milestones, join milestone issues with estimates, total points per milestone
// role: processing/sprint
// inputs: Milestones and issues from an IssueSource; estimates from an EstimateSource
// outputs: Vec<SprintSummary> in milestone order
// side_effects: One search per milestone and one estimate lookup per issue (through the sources)
// invariants:
// - velocity == bug + task + qa + feature for every summary (first match: Bug > Task > QA Task > feature)
// - Carryover / Post Planning / Frontend / Backend are independent overlays
// - Milestones without issues still produce an all-zero summary
// - Unknown teams are rejected before any source is touched
// - Issue order inside a milestone is preserved, including with a worker pool
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{ReportError, Result};
use crate::model::{EstimatedIssue, Issue, Milestone, RepoId, SprintMilestone, SprintSummary};
use crate::query::{QueryBuilder, SearchQuery};
use crate::source::{EstimateSource, IssueSource, Pacer};

pub const KNOWN_TEAMS: [&str; 4] = ["mls", "lender", "manager", "borrower"];

pub const LABEL_BUG: &str = "Bug";
pub const LABEL_TASK: &str = "Task";
pub const LABEL_QA_TASK: &str = "QA Task";
pub const LABEL_CARRYOVER: &str = "Carryover";
pub const LABEL_POST_PLANNING: &str = "Post Planning";
pub const LABEL_FRONTEND: &str = "Frontend";
pub const LABEL_BACKEND: &str = "Backend";

/// Mutually exclusive work category of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
  Bug,
  Task,
  Qa,
  Feature,
}

impl Category {
  pub fn of(issue: &Issue) -> Self {
    if issue.has_label(LABEL_BUG) {
      Category::Bug
    } else if issue.has_label(LABEL_TASK) {
      Category::Task
    } else if issue.has_label(LABEL_QA_TASK) {
      Category::Qa
    } else {
      Category::Feature
    }
  }
}

/// Reject team keywords outside the known set. Case-insensitive.
pub fn validate_team(team: &str) -> Result<()> {
  let lowered = team.trim().to_lowercase();

  if KNOWN_TEAMS.contains(&lowered.as_str()) {
    Ok(())
  } else {
    Err(ReportError::UnknownTeam {
      team: team.to_string(),
      known: KNOWN_TEAMS.iter().map(|t| t.to_string()).collect(),
    })
  }
}

/// Milestones whose title contains `team`, ignoring case.
pub fn filter_team(milestones: Vec<Milestone>, team: &str) -> Result<Vec<Milestone>> {
  validate_team(team)?;

  let pattern = regex::RegexBuilder::new(&regex::escape(team.trim()))
    .case_insensitive(true)
    .build()
    .map_err(|e| ReportError::MalformedQuery(format!("team pattern: {e}")))?;

  Ok(milestones.into_iter().filter(|m| pattern.is_match(&m.title)).collect())
}

fn estimate_for(estimates: &dyn EstimateSource, pacer: &Pacer, issue: Issue) -> Result<EstimatedIssue> {
  pacer.wait();
  debug!(issue = issue.number, "fetching estimate");
  let estimate = estimates.issue_estimate(issue.number)?.unwrap_or_default();
  Ok(EstimatedIssue { issue, estimate })
}

fn join_estimates(
  estimates: &dyn EstimateSource,
  pacer: &Pacer,
  issues: Vec<Issue>,
  pool: Option<&rayon::ThreadPool>,
) -> Result<Vec<EstimatedIssue>> {
  match pool {
    // indexed parallel iterators collect in input order
    Some(pool) if issues.len() > 1 => pool.install(|| {
      issues
        .into_par_iter()
        .map(|i| estimate_for(estimates, pacer, i))
        .collect::<Result<Vec<_>>>()
    }),
    _ => issues.into_iter().map(|i| estimate_for(estimates, pacer, i)).collect(),
  }
}

/// Fetch each milestone's issues and join them with estimates.
///
/// `on_query` sees every milestone search before it is sent.
pub fn collect_sprints(
  issues: &dyn IssueSource,
  estimates: &dyn EstimateSource,
  repo: &RepoId,
  milestones: Vec<Milestone>,
  workers: usize,
  pacer: &Pacer,
  on_query: &mut dyn FnMut(&SearchQuery) -> Result<()>,
) -> Result<Vec<SprintMilestone>> {
  let pool = if workers > 1 {
    let built = rayon::ThreadPoolBuilder::new()
      .num_threads(workers)
      .build()
      .map_err(|e| ReportError::Configuration(format!("estimate worker pool: {e}")))?;
    Some(built)
  } else {
    None
  };

  let mut out = Vec::with_capacity(milestones.len());

  for milestone in milestones {
    info!(milestone = %milestone.title, "fetching issues for milestone");

    let query = QueryBuilder::new(repo.clone()).milestone(milestone.title.clone()).build()?;
    on_query(&query)?;
    pacer.wait();
    let found = issues.search_issues(&query)?;

    let joined = join_estimates(estimates, pacer, found.items, pool.as_ref())?;
    out.push(SprintMilestone {
      milestone,
      issues: joined,
    });
  }

  Ok(out)
}

pub fn summarize_sprint(sprint: &SprintMilestone) -> SprintSummary {
  let mut s = SprintSummary::empty(&sprint.milestone);

  for item in &sprint.issues {
    let points = item.estimate.points();
    let issue = &item.issue;

    match Category::of(issue) {
      Category::Bug => s.bug_points += points,
      Category::Task => s.task_points += points,
      Category::Qa => s.qa_points += points,
      Category::Feature => s.feature_points += points,
    }

    if issue.has_label(LABEL_CARRYOVER) {
      s.carryover += points;
    }
    if issue.has_label(LABEL_POST_PLANNING) {
      s.post_planning += points;
    }
    if issue.has_label(LABEL_FRONTEND) {
      s.frontend += points;
    }
    if issue.has_label(LABEL_BACKEND) {
      s.backend += points;
    }
  }

  // derived, so it always equals the sum of the exclusive buckets
  s.velocity = s.bug_points + s.task_points + s.qa_points + s.feature_points;
  s
}

pub fn summarize_sprints(sprints: &[SprintMilestone]) -> Vec<SprintSummary> {
  sprints.iter().map(summarize_sprint).collect()
}
