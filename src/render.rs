// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Serialize issues, sprint summaries, and weekly counts to CSV files or console text
// role: rendering/output
// inputs: Normalized issues, SprintSummary list, WeeklyCount list, display zone, output directory
// outputs: CSV bytes on any Write; timestamped CSV files; console summary strings; JSON summary
// invariants:
// - Header row is always written, even with zero data rows
// - Column order is fixed per export shape
// - Report files are written to a temp file in the target directory and persisted without clobbering
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::Result;
use crate::model::{EstimatedIssue, Issue, SprintMilestone, SprintSummary, WeeklyCount};
use crate::util::{self, DisplayTz};
use crate::window::{DateWindow, EventType};

pub const ISSUE_HEADER: [&str; 7] = ["ID", "Title", "URL", "Labels", "Created", "Updated", "Closed"];
pub const SPRINT_HEADER: [&str; 12] = [
  "ID",
  "Title",
  "End",
  "Velocity",
  "Bugs",
  "Tasks",
  "QA",
  "Features",
  "Carryover",
  "Post_Planning",
  "Frontend",
  "Backend",
];
pub const WEEKLY_HEADER: [&str; 3] = ["Start", "End", "Count"];

pub const ISSUES_PREFIX: &str = "issues";
pub const WEEKLY_PREFIX: &str = "weekly";
pub const SPRINT_PREFIX: &str = "sprintdata";

fn due_date(summary: &SprintSummary) -> String {
  summary.due_on.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

fn joined_labels(issue: &Issue) -> String {
  issue.labels.iter().map(String::as_str).collect::<Vec<_>>().join("|")
}

pub fn write_issue_rows<W: Write>(out: W, issues: &[Issue], tz: DisplayTz) -> Result<()> {
  let mut wtr = csv::Writer::from_writer(out);
  wtr.write_record(ISSUE_HEADER)?;

  for issue in issues {
    wtr.write_record([
      issue.number.to_string(),
      issue.title.clone(),
      issue.url.clone(),
      joined_labels(issue),
      util::format_timestamp(&issue.created_at, tz),
      util::format_timestamp(&issue.updated_at, tz),
      util::format_optional_timestamp(issue.closed_at.as_ref(), tz),
    ])?;
  }

  wtr.flush()?;
  Ok(())
}

pub fn write_sprint_rows<W: Write>(out: W, summaries: &[SprintSummary]) -> Result<()> {
  let mut wtr = csv::Writer::from_writer(out);
  wtr.write_record(SPRINT_HEADER)?;

  for s in summaries {
    wtr.write_record([
      s.number.to_string(),
      s.title.clone(),
      due_date(s),
      util::format_points(s.velocity),
      util::format_points(s.bug_points),
      util::format_points(s.task_points),
      util::format_points(s.qa_points),
      util::format_points(s.feature_points),
      util::format_points(s.carryover),
      util::format_points(s.post_planning),
      util::format_points(s.frontend),
      util::format_points(s.backend),
    ])?;
  }

  wtr.flush()?;
  Ok(())
}

pub fn write_weekly_rows<W: Write>(out: W, counts: &[WeeklyCount]) -> Result<()> {
  let mut wtr = csv::Writer::from_writer(out);
  wtr.write_record(WEEKLY_HEADER)?;

  for c in counts {
    wtr.write_record([c.start.to_string(), c.end.to_string(), c.count.to_string()])?;
  }

  wtr.flush()?;
  Ok(())
}

/// Write a report next to earlier runs as `<prefix>_<YYYYMMDD-HHMMSS>.csv`.
///
/// Content goes to a temp file in `dir` first; the final name only appears once
/// the whole body is on disk. An existing file with the same name is an error.
pub fn persist_report<F>(dir: &Path, prefix: &str, generated_at: DateTime<Local>, write: F) -> Result<PathBuf>
where
  F: FnOnce(&mut NamedTempFile) -> Result<()>,
{
  std::fs::create_dir_all(dir)?;

  let target = dir.join(util::report_file_name(prefix, generated_at));
  let mut tmp = NamedTempFile::new_in(dir)?;
  write(&mut tmp)?;
  tmp.as_file().sync_all()?;
  tmp.persist_noclobber(&target).map_err(|e| e.error)?;

  tracing::debug!(path = %target.display(), "report persisted");
  Ok(target)
}

pub fn issue_summary_line(count: usize, labels: &[String], event: EventType, window: &DateWindow) -> String {
  format!(
    "{} issues tagged with {} were {} between {} and {}",
    count,
    labels.join(","),
    event,
    window.start,
    window.end
  )
}

pub fn query_echo_line(query: &str) -> String {
  format!("Github filter query used: {}", query)
}

pub fn weekly_summary(counts: &[WeeklyCount], labels: &[String], event: EventType) -> String {
  let mut out = String::new();
  for c in counts {
    out.push_str(&format!(
      "{}..{}: {} issues tagged with {} were {}\n",
      c.start,
      c.end,
      c.count,
      labels.join(","),
      event
    ));
  }
  out
}

fn issue_detail_line(item: &EstimatedIssue) -> String {
  let labels = joined_labels(&item.issue);
  format!(
    "    #{} {} [{}] points {} | epic {} | pipeline {}\n",
    item.issue.number,
    item.issue.title,
    labels,
    item.estimate.estimate.map(util::format_points).unwrap_or_else(|| "-".into()),
    match item.estimate.is_epic {
      Some(true) => "yes",
      Some(false) => "no",
      None => "-",
    },
    item.estimate.pipeline.as_deref().unwrap_or("-"),
  )
}

/// Console rendering: one summary block per milestone followed by its issues.
pub fn sprint_detail_text(sprints: &[SprintMilestone], summaries: &[SprintSummary]) -> String {
  let mut out = String::new();
  for (sprint, s) in sprints.iter().zip(summaries) {
    let due = due_date(s);
    out.push_str(&format!(
      "#{} {} (due {})\n  velocity {} | bugs {} | tasks {} | qa {} | features {}\n  carryover {} | post planning {} | frontend {} | backend {}\n",
      s.number,
      s.title,
      if due.is_empty() { "-" } else { due.as_str() },
      util::format_points(s.velocity),
      util::format_points(s.bug_points),
      util::format_points(s.task_points),
      util::format_points(s.qa_points),
      util::format_points(s.feature_points),
      util::format_points(s.carryover),
      util::format_points(s.post_planning),
      util::format_points(s.frontend),
      util::format_points(s.backend),
    ));
    for item in &sprint.issues {
      out.push_str(&issue_detail_line(item));
    }
  }
  out
}

#[derive(Serialize)]
struct IssueDetail<'a> {
  number: u64,
  title: &'a str,
  url: &'a str,
  labels: &'a BTreeSet<String>,
  estimate: Option<f64>,
  is_epic: Option<bool>,
  pipeline: Option<&'a str>,
}

#[derive(Serialize)]
struct SprintDetail<'a> {
  #[serde(flatten)]
  summary: &'a SprintSummary,
  issues: Vec<IssueDetail<'a>>,
}

/// JSON rendering: each summary's fields plus an `issues` array carrying the
/// ZenHub estimate, epic flag and pipeline of every issue in the milestone.
pub fn sprint_detail_json(sprints: &[SprintMilestone], summaries: &[SprintSummary]) -> Result<String> {
  let details: Vec<SprintDetail<'_>> = sprints
    .iter()
    .zip(summaries)
    .map(|(sprint, summary)| SprintDetail {
      summary,
      issues: sprint
        .issues
        .iter()
        .map(|item| IssueDetail {
          number: item.issue.number,
          title: &item.issue.title,
          url: &item.issue.url,
          labels: &item.issue.labels,
          estimate: item.estimate.estimate,
          is_epic: item.estimate.is_epic,
          pipeline: item.estimate.pipeline.as_deref(),
        })
        .collect(),
    })
    .collect();
  Ok(serde_json::to_string_pretty(&details)?)
}
