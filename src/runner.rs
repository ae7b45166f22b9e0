// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate one report run per mode: query, fetch, normalize, aggregate, render
// role: orchestration/runner
// inputs: EffectiveConfig, an IssueSource, an EstimateSource factory keyed by repository id, a console writer
// outputs: Console summary text; optional timestamped CSV report
// invariants:
// - A failed run writes no report file
// - Weekly searches are spaced by the configured delay
// - Sprint summaries keep the milestone order returned by the source
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::Write;
use std::path::PathBuf;

use chrono::NaiveTime;
use tracing::info;

use crate::cli::{EffectiveConfig, IssuesPlan, Mode, OutputOptions, SprintPlan, Via, WeeklyPlan};
use crate::error::Result;
use crate::model::{Issue, RepoId, StateFilter, WeeklyCount};
use crate::normalize::IssueFilter;
use crate::query::{QueryBuilder, SearchQuery};
use crate::render;
use crate::source::{EstimateSource, IssueSource, ListFilter, Pacer};
use crate::sprint;
use crate::window::{DateWindow, EventType};

/// Run the configured report. `estimates` is only invoked in sprint mode,
/// once the repository id is known.
pub fn run<F>(cfg: &EffectiveConfig, issues: &dyn IssueSource, estimates: F, out: &mut dyn Write) -> Result<()>
where
  F: FnOnce(u64) -> Box<dyn EstimateSource>,
{
  let pacer = Pacer::new(cfg.delay);

  match &cfg.mode {
    Mode::Issues(plan) => run_issues(cfg, plan, issues, out),
    Mode::Weekly(plan) => run_weekly(cfg, plan, issues, &pacer, out),
    Mode::Sprint(plan) => run_sprint(cfg, plan, issues, estimates, &pacer, out),
  }
}

fn search_query(repo: &RepoId, labels: &[String], event: EventType, window: &DateWindow) -> Result<SearchQuery> {
  QueryBuilder::new(repo.clone())
    .labels(labels.iter().cloned())
    .window(event, window.start.to_string(), window.end.to_string())
    .build()
}

fn echo_query(output: &OutputOptions, query: &SearchQuery, out: &mut dyn Write) -> Result<()> {
  if output.show_query {
    writeln!(out, "{}", render::query_echo_line(&query.to_string()))?;
  }
  Ok(())
}

fn issue_filter(labels: &[String], exclude: &[String], event: EventType, window: DateWindow) -> IssueFilter {
  IssueFilter::new(event)
    .require(labels.iter().cloned())
    .exclude(exclude.iter().cloned())
    .within(window)
}

fn report_written(path: PathBuf, out: &mut dyn Write) -> Result<()> {
  info!(path = %path.display(), "report written");
  writeln!(out, "Wrote to {}", path.display())?;
  Ok(())
}

fn fetch_window(
  cfg: &EffectiveConfig,
  labels: &[String],
  event: EventType,
  window: &DateWindow,
  via: Via,
  issues: &dyn IssueSource,
  out: &mut dyn Write,
) -> Result<Vec<Issue>> {
  let query = search_query(&cfg.repo, labels, event, window)?;
  echo_query(&cfg.output, &query, out)?;

  match via {
    Via::Search => {
      info!(query = %query, "searching issues");
      let found = issues.search_issues(&query)?;
      info!(total = found.total_count, fetched = found.items.len(), "search complete");
      Ok(found.items)
    }
    Via::Listing => {
      let since = window.start.and_time(NaiveTime::MIN).and_utc();
      info!(repo = %cfg.repo, %since, "listing repository issues");
      issues.list_repo_issues(
        &cfg.repo,
        &ListFilter {
          state: StateFilter::All,
          labels: labels.to_vec(),
          since: Some(since),
        },
      )
    }
  }
}

fn run_issues(cfg: &EffectiveConfig, plan: &IssuesPlan, issues: &dyn IssueSource, out: &mut dyn Write) -> Result<()> {
  let raw = fetch_window(cfg, &plan.labels, plan.event, &plan.window, plan.via, issues, out)?;
  let normalized = issue_filter(&plan.labels, &plan.exclude_labels, plan.event, plan.window).apply(raw);

  writeln!(
    out,
    "{}",
    render::issue_summary_line(normalized.len(), &plan.labels, plan.event, &plan.window)
  )?;

  if cfg.output.csv {
    let tz = cfg.output.tz;
    let path = render::persist_report(&cfg.output.out_dir, render::ISSUES_PREFIX, cfg.now, |f| {
      render::write_issue_rows(f, &normalized, tz)
    })?;
    report_written(path, out)?;
  }

  Ok(())
}

fn run_weekly(
  cfg: &EffectiveConfig,
  plan: &WeeklyPlan,
  issues: &dyn IssueSource,
  pacer: &Pacer,
  out: &mut dyn Write,
) -> Result<()> {
  let mut counts = Vec::with_capacity(plan.windows.len());

  for window in &plan.windows {
    pacer.wait();
    let raw = fetch_window(cfg, &plan.labels, plan.event, window, Via::Search, issues, out)?;
    let count = issue_filter(&plan.labels, &plan.exclude_labels, plan.event, *window).apply(raw).len();
    counts.push(WeeklyCount {
      start: window.start,
      end: window.end,
      count,
    });
  }

  write!(out, "{}", render::weekly_summary(&counts, &plan.labels, plan.event))?;

  if cfg.output.csv {
    let path = render::persist_report(&cfg.output.out_dir, render::WEEKLY_PREFIX, cfg.now, |f| {
      render::write_weekly_rows(f, &counts)
    })?;
    report_written(path, out)?;
  }

  Ok(())
}

fn run_sprint<F>(
  cfg: &EffectiveConfig,
  plan: &SprintPlan,
  issues: &dyn IssueSource,
  estimates: F,
  pacer: &Pacer,
  out: &mut dyn Write,
) -> Result<()>
where
  F: FnOnce(u64) -> Box<dyn EstimateSource>,
{
  info!(team = %plan.team, "running team report");
  sprint::validate_team(&plan.team)?;

  pacer.wait();
  let all = issues.list_milestones(&cfg.repo, plan.state)?;
  let mut milestones = sprint::filter_team(all, &plan.team)?;
  if let Some(limit) = plan.limit {
    milestones.truncate(limit);
  }
  info!(count = milestones.len(), "milestones selected");

  pacer.wait();
  let repo_id = issues.repository_id(&cfg.repo)?;
  let estimate_source = estimates(repo_id);

  let output = &cfg.output;
  let sprints = sprint::collect_sprints(
    issues,
    estimate_source.as_ref(),
    &cfg.repo,
    milestones,
    plan.workers,
    pacer,
    &mut |query| echo_query(output, query, &mut *out),
  )?;
  let summaries = sprint::summarize_sprints(&sprints);

  if plan.json {
    writeln!(out, "{}", render::sprint_detail_json(&sprints, &summaries)?)?;
  } else {
    write!(out, "{}", render::sprint_detail_text(&sprints, &summaries))?;
  }

  if cfg.output.csv {
    let path = render::persist_report(&cfg.output.out_dir, render::SPRINT_PREFIX, cfg.now, |f| {
      render::write_sprint_rows(f, &summaries)
    })?;
    report_written(path, out)?;
  }

  Ok(())
}
