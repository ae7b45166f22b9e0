// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the clap CLI surface and normalize it into an EffectiveConfig
// role: cli/config
// inputs: argv via clap (subcommands issues | weekly | sprint | man)
// outputs: EffectiveConfig with a parsed repo, resolved dates, display zone, and per-mode plan
// invariants:
// - All validation that needs no network happens here, before any upstream call
// - Default dates derive from the effective now (honors --now-override)
// - weekly defaults to a 1000ms inter-request delay; issues and sprint default to none
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::error::{ReportError, Result};
use crate::model::{RepoId, StateFilter};
use crate::normalize::split_labels;
use crate::sprint;
use crate::util::{self, DisplayTz};
use crate::window::{self, DateWindow, EventType};

pub const WEEKLY_DEFAULT_DELAY_MS: u64 = 1000;

#[derive(Parser, Debug)]
#[command(
    name = "sprint-report",
    version,
    about = "Bug counts and sprint point reports from GitHub issues and ZenHub estimates",
    long_about = None
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Count (and optionally export) issues matching labels within a date window
  Issues(IssuesArgs),
  /// Rolling weekly issue counts
  Weekly(WeeklyArgs),
  /// Per-milestone point totals for a team
  Sprint(SprintArgs),
  /// Emit a troff man page to stdout (internal; for packaging)
  #[command(hide = true)]
  Man,
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
  /// GitHub repository, e.g. stockandawe/gh_client
  #[arg(long)]
  pub repo: String,

  /// Write a CSV export in addition to the console summary
  #[arg(long)]
  pub csv: bool,

  /// Directory for CSV exports
  #[arg(long, default_value = ".")]
  pub out_dir: PathBuf,

  /// Print the GitHub search query before running it
  #[arg(long)]
  pub show_query: bool,

  /// Zone for exported timestamps: utc, local, or an IANA name
  #[arg(long, default_value = "utc")]
  pub tz: String,

  /// Pause between successive upstream requests, in milliseconds
  #[arg(long)]
  pub delay_ms: Option<u64>,

  /// Override the "now" instant used for default dates and file names (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Via {
  /// GitHub search API
  Search,
  /// Repository issue listing, filtered locally
  Listing,
}

#[derive(Args, Debug, Clone)]
pub struct IssuesArgs {
  #[command(flatten)]
  pub common: CommonArgs,

  /// Comma separated labels; all must be present
  #[arg(long, default_value = "Bug")]
  pub labels: String,

  /// Comma separated labels; any one of them drops the issue
  #[arg(long, default_value = "")]
  pub exclude_labels: String,

  #[arg(long, value_enum, default_value_t = EventType::Created)]
  pub event: EventType,

  /// YYYY-MM-DD (default: first day of the current month)
  #[arg(long)]
  pub start_date: Option<String>,

  /// YYYY-MM-DD (default: today)
  #[arg(long)]
  pub end_date: Option<String>,

  #[arg(long, value_enum, default_value_t = Via::Search)]
  pub via: Via,
}

#[derive(Args, Debug, Clone)]
pub struct WeeklyArgs {
  #[command(flatten)]
  pub common: CommonArgs,

  #[arg(long, default_value = "Bug")]
  pub labels: String,

  #[arg(long, default_value = "")]
  pub exclude_labels: String,

  #[arg(long, value_enum, default_value_t = EventType::Created)]
  pub event: EventType,

  /// Number of trailing 7-day windows
  #[arg(long, default_value_t = 4)]
  pub weeks: u32,

  /// Last day of the most recent week, YYYY-MM-DD (default: today)
  #[arg(long)]
  pub end_date: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SprintArgs {
  #[command(flatten)]
  pub common: CommonArgs,

  /// Team keyword matched against milestone titles
  #[arg(long, default_value = "lender")]
  pub team: String,

  #[arg(long, value_enum, default_value_t = StateFilter::All)]
  pub milestone_state: StateFilter,

  /// Only the N most recent milestones
  #[arg(long)]
  pub limit: Option<usize>,

  /// Print summaries as JSON instead of text
  #[arg(long)]
  pub json: bool,

  /// Concurrent estimate lookups
  #[arg(long, default_value_t = 1)]
  pub estimate_workers: usize,
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
  pub csv: bool,
  pub out_dir: PathBuf,
  pub show_query: bool,
  pub tz: DisplayTz,
}

#[derive(Debug, Clone)]
pub struct IssuesPlan {
  pub labels: Vec<String>,
  pub exclude_labels: Vec<String>,
  pub event: EventType,
  pub window: DateWindow,
  pub via: Via,
}

#[derive(Debug, Clone)]
pub struct WeeklyPlan {
  pub labels: Vec<String>,
  pub exclude_labels: Vec<String>,
  pub event: EventType,
  pub windows: Vec<DateWindow>,
}

#[derive(Debug, Clone)]
pub struct SprintPlan {
  pub team: String,
  pub state: StateFilter,
  pub limit: Option<usize>,
  pub json: bool,
  pub workers: usize,
}

#[derive(Debug, Clone)]
pub enum Mode {
  Issues(IssuesPlan),
  Weekly(WeeklyPlan),
  Sprint(SprintPlan),
}

#[derive(Debug, Clone)]
pub struct EffectiveConfig {
  pub repo: RepoId,
  pub output: OutputOptions,
  pub delay: Duration,
  pub now: DateTime<Local>,
  pub mode: Mode,
}

struct Common {
  repo: RepoId,
  output: OutputOptions,
  now: DateTime<Local>,
  delay_ms: Option<u64>,
}

fn normalize_common(c: CommonArgs) -> Result<Common> {
  let repo: RepoId = c.repo.parse()?;
  let tz = DisplayTz::parse(&c.tz)?;
  let now = util::effective_now(window::parse_now_override(c.now_override.as_deref())?);

  Ok(Common {
    repo,
    output: OutputOptions {
      csv: c.csv,
      out_dir: PathBuf::from(util::canonicalize_lossy(&c.out_dir)),
      show_query: c.show_query,
      tz,
    },
    now,
    delay_ms: c.delay_ms,
  })
}

fn date_or(raw: Option<&str>, fallback: chrono::NaiveDate) -> Result<chrono::NaiveDate> {
  match raw {
    Some(s) => window::parse_date(s),
    None => Ok(fallback),
  }
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  match cli.command {
    Command::Issues(a) => {
      let common = normalize_common(a.common)?;
      let today = common.now.date_naive();
      let month = DateWindow::month_to_date(today);

      let start = date_or(a.start_date.as_deref(), month.start)?;
      let end = date_or(a.end_date.as_deref(), today)?;

      Ok(EffectiveConfig {
        repo: common.repo,
        output: common.output,
        delay: Duration::from_millis(common.delay_ms.unwrap_or(0)),
        now: common.now,
        mode: Mode::Issues(IssuesPlan {
          labels: split_labels(&a.labels),
          exclude_labels: split_labels(&a.exclude_labels),
          event: a.event,
          window: DateWindow::new(start, end)?,
          via: a.via,
        }),
      })
    }
    Command::Weekly(a) => {
      let common = normalize_common(a.common)?;
      if a.weeks == 0 {
        return Err(ReportError::Configuration("--weeks must be at least 1".into()));
      }
      let end = date_or(a.end_date.as_deref(), common.now.date_naive())?;

      Ok(EffectiveConfig {
        repo: common.repo,
        output: common.output,
        delay: Duration::from_millis(common.delay_ms.unwrap_or(WEEKLY_DEFAULT_DELAY_MS)),
        now: common.now,
        mode: Mode::Weekly(WeeklyPlan {
          labels: split_labels(&a.labels),
          exclude_labels: split_labels(&a.exclude_labels),
          event: a.event,
          windows: window::weekly_windows(end, a.weeks)?,
        }),
      })
    }
    Command::Sprint(a) => {
      let common = normalize_common(a.common)?;
      sprint::validate_team(&a.team)?;
      if a.estimate_workers == 0 {
        return Err(ReportError::Configuration("--estimate-workers must be at least 1".into()));
      }

      Ok(EffectiveConfig {
        repo: common.repo,
        output: common.output,
        delay: Duration::from_millis(common.delay_ms.unwrap_or(0)),
        now: common.now,
        mode: Mode::Sprint(SprintPlan {
          team: a.team.trim().to_string(),
          state: a.milestone_state,
          limit: a.limit,
          json: a.json,
          workers: a.estimate_workers,
        }),
      })
    }
    Command::Man => Err(ReportError::Configuration("the man subcommand does not produce a report".into())),
  }
}
