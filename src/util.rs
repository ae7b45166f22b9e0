// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for paths, timestamp/points formatting, report file naming, and man page rendering
// role: utilities/helpers
// inputs: Various primitives; DateTime; paths; clap CommandFactory
// outputs: Canonicalized paths, formatted timestamps and points, timestamped file names, man page text
// invariants:
// - Timestamps render as `YYYY-MM-DD HH:MM:SS` in the chosen zone
// - report_file_name pattern is stable and locale-independent
// - Whole-number points render without a fractional part
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone, Utc};
use clap::CommandFactory;

use crate::error::{ReportError, Result};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn canonicalize_lossy<P: AsRef<Path>>(p: P) -> String {
  let p = p.as_ref();
  let pb: PathBuf = match std::fs::canonicalize(p) {
    Ok(x) => x,
    Err(_) => match std::env::current_dir() {
      Ok(cwd) => cwd.join(p),
      Err(_) => PathBuf::from(p),
    },
  };
  pb.to_string_lossy().to_string()
}

/// Zone used when rendering timestamps in exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayTz {
  Utc,
  Local,
  Named(chrono_tz::Tz),
}

impl DisplayTz {
  /// `utc`, `local`, or an IANA zone name such as `America/Toronto`.
  pub fn parse(raw: &str) -> Result<Self> {
    let trimmed = raw.trim();

    if trimmed.eq_ignore_ascii_case("utc") {
      return Ok(DisplayTz::Utc);
    }
    if trimmed.eq_ignore_ascii_case("local") {
      return Ok(DisplayTz::Local);
    }

    trimmed
      .parse::<chrono_tz::Tz>()
      .map(DisplayTz::Named)
      .map_err(|_| ReportError::Configuration(format!("unknown timezone '{}'", raw)))
  }
}

/// Formats an instant as `YYYY-MM-DD HH:MM:SS` in the given zone.
pub fn format_timestamp(ts: &DateTime<Utc>, tz: DisplayTz) -> String {
  match tz {
    DisplayTz::Utc => ts.format(TIMESTAMP_FORMAT).to_string(),
    DisplayTz::Local => ts.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string(),
    DisplayTz::Named(zone) => zone.from_utc_datetime(&ts.naive_utc()).format(TIMESTAMP_FORMAT).to_string(),
  }
}

pub fn format_optional_timestamp(ts: Option<&DateTime<Utc>>, tz: DisplayTz) -> String {
  ts.map(|t| format_timestamp(t, tz)).unwrap_or_default()
}

/// `3.0` → `3`, `0.5` → `0.5`.
pub fn format_points(points: f64) -> String {
  if points.fract() == 0.0 && points.abs() < 1e15 {
    format!("{}", points as i64)
  } else {
    format!("{}", points)
  }
}

/// Returns the effective "now" given an optional override.
pub fn effective_now(override_now: Option<DateTime<Local>>) -> DateTime<Local> {
  override_now.unwrap_or_else(Local::now)
}

/// `<prefix>_<YYYYMMDD-HHMMSS>.csv` for the given generation time.
pub fn report_file_name(prefix: &str, generated_at: DateTime<Local>) -> String {
  format!("{}_{}.csv", prefix, generated_at.format("%Y%m%d-%H%M%S"))
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
