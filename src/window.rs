// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Calendar-date windows for issue filtering: event types, strict date parsing, month-to-date defaults, rolling weeks
// role: time/windows
// inputs: User-supplied YYYY-MM-DD strings; optional now override
// outputs: EventType, DateWindow, rolling weekly windows
// invariants:
// - Windows are inclusive on both ends and compare calendar dates only
// - start <= end for every DateWindow that exists
// - Invalid date input is an error, never silently defaulted
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;

use chrono::{DateTime, Datelike, Days, Local, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

/// Which issue timestamp drives filtering and sorting.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum EventType {
  Created,
  Updated,
  Closed,
}

impl EventType {
  /// Search qualifier name (`created:`, `updated:`, `closed:`).
  pub fn as_str(&self) -> &'static str {
    match self {
      EventType::Created => "created",
      EventType::Updated => "updated",
      EventType::Closed => "closed",
    }
  }
}

impl fmt::Display for EventType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct DateWindow {
  pub start: NaiveDate,
  pub end: NaiveDate,
}

impl DateWindow {
  pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
    if start > end {
      return Err(ReportError::MalformedQuery(format!(
        "start date {} is after end date {}",
        start, end
      )));
    }
    Ok(Self { start, end })
  }

  /// Parse both ends from user input.
  pub fn parse(start: &str, end: &str) -> Result<Self> {
    Self::new(parse_date(start)?, parse_date(end)?)
  }

  /// First day of `today`'s month through `today`.
  pub fn month_to_date(today: NaiveDate) -> Self {
    let first = today.with_day(1).unwrap_or(today);
    Self { start: first, end: today }
  }

  pub fn contains(&self, date: NaiveDate) -> bool {
    self.start <= date && date <= self.end
  }
}

impl fmt::Display for DateWindow {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}", self.start.format("%Y-%m-%d"), self.end.format("%Y-%m-%d"))
  }
}

/// Parse a calendar date. Accepts unpadded month/day (`2024-3-7`).
pub fn parse_date(input: &str) -> Result<NaiveDate> {
  let trimmed = input.trim();

  if trimmed.is_empty() {
    return Err(ReportError::malformed_date(input, "empty date"));
  }

  NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
    .map_err(|e| ReportError::malformed_date(input, format!("expected YYYY-MM-DD ({e})")))
}

/// `weeks` consecutive 7-day windows ending on `end`, oldest first.
///
/// Fails with `MalformedQuery` when the oldest window would start before the
/// earliest representable date.
pub fn weekly_windows(end: NaiveDate, weeks: u32) -> Result<Vec<DateWindow>> {
  let out_of_range = || ReportError::MalformedQuery(format!("{weeks} weeks before {end} is out of the supported date range"));

  (0..u64::from(weeks))
    .rev()
    .map(|k| {
      let week_end = end.checked_sub_days(Days::new(7 * k)).ok_or_else(out_of_range)?;
      let start = week_end.checked_sub_days(Days::new(6)).ok_or_else(out_of_range)?;
      Ok(DateWindow { start, end: week_end })
    })
    .collect()
}

/// Parse a `--now-override` string into a local DateTime.
/// Accepts RFC3339 (e.g. 2025-08-15T12:00:00Z) or a naive local timestamp
/// formatted as `%Y-%m-%dT%H:%M:%S`.
pub fn parse_now_override(raw: Option<&str>) -> Result<Option<DateTime<Local>>> {
  let Some(raw) = raw else { return Ok(None) };

  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Ok(Some(dt.with_timezone(&Local)));
  }

  chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
    .ok()
    .and_then(|ndt| ndt.and_local_timezone(Local).single())
    .map(Some)
    .ok_or_else(|| ReportError::malformed_date(raw, "expected RFC3339 or YYYY-MM-DDTHH:MM:SS"))
}
