use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use sprint_report::model::{EstimateRecord, EstimatedIssue, Issue, Milestone, SprintMilestone};
use sprint_report::sprint::summarize_sprint;

const LABELS: [&str; 9] = [
  "Bug",
  "Task",
  "QA Task",
  "Carryover",
  "Post Planning",
  "Frontend",
  "Backend",
  "Enhancement",
  "Internal",
];

fn estimated(number: u64, label_mask: u16, hundredths: Option<u32>) -> EstimatedIssue {
  let at = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
  EstimatedIssue {
    issue: Issue {
      number,
      title: format!("Issue {number}"),
      url: format!("https://github.com/acme/widgets/issues/{number}"),
      labels: LABELS
        .iter()
        .enumerate()
        .filter(|(i, _)| label_mask & (1 << i) != 0)
        .map(|(_, l)| l.to_string())
        .collect(),
      created_at: at,
      updated_at: at,
      closed_at: None,
      milestone: Some("Lender Sprint 1".into()),
    },
    estimate: EstimateRecord {
      estimate: hundredths.map(points),
      ..EstimateRecord::default()
    },
  }
}

fn points(hundredths: u32) -> f64 {
  hundredths as f64 / 100.0
}

// Per-issue sums of arbitrary decimals accumulate rounding in a different order
// than the bucket sums.
const TOLERANCE: f64 = 1e-9;

proptest! {
  #[test]
  fn primary_buckets_always_sum_to_velocity(
    issues in prop::collection::vec((0u16..512, prop::option::of(0u32..2_000)), 0..40)
  ) {
    let sprint = SprintMilestone {
      milestone: Milestone { number: 1, title: "Lender Sprint 1".into(), due_on: None },
      issues: issues
        .iter()
        .enumerate()
        .map(|(n, (mask, q))| estimated(n as u64, *mask, *q))
        .collect(),
    };

    let s = summarize_sprint(&sprint);
    prop_assert_eq!(s.velocity, s.bug_points + s.task_points + s.qa_points + s.feature_points);

    let total: f64 = issues.iter().map(|(_, q)| q.map(points).unwrap_or(0.0)).sum();
    prop_assert!((s.velocity - total).abs() < TOLERANCE);
    for overlay in [s.carryover, s.post_planning, s.frontend, s.backend] {
      prop_assert!(overlay <= s.velocity + TOLERANCE);
    }
  }
}
