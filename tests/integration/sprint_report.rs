use serde_json::json;
use test_support::{estimate_json, fixture_cmd, issue_json, milestone_json, tempdir};

fn with_sprint_fixtures(cmd: &mut assert_cmd::Command) -> &mut assert_cmd::Command {
  cmd
    .env(
      "SPRINT_REPORT_TEST_MILESTONES_JSON",
      json!([
        milestone_json(12, "Lender Sprint 12", Some("2024-03-15T07:00:00Z")),
        milestone_json(11, "MLS Sprint 11", Some("2024-03-08T07:00:00Z")),
        milestone_json(10, "lender sprint 10", None),
      ])
      .to_string(),
    )
    .env(
      "SPRINT_REPORT_TEST_MILESTONE_ISSUES_JSON",
      json!({
        "Lender Sprint 12": [
          issue_json(101, &["Bug", "Carryover"], "2024-03-02T10:00:00Z"),
          issue_json(102, &["Task", "Backend"], "2024-03-03T10:00:00Z"),
          issue_json(103, &["QA Task", "Frontend", "Post Planning"], "2024-03-04T10:00:00Z"),
          issue_json(104, &["Frontend", "Backend"], "2024-03-05T10:00:00Z"),
          issue_json(105, &["Bug", "Task"], "2024-03-06T10:00:00Z"),
        ],
        "MLS Sprint 11": [issue_json(201, &["Bug"], "2024-03-01T10:00:00Z")],
      })
      .to_string(),
    )
    .env(
      "SPRINT_REPORT_TEST_ESTIMATES_JSON",
      json!({
        "101": estimate_json(3.0),
        "102": estimate_json(2.0),
        "103": estimate_json(1.5),
        "104": estimate_json(5.0),
        "201": estimate_json(8.0),
        "105": null,
      })
      .to_string(),
    )
}

#[test]
fn sprint_csv_has_one_row_per_team_milestone() {
  let dir = tempdir();
  let mut cmd = fixture_cmd();
  let out = with_sprint_fixtures(&mut cmd)
    .args(["sprint", "--repo", "acme/widgets", "--csv", "--now-override=2024-03-16T09:30:00"])
    .arg("--out-dir")
    .arg(dir.path())
    .output()
    .unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

  let text = std::fs::read_to_string(dir.path().join("sprintdata_20240316-093000.csv")).unwrap();
  let lines: Vec<&str> = text.lines().collect();
  assert_eq!(
    lines,
    [
      "ID,Title,End,Velocity,Bugs,Tasks,QA,Features,Carryover,Post_Planning,Frontend,Backend",
      "12,Lender Sprint 12,2024-03-15,11.5,3,2,1.5,5,3,1.5,6.5,7",
      "10,lender sprint 10,,0,0,0,0,0,0,0,0,0",
    ]
  );
}

#[test]
fn sprint_json_with_parallel_estimate_lookups() {
  let mut cmd = fixture_cmd();
  let out = with_sprint_fixtures(&mut cmd)
    .args(["sprint", "--repo", "acme/widgets", "--team", "MLS", "--json", "--estimate-workers", "4"])
    .output()
    .unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  let sprints = v.as_array().unwrap();
  assert_eq!(sprints.len(), 1);
  assert_eq!(sprints[0]["title"], "MLS Sprint 11");
  assert_eq!(sprints[0]["velocity"], 8.0);
  assert_eq!(sprints[0]["bug_points"], 8.0);
}

#[test]
fn sprint_text_summary_respects_limit() {
  let mut cmd = fixture_cmd();
  let out = with_sprint_fixtures(&mut cmd)
    .args(["sprint", "--repo", "acme/widgets", "--limit", "1"])
    .output()
    .unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

  let stdout = String::from_utf8_lossy(&out.stdout);
  assert!(stdout.starts_with("#12 Lender Sprint 12 (due 2024-03-15)\n  velocity 11.5 | bugs 3 | tasks 2 | qa 1.5 | features 5\n"));
  assert!(!stdout.contains("sprint 10"));
}

#[test]
fn sprint_json_carries_per_issue_zenhub_detail() {
  let mut cmd = fixture_cmd();
  let out = with_sprint_fixtures(&mut cmd)
    .args(["sprint", "--repo", "acme/widgets", "--json", "--limit", "1"])
    .output()
    .unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  let issues = v[0]["issues"].as_array().unwrap();
  let numbers: Vec<u64> = issues.iter().map(|i| i["number"].as_u64().unwrap()).collect();
  assert_eq!(numbers, [101, 102, 103, 104, 105]);

  assert_eq!(issues[0]["title"], "Issue 101");
  assert_eq!(issues[0]["url"], "https://github.com/acme/widgets/issues/101");
  assert_eq!(issues[0]["labels"], json!(["Bug", "Carryover"]));
  assert_eq!(issues[0]["estimate"], 3.0);
  assert_eq!(issues[0]["is_epic"], false);
  assert_eq!(issues[0]["pipeline"], "Done");

  assert!(issues[4]["estimate"].is_null());
  assert!(issues[4]["pipeline"].is_null());
}

#[test]
fn sprint_show_query_echoes_each_milestone_search() {
  let mut cmd = fixture_cmd();
  let out = with_sprint_fixtures(&mut cmd)
    .args(["sprint", "--repo", "acme/widgets", "--show-query"])
    .output()
    .unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

  let stdout = String::from_utf8_lossy(&out.stdout);
  let echoed: Vec<&str> = stdout.lines().filter(|l| l.starts_with("Github filter query used:")).collect();
  assert_eq!(
    echoed,
    [
      r#"Github filter query used: repo:acme/widgets is:issue milestone:"Lender Sprint 12""#,
      r#"Github filter query used: repo:acme/widgets is:issue milestone:"lender sprint 10""#,
    ]
  );
  assert!(stdout.contains("    #101 Issue 101 [Bug|Carryover] points 3 | epic no | pipeline Done"));
}
