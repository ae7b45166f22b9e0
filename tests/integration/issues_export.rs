use serde_json::json;
use test_support::{fixture_cmd, issue_json, tempdir};

fn search_fixture() -> String {
  let mut closed = issue_json(3, &["Bug", "Internal"], "2024-03-05T08:00:00Z");
  closed["closed_at"] = json!("2024-03-09T16:45:10Z");
  closed["title"] = json!("Crash, then \"retry\" loops");

  json!([
    issue_json(1, &["Bug"], "2024-03-12T23:59:59Z"),
    issue_json(2, &["Bug", "Wontfix"], "2024-03-04T10:00:00Z"),
    closed,
    issue_json(4, &["Bug"], "2024-02-28T10:00:00Z"),
  ])
  .to_string()
}

#[test]
fn console_summary_counts_filtered_issues() {
  test_support::init_insta();
  let out = fixture_cmd()
    .env("SPRINT_REPORT_TEST_SEARCH_JSON", search_fixture())
    .args([
      "issues",
      "--repo",
      "acme/widgets",
      "--exclude-labels",
      "Wontfix",
      "--start-date",
      "2024-03-01",
      "--end-date",
      "2024-03-31",
      "--show-query",
    ])
    .output()
    .unwrap();

  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  insta::assert_snapshot!(String::from_utf8_lossy(&out.stdout).trim_end(), @r#"
  Github filter query used: repo:acme/widgets is:issue label:"Bug" created:2024-03-01..2024-03-31
  2 issues tagged with Bug were created between 2024-03-01 and 2024-03-31
  "#);
}

#[test]
fn csv_export_round_trips_identity_columns() {
  let dir = tempdir();
  let out = fixture_cmd()
    .env("SPRINT_REPORT_TEST_SEARCH_JSON", search_fixture())
    .args(["issues", "--repo", "acme/widgets", "--start-date", "2024-03-01", "--end-date", "2024-03-31", "--csv"])
    .arg("--out-dir")
    .arg(dir.path())
    .arg("--now-override=2024-03-31T18:00:00")
    .output()
    .unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

  let path = dir.path().join("issues_20240331-180000.csv");
  assert!(String::from_utf8_lossy(&out.stdout).contains("issues_20240331-180000.csv"));

  let mut rdr = csv::Reader::from_path(&path).unwrap();
  let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
  assert_eq!(headers, ["ID", "Title", "URL", "Labels", "Created", "Updated", "Closed"]);

  let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
  assert_eq!(rows.len(), 3);

  // ascending by creation time
  let ids: Vec<&str> = rows.iter().map(|r| &r[0]).collect();
  assert_eq!(ids, ["2", "3", "1"]);

  let crash = &rows[1];
  assert_eq!(&crash[1], "Crash, then \"retry\" loops");
  assert_eq!(&crash[2], "https://github.com/acme/widgets/issues/3");
  assert_eq!(&crash[3], "Bug|Internal");
  assert_eq!(&crash[6], "2024-03-09 16:45:10");

  let created = chrono::NaiveDateTime::parse_from_str(&rows[2][4], "%Y-%m-%d %H:%M:%S").unwrap();
  assert_eq!(created.and_utc().to_rfc3339(), "2024-03-12T23:59:59+00:00");
  assert_eq!(&rows[0][6], "");
}

#[test]
fn csv_export_honors_display_timezone() {
  let dir = tempdir();
  fixture_cmd()
    .env("SPRINT_REPORT_TEST_SEARCH_JSON", search_fixture())
    .args(["issues", "--repo", "acme/widgets", "--start-date", "2024-03-12", "--end-date", "2024-03-12", "--csv"])
    .args(["--tz", "America/Toronto", "--now-override=2024-03-31T18:00:00"])
    .arg("--out-dir")
    .arg(dir.path())
    .assert()
    .success();

  let text = std::fs::read_to_string(dir.path().join("issues_20240331-180000.csv")).unwrap();
  // 23:59:59Z is still March 12 in UTC (window match) but 19:59:59 local in Toronto (EDT)
  assert!(text.contains(",2024-03-12 19:59:59,"), "{text}");
}

#[test]
fn empty_result_still_writes_header() {
  let dir = tempdir();
  fixture_cmd()
    .env("SPRINT_REPORT_TEST_SEARCH_JSON", "[]")
    .args(["issues", "--repo", "acme/widgets", "--csv", "--now-override=2024-03-31T18:00:00"])
    .arg("--out-dir")
    .arg(dir.path())
    .assert()
    .success();

  let text = std::fs::read_to_string(dir.path().join("issues_20240331-180000.csv")).unwrap();
  assert_eq!(text, "ID,Title,URL,Labels,Created,Updated,Closed\n");
}
