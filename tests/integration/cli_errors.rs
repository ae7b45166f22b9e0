use predicates::prelude::*;
use test_support::{cmd_bin, fixture_cmd, BIN};

#[test]
fn missing_repo_prints_usage_and_exits_2() {
  cmd_bin(BIN)
    .arg("issues")
    .env_remove("GITHUB_PAT")
    .env_remove("ZENHUB_PAT")
    .assert()
    .code(2)
    .stderr(predicate::str::contains("--repo"));
}

#[test]
fn missing_zenhub_token_is_fatal_before_any_work() {
  fixture_cmd()
    .env_remove("ZENHUB_PAT")
    .args(["issues", "--repo", "acme/widgets"])
    .assert()
    .failure()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("ZENHUB_PAT"));
}

#[test]
fn blank_github_token_counts_as_missing() {
  fixture_cmd()
    .env("GITHUB_PAT", "   ")
    .args(["weekly", "--repo", "acme/widgets"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("GITHUB_PAT"));
}

#[test]
fn unknown_team_lists_known_teams() {
  fixture_cmd()
    .args(["sprint", "--repo", "acme/widgets", "--team", "iggy"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("'iggy' is not a team I know about"))
    .stderr(predicate::str::contains("mls, lender, manager, borrower"));
}

#[test]
fn malformed_date_echoes_the_input() {
  fixture_cmd()
    .args(["issues", "--repo", "acme/widgets", "--start-date", "2022-02-30"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("malformed date '2022-02-30'"));
}

#[test]
fn malformed_repository_is_rejected() {
  fixture_cmd()
    .args(["issues", "--repo", "just-a-name"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("owner/name"));
}
