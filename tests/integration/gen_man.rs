use test_support::{cmd_bin, BIN};

#[test]
fn cli_generates_man_page_without_tokens() {
  let out = cmd_bin(BIN)
    .arg("man")
    .env_remove("GITHUB_PAT")
    .env_remove("GITHUB_TOKEN")
    .env_remove("ZENHUB_PAT")
    .output()
    .unwrap();
  assert!(out.status.success());
  let s = String::from_utf8_lossy(&out.stdout);
  // clap_mangen emits a roff manpage starting with .TH and mentions the binary name
  assert!(s.contains(".TH"));
  assert!(s.contains("sprint-report"));
}
