use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;

use serde_json::json;
use test_support::{cmd_bin, issue_json, BIN, REPORT_ENV_VARS};

/// Answer one connection per response, in order; returns the request lines seen.
fn serve(listener: TcpListener, responses: Vec<(String, Option<String>)>) -> thread::JoinHandle<Vec<String>> {
  thread::spawn(move || {
    let mut seen = Vec::new();
    for (body, next) in responses {
      let (mut stream, _) = listener.accept().unwrap();
      let mut reader = BufReader::new(stream.try_clone().unwrap());
      let mut request_line = String::new();
      reader.read_line(&mut request_line).unwrap();
      seen.push(request_line.trim_end().to_string());
      loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        if line == "\r\n" || line.is_empty() {
          break;
        }
      }
      let link = next.map(|l| format!("Link: <{l}>; rel=\"next\"\r\n")).unwrap_or_default();
      write!(
        stream,
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n{}",
        body.len(),
        link,
        body
      )
      .unwrap();
    }
    seen
  })
}

#[test]
fn issues_follow_search_pagination_over_http() {
  let listener = TcpListener::bind("127.0.0.1:0").unwrap();
  let base = format!("http://{}", listener.local_addr().unwrap());

  let page_one = json!({ "total_count": 3, "items": [issue_json(1, &["Bug"], "2024-03-02T10:00:00Z")] }).to_string();
  let mut pr = issue_json(3, &["Bug"], "2024-03-04T10:00:00Z");
  pr["pull_request"] = json!({ "url": "https://api.github.com/repos/acme/widgets/pulls/3" });
  let page_two = json!({ "total_count": 3, "items": [issue_json(2, &["Bug"], "2024-03-03T10:00:00Z"), pr] }).to_string();

  let server = serve(
    listener,
    vec![(page_one, Some(format!("{base}/search/issues?page=2"))), (page_two, None)],
  );

  let mut cmd = cmd_bin(BIN);
  for key in REPORT_ENV_VARS {
    cmd.env_remove(key);
  }
  let out = cmd
    .env("GITHUB_PAT", "test-github-token")
    .env("ZENHUB_PAT", "test-zenhub-token")
    .env("GITHUB_API_URL", &base)
    .env("RUST_LOG", "warn")
    .args(["issues", "--repo", "acme/widgets", "--start-date", "2024-03-01", "--end-date", "2024-03-31"])
    .output()
    .unwrap();

  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  assert_eq!(
    String::from_utf8_lossy(&out.stdout).trim_end(),
    "2 issues tagged with Bug were created between 2024-03-01 and 2024-03-31"
  );

  let seen = server.join().unwrap();
  assert_eq!(seen.len(), 2);
  assert!(seen[0].starts_with("GET /search/issues?"), "{}", seen[0]);
  assert!(seen[0].contains("per_page=100"), "{}", seen[0]);
  assert!(seen[1].starts_with("GET /search/issues?page=2"), "{}", seen[1]);
}

#[test]
fn upstream_error_status_is_reported() {
  let listener = TcpListener::bind("127.0.0.1:0").unwrap();
  let base = format!("http://{}", listener.local_addr().unwrap());

  let server = thread::spawn(move || {
    let (mut stream, _) = listener.accept().unwrap();
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    loop {
      let mut line = String::new();
      reader.read_line(&mut line).unwrap();
      if line == "\r\n" || line.is_empty() {
        break;
      }
    }
    let body = r#"{"message":"Bad credentials"}"#;
    write!(
      stream,
      "HTTP/1.1 401 Unauthorized\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
      body.len(),
      body
    )
    .unwrap();
  });

  let mut cmd = cmd_bin(BIN);
  for key in REPORT_ENV_VARS {
    cmd.env_remove(key);
  }
  let out = cmd
    .env("GITHUB_PAT", "wrong")
    .env("ZENHUB_PAT", "test-zenhub-token")
    .env("GITHUB_API_URL", &base)
    .args(["issues", "--repo", "acme/widgets"])
    .output()
    .unwrap();
  server.join().unwrap();

  assert!(!out.status.success());
  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.contains("GitHub request failed with status 401: Bad credentials"), "{stderr}");
  assert!(out.stdout.is_empty());
}
