use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sprint_report::cli::{normalize, Cli, Command};
use sprint_report::config::ApiConfig;
use sprint_report::{runner, source, util};

fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init();
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  if let Command::Man = cli.command {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  init_tracing();

  // Phase 1: credentials, before any other work
  let api = ApiConfig::from_env()?;

  // Phase 2: normalize CLI (all offline validation)
  let cfg = normalize(cli)?;
  tracing::debug!(?api, repo = %cfg.repo, "configuration loaded");

  // Phase 3: run against the selected sources
  let issues = source::issue_source(&api);
  let stdout = std::io::stdout();
  let mut out = stdout.lock();
  runner::run(&cfg, issues.as_ref(), |repo_id| source::estimate_source(&api, repo_id), &mut out)?;

  Ok(())
}
