use anyhow::Result;
use ifcheck::check::{self, CheckResult};
use ifcheck::config::AppConfig;
use ifcheck::counter_source::SnapshotSource;
use ifcheck::error::CheckError;
use ifcheck::models::Status;
use ifcheck::sink::PluginOutput;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the status line; logs go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = ifcheck::version::VERSION, "starting check");
    let result = run().await;

    let mut sink = PluginOutput::new(std::io::stdout().lock());
    result.emit(&mut sink)?;
    std::process::exit(result.status.code());
}

async fn run() -> CheckResult {
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => return unknown(e),
    };
    let settings = match config.check_settings() {
        Ok(s) => s,
        Err(e) => return unknown(e),
    };
    let source = Arc::new(SnapshotSource::new(&config.source.path));
    let outcome = check::run_cycle(&settings, source).await;
    check::finish(&settings, outcome)
}

fn unknown(e: CheckError) -> CheckResult {
    tracing::error!(error = %e, "configuration rejected");
    CheckResult {
        status: Status::Unknown,
        message: e.to_string(),
        metrics: Vec::new(),
    }
}
