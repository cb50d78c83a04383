//! Run command.
//!
//! Signs in once, replays the configured page checks, prints a summary,
//! and writes it as JSON. Crossed thresholds fail the command.

use std::path::PathBuf;

use tracing::info;

use crate::cli::{output, signin};
use crate::core::config::Config;
use crate::core::journey::{PageJourney, Summary};
use crate::error::{ConfigError, JourneyError, Result};

/// Sign in and run the page journey.
pub fn execute(config: &Config, iterations: Option<u32>, report: Option<PathBuf>) -> Result<()> {
    if config.journey.pages.is_empty() {
        return Err(ConfigError::Missing("journey.pages").into());
    }
    let iterations = iterations.unwrap_or(config.journey.iterations).max(1);
    let report = report.unwrap_or_else(|| config.journey.report.clone());
    let thresholds = config.thresholds()?;
    let portal = config.portal_url()?;

    let mut session = signin::authenticated_session(config)?;
    let setup = session.take_samples();
    info!(requests = setup.len(), "setup complete");

    let checks = PageJourney {
        portal: &portal,
        pages: &config.journey.pages,
        think_time: config.think_time()?,
    }
    .run(&mut session, iterations)?;

    let summary = Summary::build(session.samples(), &checks, iterations, &thresholds);
    print_summary(&summary);
    if !checks.all_passed() {
        output::warn("some page checks failed");
    }
    summary.write_json(&report)?;
    output::hint(&format!("report: {}", output::path(&report.display().to_string())));

    let crossed: Vec<&str> = summary.crossed().iter().map(|t| t.expr.as_str()).collect();
    if !crossed.is_empty() {
        return Err(JourneyError::ThresholdsCrossed(crossed.join(", ")).into());
    }
    Ok(())
}

fn print_summary(summary: &Summary) {
    output::section("Checks");
    if summary.checks.is_empty() {
        output::dimmed("no checks");
    }
    for check in &summary.checks {
        output::check(&check.name, check.passes, check.fails);
    }

    output::section("Response times (ms)");
    output::trend("http_req_duration", &summary.http_req_duration);
    for (step, stats) in &summary.steps {
        output::trend(step, stats);
    }
    if !summary.trends.is_empty() {
        output::section("Trends (ms)");
        for (trend, stats) in &summary.trends {
            output::trend(trend, stats);
        }
    }

    output::section("Requests");
    output::kv("total: ", summary.requests);
    output::kv("failed:", format!("{:.2}%", summary.failed_rate * 100.0));
    output::kv("checks:", format!("{:.2}%", summary.checks_rate() * 100.0));

    if !summary.thresholds.is_empty() {
        output::section("Thresholds");
        for t in &summary.thresholds {
            output::threshold(&t.expr, t.actual, t.passed);
        }
    }
}
