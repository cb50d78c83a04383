//! End-of-run summary.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::{Checks, Sample, Threshold, ThresholdResult};
use crate::error::{JourneyError, Result};

/// Response-time statistics in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub med: f64,
    pub p90: f64,
    pub p95: f64,
    pub p98: f64,
    pub p99: f64,
}

impl TrendStats {
    /// Compute statistics over ascending-sorted values.
    pub fn from_sorted(sorted: &[f64]) -> Self {
        if sorted.is_empty() {
            return Self::default();
        }
        Self {
            count: sorted.len(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            avg: sorted.iter().sum::<f64>() / sorted.len() as f64,
            med: percentile(sorted, 50.0),
            p90: percentile(sorted, 90.0),
            p95: percentile(sorted, 95.0),
            p98: percentile(sorted, 98.0),
            p99: percentile(sorted, 99.0),
        }
    }
}

/// Pass/fail tally for one named check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckSummary {
    pub name: String,
    pub passes: u32,
    pub fails: u32,
}

/// Everything worth reporting about a run.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub generated_at: DateTime<Utc>,
    pub iterations: u32,
    pub requests: usize,
    pub failed_requests: usize,
    pub failed_rate: f64,
    pub http_req_duration: TrendStats,
    pub steps: BTreeMap<String, TrendStats>,
    /// Custom trends named on page checks.
    pub trends: BTreeMap<String, TrendStats>,
    pub checks: Vec<CheckSummary>,
    pub thresholds: Vec<ThresholdResult>,
}

/// Durations and failures of one group of requests.
#[derive(Debug, Default)]
struct Series {
    durations: Vec<f64>,
    failed: usize,
}

impl Series {
    fn push(&mut self, sample: &Sample) {
        self.durations.push(sample.duration_ms);
        if !sample.ok() {
            self.failed += 1;
        }
    }

    fn sort(&mut self) {
        self.durations.sort_by(f64::total_cmp);
    }

    fn failed_rate(&self) -> f64 {
        if self.durations.is_empty() {
            0.0
        } else {
            self.failed as f64 / self.durations.len() as f64
        }
    }

    fn evaluate(&self, threshold: &Threshold) -> ThresholdResult {
        threshold.evaluate(&self.durations, self.failed_rate())
    }
}

fn group_by(samples: &[Sample], key: impl Fn(&Sample) -> Option<&str>) -> BTreeMap<String, Series> {
    let mut groups: BTreeMap<String, Series> = BTreeMap::new();
    for sample in samples {
        if let Some(name) = key(sample) {
            groups.entry(name.to_string()).or_default().push(sample);
        }
    }
    for series in groups.values_mut() {
        series.sort();
    }
    groups
}

fn stats(groups: &BTreeMap<String, Series>) -> BTreeMap<String, TrendStats> {
    groups
        .iter()
        .map(|(name, series)| (name.clone(), TrendStats::from_sorted(&series.durations)))
        .collect()
}

impl Summary {
    /// Aggregate samples and checks and evaluate thresholds.
    ///
    /// A scoped threshold is evaluated against the trend of that name,
    /// else the step of that name. An unknown scope reads as an empty
    /// series.
    pub fn build(
        samples: &[Sample],
        checks: &Checks,
        iterations: u32,
        thresholds: &[Threshold],
    ) -> Self {
        let mut all = Series::default();
        for sample in samples {
            all.push(sample);
        }
        all.sort();

        let by_step = group_by(samples, |s| Some(s.step.as_str()));
        let by_trend = group_by(samples, |s| s.trend.as_deref());
        let empty = Series::default();

        let thresholds = thresholds
            .iter()
            .map(|t| {
                let series = match t.scope() {
                    None => &all,
                    Some(scope) => by_trend
                        .get(scope)
                        .or_else(|| by_step.get(scope))
                        .unwrap_or(&empty),
                };
                series.evaluate(t)
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            iterations,
            requests: samples.len(),
            failed_requests: all.failed,
            failed_rate: all.failed_rate(),
            http_req_duration: TrendStats::from_sorted(&all.durations),
            steps: stats(&by_step),
            trends: stats(&by_trend),
            checks: checks.summaries(),
            thresholds,
        }
    }

    /// Whether every threshold passed.
    pub fn passed(&self) -> bool {
        self.thresholds.iter().all(|t| t.passed)
    }

    /// Thresholds that failed.
    pub fn crossed(&self) -> Vec<&ThresholdResult> {
        self.thresholds.iter().filter(|t| !t.passed).collect()
    }

    /// Share of check evaluations that passed, 1.0 when there were none.
    pub fn checks_rate(&self) -> f64 {
        let (passes, total) = self.checks.iter().fold((0u64, 0u64), |(p, t), c| {
            (p + u64::from(c.passes), t + u64::from(c.passes) + u64::from(c.fails))
        });
        if total == 0 {
            1.0
        } else {
            passes as f64 / total as f64
        }
    }

    /// Write the summary as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns `JourneyError::Report` on serialization or IO failure.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| JourneyError::Report(format!("{}: {}", parent.display(), e)))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| JourneyError::Report(e.to_string()))?;
        std::fs::write(path, json)
            .map_err(|e| JourneyError::Report(format!("{}: {}", path.display(), e)))?;

        debug!(path = %path.display(), "report written");
        Ok(())
    }
}

/// Linear-interpolated percentile over ascending-sorted values.
pub(crate) fn percentile(sorted: &[f64], pct: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = (pct / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = (lower + 1).min(n - 1);
            sorted[lower] + (sorted[upper] - sorted[lower]) * (rank - lower as f64)
        }
    }
}
