//! Threshold expressions.
//!
//! ```text
//! p(98)<1000    98th percentile response time under 1000 ms
//! avg<=250      mean response time at most 250 ms
//! max<3000      slowest response under 3000 ms
//! rate<0.001    failed-request rate under 0.1%
//! ```
//!
//! A `name:` prefix scopes the expression to one trend or page instead of
//! every request:
//!
//! ```text
//! transactional: p(98)<1000
//! Home Page: max<3000
//! http_req_failed: rate<0.001
//! ```

use std::fmt;

use serde::Serialize;

use super::summary::percentile;
use crate::error::{JourneyError, Result};

/// Statistic a threshold is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    /// Response-time percentile, 0 to 100.
    Percentile(f64),
    Avg,
    Min,
    Max,
    Med,
    /// Failed-request rate, 0 to 1.
    Rate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Op {
    Lt,
    Le,
}

/// A parsed threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Threshold {
    expr: String,
    scope: Option<String>,
    metric: Metric,
    op: Op,
    limit: f64,
}

/// Outcome of one threshold.
#[derive(Debug, Clone, Serialize)]
pub struct ThresholdResult {
    pub expr: String,
    pub actual: f64,
    pub passed: bool,
}

impl Threshold {
    /// Scope naming every request's duration.
    pub const DURATION: &'static str = "http_req_duration";
    /// Scope naming every request's failure rate.
    pub const FAILED: &'static str = "http_req_failed";

    /// Parse an expression such as `p(95)<500` or `checkout: avg<200`.
    ///
    /// # Errors
    ///
    /// Returns `JourneyError::InvalidThreshold` for anything else.
    pub fn parse(expr: &str) -> Result<Self> {
        let invalid = || JourneyError::InvalidThreshold(expr.to_string());
        let (scope, body) = match expr.split_once(':') {
            Some((scope, body)) => {
                let scope = scope.trim();
                if scope.is_empty() {
                    return Err(invalid().into());
                }
                (Some(scope.to_string()), body)
            }
            None => (None, expr),
        };
        let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();

        let (lhs, op, rhs) = if let Some((l, r)) = compact.split_once("<=") {
            (l, Op::Le, r)
        } else if let Some((l, r)) = compact.split_once('<') {
            (l, Op::Lt, r)
        } else {
            return Err(invalid().into());
        };

        let metric = match lhs {
            "avg" => Metric::Avg,
            "min" => Metric::Min,
            "max" => Metric::Max,
            "med" => Metric::Med,
            "rate" => Metric::Rate,
            other => {
                let pct = other
                    .strip_prefix("p(")
                    .and_then(|s| s.strip_suffix(')'))
                    .and_then(|s| s.parse::<f64>().ok())
                    .filter(|p| (0.0..=100.0).contains(p))
                    .ok_or_else(invalid)?;
                Metric::Percentile(pct)
            }
        };

        let limit = rhs
            .parse::<f64>()
            .ok()
            .filter(|l| l.is_finite())
            .ok_or_else(invalid)?;

        if scope.as_deref() == Some(Self::FAILED) && metric != Metric::Rate {
            return Err(invalid().into());
        }

        let expr = match &scope {
            Some(scope) => format!("{scope}: {compact}"),
            None => compact,
        };

        Ok(Self {
            expr,
            scope,
            metric,
            op,
            limit,
        })
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Trend or page the threshold applies to, `None` for every request.
    pub fn scope(&self) -> Option<&str> {
        match self.scope.as_deref() {
            Some(Self::DURATION | Self::FAILED) | None => None,
            Some(scope) => Some(scope),
        }
    }

    /// Evaluate against ascending-sorted durations (ms) and the failed
    /// request rate of the series the threshold is scoped to.
    ///
    /// An empty trend reads as zero.
    pub fn evaluate(&self, sorted_ms: &[f64], failed_rate: f64) -> ThresholdResult {
        let actual = match self.metric {
            Metric::Percentile(p) => percentile(sorted_ms, p),
            Metric::Med => percentile(sorted_ms, 50.0),
            Metric::Min => sorted_ms.first().copied().unwrap_or(0.0),
            Metric::Max => sorted_ms.last().copied().unwrap_or(0.0),
            Metric::Avg if sorted_ms.is_empty() => 0.0,
            Metric::Avg => sorted_ms.iter().sum::<f64>() / sorted_ms.len() as f64,
            Metric::Rate => failed_rate,
        };

        let passed = match self.op {
            Op::Lt => actual < self.limit,
            Op::Le => actual <= self.limit,
        };

        ThresholdResult {
            expr: self.expr.clone(),
            actual,
            passed,
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr)
    }
}
