//! Page-check journey.
//!
//! GET pages are checked for status and content. POST pages submit their
//! configured form, optionally carrying a hidden token scraped from the
//! page before them, the way a browser resubmits an anti-forgery token.

use std::thread;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tracing::{debug, info, warn};
use url::Url;

use super::{CheckSummary, Page, Session};
use crate::core::config::{Method, PageCheck};
use crate::core::constants::{MAX_THINK_TIME_SECS, TIMESTAMP_PLACEHOLDER};
use crate::core::page::{HtmlPage, PageFieldExtractor};
use crate::error::{ConfigError, Result};

/// Pause between pages, drawn uniformly from `min..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThinkTime {
    min: Duration,
    max: Duration,
}

impl ThinkTime {
    pub const NONE: Self = Self {
        min: Duration::ZERO,
        max: Duration::ZERO,
    };

    pub fn fixed(pause: Duration) -> Self {
        Self {
            min: pause,
            max: pause,
        }
    }

    /// Build from bounds in seconds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if either bound is negative, not
    /// finite, above an hour, or `min > max`.
    pub fn from_secs(min: f64, max: f64) -> Result<Self> {
        let bound = |field: &str, secs: f64| -> Result<Duration> {
            if !(0.0..=MAX_THINK_TIME_SECS).contains(&secs) {
                return Err(ConfigError::Invalid(format!(
                    "journey.{field} must be between 0 and {MAX_THINK_TIME_SECS} seconds, got {secs}"
                ))
                .into());
            }
            Duration::try_from_secs_f64(secs).map_err(|e| {
                ConfigError::Invalid(format!("journey.{field}: {e}")).into()
            })
        };
        let min = bound("think_time_min_secs", min)?;
        let max = bound("think_time_max_secs", max)?;
        if min > max {
            return Err(ConfigError::Invalid(
                "journey.think_time_min_secs is above journey.think_time_max_secs".into(),
            )
            .into());
        }
        Ok(Self { min, max })
    }

    /// Draw the next pause.
    pub fn sample(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        rand::rng().random_range(self.min..=self.max)
    }
}

/// Named check tallies in first-seen order.
#[derive(Debug, Default)]
pub struct Checks {
    entries: Vec<CheckSummary>,
}

impl Checks {
    /// Tally one evaluation and return `passed` for chaining.
    pub fn record(&mut self, name: &str, passed: bool) -> bool {
        let entry = match self.entries.iter().position(|c| c.name == name) {
            Some(i) => &mut self.entries[i],
            None => {
                self.entries.push(CheckSummary {
                    name: name.to_string(),
                    passes: 0,
                    fails: 0,
                });
                let last = self.entries.len() - 1;
                &mut self.entries[last]
            }
        };
        if passed {
            entry.passes += 1;
        } else {
            entry.fails += 1;
        }
        passed
    }

    pub fn all_passed(&self) -> bool {
        self.entries.iter().all(|c| c.fails == 0)
    }

    pub fn summaries(&self) -> Vec<CheckSummary> {
        self.entries.clone()
    }
}

/// Visits each configured page per iteration, checking status and content,
/// pausing for a random think time after every page.
pub struct PageJourney<'a> {
    pub portal: &'a Url,
    pub pages: &'a [PageCheck],
    pub think_time: ThinkTime,
}

impl PageJourney<'_> {
    /// Run `iterations` passes over the pages.
    ///
    /// Failed requests and checks are tallied, not returned as errors.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if a page path cannot be joined to
    /// the portal URL.
    pub fn run(&self, session: &mut Session, iterations: u32) -> Result<Checks> {
        let targets = self
            .pages
            .iter()
            .map(|page| {
                self.portal
                    .join(page.path.trim_start_matches('/'))
                    .map(|url| (page, url))
                    .map_err(|_| {
                        ConfigError::InvalidUrl {
                            field: "journey.pages.path",
                            value: page.path.clone(),
                        }
                        .into()
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut checks = Checks::default();
        for iteration in 1..=iterations {
            info!(iteration, iterations, "starting iteration");
            // Tokens never carry over from the previous iteration.
            let mut previous: Option<Page> = None;
            for (page, url) in &targets {
                previous = self.visit(session, page, url, previous.as_ref(), &mut checks);
                let pause = self.think_time.sample();
                if !pause.is_zero() {
                    thread::sleep(pause);
                }
            }
        }
        Ok(checks)
    }

    fn visit(
        &self,
        session: &mut Session,
        page: &PageCheck,
        url: &Url,
        previous: Option<&Page>,
        checks: &mut Checks,
    ) -> Option<Page> {
        let success = format!("{} Request Success", page.name);
        let loaded = format!("{} Loaded Correctly", page.name);
        let fail = |checks: &mut Checks| {
            checks.record(&success, false);
            if page.expect.is_some() {
                checks.record(&loaded, false);
            }
        };

        let form = match build_form(page, previous) {
            Ok(form) => form,
            Err(e) => {
                fail(checks);
                warn!(step = %page.name, error = %e, "form not sent");
                return None;
            }
        };

        let response = match page.method {
            Method::Get => session.get(&page.name, url),
            Method::Post => {
                let fields: Vec<(&str, &str)> =
                    form.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
                session.post_form(&page.name, url, &fields)
            }
        };
        if let Some(trend) = &page.trend {
            session.tag_last(trend);
        }

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                fail(checks);
                warn!(step = %page.name, url = %url, error = %e, "request failed");
                return None;
            }
        };

        let mut ok = checks.record(&success, response.status == 200);
        if let Some(expect) = &page.expect {
            ok &= checks.record(&loaded, HtmlPage::new(&response.body).contains(expect));
        }

        if !ok {
            let ms = session
                .samples()
                .last()
                .map(|s| s.duration_ms)
                .unwrap_or_default();
            warn!(
                step = %page.name,
                url = %response.url,
                status = response.status,
                ms,
                "page check failed"
            );
        }
        Some(response)
    }
}

/// Form fields for `page`, with placeholders filled and the token copied
/// from `previous`.
fn build_form(page: &PageCheck, previous: Option<&Page>) -> Result<Vec<(String, String)>> {
    let stamp = Utc::now().timestamp_millis().to_string();
    let mut form: Vec<(String, String)> = page
        .form
        .iter()
        .map(|(k, v)| (k.clone(), v.replace(TIMESTAMP_PLACEHOLDER, &stamp)))
        .collect();

    if let Some(name) = &page.token {
        let body = previous.map(|p| p.body.as_str()).unwrap_or_default();
        let value = HtmlPage::new(body).require(name)?;
        debug!(step = %page.name, field = %name, "token carried over");
        form.insert(0, (name.clone(), value));
    }
    Ok(form)
}
