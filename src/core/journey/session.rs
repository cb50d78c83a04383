//! HTTP session with a cookie jar and per-request timing.

use std::time::{Duration, Instant};

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::{JourneyError, Result};

/// One timed request.
#[derive(Debug, Clone, Serialize)]
pub struct Sample {
    pub step: String,
    pub method: String,
    pub url: String,
    /// HTTP status, or 0 if no response arrived.
    pub status: u16,
    pub duration_ms: f64,
    /// Custom trend the request also counts toward.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<String>,
}

impl Sample {
    /// Whether the request got a 2xx/3xx answer.
    pub fn ok(&self) -> bool {
        (200..400).contains(&self.status)
    }
}

/// A received page.
#[derive(Debug, Clone)]
pub struct Page {
    /// Final URL after redirects.
    pub url: Url,
    pub status: u16,
    pub body: String,
}

impl Page {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Browser-like session: cookies persist across requests and redirects
/// are followed.
pub struct Session {
    client: Client,
    samples: Vec<Sample>,
}

impl Session {
    /// Create a session with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `JourneyError::Client` if the TLS backend cannot initialise.
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;"),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-GB,en;q=0.9"),
        );
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let client = Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .user_agent(concat!("loadcred/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(JourneyError::Client)?;

        Ok(Self {
            client,
            samples: Vec::new(),
        })
    }

    /// GET `url`.
    ///
    /// # Errors
    ///
    /// Returns `JourneyError::Request` if no response arrives. The attempt
    /// is still recorded as a sample with status 0.
    pub fn get(&mut self, step: &str, url: &Url) -> Result<Page> {
        let request = self.client.get(url.clone());
        self.send(step, "GET", url, request)
    }

    /// POST an urlencoded form to `url`, with `Origin` set to the target's
    /// origin as a browser would.
    ///
    /// Form values are never logged.
    ///
    /// # Errors
    ///
    /// Returns `JourneyError::Request` if no response arrives.
    pub fn post_form(&mut self, step: &str, url: &Url, form: &[(&str, &str)]) -> Result<Page> {
        self.post_form_from(step, url, url, form)
    }

    /// POST an urlencoded form to `url` as if submitted from a page on
    /// `origin`, e.g. an identity provider posting back to the portal.
    ///
    /// # Errors
    ///
    /// Returns `JourneyError::Request` if no response arrives.
    pub fn post_form_from(
        &mut self,
        step: &str,
        url: &Url,
        origin: &Url,
        form: &[(&str, &str)],
    ) -> Result<Page> {
        let mut request = self.client.post(url.clone()).form(form);
        if let Ok(origin) = HeaderValue::from_str(&origin.origin().ascii_serialization()) {
            request = request.header(header::ORIGIN, origin);
        }
        self.send(step, "POST", url, request)
    }

    fn send(&mut self, step: &str, method: &str, url: &Url, request: RequestBuilder) -> Result<Page> {
        let started = Instant::now();
        let response = request.send();
        let elapsed = started.elapsed();

        let response = match response {
            Ok(r) => r,
            Err(source) => {
                self.record(step, method, url, 0, elapsed);
                warn!(step, method, url = %url, error = %source, "request failed");
                return Err(JourneyError::Request {
                    step: step.to_string(),
                    source,
                }
                .into());
            }
        };

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let body = response.text().map_err(|source| JourneyError::Request {
            step: step.to_string(),
            source,
        });
        // Body download counts toward the response time.
        let elapsed = started.elapsed();
        self.record(step, method, url, status, elapsed);
        let body = body?;

        debug!(
            step,
            method,
            status,
            url = %final_url,
            ms = elapsed.as_millis() as u64,
            "request sent"
        );

        Ok(Page {
            url: final_url,
            status,
            body,
        })
    }

    fn record(&mut self, step: &str, method: &str, url: &Url, status: u16, elapsed: Duration) {
        self.samples.push(Sample {
            step: step.to_string(),
            method: method.to_string(),
            url: url.to_string(),
            status,
            duration_ms: elapsed.as_secs_f64() * 1000.0,
            trend: None,
        });
    }

    /// Add the most recent request to a custom trend.
    pub fn tag_last(&mut self, trend: &str) {
        if let Some(sample) = self.samples.last_mut() {
            sample.trend = Some(trend.to_string());
        }
    }

    /// Samples recorded so far.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Drain the recorded samples, e.g. to separate sign-in from page checks.
    pub fn take_samples(&mut self) -> Vec<Sample> {
        std::mem::take(&mut self.samples)
    }
}
