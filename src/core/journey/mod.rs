//! Recorded user journeys against the portal.
//!
//! A journey is a strictly sequential chain of blocking HTTP requests run
//! by a single user. Every request is timed; page checks are tallied and
//! summarised with response-time percentiles at the end.
//!
//! ```text
//! journey/
//! ├── session     # cookie-carrying HTTP client, request timing
//! ├── signin      # multi-step identity provider sign-ins
//! ├── pages       # GET and POST page checks with random think time
//! ├── summary     # trends, percentiles, JSON report
//! └── threshold   # pass/fail expressions over the summary
//! ```

mod pages;
mod session;
mod signin;
mod summary;
mod threshold;

pub use pages::{Checks, PageJourney, ThinkTime};
pub use session::{Page, Sample, Session};
pub use signin::{Flow, SignIn};
pub use summary::{CheckSummary, Summary, TrendStats};
pub use threshold::{Metric, Threshold, ThresholdResult};
