//! Configuration file management.
//!
//! Handles reading and validating `loadcred.toml`. Every section is
//! optional; a missing file yields the defaults.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::core::constants;
use crate::core::journey::{ThinkTime, Threshold};
use crate::error::{ConfigError, JourneyError, Result};

/// Project configuration stored in `loadcred.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub keys: KeysConfig,
    pub portal: PortalConfig,
    pub signin: SigninConfig,
    pub journey: JourneyConfig,
}

/// Where the credential key lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeysConfig {
    /// JSON key-array file.
    pub file: PathBuf,
}

/// The portal under test.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Base URL, e.g. `https://portal.example.org/`.
    pub base_url: Option<String>,
    /// Class of the heading checked after sign-in.
    pub home_heading_class: String,
    /// Expected text of that heading.
    pub home_heading: String,
}

/// Identity provider sign-in details.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SigninConfig {
    /// Which identity provider flow the portal redirects to.
    pub flow: SigninFlow,
    /// Account email address.
    pub username: Option<String>,
    /// Environment variable holding the base32 MFA secret.
    pub mfa_secret_var: String,
    /// Tenant appended to the username by the identity server flow.
    pub tenant_domain: String,
}

/// Sign-in flow variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SigninFlow {
    /// Email, password, then TOTP code, each on its own page.
    #[default]
    OneLogin,
    /// Single credential form posted to `/commonauth`, no second factor.
    IdentityServer,
}

/// Journey replay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JourneyConfig {
    /// How many times the page checks are replayed.
    pub iterations: u32,
    /// Shortest pause after each page, in seconds.
    pub think_time_min_secs: f64,
    /// Longest pause after each page, in seconds.
    pub think_time_max_secs: f64,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,
    /// JSON summary destination.
    pub report: PathBuf,
    /// Threshold expressions such as `p(98)<1000`, `rate<0.001` or
    /// `transactional: p(98)<1000`.
    pub thresholds: Vec<String>,
    /// Pages visited on every iteration.
    pub pages: Vec<PageCheck>,
}

/// One page in the check journey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageCheck {
    /// Step name used in logs and the summary.
    pub name: String,
    /// Path relative to the portal base URL.
    pub path: String,
    #[serde(default)]
    pub method: Method,
    /// Urlencoded form fields for a POST. `{timestamp}` in a value becomes
    /// the current epoch millis.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub form: BTreeMap<String, String>,
    /// Hidden input copied from the previous page into this form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Text the body must contain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect: Option<String>,
    /// Custom trend this page's response times are added to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<String>,
}

/// HTTP method of a page check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    #[serde(alias = "get")]
    Get,
    #[serde(alias = "post")]
    Post,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(constants::KEY_FILE),
        }
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            home_heading_class: "govuk-heading-l".to_string(),
            home_heading: "My Account homepage".to_string(),
        }
    }
}

impl Default for SigninConfig {
    fn default() -> Self {
        Self {
            flow: SigninFlow::default(),
            username: None,
            mfa_secret_var: constants::MFA_SECRET_VAR.to_string(),
            tenant_domain: constants::TENANT_DOMAIN.to_string(),
        }
    }
}

impl Default for JourneyConfig {
    fn default() -> Self {
        Self {
            iterations: 1,
            think_time_min_secs: 2.0,
            think_time_max_secs: 4.0,
            timeout_secs: 30,
            report: PathBuf::from(constants::REPORT_FILE),
            thresholds: Vec::new(),
            pages: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, falling back to defaults if the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile`, `ConfigError::Parse`, or a
    /// validation error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        debug!(path = %path.display(), "loading config");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;

        debug!(
            pages = config.journey.pages.len(),
            thresholds = config.journey.thresholds.len(),
            "config loaded"
        );

        config.validate()?;
        Ok(config)
    }

    /// Validate values that serde cannot.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl`, `ConfigError::Invalid`, or
    /// `JourneyError::InvalidThreshold`.
    pub fn validate(&self) -> Result<()> {
        if let Some(base) = &self.portal.base_url {
            parse_base_url(base)?;
        }

        if self.journey.iterations == 0 {
            return Err(ConfigError::Invalid("journey.iterations must be at least 1".into()).into());
        }

        self.think_time()?;

        if self.journey.timeout_secs == 0 {
            return Err(ConfigError::Invalid("journey.timeout_secs must be at least 1".into()).into());
        }

        for (i, page) in self.journey.pages.iter().enumerate() {
            validate_page(i, page)?;
        }

        let scopes = self.threshold_scopes();
        for expr in &self.journey.thresholds {
            let threshold = Threshold::parse(expr)?;
            if let Some(scope) = threshold.scope() {
                if !scopes.contains(scope) {
                    return Err(JourneyError::InvalidThreshold(format!(
                        "{expr}: no page or trend named '{scope}'"
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }

    /// Trend and page names a threshold may be scoped to.
    fn threshold_scopes(&self) -> BTreeSet<&str> {
        let mut scopes = BTreeSet::from([Threshold::DURATION, Threshold::FAILED]);
        for page in &self.journey.pages {
            scopes.insert(page.name.as_str());
            if let Some(trend) = &page.trend {
                scopes.insert(trend.as_str());
            }
        }
        scopes
    }

    /// Portal base URL, required for journeys.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if unset.
    pub fn portal_url(&self) -> Result<Url> {
        let base = self
            .portal
            .base_url
            .as_deref()
            .ok_or(ConfigError::Missing("portal.base_url"))?;
        parse_base_url(base)
    }

    /// Account username, required for sign-in.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if unset.
    pub fn username(&self) -> Result<&str> {
        Ok(self
            .signin
            .username
            .as_deref()
            .ok_or(ConfigError::Missing("signin.username"))?)
    }

    /// Think time range between page checks.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the bounds are negative, reversed,
    /// or above an hour.
    pub fn think_time(&self) -> Result<ThinkTime> {
        ThinkTime::from_secs(
            self.journey.think_time_min_secs,
            self.journey.think_time_max_secs,
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.journey.timeout_secs)
    }

    /// Parsed thresholds. Already validated on load.
    ///
    /// # Errors
    ///
    /// Returns `JourneyError::InvalidThreshold` for a bad expression.
    pub fn thresholds(&self) -> Result<Vec<Threshold>> {
        self.journey
            .thresholds
            .iter()
            .map(|t| Threshold::parse(t))
            .collect()
    }
}

fn validate_page(index: usize, page: &PageCheck) -> Result<()> {
    if page.name.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("page with path '{}' has no name", page.path)).into());
    }
    if page.method == Method::Get && (!page.form.is_empty() || page.token.is_some()) {
        return Err(ConfigError::Invalid(format!(
            "page '{}' sends form fields but its method is GET",
            page.name
        ))
        .into());
    }
    if index == 0 && page.token.is_some() {
        return Err(ConfigError::Invalid(format!(
            "page '{}' takes a token but no page comes before it",
            page.name
        ))
        .into());
    }
    if page.trend.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(ConfigError::Invalid(format!("page '{}' has an empty trend", page.name)).into());
    }
    Ok(())
}

/// Parse a base URL, forcing a trailing slash so relative joins append.
fn parse_base_url(base: &str) -> Result<Url> {
    let normalized = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{}/", base)
    };
    let url = Url::parse(&normalized).map_err(|_| ConfigError::InvalidUrl {
        field: "portal.base_url",
        value: base.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            field: "portal.base_url",
            value: base.to_string(),
        }
        .into());
    }
    Ok(url)
}
