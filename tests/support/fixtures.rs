//! Test fixtures and constants.

/// RFC 6238 SHA1 seed ("12345678901234567890") in base32.
pub const MFA_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

/// Account used by the mock identity provider.
pub const USERNAME: &str = "load.tester@example.org";

/// Password the mock identity provider accepts.
pub const PASSWORD: &str = "hunter2";

/// CSRF token the mock identity provider issues.
pub const CSRF: &str = "tok-123";

/// Text on the mock portal home page.
pub const HOME_TEXT: &str = "This is your account homepage";

/// Credentials with awkward characters.
pub const AWKWARD_SECRETS: &[&str] = &[
    "Sup3rSecret!",
    "p@ss w0rd with spaces",
    "quote\"and'apostrophe",
    "pässwörd-🔐-密码",
    "$HOME;rm -rf /",
];

/// Review body pages: a GET form, then two POSTs each resubmitting the
/// previous page's anti-forgery token.
pub const REVIEW_BODY_PAGES: &str = r#"
[[journey.pages]]
name = "Create Review Body"
path = "reviewbody/create"
expect = "Add a review body"
trend = "non_transactional"

[[journey.pages]]
name = "Confirm Review Body"
path = "reviewbody/confirm-changes"
method = "POST"
token = "__RequestVerificationToken"
expect = "Check and confirm"
trend = "transactional"

[journey.pages.form]
OrganisationName = "LoadTestOrg{timestamp}"
Countries = "England"

[[journey.pages]]
name = "Submit Review Body"
path = "reviewbody/submit"
method = "POST"
token = "__RequestVerificationToken"
expect = "Review body added"
trend = "transactional"
"#;

/// Portal config pointing at `base_url` with the given journey extras.
pub fn portal_config(base_url: &str, journey_extra: &str) -> String {
    portal_config_with(base_url, "", journey_extra)
}

/// Portal config with extra `[signin]` and `[journey]` lines.
pub fn portal_config_with(base_url: &str, signin_extra: &str, journey_extra: &str) -> String {
    format!(
        r#"
[portal]
base_url = "{base_url}"

[signin]
username = "{USERNAME}"
{signin_extra}

[journey]
think_time_min_secs = 0
think_time_max_secs = 0
timeout_secs = 5
{journey_extra}

[[journey.pages]]
name = "Home Page"
path = ""
expect = "{HOME_TEXT}"
trend = "non_transactional"

[[journey.pages]]
name = "Admin Page"
path = "admin"
expect = "Admin area"
trend = "non_transactional"
"#
    )
}
