//! Identity provider sign-in.
//!
//! Replays the browser flow the portal uses. Two identity providers are
//! supported.
//!
//! One Login, email then password then TOTP:
//!
//! 1. `GET {portal}/auth/signin`, redirected to the identity provider, and
//!    scrape the `_csrf` token.
//! 2. Confirm the sign-in start page.
//! 3. Submit the account email.
//! 4. Submit the password.
//! 5. Submit the current TOTP code; redirects lead back to the portal.
//!
//! Identity server, a single credential form:
//!
//! 1. `GET {portal}/auth/signin`, redirected to the login page, and scrape
//!    the `sessionDataKey` and relying party.
//! 2. `GET /logincontext` on the identity server.
//! 3. `POST /commonauth` with username and password, and scrape the
//!    authorization `code`, `state` and `session_state`.
//! 4. `POST {portal}/signin-oidc` with them.
//!
//! Both finish by loading the portal home page and verifying the signed-in
//! heading. One Login forms are posted to the URL the previous response
//! ended on.

use chrono::Utc;
use tracing::{debug, info};
use url::Url;

use super::{Page, Session};
use crate::core::page::{self, HtmlPage, PageFieldExtractor};
use crate::core::totp::TotpGenerator;
use crate::error::{ConfigError, JourneyError, Result};

/// Identity provider flow with what it needs beyond the password.
pub enum Flow<'a> {
    OneLogin { totp: &'a TotpGenerator },
    IdentityServer { tenant_domain: &'a str },
}

/// Inputs for one sign-in.
pub struct SignIn<'a> {
    pub portal: &'a Url,
    pub username: &'a str,
    pub password: &'a str,
    pub flow: Flow<'a>,
    pub heading_class: &'a str,
    pub heading: &'a str,
}

impl SignIn<'_> {
    /// Run the flow, leaving `session` holding the authenticated cookies.
    ///
    /// # Errors
    ///
    /// Returns `JourneyError::Status` for a non-success response,
    /// `PageError::NotFound` if a hidden field is missing, and
    /// `JourneyError::NotAuthenticated` if the home page heading does not
    /// match afterwards.
    pub fn run(&self, session: &mut Session) -> Result<Page> {
        let start = join(self.portal, "auth/signin")?;
        let page = expect_success("Sign In", session.get("Sign In", &start)?)?;
        debug!(idp = %page.url.origin().ascii_serialization(), "reached identity provider");

        match &self.flow {
            Flow::OneLogin { totp } => self.one_login(session, page, totp)?,
            Flow::IdentityServer { tenant_domain } => {
                self.identity_server(session, page, tenant_domain)?
            }
        }

        let home = expect_success("Home Page", session.get("Home Page", self.portal)?)?;
        let heading = HtmlPage::new(&home.body).heading_text(self.heading_class);
        if heading.as_deref() != Some(self.heading) {
            debug!(found = ?heading, expected = self.heading, "home heading mismatch");
            return Err(JourneyError::NotAuthenticated.into());
        }

        info!(portal = %self.portal, "signed in");
        Ok(home)
    }

    fn one_login(&self, session: &mut Session, page: Page, totp: &TotpGenerator) -> Result<()> {
        let csrf = HtmlPage::new(&page.body).require("_csrf")?;

        let page = expect_success(
            "Sign In Start",
            session.post_form(
                "Sign In Start",
                &page.url,
                &[("_csrf", csrf.as_str()), ("supportInternationalNumbers", "")],
            )?,
        )?;

        let page = expect_success(
            "Enter Email",
            session.post_form(
                "Enter Email",
                &page.url,
                &[("_csrf", csrf.as_str()), ("email", self.username)],
            )?,
        )?;

        let page = expect_success(
            "Enter Password",
            session.post_form(
                "Enter Password",
                &page.url,
                &[
                    ("_csrf", csrf.as_str()),
                    ("isReauthJourney", "false"),
                    ("password", self.password),
                ],
            )?,
        )?;

        let code = totp.current()?;
        expect_success(
            "Enter MFA Code",
            session.post_form(
                "Enter MFA Code",
                &page.url,
                &[
                    ("_csrf", csrf.as_str()),
                    ("isAccountRecoveryPermitted", "true"),
                    ("mfaIssuePath", "/mfa-reset-with-ipv"),
                    ("code", code.as_str()),
                ],
            )?,
        )?;
        Ok(())
    }

    fn identity_server(&self, session: &mut Session, page: Page, tenant_domain: &str) -> Result<()> {
        let session_key = HtmlPage::new(&page.body).require("sessionDataKey")?;
        let relying_party = page::client_id_from_url(&page.url)?;
        let idp = page.url;

        let mut context = join(&idp, "/logincontext")?;
        context
            .query_pairs_mut()
            .append_pair("sessionDataKey", &session_key)
            .append_pair("relyingParty", &relying_party)
            .append_pair("tenantDomain", tenant_domain)
            .append_pair("_", &Utc::now().timestamp_millis().to_string());
        expect_success("Login Context", session.get("Login Context", &context)?)?;

        let tenant_user = format!("{}@{}", self.username, tenant_domain);
        let authorized = expect_success(
            "Submit Credentials",
            session.post_form(
                "Submit Credentials",
                &join(&idp, "/commonauth")?,
                &[
                    ("usernameUserInput", self.username),
                    ("username", tenant_user.as_str()),
                    ("password", self.password),
                    ("sessionDataKey", session_key.as_str()),
                ],
            )?,
        )?;

        let response = HtmlPage::new(&authorized.body);
        let code = response.require("code")?;
        let state = response.require("state")?;
        let session_state = response.require("session_state")?;

        expect_success(
            "Sign In Callback",
            session.post_form_from(
                "Sign In Callback",
                &join(self.portal, "signin-oidc")?,
                &idp,
                &[
                    ("code", code.as_str()),
                    ("state", state.as_str()),
                    ("session_state", session_state.as_str()),
                ],
            )?,
        )?;
        Ok(())
    }
}

fn join(base: &Url, path: &str) -> Result<Url> {
    base.join(path).map_err(|_| {
        ConfigError::InvalidUrl {
            field: "portal.base_url",
            value: base.to_string(),
        }
        .into()
    })
}

fn expect_success(step: &str, page: Page) -> Result<Page> {
    if page.is_success() {
        Ok(page)
    } else {
        Err(JourneyError::Status {
            step: step.to_string(),
            status: page.status,
        }
        .into())
    }
}
