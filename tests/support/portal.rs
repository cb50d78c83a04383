//! Mock portal and identity providers on a mockito server.
//!
//! The identity provider lives on the same host as the portal, One Login
//! under `/idp/` and the identity server at its real root paths. Form
//! bodies are matched field by field, so a wrong value gets mockito's
//! `501` rather than a redirect.

use mockito::{Matcher, Mock, Server, ServerGuard};

use super::{CSRF, HOME_TEXT, PASSWORD, USERNAME};

/// Relying party in the identity server login redirect.
pub const RELYING_PARTY: &str = "portal-42";

/// `sessionDataKey` the identity server issues.
pub const SESSION_KEY: &str = "sdk-7f3a";

/// Anti-forgery tokens on the review body pages.
pub const CREATE_TOKEN: &str = "rvt-create";
pub const CONFIRM_TOKEN: &str = "rvt-confirm";

const SESSION_COOKIE: &str = "session=authenticated";

/// A running mock portal. Mocks live as long as the portal.
pub struct Portal {
    server: ServerGuard,
    mocks: Vec<(&'static str, Mock)>,
}

impl Portal {
    /// Portal with no routes mounted.
    pub fn new() -> Self {
        Self {
            server: Server::new(),
            mocks: Vec::new(),
        }
    }

    /// One Login sign-in plus every portal page.
    pub fn one_login() -> Self {
        let mut portal = Self::new();
        portal.mount_one_login(&form_page("Create a GOV.UK One Login or sign in"));
        portal.mount_home("My Account homepage");
        portal.mount_pages();
        portal
    }

    /// Identity server sign-in plus every portal page.
    pub fn identity_server() -> Self {
        let mut portal = Self::new();
        portal.mount_identity_server();
        portal.mount_home("My Account homepage");
        portal.mount_pages();
        portal
    }

    /// Base URL with a trailing slash.
    pub fn base_url(&self) -> String {
        format!("{}/", self.server.url())
    }

    /// Whether the named mock received a matching request.
    pub fn matched(&self, name: &str) -> bool {
        self.mocks
            .iter()
            .find(|(n, _)| *n == name)
            .unwrap_or_else(|| panic!("no mock named {name}"))
            .1
            .matched()
    }

    /// Whether any mock at all received a request.
    pub fn any_matched(&self) -> bool {
        self.mocks.iter().any(|(_, mock)| mock.matched())
    }

    fn keep(&mut self, name: &'static str, mock: Mock) {
        self.mocks.push((name, mock));
    }

    fn redirect(&mut self, name: &'static str, method: &str, path: &str, location: &str) {
        let mock = self
            .server
            .mock(method, path)
            .with_status(302)
            .with_header("location", location)
            .create();
        self.keep(name, mock);
    }

    fn html(&mut self, name: &'static str, path: impl Into<Matcher>, body: &str) {
        let mock = self
            .server
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(body)
            .create();
        self.keep(name, mock);
    }

    /// Form posted from a browser on this host.
    fn form_post(&mut self, path: &str, fields: Vec<Matcher>) -> Mock {
        let origin = self.server.url();
        self.server
            .mock("POST", path)
            .match_header("origin", origin.as_str())
            .match_body(Matcher::AllOf(fields))
    }

    /// One Login under `/idp/`, serving `sign_in_page` first.
    pub fn mount_one_login(&mut self, sign_in_page: &str) {
        self.redirect("auth", "GET", "/auth/signin", "/idp/sign-in");
        self.html("sign in page", "/idp/sign-in", sign_in_page);
        self.html("email page", "/idp/enter-email", &form_page("Enter your email address"));
        self.html("password page", "/idp/enter-password", &form_page("Enter your password"));
        self.html("code page", "/idp/enter-code", &form_page("Check your phone"));

        let csrf = || Matcher::UrlEncoded("_csrf".into(), CSRF.into());

        let start = self
            .form_post(
                "/idp/sign-in",
                vec![
                    csrf(),
                    Matcher::UrlEncoded("supportInternationalNumbers".into(), String::new()),
                ],
            )
            .with_status(302)
            .with_header("location", "/idp/enter-email")
            .create();
        self.keep("start", start);

        let email = self
            .form_post(
                "/idp/enter-email",
                vec![csrf(), Matcher::UrlEncoded("email".into(), USERNAME.into())],
            )
            .with_status(302)
            .with_header("location", "/idp/enter-password")
            .create();
        self.keep("email", email);

        let password = self
            .form_post(
                "/idp/enter-password",
                vec![
                    csrf(),
                    Matcher::UrlEncoded("isReauthJourney".into(), "false".into()),
                    Matcher::UrlEncoded("password".into(), PASSWORD.into()),
                ],
            )
            .with_status(302)
            .with_header("location", "/idp/enter-code")
            .create();
        self.keep("password", password);

        let rejected = self
            .server
            .mock("POST", "/idp/enter-password")
            .match_body(Matcher::UrlEncoded("password".into(), "wrong".into()))
            .with_status(401)
            .create();
        self.keep("rejected password", rejected);

        let code = self
            .form_post(
                "/idp/enter-code",
                vec![csrf(), Matcher::Regex(r"(^|&)code=[0-9]{6}(&|$)".into())],
            )
            .with_status(302)
            .with_header("location", "/")
            .with_header("set-cookie", &format!("{SESSION_COOKIE}; Path=/"))
            .create();
        self.keep("code", code);
    }

    /// Identity server login page, login context, credential form, and
    /// the portal's OIDC callback.
    pub fn mount_identity_server(&mut self) {
        self.redirect(
            "auth",
            "GET",
            "/auth/signin",
            &format!(
                "/authenticationendpoint/login.do?client_id={RELYING_PARTY}&commonAuthCallerPath=%2Foauth2%2Fauthorize"
            ),
        );
        self.html(
            "login page",
            Matcher::Regex(r"^/authenticationendpoint/login\.do".into()),
            &format!(
                r#"<form action="../commonauth" method="post">
<input type="hidden" name="sessionDataKey" value="{SESSION_KEY}"/></form>"#
            ),
        );

        let context = self
            .server
            .mock("GET", Matcher::Regex(r"^/logincontext".into()))
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("sessionDataKey".into(), SESSION_KEY.into()),
                Matcher::UrlEncoded("relyingParty".into(), RELYING_PARTY.into()),
                Matcher::UrlEncoded("tenantDomain".into(), "carbon.super".into()),
                Matcher::Regex(r"(^|&)_=[0-9]{13}(&|$)".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"success"}"#)
            .create();
        self.keep("context", context);

        let credentials = self
            .form_post(
                "/commonauth",
                vec![
                    Matcher::UrlEncoded("usernameUserInput".into(), USERNAME.into()),
                    Matcher::UrlEncoded("username".into(), format!("{USERNAME}@carbon.super")),
                    Matcher::UrlEncoded("password".into(), PASSWORD.into()),
                    Matcher::UrlEncoded("sessionDataKey".into(), SESSION_KEY.into()),
                ],
            )
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(
                r#"<form method="post" action="/signin-oidc">
<input type="hidden" name="code" value="auth-code-1"/>
<input type="hidden" name="state" value="state-9"/>
<input type="hidden" name="session_state" value="ss-5"/></form>"#,
            )
            .create();
        self.keep("credentials", credentials);

        let callback = self
            .form_post(
                "/signin-oidc",
                vec![
                    Matcher::UrlEncoded("code".into(), "auth-code-1".into()),
                    Matcher::UrlEncoded("state".into(), "state-9".into()),
                    Matcher::UrlEncoded("session_state".into(), "ss-5".into()),
                ],
            )
            .with_status(302)
            .with_header("location", "/")
            .with_header("set-cookie", &format!("{SESSION_COOKIE}; Path=/"))
            .create();
        self.keep("callback", callback);
    }

    /// Portal home page, showing `heading` once signed in.
    pub fn mount_home(&mut self, heading: &str) {
        let home = self
            .server
            .mock("GET", "/")
            .match_header("cookie", Matcher::Regex(SESSION_COOKIE.into()))
            .with_status(200)
            .with_body(format!(
                r#"<h1 class="govuk-heading-l">{heading}</h1><p>{HOME_TEXT}</p>"#
            ))
            .create();
        self.keep("home", home);

        let signed_out = self
            .server
            .mock("GET", "/")
            .match_header("cookie", Matcher::Missing)
            .with_status(200)
            .with_body(r#"<h1 class="govuk-heading-l">Sign in</h1>"#)
            .create();
        self.keep("signed out home", signed_out);
    }

    /// Admin page and the review body create, confirm, submit chain. All
    /// need the session cookie.
    pub fn mount_pages(&mut self) {
        let signed_in = || Matcher::Regex(SESSION_COOKIE.into());

        let admin = self
            .server
            .mock("GET", "/admin")
            .match_header("cookie", signed_in())
            .with_status(200)
            .with_body("<p>Admin area</p>")
            .create();
        self.keep("admin", admin);

        let forbidden = self
            .server
            .mock("GET", "/admin")
            .match_header("cookie", Matcher::Missing)
            .with_status(403)
            .create();
        self.keep("admin forbidden", forbidden);

        let create = self
            .server
            .mock("GET", "/reviewbody/create")
            .match_header("cookie", signed_in())
            .with_status(200)
            .with_body(token_page("Add a review body", CREATE_TOKEN))
            .create();
        self.keep("create", create);

        let confirm = self
            .form_post(
                "/reviewbody/confirm-changes",
                vec![
                    Matcher::UrlEncoded("__RequestVerificationToken".into(), CREATE_TOKEN.into()),
                    Matcher::Regex(r"(^|&)OrganisationName=LoadTestOrg[0-9]{13}(&|$)".into()),
                    Matcher::UrlEncoded("Countries".into(), "England".into()),
                ],
            )
            .match_header("cookie", signed_in())
            .with_status(200)
            .with_body(token_page("Check and confirm", CONFIRM_TOKEN))
            .create();
        self.keep("confirm", confirm);

        let submit = self
            .form_post(
                "/reviewbody/submit",
                vec![Matcher::UrlEncoded(
                    "__RequestVerificationToken".into(),
                    CONFIRM_TOKEN.into(),
                )],
            )
            .match_header("cookie", signed_in())
            .with_status(200)
            .with_body("<p>Review body added</p>")
            .create();
        self.keep("submit", submit);
    }
}

/// Identity provider page carrying the CSRF token.
pub fn form_page(title: &str) -> String {
    format!(
        r#"<html><body><h1 class="govuk-heading-l">{title}</h1>
<form method="post"><input type="hidden" name="_csrf" value="{CSRF}"/></form>
</body></html>"#
    )
}

fn token_page(title: &str, token: &str) -> String {
    format!(
        r#"<h1>{title}</h1><form method="post">
<input name="__RequestVerificationToken" type="hidden" value="{token}"/></form>"#
    )
}
