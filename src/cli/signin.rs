//! Signin command.
//!
//! Runs the sign-in journey once and prints each step's timing. Doubles as
//! the setup phase of `run`.

use tracing::info;

use crate::cli::{output, totp};
use crate::core::config::{Config, SigninFlow};
use crate::core::credential::CredentialSource;
use crate::core::journey::{Flow, Session, SignIn};
use crate::core::totp::TotpGenerator;
use crate::error::Result;

/// Sign in and report step timings.
pub fn execute(config: &Config) -> Result<()> {
    let session = authenticated_session(config)?;

    output::section("Sign-in");
    for sample in session.samples() {
        output::sample(&sample.step, sample.status, sample.duration_ms);
    }
    output::success("signed in");
    Ok(())
}

/// Resolve every input and sign in.
///
/// Configuration and credential problems surface before the first request.
pub(crate) fn authenticated_session(config: &Config) -> Result<Session> {
    let portal = config.portal_url()?;
    let username = config.username()?;
    let password = CredentialSource::from_env()?.reveal(&config.keys.file)?;
    let generator;
    let flow = match config.signin.flow {
        SigninFlow::OneLogin => {
            generator = TotpGenerator::from_base32(&totp::mfa_secret(None, config)?)?;
            Flow::OneLogin { totp: &generator }
        }
        SigninFlow::IdentityServer => Flow::IdentityServer {
            tenant_domain: &config.signin.tenant_domain,
        },
    };

    info!(portal = %portal, flow = ?config.signin.flow, "signing in");
    let mut session = Session::new(config.timeout())?;
    SignIn {
        portal: &portal,
        username,
        password: &password,
        flow,
        heading_class: &config.portal.home_heading_class,
        heading: &config.portal.home_heading,
    }
    .run(&mut session)?;

    Ok(session)
}
