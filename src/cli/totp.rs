//! TOTP command.

use crate::cli::output;
use crate::core::config::Config;
use crate::core::totp::TotpGenerator;
use crate::error::{Result, TotpError};

/// Print the current code for `secret` or the configured variable.
pub fn execute(secret: Option<String>, config: &Config) -> Result<()> {
    let totp = TotpGenerator::from_base32(&mfa_secret(secret, config)?)?;

    println!("{}", totp.current()?);
    output::dimmed(&format!("valid for {}s", totp.ttl()?));
    Ok(())
}

/// Secret from the argument, else from the configured environment variable.
pub(crate) fn mfa_secret(secret: Option<String>, config: &Config) -> Result<String> {
    if let Some(secret) = secret {
        return Ok(secret);
    }
    let var = &config.signin.mfa_secret_var;
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| TotpError::NotConfigured(var.clone()).into())
}
