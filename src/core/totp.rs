//! Time-based one-time passwords for the multi-factor sign-in step.
//!
//! RFC 6238 with HMAC-SHA1, six digits and a 30 second step, delegated to
//! `totp-rs`.

use std::fmt;

use totp_rs::{Algorithm, Secret, TOTP};

use crate::core::constants::{TOTP_DIGITS, TOTP_STEP};
use crate::error::{Result, TotpError};

/// Code generator bound to one shared secret.
pub struct TotpGenerator {
    totp: TOTP,
}

impl TotpGenerator {
    /// Build from a base32 secret as shown by authenticator enrolment.
    ///
    /// Whitespace and `=` padding are ignored and lowercase is accepted.
    ///
    /// # Errors
    ///
    /// Returns `TotpError::EmptySecret` or `TotpError::InvalidSecret`.
    pub fn from_base32(secret: &str) -> Result<Self> {
        let normalized: String = secret
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '=')
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if normalized.is_empty() {
            return Err(TotpError::EmptySecret.into());
        }

        let bytes = Secret::Encoded(normalized)
            .to_bytes()
            .map_err(|e| TotpError::InvalidSecret(format!("{:?}", e)))?;

        if bytes.is_empty() {
            return Err(TotpError::EmptySecret.into());
        }

        // Enrolment secrets shorter than 128 bits are common; accept them.
        let totp = TOTP::new_unchecked(Algorithm::SHA1, TOTP_DIGITS, 1, TOTP_STEP, bytes);
        Ok(Self { totp })
    }

    /// Code for the step containing `unix_seconds`.
    pub fn generate_at(&self, unix_seconds: u64) -> String {
        self.totp.generate(unix_seconds)
    }

    /// Code for the current step.
    ///
    /// # Errors
    ///
    /// Returns `TotpError::Clock` if the system clock is before the epoch.
    pub fn current(&self) -> Result<String> {
        Ok(self.totp.generate_current().map_err(TotpError::Clock)?)
    }

    /// Seconds until the current code expires.
    ///
    /// # Errors
    ///
    /// Returns `TotpError::Clock` if the system clock is before the epoch.
    pub fn ttl(&self) -> Result<u64> {
        Ok(self.totp.ttl().map_err(TotpError::Clock)?)
    }
}

impl fmt::Debug for TotpGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TotpGenerator")
            .field("digits", &TOTP_DIGITS)
            .field("step", &TOTP_STEP)
            .finish_non_exhaustive()
    }
}
