//! Credential resolution.
//!
//! A test run gets its account password from one of two environment
//! variables:
//!
//! - `ENCRYPTED_DATA`: an envelope produced by `loadcred encrypt`,
//!   decrypted with the local key file. Checked first.
//! - `SECRET_DATA`: the plaintext password, as injected by a CI secret
//!   store.
//!
//! With neither set the run must stop before sending any request.

use std::fmt;
use std::path::Path;

use tracing::debug;
use zeroize::Zeroizing;

use crate::core::cipher::{self, CipherConfig};
use crate::core::constants::{ENCRYPTED_VAR, SECRET_VAR};
use crate::error::{CredentialError, Result};

/// Where the credential came from.
pub enum CredentialSource {
    /// Base64 envelope that still needs the key.
    Encrypted(String),
    /// Plaintext credential, used as-is.
    Plain(Zeroizing<String>),
}

impl CredentialSource {
    /// Read the credential variables from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::NotConfigured` if neither variable is set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve using an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(envelope) = get(ENCRYPTED_VAR) {
            debug!(var = ENCRYPTED_VAR, "credential source: encrypted");
            return Ok(Self::Encrypted(envelope));
        }
        if let Some(secret) = get(SECRET_VAR) {
            debug!(var = SECRET_VAR, "credential source: plain");
            return Ok(Self::Plain(Zeroizing::new(secret)));
        }

        Err(CredentialError::NotConfigured {
            encrypted: ENCRYPTED_VAR,
            plain: SECRET_VAR,
        }
        .into())
    }

    /// Name of the variable this source was read from.
    pub fn var(&self) -> &'static str {
        match self {
            Self::Encrypted(_) => ENCRYPTED_VAR,
            Self::Plain(_) => SECRET_VAR,
        }
    }

    /// Produce the plaintext credential.
    ///
    /// The key file is only read for the encrypted source. A decryption
    /// failure is returned as an error; the envelope is never used as the
    /// password.
    ///
    /// # Errors
    ///
    /// Returns `KeyError` if the key file cannot be loaded and
    /// `CredentialError::Undecryptable` if the envelope does not open.
    pub fn reveal(&self, key_file: &Path) -> Result<Zeroizing<String>> {
        match self {
            Self::Plain(secret) => Ok(secret.clone()),
            Self::Encrypted(envelope) => {
                let config = CipherConfig::from_key_file(key_file)?;
                self.reveal_with(&config, envelope)
            }
        }
    }

    fn reveal_with(&self, config: &CipherConfig, envelope: &str) -> Result<Zeroizing<String>> {
        cipher::decrypt(config, envelope)
            .map(Zeroizing::new)
            .map_err(|e| {
                CredentialError::Undecryptable {
                    var: self.var(),
                    source: Box::new(e),
                }
                .into()
            })
    }
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encrypted(e) => write!(f, "Encrypted({} chars)", e.len()),
            Self::Plain(_) => write!(f, "Plain([redacted])"),
        }
    }
}
