//! Credential cipher.
//!
//! Protects a single credential (typically the load-test account password)
//! with AES-256-GCM so it can travel through an environment variable.
//!
//! ## Envelope
//!
//! ```text
//! base64( nonce[12] || ciphertext || tag[16] )
//! ```
//!
//! A fresh nonce is drawn from the OS random source for every call, so
//! encrypting the same value twice never yields the same envelope. Any
//! modification of the envelope, or a different key, makes decryption fail
//! with an authentication error rather than returning garbage.

use std::fmt;
use std::path::Path;

use zeroize::Zeroizing;

use crate::core::constants::KEY_LEN;
use crate::core::keys::KeyFile;
use crate::error::{CipherError, Result};

mod aes;
mod envelope;

pub use aes::AesGcm;
pub use envelope::Envelope;

/// Symmetric credential cipher.
///
/// Implementations are pure: no shared mutable state, safe to call from
/// any number of threads.
pub trait Cipher {
    /// Encrypt `plaintext` into a base64 envelope.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::EncryptionFailed` if the primitive fails.
    fn encrypt(&self, plaintext: &str) -> Result<String>;

    /// Decrypt a base64 envelope back into its plaintext.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::MalformedEnvelope` for undecodable or truncated
    /// input and `CipherError::AuthenticationFailed` for a wrong key or a
    /// tampered envelope.
    fn decrypt(&self, envelope: &str) -> Result<String>;

    /// Algorithm name for display.
    fn name(&self) -> &'static str;
}

/// Key material for the credential cipher.
///
/// Built once at process start and passed to whatever needs to encrypt or
/// decrypt. The key is wiped from memory on drop.
#[derive(Clone)]
pub struct CipherConfig {
    key: Zeroizing<[u8; KEY_LEN]>,
}

impl CipherConfig {
    /// Wrap a 256-bit key.
    pub fn new(key: [u8; KEY_LEN]) -> Self {
        Self {
            key: Zeroizing::new(key),
        }
    }

    /// Build from a byte slice, rejecting anything but 32 bytes.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::InvalidKeyLength` if `key` is not 32 bytes.
    pub fn from_slice(key: &[u8]) -> Result<Self> {
        let key: [u8; KEY_LEN] = key.try_into().map_err(|_| CipherError::InvalidKeyLength {
            expected: KEY_LEN,
            actual: key.len(),
        })?;
        Ok(Self::new(key))
    }

    /// Load the key from a JSON key-array file.
    ///
    /// # Errors
    ///
    /// Returns `KeyError` if the file is missing or malformed.
    pub fn from_key_file(path: &Path) -> Result<Self> {
        Ok(KeyFile::load(path)?.into_config())
    }

    /// Raw key bytes.
    pub fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }
}

impl fmt::Debug for CipherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherConfig")
            .field("key", &"[redacted]")
            .finish()
    }
}

/// Encrypt `plaintext` under `config`.
///
/// Convenience wrapper around [`AesGcm::encrypt`].
///
/// # Errors
///
/// Returns `CipherError` if encryption fails.
pub fn encrypt(config: &CipherConfig, plaintext: &str) -> Result<String> {
    AesGcm::new(config).encrypt(plaintext)
}

/// Decrypt an envelope under `config`.
///
/// Convenience wrapper around [`AesGcm::decrypt`].
///
/// # Errors
///
/// Returns `CipherError` if the envelope is malformed, was sealed with a
/// different key, or has been modified.
pub fn decrypt(config: &CipherConfig, envelope: &str) -> Result<String> {
    AesGcm::new(config).decrypt(envelope)
}
