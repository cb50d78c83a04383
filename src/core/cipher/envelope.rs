//! Envelope wire format.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::core::constants::{NONCE_LEN, TAG_LEN};
use crate::error::{CipherError, Result};

/// Nonce plus sealed bytes (ciphertext with the GCM tag appended).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    nonce: [u8; NONCE_LEN],
    sealed: Vec<u8>,
}

impl Envelope {
    /// Assemble an envelope from a nonce and the AEAD output.
    pub fn new(nonce: [u8; NONCE_LEN], sealed: Vec<u8>) -> Self {
        Self { nonce, sealed }
    }

    /// Parse a base64 envelope.
    ///
    /// Surrounding whitespace is ignored so values pasted into env files
    /// with a trailing newline still parse.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::MalformedEnvelope` if the input is not base64
    /// or is too short to hold a nonce and a tag.
    pub fn decode(encoded: &str) -> Result<Self> {
        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|e| CipherError::MalformedEnvelope(format!("not valid base64: {}", e)))?;

        if bytes.len() < NONCE_LEN + TAG_LEN {
            return Err(CipherError::MalformedEnvelope(format!(
                "{} bytes is shorter than nonce and tag ({} bytes)",
                bytes.len(),
                NONCE_LEN + TAG_LEN
            ))
            .into());
        }

        let (nonce, sealed) = bytes.split_at(NONCE_LEN);
        let mut nonce_bytes = [0u8; NONCE_LEN];
        nonce_bytes.copy_from_slice(nonce);

        Ok(Self {
            nonce: nonce_bytes,
            sealed: sealed.to_vec(),
        })
    }

    /// Encode as base64 text.
    pub fn encode(&self) -> String {
        let mut bytes = Vec::with_capacity(self.len());
        bytes.extend_from_slice(&self.nonce);
        bytes.extend_from_slice(&self.sealed);
        BASE64.encode(bytes)
    }

    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    pub fn sealed(&self) -> &[u8] {
        &self.sealed
    }

    /// Decoded length in bytes (nonce + ciphertext + tag).
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        NONCE_LEN + self.sealed.len()
    }

    /// Length of the plaintext this envelope carries.
    pub fn plaintext_len(&self) -> usize {
        self.sealed.len().saturating_sub(TAG_LEN)
    }
}
