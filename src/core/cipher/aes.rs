//! AES-256-GCM credential cipher.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use rand::RngCore;
use tracing::trace;

use super::{Cipher, CipherConfig, Envelope};
use crate::core::constants::NONCE_LEN;
use crate::error::{CipherError, Result};

/// AES-256-GCM with a random 96-bit nonce per call.
pub struct AesGcm {
    cipher: Aes256Gcm,
}

impl AesGcm {
    pub fn new(config: &CipherConfig) -> Self {
        let key = Key::<Aes256Gcm>::from_slice(config.key());
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }
}

impl Cipher for AesGcm {
    fn name(&self) -> &'static str {
        "aes-256-gcm"
    }

    fn encrypt(&self, plaintext: &str) -> Result<String> {
        trace!(plaintext_len = plaintext.len(), "encrypting");

        let mut nonce = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce);

        let sealed = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

        let envelope = Envelope::new(nonce, sealed);
        trace!(envelope_len = envelope.len(), "encrypted");

        Ok(envelope.encode())
    }

    fn decrypt(&self, encoded: &str) -> Result<String> {
        trace!(encoded_len = encoded.len(), "decrypting");

        let envelope = Envelope::decode(encoded)?;
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(envelope.nonce()), envelope.sealed())
            .map_err(|_| CipherError::AuthenticationFailed)?;

        trace!(plaintext_len = plaintext.len(), "decrypted");

        String::from_utf8(plaintext).map_err(|e| {
            CipherError::DecryptionFailed(format!("plaintext is not UTF-8: {}", e.utf8_error()))
                .into()
        })
    }
}
