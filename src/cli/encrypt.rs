//! Encrypt command.
//!
//! Seals a credential under the key file. The envelope alone goes to
//! stdout so it can be captured straight into `ENCRYPTED_DATA`.

use std::io::{self, IsTerminal, Read};
use std::path::Path;

use dialoguer::Password;
use tracing::debug;
use zeroize::Zeroizing;

use crate::core::cipher::{AesGcm, Cipher, CipherConfig};
use crate::error::{Error, Result};

/// Encrypt `value`, or stdin, or a hidden prompt.
pub fn execute(value: Option<String>, key_file: &Path) -> Result<()> {
    let config = CipherConfig::from_key_file(key_file)?;

    let plaintext = Zeroizing::new(match value {
        Some(v) => v,
        None => read_plaintext()?,
    });

    if plaintext.is_empty() {
        return Err(Error::Other("refusing to encrypt an empty value".to_string()));
    }

    let cipher = AesGcm::new(&config);
    let envelope = cipher.encrypt(&plaintext)?;
    debug!(cipher = cipher.name(), envelope_len = envelope.len(), "sealed");

    println!("{}", envelope);
    Ok(())
}

fn read_plaintext() -> Result<String> {
    if io::stdin().is_terminal() {
        return Ok(Password::new()
            .with_prompt("Value to encrypt")
            .with_confirmation("Confirm value", "values do not match")
            .interact()?);
    }

    let mut input = Zeroizing::new(String::new());
    io::stdin().read_to_string(&mut input)?;
    // Drop the line ending a pipe usually adds, nothing else.
    let value = input.strip_suffix('\n').unwrap_or(input.as_str());
    let value = value.strip_suffix('\r').unwrap_or(value);
    Ok(value.to_string())
}
