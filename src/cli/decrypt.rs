//! Decrypt command.
//!
//! Confirms an envelope opens under the key file before it is handed to a
//! test run. The plaintext is only printed on request.

use std::path::Path;

use zeroize::Zeroizing;

use crate::cli::output;
use crate::core::cipher::{self, CipherConfig, Envelope};
use crate::error::Result;

/// Open `envelope` with the key at `key_file`.
pub fn execute(envelope: &str, key_file: &Path, reveal: bool) -> Result<()> {
    let config = CipherConfig::from_key_file(key_file)?;
    let plaintext = Zeroizing::new(cipher::decrypt(&config, envelope)?);

    if reveal {
        println!("{}", plaintext.as_str());
        return Ok(());
    }

    let parsed = Envelope::decode(envelope)?;
    output::success("envelope opens with this key");
    output::kv("envelope bytes:", parsed.len());
    output::kv("plaintext bytes:", parsed.plaintext_len());
    output::kv("plaintext chars:", plaintext.chars().count());
    Ok(())
}
