//! Keygen command.
//!
//! Creates the key-array file every envelope is sealed under.

use std::path::Path;

use tracing::info;

use crate::cli::output;
use crate::core::keys::KeyFile;
use crate::error::Result;

/// Generate a key and write it to `path`.
pub fn execute(path: &Path, force: bool) -> Result<()> {
    info!(path = %path.display(), force, "generating key");

    let key = KeyFile::generate(path);
    key.save(force)?;

    output::success(&format!("key written to {}", output::path(&path.display().to_string())));
    output::kv("algorithm:", "aes-256-gcm");
    output::kv("format:   ", "JSON array of 32 bytes");
    output::warn("anyone with this file can decrypt every envelope sealed under it");
    output::hint(&format!(
        "next: {}",
        output::cmd("loadcred encrypt > envelope.txt")
    ));
    Ok(())
}
