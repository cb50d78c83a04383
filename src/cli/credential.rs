//! Credential command.
//!
//! Resolves the account credential exactly as a test run's setup does, so
//! a misconfigured environment fails here rather than mid-run.

use std::path::Path;

use crate::cli::output;
use crate::core::credential::CredentialSource;
use crate::error::Result;

/// Resolve the credential from the environment.
pub fn execute(key_file: &Path, reveal: bool) -> Result<()> {
    let source = CredentialSource::from_env()?;
    let secret = source.reveal(key_file)?;

    if reveal {
        println!("{}", secret.as_str());
        return Ok(());
    }

    output::success(&format!("credential resolved from {}", output::key(source.var())));
    output::kv("chars:", secret.chars().count());
    Ok(())
}
