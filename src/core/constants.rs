//! Constants used throughout loadcred.
//!
//! Centralizes magic strings and configuration values.

/// Configuration file name (loadcred.toml).
pub const CONFIG_FILE: &str = "loadcred.toml";

/// Default key file location, relative to the working directory.
pub const KEY_FILE: &str = "resources/data/keyArray.json";

/// Default summary report location.
pub const REPORT_FILE: &str = "tests/results/loadcredReport.json";

/// Environment variable holding a locally encrypted credential envelope.
pub const ENCRYPTED_VAR: &str = "ENCRYPTED_DATA";

/// Environment variable holding a plaintext credential injected by CI.
pub const SECRET_VAR: &str = "SECRET_DATA";

/// Environment variable holding the base32 MFA secret.
pub const MFA_SECRET_VAR: &str = "MFA_SECRET";

/// Environment variable overriding the log filter.
pub const LOG_VAR: &str = "LOADCRED_LOG";

/// Longest accepted think time, in seconds.
pub const MAX_THINK_TIME_SECS: f64 = 3600.0;

/// Placeholder in page form values replaced by the current epoch millis.
pub const TIMESTAMP_PLACEHOLDER: &str = "{timestamp}";

/// Default tenant appended to identity server usernames.
pub const TENANT_DOMAIN: &str = "carbon.super";

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// TOTP code length.
pub const TOTP_DIGITS: usize = 6;

/// TOTP time step in seconds.
pub const TOTP_STEP: u64 = 30;
