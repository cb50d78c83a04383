//! Error types.
//!
//! Each concern owns a small error enum; [`Error`] wraps them all so
//! callers can use a single [`Result`] alias and `?` across layers.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Totp(#[from] TotpError),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error(transparent)]
    Journey(#[from] JourneyError),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Configuration file problems.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid url for {field}: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("missing config value: {0}")]
    Missing(&'static str),
}

/// Credential cipher failures.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("authentication failed: wrong key or tampered envelope")]
    AuthenticationFailed,
}

/// Key file failures.
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("key file not found: {0}")]
    NotFound(PathBuf),

    #[error("key file already exists: {0} (use --force to overwrite)")]
    AlreadyExists(PathBuf),

    #[error("failed to read key file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write key file: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("invalid key file {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Credential resolution failures.
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("no credential configured: set {encrypted} or {plain}")]
    NotConfigured {
        encrypted: &'static str,
        plain: &'static str,
    },

    #[error("failed to decrypt {var}: {source}")]
    Undecryptable {
        var: &'static str,
        #[source]
        source: Box<Error>,
    },
}

/// One-time password failures.
#[derive(Error, Debug)]
pub enum TotpError {
    #[error("invalid base32 secret: {0}")]
    InvalidSecret(String),

    #[error("empty TOTP secret")]
    EmptySecret,

    #[error("no TOTP secret: pass one or set {0}")]
    NotConfigured(String),

    #[error("system clock error: {0}")]
    Clock(#[from] std::time::SystemTimeError),
}

/// Page scraping failures.
#[derive(Error, Debug)]
pub enum PageError {
    #[error("field not found on page: {0}")]
    NotFound(String),

    #[error("url has no query parameters: {0}")]
    NoQuery(String),
}

/// Journey execution failures.
#[derive(Error, Debug)]
pub enum JourneyError {
    #[error("http request failed at {step}: {source}")]
    Request {
        step: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("unexpected status {status} at {step}")]
    Status { step: String, status: u16 },

    #[error("sign-in did not reach the authenticated home page")]
    NotAuthenticated,

    #[error("invalid threshold expression: {0}")]
    InvalidThreshold(String),

    #[error("thresholds crossed: {0}")]
    ThresholdsCrossed(String),

    #[error("failed to write report: {0}")]
    Report(String),
}

pub type Result<T> = std::result::Result<T, Error>;
