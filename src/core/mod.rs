//! Core library components.
//!
//! Credential protection, one-time codes, configuration, and the journey
//! runner. Nothing here prints; the CLI layer owns all output.

pub mod cipher;
pub mod config;
pub mod constants;
pub mod credential;
pub mod journey;
pub mod keys;
pub mod page;
pub mod totp;
