//! Loadcred - credential tooling and journey replay for portal load tests.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── keygen        # Create the key-array file
//! │   ├── encrypt       # Seal a credential into an envelope
//! │   ├── decrypt       # Verify or open an envelope
//! │   ├── credential    # Resolve the credential as a test run would
//! │   ├── totp          # Print the current MFA code
//! │   ├── signin        # Run the sign-in journey once
//! │   ├── run           # Sign in, replay page checks, report
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── cipher/       # AES-256-GCM credential cipher and envelope
//!     ├── keys          # Key-array file generation and loading
//!     ├── credential    # ENCRYPTED_DATA / SECRET_DATA resolution
//!     ├── totp          # RFC 6238 codes
//!     ├── page          # Hidden form field extraction
//!     ├── config        # loadcred.toml
//!     └── journey/      # Session, sign-in, page checks, summary, thresholds
//! ```
//!
//! # Example
//!
//! ```
//! use loadcred::core::cipher::{self, CipherConfig};
//!
//! let config = CipherConfig::new([0u8; 32]);
//! let envelope = cipher::encrypt(&config, "Sup3rSecret!").unwrap();
//! assert_eq!(cipher::decrypt(&config, &envelope).unwrap(), "Sup3rSecret!");
//! ```

pub mod cli;
pub mod core;
pub mod error;
