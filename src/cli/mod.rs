//! Command-line interface.

pub mod completions;
pub mod credential;
pub mod decrypt;
pub mod encrypt;
pub mod keygen;
pub mod output;
pub mod run;
pub mod signin;
pub mod totp;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::core::config::Config;
use crate::core::constants;
use crate::error::Result;

/// Loadcred - credential tooling and journey replay for portal load tests.
#[derive(Parser)]
#[command(
    name = "loadcred",
    about = "Credential cipher, TOTP, and sign-in journey replay for portal load tests",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the configuration file
    #[arg(long, global = true, default_value = constants::CONFIG_FILE)]
    pub config: PathBuf,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Generate a new 256-bit key file
    Keygen {
        /// Where to write the key array (defaults to keys.file)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Overwrite an existing key file
        #[arg(short, long)]
        force: bool,
    },

    /// Encrypt a credential into a base64 envelope
    Encrypt {
        /// Value to encrypt (read from stdin or prompted if omitted)
        value: Option<String>,
        /// Key file (defaults to keys.file)
        #[arg(short, long)]
        key_file: Option<PathBuf>,
    },

    /// Check that an envelope opens with the key
    Decrypt {
        /// Envelope to open
        #[arg(env = "ENCRYPTED_DATA", hide_env_values = true)]
        envelope: String,
        /// Key file (defaults to keys.file)
        #[arg(short, long)]
        key_file: Option<PathBuf>,
        /// Print the plaintext
        #[arg(long)]
        reveal: bool,
    },

    /// Resolve the credential from ENCRYPTED_DATA or SECRET_DATA
    Credential {
        /// Key file (defaults to keys.file)
        #[arg(short, long)]
        key_file: Option<PathBuf>,
        /// Print the plaintext
        #[arg(long)]
        reveal: bool,
    },

    /// Print the current one-time code
    Totp {
        /// Base32 secret (defaults to the variable named by signin.mfa_secret_var)
        secret: Option<String>,
    },

    /// Run the sign-in journey once
    Signin,

    /// Sign in, replay the page checks, and write a summary report
    Run {
        /// Override journey.iterations
        #[arg(short = 'n', long)]
        iterations: Option<u32>,
        /// Override journey.report
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a command.
///
/// The configuration file is read for every command except completions.
pub fn execute(command: Command, config_path: &Path) -> Result<()> {
    use Command::*;

    let load = || Config::load(config_path);

    match command {
        Keygen { out, force } => keygen::execute(&key_path(&load()?, out), force),
        Encrypt { value, key_file } => encrypt::execute(value, &key_path(&load()?, key_file)),
        Decrypt {
            envelope,
            key_file,
            reveal,
        } => decrypt::execute(&envelope, &key_path(&load()?, key_file), reveal),
        Credential { key_file, reveal } => {
            credential::execute(&key_path(&load()?, key_file), reveal)
        }
        Totp { secret } => totp::execute(secret, &load()?),
        Signin => signin::execute(&load()?),
        Run { iterations, report } => run::execute(&load()?, iterations, report),
        Completions { shell } => completions::execute(shell),
    }
}

/// Key file from the command line, else from the config.
fn key_path(config: &Config, override_path: Option<PathBuf>) -> PathBuf {
    override_path.unwrap_or_else(|| config.keys.file.clone())
}
