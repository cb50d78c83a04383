//! Loadcred - credential tooling and journey replay for portal load tests.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use loadcred::cli::output;
use loadcred::cli::{execute, Cli};
use loadcred::core::constants;
use loadcred::error::{ConfigError, CredentialError, Error, KeyError};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(constants::LOG_VAR).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("loadcred=debug")
        } else {
            EnvFilter::new("loadcred=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    if let Err(e) = execute(cli.command, &cli.config) {
        let suggestion = match &e {
            Error::Credential(CredentialError::NotConfigured { .. }) => {
                Some("export ENCRYPTED_DATA=$(loadcred encrypt) or SECRET_DATA=...")
            }
            Error::Key(KeyError::NotFound(_)) => Some("run: loadcred keygen"),
            Error::Config(ConfigError::Missing(_)) => Some("add the value to loadcred.toml"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
