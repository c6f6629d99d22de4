//! Bullpen - an encrypted secrets vault with policy-driven rotation.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bullpen::cli::output;
use bullpen::cli::{execute, Cli};
use bullpen::core::config::Config;
use bullpen::core::constants::LOG_ENV;
use bullpen::error::{ConfigError, Error, NotFoundError, PersistenceError};

fn main() {
    let cli = Cli::parse();

    let config = Config::discover(cli.config.as_deref());
    let json_logs = config.as_ref().map(|c| c.log.json).unwrap_or(false);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("bullpen=debug")
        } else {
            EnvFilter::new("bullpen=warn")
        }
    });

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    let result = config.and_then(|config| execute(cli.command, &config));
    if let Err(e) = result {
        let suggestion = match &e {
            Error::Config(ConfigError::NotInitialized) => Some("run: bullpen init"),
            Error::Config(ConfigError::AlreadyInitialized(_)) => {
                Some("the vault already exists; remove it to start over")
            }
            Error::Persistence(PersistenceError::Decrypt(_)) => {
                Some("check that [vault] identity points at the key used to create the vault")
            }
            Error::NotFound(NotFoundError::PolicyForSecret { .. }) => {
                Some("create one with: bullpen policy put <file.json>")
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
