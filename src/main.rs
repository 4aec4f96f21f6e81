//! Caravel - deploy and operate Helm-based workloads on Kubernetes clusters
//! across cloud providers.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use caravel::cli::output;
use caravel::cli::{execute, Cli};
use caravel::core::constants;
use caravel::error::{AuthError, CommandError, ConfigError, Error};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env(constants::LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("caravel=debug")
        } else {
            EnvFilter::new("caravel=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time())
        .init();

    if let Err(e) = execute(cli.command, &cli.config_dir) {
        let suggestion = match &e {
            Error::Config(ConfigError::NotFound(_)) => {
                Some("check the cluster name and --config-dir")
            }
            Error::Command(CommandError::NotFound(_)) => {
                Some("install the missing executable and make sure it is on PATH")
            }
            Error::Auth(AuthError::ScopeActive) => {
                Some("finish the other cluster operation first")
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
