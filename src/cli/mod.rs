//! Command-line interface.

pub mod credentials;
pub mod output;
pub mod support;
pub mod validate;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::core::constants;
use crate::error::Result;

/// Caravel - deploy and operate Helm-based workloads on Kubernetes clusters
/// across cloud providers.
#[derive(Parser)]
#[command(
    name = "caravel",
    about = "Deploy and operate Helm-based workloads on Kubernetes clusters across cloud providers",
    version
)]
pub struct Cli {
    /// Directory containing per-cluster configuration
    #[arg(
        long,
        global = true,
        env = "CARAVEL_CONFIG_DIR",
        default_value = constants::DEFAULT_CONFIG_DIR
    )]
    pub config_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Validate a cluster's configuration
    Validate {
        /// The name of the cluster to validate
        cluster_name: String,
    },

    /// Install/upgrade the cluster-wide support charts (cert-manager plus
    /// the support release)
    DeploySupport {
        /// The name of the cluster to deploy support charts to
        cluster_name: String,
        /// Location of the support chart
        #[arg(long, default_value = constants::DEFAULT_CHART_DIR)]
        chart_dir: PathBuf,
    },

    /// Open a subshell with the cluster's credentials loaded
    UseClusterCredentials {
        /// The name of the cluster to authenticate against
        cluster_name: String,
    },
}

/// Execute a parsed command.
pub fn execute(command: Command, config_dir: &Path) -> Result<()> {
    match command {
        Command::Validate { cluster_name } => validate::execute(config_dir, &cluster_name),
        Command::DeploySupport {
            cluster_name,
            chart_dir,
        } => support::execute(config_dir, &cluster_name, &chart_dir),
        Command::UseClusterCredentials { cluster_name } => {
            credentials::execute(config_dir, &cluster_name)
        }
    }
}
