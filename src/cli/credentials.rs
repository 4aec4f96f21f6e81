//! Use-cluster-credentials command.
//!
//! Authenticates against the named cluster and spawns the operator's shell
//! inside the scope, so kubectl/helm in that shell talk to the cluster.
//! Credentials are torn down when the shell exits; its exit code passes
//! through.

use std::env;
use std::path::Path;
use std::process::Command;

use crate::cli::output;
use crate::core::auth::ClusterAuth;
use crate::core::config::ClusterConfig;
use crate::core::decrypt::SopsDecryptor;
use crate::core::process::{self, SystemRunner};
use crate::error::Result;

pub fn execute(config_dir: &Path, cluster_name: &str) -> Result<()> {
    let cluster = ClusterConfig::load(config_dir, cluster_name)?;
    process::preflight(&cluster.required_binaries())?;

    let runner = SystemRunner;
    let decryptor = SopsDecryptor::new(&runner);
    let auth = ClusterAuth::new(&runner, &decryptor);

    output::step(&format!("Authenticating to {}...", cluster.name));
    let code = auth.with_cluster_access(&cluster, || {
        output::success(&format!("credentials loaded for {}", cluster.name));
        output::hint("exit the shell to release them");

        let shell = env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string());
        let status = Command::new(shell).status()?;
        Ok(status.code().unwrap_or(1))
    })?;

    std::process::exit(code)
}
