//! Deploy-support command.
//!
//! Authenticates against the cluster, makes sure the local docker config has
//! a credential helper for the cluster's image registry, and installs or
//! upgrades the cluster-wide support charts inside the scope.

use std::path::Path;

use crate::cli::output;
use crate::core::auth::ClusterAuth;
use crate::core::config::ClusterConfig;
use crate::core::decrypt::SopsDecryptor;
use crate::core::process::{self, SystemRunner};
use crate::core::{registry, support};
use crate::error::Result;

pub fn execute(config_dir: &Path, cluster_name: &str, chart_dir: &Path) -> Result<()> {
    let cluster = ClusterConfig::load(config_dir, cluster_name)?;

    let mut binaries = cluster.required_binaries();
    binaries.push("helm");
    process::preflight(&binaries)?;

    if let Some(image_repo) = &cluster.image_repo {
        if registry::ensure_cred_helper(image_repo)? {
            output::success("registry credential helper configured");
        }
    }

    let runner = SystemRunner;
    let decryptor = SopsDecryptor::new(&runner);
    let auth = ClusterAuth::new(&runner, &decryptor);

    output::step(&format!("Authenticating to {}...", cluster.name));
    auth.with_cluster_access(&cluster, || {
        output::step("Provisioning support charts...");
        support::deploy_support(&runner, &decryptor, &cluster, chart_dir)
    })?;

    output::success(&format!("support charts deployed to {}", cluster.name));
    Ok(())
}
