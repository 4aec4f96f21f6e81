//! Cluster-wide support chart deployment.
//!
//! Installs shared infrastructure (cert-manager, the "support" umbrella
//! chart) once per cluster. Must run inside an active authentication scope:
//! every helm call reads the scope's `KUBECONFIG`. Each step blocks, and the
//! first failure aborts the remaining steps with no partial-install recovery.

use std::path::Path;

use tracing::info;

use crate::core::auth::ScopeToken;
use crate::core::config::ClusterConfig;
use crate::core::constants;
use crate::core::decrypt::Decryptor;
use crate::core::process::{self, CommandRunner};
use crate::error::Result;

pub fn deploy_support(
    runner: &dyn CommandRunner,
    decryptor: &dyn Decryptor,
    cluster: &ClusterConfig,
    chart_dir: &Path,
) -> Result<()> {
    ScopeToken::ensure_active()?;

    info!(cluster = %cluster.name, "adding cert-manager chart repo");
    runner.run(&process::argv([
        "helm",
        "repo",
        "add",
        "jetstack",
        constants::CERT_MANAGER_REPO,
    ]))?;
    runner.run(&process::argv(["helm", "repo", "update"]))?;

    info!(cluster = %cluster.name, "provisioning cert-manager");
    let version = format!("--version={}", constants::CERT_MANAGER_VERSION);
    runner.run(&process::argv([
        "helm",
        "upgrade",
        "--install",
        "--create-namespace",
        "--namespace=cert-manager",
        "cert-manager",
        "jetstack/cert-manager",
        version.as_str(),
        "--set=installCRDs=true",
    ]))?;

    info!(cluster = %cluster.name, chart_dir = %chart_dir.display(), "updating chart dependencies");
    let mut cmd = process::argv(["helm", "dep", "up"]);
    cmd.push(chart_dir.as_os_str().to_os_string());
    runner.run(&cmd)?;

    info!(cluster = %cluster.name, "provisioning support charts");
    let secrets = decryptor.decrypt(&chart_dir.join(constants::SUPPORT_SECRETS_FILE))?;

    let mut cmd = process::argv([
        "helm",
        "upgrade",
        "--install",
        "--create-namespace",
        "--namespace=support",
        "--wait",
        "support",
    ]);
    cmd.push(chart_dir.as_os_str().to_os_string());
    cmd.push(process::path_arg("--values=", secrets.path()));
    for values_file in &cluster.support.helm_chart_values_files {
        cmd.push(process::path_arg("--values=", &cluster.resolve(values_file)));
    }
    runner.run(&cmd)?;

    Ok(())
}
