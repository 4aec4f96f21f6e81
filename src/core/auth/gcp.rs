//! `gcp` provider: activate a service account from a decrypted key, then
//! fetch cluster credentials into a scope-local kubeconfig.

use std::env;

use tempfile::NamedTempFile;

use crate::core::config::ClusterConfig;
use crate::core::constants;
use crate::core::decrypt::Decryptor;
use crate::core::envscope::EnvGuard;
use crate::core::process::{self, CommandRunner};
use crate::error::{ConfigError, Result};

pub(super) fn authenticate<T>(
    runner: &dyn CommandRunner,
    decryptor: &dyn Decryptor,
    cluster: &ClusterConfig,
    work: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let config = cluster.gcp()?;
    let location = config.location().ok_or_else(|| ConfigError::MissingLocation {
        cluster: cluster.name.clone(),
    })?;

    // The temp kubeconfig exists before KUBECONFIG points at it, and is
    // removed only after the env guard has restored the variable.
    let kubeconfig = NamedTempFile::new()?;
    let _env = EnvGuard::capture(&[constants::KUBECONFIG]);
    env::set_var(constants::KUBECONFIG, kubeconfig.path());

    {
        // Plaintext key is only needed for service-account activation
        let key = decryptor.decrypt(&cluster.resolve(&config.key))?;
        key.verify()?;

        let mut cmd = process::argv(["gcloud", "auth", "activate-service-account"]);
        cmd.push(process::path_arg("--key-file=", key.path()));
        runner.run(&cmd)?;
    }

    let mut cmd = process::argv(["gcloud", "container", "clusters"]);
    // --zone accepts regions too
    cmd.push(format!("--zone={location}").into());
    cmd.push(format!("--project={}", config.project).into());
    cmd.push("get-credentials".into());
    cmd.push(config.cluster.clone().into());
    runner.run(&cmd)?;

    work()
}
