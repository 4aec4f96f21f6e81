//! `azure` provider: log in with a decrypted service principal, select the
//! subscription, then fetch AKS credentials into a scope-local kubeconfig.

use std::env;
use std::fs;

use serde::Deserialize;
use tempfile::NamedTempFile;
use zeroize::Zeroizing;

use crate::core::config::ClusterConfig;
use crate::core::constants;
use crate::core::decrypt::Decryptor;
use crate::core::envscope::EnvGuard;
use crate::core::process::{self, CommandRunner};
use crate::error::{AuthError, Result};

/// Shape of the decrypted service-principal JSON.
#[derive(Deserialize)]
struct ServicePrincipal {
    service_principal_id: String,
    service_principal_password: String,
    tenant_id: String,
    subscription_id: String,
}

pub(super) fn authenticate<T>(
    runner: &dyn CommandRunner,
    decryptor: &dyn Decryptor,
    cluster: &ClusterConfig,
    work: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let config = cluster.azure()?;

    let kubeconfig = NamedTempFile::new()?;
    let _env = EnvGuard::capture(&[constants::KUBECONFIG]);
    env::set_var(constants::KUBECONFIG, kubeconfig.path());

    let principal = {
        // Plaintext released after parsing; only the parsed fields survive
        let key = decryptor.decrypt(&cluster.resolve(&config.key))?;
        key.verify()?;

        let text = Zeroizing::new(fs::read_to_string(key.path())?);
        let principal: ServicePrincipal =
            serde_json::from_str(&text).map_err(|source| AuthError::BadCredentialFile {
                path: key.path().to_path_buf(),
                source,
            })?;
        principal
    };

    let mut cmd = process::argv(["az", "login", "--service-principal"]);
    cmd.push(format!("--username={}", principal.service_principal_id).into());
    cmd.push(
        Zeroizing::new(format!(
            "--password={}",
            principal.service_principal_password
        ))
        .as_str()
        .into(),
    );
    cmd.push(format!("--tenant={}", principal.tenant_id).into());
    runner.run(&cmd)?;

    let mut cmd = process::argv(["az", "account", "set"]);
    cmd.push(format!("--subscription={}", principal.subscription_id).into());
    runner.run(&cmd)?;

    let mut cmd = process::argv(["az", "aks", "get-credentials"]);
    cmd.push(format!("--name={}", config.cluster).into());
    cmd.push(format!("--resource-group={}", config.resource_group).into());
    runner.run(&cmd)?;

    work()
}
