//! `aws` provider: export access keys from a decrypted credential file, then
//! populate a scope-local kubeconfig via `aws eks update-kubeconfig` for
//! managed clusters or `kops export kubecfg` for self-managed ones.

use std::env;
use std::fs;

use serde::Deserialize;
use tempfile::NamedTempFile;
use zeroize::Zeroizing;

use crate::core::config::{AwsClusterType, ClusterConfig};
use crate::core::constants;
use crate::core::decrypt::Decryptor;
use crate::core::envscope::EnvGuard;
use crate::core::process::{self, CommandRunner};
use crate::error::{AuthError, ConfigError, Result};

/// Shape of the decrypted access-key JSON, as produced by
/// `aws iam create-access-key`.
#[derive(Deserialize)]
struct AccessKeyFile {
    #[serde(rename = "AccessKey")]
    access_key: AccessKey,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AccessKey {
    access_key_id: String,
    secret_access_key: String,
}

pub(super) fn authenticate<T>(
    runner: &dyn CommandRunner,
    decryptor: &dyn Decryptor,
    cluster: &ClusterConfig,
    work: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let config = cluster.aws()?;

    let kubeconfig = NamedTempFile::new()?;
    // One guard covers all three variables; restoring an unmutated variable
    // is a no-op, so an early decryption failure leaves no trace.
    let _env = EnvGuard::capture(&[
        constants::KUBECONFIG,
        constants::AWS_ACCESS_KEY_ID,
        constants::AWS_SECRET_ACCESS_KEY,
    ]);

    {
        // Decryption strictly precedes any external credential call; the
        // plaintext is released as soon as the keys are in the environment.
        let key = decryptor.decrypt(&cluster.resolve(&config.key))?;
        key.verify()?;

        let text = Zeroizing::new(fs::read_to_string(key.path())?);
        let creds: AccessKeyFile =
            serde_json::from_str(&text).map_err(|source| AuthError::BadCredentialFile {
                path: key.path().to_path_buf(),
                source,
            })?;

        let id = Zeroizing::new(creds.access_key.access_key_id);
        let secret = Zeroizing::new(creds.access_key.secret_access_key);
        env::set_var(constants::AWS_ACCESS_KEY_ID, id.as_str());
        env::set_var(constants::AWS_SECRET_ACCESS_KEY, secret.as_str());
    }

    env::set_var(constants::KUBECONFIG, kubeconfig.path());

    match config.cluster_type {
        AwsClusterType::Kops => {
            let state_store =
                config
                    .state_store
                    .as_deref()
                    .ok_or_else(|| ConfigError::MissingStateStore {
                        cluster: cluster.name.clone(),
                    })?;
            let mut cmd = process::argv(["kops", "export", "kubecfg", "--admin"]);
            cmd.push(format!("--name={}", config.cluster_name).into());
            cmd.push(format!("--state={state_store}").into());
            runner.run(&cmd)?;
        }
        AwsClusterType::Eks => {
            let mut cmd = process::argv(["aws", "eks", "update-kubeconfig"]);
            cmd.push(format!("--name={}", config.cluster_name).into());
            cmd.push(format!("--region={}", config.region).into());
            runner.run(&cmd)?;
        }
    }

    work()
}
