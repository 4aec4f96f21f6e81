//! `kubeconfig` provider: the simplest flow. The cluster file names an
//! encrypted kubeconfig; we decrypt it and point `KUBECONFIG` at the
//! plaintext for the duration of the scope. No cloud CLI is involved.

use std::env;

use crate::core::config::ClusterConfig;
use crate::core::constants;
use crate::core::decrypt::Decryptor;
use crate::core::envscope::EnvGuard;
use crate::error::Result;

pub(super) fn authenticate<T>(
    decryptor: &dyn Decryptor,
    cluster: &ClusterConfig,
    work: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let config = cluster.kubeconfig()?;

    // Acquisition order: plaintext first, env guard second. Locals drop in
    // reverse order, so the environment is restored before the plaintext
    // file disappears.
    let decrypted = decryptor.decrypt(&cluster.resolve(&config.file))?;
    let _env = EnvGuard::capture(&[constants::KUBECONFIG]);
    env::set_var(constants::KUBECONFIG, decrypted.path());

    work()
}
