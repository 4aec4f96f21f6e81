//! Multi-provider cluster authentication.
//!
//! [`ClusterAuth::with_cluster_access`] is the single entry point: it
//! resolves the cluster's provider, runs that provider's setup sequence
//! (decrypt keys, write temp kubeconfig, invoke the cloud CLI), executes the
//! caller's work with `KUBECONFIG` (and, for AWS, the credential variables)
//! live, and tears everything down in reverse order of acquisition.
//!
//! Teardown is carried by `Drop` guards declared in acquisition order inside
//! each strategy, so resources acquired later are released first and every
//! release runs even when a later setup step or the enclosed work fails.
//!
//! Because the mutated environment is process-global, at most one scope may
//! be active per process; nesting fails with [`AuthError::ScopeActive`].

mod aws;
mod azure;
mod gcp;
mod kubeconfig;

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::core::config::{ClusterConfig, Provider};
use crate::core::decrypt::Decryptor;
use crate::core::process::CommandRunner;
use crate::error::{AuthError, Result};

static SCOPE_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Witness that the process-wide authentication scope is held.
///
/// Dependent operations (support-chart deployment) call
/// [`ScopeToken::ensure_active`] to assert they run inside a live scope.
pub struct ScopeToken {
    _private: (),
}

impl ScopeToken {
    fn acquire() -> Result<Self> {
        SCOPE_ACTIVE
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| AuthError::ScopeActive)?;
        Ok(Self { _private: () })
    }

    /// Fail unless an authentication scope is currently active.
    pub fn ensure_active() -> Result<()> {
        if SCOPE_ACTIVE.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AuthError::ScopeRequired.into())
        }
    }
}

impl Drop for ScopeToken {
    fn drop(&mut self) {
        SCOPE_ACTIVE.store(false, Ordering::SeqCst);
    }
}

/// Cluster authentication facade.
pub struct ClusterAuth<'a> {
    runner: &'a dyn CommandRunner,
    decryptor: &'a dyn Decryptor,
}

impl<'a> ClusterAuth<'a> {
    pub fn new(runner: &'a dyn CommandRunner, decryptor: &'a dyn Decryptor) -> Self {
        Self { runner, decryptor }
    }

    /// Run `work` with valid credentials for `cluster`.
    ///
    /// Environment variables touched by the provider flow are restored
    /// verbatim and plaintext key material is removed before this returns,
    /// whether `work` succeeds, `work` fails, or setup fails partway.
    pub fn with_cluster_access<T>(
        &self,
        cluster: &ClusterConfig,
        work: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        let _scope = ScopeToken::acquire()?;
        debug!(cluster = %cluster.name, provider = %cluster.provider, "entering authentication scope");

        let result = match cluster.provider {
            Provider::Kubeconfig => kubeconfig::authenticate(self.decryptor, cluster, work),
            Provider::Gcp => gcp::authenticate(self.runner, self.decryptor, cluster, work),
            Provider::Aws => aws::authenticate(self.runner, self.decryptor, cluster, work),
            Provider::Azure => azure::authenticate(self.runner, self.decryptor, cluster, work),
        };

        debug!(cluster = %cluster.name, ok = result.is_ok(), "left authentication scope");
        result
    }
}
