//! Environment snapshot/restore guards.
//!
//! Authentication scopes point `KUBECONFIG` (and for AWS the credential
//! variables) at short-lived files. The process environment is global state,
//! so every mutation is bracketed by an [`EnvGuard`]: capture the original
//! values first, mutate freely, and rely on `Drop` to put everything back --
//! on success, on `?`-propagated errors, and on panic unwind alike.

use std::env;
use std::ffi::OsString;

use tracing::trace;

/// Captured values (or absence) for a fixed set of environment variables.
#[derive(Debug)]
pub struct EnvSnapshot {
    entries: Vec<(String, Option<OsString>)>,
}

impl EnvSnapshot {
    /// Record the current value of each named variable without mutating it.
    pub fn capture(names: &[&str]) -> Self {
        let entries = names
            .iter()
            .map(|name| (name.to_string(), env::var_os(name)))
            .collect();
        Self { entries }
    }

    /// Write back every captured value, removing variables that were absent
    /// at capture time. A no-op for variables that were never mutated.
    pub fn restore(&self) {
        for (name, value) in &self.entries {
            match value {
                Some(v) => env::set_var(name, v),
                None => env::remove_var(name),
            }
            trace!(var = %name, restored = value.is_some(), "env restored");
        }
    }
}

/// Restores an [`EnvSnapshot`] on drop.
pub struct EnvGuard {
    snapshot: EnvSnapshot,
}

impl EnvGuard {
    pub fn capture(names: &[&str]) -> Self {
        Self {
            snapshot: EnvSnapshot::capture(names),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        self.snapshot.restore();
    }
}
