//! Error taxonomy for caravel.
//!
//! Errors are grouped by the subsystem that raises them and wrapped into a
//! single top-level [`Error`] so that commands can propagate with `?` and the
//! binary renders one message at the end.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Decrypt(#[from] DecryptError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Cluster configuration problems. All of these surface before any side
/// effect (no external call, no environment mutation) is attempted.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cluster config not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid cluster config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("cluster {cluster}: provider is {provider} but the `{provider}` section is missing")]
    MissingProviderSection { cluster: String, provider: String },

    #[error("cluster {cluster}: provider is {provider} but a `{extra}` section is also present")]
    MismatchedProviderSection {
        cluster: String,
        provider: String,
        extra: String,
    },

    #[error("cluster {cluster}: gcp config needs either `zone` or `region`")]
    MissingLocation { cluster: String },

    #[error("cluster {cluster}: kops clusters require `stateStore`")]
    MissingStateStore { cluster: String },
}

/// Failures while turning an encrypted file into a scoped plaintext file.
#[derive(Error, Debug)]
pub enum DecryptError {
    #[error("encrypted file not found: {0}")]
    SourceMissing(PathBuf),

    #[error("failed to decrypt {path}: {reason}")]
    Failed { path: PathBuf, reason: String },

    #[error("decrypted file vanished before use: {0}")]
    PlaintextMissing(PathBuf),
}

/// External process failures (helm, sops, cloud CLIs).
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("required executable `{0}` not found on PATH")]
    NotFound(String),

    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with status {status}")]
    Failed { command: String, status: i32 },
}

/// Authentication scope violations and malformed credential payloads.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("another cluster authentication scope is already active")]
    ScopeActive,

    #[error("no cluster authentication scope is active")]
    ScopeRequired,

    #[error("malformed credential file {path}: {source}")]
    BadCredentialFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Problems with the local docker registry-credential file.
///
/// A missing file is not an error (treated as an empty document); a file we
/// cannot parse is surfaced rather than overwritten, since overwriting would
/// destroy unrelated registry entries.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("malformed docker config {path}: {detail}")]
    Malformed { path: PathBuf, detail: String },
}

pub type Result<T> = std::result::Result<T, Error>;
