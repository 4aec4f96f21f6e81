//! Shared constants.

/// Env var consulted for the tracing filter before falling back to verbosity.
pub const LOG_ENV: &str = "CARAVEL_LOG";

/// Environment variables mutated by authentication scopes. All of them are
/// snapshotted before mutation and restored verbatim on scope exit.
pub const KUBECONFIG: &str = "KUBECONFIG";
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";

/// Per-cluster configuration file name, under `<config-dir>/<cluster>/`.
pub const CLUSTER_FILE: &str = "cluster.yaml";

/// Default directory holding per-cluster configuration.
pub const DEFAULT_CONFIG_DIR: &str = "clusters";

/// Default location of the support chart, relative to the working directory.
pub const DEFAULT_CHART_DIR: &str = "helm-charts/support";

/// Encrypted values file expected inside the support chart directory.
pub const SUPPORT_SECRETS_FILE: &str = "enc-support.secret.yaml";

/// cert-manager chart repository and pinned version.
pub const CERT_MANAGER_REPO: &str = "https://charts.jetstack.io";
pub const CERT_MANAGER_VERSION: &str = "v1.3.1";
