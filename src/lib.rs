//! Caravel - deploy and operate Helm-based workloads on Kubernetes clusters
//! across cloud providers.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── validate      # Validate cluster configuration
//! │   ├── support       # Install/upgrade cluster-wide support charts
//! │   └── credentials   # Open a shell with cluster credentials loaded
//! └── core/             # Core library components
//!     ├── config        # cluster.yaml loading and validation
//!     ├── auth/         # Provider authentication strategies
//!     │   ├── mod       # Facade, scope token, dispatch
//!     │   ├── gcp       # gcloud service-account flow
//!     │   ├── aws       # eks / kops flow
//!     │   ├── azure     # service-principal flow
//!     │   └── kubeconfig# encrypted-kubeconfig flow
//!     ├── decrypt       # sops-backed scoped decryption
//!     ├── envscope      # environment snapshot/restore guards
//!     ├── process       # external command invocation
//!     ├── registry      # docker credHelpers maintenance
//!     └── support       # support-chart deployment sequence
//! ```
//!
//! # Design
//!
//! Cluster authentication mutates process-wide state (`KUBECONFIG`, AWS
//! credential variables, temp files). Every mutation lives inside a scope
//! whose teardown is carried by `Drop` guards, so the environment is restored
//! and plaintext files are removed on every exit path, including errors
//! raised halfway through a provider's setup sequence. At most one scope may
//! be active per process.

pub mod cli;
pub mod core;
pub mod error;
