//! Cluster configuration loading and validation.
//!
//! Each cluster is described by a `cluster.yaml` under
//! `<config-dir>/<cluster-name>/`. The file is loaded once per operation and
//! validated eagerly: an unknown provider tag fails at deserialization time,
//! and missing required fields fail at load time, before any external call or
//! environment mutation happens. Relative secret paths resolve against the
//! directory holding `cluster.yaml`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Closed set of credential backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gcp,
    Aws,
    Azure,
    Kubeconfig,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::Gcp => "gcp",
            Provider::Aws => "aws",
            Provider::Azure => "azure",
            Provider::Kubeconfig => "kubeconfig",
        };
        f.write_str(name)
    }
}

/// `kubeconfig` provider section: an encrypted kubeconfig file.
#[derive(Debug, Deserialize)]
pub struct KubeconfigConfig {
    pub file: PathBuf,
}

/// `gcp` provider section.
#[derive(Debug, Deserialize)]
pub struct GcpConfig {
    /// Encrypted service-account key, relative to the cluster directory.
    pub key: PathBuf,
    pub project: String,
    /// Zonal clusters set `zone`, regional clusters set `region`.
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    pub cluster: String,
}

impl GcpConfig {
    /// Cluster location; zone wins when both zone and region are present.
    pub fn location(&self) -> Option<&str> {
        self.zone.as_deref().or(self.region.as_deref())
    }
}

/// Managed (EKS) versus self-managed (kops) AWS clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AwsClusterType {
    Eks,
    Kops,
}

/// `aws` provider section. Field names follow the camelCase convention the
/// cluster files use for this section.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsConfig {
    /// Encrypted access-key JSON, relative to the cluster directory.
    pub key: PathBuf,
    pub cluster_type: AwsClusterType,
    pub cluster_name: String,
    pub region: String,
    /// kops state store, e.g. `s3://my-state-bucket`. Required for kops.
    #[serde(default)]
    pub state_store: Option<String>,
}

/// `azure` provider section.
#[derive(Debug, Deserialize)]
pub struct AzureConfig {
    /// Encrypted service-principal JSON, relative to the cluster directory.
    pub key: PathBuf,
    pub cluster: String,
    pub resource_group: String,
}

/// Cluster-wide support chart settings.
#[derive(Debug, Default, Deserialize)]
pub struct SupportConfig {
    /// Extra helm values files, relative to the cluster directory.
    #[serde(default)]
    pub helm_chart_values_files: Vec<PathBuf>,
}

/// Immutable descriptor for one cluster.
#[derive(Debug, Deserialize)]
pub struct ClusterConfig {
    pub name: String,
    pub provider: Provider,

    #[serde(default)]
    pub kubeconfig: Option<KubeconfigConfig>,
    #[serde(default)]
    pub gcp: Option<GcpConfig>,
    #[serde(default)]
    pub aws: Option<AwsConfig>,
    #[serde(default)]
    pub azure: Option<AzureConfig>,

    /// Image repository for workloads on this cluster, used to pick a docker
    /// credential helper.
    #[serde(default)]
    pub image_repo: Option<String>,

    #[serde(default)]
    pub support: SupportConfig,

    /// Hub specs consumed by the hub deployment workflow; opaque here.
    #[serde(default)]
    pub hubs: Vec<serde_yaml::Value>,

    /// Directory holding `cluster.yaml`; base for relative secret paths.
    #[serde(skip)]
    pub base_path: PathBuf,
}

impl ClusterConfig {
    /// Load and validate `<config_dir>/<name>/cluster.yaml`.
    pub fn load(config_dir: &Path, name: &str) -> Result<Self> {
        let path = config_dir.join(name).join(constants::CLUSTER_FILE);
        if !path.is_file() {
            return Err(ConfigError::NotFound(path).into());
        }

        debug!(path = %path.display(), "loading cluster config");
        let text = fs::read_to_string(&path)?;
        let base_path = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Self::parse(&text, &base_path)
    }

    /// Parse and validate a cluster document with an explicit base path.
    pub fn parse(text: &str, base_path: &Path) -> Result<Self> {
        let mut config: ClusterConfig =
            serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
                path: base_path.join(constants::CLUSTER_FILE),
                source,
            })?;
        config.base_path = base_path.to_path_buf();
        config.validate()?;
        Ok(config)
    }

    /// Check provider-specific required fields and that exactly the matching
    /// provider section is present. Runs at load time so that every
    /// configuration failure surfaces before any side effect.
    pub fn validate(&self) -> Result<()> {
        let sections: [(Provider, bool); 4] = [
            (Provider::Kubeconfig, self.kubeconfig.is_some()),
            (Provider::Gcp, self.gcp.is_some()),
            (Provider::Aws, self.aws.is_some()),
            (Provider::Azure, self.azure.is_some()),
        ];
        // A stray section for another provider is a mis-edited file
        for (provider, present) in sections {
            if present && provider != self.provider {
                return Err(ConfigError::MismatchedProviderSection {
                    cluster: self.name.clone(),
                    provider: self.provider.to_string(),
                    extra: provider.to_string(),
                }
                .into());
            }
        }

        match self.provider {
            Provider::Kubeconfig => {
                self.kubeconfig()?;
            }
            Provider::Gcp => {
                let gcp = self.gcp()?;
                if gcp.location().is_none() {
                    return Err(ConfigError::MissingLocation {
                        cluster: self.name.clone(),
                    }
                    .into());
                }
            }
            Provider::Aws => {
                let aws = self.aws()?;
                if aws.cluster_type == AwsClusterType::Kops && aws.state_store.is_none() {
                    return Err(ConfigError::MissingStateStore {
                        cluster: self.name.clone(),
                    }
                    .into());
                }
            }
            Provider::Azure => {
                self.azure()?;
            }
        }
        Ok(())
    }

    /// Resolve a path from the cluster file against the cluster directory.
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.base_path.join(relative)
    }

    /// Executables the configured provider flow shells out to, including the
    /// decryption binary. Used for preflight checks.
    pub fn required_binaries(&self) -> Vec<&'static str> {
        let mut binaries = vec!["sops"];
        match self.provider {
            Provider::Gcp => binaries.push("gcloud"),
            Provider::Azure => binaries.push("az"),
            Provider::Kubeconfig => {}
            Provider::Aws => match self.aws.as_ref().map(|a| a.cluster_type) {
                Some(AwsClusterType::Kops) => binaries.push("kops"),
                _ => binaries.push("aws"),
            },
        }
        binaries
    }

    pub fn kubeconfig(&self) -> Result<&KubeconfigConfig> {
        self.kubeconfig
            .as_ref()
            .ok_or_else(|| self.missing_section().into())
    }

    pub fn gcp(&self) -> Result<&GcpConfig> {
        self.gcp.as_ref().ok_or_else(|| self.missing_section().into())
    }

    pub fn aws(&self) -> Result<&AwsConfig> {
        self.aws.as_ref().ok_or_else(|| self.missing_section().into())
    }

    pub fn azure(&self) -> Result<&AzureConfig> {
        self.azure.as_ref().ok_or_else(|| self.missing_section().into())
    }

    fn missing_section(&self) -> ConfigError {
        ConfigError::MissingProviderSection {
            cluster: self.name.clone(),
            provider: self.provider.to_string(),
        }
    }
}
