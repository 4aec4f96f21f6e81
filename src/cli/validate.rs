//! Validate command.
//!
//! Loads a cluster's configuration, which runs the full provider-specific
//! validation, and prints a summary. Makes no external calls.

use std::path::Path;

use crate::cli::output;
use crate::core::config::{ClusterConfig, Provider};
use crate::error::Result;

pub fn execute(config_dir: &Path, cluster_name: &str) -> Result<()> {
    let cluster = ClusterConfig::load(config_dir, cluster_name)?;

    output::success(&format!("{} is valid", cluster.name));
    output::kv("provider", cluster.provider);
    if let Some(image_repo) = &cluster.image_repo {
        output::kv("image repo", image_repo);
    }
    output::kv("hubs", cluster.hubs.len());
    output::kv(
        "support values",
        cluster.support.helm_chart_values_files.len(),
    );
    if cluster.provider == Provider::Gcp {
        if let Ok(gcp) = cluster.gcp() {
            if let Some(location) = gcp.location() {
                output::kv("location", location);
            }
        }
    }

    Ok(())
}
