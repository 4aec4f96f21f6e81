//! Docker registry credential-helper maintenance.
//!
//! Most registries (Artifact Registry, ECR) authenticate through a docker
//! credential helper rather than a username/password, configured per registry
//! host in the `credHelpers` map of the local docker config. This module
//! ensures the right helper is mapped for a cluster's image repository,
//! merging with existing entries and writing only when something changed.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{RegistryError, Result};

/// Registry host suffix -> credential helper binary suffix
/// (`docker-credential-<helper>`).
const HELPER_SUFFIXES: &[(&str, &str)] = &[
    // Google Cloud Artifact Registry
    ("pkg.dev", "gcloud"),
    // Amazon ECR
    (".amazonaws.com", "ecr-login"),
];

/// Registry host portion of an image repository string.
fn registry_host(image_repo: &str) -> &str {
    image_repo.split('/').next().unwrap_or(image_repo)
}

fn helper_for(registry: &str) -> Option<&'static str> {
    HELPER_SUFFIXES
        .iter()
        .find(|(suffix, _)| registry.ends_with(suffix))
        .map(|(_, helper)| *helper)
}

fn docker_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".docker")
        .join("config.json")
}

/// Ensure a credential helper entry exists for `image_repo`'s registry in
/// the operator's docker config. Returns `true` if the file was written.
pub fn ensure_cred_helper(image_repo: &str) -> Result<bool> {
    ensure_cred_helper_at(&docker_config_path(), image_repo)
}

/// Path-parameterized implementation of [`ensure_cred_helper`].
pub fn ensure_cred_helper_at(path: &Path, image_repo: &str) -> Result<bool> {
    let registry = registry_host(image_repo);
    let Some(helper) = helper_for(registry) else {
        debug!(registry, "no credential helper known for registry");
        return Ok(false);
    };

    // Missing file means an empty document; a file we cannot parse is a hard
    // error so we never clobber unrelated registry entries.
    let mut doc: Map<String, Value> = if path.is_file() {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| RegistryError::Malformed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?
    } else {
        Map::new()
    };

    let helpers = doc
        .entry("credHelpers")
        .or_insert_with(|| Value::Object(Map::new()));
    let helpers = helpers
        .as_object_mut()
        .ok_or_else(|| RegistryError::Malformed {
            path: path.to_path_buf(),
            detail: "`credHelpers` is not an object".to_string(),
        })?;

    if helpers.get(registry).and_then(Value::as_str) == Some(helper) {
        return Ok(false);
    }

    helpers.insert(registry.to_string(), Value::String(helper.to_string()));

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(&doc)?)?;
    debug!(registry, helper, path = %path.display(), "credential helper configured");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_path(dir: &TempDir) -> PathBuf {
        dir.path().join("config.json")
    }

    #[test]
    fn creates_entry_when_file_is_missing() {
        let dir = TempDir::new().unwrap();
        let path = config_path(&dir);

        let wrote = ensure_cred_helper_at(&path, "us-central1-docker.pkg.dev/proj/repo/img")
            .unwrap();
        assert!(wrote);

        let doc: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            doc["credHelpers"]["us-central1-docker.pkg.dev"],
            Value::String("gcloud".to_string())
        );
    }

    #[test]
    fn second_write_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = config_path(&dir);
        let repo = "us-central1-docker.pkg.dev/proj/repo/img";

        assert!(ensure_cred_helper_at(&path, repo).unwrap());
        let before = fs::read_to_string(&path).unwrap();

        assert!(!ensure_cred_helper_at(&path, repo).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn preserves_unrelated_keys_and_helpers() {
        let dir = TempDir::new().unwrap();
        let path = config_path(&dir);
        fs::write(
            &path,
            r#"{"auths":{"docker.io":{"auth":"abc"}},"credHelpers":{"other.example.com":"pass"}}"#,
        )
        .unwrap();

        assert!(
            ensure_cred_helper_at(&path, "123.dkr.ecr.us-east-1.amazonaws.com/img").unwrap()
        );

        let doc: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc["auths"]["docker.io"]["auth"], "abc");
        assert_eq!(doc["credHelpers"]["other.example.com"], "pass");
        assert_eq!(
            doc["credHelpers"]["123.dkr.ecr.us-east-1.amazonaws.com"],
            "ecr-login"
        );
    }

    #[test]
    fn unknown_registry_is_left_alone() {
        let dir = TempDir::new().unwrap();
        let path = config_path(&dir);

        let wrote = ensure_cred_helper_at(&path, "quay.io/org/img").unwrap();
        assert!(!wrote);
        assert!(!path.exists());
    }

    #[test]
    fn malformed_config_is_surfaced_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = config_path(&dir);
        fs::write(&path, "{not json").unwrap();

        let err = ensure_cred_helper_at(&path, "host.pkg.dev/img").unwrap_err();
        assert!(err.to_string().contains("malformed docker config"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{not json");
    }

    #[test]
    fn registry_host_strips_repository_path() {
        assert_eq!(
            registry_host("us-central1-docker.pkg.dev/proj/repo/img"),
            "us-central1-docker.pkg.dev"
        );
        assert_eq!(registry_host("plainhost"), "plainhost");
    }
}
