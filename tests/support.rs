//! Support-chart deployment tests.
//!
//! Serialized because the enclosing authentication scope mutates the
//! process environment.

mod harness;

use std::env;

use serial_test::serial;
use tempfile::TempDir;

use caravel::core::auth::ClusterAuth;
use caravel::core::support::deploy_support;
use caravel::error::{AuthError, Error};
use harness::{cluster_from, write_file, FakeDecryptor, FakeRunner};

const CLUSTER_YAML: &str =
    "name: demo\nprovider: kubeconfig\nkubeconfig:\n  file: enc-kc.secret.yaml\n";

fn chart_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "enc-support.secret.yaml", "secret: values\n");
    dir
}

#[test]
#[serial]
fn runs_the_full_helm_sequence_in_order() {
    let config_dir = TempDir::new().unwrap();
    write_file(config_dir.path(), "enc-kc.secret.yaml", "kc");
    let cluster = cluster_from(CLUSTER_YAML, config_dir.path());
    let charts = chart_dir();

    env::remove_var("KUBECONFIG");
    let runner = FakeRunner::new();
    let auth = ClusterAuth::new(&runner, &FakeDecryptor);

    auth.with_cluster_access(&cluster, || {
        deploy_support(&runner, &FakeDecryptor, &cluster, charts.path())
    })
    .unwrap();

    let calls = runner.calls();
    assert_eq!(calls.len(), 5);
    assert_eq!(
        calls[0],
        vec!["helm", "repo", "add", "jetstack", "https://charts.jetstack.io"]
    );
    assert_eq!(calls[1], vec!["helm", "repo", "update"]);
    assert_eq!(calls[2][..6], [
        "helm",
        "upgrade",
        "--install",
        "--create-namespace",
        "--namespace=cert-manager",
        "cert-manager",
    ]);
    assert_eq!(calls[3][..3], ["helm", "dep", "up"]);
    assert_eq!(calls[4][..7], [
        "helm",
        "upgrade",
        "--install",
        "--create-namespace",
        "--namespace=support",
        "--wait",
        "support",
    ]);
    // The decrypted support values file rides along
    assert!(calls[4].iter().any(|a| a.starts_with("--values=")));
}

#[test]
#[serial]
fn appends_cluster_values_files_resolved_against_base_path() {
    let config_dir = TempDir::new().unwrap();
    write_file(config_dir.path(), "enc-kc.secret.yaml", "kc");
    let cluster = cluster_from(
        "name: demo\nprovider: kubeconfig\nkubeconfig:\n  file: enc-kc.secret.yaml\nsupport:\n  helm_chart_values_files:\n    - support.values.yaml\n",
        config_dir.path(),
    );
    let charts = chart_dir();

    env::remove_var("KUBECONFIG");
    let runner = FakeRunner::new();
    let auth = ClusterAuth::new(&runner, &FakeDecryptor);

    auth.with_cluster_access(&cluster, || {
        deploy_support(&runner, &FakeDecryptor, &cluster, charts.path())
    })
    .unwrap();

    let expected = format!(
        "--values={}",
        config_dir.path().join("support.values.yaml").display()
    );
    let last = runner.calls().pop().unwrap();
    assert!(last.contains(&expected), "missing {expected} in {last:?}");
}

#[test]
#[serial]
fn first_failure_aborts_remaining_steps() {
    let config_dir = TempDir::new().unwrap();
    write_file(config_dir.path(), "enc-kc.secret.yaml", "kc");
    let cluster = cluster_from(CLUSTER_YAML, config_dir.path());
    let charts = chart_dir();

    env::remove_var("KUBECONFIG");
    let runner = FakeRunner::new();
    runner.fail_on_call(1); // helm repo update
    let auth = ClusterAuth::new(&runner, &FakeDecryptor);

    let err = auth
        .with_cluster_access(&cluster, || {
            deploy_support(&runner, &FakeDecryptor, &cluster, charts.path())
        })
        .unwrap_err();

    assert!(matches!(err, Error::Command(_)));
    assert_eq!(runner.call_count(), 2);
    assert!(env::var_os("KUBECONFIG").is_none());
}

#[test]
#[serial]
fn refuses_to_run_outside_an_authentication_scope() {
    let config_dir = TempDir::new().unwrap();
    let cluster = cluster_from(
        "name: demo\nprovider: kubeconfig\nkubeconfig:\n  file: enc-kc.secret.yaml\n",
        config_dir.path(),
    );
    let charts = chart_dir();

    let runner = FakeRunner::new();
    let err = deploy_support(&runner, &FakeDecryptor, &cluster, charts.path()).unwrap_err();

    assert!(matches!(err, Error::Auth(AuthError::ScopeRequired)));
    assert_eq!(runner.call_count(), 0);
}
