//! Logging reconciliation against an in-memory control plane.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use cpctl_core::{
    facility::supported_logging_types, set_cluster_config_defaults, ClusterConfig,
    ClusterStatus, ConfigError, LogSetup, UpdateStatus,
};
use cpctl_engine::{ClusterProvider, EngineError, Task};

use common::{fast_wait, strings, types_of, FakeControlPlane};

fn provider_for(fake: &Arc<FakeControlPlane>) -> ClusterProvider {
    ClusterProvider::new(fake.clone(), fast_wait())
}

fn config_with(enable_types: &[&str]) -> ClusterConfig {
    let mut cfg = ClusterConfig::new("testcluster", "us-west-2");
    *cfg.enable_types_mut() = strings(enable_types);
    cfg
}

// ---------------------------------------------------------------------------
// 1. Observed state
// ---------------------------------------------------------------------------

#[tokio::test]
async fn gets_current_config() {
    let fake = Arc::new(FakeControlPlane::with_test_cluster("us-west-2"));
    let provider = provider_for(&fake);

    let observed = provider
        .current_logging(&"testcluster".into())
        .await
        .expect("current logging");
    assert_eq!(observed.enabled.len(), 2);
    assert!(observed.enabled.contains("api") && observed.enabled.contains("audit"));
    for name in ["controllerManager", "authenticator", "scheduler"] {
        assert!(observed.disabled.contains(name), "{name} should be disabled");
    }
}

#[tokio::test]
async fn inactive_cluster_is_rejected() {
    let fake = Arc::new(FakeControlPlane::new("us-west-2").with_cluster(
        "testcluster",
        ClusterStatus::Updating,
        vec![],
    ));
    let err = provider_for(&fake)
        .reconcile_logging(&mut config_with(&["api"]), false)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ClusterNotActive { .. }), "got: {err}");
    assert!(err.to_string().contains("UPDATING"));
}

#[tokio::test]
async fn unrecognised_status_is_rejected_as_not_active() {
    let fake = Arc::new(FakeControlPlane::new("us-west-2").with_cluster(
        "testcluster",
        ClusterStatus::Other("PENDING".to_string()),
        vec![],
    ));
    let err = provider_for(&fake)
        .reconcile_logging(&mut config_with(&["api"]), false)
        .await
        .unwrap_err();
    match &err {
        EngineError::ClusterNotActive { name, status } => {
            assert_eq!(name, "testcluster");
            assert_eq!(status, "PENDING");
        }
        other => panic!("expected ClusterNotActive, got {other:?}"),
    }
    assert!(err.to_string().contains(r#"is "PENDING""#), "got: {err}");
    assert!(fake.sent_logging.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_cluster_is_not_found() {
    let fake = Arc::new(FakeControlPlane::new("us-west-2"));
    let err = provider_for(&fake)
        .reconcile_logging(&mut config_with(&["api"]), false)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound { .. }), "got: {err}");
}

// ---------------------------------------------------------------------------
// 2. Update payloads
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn empty_declaration_disables_everything() {
    let fake = Arc::new(FakeControlPlane::with_test_cluster("us-west-2"));
    let mut cfg = config_with(&[]);

    let outcome = provider_for(&fake)
        .reconcile_logging(&mut cfg, false)
        .await
        .expect("reconcile");
    assert!(outcome.changed() && outcome.applied);
    assert!(cfg.enable_types().is_empty());

    let sent = fake.last_sent();
    assert_eq!(sent.cluster_logging[0].enabled, Some(true));
    assert_eq!(sent.cluster_logging[1].enabled, Some(false));
    assert!(types_of(&sent.cluster_logging[0]).is_empty());
    assert_eq!(types_of(&sent.cluster_logging[1]), supported_logging_types());
}

#[tokio::test(start_paused = true)]
async fn star_enables_everything() {
    let fake = Arc::new(FakeControlPlane::with_test_cluster("us-west-2"));
    let mut cfg = config_with(&["*"]);

    provider_for(&fake)
        .reconcile_logging(&mut cfg, false)
        .await
        .expect("reconcile");
    assert_eq!(cfg.enable_types().to_vec(), supported_logging_types());

    let sent = fake.last_sent();
    assert_eq!(types_of(&sent.cluster_logging[0]), supported_logging_types());
    assert!(types_of(&sent.cluster_logging[1]).is_empty());
}

#[tokio::test(start_paused = true)]
async fn all_enables_everything() {
    let fake = Arc::new(FakeControlPlane::with_test_cluster("us-west-2"));
    let mut cfg = config_with(&["all"]);

    provider_for(&fake)
        .reconcile_logging(&mut cfg, false)
        .await
        .expect("reconcile");

    let sent = fake.last_sent();
    assert_eq!(types_of(&sent.cluster_logging[0]), cfg.enable_types().to_vec());
    assert!(types_of(&sent.cluster_logging[1]).is_empty());
}

#[tokio::test(start_paused = true)]
async fn enables_some_facilities_and_disables_others() {
    let fake = Arc::new(FakeControlPlane::with_test_cluster("us-west-2"));
    let mut cfg = config_with(&["authenticator", "controllerManager"]);

    let outcome = provider_for(&fake)
        .reconcile_logging(&mut cfg, false)
        .await
        .expect("reconcile");
    assert_eq!(
        outcome.plan.to_enable,
        strings(&["authenticator", "controllerManager"])
    );
    assert_eq!(outcome.plan.to_disable, strings(&["api", "audit", "scheduler"]));
    assert!(outcome.changed());

    let sent = fake.last_sent();
    assert_eq!(
        types_of(&sent.cluster_logging[0]),
        strings(&["authenticator", "controllerManager"])
    );
    assert_eq!(
        types_of(&sent.cluster_logging[1]),
        strings(&["api", "audit", "scheduler"])
    );
}

#[tokio::test(start_paused = true)]
async fn enables_audit_and_scheduler() {
    let fake = Arc::new(FakeControlPlane::with_test_cluster("us-west-2"));
    let mut cfg = config_with(&["audit", "scheduler"]);

    provider_for(&fake)
        .reconcile_logging(&mut cfg, false)
        .await
        .expect("reconcile");

    let sent = fake.last_sent();
    assert_eq!(types_of(&sent.cluster_logging[0]), strings(&["audit", "scheduler"]));
    assert_eq!(
        types_of(&sent.cluster_logging[1]),
        strings(&["api", "authenticator", "controllerManager"])
    );
}

// ---------------------------------------------------------------------------
// 3. Control flow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_facility_fails_before_any_provider_call() {
    let fake = Arc::new(FakeControlPlane::with_test_cluster("us-west-2"));
    let err = provider_for(&fake)
        .reconcile_logging(&mut config_with(&["anything"]), false)
        .await
        .unwrap_err();

    assert!(
        matches!(err, EngineError::Config(ConfigError::UnknownFacility { .. })),
        "got: {err}"
    );
    assert_eq!(fake.describe_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn no_update_when_already_up_to_date() {
    let fake = Arc::new(FakeControlPlane::with_test_cluster("us-west-2"));
    let outcome = provider_for(&fake)
        .reconcile_logging(&mut config_with(&["audit", "api"]), false)
        .await
        .expect("reconcile");

    assert!(!outcome.changed());
    assert!(!outcome.applied);
    assert!(fake.sent_logging.lock().unwrap().is_empty());
}

#[tokio::test]
async fn plan_mode_reports_without_updating() {
    let fake = Arc::new(FakeControlPlane::with_test_cluster("us-west-2"));
    let outcome = provider_for(&fake)
        .reconcile_logging(&mut config_with(&["scheduler"]), true)
        .await
        .expect("reconcile");

    assert!(outcome.changed());
    assert!(!outcome.applied);
    assert!(fake.sent_logging.lock().unwrap().is_empty());
    assert_eq!(fake.describe_update_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn second_reconcile_is_a_no_op() {
    let fake = Arc::new(FakeControlPlane::with_test_cluster("us-west-2").with_statuses(&[
        UpdateStatus::InProgress,
        UpdateStatus::Successful,
    ]));
    let provider = provider_for(&fake);

    let first = provider
        .reconcile_logging(&mut config_with(&["scheduler"]), false)
        .await
        .expect("first reconcile");
    assert!(first.changed() && first.applied);

    let second = provider
        .reconcile_logging(&mut config_with(&["scheduler"]), false)
        .await
        .expect("second reconcile");
    assert!(!second.changed());
    assert_eq!(fake.sent_logging.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_update_is_reported_with_status() {
    let fake = Arc::new(FakeControlPlane::with_test_cluster("us-west-2").with_statuses(&[
        UpdateStatus::InProgress,
        UpdateStatus::Failed,
    ]));
    let err = provider_for(&fake)
        .reconcile_logging(&mut config_with(&["scheduler"]), false)
        .await
        .unwrap_err();

    match err {
        EngineError::OperationFailed { status, operation, .. } => {
            assert_eq!(status, "Failed");
            assert!(operation.contains("u123"), "operation: {operation}");
        }
        other => panic!("expected OperationFailed, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn stuck_update_times_out() {
    let fake = Arc::new(
        FakeControlPlane::with_test_cluster("us-west-2").with_statuses(&[UpdateStatus::InProgress]),
    );
    let err = provider_for(&fake)
        .reconcile_logging(&mut config_with(&["scheduler"]), false)
        .await
        .unwrap_err();

    match err {
        EngineError::OperationTimeout { resource, elapsed } => {
            assert!(resource.contains("testcluster"));
            assert_eq!(elapsed, fast_wait().timeout);
        }
        other => panic!("expected OperationTimeout, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn config_task_tree_sends_declared_lists() {
    let fake = Arc::new(FakeControlPlane::with_test_cluster("us-west-2"));
    let mut cfg = config_with(&["controllerManager", "api"]);
    set_cluster_config_defaults(&mut cfg).expect("defaults");

    let tasks = provider_for(&fake).update_cluster_config_tasks(&cfg);
    assert_eq!(tasks.len(), 1);
    assert!(!tasks.is_parallel());
    assert_eq!(
        tasks.describe(),
        "1 sequential task: { update CloudWatch logging configuration }"
    );

    tasks.run().await.expect("run tasks");
    let sent = fake.last_sent();
    assert_eq!(types_of(&sent.cluster_logging[0]), strings(&["controllerManager", "api"]));
    assert_eq!(
        types_of(&sent.cluster_logging[1]),
        strings(&["audit", "authenticator", "scheduler"])
    );
}

#[tokio::test(start_paused = true)]
async fn version_update_blocks_until_successful() {
    let fake = Arc::new(FakeControlPlane::with_test_cluster("us-west-2").with_statuses(&[
        UpdateStatus::InProgress,
        UpdateStatus::InProgress,
        UpdateStatus::Successful,
    ]));
    let mut cfg = ClusterConfig::new("testcluster", "us-west-2");
    cfg.metadata.version = Some("1.29".to_string());

    provider_for(&fake)
        .update_cluster_version_blocking(&cfg.metadata)
        .await
        .expect("version update");
    assert_eq!(*fake.sent_versions.lock().unwrap(), vec!["1.29".to_string()]);
    assert_eq!(fake.describe_update_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn version_update_requires_target_version() {
    let fake = Arc::new(FakeControlPlane::with_test_cluster("us-west-2"));
    let cfg = ClusterConfig::new("testcluster", "us-west-2");
    let err = provider_for(&fake)
        .update_cluster_version(&cfg.metadata)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::MissingVersion { .. }));
}

#[test]
fn log_setup_helpers_set_flags() {
    assert_eq!(LogSetup::enabled(["api"]).enabled, Some(true));
    assert_eq!(LogSetup::disabled(["api"]).enabled, Some(false));
}
