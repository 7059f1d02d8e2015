// ABOUTME: Tests for deployment state types and type state pattern.
// ABOUTME: Verifies state markers and the data each Deployment<S> step carries.

mod support;

use beanpole::deploy::{Deployment, EnvironmentUpdating, Initialized, VersionCreated};
use beanpole::progress::{DeploymentReporter, ProblemScope, RecordingSink};
use beanpole::provider::ProviderError;
use std::mem::size_of;
use support::{Call, ENVIRONMENT_ID, ScriptedApi};

// =============================================================================
// State Marker Type Tests
// =============================================================================

/// Test: The initial state marker is zero-sized.
#[test]
fn initial_state_is_zero_sized() {
    assert_eq!(
        size_of::<Initialized>(),
        0,
        "Initialized should be zero-sized"
    );
}

/// Test: Later states carry the data earlier steps produced.
#[test]
fn later_states_hold_data() {
    assert!(size_of::<VersionCreated>() > 0);
    assert!(
        size_of::<EnvironmentUpdating>() > size_of::<VersionCreated>(),
        "EnvironmentUpdating should hold the environment ID and poll start"
    );
}

// =============================================================================
// Transition Tests
// =============================================================================

fn reporter(sink: &RecordingSink) -> DeploymentReporter<'_> {
    let plan = support::plan();
    DeploymentReporter::new(
        sink,
        ProblemScope::new(plan.version_request(), plan.update_request()),
    )
}

#[tokio::test]
async fn transitions_carry_provider_results() {
    let api = ScriptedApi::new();
    let sink = RecordingSink::new();
    let reporter = reporter(&sink);

    let created = Deployment::new(support::plan())
        .create_version(&api, &reporter)
        .await
        .unwrap();
    assert!(!created.reused_existing_version());

    let updating = created.update_environment(&api, &reporter).await.unwrap();
    assert_eq!(updating.environment_id().as_str(), ENVIRONMENT_ID);
    assert_eq!(updating.version_label().as_str(), support::TARGET_VERSION);
    assert_eq!(
        api.calls(),
        vec![
            Call::CreateVersion {
                label: support::TARGET_VERSION.to_string(),
                skip_if_exists: false,
            },
            Call::UpdateEnvironment {
                environment: support::ENVIRONMENT_NAME.to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn reused_version_is_recorded_in_state() {
    let api = ScriptedApi::new().fail_create(ProviderError::VersionAlreadyExists {
        application: "shop".to_string(),
        version_label: support::TARGET_VERSION.to_string(),
    });
    let sink = RecordingSink::new();
    let reporter = reporter(&sink);

    let created = Deployment::new(support::plan().skip_existing_version(true))
        .create_version(&api, &reporter)
        .await
        .unwrap();

    assert!(created.reused_existing_version());
    assert!(created.state().reused_existing());
}
