//! End-to-end roster behaviour against the in-memory employee service.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::sync::Arc;
use std::time::Duration;

use roster::domain::ports::{AlwaysConfirm, EmployeeGatewayError, FixtureEmployeeGateway};
use roster::domain::{
    DepartmentId, EmployeeId, LoadOutcome, Reconciliation, RemoveOutcome, RosterCache,
    RosterCacheConfig, RosterCachePorts, RosterCacheRuntime,
};
use roster::test_support::employees::{employee, ids, with_salary};
use roster::test_support::gateway::ScriptedGateway;
use roster::test_support::retry::RecordingSleeper;
use rstest::rstest;

fn cache_over(gateway: Arc<FixtureEmployeeGateway>, reconciliation: Reconciliation) -> RosterCache {
    RosterCache::new(
        RosterCachePorts::new(gateway, Arc::new(AlwaysConfirm)),
        RosterCacheConfig {
            reconciliation,
            ..RosterCacheConfig::default()
        },
    )
}

#[rstest]
#[case::merge(Reconciliation::Merge)]
#[case::refetch(Reconciliation::Refetch)]
#[tokio::test]
async fn create_update_remove_round_trip(#[case] reconciliation: Reconciliation) {
    let gateway = Arc::new(FixtureEmployeeGateway::with_employees(vec![employee(1, "A")]));
    let cache = cache_over(gateway.clone(), reconciliation);
    cache.load().await.expect("initial load");

    let mut second = employee(2, "B");
    second.age = 25;
    second.salary = 40_000.0;
    second.department_id = DepartmentId::new(10);
    second.manager_id = Some(EmployeeId::new(1));
    cache.create(second.clone()).await.expect("create");
    assert_eq!(cache.employees(), vec![employee(1, "A"), second.clone()]);

    let raised = with_salary(&employee(1, "A"), 55_000.0);
    cache
        .update(EmployeeId::new(1), raised.clone())
        .await
        .expect("update");
    assert_eq!(cache.employees(), vec![raised.clone(), second]);

    let removed = cache.remove(EmployeeId::new(2)).await.expect("remove");
    assert_eq!(removed, RemoveOutcome::Removed);
    assert_eq!(cache.employees(), vec![raised]);
    assert_eq!(ids(&gateway.snapshot()), vec![1]);
}

#[tokio::test]
async fn cold_start_waits_for_the_service_to_wake() {
    let gateway = Arc::new(ScriptedGateway::with_employees(vec![
        employee(1, "A"),
        employee(2, "B"),
    ]));
    gateway.fail_next_lists(2, &EmployeeGatewayError::service(503_u16, "waking up"));
    let sleeper = Arc::new(RecordingSleeper::default());
    let cache = RosterCache::with_runtime(
        RosterCachePorts::new(gateway.clone(), Arc::new(AlwaysConfirm)),
        RosterCacheRuntime {
            sleeper: sleeper.clone(),
        },
        RosterCacheConfig::default(),
    );

    let outcome = cache.load().await.expect("load succeeds once awake");

    assert_eq!(
        outcome,
        LoadOutcome::Loaded {
            attempts: 3,
            employees: 2
        }
    );
    assert_eq!(gateway.list_calls(), 3);
    assert_eq!(sleeper.delays(), vec![Duration::from_secs(2); 2]);
    assert_eq!(gateway.mutation_calls(), 0);
}
