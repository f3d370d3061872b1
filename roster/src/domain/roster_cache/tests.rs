//! Unit tests for roster cache loading and reconciliation.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::sync::Arc;
use std::time::Duration;

use rstest::rstest;

use super::*;
use crate::domain::ports::{
    AlwaysConfirm, EmployeeGatewayError, FixtureEmployeeGateway, MockEmployeeGateway,
};
use crate::domain::{EmployeeId, ErrorCode};
use crate::test_support::employees::{employee, ids, with_salary};
use crate::test_support::gateway::ScriptedGateway;
use crate::test_support::retry::{ImmediateSleeper, ParkingSleeper, RecordingSleeper};

fn build_cache(
    gateway: Arc<dyn EmployeeGateway>,
    confirmation: Arc<dyn DeletionConfirmation>,
    sleeper: Arc<dyn RetrySleeper>,
    reconciliation: Reconciliation,
) -> RosterCache {
    RosterCache::with_runtime(
        RosterCachePorts::new(gateway, confirmation),
        RosterCacheRuntime { sleeper },
        RosterCacheConfig {
            retry_delay: DEFAULT_RETRY_DELAY,
            reconciliation,
        },
    )
}

fn merge_cache(gateway: Arc<dyn EmployeeGateway>) -> RosterCache {
    build_cache(
        gateway,
        Arc::new(AlwaysConfirm),
        Arc::new(ImmediateSleeper),
        Reconciliation::Merge,
    )
}

async fn loaded(gateway: Arc<dyn EmployeeGateway>) -> RosterCache {
    let cache = merge_cache(gateway);
    cache.load().await.expect("initial load succeeds");
    cache
}

#[tokio::test]
async fn load_replaces_state_with_fetched_roster() {
    let gateway = Arc::new(FixtureEmployeeGateway::with_employees(vec![
        employee(3, "C"),
        employee(1, "A"),
    ]));
    let cache = merge_cache(gateway);
    assert!(cache.is_empty());

    let outcome = cache.load().await.expect("load succeeds");

    assert_eq!(
        outcome,
        LoadOutcome::Loaded {
            attempts: 1,
            employees: 2
        }
    );
    assert_eq!(ids(&cache.employees()), vec![3, 1]);
    assert_eq!(cache.find(EmployeeId::new(1)), Some(employee(1, "A")));
    assert_eq!(cache.len(), 2);
}

#[rstest]
#[case::network(EmployeeGatewayError::network("connection refused"))]
#[case::service(EmployeeGatewayError::service(503_u16, "service unavailable"))]
#[tokio::test]
async fn cold_start_retries_with_fixed_delay_until_success(#[case] failure: EmployeeGatewayError) {
    let gateway = Arc::new(ScriptedGateway::with_employees(vec![employee(1, "A")]));
    gateway.fail_next_lists(3, &failure);
    let sleeper = Arc::new(RecordingSleeper::default());
    let cache = build_cache(
        gateway.clone(),
        Arc::new(AlwaysConfirm),
        sleeper.clone(),
        Reconciliation::Merge,
    );

    let outcome = cache.load().await.expect("load eventually succeeds");

    assert_eq!(
        outcome,
        LoadOutcome::Loaded {
            attempts: 4,
            employees: 1
        }
    );
    assert_eq!(gateway.list_calls(), 4);
    assert_eq!(sleeper.delays(), vec![Duration::from_secs(2); 3]);
    assert_eq!(ids(&cache.employees()), vec![1]);
}

#[tokio::test]
async fn retry_delay_follows_configuration() {
    let gateway = Arc::new(ScriptedGateway::default());
    gateway.fail_next_lists(1, &EmployeeGatewayError::network("reset"));
    let sleeper = Arc::new(RecordingSleeper::default());
    let cache = RosterCache::with_runtime(
        RosterCachePorts::new(gateway, Arc::new(AlwaysConfirm)),
        RosterCacheRuntime {
            sleeper: sleeper.clone(),
        },
        RosterCacheConfig {
            retry_delay: Duration::from_millis(250),
            reconciliation: Reconciliation::Merge,
        },
    );

    cache.load().await.expect("load succeeds");

    assert_eq!(sleeper.delays(), vec![Duration::from_millis(250)]);
}

#[tokio::test]
async fn load_surfaces_not_found_without_retrying() {
    let mut gateway = MockEmployeeGateway::new();
    gateway
        .expect_list_employees()
        .times(1)
        .returning(|| Err(EmployeeGatewayError::not_found(EmployeeId::new(1))));
    let sleeper = Arc::new(RecordingSleeper::default());
    let cache = build_cache(
        Arc::new(gateway),
        Arc::new(AlwaysConfirm),
        sleeper.clone(),
        Reconciliation::Merge,
    );

    let error = cache.load().await.expect_err("not found is not retried");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.operation(), Some(RosterOperation::Load));
    assert!(sleeper.delays().is_empty());
}

#[tokio::test]
async fn load_surfaces_undecodable_roster_without_retrying() {
    let gateway = Arc::new(ScriptedGateway::with_employees(vec![employee(1, "A")]));
    gateway.fail_next_lists(
        3,
        &EmployeeGatewayError::decode("employee 3: salary must not be negative"),
    );
    let sleeper = Arc::new(RecordingSleeper::default());
    let cache = build_cache(
        gateway.clone(),
        Arc::new(AlwaysConfirm),
        sleeper.clone(),
        Reconciliation::Merge,
    );

    let error = cache
        .load()
        .await
        .expect_err("a rejected payload does not heal on retry");

    assert_eq!(error.code(), ErrorCode::MalformedResponse);
    assert_eq!(error.operation(), Some(RosterOperation::Load));
    assert_eq!(gateway.list_calls(), 1);
    assert!(sleeper.delays().is_empty());
    assert!(cache.is_empty());
}

#[tokio::test]
async fn failed_refresh_keeps_previous_roster() {
    let gateway = Arc::new(ScriptedGateway::with_employees(vec![employee(1, "A")]));
    let cache = loaded(gateway.clone()).await;
    gateway.fail_next_lists(1, &EmployeeGatewayError::service(500_u16, "boom"));

    let error = cache.refresh().await.expect_err("refresh is not retried");

    assert_eq!(error.code(), ErrorCode::Service);
    assert_eq!(error.operation(), Some(RosterOperation::Refresh));
    assert_eq!(gateway.list_calls(), 2);
    assert_eq!(cache.employees(), vec![employee(1, "A")]);
}

#[tokio::test]
async fn cancel_load_stops_pending_retry() {
    let gateway = Arc::new(ScriptedGateway::default());
    gateway.fail_next_lists(5, &EmployeeGatewayError::network("asleep"));
    let sleeper = Arc::new(ParkingSleeper::default());
    let cache = build_cache(
        gateway.clone(),
        Arc::new(AlwaysConfirm),
        sleeper.clone(),
        Reconciliation::Merge,
    );

    let (outcome, ()) = tokio::join!(cache.load(), async {
        sleeper.wait_until_parked().await;
        cache.cancel_load();
    });

    assert_eq!(
        outcome.expect("cancellation is not an error"),
        LoadOutcome::Cancelled { attempts: 1 }
    );
    assert_eq!(gateway.list_calls(), 1);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn new_load_supersedes_pending_retry() {
    let gateway = Arc::new(ScriptedGateway::with_employees(vec![employee(1, "A")]));
    gateway.fail_next_lists(1, &EmployeeGatewayError::network("asleep"));
    let sleeper = Arc::new(ParkingSleeper::default());
    let cache = build_cache(
        gateway.clone(),
        Arc::new(AlwaysConfirm),
        sleeper.clone(),
        Reconciliation::Merge,
    );

    let (first, second) = tokio::join!(cache.load(), async {
        sleeper.wait_until_parked().await;
        cache.load().await
    });

    assert_eq!(
        first.expect("superseded load is not an error"),
        LoadOutcome::Cancelled { attempts: 1 }
    );
    assert_eq!(
        second.expect("second load succeeds"),
        LoadOutcome::Loaded {
            attempts: 1,
            employees: 1
        }
    );
    assert_eq!(gateway.list_calls(), 2);
    assert_eq!(sleeper.sleeps(), 1);
}

#[tokio::test]
async fn shutdown_suppresses_pending_and_future_retries() {
    let gateway = Arc::new(ScriptedGateway::default());
    gateway.fail_next_lists(5, &EmployeeGatewayError::network("asleep"));
    let sleeper = Arc::new(ParkingSleeper::default());
    let cache = build_cache(
        gateway.clone(),
        Arc::new(AlwaysConfirm),
        sleeper.clone(),
        Reconciliation::Merge,
    );

    let (outcome, ()) = tokio::join!(cache.load(), async {
        sleeper.wait_until_parked().await;
        cache.shutdown();
    });
    assert_eq!(
        outcome.expect("cancelled"),
        LoadOutcome::Cancelled { attempts: 1 }
    );

    let after = cache.load().await.expect("cancelled");
    assert_eq!(after, LoadOutcome::Cancelled { attempts: 0 });
    assert_eq!(gateway.list_calls(), 1);
}

#[tokio::test]
async fn create_appends_the_server_returned_record() {
    let mut gateway = MockEmployeeGateway::new();
    gateway.expect_list_employees().returning(|| Ok(vec![employee(1, "A")]));
    gateway
        .expect_create_employee()
        .withf(|draft| draft.employee_id == EmployeeId::new(2))
        .times(1)
        .returning(|draft| {
            Ok(Employee {
                name: "B (normalised)".to_owned(),
                ..draft.clone()
            })
        });
    let cache = loaded(Arc::new(gateway)).await;

    let created = cache.create(employee(2, "B")).await.expect("create succeeds");

    assert_eq!(created.name, "B (normalised)");
    assert_eq!(ids(&cache.employees()), vec![1, 2]);
    assert_eq!(cache.find(EmployeeId::new(2)), Some(created));
}

#[tokio::test]
async fn failed_create_leaves_state_unchanged() {
    let gateway = Arc::new(ScriptedGateway::with_employees(vec![employee(1, "A")]));
    let cache = loaded(gateway.clone()).await;
    gateway.fail_next_mutation(EmployeeGatewayError::network("connection reset"));

    let error = cache
        .create(employee(2, "B"))
        .await
        .expect_err("create fails");

    assert_eq!(error.code(), ErrorCode::Network);
    assert_eq!(
        error.to_string(),
        "create employee 2 failed: employee service is unreachable"
    );
    assert_eq!(cache.employees(), vec![employee(1, "A")]);
    assert_eq!(gateway.list_calls(), 1, "mutations are never retried");
}

#[tokio::test]
async fn create_then_refresh_holds_the_record_once() {
    let gateway = Arc::new(FixtureEmployeeGateway::with_employees(vec![employee(1, "A")]));
    let cache = loaded(gateway).await;

    cache.create(employee(2, "B")).await.expect("create succeeds");
    cache.refresh().await.expect("refresh succeeds");
    cache.load().await.expect("load succeeds");

    assert_eq!(ids(&cache.employees()), vec![1, 2]);
}

#[tokio::test]
async fn update_replaces_matching_record_and_is_idempotent() {
    let gateway = Arc::new(FixtureEmployeeGateway::with_employees(vec![
        employee(1, "A"),
        employee(2, "B"),
    ]));
    let cache = loaded(gateway.clone()).await;
    let raised = with_salary(&employee(1, "A"), 55_000.0);

    cache
        .update(EmployeeId::new(1), raised.clone())
        .await
        .expect("first update");
    let once = cache.employees();
    cache
        .update(EmployeeId::new(1), raised.clone())
        .await
        .expect("second update");

    assert_eq!(cache.employees(), once);
    assert_eq!(once, vec![raised, employee(2, "B")]);
    assert_eq!(gateway.snapshot(), once);
}

#[tokio::test]
async fn update_forces_the_path_id() {
    let gateway = Arc::new(FixtureEmployeeGateway::with_employees(vec![employee(1, "A")]));
    let cache = loaded(gateway).await;

    let stored = cache
        .update(EmployeeId::new(1), employee(42, "A2"))
        .await
        .expect("update succeeds");

    assert_eq!(stored, employee(1, "A2"));
    assert_eq!(cache.employees(), vec![employee(1, "A2")]);
}

#[tokio::test]
async fn update_of_vanished_record_surfaces_not_found() {
    let gateway = Arc::new(ScriptedGateway::with_employees(vec![employee(1, "A")]));
    let cache = loaded(gateway.clone()).await;
    gateway.fail_next_mutation(EmployeeGatewayError::not_found(EmployeeId::new(1)));

    let error = cache
        .update(EmployeeId::new(1), employee(1, "A2"))
        .await
        .expect_err("record vanished");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.employee_id(), Some(EmployeeId::new(1)));
    assert_eq!(cache.employees(), vec![employee(1, "A")]);
}

#[tokio::test]
async fn declined_remove_never_contacts_the_gateway() {
    let mut gateway = MockEmployeeGateway::new();
    gateway
        .expect_list_employees()
        .times(1)
        .returning(|| Ok(vec![employee(1, "A")]));
    gateway.expect_delete_employee().never();
    let cache = build_cache(
        Arc::new(gateway),
        Arc::new(|_id: EmployeeId| false),
        Arc::new(ImmediateSleeper),
        Reconciliation::Merge,
    );
    cache.load().await.expect("load succeeds");

    let outcome = cache.remove(EmployeeId::new(1)).await.expect("no-op");

    assert_eq!(outcome, RemoveOutcome::Declined);
    assert_eq!(cache.employees(), vec![employee(1, "A")]);
}

#[tokio::test]
async fn confirmed_remove_drops_the_record() {
    let gateway = Arc::new(FixtureEmployeeGateway::with_employees(vec![
        employee(1, "A"),
        employee(2, "B"),
    ]));
    let cache = loaded(gateway.clone()).await;

    let outcome = cache.remove(EmployeeId::new(1)).await.expect("removed");

    assert_eq!(outcome, RemoveOutcome::Removed);
    assert_eq!(ids(&cache.employees()), vec![2]);
    assert_eq!(ids(&gateway.snapshot()), vec![2]);
}

#[tokio::test]
async fn failed_remove_leaves_state_unchanged() {
    let gateway = Arc::new(ScriptedGateway::with_employees(vec![employee(1, "A")]));
    let cache = loaded(gateway.clone()).await;
    gateway.fail_next_mutation(EmployeeGatewayError::service(500_u16, "boom"));

    let error = cache
        .remove(EmployeeId::new(1))
        .await
        .expect_err("delete fails");

    assert_eq!(
        error.to_string(),
        "delete employee 1 failed: employee service returned status 500"
    );
    assert_eq!(cache.employees(), vec![employee(1, "A")]);
}

#[tokio::test]
async fn refetch_strategy_reloads_after_each_mutation() {
    let gateway = Arc::new(ScriptedGateway::with_employees(vec![employee(1, "A")]));
    let cache = build_cache(
        gateway.clone(),
        Arc::new(AlwaysConfirm),
        Arc::new(ImmediateSleeper),
        Reconciliation::Refetch,
    );
    cache.load().await.expect("load succeeds");

    cache.create(employee(2, "B")).await.expect("create");
    cache
        .update(EmployeeId::new(2), employee(2, "B2"))
        .await
        .expect("update");
    cache.remove(EmployeeId::new(1)).await.expect("remove");

    assert_eq!(gateway.list_calls(), 4);
    assert_eq!(cache.employees(), gateway.snapshot());
    assert_eq!(cache.employees(), vec![employee(2, "B2")]);
}

#[tokio::test]
async fn refetch_failure_falls_back_to_merge() {
    let gateway = Arc::new(ScriptedGateway::with_employees(vec![employee(1, "A")]));
    let cache = build_cache(
        gateway.clone(),
        Arc::new(AlwaysConfirm),
        Arc::new(ImmediateSleeper),
        Reconciliation::Refetch,
    );
    cache.load().await.expect("load succeeds");
    gateway.fail_next_lists(1, &EmployeeGatewayError::network("flaky"));

    let created = cache.create(employee(2, "B")).await.expect("create");

    assert_eq!(gateway.list_calls(), 2);
    assert_eq!(cache.employees(), vec![employee(1, "A"), created]);
}

#[tokio::test]
async fn concurrent_mutations_all_apply() {
    let gateway = Arc::new(FixtureEmployeeGateway::default());
    let cache = loaded(gateway.clone()).await;

    let (first, second, third) = tokio::join!(
        cache.create(employee(1, "A")),
        cache.create(employee(2, "B")),
        cache.create(employee(3, "C")),
    );
    first.expect("first");
    second.expect("second");
    third.expect("third");

    let mut cached = ids(&cache.employees());
    cached.sort_unstable();
    assert_eq!(cached, vec![1, 2, 3]);
    assert_eq!(cache.employees(), gateway.snapshot());
}

#[rstest]
#[case("merge", Ok(Reconciliation::Merge))]
#[case(" Refetch ", Ok(Reconciliation::Refetch))]
#[case("optimistic", Err(UnknownReconciliation("optimistic".to_owned())))]
fn parses_reconciliation_names(
    #[case] raw: &str,
    #[case] expected: Result<Reconciliation, UnknownReconciliation>,
) {
    assert_eq!(raw.parse::<Reconciliation>(), expected);
}
