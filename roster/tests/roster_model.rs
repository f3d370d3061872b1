//! Model-based equivalence between the roster cache and a replayed model.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::sync::Arc;

use proptest::prelude::*;
use proptest::test_runner::Config;
use roster::domain::ports::{AlwaysConfirm, FixtureEmployeeGateway};
use roster::domain::{
    Employee, EmployeeId, Reconciliation, RosterCache, RosterCacheConfig, RosterCachePorts,
};
use roster::test_support::employees::{employee, with_salary};

#[derive(Debug, Clone)]
enum Op {
    Create { id: i64, salary: u32 },
    Update { id: i64, salary: u32 },
    Delete { id: i64 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0_i64..6, 0_u32..100_000).prop_map(|(id, salary)| Op::Create { id, salary }),
        (0_i64..6, 0_u32..100_000).prop_map(|(id, salary)| Op::Update { id, salary }),
        (0_i64..6).prop_map(|id| Op::Delete { id }),
    ]
}

fn record(id: i64, salary: u32) -> Employee {
    with_salary(&employee(id, &format!("E{id}")), f64::from(salary))
}

fn position(model: &[Employee], id: i64) -> Option<usize> {
    model
        .iter()
        .position(|employee| employee.employee_id == EmployeeId::new(id))
}

async fn replay(ops: Vec<Op>, reconciliation: Reconciliation) -> Result<(), TestCaseError> {
    let cache = RosterCache::new(
        RosterCachePorts::new(
            Arc::new(FixtureEmployeeGateway::default()),
            Arc::new(AlwaysConfirm),
        ),
        RosterCacheConfig {
            reconciliation,
            ..RosterCacheConfig::default()
        },
    );
    let mut model: Vec<Employee> = Vec::new();

    for op in ops {
        match op {
            Op::Create { id, salary } => {
                let result = cache.create(record(id, salary)).await;
                if position(&model, id).is_some() {
                    prop_assert!(result.is_err(), "duplicate create of {id} must fail");
                } else {
                    prop_assert!(result.is_ok(), "create of {id} must succeed");
                    model.push(record(id, salary));
                }
            }
            Op::Update { id, salary } => {
                let result = cache.update(EmployeeId::new(id), record(id, salary)).await;
                match position(&model, id) {
                    Some(index) => {
                        prop_assert!(result.is_ok(), "update of {id} must succeed");
                        if let Some(slot) = model.get_mut(index) {
                            *slot = record(id, salary);
                        }
                    }
                    None => prop_assert!(result.is_err(), "update of missing {id} must fail"),
                }
            }
            Op::Delete { id } => {
                let result = cache.remove(EmployeeId::new(id)).await;
                match position(&model, id) {
                    Some(index) => {
                        prop_assert!(result.is_ok(), "delete of {id} must succeed");
                        model.remove(index);
                    }
                    None => prop_assert!(result.is_err(), "delete of missing {id} must fail"),
                }
            }
        }
        prop_assert_eq!(cache.employees(), model.clone());
    }
    Ok(())
}

proptest! {
    #![proptest_config(Config::with_cases(64))]
    #[test]
    fn cache_matches_replayed_model(
        ops in prop::collection::vec(op(), 0..24),
        refetch in any::<bool>(),
    ) {
        let reconciliation = if refetch {
            Reconciliation::Refetch
        } else {
            Reconciliation::Merge
        };
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("test runtime");
        runtime.block_on(replay(ops, reconciliation))?;
    }
}
