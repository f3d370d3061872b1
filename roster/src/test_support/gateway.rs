//! Scripted gateway double wrapping the in-memory fixture.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{EmployeeGateway, EmployeeGatewayError, FixtureEmployeeGateway};
use crate::domain::{Employee, EmployeeId};

/// Gateway that can fail scripted calls and counts every call it receives.
///
/// Calls that are not scripted to fail are served by a
/// [`FixtureEmployeeGateway`].
#[derive(Debug, Default)]
pub struct ScriptedGateway {
    inner: FixtureEmployeeGateway,
    list_failures: Mutex<VecDeque<EmployeeGatewayError>>,
    mutation_failure: Mutex<Option<EmployeeGatewayError>>,
    list_calls: AtomicUsize,
    mutation_calls: AtomicUsize,
}

impl ScriptedGateway {
    /// Serve `employees` from the wrapped fixture.
    #[must_use]
    pub fn with_employees(employees: Vec<Employee>) -> Self {
        Self {
            inner: FixtureEmployeeGateway::with_employees(employees),
            ..Self::default()
        }
    }

    /// Fail the next `count` list calls with `error`.
    pub fn fail_next_lists(&self, count: usize, error: &EmployeeGatewayError) {
        self.lock_list_failures()
            .extend(std::iter::repeat_n(error.clone(), count));
    }

    /// Fail the next create, update or delete with `error`.
    pub fn fail_next_mutation(&self, error: EmployeeGatewayError) {
        *self
            .mutation_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    /// Number of list calls received.
    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of create, update and delete calls received.
    #[must_use]
    pub fn mutation_calls(&self) -> usize {
        self.mutation_calls.load(Ordering::SeqCst)
    }

    /// Records currently held remotely.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Employee> {
        self.inner.snapshot()
    }

    fn lock_list_failures(&self) -> std::sync::MutexGuard<'_, VecDeque<EmployeeGatewayError>> {
        self.list_failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn take_mutation_failure(&self) -> Option<EmployeeGatewayError> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        self.mutation_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

#[async_trait]
impl EmployeeGateway for ScriptedGateway {
    async fn list_employees(&self) -> Result<Vec<Employee>, EmployeeGatewayError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let failure = self.lock_list_failures().pop_front();
        match failure {
            Some(error) => Err(error),
            None => self.inner.list_employees().await,
        }
    }

    async fn create_employee(
        &self,
        employee: &Employee,
    ) -> Result<Employee, EmployeeGatewayError> {
        match self.take_mutation_failure() {
            Some(error) => Err(error),
            None => self.inner.create_employee(employee).await,
        }
    }

    async fn update_employee(
        &self,
        employee_id: EmployeeId,
        employee: &Employee,
    ) -> Result<(), EmployeeGatewayError> {
        match self.take_mutation_failure() {
            Some(error) => Err(error),
            None => self.inner.update_employee(employee_id, employee).await,
        }
    }

    async fn delete_employee(&self, employee_id: EmployeeId) -> Result<(), EmployeeGatewayError> {
        match self.take_mutation_failure() {
            Some(error) => Err(error),
            None => self.inner.delete_employee(employee_id).await,
        }
    }
}
