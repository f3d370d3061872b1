//! Driving port used by the form workflow to submit validated records.

use async_trait::async_trait;

use crate::domain::{DomainError, Employee, EmployeeId};

/// Port accepting validated employee records from the form workflow.
///
/// [`crate::domain::RosterCache`] is the production implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeSubmission: Send + Sync {
    /// Submit a new employee; returns the record as stored.
    async fn submit_new(&self, employee: Employee) -> Result<Employee, DomainError>;

    /// Submit an edit of the employee identified by `employee_id`.
    async fn submit_edit(
        &self,
        employee_id: EmployeeId,
        employee: Employee,
    ) -> Result<Employee, DomainError>;
}
