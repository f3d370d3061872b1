//! Driven port for the remote employee service.
//!
//! The gateway is a pure boundary adapter: one request per call, no retries,
//! no caching. Retry and reconciliation policy live in the roster cache.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Employee, EmployeeId};

define_port_error! {
    /// Errors surfaced while calling the employee service.
    pub enum EmployeeGatewayError {
        /// Transport failed before a response was received.
        Network {
            /// Transport failure detail.
            message: String,
        } => "employee service unreachable: {message}",
        /// The service answered with a non-success status.
        Service {
            /// HTTP status code returned by the service.
            status: u16,
            /// Compact preview of the response body.
            message: String,
        } => "employee service responded with status {status}: {message}",
        /// The targeted employee does not exist on the service.
        NotFound {
            /// Employee the request addressed.
            employee_id: EmployeeId,
        } => "employee {employee_id} not found on the service",
        /// A success response carried a payload that could not be decoded.
        Decode {
            /// Decoder failure detail.
            message: String,
        } => "employee service response decode failed: {message}",
    }
}

/// Port for the remote employee resource collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeGateway: Send + Sync {
    /// Fetch every employee in service order.
    async fn list_employees(&self) -> Result<Vec<Employee>, EmployeeGatewayError>;

    /// Create one employee and return the record as stored by the service.
    async fn create_employee(&self, employee: &Employee)
    -> Result<Employee, EmployeeGatewayError>;

    /// Replace the employee identified by `employee_id`.
    async fn update_employee(
        &self,
        employee_id: EmployeeId,
        employee: &Employee,
    ) -> Result<(), EmployeeGatewayError>;

    /// Delete the employee identified by `employee_id`.
    async fn delete_employee(&self, employee_id: EmployeeId) -> Result<(), EmployeeGatewayError>;
}

/// In-memory gateway that behaves like the remote service.
///
/// Supplied ids are honoured, duplicate ids are rejected with a `409`, and
/// updates or deletes of unknown ids fail with
/// [`EmployeeGatewayError::NotFound`].
///
/// # Examples
///
/// ```rust,ignore
/// use roster::domain::ports::{EmployeeGateway, FixtureEmployeeGateway};
///
/// let gateway = FixtureEmployeeGateway::default();
/// assert!(gateway.list_employees().await?.is_empty());
/// # Ok::<(), roster::domain::ports::EmployeeGatewayError>(())
/// ```
#[derive(Debug, Default)]
pub struct FixtureEmployeeGateway {
    employees: Mutex<Vec<Employee>>,
}

impl FixtureEmployeeGateway {
    /// Seed the fixture with existing records.
    #[must_use]
    pub fn with_employees(employees: Vec<Employee>) -> Self {
        Self {
            employees: Mutex::new(employees),
        }
    }

    /// Snapshot the records currently held by the fixture.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Employee> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Employee>> {
        self.employees.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl EmployeeGateway for FixtureEmployeeGateway {
    async fn list_employees(&self) -> Result<Vec<Employee>, EmployeeGatewayError> {
        Ok(self.snapshot())
    }

    async fn create_employee(
        &self,
        employee: &Employee,
    ) -> Result<Employee, EmployeeGatewayError> {
        let mut employees = self.lock();
        if employees
            .iter()
            .any(|existing| existing.employee_id == employee.employee_id)
        {
            return Err(EmployeeGatewayError::service(
                409_u16,
                format!("employee {} already exists", employee.employee_id),
            ));
        }
        employees.push(employee.clone());
        Ok(employee.clone())
    }

    async fn update_employee(
        &self,
        employee_id: EmployeeId,
        employee: &Employee,
    ) -> Result<(), EmployeeGatewayError> {
        let mut employees = self.lock();
        let slot = employees
            .iter_mut()
            .find(|existing| existing.employee_id == employee_id)
            .ok_or_else(|| EmployeeGatewayError::not_found(employee_id))?;
        *slot = employee.clone().with_id(employee_id);
        Ok(())
    }

    async fn delete_employee(&self, employee_id: EmployeeId) -> Result<(), EmployeeGatewayError> {
        let mut employees = self.lock();
        let position = employees
            .iter()
            .position(|existing| existing.employee_id == employee_id)
            .ok_or_else(|| EmployeeGatewayError::not_found(employee_id))?;
        employees.remove(position);
        Ok(())
    }
}
