//! Test utilities for the roster crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with the
//! `test-support` feature.

pub mod gateway;
pub mod retry;

pub mod employees {
    //! Employee record builders for tests.

    use crate::domain::{DepartmentId, Employee, EmployeeId};

    /// Employee aged 30 earning 50000 in department 10 with no manager.
    #[must_use]
    pub fn employee(id: i64, name: &str) -> Employee {
        Employee {
            employee_id: EmployeeId::new(id),
            name: name.to_owned(),
            age: 30,
            salary: 50_000.0,
            department_id: DepartmentId::new(10),
            manager_id: None,
        }
    }

    /// Copy of `employee` with a different salary.
    #[must_use]
    pub fn with_salary(employee: &Employee, salary: f64) -> Employee {
        Employee {
            salary,
            ..employee.clone()
        }
    }

    /// Ids of `employees` in order.
    #[must_use]
    pub fn ids(employees: &[Employee]) -> Vec<i64> {
        employees
            .iter()
            .map(|employee| employee.employee_id.get())
            .collect()
    }
}
