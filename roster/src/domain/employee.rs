//! Employee record model.
//!
//! Records are only constructed through validated paths: either the form
//! draft (see [`crate::domain::EmployeeDraft`]) or the gateway adapter when
//! decoding service responses.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable employee identifier.
///
/// Unique within a roster and immutable once the record exists remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(i64);

impl EmployeeId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Access the raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for EmployeeId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Department reference carried by every employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepartmentId(i64);

impl DepartmentId {
    /// Wrap a raw department identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Access the raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for DepartmentId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors raised when a salary value is out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SalaryError {
    /// The value was NaN or infinite.
    #[error("salary must be a finite number")]
    NotFinite,
    /// The value was below zero.
    #[error("salary must not be negative")]
    Negative,
}

/// Validate a salary amount.
///
/// # Examples
/// ```
/// use roster::domain::{SalaryError, validate_salary};
///
/// assert_eq!(validate_salary(50_000.0), Ok(50_000.0));
/// assert_eq!(validate_salary(-1.0), Err(SalaryError::Negative));
/// ```
pub fn validate_salary(salary: f64) -> Result<f64, SalaryError> {
    if !salary.is_finite() {
        return Err(SalaryError::NotFinite);
    }
    if salary < 0.0 {
        return Err(SalaryError::Negative);
    }
    Ok(salary)
}

/// One employee as mirrored from the remote roster.
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    /// Unique identifier.
    pub employee_id: EmployeeId,
    /// Display name.
    pub name: String,
    /// Age in whole years.
    pub age: u32,
    /// Salary amount; finite and non-negative.
    pub salary: f64,
    /// Owning department.
    pub department_id: DepartmentId,
    /// Reporting manager, if any.
    pub manager_id: Option<EmployeeId>,
}

impl Employee {
    /// Return a copy of this record carrying a different identifier.
    #[must_use]
    pub fn with_id(mut self, employee_id: EmployeeId) -> Self {
        self.employee_id = employee_id;
        self
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} (age {}, salary {}, dept {}, manager ",
            self.employee_id, self.name, self.age, self.salary, self.department_id
        )?;
        match self.manager_id {
            Some(manager) => write!(f, "{manager})"),
            None => f.write_str("none)"),
        }
    }
}
