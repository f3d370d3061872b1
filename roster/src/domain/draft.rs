//! Editable employee draft held by the form workflow.
//!
//! A draft stores raw field text exactly as entered so malformed input can be
//! kept, shown back, and corrected. [`EmployeeDraft::validate`] is the only
//! way from a draft to an [`Employee`].

use std::fmt;
use std::str::FromStr;

use super::{DepartmentId, DomainError, Employee, EmployeeId, validate_salary};

/// Form fields that can be edited one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmployeeField {
    /// `employeeId`; editable only while creating.
    EmployeeId,
    /// `name`.
    Name,
    /// `age`.
    Age,
    /// `salary`.
    Salary,
    /// `departmentId`.
    DepartmentId,
    /// `managerId`; optional.
    ManagerId,
}

impl EmployeeField {
    /// Every field in form order.
    pub const ALL: [Self; 6] = [
        Self::EmployeeId,
        Self::Name,
        Self::Age,
        Self::Salary,
        Self::DepartmentId,
        Self::ManagerId,
    ];

    /// Wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmployeeId => "employeeId",
            Self::Name => "name",
            Self::Age => "age",
            Self::Salary => "salary",
            Self::DepartmentId => "departmentId",
            Self::ManagerId => "managerId",
        }
    }
}

impl fmt::Display for EmployeeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown field name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown employee field '{0}'")]
pub struct UnknownFieldError(pub String);

impl FromStr for EmployeeField {
    type Err = UnknownFieldError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalised = raw.trim().replace(['_', '-'], "").to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().to_ascii_lowercase() == normalised)
            .ok_or_else(|| UnknownFieldError(raw.to_owned()))
    }
}

/// Validation failures for a draft, one per offending field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftValidationError {
    /// A required field was blank.
    #[error("{field} is required")]
    Missing {
        /// Offending field.
        field: EmployeeField,
    },
    /// A numeric field did not parse or was out of range.
    #[error("{field} must be {expected}, got '{value}'")]
    Malformed {
        /// Offending field.
        field: EmployeeField,
        /// Description of the accepted input.
        expected: &'static str,
        /// Raw input as entered.
        value: String,
    },
}

impl DraftValidationError {
    /// Field the error refers to.
    #[must_use]
    pub const fn field(&self) -> EmployeeField {
        match self {
            Self::Missing { field } | Self::Malformed { field, .. } => *field,
        }
    }
}

impl From<DraftValidationError> for DomainError {
    fn from(value: DraftValidationError) -> Self {
        Self::validation(value.to_string())
    }
}

/// In-progress employee record as entered in the form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmployeeDraft {
    employee_id: String,
    name: String,
    age: String,
    salary: String,
    department_id: String,
    manager_id: String,
}

impl EmployeeDraft {
    /// Blank template with every field empty.
    #[must_use]
    pub const fn blank() -> Self {
        Self {
            employee_id: String::new(),
            name: String::new(),
            age: String::new(),
            salary: String::new(),
            department_id: String::new(),
            manager_id: String::new(),
        }
    }

    /// Draft pre-filled from an existing record.
    #[must_use]
    pub fn from_employee(employee: &Employee) -> Self {
        Self {
            employee_id: employee.employee_id.to_string(),
            name: employee.name.clone(),
            age: employee.age.to_string(),
            salary: employee.salary.to_string(),
            department_id: employee.department_id.to_string(),
            manager_id: employee
                .manager_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
        }
    }

    /// Whether every field is empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        EmployeeField::ALL
            .into_iter()
            .all(|field| self.field(field).is_empty())
    }

    /// Raw text of one field.
    #[must_use]
    pub fn field(&self, field: EmployeeField) -> &str {
        match field {
            EmployeeField::EmployeeId => &self.employee_id,
            EmployeeField::Name => &self.name,
            EmployeeField::Age => &self.age,
            EmployeeField::Salary => &self.salary,
            EmployeeField::DepartmentId => &self.department_id,
            EmployeeField::ManagerId => &self.manager_id,
        }
    }

    /// Replace the raw text of exactly one field.
    pub fn set(&mut self, field: EmployeeField, value: impl Into<String>) {
        let slot = match field {
            EmployeeField::EmployeeId => &mut self.employee_id,
            EmployeeField::Name => &mut self.name,
            EmployeeField::Age => &mut self.age,
            EmployeeField::Salary => &mut self.salary,
            EmployeeField::DepartmentId => &mut self.department_id,
            EmployeeField::ManagerId => &mut self.manager_id,
        };
        *slot = value.into();
    }

    /// Builder-style variant of [`Self::set`].
    #[must_use]
    pub fn with(mut self, field: EmployeeField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Validate the draft into an employee record.
    ///
    /// Fields are checked in form order and the first failure is reported.
    ///
    /// # Examples
    /// ```
    /// use roster::domain::{EmployeeDraft, EmployeeField};
    ///
    /// let draft = EmployeeDraft::blank()
    ///     .with(EmployeeField::EmployeeId, "2")
    ///     .with(EmployeeField::Name, "B")
    ///     .with(EmployeeField::Age, "25")
    ///     .with(EmployeeField::Salary, "40000")
    ///     .with(EmployeeField::DepartmentId, "10");
    /// let employee = draft.validate().expect("draft is complete");
    /// assert_eq!(employee.manager_id, None);
    /// ```
    pub fn validate(&self) -> Result<Employee, DraftValidationError> {
        let employee_id = parse_required(EmployeeField::EmployeeId, &self.employee_id, "an integer")?;
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DraftValidationError::Missing {
                field: EmployeeField::Name,
            });
        }
        let age = parse_required(EmployeeField::Age, &self.age, "a whole number of years")?;
        let raw_salary = parse_required::<f64>(EmployeeField::Salary, &self.salary, "a number")?;
        let salary = validate_salary(raw_salary).map_err(|_| DraftValidationError::Malformed {
            field: EmployeeField::Salary,
            expected: "a finite, non-negative number",
            value: self.salary.clone(),
        })?;
        let department_id =
            parse_required(EmployeeField::DepartmentId, &self.department_id, "an integer")?;
        let manager_id = parse_optional(EmployeeField::ManagerId, &self.manager_id, "an integer")?;

        Ok(Employee {
            employee_id: EmployeeId::new(employee_id),
            name: name.to_owned(),
            age,
            salary,
            department_id: DepartmentId::new(department_id),
            manager_id: manager_id.map(EmployeeId::new),
        })
    }
}

fn parse_required<T: FromStr>(
    field: EmployeeField,
    raw: &str,
    expected: &'static str,
) -> Result<T, DraftValidationError> {
    parse_optional(field, raw, expected)?.ok_or(DraftValidationError::Missing { field })
}

fn parse_optional<T: FromStr>(
    field: EmployeeField,
    raw: &str,
    expected: &'static str,
) -> Result<Option<T>, DraftValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|_| DraftValidationError::Malformed {
            field,
            expected,
            value: raw.to_owned(),
        })
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]
mod tests {
    //! Validation coverage for form drafts.

    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn complete() -> EmployeeDraft {
        EmployeeDraft::blank()
            .with(EmployeeField::EmployeeId, "2")
            .with(EmployeeField::Name, " B ")
            .with(EmployeeField::Age, "25")
            .with(EmployeeField::Salary, "40000.50")
            .with(EmployeeField::DepartmentId, "10")
            .with(EmployeeField::ManagerId, "1")
    }

    #[rstest]
    fn validates_complete_draft(complete: EmployeeDraft) {
        let employee = complete.validate().expect("valid draft");
        assert_eq!(employee.employee_id, EmployeeId::new(2));
        assert_eq!(employee.name, "B");
        assert_eq!(employee.age, 25);
        assert_eq!(employee.salary, 40_000.5);
        assert_eq!(employee.department_id, DepartmentId::new(10));
        assert_eq!(employee.manager_id, Some(EmployeeId::new(1)));
    }

    #[rstest]
    fn blank_manager_means_no_manager(complete: EmployeeDraft) {
        let employee = complete
            .with(EmployeeField::ManagerId, "  ")
            .validate()
            .expect("valid draft");
        assert_eq!(employee.manager_id, None);
    }

    #[rstest]
    #[case::id(EmployeeField::EmployeeId)]
    #[case::name(EmployeeField::Name)]
    #[case::age(EmployeeField::Age)]
    #[case::salary(EmployeeField::Salary)]
    #[case::department(EmployeeField::DepartmentId)]
    fn required_fields_must_not_be_blank(complete: EmployeeDraft, #[case] field: EmployeeField) {
        let error = complete
            .with(field, "")
            .validate()
            .expect_err("blank required field");
        assert_eq!(error, DraftValidationError::Missing { field });
    }

    #[rstest]
    #[case::id_text(EmployeeField::EmployeeId, "abc")]
    #[case::negative_age(EmployeeField::Age, "-1")]
    #[case::fractional_age(EmployeeField::Age, "30.5")]
    #[case::salary_text(EmployeeField::Salary, "lots")]
    #[case::negative_salary(EmployeeField::Salary, "-10")]
    #[case::infinite_salary(EmployeeField::Salary, "inf")]
    #[case::department_text(EmployeeField::DepartmentId, "ten")]
    #[case::manager_text(EmployeeField::ManagerId, "boss")]
    fn malformed_numbers_fail_validation(
        complete: EmployeeDraft,
        #[case] field: EmployeeField,
        #[case] raw: &str,
    ) {
        let error = complete
            .with(field, raw)
            .validate()
            .expect_err("malformed input");
        assert!(
            matches!(error, DraftValidationError::Malformed { .. }),
            "expected malformed error, got {error:?}"
        );
        assert_eq!(error.field(), field);
    }

    #[rstest]
    fn set_changes_exactly_one_field(complete: EmployeeDraft) {
        let mut edited = complete.clone();
        edited.set(EmployeeField::Salary, "55000");
        for field in EmployeeField::ALL {
            if field == EmployeeField::Salary {
                assert_eq!(edited.field(field), "55000");
            } else {
                assert_eq!(edited.field(field), complete.field(field));
            }
        }
    }

    #[rstest]
    fn from_employee_round_trips_through_validation(complete: EmployeeDraft) {
        let employee = complete.validate().expect("valid draft");
        let redrafted = EmployeeDraft::from_employee(&employee);
        assert_eq!(redrafted.validate().expect("still valid"), employee);
    }

    #[rstest]
    #[case("employeeId", EmployeeField::EmployeeId)]
    #[case("employee_id", EmployeeField::EmployeeId)]
    #[case("department-id", EmployeeField::DepartmentId)]
    #[case("MANAGERID", EmployeeField::ManagerId)]
    fn parses_field_names_leniently(#[case] raw: &str, #[case] expected: EmployeeField) {
        assert_eq!(raw.parse::<EmployeeField>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_field_names() {
        assert!("title".parse::<EmployeeField>().is_err());
    }

    #[test]
    fn blank_draft_is_blank() {
        assert!(EmployeeDraft::blank().is_blank());
        assert_eq!(EmployeeDraft::blank(), EmployeeDraft::default());
    }
}
