//! DTOs for the employee service wire format.
//!
//! Responses decode into these transport DTOs first, then map into domain
//! records in one pass. Keys are camelCase on the wire.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{DepartmentId, Employee, EmployeeId, validate_salary};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct EmployeeDto {
    pub(super) employee_id: i64,
    pub(super) name: String,
    pub(super) age: i64,
    pub(super) salary: f64,
    pub(super) department_id: i64,
    #[serde(default)]
    pub(super) manager_id: Value,
}

impl EmployeeDto {
    pub(super) fn into_domain(self) -> Result<Employee, String> {
        let employee_id = self.employee_id;
        let age = u32::try_from(self.age)
            .map_err(|_| format!("employee {employee_id} has invalid age {}", self.age))?;
        let salary = validate_salary(self.salary)
            .map_err(|error| format!("employee {employee_id} has invalid salary: {error}"))?;
        let manager_id = manager_id_from_wire(&self.manager_id)
            .map_err(|reason| format!("employee {employee_id} has invalid managerId: {reason}"))?;

        Ok(Employee {
            employee_id: EmployeeId::new(employee_id),
            name: self.name,
            age,
            salary,
            department_id: DepartmentId::new(self.department_id),
            manager_id,
        })
    }
}

/// Normalise the loosely typed `managerId` field.
///
/// `null`, an omitted key and blank strings mean "no manager"; numbers and
/// numeric strings name the manager.
pub(super) fn manager_id_from_wire(raw: &Value) -> Result<Option<EmployeeId>, String> {
    match raw {
        Value::Null => Ok(None),
        Value::Number(number) => number
            .as_i64()
            .map(|id| Some(EmployeeId::new(id)))
            .ok_or_else(|| format!("{number} is not an integer id")),
        Value::String(text) if text.trim().is_empty() => Ok(None),
        Value::String(text) => text
            .trim()
            .parse::<i64>()
            .map(|id| Some(EmployeeId::new(id)))
            .map_err(|_| format!("'{text}' is not an integer id")),
        other => Err(format!("unexpected value {other}")),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct EmployeeBodyDto<'a> {
    employee_id: i64,
    name: &'a str,
    age: u32,
    salary: f64,
    department_id: i64,
    manager_id: Option<i64>,
}

impl<'a> From<&'a Employee> for EmployeeBodyDto<'a> {
    fn from(employee: &'a Employee) -> Self {
        Self {
            employee_id: employee.employee_id.get(),
            name: employee.name.as_str(),
            age: employee.age,
            salary: employee.salary,
            department_id: employee.department_id.get(),
            manager_id: employee.manager_id.map(EmployeeId::get),
        }
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]
mod tests {
    //! Wire-format coverage for employee DTOs.

    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::null(json!(null), None)]
    #[case::blank(json!("  "), None)]
    #[case::empty(json!(""), None)]
    #[case::number(json!(4), Some(4))]
    #[case::numeric_text(json!(" 4 "), Some(4))]
    fn normalises_manager_ids(#[case] raw: Value, #[case] expected: Option<i64>) {
        assert_eq!(
            manager_id_from_wire(&raw),
            Ok(expected.map(EmployeeId::new))
        );
    }

    #[rstest]
    #[case::fraction(json!(1.5))]
    #[case::word(json!("boss"))]
    #[case::object(json!({ "id": 1 }))]
    fn rejects_malformed_manager_ids(#[case] raw: Value) {
        assert!(manager_id_from_wire(&raw).is_err());
    }

    #[test]
    fn omitted_manager_id_decodes_as_none() {
        let dto: EmployeeDto = serde_json::from_value(json!({
            "employeeId": 1,
            "name": "A",
            "age": 30,
            "salary": 50000,
            "departmentId": 10
        }))
        .expect("valid payload");
        let employee = dto.into_domain().expect("valid employee");
        assert_eq!(employee.manager_id, None);
        assert_eq!(employee.salary, 50_000.0);
    }

    #[test]
    fn rejects_negative_age() {
        let dto: EmployeeDto = serde_json::from_value(json!({
            "employeeId": 1,
            "name": "A",
            "age": -1,
            "salary": 1,
            "departmentId": 10,
            "managerId": null
        }))
        .expect("shape is valid");
        assert!(dto.into_domain().is_err());
    }

    #[test]
    fn absent_manager_is_sent_as_null() {
        let employee = Employee {
            employee_id: EmployeeId::new(2),
            name: "B".to_owned(),
            age: 25,
            salary: 40_000.0,
            department_id: DepartmentId::new(10),
            manager_id: None,
        };
        let body = serde_json::to_value(EmployeeBodyDto::from(&employee)).expect("serialises");
        assert_eq!(
            body,
            json!({
                "employeeId": 2,
                "name": "B",
                "age": 25,
                "salary": 40000.0,
                "departmentId": 10,
                "managerId": null
            })
        );
    }
}
