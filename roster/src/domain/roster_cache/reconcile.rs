//! Local patch operations applied once the remote service has acknowledged
//! a mutation.
//!
//! Every helper keeps list order and the one-record-per-id invariant.

use crate::domain::{Employee, EmployeeId};

/// Effect a local patch had on the cached roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Patched {
    Replaced,
    Appended,
    Removed,
    Absent,
}

/// Replace the record sharing `record.employee_id`, or append it.
pub(super) fn upsert(employees: &mut Vec<Employee>, record: Employee) -> Patched {
    match employees
        .iter_mut()
        .find(|existing| existing.employee_id == record.employee_id)
    {
        Some(slot) => {
            *slot = record;
            Patched::Replaced
        }
        None => {
            employees.push(record);
            Patched::Appended
        }
    }
}

/// Drop the record with `employee_id`.
pub(super) fn remove(employees: &mut Vec<Employee>, employee_id: EmployeeId) -> Patched {
    let before = employees.len();
    employees.retain(|existing| existing.employee_id != employee_id);
    if employees.len() == before {
        Patched::Absent
    } else {
        Patched::Removed
    }
}

/// Keep the first record for every id, preserving order.
///
/// Returns the deduplicated roster and the number of records dropped.
pub(super) fn dedupe_by_id(employees: Vec<Employee>) -> (Vec<Employee>, usize) {
    let total = employees.len();
    let mut kept: Vec<Employee> = Vec::with_capacity(total);
    for employee in employees {
        if !kept
            .iter()
            .any(|existing| existing.employee_id == employee.employee_id)
        {
            kept.push(employee);
        }
    }
    let dropped = total - kept.len();
    (kept, dropped)
}
